//! MCP server runners for bold-mcp.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use bold_core::FetchPipeline;
use rmcp::serve_server;
use rmcp::transport::io::stdio;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig,
    StreamableHttpService,
    session::local::LocalSessionManager,
};
use tracing::info;

use crate::BoldMcp;

/// Configuration for the MCP streamable HTTP server.
#[derive(Debug, Clone)]
pub struct McpHttpServerConfig {
    pub addr: SocketAddr,
    pub stateful_mode: bool,
    pub sse_keep_alive: Option<Duration>,
}

impl McpHttpServerConfig {
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            stateful_mode: true,
            sse_keep_alive: Some(Duration::from_secs(15)),
        }
    }

    #[must_use]
    pub const fn with_stateful_mode(mut self, stateful_mode: bool) -> Self {
        self.stateful_mode = stateful_mode;
        self
    }
}

fn log_upstream(pipeline: &FetchPipeline, transport: &str) {
    let config = pipeline.config();
    info!(
        transport,
        base_url = %config.base_url,
        timeout_secs = config.timeout.as_secs_f64(),
        record_cutoff = config.record_cutoff,
        "bold-mcp serving BOLD searches"
    );
}

/// Serves the MCP server over stdio.
///
/// # Errors
/// Returns any transport or server error.
pub async fn serve_stdio(
    pipeline: Arc<FetchPipeline>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    log_upstream(&pipeline, "stdio");
    let service = BoldMcp::with_pipeline(pipeline);
    let (stdin, stdout) = stdio();
    let running = serve_server(service, (stdin, stdout)).await?;
    let _ = running.waiting().await?;
    Ok(())
}

/// Serves the MCP server using streamable HTTP transport.
///
/// # Errors
/// Returns any listener or server error.
pub async fn serve_streamable_http(
    pipeline: Arc<FetchPipeline>,
    config: McpHttpServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    log_upstream(&pipeline, "streamable-http");
    let service: StreamableHttpService<BoldMcp, LocalSessionManager> =
        StreamableHttpService::new(
            move || Ok(BoldMcp::with_pipeline(pipeline.clone())),
            Arc::new(LocalSessionManager::default()),
            StreamableHttpServerConfig {
                sse_keep_alive: config.sse_keep_alive,
                stateful_mode: config.stateful_mode,
                ..Default::default()
            },
        );

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest_service("/mcp", service);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("bold-mcp listening on {}", config.addr);
    axum::serve(listener, app).await?;
    Ok(())
}
