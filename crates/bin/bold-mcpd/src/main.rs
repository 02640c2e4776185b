//! Daemon entry point for the BOLD MCP server.
//!
//! Loads configuration from the command line and environment, installs
//! logging, builds the fetch pipeline, and serves the MCP protocol over stdio
//! or streamable HTTP.

mod config;
mod logging;

use std::sync::Arc;

use bold_core::FetchPipeline;
use bold_mcp::server::{McpHttpServerConfig, serve_stdio, serve_streamable_http};
use tracing::info;

use crate::config::BoldConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = BoldConfig::from_args()?;
    logging::init(config.verbosity);

    let pipeline = Arc::new(FetchPipeline::new(config.fetch.clone())?);
    info!(
        base_url = %config.fetch.base_url,
        timeout_secs = config.fetch.timeout.as_secs(),
        record_cutoff = config.fetch.record_cutoff,
        "starting bold-mcpd"
    );

    match config.mcp_http_addr {
        Some(addr) => {
            let http_config =
                McpHttpServerConfig::new(addr).with_stateful_mode(!config.stateless);
            serve_streamable_http(pipeline, http_config).await
        }
        None => serve_stdio(pipeline).await,
    }
}
