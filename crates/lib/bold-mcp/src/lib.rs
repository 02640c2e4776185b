//! MCP server implementation for bold-mcp.
//!
//! This crate wires the BOLD fetch pipeline into rmcp tool handlers and exposes
//! the MCP-facing API surface for specimen and combined searches.

mod helpers;
mod tools;
pub mod server;

use std::sync::Arc;

use bold_core::{BoldTool, FetchPipeline, QueryParameters};
use rmcp::{
    ErrorData,
    RoleServer,
    ServerHandler,
    handler::server::tool::{ToolCallContext, ToolRouter},
    service::RequestContext,
    tool,
    tool_router,
};
use rmcp::model::{
    CallToolRequestParams,
    CallToolResult,
    Content,
    ErrorCode,
    ListToolsResult,
    PaginatedRequestParams,
    ServerCapabilities,
    ServerInfo,
};
use tracing::{info, warn};

const SERVER_INSTRUCTIONS: &str = r"bold-mcp queries the BOLD Systems public API (Barcode of Life Data) for specimen records.

Tools:
- `specimen-search` returns specimen metadata (taxonomy, collection site, institution, BIN).
- `combined-search` returns specimen metadata joined with nucleotide sequences; accepts `marker`.

Parameters (all optional strings):
- `taxon` (e.g. 'Aves', 'Bos taurus'), `geo`, `ids`, `bin`, `container`, `institution`, `researchers`.
- Multiple values are pipe-delimited, e.g. `geo = 'Canada|Alaska'`.
- `format` is `tsv` (default, returned as a list of records) or `xml` (returned as a nested mapping).

Notes:
- Results are capped; when a search matches too many records the payload is
  `{ commentary, data }` and the query should be narrowed.
- Failures are returned as `{ message }` describing the timeout, HTTP status, or invalid parameter.
- `help` lists the commands; `health` returns `ok`.";

/// MCP server wrapper around the fetch pipeline and tool routers.
#[derive(Clone)]
pub struct BoldMcp {
    tool_router: ToolRouter<Self>,
    pipeline: Arc<FetchPipeline>,
}

impl BoldMcp {
    /// Creates a new server that owns its pipeline.
    #[must_use]
    pub fn new(pipeline: FetchPipeline) -> Self {
        Self::with_pipeline(Arc::new(pipeline))
    }

    /// Creates a new server using a shared pipeline handle.
    #[must_use]
    pub fn with_pipeline(pipeline: Arc<FetchPipeline>) -> Self {
        let tool_router = Self::tool_router_core()
            + Self::tool_router_search()
            + Self::tool_router_context();
        Self {
            tool_router,
            pipeline,
        }
    }

    /// Accepts the search tools and the registered support tools; any other
    /// name is an unknown tool.
    fn check_tool_name(&self, name: &str) -> Result<(), ErrorData> {
        match name.parse::<BoldTool>() {
            Ok(_) => Ok(()),
            Err(_) if self.tool_router.has_route(name) => Ok(()),
            Err(err) => {
                warn!(tool = name, "unknown tool requested");
                Err(helpers::mcp_err(ErrorCode::INVALID_PARAMS, err.to_string()))
            }
        }
    }

    /// Runs a search tool and renders its labelled JSON payload.
    pub(crate) async fn run_search(
        &self,
        tool: BoldTool,
        params: QueryParameters,
    ) -> Result<CallToolResult, ErrorData> {
        info!(tool = %tool, query = %params.query_string(), "calling BOLD tool");
        let response = self.pipeline.fetch(tool.search_kind(), &params).await;
        let payload = response.to_json().map_err(|err| {
            helpers::mcp_err(
                ErrorCode::INTERNAL_ERROR,
                format!("failed to serialize {tool} result: {err}"),
            )
        })?;
        Ok(CallToolResult::success(vec![Content::text(format!(
            "{}\n{payload}",
            tool.result_label()
        ))]))
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl BoldMcp {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

impl ServerHandler for BoldMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        self.check_tool_name(&request.name)?;
        let tcc = ToolCallContext::new(self, request, context);
        self.tool_router.call(tcc).await
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            meta: None,
            next_cursor: None,
        })
    }
}
