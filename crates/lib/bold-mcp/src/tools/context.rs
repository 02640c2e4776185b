use bold_core::BoldTool;
use rmcp::{
    ErrorData,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::BoldMcp;

/// Payload listing the MCP commands this server exposes.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct HelpCommands {
    pub commands: Vec<String>,
}

impl Default for HelpCommands {
    fn default() -> Self {
        let mut commands: Vec<String> = BoldTool::ALL
            .iter()
            .map(|tool| format!("{tool} - {}", describe(*tool)))
            .collect();
        commands.push("help - List MCP commands and how search parameters are passed.".to_string());
        commands.push("health - Health check. Returns 'ok'.".to_string());
        Self { commands }
    }
}

const fn describe(tool: BoldTool) -> &'static str {
    match tool {
        BoldTool::SpecimenSearch => {
            "Search BOLD specimen records by taxon, geography, ids, BIN, container, institution, or researchers."
        }
        BoldTool::CombinedSearch => {
            "Search BOLD specimen records with their nucleotide sequences; also filters by marker."
        }
    }
}

#[tool_router(router = tool_router_context, vis = "pub")]
impl BoldMcp {
    #[tool(description = "List the MCP commands and how search parameters are passed.")]
    async fn help(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::json(HelpCommands::default())?]))
    }
}
