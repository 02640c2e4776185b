use bold_core::{BoldTool, QueryParameters};
use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars,
    tool,
    tool_router,
};
use serde::{Deserialize, Serialize};

use crate::BoldMcp;

/// Parameters for a BOLD specimen search.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SpecimenSearchParams {
    /// Taxonomic query (e.g., 'Aves', 'Bos taurus').
    pub taxon: Option<String>,
    /// Geographic sites (countries/provinces, pipe-delimited).
    pub geo: Option<String>,
    /// Specific specimen IDs (pipe-delimited).
    pub ids: Option<String>,
    /// Barcode Index Number (BIN) URIs (pipe-delimited).
    pub bin: Option<String>,
    /// Project or dataset codes (pipe-delimited).
    pub container: Option<String>,
    /// Specimen storing institutions (pipe-delimited).
    pub institution: Option<String>,
    /// Collector or identifier names (pipe-delimited).
    pub researchers: Option<String>,
    /// Response format: 'tsv' (default) or 'xml'.
    pub format: Option<String>,
}

/// Parameters for a BOLD combined (specimen and sequence) search.
#[derive(Debug, Clone, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct CombinedSearchParams {
    #[serde(flatten)]
    pub search: SpecimenSearchParams,
    /// Marker codes like 'matK', 'rbcL', 'COI-5P' (pipe-delimited).
    pub marker: Option<String>,
}

impl From<SpecimenSearchParams> for QueryParameters {
    fn from(params: SpecimenSearchParams) -> Self {
        let mut query = Self::default();
        merge(&mut query.taxon, params.taxon);
        merge(&mut query.geo, params.geo);
        merge(&mut query.ids, params.ids);
        merge(&mut query.bin, params.bin);
        merge(&mut query.container, params.container);
        merge(&mut query.institution, params.institution);
        merge(&mut query.researchers, params.researchers);
        merge(&mut query.format, params.format);
        query
    }
}

impl From<CombinedSearchParams> for QueryParameters {
    fn from(params: CombinedSearchParams) -> Self {
        let mut query = Self::from(params.search);
        merge(&mut query.marker, params.marker);
        query
    }
}

fn merge(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

#[tool_router(router = tool_router_search, vis = "pub")]
impl BoldMcp {
    #[tool(name = "specimen-search", description = "Query BOLD Rest API for a specimen")]
    async fn specimen_search(
        &self,
        Parameters(params): Parameters<SpecimenSearchParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.run_search(BoldTool::SpecimenSearch, params.into()).await
    }

    #[tool(
        name = "combined-search",
        description = "Query BOLD Rest API for both specimen info and nucleotide (DNA) sequence"
    )]
    async fn combined_search(
        &self,
        Parameters(params): Parameters<CombinedSearchParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.run_search(BoldTool::CombinedSearch, params.into()).await
    }
}
