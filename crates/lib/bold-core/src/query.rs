//! Query parameters, search kinds, and the closed tool identity set.

use std::{error::Error, fmt, str::FromStr};

/// Upstream search endpoint selected by a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKind {
    Specimen,
    Combined,
}

impl SearchKind {
    /// Path segment appended to the API base URL.
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::Specimen => "specimen",
            Self::Combined => "combined",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// Response body formats the parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseFormat {
    Tsv,
    Xml,
}

impl ResponseFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tsv => "tsv",
            Self::Xml => "xml",
        }
    }
}

impl FromStr for ResponseFormat {
    type Err = crate::parsers::ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "tsv" => Ok(Self::Tsv),
            "xml" => Ok(Self::Xml),
            other => Err(crate::parsers::ParseError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// The fixed set of parameters accepted by the BOLD search endpoints.
///
/// Every field defaults to the empty string except `format`, which defaults to
/// `tsv`. Empty fields are left out of the assembled query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameters {
    pub taxon: String,
    pub geo: String,
    pub ids: String,
    pub bin: String,
    pub container: String,
    pub institution: String,
    pub researchers: String,
    pub marker: String,
    pub format: String,
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self {
            taxon: String::new(),
            geo: String::new(),
            ids: String::new(),
            bin: String::new(),
            container: String::new(),
            institution: String::new(),
            researchers: String::new(),
            marker: String::new(),
            format: ResponseFormat::Tsv.as_str().to_string(),
        }
    }
}

impl QueryParameters {
    /// Fields in the order they are written to the query string.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 9] {
        [
            ("taxon", self.taxon.as_str()),
            ("geo", self.geo.as_str()),
            ("ids", self.ids.as_str()),
            ("bin", self.bin.as_str()),
            ("container", self.container.as_str()),
            ("institution", self.institution.as_str()),
            ("researchers", self.researchers.as_str()),
            ("marker", self.marker.as_str()),
            ("format", self.format.as_str()),
        ]
    }

    /// Validates the `format` field.
    ///
    /// # Errors
    /// Returns `ParseError::UnsupportedFormat` for anything other than `tsv` or `xml`.
    pub fn response_format(&self) -> Result<ResponseFormat, crate::parsers::ParseError> {
        self.format.parse()
    }

    /// Builds the percent-encoded `key=value&...` query string, skipping empty values.
    #[must_use]
    pub fn query_string(&self) -> String {
        self.fields()
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Tools exposed over MCP. The set is closed; each maps to one search kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoldTool {
    SpecimenSearch,
    CombinedSearch,
}

impl BoldTool {
    pub const ALL: [Self; 2] = [Self::SpecimenSearch, Self::CombinedSearch];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SpecimenSearch => "specimen-search",
            Self::CombinedSearch => "combined-search",
        }
    }

    #[must_use]
    pub const fn search_kind(self) -> SearchKind {
        match self {
            Self::SpecimenSearch => SearchKind::Specimen,
            Self::CombinedSearch => SearchKind::Combined,
        }
    }

    /// Line written ahead of the JSON payload in tool output.
    #[must_use]
    pub const fn result_label(self) -> &'static str {
        match self {
            Self::SpecimenSearch => "Specimen returned:",
            Self::CombinedSearch => "Specimen with sequences returned:",
        }
    }
}

impl fmt::Display for BoldTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tool name outside the `BoldTool` set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownToolError {
    name: String,
}

impl UnknownToolError {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for UnknownToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown tool: {}", self.name)
    }
}

impl Error for UnknownToolError {}

impl FromStr for BoldTool {
    type Err = UnknownToolError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "specimen-search" => Ok(Self::SpecimenSearch),
            "combined-search" => Ok(Self::CombinedSearch),
            other => Err(UnknownToolError {
                name: other.to_string(),
            }),
        }
    }
}
