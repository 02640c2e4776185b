//! Parsers for BOLD API response bodies.
//!
//! Each parser normalizes one upstream body format into `serde_json` values so
//! the tool layer can serialize results without knowing the source format.

pub mod tsv;
pub mod xml;

use std::{error::Error, fmt};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::query::ResponseFormat;

/// One TSV row keyed by column header, in column order.
pub type Record = Map<String, Value>;

/// Parsed response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedResult {
    /// Rows of a TSV body.
    Records(Vec<Record>),
    /// Nested mapping built from an XML document.
    Document(Map<String, Value>),
}

impl NormalizedResult {
    /// Number of records: TSV rows, or child elements of the XML document root.
    #[must_use]
    pub fn record_count(&self) -> usize {
        match self {
            Self::Records(records) => records.len(),
            Self::Document(document) => xml::record_count(document),
        }
    }

    /// Keeps only the first `limit` records.
    pub fn truncate(&mut self, limit: usize) {
        match self {
            Self::Records(records) => records.truncate(limit),
            Self::Document(document) => xml::truncate_records(document, limit),
        }
    }
}

/// Error type for response parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnsupportedFormat(String),
    MalformedXml(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat(format) => write!(f, "unsupported format requested: {format}"),
            Self::MalformedXml(message) => write!(f, "malformed XML response: {message}"),
        }
    }
}

impl Error for ParseError {}

impl From<roxmltree::Error> for ParseError {
    fn from(err: roxmltree::Error) -> Self {
        Self::MalformedXml(err.to_string())
    }
}

/// Dispatches a response body to the parser for its format.
pub struct ResponseParser;

impl ResponseParser {
    /// Parses a body in an already validated format.
    ///
    /// # Errors
    /// Returns `ParseError::MalformedXml` if an XML body is not well formed.
    pub fn parse(body: &str, format: ResponseFormat) -> Result<NormalizedResult, ParseError> {
        match format {
            ResponseFormat::Tsv => Ok(NormalizedResult::Records(tsv::parse(body))),
            ResponseFormat::Xml => Ok(NormalizedResult::Document(xml::parse(body)?)),
        }
    }

    /// Parses a body using a raw format tag.
    ///
    /// # Errors
    /// Returns `ParseError::UnsupportedFormat` for tags other than `tsv` and
    /// `xml`, or `ParseError::MalformedXml` for a bad XML body.
    pub fn parse_tagged(body: &str, tag: &str) -> Result<NormalizedResult, ParseError> {
        Self::parse(body, tag.parse()?)
    }
}
