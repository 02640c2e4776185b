//! Core types and services for bold-mcp.
//!
//! This crate owns the fetch-and-normalize pipeline for the BOLD public API:
//! query string assembly, the HTTP fetch, TSV/XML response parsing into JSON
//! values, and the record truncation policy.

pub mod fetch;
pub mod parsers;
pub mod query;
pub mod truncation;

pub use fetch::{ErrorKind, ErrorPayload, FetchConfig, FetchError, FetchPipeline, FetchResponse};
pub use parsers::{NormalizedResult, ParseError, Record, ResponseParser};
pub use query::{BoldTool, QueryParameters, ResponseFormat, SearchKind, UnknownToolError};
pub use truncation::{ResultEnvelope, TruncationPolicy};
