//! MCP tool modules.
//!
//! Tools are grouped by domain: BOLD searches and contextual help.

pub mod search;
mod context;
