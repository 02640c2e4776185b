//! Tab-separated body parsing.

use serde_json::Value;

use super::Record;

/// Parses a TSV body into one record per data line.
///
/// The first line is the header row. Cells are paired with headers by
/// position and pairing stops at the shorter of the two, so a short row yields
/// a record with its trailing columns missing and surplus cells are dropped.
#[must_use]
pub fn parse(body: &str) -> Vec<Record> {
    let mut lines = body.lines();
    let Some(header_line) = lines.next() else {
        return Vec::new();
    };
    let headers: Vec<&str> = header_line.split('\t').collect();

    lines
        .map(|line| {
            headers
                .iter()
                .zip(line.split('\t'))
                .map(|(header, cell)| ((*header).to_string(), Value::String(cell.to_string())))
                .collect()
        })
        .collect()
}
