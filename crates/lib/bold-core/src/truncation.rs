//! Record cap applied to parsed results before they are returned.

use serde::Serialize;

use crate::parsers::NormalizedResult;

/// Default number of records handed back to the caller.
pub const DEFAULT_RECORD_CUTOFF: usize = 2000;

/// Result handed back to the tool layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultEnvelope {
    /// Every record fit under the cutoff.
    Complete(NormalizedResult),
    /// Records past the cutoff were dropped.
    Truncated {
        commentary: String,
        data: NormalizedResult,
    },
}

impl ResultEnvelope {
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }

    #[must_use]
    pub const fn data(&self) -> &NormalizedResult {
        match self {
            Self::Complete(data) | Self::Truncated { data, .. } => data,
        }
    }
}

/// Caps results at a fixed number of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncationPolicy {
    cutoff: usize,
}

impl TruncationPolicy {
    #[must_use]
    pub const fn new(cutoff: usize) -> Self {
        Self { cutoff }
    }

    #[must_use]
    pub const fn cutoff(&self) -> usize {
        self.cutoff
    }

    /// Wraps `result` in an envelope, truncating it when it holds more than
    /// `cutoff` records.
    #[must_use]
    pub fn apply(&self, mut result: NormalizedResult) -> ResultEnvelope {
        let total = result.record_count();
        if total <= self.cutoff {
            return ResultEnvelope::Complete(result);
        }

        result.truncate(self.cutoff);
        ResultEnvelope::Truncated {
            commentary: format!(
                "Query matched {total} records; only the first {} are returned. Narrow the search to see the rest.",
                self.cutoff
            ),
            data: result,
        }
    }
}

impl Default for TruncationPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RECORD_CUTOFF)
    }
}
