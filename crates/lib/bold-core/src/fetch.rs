//! HTTP fetch against the BOLD public API.
//!
//! `FetchPipeline` is stateless between calls: it assembles the request URL,
//! issues a single GET bounded by the configured timeout, parses the body and
//! applies the truncation policy. Every failure is classified into a
//! `FetchError`, and `fetch` folds those into an `ErrorPayload` so the tool
//! layer always has a well-formed JSON response to return.

use std::{error::Error, fmt, time::Duration};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::parsers::{ParseError, ResponseParser};
use crate::query::{QueryParameters, SearchKind};
use crate::truncation::{DEFAULT_RECORD_CUTOFF, ResultEnvelope, TruncationPolicy};

pub const DEFAULT_BASE_URL: &str = "http://v3.boldsystems.org/index.php/API_Public";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-only settings shared by every fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub record_cutoff: usize,
}

impl FetchConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
            record_cutoff: DEFAULT_RECORD_CUTOFF,
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_record_cutoff(mut self, record_cutoff: usize) -> Self {
        self.record_cutoff = record_cutoff;
        self
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Coarse failure class reported alongside a fetch error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Transport,
    HttpStatus,
}

#[derive(Debug)]
pub enum FetchError {
    Parse(ParseError),
    Timeout { after: Duration },
    Transport(String),
    HttpStatus { status: u16 },
}

impl FetchError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(_) => ErrorKind::Validation,
            Self::Timeout { .. } | Self::Transport(_) => ErrorKind::Transport,
            Self::HttpStatus { .. } => ErrorKind::HttpStatus,
        }
    }

    fn from_reqwest(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout { after: timeout }
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Timeout { after } => write!(
                f,
                "request timed out after {}s, likely need to narrow search to fewer specimens",
                after.as_secs_f64()
            ),
            Self::Transport(message) => write!(f, "HTTP request error occurred: {message}"),
            Self::HttpStatus { status } => write!(f, "HTTP error occurred: {status}"),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ParseError> for FetchError {
    fn from(err: ParseError) -> Self {
        Self::Parse(err)
    }
}

/// JSON body returned in place of a result when a fetch fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorPayload {
    pub message: String,
}

impl From<&FetchError> for ErrorPayload {
    fn from(err: &FetchError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// Outcome of `FetchPipeline::fetch`, serialized as whichever shape it holds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FetchResponse {
    Envelope(ResultEnvelope),
    Error(ErrorPayload),
}

impl FetchResponse {
    #[must_use]
    pub const fn error(&self) -> Option<&ErrorPayload> {
        match self {
            Self::Envelope(_) => None,
            Self::Error(payload) => Some(payload),
        }
    }

    /// Serializes the response to a JSON string.
    ///
    /// # Errors
    /// Returns any `serde_json` serialization error.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Issues BOLD searches and normalizes their results.
#[derive(Debug, Clone)]
pub struct FetchPipeline {
    client: reqwest::Client,
    config: FetchConfig,
    policy: TruncationPolicy,
}

impl FetchPipeline {
    /// Builds a pipeline with its own HTTP client.
    ///
    /// # Errors
    /// Returns `FetchError::Transport` if the HTTP client cannot be built.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("bold-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        let policy = TruncationPolicy::new(config.record_cutoff);
        Ok(Self {
            client,
            config,
            policy,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Full request URL for a search.
    #[must_use]
    pub fn request_url(&self, kind: SearchKind, params: &QueryParameters) -> String {
        format!(
            "{}/{}?{}",
            self.config.base_url.trim_end_matches('/'),
            kind.path_segment(),
            params.query_string()
        )
    }

    /// Runs one search, returning classified failures as errors.
    ///
    /// # Errors
    /// Returns `FetchError::Parse` for an unsupported format or malformed XML,
    /// `FetchError::Timeout`/`FetchError::Transport` when the request fails,
    /// and `FetchError::HttpStatus` for a non-success response.
    pub async fn try_fetch(
        &self,
        kind: SearchKind,
        params: &QueryParameters,
    ) -> Result<ResultEnvelope, FetchError> {
        let format = params.response_format()?;
        let url = self.request_url(kind, params);
        debug!(search = %kind, %url, "fetching BOLD records");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| FetchError::from_reqwest(&err, self.config.timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|err| FetchError::from_reqwest(&err, self.config.timeout))?;
        let parsed = ResponseParser::parse(&body, format)?;
        let envelope = self.policy.apply(parsed);

        info!(
            search = %kind,
            format = format.as_str(),
            records = envelope.data().record_count(),
            truncated = envelope.is_truncated(),
            cutoff = self.policy.cutoff(),
            "fetched BOLD records"
        );
        Ok(envelope)
    }

    /// Runs one search, folding any failure into an `ErrorPayload`.
    pub async fn fetch(&self, kind: SearchKind, params: &QueryParameters) -> FetchResponse {
        match self.try_fetch(kind, params).await {
            Ok(envelope) => FetchResponse::Envelope(envelope),
            Err(err) => {
                warn!(search = %kind, error_kind = ?err.kind(), error = %err, "BOLD fetch failed");
                FetchResponse::Error(ErrorPayload::from(&err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_url_joins_base_and_search_path() {
        let pipeline = FetchPipeline::new(FetchConfig::new("http://localhost:9000/API_Public/"))
            .expect("client builds");
        let params = QueryParameters {
            taxon: "Aves".to_string(),
            ..QueryParameters::default()
        };

        assert_eq!(
            pipeline.request_url(SearchKind::Combined, &params),
            "http://localhost:9000/API_Public/combined?taxon=Aves&format=tsv"
        );
    }

    #[test]
    fn error_messages_classify_failures() {
        let status = FetchError::HttpStatus { status: 503 };
        assert_eq!(status.kind(), ErrorKind::HttpStatus);
        assert_eq!(status.to_string(), "HTTP error occurred: 503");

        let timeout = FetchError::Timeout {
            after: Duration::from_secs(10),
        };
        assert_eq!(timeout.kind(), ErrorKind::Transport);
        assert!(timeout.to_string().contains("narrow search"));

        let parse = FetchError::from(ParseError::UnsupportedFormat("csv".to_string()));
        assert_eq!(parse.kind(), ErrorKind::Validation);
    }

    #[test]
    fn error_payload_serializes_message_only() {
        let response = FetchResponse::Error(ErrorPayload::from(&FetchError::HttpStatus {
            status: 500,
        }));

        assert_eq!(
            response.to_json().expect("serializes"),
            r#"{"message":"HTTP error occurred: 500"}"#
        );
    }
}
