use bold_core::fetch::{DEFAULT_BASE_URL, FetchConfig};
use bold_core::truncation::DEFAULT_RECORD_CUTOFF;
use clap::{ArgAction, Parser, builder::BoolishValueParser};
use std::error::Error;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Parser, Debug)]
#[command(
    name = "bold-mcpd",
    version,
    about = "MCP BOLD Server - BOLD specimen search for MCP clients."
)]
struct CliArgs {
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[arg(long, env = "BOLD_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(
        long,
        env = "BOLD_REQUEST_TIMEOUT_SECS",
        default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS
    )]
    request_timeout_secs: u64,

    #[arg(long, env = "BOLD_RECORD_CUTOFF", default_value_t = DEFAULT_RECORD_CUTOFF)]
    record_cutoff: usize,

    /// Serve MCP over streamable HTTP on this address instead of stdio.
    #[arg(long, env = "BOLD_MCP_HTTP_ADDR")]
    mcp_http_addr: Option<SocketAddr>,

    #[arg(
        long,
        env = "BOLD_MCP_STATELESS",
        default_value_t = false,
        value_parser = BoolishValueParser::new()
    )]
    stateless: bool,
}

/// Runtime configuration loaded from CLI arguments and environment variables.
#[derive(Debug, Clone)]
pub struct BoldConfig {
    pub verbosity: u8,
    pub fetch: FetchConfig,
    pub mcp_http_addr: Option<SocketAddr>,
    pub stateless: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidSetting { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSetting { name, value } => {
                write!(f, "invalid {name} value: {value}")
            }
        }
    }
}

impl Error for ConfigError {}

impl BoldConfig {
    pub fn from_args() -> Result<Self, ConfigError> {
        let args = CliArgs::parse();
        Self::try_from(args)
    }
}

impl TryFrom<CliArgs> for BoldConfig {
    type Error = ConfigError;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let base_url = args.base_url.trim().to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidSetting {
                name: "BOLD_API_BASE_URL",
                value: args.base_url,
            });
        }

        if args.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "BOLD_REQUEST_TIMEOUT_SECS",
                value: args.request_timeout_secs.to_string(),
            });
        }

        if args.record_cutoff == 0 {
            return Err(ConfigError::InvalidSetting {
                name: "BOLD_RECORD_CUTOFF",
                value: args.record_cutoff.to_string(),
            });
        }

        let fetch = FetchConfig::new(base_url)
            .with_timeout(Duration::from_secs(args.request_timeout_secs))
            .with_record_cutoff(args.record_cutoff);

        Ok(Self {
            verbosity: args.verbose,
            fetch,
            mcp_http_addr: args.mcp_http_addr,
            stateless: args.stateless,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> CliArgs {
        CliArgs {
            verbose: 0,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            record_cutoff: DEFAULT_RECORD_CUTOFF,
            mcp_http_addr: None,
            stateless: false,
        }
    }

    #[test]
    fn defaults_match_the_public_api() {
        let config = BoldConfig::try_from(base_args()).expect("config should parse");

        assert_eq!(config.fetch, FetchConfig::default());
        assert_eq!(config.fetch.timeout, Duration::from_secs(10));
        assert_eq!(config.fetch.record_cutoff, 2000);
        assert!(config.mcp_http_addr.is_none());
    }

    #[test]
    fn rejects_non_http_base_url() {
        let mut args = base_args();
        args.base_url = "ftp://v3.boldsystems.org".to_string();

        let err = BoldConfig::try_from(args).expect_err("ftp is not an HTTP origin");

        assert_eq!(err.to_string(), "invalid BOLD_API_BASE_URL value: ftp://v3.boldsystems.org");
    }

    #[test]
    fn rejects_zero_timeout_and_cutoff() {
        let mut args = base_args();
        args.request_timeout_secs = 0;
        assert!(BoldConfig::try_from(args).is_err());

        let mut args = base_args();
        args.record_cutoff = 0;
        assert!(BoldConfig::try_from(args).is_err());
    }

    #[test]
    fn counts_verbose_flags() {
        let args = CliArgs::try_parse_from(["bold-mcpd", "-vv", "--record-cutoff", "50"])
            .expect("flags parse");
        let config = BoldConfig::try_from(args).expect("config should parse");

        assert_eq!(config.verbosity, 2);
        assert_eq!(config.fetch.record_cutoff, 50);
    }
}
