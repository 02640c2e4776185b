use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Maps the `-v` count to a log level: warn, then info, then debug.
pub const fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Installs the stderr subscriber. `RUST_LOG` overrides the verbosity flag.
///
/// Stdout carries the stdio MCP transport, so nothing may log there.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity).as_str().to_ascii_lowercase()));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();

    if let Err(err) = result {
        eprintln!("tracing init skipped: {err}");
    }
}
