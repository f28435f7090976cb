//! `tracing` subscriber setup shared by the binaries.

use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset: the library plus both binaries.
pub const DEFAULT_FILTER: &str = "grok_client=info,grok=info,check_credits=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber. JSON output when `GROK_LOG_JSON` is set.
///
/// Logs go to stderr so they never interleave with answers on stdout.
pub fn init_logging() {
    let json_logging = std::env::var("GROK_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter())
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter())
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}
