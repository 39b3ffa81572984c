//! Shared tracing/logging initialization.
//!
//! The server logs to stdout with optional JSON lines; the CLI writes to
//! stderr so that command output on stdout stays clean.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()))
}

/// Initialise the global tracing subscriber for a long-running service.
///
/// * `default_filter` -- default `RUST_LOG` value when the env-var is not set
///   (e.g. `"dogwalk_server=info"`).
/// * `log_json` -- when `true`, emit structured JSON log lines instead of the
///   human-readable format.
pub fn init_tracing(default_filter: &str, log_json: bool) {
    if log_json {
        tracing_subscriber::registry()
            .with(env_filter(default_filter))
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter(default_filter))
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Initialise the global tracing subscriber for a CLI, writing to stderr.
pub fn init_cli_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
