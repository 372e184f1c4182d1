//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Seed the default level from the configuration's `logging_level`
//!
//! # Design Decisions
//! - `RUST_LOG` always wins over the configured level
//! - Levels follow the config file vocabulary: off, trace, debug, info,
//!   warn, error

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// `level` comes from the config file; invalid values fall back to
/// `info`. Calling twice is a no-op error swallowed on purpose so tests
/// can initialize freely.
pub fn init(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(level).into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

fn default_filter(level: &str) -> &str {
    match level {
        "off" | "trace" | "debug" | "info" | "warn" | "error" => level,
        _ => "info",
    }
}
