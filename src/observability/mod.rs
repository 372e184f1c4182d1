//! Observability subsystem.
//!
//! # Design Decisions
//! - Structured logging via `tracing`; fields over formatted strings
//! - Level seeded from the config file, overridable with `RUST_LOG`

pub mod logging;
