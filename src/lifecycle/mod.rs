//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Validate → Publish snapshot → Spawn probes/watcher
//!
//! Shutdown (shutdown.rs):
//!     Signal received → probe tasks finish their round → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → graceful shutdown
//!     SIGHUP → config reload
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
