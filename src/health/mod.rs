//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! RoutingRule (enable_health_checks = true)
//!     → probe.rs (one periodic task per domain)
//!     → HTTP GET health_check_path per location
//!     → snapshot.rs (atomic snapshot publication)
//!     → routing selector reads the latest snapshot per request
//! ```
//!
//! # Design Decisions
//! - Probes run off the request path; requests read published snapshots
//!   and accept staleness bounded by one probe interval
//! - Snapshot publication is single-writer-per-rule, multi-reader,
//!   without locks on the read path

pub mod probe;
pub mod snapshot;

pub use probe::ProbeSet;
pub use snapshot::{HealthRegistry, HealthSnapshot, LocationHealth, LocationKey, ProbeState};
