//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Domain rule matched → routing_rules present?
//!     → selector.rs:
//!         - Priority (smallest priority value among eligible)
//!         - Weighted (uniform split by request seed)
//!         - Performance (lowest probed latency)
//!     → one RoutingLocation, or NoHealthyLocation for an empty list
//! ```
//!
//! # Design Decisions
//! - Selection is stateless and reads an immutable health snapshot
//! - Unhealthy locations are excluded, but every method fails open
//!   rather than rejecting when nothing is eligible

pub mod selector;

pub use selector::{select, NoHealthyLocation};
