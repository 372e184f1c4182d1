//! Request decision engine.
//!
//! # Data Flow
//! ```text
//! RequestContext (host, path, query, user-agent)
//!     → decision.rs:
//!         1. domain lookup        → Reject(UnknownDomain)
//!         2. user_agent.rs filter → Reject(BlockedUserAgent)
//!         3. path_acl.rs verdict  → Reject(PathDenied)
//!         4. routing selection    → Reject(NoBackendAvailable)
//!     → Forward(target, flags) for the transport layer
//! ```
//!
//! # Design Decisions
//! - Total: every input reaches a verdict
//! - Pure and non-blocking; evaluates immutable snapshots only
//! - matcher.rs is the single string-comparison primitive shared by
//!   path and user-agent rules

pub mod decision;
pub mod matcher;
pub mod path_acl;
pub mod user_agent;

pub use decision::{decide, Decision, Forward, RejectReason, RequestContext};
pub use path_acl::Access;
