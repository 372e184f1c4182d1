//! Rule-evaluation and routing-selection engine for the reverse proxy.
//!
//! Given a request (host, path, query, user-agent) and an immutable
//! configuration snapshot, the engine decides whether to allow the
//! request and, for multi-backend domains, which routing location to
//! forward it to. Transport concerns (TLS, byte forwarding, compression,
//! caching, rate limiting) live outside this crate and consume the
//! engine's verdicts.

pub mod config;
pub mod engine;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod settings;

pub use config::{load_config, ProxyConfig, SharedConfig};
pub use engine::{decide, Decision, RejectReason, RequestContext};
pub use health::{HealthRegistry, ProbeSet};
pub use lifecycle::Shutdown;
