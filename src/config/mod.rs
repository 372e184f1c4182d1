//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! proxy_config.toml
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → shared.rs (ArcSwap snapshot handle)
//!
//! On reload signal:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap of Arc<ProxyConfig>
//!     → requests in flight keep their old snapshot
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - Validation separates syntactic (serde) from semantic checks
//! - A config that fails validation never becomes active

pub mod loader;
pub mod schema;
pub mod shared;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use schema::{
    DomainRule, ForwardTarget, MatchType, PathRule, ProxyConfig, RoutingLocation, RoutingMethod,
    RoutingRule, RuleType, UserAgentRule,
};
pub use shared::SharedConfig;
pub use validation::{validate_config, ValidationError};
