//! User-agent filtering.
//!
//! # Responsibilities
//! - Evaluate a request's user-agent string against a domain's
//!   disallowed list
//!
//! # Design Decisions
//! - The list is blacklist-only by construction: any match is an
//!   unconditional reject, there is no per-entry rule type
//! - Pure function of its inputs; no state

use crate::config::schema::DomainRule;

/// Returns true if `user_agent` matches any disallowed entry.
pub fn is_blocked(rule: &DomainRule, user_agent: &str) -> bool {
    rule.disallowed_user_agents
        .iter()
        .any(|entry| entry.match_type.matches(user_agent, &entry.user_agent))
}
