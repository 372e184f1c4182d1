//! Path access-control evaluation.
//!
//! # Responsibilities
//! - Normalize the request path per `ignore_query_string`
//! - Scan path rules in declared order; first match wins
//! - Apply the domain's default policy when nothing matches
//!
//! # Design Decisions
//! - Whitelist mode is an allow-list: deny unless a rule proves the path
//!   safe. Blacklist mode is a deny-list: allow unless a rule proves it
//!   unsafe
//! - Ordered linear scan; no index structures at expected rule counts
//! - Explicit verdict for every input; there is no "no decision" state

use crate::config::schema::{DomainRule, RuleType};

/// Access verdict for a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

/// Decide whether `path` (with optional `query`) is allowed for a domain.
pub fn decide(rule: &DomainRule, path: &str, query: Option<&str>) -> Access {
    let subject = match query {
        Some(q) if !rule.ignore_query_string && !q.is_empty() => format!("{path}?{q}"),
        _ => path.to_string(),
    };

    for path_rule in &rule.path_rules {
        if path_rule.match_type.matches(&subject, &path_rule.path) {
            return match path_rule.rule_type {
                RuleType::Whitelist => Access::Allow,
                RuleType::Blacklist => Access::Deny,
            };
        }
    }

    // Default policy: Whitelist = nothing explicitly allowed, so deny;
    // Blacklist = nothing explicitly blocked, so allow.
    match rule.rule_type {
        RuleType::Whitelist => Access::Deny,
        RuleType::Blacklist => Access::Allow,
    }
}
