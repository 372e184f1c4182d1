//! Shared match-type evaluation.
//!
//! # Responsibilities
//! - Evaluate one subject string against a pattern under a match type
//! - Serve both path rules and user-agent rules
//!
//! # Design Decisions
//! - Case-sensitive; the engine takes strings as given and performs no
//!   normalization (no surprising cross-case matches)
//! - DoesNotContain / DoesNotEqual are exact negations of their positives
//! - No regex to guarantee O(n) matching
//! - Empty patterns are a validation concern, not special-cased here

use crate::config::schema::MatchType;

impl MatchType {
    /// Returns true if `subject` matches `pattern` under this operator.
    pub fn matches(&self, subject: &str, pattern: &str) -> bool {
        match self {
            MatchType::Contains => subject.contains(pattern),
            MatchType::Equals => subject == pattern,
            MatchType::StartsWith => subject.starts_with(pattern),
            MatchType::EndsWith => subject.ends_with(pattern),
            MatchType::DoesNotContain => !subject.contains(pattern),
            MatchType::DoesNotEqual => subject != pattern,
        }
    }
}
