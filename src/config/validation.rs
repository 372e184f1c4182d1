//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Enforce schema invariants (unique domains, resolvable forward targets)
//! - Validate value ranges (health intervals > 0, parseable IP literals)
//! - Reject configs the engine could not evaluate totally
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before a config is accepted into the system; a failing config
//!   never becomes active (the previous one stays in force on reload)
//! - A duplicate `primary` location is a logged warning, not an error

use std::collections::HashSet;
use std::net::{Ipv4Addr, Ipv6Addr};

use thiserror::Error;

use crate::config::schema::{ProxyConfig, RoutingMethod, RoutingRule};

/// A single semantic problem found in a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("proxy rule {index} has an empty domain")]
    EmptyDomain { index: usize },

    #[error("domain '{domain}' is defined more than once")]
    DuplicateDomain { domain: String },

    #[error("domain '{domain}' has no forward address (addr, ipv4 or ipv6)")]
    MissingForwardTarget { domain: String },

    #[error("domain '{domain}' has no forward port")]
    MissingForwardPort { domain: String },

    #[error("domain '{domain}' path rule {index} has an empty pattern")]
    EmptyPathPattern { domain: String, index: usize },

    #[error("domain '{domain}' user-agent rule {index} has an empty pattern")]
    EmptyUserAgentPattern { domain: String, index: usize },

    #[error("domain '{domain}' has routing rules but no routing locations")]
    EmptyRoutingLocations { domain: String },

    #[error("domain '{domain}' routing location {index} has no forward address")]
    MissingLocationTarget { domain: String, index: usize },

    #[error("domain '{domain}' routing location {index} has no forward port")]
    MissingLocationPort { domain: String, index: usize },

    #[error("domain '{domain}' routing location {index} needs a priority for Priority routing")]
    MissingLocationPriority { domain: String, index: usize },

    #[error("domain '{domain}' enables health checks with a zero interval")]
    InvalidHealthInterval { domain: String },

    #[error("domain '{domain}' enables health checks without a health check path")]
    MissingHealthCheckPath { domain: String },

    #[error("domain '{domain}' uses Performance routing without health checks")]
    PerformanceWithoutHealthChecks { domain: String },

    #[error("listening address '{address}' is not a valid IP address")]
    InvalidListeningAddress { address: String },

    #[error("domain '{domain}' forward_{kind} '{value}' is not a valid address")]
    InvalidForwardAddress {
        domain: String,
        kind: &'static str,
        value: String,
    },
}

/// Validate a parsed configuration.
///
/// Collects every problem rather than stopping at the first so operators
/// can fix a config in one pass.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(address) = &config.listening_address {
        if address.parse::<std::net::IpAddr>().is_err() {
            errors.push(ValidationError::InvalidListeningAddress {
                address: address.clone(),
            });
        }
    }

    let mut seen = HashSet::new();
    for (index, rule) in config.proxy_rules.iter().enumerate() {
        if rule.domain.is_empty() {
            errors.push(ValidationError::EmptyDomain { index });
            continue;
        }
        let key = rule.domain.to_ascii_lowercase();
        if !seen.insert(key) {
            errors.push(ValidationError::DuplicateDomain {
                domain: rule.domain.clone(),
            });
        }

        let domain = &rule.domain;

        let has_addr = [&rule.forward_addr, &rule.forward_ipv4, &rule.forward_ipv6]
            .iter()
            .any(|a| a.as_deref().is_some_and(|s| !s.is_empty()));
        if !has_addr {
            errors.push(ValidationError::MissingForwardTarget {
                domain: domain.clone(),
            });
        } else if rule.forward_port_http.is_none() && rule.forward_port_https.is_none() {
            errors.push(ValidationError::MissingForwardPort {
                domain: domain.clone(),
            });
        }

        if let Some(ipv4) = rule.forward_ipv4.as_deref().filter(|s| !s.is_empty()) {
            if ipv4.parse::<Ipv4Addr>().is_err() {
                errors.push(ValidationError::InvalidForwardAddress {
                    domain: domain.clone(),
                    kind: "ipv4",
                    value: ipv4.to_string(),
                });
            }
        }
        if let Some(ipv6) = rule.forward_ipv6.as_deref().filter(|s| !s.is_empty()) {
            if ipv6.parse::<Ipv6Addr>().is_err() {
                errors.push(ValidationError::InvalidForwardAddress {
                    domain: domain.clone(),
                    kind: "ipv6",
                    value: ipv6.to_string(),
                });
            }
        }

        for (i, path_rule) in rule.path_rules.iter().enumerate() {
            if path_rule.path.is_empty() {
                errors.push(ValidationError::EmptyPathPattern {
                    domain: domain.clone(),
                    index: i,
                });
            }
        }

        for (i, ua_rule) in rule.disallowed_user_agents.iter().enumerate() {
            if ua_rule.user_agent.is_empty() {
                errors.push(ValidationError::EmptyUserAgentPattern {
                    domain: domain.clone(),
                    index: i,
                });
            }
        }

        if let Some(routing) = &rule.routing_rules {
            validate_routing_rule(domain, routing, &mut errors);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_routing_rule(domain: &str, routing: &RoutingRule, errors: &mut Vec<ValidationError>) {
    if routing.routing_locations.is_empty() {
        errors.push(ValidationError::EmptyRoutingLocations {
            domain: domain.to_string(),
        });
        return;
    }

    let mut primaries = 0usize;
    for (index, location) in routing.routing_locations.iter().enumerate() {
        let has_addr = [
            &location.forward_addr,
            &location.forward_ipv4,
            &location.forward_ipv6,
        ]
        .iter()
        .any(|a| a.as_deref().is_some_and(|s| !s.is_empty()));
        if !has_addr {
            errors.push(ValidationError::MissingLocationTarget {
                domain: domain.to_string(),
                index,
            });
        } else if location.forward_port_http.is_none() && location.forward_port_https.is_none() {
            errors.push(ValidationError::MissingLocationPort {
                domain: domain.to_string(),
                index,
            });
        }

        if routing.routing_method == RoutingMethod::Priority && location.priority.is_none() {
            errors.push(ValidationError::MissingLocationPriority {
                domain: domain.to_string(),
                index,
            });
        }

        if location.primary.unwrap_or(false) {
            primaries += 1;
        }
    }

    if primaries > 1 {
        tracing::warn!(
            domain = %domain,
            primaries,
            "routing rule declares more than one primary location"
        );
    }

    if routing.enable_health_checks {
        if routing.health_check_interval == 0 {
            errors.push(ValidationError::InvalidHealthInterval {
                domain: domain.to_string(),
            });
        }
        if routing
            .health_check_path
            .as_deref()
            .map_or(true, |p| p.is_empty())
        {
            errors.push(ValidationError::MissingHealthCheckPath {
                domain: domain.to_string(),
            });
        }
    } else if routing.routing_method == RoutingMethod::Performance {
        errors.push(ValidationError::PerformanceWithoutHealthChecks {
            domain: domain.to_string(),
        });
    }
}
