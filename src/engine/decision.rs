//! Per-request decision orchestration.
//!
//! # Responsibilities
//! - Domain lookup → user-agent filter → path ACL → routing selection
//! - Produce a total verdict: every request gets Forward or Reject
//!
//! # Design Decisions
//! - Pure computation over two immutable snapshots (config + health);
//!   calling twice with the same inputs yields the same outcome
//! - Rejects are expected, user-visible outcomes, not errors
//! - The user-agent block runs before the path ACL, so a blocked agent
//!   is rejected even on a path that would otherwise be allowed

use std::hash::{DefaultHasher, Hash, Hasher};

use serde::Serialize;

use crate::config::schema::{FeatureFlags, ForwardTarget, ProxyConfig};
use crate::engine::path_acl::{self, Access};
use crate::engine::user_agent;
use crate::health::snapshot::HealthSnapshot;
use crate::routing;

/// The request fields the engine evaluates.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub host: String,
    pub path: String,
    pub query: Option<String>,
    pub user_agent: String,
}

/// Why a request was rejected. Mapped to proxy-level HTTP responses by
/// the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    UnknownDomain,
    BlockedUserAgent,
    PathDenied,
    NoBackendAvailable,
}

/// Resolved forward outcome for the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Forward {
    pub target: ForwardTarget,
    /// Forward over HTTPS only (from the routing rule).
    pub https_only: bool,
    /// Domain toggles the transport layer applies.
    pub features: FeatureFlags,
}

/// Final verdict for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Decision {
    Forward(Forward),
    Reject(RejectReason),
}

/// Evaluate one request against a configuration and health snapshot.
pub fn decide(
    config: &ProxyConfig,
    health: &HealthSnapshot,
    request: &RequestContext,
) -> Decision {
    let Some(rule) = config.domain_rule(&request.host) else {
        return Decision::Reject(RejectReason::UnknownDomain);
    };

    if user_agent::is_blocked(rule, &request.user_agent) {
        tracing::debug!(
            domain = %rule.domain,
            user_agent = %request.user_agent,
            "Request rejected: disallowed user agent"
        );
        return Decision::Reject(RejectReason::BlockedUserAgent);
    }

    if path_acl::decide(rule, &request.path, request.query.as_deref()) == Access::Deny {
        tracing::debug!(
            domain = %rule.domain,
            path = %request.path,
            "Request rejected: path denied"
        );
        return Decision::Reject(RejectReason::PathDenied);
    }

    if let Some(routing_rule) = &rule.routing_rules {
        let seed = request_seed(&request.path);
        return match routing::select(&rule.domain, routing_rule, health, seed) {
            Ok((index, location)) => match location.forward_target() {
                Some(target) => {
                    tracing::trace!(
                        domain = %rule.domain,
                        location = index,
                        target = %target.host,
                        "Routing location selected"
                    );
                    Decision::Forward(Forward {
                        target,
                        https_only: routing_rule.https_only,
                        features: rule.features(),
                    })
                }
                None => Decision::Reject(RejectReason::NoBackendAvailable),
            },
            Err(_) => Decision::Reject(RejectReason::NoBackendAvailable),
        };
    }

    match rule.forward_target() {
        Some(target) => Decision::Forward(Forward {
            target,
            https_only: false,
            features: rule.features(),
        }),
        // Unreachable for a validated config; stay total anyway.
        None => Decision::Reject(RejectReason::NoBackendAvailable),
    }
}

/// Stable per-request seed for Weighted routing.
fn request_seed(path: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    path.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{
        MatchType, PathRule, RoutingLocation, RoutingMethod, RoutingRule, RuleType, UserAgentRule,
    };
    use crate::config::test_support::minimal_rule;
    use crate::health::snapshot::{HealthRegistry, LocationHealth, LocationKey};

    fn request(host: &str, path: &str) -> RequestContext {
        RequestContext {
            host: host.to_string(),
            path: path.to_string(),
            query: None,
            user_agent: "Mozilla/5.0".to_string(),
        }
    }

    fn config_with(rules: Vec<crate::config::schema::DomainRule>) -> ProxyConfig {
        ProxyConfig {
            proxy_rules: rules,
            ..Default::default()
        }
    }

    fn empty_health() -> std::sync::Arc<HealthSnapshot> {
        HealthRegistry::new().snapshot()
    }

    #[test]
    fn test_unknown_domain_rejected() {
        let config = config_with(vec![minimal_rule("example.com")]);
        let decision = decide(&config, &empty_health(), &request("other.com", "/"));
        assert_eq!(decision, Decision::Reject(RejectReason::UnknownDomain));
    }

    #[test]
    fn test_single_backend_forward() {
        let config = config_with(vec![minimal_rule("example.com")]);
        let decision = decide(&config, &empty_health(), &request("example.com", "/"));
        match decision {
            Decision::Forward(forward) => {
                assert_eq!(forward.target.host, "backend.internal");
                assert_eq!(forward.target.http_port, Some(8080));
                assert!(!forward.https_only);
            }
            other => panic!("expected forward, got {other:?}"),
        }
    }

    #[test]
    fn test_user_agent_block_beats_path_allow() {
        let mut rule = minimal_rule("example.com");
        rule.rule_type = RuleType::Whitelist;
        rule.path_rules = vec![PathRule {
            max_age_seconds: 0,
            path: "/open".to_string(),
            match_type: MatchType::StartsWith,
            rule_type: RuleType::Whitelist,
        }];
        rule.disallowed_user_agents = vec![UserAgentRule {
            user_agent: "Mozilla".to_string(),
            match_type: MatchType::Contains,
        }];
        let config = config_with(vec![rule]);

        let decision = decide(&config, &empty_health(), &request("example.com", "/open"));
        assert_eq!(decision, Decision::Reject(RejectReason::BlockedUserAgent));
    }

    #[test]
    fn test_path_denied() {
        let mut rule = minimal_rule("example.com");
        rule.rule_type = RuleType::Whitelist;
        let config = config_with(vec![rule]);
        let decision = decide(&config, &empty_health(), &request("example.com", "/x"));
        assert_eq!(decision, Decision::Reject(RejectReason::PathDenied));
    }

    #[test]
    fn test_routing_rule_selects_location() {
        let mut rule = minimal_rule("example.com");
        rule.routing_rules = Some(RoutingRule {
            routing_method: RoutingMethod::Priority,
            routing_locations: vec![
                RoutingLocation {
                    primary: None,
                    priority: Some(2),
                    forward_addr: Some("b1.internal".to_string()),
                    forward_ipv4: None,
                    forward_ipv6: None,
                    forward_port_http: Some(8081),
                    forward_port_https: None,
                },
                RoutingLocation {
                    primary: Some(true),
                    priority: Some(1),
                    forward_addr: Some("b2.internal".to_string()),
                    forward_ipv4: None,
                    forward_ipv6: None,
                    forward_port_http: Some(8082),
                    forward_port_https: None,
                },
            ],
            https_only: true,
            enable_health_checks: false,
            health_check_interval: 0,
            health_check_path: None,
        });
        let config = config_with(vec![rule]);

        let decision = decide(&config, &empty_health(), &request("example.com", "/"));
        match decision {
            Decision::Forward(forward) => {
                assert_eq!(forward.target.host, "b2.internal");
                assert!(forward.https_only);
            }
            other => panic!("expected forward, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_routing_locations_rejects() {
        let mut rule = minimal_rule("example.com");
        rule.routing_rules = Some(RoutingRule {
            routing_method: RoutingMethod::Priority,
            routing_locations: Vec::new(),
            https_only: false,
            enable_health_checks: false,
            health_check_interval: 0,
            health_check_path: None,
        });
        let config = config_with(vec![rule]);
        let decision = decide(&config, &empty_health(), &request("example.com", "/"));
        assert_eq!(decision, Decision::Reject(RejectReason::NoBackendAvailable));
    }

    #[test]
    fn test_decide_is_idempotent() {
        let mut rule = minimal_rule("example.com");
        rule.routing_rules = Some(RoutingRule {
            routing_method: RoutingMethod::Weighted,
            routing_locations: (0..3)
                .map(|i| RoutingLocation {
                    primary: None,
                    priority: None,
                    forward_addr: Some(format!("b{i}.internal")),
                    forward_ipv4: None,
                    forward_ipv6: None,
                    forward_port_http: Some(8080),
                    forward_port_https: None,
                })
                .collect(),
            https_only: false,
            enable_health_checks: false,
            health_check_interval: 0,
            health_check_path: None,
        });
        let config = config_with(vec![rule]);
        let health = empty_health();
        let req = request("example.com", "/some/path");

        let first = decide(&config, &health, &req);
        let second = decide(&config, &health, &req);
        assert_eq!(first, second);
    }

    #[test]
    fn test_unhealthy_location_skipped_via_snapshot() {
        let mut rule = minimal_rule("example.com");
        rule.routing_rules = Some(RoutingRule {
            routing_method: RoutingMethod::Priority,
            routing_locations: vec![
                RoutingLocation {
                    primary: None,
                    priority: Some(1),
                    forward_addr: Some("primary.internal".to_string()),
                    forward_ipv4: None,
                    forward_ipv6: None,
                    forward_port_http: Some(8080),
                    forward_port_https: None,
                },
                RoutingLocation {
                    primary: None,
                    priority: Some(2),
                    forward_addr: Some("fallback.internal".to_string()),
                    forward_ipv4: None,
                    forward_ipv6: None,
                    forward_port_http: Some(8080),
                    forward_port_https: None,
                },
            ],
            https_only: false,
            enable_health_checks: true,
            health_check_interval: 5,
            health_check_path: Some("/healthz".to_string()),
        });
        let config = config_with(vec![rule]);

        let registry = HealthRegistry::new();
        registry.record(
            LocationKey::new("example.com", 0),
            LocationHealth::unhealthy(None),
        );

        let decision = decide(&config, &registry.snapshot(), &request("example.com", "/"));
        match decision {
            Decision::Forward(forward) => assert_eq!(forward.target.host, "fallback.internal"),
            other => panic!("expected forward, got {other:?}"),
        }
    }
}
