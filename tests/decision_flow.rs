//! End-to-end decision tests: TOML config in, verdicts out.

use proxy_engine::config::validate_config;
use proxy_engine::engine::{decide, Decision, RejectReason, RequestContext};
use proxy_engine::health::HealthRegistry;
use proxy_engine::ProxyConfig;

const CONFIG: &str = r#"
    listening_address = "0.0.0.0"
    listening_port_http = 8000

    # Allow-list domain: only /api and /public are reachable.
    [[proxy_rules]]
    domain = "api.example.com"
    rule_type = "Whitelist"
    forward_addr = "10.1.0.10"
    forward_port_http = 3000
    ignore_query_string = true

    [[proxy_rules.path_rules]]
    path = "/api"
    match_type = "StartsWith"
    rule_type = "Whitelist"

    [[proxy_rules.path_rules]]
    path = "/public"
    match_type = "StartsWith"
    rule_type = "Whitelist"

    [[proxy_rules.disallowed_user_agents]]
    user_agent = "BadBot"
    match_type = "Contains"

    # Deny-list domain with multi-backend priority routing.
    [[proxy_rules]]
    domain = "www.example.com"
    rule_type = "Blacklist"
    forward_addr = "10.1.0.20"
    forward_port_http = 3000

    [[proxy_rules.path_rules]]
    path = "/internal"
    match_type = "StartsWith"
    rule_type = "Blacklist"

    [proxy_rules.routing_rules]
    routing_method = "Priority"
    https_only = false
    enable_health_checks = false

    [[proxy_rules.routing_rules.routing_locations]]
    priority = 2
    forward_addr = "b-standby.internal"
    forward_port_http = 8080

    [[proxy_rules.routing_rules.routing_locations]]
    priority = 1
    primary = true
    forward_addr = "b-primary.internal"
    forward_port_http = 8080
"#;

fn load() -> ProxyConfig {
    let config: ProxyConfig = toml::from_str(CONFIG).unwrap();
    validate_config(&config).unwrap();
    config
}

fn request(host: &str, path: &str, user_agent: &str) -> RequestContext {
    RequestContext {
        host: host.to_string(),
        path: path.to_string(),
        query: None,
        user_agent: user_agent.to_string(),
    }
}

#[test]
fn whitelist_domain_allows_listed_paths_only() {
    let config = load();
    let health = HealthRegistry::new().snapshot();

    let allowed = decide(&config, &health, &request("api.example.com", "/api/v1", "curl"));
    assert!(matches!(allowed, Decision::Forward(_)));

    let denied = decide(&config, &health, &request("api.example.com", "/admin", "curl"));
    assert_eq!(denied, Decision::Reject(RejectReason::PathDenied));
}

#[test]
fn blocked_user_agent_rejected_on_allowed_path() {
    let config = load();
    let health = HealthRegistry::new().snapshot();

    let decision = decide(
        &config,
        &health,
        &request("api.example.com", "/api/v1", "BadBot/2.0"),
    );
    assert_eq!(decision, Decision::Reject(RejectReason::BlockedUserAgent));
}

#[test]
fn blacklist_domain_denies_listed_paths_only() {
    let config = load();
    let health = HealthRegistry::new().snapshot();

    let denied = decide(
        &config,
        &health,
        &request("www.example.com", "/internal/secrets", "curl"),
    );
    assert_eq!(denied, Decision::Reject(RejectReason::PathDenied));

    let allowed = decide(&config, &health, &request("www.example.com", "/shop", "curl"));
    match allowed {
        Decision::Forward(forward) => assert_eq!(forward.target.host, "b-primary.internal"),
        other => panic!("expected forward, got {other:?}"),
    }
}

#[test]
fn unknown_host_rejected() {
    let config = load();
    let health = HealthRegistry::new().snapshot();

    let decision = decide(&config, &health, &request("evil.example.net", "/", "curl"));
    assert_eq!(decision, Decision::Reject(RejectReason::UnknownDomain));
}

#[test]
fn host_header_port_is_ignored() {
    let config = load();
    let health = HealthRegistry::new().snapshot();

    let decision = decide(
        &config,
        &health,
        &request("API.example.com:8443", "/public/logo.png", "curl"),
    );
    assert!(matches!(decision, Decision::Forward(_)));
}
