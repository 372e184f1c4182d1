//! Configuration schema definitions.
//!
//! This module defines the complete rule schema the engine interprets.
//! All types derive Serde traits for deserialization from config files.
//! Field names follow the on-disk `proxy_config.toml` format; the loader
//! validates a parsed config before it is ever visible to the engine.

use serde::{Deserialize, Serialize};

/// Root configuration: global proxy settings plus per-domain rules.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listening address for the proxy transport (e.g., "0.0.0.0").
    pub listening_address: Option<String>,

    /// HTTP listening port (default 80).
    pub listening_port_http: Option<u16>,

    /// HTTPS listening port (default 443).
    pub listening_port_https: Option<u16>,

    /// Log level (off, trace, debug, info, warn, error).
    pub logging_level: Option<String>,

    /// Enable response caching in the transport layer.
    pub add_caching: Option<bool>,

    /// Enable rate limiting in the transport layer.
    pub add_rate_limiting: Option<bool>,

    /// Enable access logging in the transport layer.
    pub add_logging: Option<bool>,

    /// Enable SQL injection heuristics in the transport layer.
    pub add_sql_injection_protection: Option<bool>,

    /// Enable response compression in the transport layer.
    pub enable_compression: Option<bool>,

    /// Compression tuning flags, passed through verbatim.
    pub compression_flags: Option<String>,

    /// Remove the default request body size limit.
    pub disable_default_body_limit: Option<bool>,

    /// Socket receive buffer size in bytes.
    pub recv_buffer_size: Option<usize>,

    /// Socket send buffer size in bytes.
    pub send_buffer_size: Option<usize>,

    /// IP TTL for outbound sockets.
    pub ip_ttl: Option<u32>,

    /// TCP keep-alive period in seconds.
    pub tcp_keep_alive_seconds: Option<u64>,

    /// Listener backlog size.
    pub max_backlog: Option<i32>,

    /// Upstream request timeout in seconds.
    pub proxy_timeout: Option<u16>,

    /// Per-domain access-control and routing rules.
    pub proxy_rules: Vec<DomainRule>,
}

impl ProxyConfig {
    /// Look up the rule for a request host.
    ///
    /// Matching is case-insensitive and ignores any `:port` suffix the
    /// Host header may carry.
    pub fn domain_rule(&self, host: &str) -> Option<&DomainRule> {
        let host = match host.rsplit_once(':') {
            Some((h, p)) if !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()) => h,
            _ => host,
        };
        self.proxy_rules
            .iter()
            .find(|r| r.domain.eq_ignore_ascii_case(host))
    }

    /// Effective log level, defaulting to the build profile's level.
    pub fn log_level(&self) -> &str {
        match self.logging_level.as_deref() {
            Some(level) => level,
            None if cfg!(debug_assertions) => "debug",
            None => "error",
        }
    }
}

/// Per-domain rule: default policy, path rules, user-agent filters,
/// forward target and optional multi-location routing.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DomainRule {
    /// Host this rule applies to (exact, case-insensitive).
    pub domain: String,

    /// Cache max-age hint for the transport layer.
    #[serde(default)]
    pub max_age_seconds: u64,

    /// Path prefixes this domain accepts administratively (routing scope).
    /// Distinct from `path_rules`, which carry access-control verdicts.
    pub paths: Option<Vec<String>>,

    /// Forward hostname (takes precedence over the IP literals).
    pub forward_addr: Option<String>,

    /// Forward IPv4 literal.
    pub forward_ipv4: Option<String>,

    /// Forward IPv6 literal.
    pub forward_ipv6: Option<String>,

    /// Forward HTTP port.
    pub forward_port_http: Option<u16>,

    /// Forward HTTPS port.
    pub forward_port_https: Option<u16>,

    /// Default policy when no path rule matches:
    /// Whitelist = deny unless allowed, Blacklist = allow unless denied.
    pub rule_type: RuleType,

    /// Ordered access-control rules; the first match wins.
    #[serde(default)]
    pub path_rules: Vec<PathRule>,

    /// Multi-backend routing policy; absent for single-backend domains.
    pub routing_rules: Option<RoutingRule>,

    /// Strip the query string before path rule evaluation.
    #[serde(default)]
    pub ignore_query_string: bool,

    /// User agents rejected unconditionally on match.
    #[serde(default)]
    pub disallowed_user_agents: Vec<UserAgentRule>,

    #[serde(default)]
    pub enable_logging: bool,

    #[serde(default)]
    pub enable_sql_injection_protection: bool,

    #[serde(default)]
    pub enable_compression: bool,

    pub compression_flags: Option<String>,

    #[serde(default)]
    pub enable_minification: bool,

    pub minification_flags: Option<String>,

    #[serde(default)]
    pub enable_webp_transformation: bool,

    pub webp_transformation_min_age: Option<u64>,
}

impl DomainRule {
    /// Resolve the domain's own forward target.
    ///
    /// Address precedence: `forward_addr`, then `forward_ipv4`, then
    /// `forward_ipv6`. Validation guarantees at least one form and one
    /// port exist in an active configuration.
    pub fn forward_target(&self) -> Option<ForwardTarget> {
        resolve_target(
            self.forward_addr.as_deref(),
            self.forward_ipv4.as_deref(),
            self.forward_ipv6.as_deref(),
            self.forward_port_http,
            self.forward_port_https,
        )
    }

    /// Feature toggles the transport layer applies to forwarded requests.
    pub fn features(&self) -> FeatureFlags {
        FeatureFlags {
            enable_logging: self.enable_logging,
            enable_compression: self.enable_compression,
            compression_flags: self.compression_flags.clone(),
            enable_sql_injection_protection: self.enable_sql_injection_protection,
            max_age_seconds: self.max_age_seconds,
            enable_minification: self.enable_minification,
            minification_flags: self.minification_flags.clone(),
            enable_webp_transformation: self.enable_webp_transformation,
            webp_transformation_min_age: self.webp_transformation_min_age,
        }
    }
}

/// Verdict semantics for a rule.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub enum RuleType {
    Whitelist,
    Blacklist,
}

/// String comparison operator for path and user-agent matching.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub enum MatchType {
    Contains,
    Equals,
    StartsWith,
    EndsWith,
    DoesNotContain,
    DoesNotEqual,
}

/// Backend selection policy for multi-location domains.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
pub enum RoutingMethod {
    Weighted,
    #[default]
    Priority,
    Performance,
}

/// Ordered access-control rule for a request path.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct PathRule {
    /// Cache max-age hint for responses matched by this rule.
    #[serde(default)]
    pub max_age_seconds: u64,

    /// Pattern compared against the request path.
    pub path: String,

    pub match_type: MatchType,

    /// Verdict when this rule matches.
    pub rule_type: RuleType,
}

/// Multi-backend routing policy.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RoutingRule {
    pub routing_method: RoutingMethod,

    /// Candidate backends, in declaration order. Must be non-empty.
    pub routing_locations: Vec<RoutingLocation>,

    /// Forward over HTTPS only.
    #[serde(default)]
    pub https_only: bool,

    #[serde(default)]
    pub enable_health_checks: bool,

    /// Probe period in seconds; must be > 0 when checks are enabled.
    #[serde(default)]
    pub health_check_interval: u32,

    /// Probe path; required when checks are enabled.
    pub health_check_path: Option<String>,
}

/// One candidate backend within a routing rule.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RoutingLocation {
    /// At most one location per rule should be primary; a second one is
    /// reported as a validation warning.
    pub primary: Option<bool>,

    /// Lower value = preferred. Required for the Priority method.
    pub priority: Option<u16>,

    pub forward_addr: Option<String>,
    pub forward_ipv4: Option<String>,
    pub forward_ipv6: Option<String>,
    pub forward_port_http: Option<u16>,
    pub forward_port_https: Option<u16>,
}

impl RoutingLocation {
    /// Resolve this location's forward target (same precedence as
    /// [`DomainRule::forward_target`]).
    pub fn forward_target(&self) -> Option<ForwardTarget> {
        resolve_target(
            self.forward_addr.as_deref(),
            self.forward_ipv4.as_deref(),
            self.forward_ipv6.as_deref(),
            self.forward_port_http,
            self.forward_port_https,
        )
    }
}

/// User-agent filter entry. Blacklist-only: any match rejects the request.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct UserAgentRule {
    pub user_agent: String,
    pub match_type: MatchType,
}

/// Resolved forward target: one host form plus the configured ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForwardTarget {
    pub host: String,
    pub http_port: Option<u16>,
    pub https_port: Option<u16>,
}

impl ForwardTarget {
    /// Port for the requested scheme, falling back to the other scheme's
    /// port when only one is configured.
    pub fn port(&self, https: bool) -> Option<u16> {
        if https {
            self.https_port.or(self.http_port)
        } else {
            self.http_port.or(self.https_port)
        }
    }
}

/// Per-domain toggles carried through to the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    pub enable_logging: bool,
    pub enable_compression: bool,
    pub compression_flags: Option<String>,
    pub enable_sql_injection_protection: bool,
    pub max_age_seconds: u64,
    pub enable_minification: bool,
    pub minification_flags: Option<String>,
    pub enable_webp_transformation: bool,
    pub webp_transformation_min_age: Option<u64>,
}

fn resolve_target(
    addr: Option<&str>,
    ipv4: Option<&str>,
    ipv6: Option<&str>,
    http_port: Option<u16>,
    https_port: Option<u16>,
) -> Option<ForwardTarget> {
    let host = [addr, ipv4, ipv6].into_iter().flatten().find(|h| !h.is_empty())?;
    if http_port.is_none() && https_port.is_none() {
        return None;
    }
    Some(ForwardTarget {
        host: host.to_string(),
        http_port,
        https_port,
    })
}
