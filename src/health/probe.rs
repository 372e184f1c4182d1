//! Active health probing.
//!
//! # Responsibilities
//! - Run one periodic probe task per domain that enables health checks
//! - Record liveness and latency into the shared health registry
//!
//! # Design Decisions
//! - Probe period comes from the rule's `health_check_interval`; the
//!   per-probe timeout is half the period (at least one second) so a hung
//!   backend cannot starve the next round
//! - Probe failures only degrade routing eligibility; they never reach
//!   the request path
//! - Tasks stop after finishing their current round when the shutdown
//!   signal fires, so a snapshot write is never torn

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tokio::time;
use url::Url;

use crate::config::schema::{ProxyConfig, RoutingLocation, RoutingRule};
use crate::health::snapshot::{HealthRegistry, LocationHealth, LocationKey};
use crate::lifecycle::Shutdown;

/// Handle to one generation of probe tasks.
///
/// A configuration reload stops the old generation and spawns a new one
/// against the new snapshot.
pub struct ProbeSet {
    shutdown: Shutdown,
    task_count: usize,
}

impl ProbeSet {
    /// Spawn a probe task for every domain whose routing rule enables
    /// health checks.
    pub fn spawn(config: &ProxyConfig, registry: Arc<HealthRegistry>) -> Self {
        let shutdown = Shutdown::new();
        let mut task_count = 0;

        for rule in &config.proxy_rules {
            let Some(routing) = &rule.routing_rules else {
                continue;
            };
            if !routing.enable_health_checks {
                continue;
            }

            let prober =
                match DomainProber::new(rule.domain.clone(), routing.clone(), registry.clone()) {
                    Ok(prober) => prober,
                    Err(e) => {
                        tracing::error!(
                            domain = %rule.domain,
                            error = %e,
                            "Failed to build health check client; domain will not be probed"
                        );
                        continue;
                    }
                };
            tokio::spawn(prober.run(shutdown.subscribe()));
            task_count += 1;
        }

        if task_count > 0 {
            tracing::info!(tasks = task_count, "Health probes started");
        }

        Self {
            shutdown,
            task_count,
        }
    }

    /// Signal all probe tasks in this generation to stop.
    pub fn stop(&self) {
        self.shutdown.trigger();
    }

    pub fn task_count(&self) -> usize {
        self.task_count
    }
}

/// Periodic prober for one domain's routing locations.
struct DomainProber {
    domain: String,
    routing: RoutingRule,
    registry: Arc<HealthRegistry>,
    client: reqwest::Client,
    timeout: Duration,
}

impl DomainProber {
    fn new(
        domain: String,
        routing: RoutingRule,
        registry: Arc<HealthRegistry>,
    ) -> Result<Self, reqwest::Error> {
        // Validation guarantees interval > 0 when checks are enabled.
        let interval = Duration::from_secs(u64::from(routing.health_check_interval));
        let timeout = (interval / 2).max(Duration::from_secs(1));
        let client = reqwest::Client::builder()
            .user_agent("proxy-engine-health-check")
            .build()?;

        Ok(Self {
            domain,
            routing,
            registry,
            client,
            timeout,
        })
    }

    async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        let interval = Duration::from_secs(u64::from(self.routing.health_check_interval));
        tracing::info!(
            domain = %self.domain,
            interval_secs = interval.as_secs(),
            locations = self.routing.routing_locations.len(),
            "Health prober starting"
        );

        let mut ticker = time::interval(interval);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.probe_round().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!(domain = %self.domain, "Health prober stopping");
                    break;
                }
            }
        }
    }

    async fn probe_round(&self) {
        for (index, location) in self.routing.routing_locations.iter().enumerate() {
            let key = LocationKey::new(self.domain.clone(), index);
            let Some(url) = self.probe_url(location) else {
                tracing::warn!(
                    domain = %self.domain,
                    index,
                    "Routing location has no resolvable probe target"
                );
                continue;
            };

            let started = Instant::now();
            let result = self
                .client
                .get(url.clone())
                .timeout(self.timeout)
                .send()
                .await;

            let health = match result {
                Ok(response) if response.status().is_success() => {
                    LocationHealth::healthy(started.elapsed())
                }
                Ok(response) => {
                    tracing::warn!(
                        domain = %self.domain,
                        url = %url,
                        status = %response.status(),
                        "Health check failed: non-success status"
                    );
                    self.unhealthy(&key)
                }
                Err(e) if e.is_timeout() => {
                    tracing::warn!(domain = %self.domain, url = %url, "Health check failed: timeout");
                    self.unhealthy(&key)
                }
                Err(e) => {
                    tracing::warn!(
                        domain = %self.domain,
                        url = %url,
                        error = %e,
                        "Health check failed: connection error"
                    );
                    self.unhealthy(&key)
                }
            };

            self.registry.record(key, health);
        }
    }

    fn unhealthy(&self, key: &LocationKey) -> LocationHealth {
        let previous = self.registry.snapshot().location(&key.domain, key.index);
        LocationHealth::unhealthy(Some(previous))
    }

    fn probe_url(&self, location: &RoutingLocation) -> Option<Url> {
        let target = location.forward_target()?;
        let https = self.routing.https_only;
        let scheme = if https { "https" } else { "http" };
        let port = target.port(https)?;
        // IPv6 literals need brackets in a URL authority.
        let host = if target.host.contains(':') {
            format!("[{}]", target.host)
        } else {
            target.host.clone()
        };
        let path = self.routing.health_check_path.as_deref().unwrap_or("/");
        Url::parse(&format!("{scheme}://{host}:{port}{path}")).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RoutingMethod;

    fn make_routing(https_only: bool) -> RoutingRule {
        RoutingRule {
            routing_method: RoutingMethod::Priority,
            routing_locations: Vec::new(),
            https_only,
            enable_health_checks: true,
            health_check_interval: 10,
            health_check_path: Some("/healthz".to_string()),
        }
    }

    fn location(host: &str) -> RoutingLocation {
        RoutingLocation {
            primary: None,
            priority: Some(1),
            forward_addr: Some(host.to_string()),
            forward_ipv4: None,
            forward_ipv6: None,
            forward_port_http: Some(8080),
            forward_port_https: Some(8443),
        }
    }

    #[test]
    fn test_probe_url_http() {
        let prober = DomainProber::new(
            "example.com".to_string(),
            make_routing(false),
            Arc::new(HealthRegistry::new()),
        )
        .unwrap();
        assert_eq!(
            prober.probe_url(&location("10.0.0.1")).map(String::from),
            Some("http://10.0.0.1:8080/healthz".to_string())
        );
    }

    #[test]
    fn test_probe_url_https_only() {
        let prober = DomainProber::new(
            "example.com".to_string(),
            make_routing(true),
            Arc::new(HealthRegistry::new()),
        )
        .unwrap();
        assert_eq!(
            prober.probe_url(&location("10.0.0.1")).map(String::from),
            Some("https://10.0.0.1:8443/healthz".to_string())
        );
    }

    #[test]
    fn test_probe_url_brackets_ipv6() {
        let prober = DomainProber::new(
            "example.com".to_string(),
            make_routing(false),
            Arc::new(HealthRegistry::new()),
        )
        .unwrap();
        let mut loc = location("unused");
        loc.forward_addr = None;
        loc.forward_ipv6 = Some("::1".to_string());
        assert_eq!(
            prober.probe_url(&loc).map(String::from),
            Some("http://[::1]:8080/healthz".to_string())
        );
    }

    #[test]
    fn test_probe_timeout_below_interval() {
        let prober = DomainProber::new(
            "example.com".to_string(),
            make_routing(false),
            Arc::new(HealthRegistry::new()),
        )
        .unwrap();
        assert!(prober.timeout < Duration::from_secs(10));
        assert!(prober.timeout >= Duration::from_secs(1));
    }
}
