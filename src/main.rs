//! Proxy engine daemon.
//!
//! Loads and validates the rule configuration, publishes it as an
//! atomically swappable snapshot, and keeps the health probes and
//! hot-reload watcher running. The transport layer links against the
//! library and calls [`proxy_engine::decide`] per request; this binary
//! owns everything that runs off the request path.

use std::path::PathBuf;
use std::sync::Arc;

use proxy_engine::config::{load_config, watcher, SharedConfig};
use proxy_engine::health::{HealthRegistry, ProbeSet};
use proxy_engine::lifecycle::signals;
use proxy_engine::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path: PathBuf = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "proxy_config.toml".to_string())
        .into();

    // Startup is fail-fast: a config that does not validate never runs.
    let config = load_config(&config_path)?;
    logging::init(config.log_level());

    tracing::info!(
        path = %config_path.display(),
        domains = config.proxy_rules.len(),
        "Configuration loaded"
    );

    let shared = Arc::new(SharedConfig::new(config));
    let registry = Arc::new(HealthRegistry::new());
    let mut probes = ProbeSet::spawn(&shared.snapshot(), registry.clone());

    let (_watcher_handle, mut updates) = watcher::watch(&config_path)?;

    loop {
        tokio::select! {
            Some(new_config) = updates.recv() => {
                apply_reload(&shared, &registry, &mut probes, new_config);
            }
            _ = signals::reload_signal() => {
                match load_config(&config_path) {
                    Ok(new_config) => {
                        apply_reload(&shared, &registry, &mut probes, new_config);
                    }
                    Err(e) => {
                        tracing::error!(
                            "Reload failed: {}. Keeping current configuration.",
                            e
                        );
                    }
                }
            }
            _ = signals::shutdown_signal() => {
                break;
            }
        }
    }

    probes.stop();
    tracing::info!("Shutdown complete");
    Ok(())
}

/// Swap in a validated config and restart the probe generation.
///
/// In-flight requests keep the snapshot they captured; only new requests
/// observe the replacement. Old health keys are dropped because location
/// indices may no longer line up with the new rules.
fn apply_reload(
    shared: &SharedConfig,
    registry: &Arc<HealthRegistry>,
    probes: &mut ProbeSet,
    new_config: proxy_engine::ProxyConfig,
) {
    probes.stop();
    registry.reset();
    shared.replace(new_config);
    *probes = ProbeSet::spawn(&shared.snapshot(), registry.clone());
    tracing::info!("Configuration reload applied");
}
