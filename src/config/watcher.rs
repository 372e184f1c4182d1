//! Configuration file watcher for hot reload.

use std::path::Path;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::ProxyConfig;

/// Watch a configuration file and emit validated reloads.
///
/// Only configs that parse and validate are ever sent down the channel;
/// a broken edit leaves the active configuration in force. The returned
/// watcher must be kept alive for events to keep flowing.
pub fn watch(
    path: &Path,
) -> Result<(RecommendedWatcher, mpsc::UnboundedReceiver<ProxyConfig>), notify::Error> {
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let watched = path.to_path_buf();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if !event.kind.is_modify() && !event.kind.is_create() {
                    return;
                }
                tracing::info!("Config file change detected, reloading...");
                match load_config(&watched) {
                    Ok(new_config) => {
                        tracing::info!(
                            domains = new_config.proxy_rules.len(),
                            "Reloaded configuration validated"
                        );
                        let _ = update_tx.send(new_config);
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to reload config: {}. Keeping current configuration.",
                            e
                        );
                    }
                }
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        },
        Config::default().with_poll_interval(Duration::from_secs(2)),
    )?;

    watcher.watch(path, RecursiveMode::NonRecursive)?;
    tracing::info!(path = ?path, "Config watcher started");

    Ok((watcher, update_rx))
}
