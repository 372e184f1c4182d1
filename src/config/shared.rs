//! Atomically swappable configuration handle.
//!
//! # Design Decisions
//! - The active config is an immutable snapshot behind an `ArcSwap`
//! - Readers capture one `Arc` per request and never observe a partial
//!   update; in-flight requests finish against the snapshot they started
//!   with
//! - Reload replaces the whole snapshot, it never mutates in place

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::schema::ProxyConfig;

/// Shared handle to the active configuration snapshot.
#[derive(Debug)]
pub struct SharedConfig {
    inner: ArcSwap<ProxyConfig>,
}

impl SharedConfig {
    pub fn new(config: ProxyConfig) -> Self {
        Self {
            inner: ArcSwap::from_pointee(config),
        }
    }

    /// Capture the current snapshot. Lock-free; call once per request.
    pub fn snapshot(&self) -> Arc<ProxyConfig> {
        self.inner.load_full()
    }

    /// Atomically replace the active snapshot.
    pub fn replace(&self, config: ProxyConfig) {
        self.inner.store(Arc::new(config));
        tracing::info!("Configuration snapshot replaced");
    }
}
