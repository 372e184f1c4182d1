//! Health snapshot publication.
//!
//! # Responsibilities
//! - Hold the most recently probed liveness/latency state per routing
//!   location
//! - Publish updates atomically: single writer per rule, many readers
//!
//! # Design Decisions
//! - Readers never block writers and vice versa: the snapshot is an
//!   immutable object behind an `ArcSwap`, replaced on every update
//! - A request captures one snapshot reference and keeps it; a probe
//!   result published mid-request is not visible to that request
//! - A location with no recorded probe is Unknown and stays eligible,
//!   so startup never deadlocks with every location looking unhealthy

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;

/// Probed liveness state of one routing location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeState {
    /// No probe result yet; treated as eligible.
    #[default]
    Unknown,
    Healthy,
    Unhealthy,
}

/// Most recent probe result for one routing location.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationHealth {
    pub state: ProbeState,
    /// Round-trip latency of the last successful probe.
    pub last_latency: Option<Duration>,
    pub last_checked: Option<Instant>,
}

impl LocationHealth {
    /// Eligible for selection: Healthy or not yet probed.
    pub fn eligible(&self) -> bool {
        self.state != ProbeState::Unhealthy
    }

    pub fn healthy(latency: Duration) -> Self {
        Self {
            state: ProbeState::Healthy,
            last_latency: Some(latency),
            last_checked: Some(Instant::now()),
        }
    }

    /// An unhealthy result keeps the previously recorded latency; it is
    /// only meaningful again after the next successful probe.
    pub fn unhealthy(previous: Option<LocationHealth>) -> Self {
        Self {
            state: ProbeState::Unhealthy,
            last_latency: previous.and_then(|p| p.last_latency),
            last_checked: Some(Instant::now()),
        }
    }
}

/// Identifies one routing location within a configuration snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocationKey {
    pub domain: String,
    pub index: usize,
}

impl LocationKey {
    pub fn new(domain: impl Into<String>, index: usize) -> Self {
        Self {
            domain: domain.into(),
            index,
        }
    }
}

/// Immutable view of all location health states at one point in time.
#[derive(Debug, Clone, Default)]
pub struct HealthSnapshot {
    entries: HashMap<LocationKey, LocationHealth>,
}

impl HealthSnapshot {
    /// Health of a location, Unknown if never probed.
    pub fn location(&self, domain: &str, index: usize) -> LocationHealth {
        self.entries
            .get(&LocationKey::new(domain, index))
            .copied()
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Shared registry publishing health snapshots to the request path.
#[derive(Debug, Default)]
pub struct HealthRegistry {
    inner: ArcSwap<HealthSnapshot>,
}

impl HealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the current snapshot. Lock-free; call once per request.
    pub fn snapshot(&self) -> Arc<HealthSnapshot> {
        self.inner.load_full()
    }

    /// Publish a probe result. Copy-on-write: concurrent readers keep the
    /// snapshot they already hold.
    pub fn record(&self, key: LocationKey, health: LocationHealth) {
        self.inner.rcu(|current| {
            let mut next = (**current).clone();
            next.entries.insert(key.clone(), health);
            next
        });
    }

    /// Drop all recorded state, e.g. after a configuration reload made the
    /// old keys meaningless.
    pub fn reset(&self) {
        self.inner.store(Arc::new(HealthSnapshot::default()));
    }
}
