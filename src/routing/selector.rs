//! Backend location selection.
//!
//! # Responsibilities
//! - Pick exactly one routing location for a multi-backend domain
//! - Apply the rule's routing method against the current health snapshot
//!
//! # Design Decisions
//! - Eligible = Healthy or Unknown; a location is only skipped once a
//!   probe has actually marked it Unhealthy
//! - Every method fails open: when no location is eligible the least-bad
//!   candidate is still returned, preferring degraded service over a
//!   total outage. `NoHealthyLocation` is only reachable with an empty
//!   location list, which validation rejects up front
//! - The schema carries no per-location weight, so Weighted is a uniform
//!   split: the caller supplies a stable per-request seed and the
//!   selector indexes eligible locations with it. Deterministic for one
//!   (snapshot, request) pair, spread across requests
//! - Pure function of its inputs; selection never mutates state

use thiserror::Error;

use crate::config::schema::{RoutingLocation, RoutingMethod, RoutingRule};
use crate::health::snapshot::HealthSnapshot;

/// No candidate could be produced (empty location list).
#[derive(Debug, Error, PartialEq, Eq)]
#[error("routing rule has no locations to select from")]
pub struct NoHealthyLocation;

/// Select one location for `domain` under `rule`.
///
/// `seed` is a stable hash of the request (the decision engine derives it
/// from the path) and only influences Weighted selection.
pub fn select<'a>(
    domain: &str,
    rule: &'a RoutingRule,
    snapshot: &HealthSnapshot,
    seed: u64,
) -> Result<(usize, &'a RoutingLocation), NoHealthyLocation> {
    let locations = &rule.routing_locations;
    if locations.is_empty() {
        return Err(NoHealthyLocation);
    }

    let eligible: Vec<usize> = (0..locations.len())
        .filter(|&i| snapshot.location(domain, i).eligible())
        .collect();

    let index = match rule.routing_method {
        RoutingMethod::Priority => select_priority(locations, &eligible),
        RoutingMethod::Weighted => select_weighted(locations.len(), &eligible, seed),
        RoutingMethod::Performance => select_performance(domain, snapshot, locations, &eligible),
    };

    Ok((index, &locations[index]))
}

/// Smallest priority value wins; ties break by declaration order. With no
/// eligible location, fall open to the most preferred location overall.
fn select_priority(locations: &[RoutingLocation], eligible: &[usize]) -> usize {
    let rank = |i: usize| (locations[i].priority.unwrap_or(u16::MAX), i);
    eligible
        .iter()
        .copied()
        .min_by_key(|&i| rank(i))
        .or_else(|| (0..locations.len()).min_by_key(|&i| rank(i)))
        .unwrap_or(0)
}

/// Uniform split over eligible locations, indexed by the request seed.
fn select_weighted(total: usize, eligible: &[usize], seed: u64) -> usize {
    if eligible.is_empty() {
        (seed % total as u64) as usize
    } else {
        eligible[(seed % eligible.len() as u64) as usize]
    }
}

/// Lowest recorded latency among eligible locations; declaration order
/// until probes populate latency data.
fn select_performance(
    domain: &str,
    snapshot: &HealthSnapshot,
    locations: &[RoutingLocation],
    eligible: &[usize],
) -> usize {
    let fastest = eligible
        .iter()
        .copied()
        .filter_map(|i| {
            snapshot
                .location(domain, i)
                .last_latency
                .map(|latency| (latency, i))
        })
        .min();

    if let Some((_, i)) = fastest {
        return i;
    }

    // No latency recorded yet: first eligible in declaration order, or
    // fail open to the first location.
    eligible.first().copied().unwrap_or(0)
}
