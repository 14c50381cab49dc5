//! Simulated hunt: walk a path and feed every step through discovery.
//!
//! Used for demos without moving, and to exercise discovery end to end.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{DiscoveryEngine, DiscoveryEvent, DiscoveryService};
use crate::attractions::Attraction;
use crate::geo::Position;
use crate::storage::StoreError;

/// Default distance between two simulated position updates.
pub const DEFAULT_STEP_METERS: f64 = 5.0;

/// Smallest step accepted, to bound the number of generated positions.
const MIN_STEP_METERS: f64 = 0.5;

/// Upper bound on sampled positions; each one is a full discovery pass.
pub const MAX_WALK_POSITIONS: usize = 10_000;

/// A walk that cannot be replayed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WalkError {
    #[error("At least one waypoint is required")]
    NoWaypoints,

    #[error("Walk samples {positions} positions, at most {max} are allowed")]
    TooManyPositions { positions: usize, max: usize },
}

/// A path through waypoints, sampled at a fixed step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedWalk {
    /// Ordered points to walk through
    pub waypoints: Vec<Position>,
    /// Distance between samples in meters
    #[serde(default = "default_step")]
    pub step_meters: f64,
}

fn default_step() -> f64 {
    DEFAULT_STEP_METERS
}

impl SimulatedWalk {
    pub fn new(waypoints: Vec<Position>, step_meters: f64) -> Self {
        Self {
            waypoints,
            step_meters,
        }
    }

    /// Walk from `start` through each stop of an itinerary.
    pub fn through_itinerary(start: Position, itinerary: &[Attraction], step_meters: f64) -> Self {
        let waypoints = std::iter::once(start)
            .chain(itinerary.iter().map(Attraction::position))
            .collect();
        Self::new(waypoints, step_meters)
    }

    fn step(&self) -> f64 {
        if self.step_meters.is_finite() {
            self.step_meters.max(MIN_STEP_METERS)
        } else {
            DEFAULT_STEP_METERS
        }
    }

    /// Total path length in meters.
    pub fn total_distance(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|pair| pair[0].distance_to(&pair[1]))
            .sum()
    }

    fn segment_samples(from: &Position, to: &Position, step: f64) -> usize {
        ((from.distance_to(to) / step).ceil() as usize).max(1)
    }

    /// Number of positions [`Self::positions`] would produce, without building them.
    pub fn position_count(&self) -> usize {
        if self.waypoints.is_empty() {
            return 0;
        }

        let step = self.step();
        self.waypoints
            .windows(2)
            .map(|pair| Self::segment_samples(&pair[0], &pair[1], step))
            .fold(1, usize::saturating_add)
    }

    /// Reject empty walks and walks sampling more than [`MAX_WALK_POSITIONS`].
    pub fn validate(&self) -> Result<(), WalkError> {
        if self.waypoints.is_empty() {
            return Err(WalkError::NoWaypoints);
        }

        let positions = self.position_count();
        if positions > MAX_WALK_POSITIONS {
            return Err(WalkError::TooManyPositions {
                positions,
                max: MAX_WALK_POSITIONS,
            });
        }

        Ok(())
    }

    /// Sampled positions, starting at the first waypoint and ending exactly on the last.
    pub fn positions(&self) -> Vec<Position> {
        let Some(last) = self.waypoints.last() else {
            return Vec::new();
        };

        let step = self.step();
        let mut positions = Vec::new();

        for pair in self.waypoints.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let samples = Self::segment_samples(&from, &to, step);
            positions.extend((0..samples).map(|i| from.lerp(&to, i as f64 / samples as f64)));
        }

        positions.push(*last);
        positions
    }
}

/// Outcome of a simulated hunt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HuntReport {
    /// Position updates fed to discovery
    pub steps: usize,
    /// Path length in meters
    pub distance_meters: f64,
    /// Gems found, in order
    pub discoveries: Vec<DiscoveryEvent>,
}

/// Replay a walk against the store, persisting every discovery.
///
/// Callers taking walks from outside should [`SimulatedWalk::validate`] first.
pub async fn replay(
    service: &DiscoveryService,
    walk: &SimulatedWalk,
) -> Result<HuntReport, StoreError> {
    let positions = walk.positions();
    let mut discoveries = Vec::new();

    for position in &positions {
        if let Some(event) = service.on_position_update(*position).await? {
            discoveries.push(event);
        }
    }

    Ok(HuntReport {
        steps: positions.len(),
        distance_meters: walk.total_distance(),
        discoveries,
    })
}

/// Replay a walk over an in-memory list.
pub fn replay_offline(
    engine: &DiscoveryEngine,
    walk: &SimulatedWalk,
    attractions: &mut [Attraction],
) -> HuntReport {
    let positions = walk.positions();
    let discoveries = positions
        .iter()
        .filter_map(|position| engine.on_position_update(*position, attractions))
        .collect();

    HuntReport {
        steps: positions.len(),
        distance_meters: walk.total_distance(),
        discoveries,
    }
}
