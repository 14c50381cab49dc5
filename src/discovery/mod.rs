//! Proximity discovery of hidden gems.
//!
//! [`DiscoveryEngine`] is the pure rule: scan the hidden gems in list order and
//! flip the first one within the trigger radius. [`DiscoveryService`] applies
//! the rule against an [`AttractionStore`] and persists the flip; it can be
//! driven one position at a time or as a channel subscription.

pub mod simulation;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::attractions::Attraction;
use crate::geo::Position;
use crate::storage::{AttractionStore, StoreError};

/// Default trigger radius in meters.
pub const DEFAULT_DISCOVERY_RADIUS: f64 = 10.0;

/// A gem transitioned to found.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryEvent {
    /// The attraction, already marked found
    pub attraction: Attraction,
    /// Distance between the user and the gem when triggered
    pub distance_meters: f64,
    /// When discovered
    pub discovered_at: DateTime<Utc>,
}

/// Haversine proximity rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscoveryEngine {
    radius_meters: f64,
}

impl Default for DiscoveryEngine {
    fn default() -> Self {
        Self::new(DEFAULT_DISCOVERY_RADIUS)
    }
}

impl DiscoveryEngine {
    /// Create an engine with the given trigger radius.
    pub fn new(radius_meters: f64) -> Self {
        Self { radius_meters }
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    /// First hidden gem within the radius, without mutating anything.
    ///
    /// Returns the index into `attractions` and the distance.
    pub fn find_candidate(
        &self,
        position: Position,
        attractions: &[Attraction],
    ) -> Option<(usize, f64)> {
        attractions
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_hidden_gem())
            .map(|(index, a)| (index, position.distance_to(&a.position())))
            .find(|(_, distance)| *distance <= self.radius_meters)
    }

    /// Check the user's position and flip at most one gem to found.
    pub fn on_position_update(
        &self,
        position: Position,
        attractions: &mut [Attraction],
    ) -> Option<DiscoveryEvent> {
        let (index, distance) = self.find_candidate(position, attractions)?;
        let attraction = &mut attractions[index];
        attraction.mark_found();

        Some(DiscoveryEvent {
            attraction: attraction.clone(),
            distance_meters: distance,
            discovered_at: Utc::now(),
        })
    }
}

/// Discovery against a store: list, scan, persist.
#[derive(Clone)]
pub struct DiscoveryService {
    store: Arc<dyn AttractionStore>,
    engine: DiscoveryEngine,
}

impl DiscoveryService {
    pub fn new(store: Arc<dyn AttractionStore>, engine: DiscoveryEngine) -> Self {
        Self { store, engine }
    }

    pub fn engine(&self) -> DiscoveryEngine {
        self.engine
    }

    /// Handle one position update.
    ///
    /// The list read and the flag write are separate store calls. When another
    /// update flips the same gem in between, only the one whose write changed
    /// the row gets the event.
    pub async fn on_position_update(
        &self,
        position: Position,
    ) -> Result<Option<DiscoveryEvent>, StoreError> {
        let attractions = self.store.list_attractions().await?;

        let Some((index, distance)) = self.engine.find_candidate(position, &attractions) else {
            return Ok(None);
        };

        let update = self.store.mark_found(attractions[index].id).await?;
        if !update.newly_found {
            tracing::debug!("Gem {} already found by another update", update.attraction.id);
            return Ok(None);
        }

        let attraction = update.attraction;
        tracing::info!(
            "Discovered gem {} ({}) at {:.1} m",
            attraction.id,
            attraction.name,
            distance
        );

        Ok(Some(DiscoveryEvent {
            attraction,
            distance_meters: distance,
            discovered_at: Utc::now(),
        }))
    }

    /// Consume positions until the channel closes, emitting discoveries.
    ///
    /// Store failures are logged and the position is dropped; the loop also
    /// ends when the event receiver goes away.
    pub async fn run(
        self,
        mut positions: mpsc::Receiver<Position>,
        events: mpsc::Sender<DiscoveryEvent>,
    ) {
        while let Some(position) = positions.recv().await {
            match self.on_position_update(position).await {
                Ok(Some(event)) => {
                    if events.send(event).await.is_err() {
                        tracing::debug!("Discovery listener dropped, stopping");
                        break;
                    }
                }
                Ok(None) => {}
                Err(e) => tracing::error!("Discovery failed at {:?}: {}", position, e),
            }
        }
    }

    /// Spawn [`Self::run`] on the tokio runtime.
    pub fn subscribe(
        self,
        buffer: usize,
    ) -> (mpsc::Sender<Position>, mpsc::Receiver<DiscoveryEvent>) {
        let (position_tx, position_rx) = mpsc::channel(buffer);
        let (event_tx, event_rx) = mpsc::channel(buffer);
        tokio::spawn(self.run(position_rx, event_tx));
        (position_tx, event_rx)
    }
}
