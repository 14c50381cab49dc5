//! Discovery service against a real store, driven directly and through its
//! channel subscription.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use gemhunter::attractions::MarkFound;
use gemhunter::discovery::simulation::{replay, SimulatedWalk};
use gemhunter::storage::{EmbeddedStore, StorageBackend};
use gemhunter::{
    Attraction, AttractionStore, DiscoveryEngine, DiscoveryService, NewAddedGem, Position,
    StoreError,
};

const INNAMORATI: Position = Position {
    lat: 45.0505366,
    lon: 7.6812146,
};

fn demo_store() -> Arc<EmbeddedStore> {
    Arc::new(EmbeddedStore::in_memory_demo().unwrap())
}

/// Serves the list as it was when created, like a read that raced a write.
struct SnapshotStore {
    inner: EmbeddedStore,
    snapshot: Vec<Attraction>,
}

impl SnapshotStore {
    async fn new() -> Self {
        let inner = EmbeddedStore::in_memory_demo().unwrap();
        let snapshot = inner.list_attractions().await.unwrap();
        Self { inner, snapshot }
    }
}

#[async_trait]
impl AttractionStore for SnapshotStore {
    async fn list_attractions(&self) -> Result<Vec<Attraction>, StoreError> {
        Ok(self.snapshot.clone())
    }

    async fn mark_found(&self, id: i64) -> Result<MarkFound, StoreError> {
        self.inner.mark_found(id).await
    }

    async fn insert_added_gem(&self, gem: NewAddedGem) -> Result<i64, StoreError> {
        self.inner.insert_added_gem(gem).await
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::Embedded
    }
}

#[tokio::test]
async fn test_discovery_persists_found_flag() {
    let store = demo_store();
    let service = DiscoveryService::new(store.clone(), DiscoveryEngine::default());

    let event = service.on_position_update(INNAMORATI).await.unwrap().unwrap();
    assert_eq!(event.attraction.id, 4);
    assert!(event.distance_meters < 0.01);

    let stored = store.list_attractions().await.unwrap();
    assert!(stored[3].is_found);
    assert!(!stored[4].is_found);
}

#[tokio::test]
async fn test_found_flag_never_reverts() {
    let store = demo_store();
    let service = DiscoveryService::new(store.clone(), DiscoveryEngine::default());

    service.on_position_update(INNAMORATI).await.unwrap();
    for lat in [45.06, 45.07, 45.0505366] {
        service
            .on_position_update(Position::new(lat, 7.6812146))
            .await
            .unwrap();
        assert!(store.list_attractions().await.unwrap()[3].is_found);
    }

    // Marking again is idempotent
    let again = store.mark_found(4).await.unwrap();
    assert!(again.attraction.is_found);
    assert!(!again.newly_found);
}

#[tokio::test]
async fn test_stale_list_emits_single_event() {
    let store = Arc::new(SnapshotStore::new().await);
    let service = DiscoveryService::new(store, DiscoveryEngine::default());

    // Both updates see the gem as hidden; only the first write flips it
    let first = service.on_position_update(INNAMORATI).await.unwrap();
    let second = service.on_position_update(INNAMORATI).await.unwrap();

    assert_eq!(first.unwrap().attraction.id, 4);
    assert!(second.is_none());
}

#[tokio::test]
async fn test_larger_radius_finds_from_farther() {
    let store = demo_store();
    // ~55 m north of the gem
    let nearby = Position::new(45.0510366, 7.6812146);

    let strict = DiscoveryService::new(store.clone(), DiscoveryEngine::new(10.0));
    assert!(strict.on_position_update(nearby).await.unwrap().is_none());

    let relaxed = DiscoveryService::new(store, DiscoveryEngine::new(100.0));
    assert_eq!(relaxed.engine().radius_meters(), 100.0);
    assert!(relaxed.on_position_update(nearby).await.unwrap().is_some());
}

#[tokio::test]
async fn test_subscription_emits_events() {
    let service = DiscoveryService::new(demo_store(), DiscoveryEngine::default());
    let (positions, mut events) = service.subscribe(8);

    positions.send(Position::new(45.0, 7.0)).await.unwrap();
    positions.send(INNAMORATI).await.unwrap();
    positions.send(INNAMORATI).await.unwrap();
    drop(positions);

    let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.attraction.id, 4);

    // The channel closes once the positions are drained; no second event
    let rest = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .unwrap();
    assert!(rest.is_none());
}

#[tokio::test]
async fn test_replay_through_itinerary() {
    let store = demo_store();
    let service = DiscoveryService::new(store.clone(), DiscoveryEngine::default());

    let attractions = store.list_attractions().await.unwrap();
    let start = Position::new(45.0690, 7.6933);
    let walk = SimulatedWalk::through_itinerary(start, &attractions[3..5], 5.0);

    let report = replay(&service, &walk).await.unwrap();

    let found: Vec<i64> = report.discoveries.iter().map(|e| e.attraction.id).collect();
    assert_eq!(found, vec![4, 5]);
    assert!(report.distance_meters > 1000.0);
    assert!(store
        .list_attractions()
        .await
        .unwrap()
        .iter()
        .all(|a| !a.is_gem || a.is_found));
}
