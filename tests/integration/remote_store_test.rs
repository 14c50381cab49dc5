//! Remote store against a live server on a loopback port.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use gemhunter::server::{api_router, AppState};
use gemhunter::storage::{open_store, EmbeddedStore, RemoteStore, StorageBackend, StorageSettings};
use gemhunter::{
    AttractionStore, DiscoveryEngine, DiscoveryService, NewAddedGem, Position, StoreError,
};

async fn spawn_server() -> SocketAddr {
    let store = Arc::new(EmbeddedStore::in_memory_demo().unwrap());
    let app = api_router(AppState::new(
        store,
        DiscoveryEngine::default(),
        "http://localhost:3001",
    ));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

#[tokio::test]
async fn test_remote_list_and_mark_found() {
    let addr = spawn_server().await;
    let store = RemoteStore::new(&format!("http://{addr}")).unwrap();

    let attractions = store.list_attractions().await.unwrap();
    assert_eq!(attractions.len(), 5);
    assert!(attractions[3].is_gem);
    assert_eq!(attractions[0].icon, "http://localhost:3001/mole_icon.jpg");

    let found = store.mark_found(4).await.unwrap();
    assert!(found.attraction.is_found);
    assert!(found.newly_found);
    assert!(!store.mark_found(4).await.unwrap().newly_found);
    assert!(store.list_attractions().await.unwrap()[3].is_found);

    assert!(matches!(
        store.mark_found(42).await,
        Err(StoreError::NotFound(42))
    ));
}

#[tokio::test]
async fn test_remote_insert_added_gem() {
    let addr = spawn_server().await;
    let store = RemoteStore::new(&format!("http://{addr}/")).unwrap();

    let id = store
        .insert_added_gem(NewAddedGem {
            name: "Courtyard fountain".to_string(),
            image: "data:image/png;base64,iVBORw0KGgo".to_string(),
            lat: 45.0712,
            lon: 7.6851,
            comment: "Behind the gate".to_string(),
        })
        .await
        .unwrap();

    assert!(id > 0);
}

#[tokio::test]
async fn test_discovery_over_remote_backend() {
    let addr = spawn_server().await;
    let settings = StorageSettings {
        backend: StorageBackend::Remote,
        remote_url: format!("http://{addr}"),
        ..Default::default()
    };

    let store = open_store(&settings).unwrap();
    assert_eq!(store.backend(), StorageBackend::Remote);

    let service = DiscoveryService::new(store.clone(), DiscoveryEngine::default());
    let event = service
        .on_position_update(Position::new(45.0650, 7.6950))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(event.attraction.id, 5);
    assert!(store.list_attractions().await.unwrap()[4].is_found);
}

#[tokio::test]
async fn test_unreachable_remote() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = RemoteStore::new(&format!("http://{addr}")).unwrap();
    assert!(matches!(
        store.list_attractions().await,
        Err(StoreError::Remote(_))
    ));
}
