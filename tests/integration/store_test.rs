//! Embedded store provisioning from a bundled database file.

use std::path::Path;

use gemhunter::storage::embedded::provision_database;
use gemhunter::storage::{Database, EmbeddedStore, StorageSettings};
use gemhunter::{AttractionStore, NewAddedGem};

fn write_bundle(path: &Path) {
    let db = Database::open(path).unwrap();
    assert_eq!(db.seed_demo_attractions().unwrap(), 5);
}

fn settings(working: &Path, bundle: &Path, reset: bool) -> StorageSettings {
    StorageSettings {
        database_path: Some(working.to_path_buf()),
        bundled_database: Some(bundle.to_path_buf()),
        reset_on_start: reset,
        seed_demo_data: false,
        ..Default::default()
    }
}

#[test]
fn test_provision_copies_only_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = dir.path().join("bundle.db");
    let working = dir.path().join("nested").join("gem.db");
    write_bundle(&bundle);

    assert!(provision_database(&working, &bundle, false).unwrap());
    assert!(working.exists());
    assert!(!provision_database(&working, &bundle, false).unwrap());
    assert!(provision_database(&working, &bundle, true).unwrap());
}

#[tokio::test]
async fn test_progress_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = dir.path().join("bundle.db");
    let working = dir.path().join("gem.db");
    write_bundle(&bundle);

    {
        let store = EmbeddedStore::new(&settings(&working, &bundle, false));
        store.mark_found(4).await.unwrap();
    }

    let store = EmbeddedStore::new(&settings(&working, &bundle, false));
    let attractions = store.list_attractions().await.unwrap();
    assert_eq!(attractions.len(), 5);
    assert!(attractions[3].is_found);

    // The bundle itself is never written to
    let pristine = Database::open(&bundle).unwrap();
    assert!(!pristine.get_attraction(4).unwrap().unwrap().is_found);
}

#[tokio::test]
async fn test_reset_on_start_discards_progress() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = dir.path().join("bundle.db");
    let working = dir.path().join("gem.db");
    write_bundle(&bundle);

    {
        let store = EmbeddedStore::new(&settings(&working, &bundle, false));
        store.mark_found(5).await.unwrap();
        store
            .insert_added_gem(NewAddedGem {
                name: "Bench".to_string(),
                image: "file:///photos/bench.jpg".to_string(),
                lat: 45.05,
                lon: 7.68,
                comment: "Quiet spot".to_string(),
            })
            .await
            .unwrap();
    }

    let store = EmbeddedStore::new(&settings(&working, &bundle, true));
    let attractions = store.list_attractions().await.unwrap();
    assert!(attractions.iter().all(|a| !a.is_found));
}

#[tokio::test]
async fn test_missing_bundle_fails_on_first_use() {
    let dir = tempfile::tempdir().unwrap();
    let store = EmbeddedStore::new(&settings(
        &dir.path().join("gem.db"),
        &dir.path().join("absent.db"),
        false,
    ));

    assert!(store.list_attractions().await.is_err());
}
