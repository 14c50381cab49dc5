//! Attraction store backed by a local SQLite file.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::OnceCell;

use super::{
    AttractionStore, Database, DatabaseError, StorageBackend, StorageSettings, StoreError,
};
use crate::attractions::{Attraction, MarkFound, NewAddedGem};

/// SQLite-backed store.
///
/// The connection is opened on first use and kept for the lifetime of the
/// store; every call takes the lock for the duration of its statements.
pub struct EmbeddedStore {
    database_path: PathBuf,
    bundled_database: Option<PathBuf>,
    reset_on_start: bool,
    seed_demo_data: bool,
    db: OnceCell<Mutex<Database>>,
}

impl EmbeddedStore {
    /// Create a store that opens its database lazily.
    pub fn new(settings: &StorageSettings) -> Self {
        Self {
            database_path: settings.database_path(),
            bundled_database: settings.bundled_database.clone(),
            reset_on_start: settings.reset_on_start,
            seed_demo_data: settings.seed_demo_data,
            db: OnceCell::new(),
        }
    }

    /// Wrap an already open database.
    pub fn from_database(db: Database) -> Self {
        Self {
            database_path: PathBuf::new(),
            bundled_database: None,
            reset_on_start: false,
            seed_demo_data: false,
            db: OnceCell::new_with(Some(Mutex::new(db))),
        }
    }

    /// In-memory store seeded with the demo attractions (for testing).
    pub fn in_memory_demo() -> Result<Self, StoreError> {
        let db = Database::open_in_memory()?;
        db.seed_demo_attractions()?;
        Ok(Self::from_database(db))
    }

    async fn database(&self) -> Result<MutexGuard<'_, Database>, StoreError> {
        let cell = self
            .db
            .get_or_try_init(|| async { self.open().map(Mutex::new) })
            .await?;

        // A panic mid-statement leaves nothing half-applied in SQLite itself.
        Ok(cell.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }

    fn open(&self) -> Result<Database, StoreError> {
        if let Some(bundle) = &self.bundled_database {
            provision_database(&self.database_path, bundle, self.reset_on_start)?;
        }

        let db = Database::open(&self.database_path)?;
        if self.seed_demo_data {
            db.seed_demo_attractions()?;
        }

        tracing::info!("Attraction database open at {}", self.database_path.display());
        Ok(db)
    }
}

#[async_trait]
impl AttractionStore for EmbeddedStore {
    async fn list_attractions(&self) -> Result<Vec<Attraction>, StoreError> {
        Ok(self.database().await?.list_attractions()?)
    }

    async fn mark_found(&self, id: i64) -> Result<MarkFound, StoreError> {
        self.database()
            .await?
            .mark_attraction_found(id)
            .map_err(|e| match e {
                DatabaseError::NotFound(_) => StoreError::NotFound(id),
                other => other.into(),
            })
    }

    async fn insert_added_gem(&self, gem: NewAddedGem) -> Result<i64, StoreError> {
        Ok(self.database().await?.insert_added_gem(&gem)?)
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::Embedded
    }
}

/// Copy the bundled database into place.
///
/// The copy happens when the working file is missing, or unconditionally when
/// `reset` is set, which discards local progress. Returns whether a copy was made.
pub fn provision_database(working: &Path, bundled: &Path, reset: bool) -> Result<bool, StoreError> {
    if working.exists() && !reset {
        return Ok(false);
    }

    if !bundled.is_file() {
        return Err(StoreError::IoError(format!(
            "bundled database {} not found",
            bundled.display()
        )));
    }

    if let Some(parent) = working.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::IoError(e.to_string()))?;
    }

    if working.exists() {
        tracing::warn!(
            "Resetting {} from bundled database, local progress discarded",
            working.display()
        );
        std::fs::remove_file(working).map_err(|e| StoreError::IoError(e.to_string()))?;
    }

    std::fs::copy(bundled, working).map_err(|e| StoreError::IoError(e.to_string()))?;
    tracing::info!("Copied bundled database {} to {}", bundled.display(), working.display());

    Ok(true)
}
