//! Attraction storage: one entity model behind two backends.
//!
//! [`EmbeddedStore`] keeps attractions in a local SQLite file (provisioned from
//! a bundled copy when one ships with the app); [`RemoteStore`] talks to
//! another GemHunter instance over its REST API. The backend is chosen once at
//! startup by [`open_store`].

pub mod config;
pub mod database;
pub mod embedded;
pub mod remote;
pub mod schema;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::attractions::{Attraction, MarkFound, NewAddedGem};

pub use config::{AppConfig, StorageBackend, StorageSettings};
pub use database::{Database, DatabaseError};
pub use embedded::EmbeddedStore;
pub use remote::RemoteStore;

/// Read and mutate attractions, accept gem submissions.
#[async_trait]
pub trait AttractionStore: Send + Sync {
    /// Every attraction in storage order, unfiltered.
    async fn list_attractions(&self) -> Result<Vec<Attraction>, StoreError>;

    /// Set the found flag of one attraction and return it.
    ///
    /// Idempotent; only the call that flips the flag reports `newly_found`.
    /// Fails with [`StoreError::NotFound`] for an unknown id.
    async fn mark_found(&self, id: i64) -> Result<MarkFound, StoreError>;

    /// Store a gem submission, returning its new id.
    async fn insert_added_gem(&self, gem: NewAddedGem) -> Result<i64, StoreError>;

    /// Which backend this is.
    fn backend(&self) -> StorageBackend;
}

/// Open the backend selected in the settings.
pub fn open_store(settings: &StorageSettings) -> Result<Arc<dyn AttractionStore>, StoreError> {
    let store: Arc<dyn AttractionStore> = match settings.backend {
        StorageBackend::Embedded => Arc::new(EmbeddedStore::new(settings)),
        StorageBackend::Remote => Arc::new(RemoteStore::new(&settings.remote_url)?),
    };

    tracing::info!("Using {} attraction store", store.backend());
    Ok(store)
}

/// Attraction store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Attraction {0} not found")]
    NotFound(i64),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Remote store error: {0}")]
    Remote(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Remote(err.to_string())
    }
}
