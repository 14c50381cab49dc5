//! Attraction store backed by another GemHunter instance's REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use super::{AttractionStore, StorageBackend, StoreError};
use crate::attractions::{Attraction, MarkFound, NewAddedGem};

/// Request timeout for the remote API.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// REST client implementing [`AttractionStore`].
pub struct RemoteStore {
    /// HTTP client
    http: reqwest::Client,
    /// Base URL of the remote instance, without the `/api` suffix
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct AddGemResponse {
    id: i64,
}

impl RemoteStore {
    /// Create a client for the instance at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }
}

#[async_trait]
impl AttractionStore for RemoteStore {
    async fn list_attractions(&self) -> Result<Vec<Attraction>, StoreError> {
        let response = self.http.get(self.url("/attractions")).send().await?;

        if !response.status().is_success() {
            return Err(StoreError::Remote(format!(
                "listing attractions returned status {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    async fn mark_found(&self, id: i64) -> Result<MarkFound, StoreError> {
        let response = self
            .http
            .post(self.url(&format!("/attractions/{id}/found")))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(StoreError::NotFound(id)),
            status => Err(StoreError::Remote(format!(
                "marking attraction {id} found returned status {status}"
            ))),
        }
    }

    async fn insert_added_gem(&self, gem: NewAddedGem) -> Result<i64, StoreError> {
        let response = self
            .http
            .post(self.url("/addedGems"))
            .json(&gem)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::Remote(format!(
                "adding gem returned status {}",
                response.status()
            )));
        }

        let body: AddGemResponse = response.json().await?;
        Ok(body.id)
    }

    fn backend(&self) -> StorageBackend {
        StorageBackend::Remote
    }
}
