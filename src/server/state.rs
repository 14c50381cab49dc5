use std::sync::Arc;

use crate::discovery::{DiscoveryEngine, DiscoveryService};
use crate::itinerary::{FixedLookupSelector, ItinerarySelector};
use crate::storage::AttractionStore;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AttractionStore>,
    pub selector: Arc<dyn ItinerarySelector>,
    pub discovery: DiscoveryService,
    /// Prefix for relative attraction icons
    pub public_base_url: String,
}

impl AppState {
    /// State with the fixed-lookup itinerary selector.
    pub fn new(
        store: Arc<dyn AttractionStore>,
        engine: DiscoveryEngine,
        public_base_url: &str,
    ) -> Self {
        Self {
            discovery: DiscoveryService::new(store.clone(), engine),
            selector: Arc::new(FixedLookupSelector),
            store,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Replace the itinerary selector.
    pub fn with_selector(mut self, selector: Arc<dyn ItinerarySelector>) -> Self {
        self.selector = selector;
        self
    }
}
