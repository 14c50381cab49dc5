//! GemHunter - Location-based scavenger hunt backend
//!
//! Serves a fixed set of city attractions (monuments and hidden gems), flips
//! gems to found when the user walks within the discovery radius, accepts
//! user-submitted gems and hands out short fixed itineraries.

pub mod attractions;
pub mod discovery;
pub mod geo;
pub mod itinerary;
pub mod server;
pub mod storage;

// Re-export commonly used types
pub use attractions::{AddedGem, Attraction, NewAddedGem};
pub use discovery::{DiscoveryEngine, DiscoveryEvent, DiscoveryService};
pub use geo::Position;
pub use itinerary::{FixedLookupSelector, ItineraryRequest, ItinerarySelector};
pub use storage::config::AppConfig;
pub use storage::{open_store, AttractionStore, StoreError};
