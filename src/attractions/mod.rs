//! Attractions: conventional monuments and hidden gems.

pub mod deck;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Position;

/// A point of interest.
///
/// Serialized with camelCase keys. The `isGem` / `isFound` flags travel as
/// `0` / `1` integers because that is what the map clients compare against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attraction {
    /// Stable identifier, never reused
    pub id: i64,
    /// Display name
    pub name: String,
    /// Asset name or absolute URL of the card image
    pub icon: String,
    /// Latitude in decimal degrees
    pub lat: f64,
    /// Longitude in decimal degrees
    pub lon: f64,
    /// Shown once the attraction is discovered
    pub description: String,
    /// Hidden gem rather than a monument
    #[serde(with = "flag")]
    pub is_gem: bool,
    /// Set once the user walked into the discovery radius; never reverts
    #[serde(with = "flag")]
    pub is_found: bool,
}

impl Attraction {
    /// Create an attraction that has not been found yet.
    pub fn new(
        id: i64,
        name: impl Into<String>,
        icon: impl Into<String>,
        lat: f64,
        lon: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            icon: icon.into(),
            lat,
            lon,
            description: String::new(),
            is_gem: false,
            is_found: false,
        }
    }

    /// Mark as a hidden gem.
    pub fn gem(mut self) -> Self {
        self.is_gem = true;
        self
    }

    /// Add description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Coordinates of the attraction.
    pub fn position(&self) -> Position {
        Position::new(self.lat, self.lon)
    }

    /// A gem that is still hidden, i.e. subject to proximity discovery.
    pub fn is_hidden_gem(&self) -> bool {
        self.is_gem && !self.is_found
    }

    /// Monuments are always visible; gems only after they are found.
    pub fn is_discovered(&self) -> bool {
        !self.is_gem || self.is_found
    }

    /// Flip the found flag. Returns `true` only on the false -> true transition.
    pub fn mark_found(&mut self) -> bool {
        if self.is_found {
            return false;
        }
        self.is_found = true;
        true
    }

    /// Rewrite a relative icon into an absolute URL under `base_url`.
    pub fn with_icon_base(mut self, base_url: &str) -> Self {
        if !(self.icon.starts_with("http://") || self.icon.starts_with("https://")) {
            self.icon = format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                self.icon.trim_start_matches('/')
            );
        }
        self
    }
}

/// Result of setting the found flag.
///
/// Serialized as the attraction's own fields plus `newlyFound`, which is true
/// only for the call that flipped the flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkFound {
    #[serde(flatten)]
    pub attraction: Attraction,
    #[serde(default)]
    pub newly_found: bool,
}

/// A gem proposed by a user, pending curation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAddedGem {
    pub name: String,
    /// Captured photo, data URI or file URI
    pub image: String,
    pub lat: f64,
    pub lon: f64,
    pub comment: String,
}

/// A stored gem submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddedGem {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub lat: f64,
    pub lon: f64,
    pub comment: String,
    /// Missing on rows carried over from older databases
    pub created_at: Option<DateTime<Utc>>,
}

/// `0`/`1` wire encoding for boolean flags. Booleans are accepted on input too.
mod flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Flag {
            Bool(bool),
            Int(i64),
        }

        Ok(match Flag::deserialize(deserializer)? {
            Flag::Bool(value) => value,
            Flag::Int(value) => value != 0,
        })
    }
}
