//! Itinerary selection.
//!
//! [`ItinerarySelector`] is the seam for planners. The only implementation,
//! [`FixedLookupSelector`], maps three exact (attractions, gems) requests to
//! fixed slices of the attraction list and rejects everything else.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attractions::Attraction;
use crate::geo::Position;

/// Accepted time budget in minutes (inclusive).
pub const TIME_RANGE_MINUTES: std::ops::RangeInclusive<i64> = 1..=480;

/// Accepted attraction and gem counts (inclusive).
pub const COUNT_RANGE: std::ops::RangeInclusive<i64> = 0..=10;

/// What the user asked for.
///
/// Field names follow the web client's request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryRequest {
    /// Time budget in minutes
    pub time: i64,
    /// Number of monuments to visit
    #[serde(rename = "n_attractions")]
    pub attractions: i64,
    /// Number of gems to visit
    #[serde(rename = "n_gems")]
    pub gems: i64,
    /// Starting latitude, if known
    #[serde(default)]
    pub ini_lat: Option<f64>,
    /// Starting longitude, if known
    #[serde(default)]
    pub ini_lon: Option<f64>,
}

impl ItineraryRequest {
    pub fn new(time: i64, attractions: i64, gems: i64) -> Self {
        Self {
            time,
            attractions,
            gems,
            ini_lat: None,
            ini_lon: None,
        }
    }

    /// Starting point, when both coordinates were given.
    pub fn start(&self) -> Option<Position> {
        Some(Position::new(self.ini_lat?, self.ini_lon?))
    }

    /// Check every field against its range, collecting all problems.
    pub fn validate(&self) -> Result<(), ItineraryError> {
        let mut errors = Vec::new();

        if !TIME_RANGE_MINUTES.contains(&self.time) {
            errors.push(FieldError::new(
                "time",
                format!(
                    "Please enter a valid total time ({}-{} minutes).",
                    TIME_RANGE_MINUTES.start(),
                    TIME_RANGE_MINUTES.end()
                ),
            ));
        }
        if !COUNT_RANGE.contains(&self.attractions) {
            errors.push(FieldError::new(
                "n_attractions",
                format!(
                    "Please enter a valid number of attractions ({}-{}).",
                    COUNT_RANGE.start(),
                    COUNT_RANGE.end()
                ),
            ));
        }
        if !COUNT_RANGE.contains(&self.gems) {
            errors.push(FieldError::new(
                "n_gems",
                format!(
                    "Please enter a valid number of gems ({}-{}).",
                    COUNT_RANGE.start(),
                    COUNT_RANGE.end()
                ),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ItineraryError::InvalidRequest(errors))
        }
    }
}

/// A rejected request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: String) -> Self {
        Self { field, message }
    }
}

/// Itinerary errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ItineraryError {
    #[error("Invalid itinerary request: {}", joined(.0))]
    InvalidRequest(Vec<FieldError>),

    #[error("No itinerary found")]
    NoItineraryFound,
}

fn joined(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strategy for turning a request into an ordered list of stops.
pub trait ItinerarySelector: Send + Sync {
    fn select(
        &self,
        request: &ItineraryRequest,
        attractions: &[Attraction],
    ) -> Result<Vec<Attraction>, ItineraryError>;
}

/// The three hardcoded plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedPlan {
    /// Every attraction
    Full,
    /// The first three entries
    Monuments,
    /// Entries 3 and 4
    Gems,
}

impl FixedPlan {
    /// Plan for an exact (attractions, gems) pair.
    pub fn for_counts(attractions: i64, gems: i64) -> Option<Self> {
        match (attractions, gems) {
            (3, 2) => Some(Self::Full),
            (3, 0) => Some(Self::Monuments),
            (0, 2) => Some(Self::Gems),
            _ => None,
        }
    }

    /// Slice the list, clamped to its length.
    pub fn apply(&self, attractions: &[Attraction]) -> Vec<Attraction> {
        let len = attractions.len();
        let range = match self {
            Self::Full => 0..len,
            Self::Monuments => 0..len.min(3),
            Self::Gems => len.min(3)..len.min(5),
        };
        attractions[range].to_vec()
    }
}

/// Lookup-table selector. The time budget is validated but not used.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLookupSelector;

impl ItinerarySelector for FixedLookupSelector {
    fn select(
        &self,
        request: &ItineraryRequest,
        attractions: &[Attraction],
    ) -> Result<Vec<Attraction>, ItineraryError> {
        request.validate()?;

        let plan = FixedPlan::for_counts(request.attractions, request.gems)
            .ok_or(ItineraryError::NoItineraryFound)?;

        Ok(plan.apply(attractions))
    }
}
