use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::itinerary::{FieldError, ItineraryError};
use crate::storage::StoreError;

/// Errors returned by request handlers, rendered as `{"error": ...}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("All fields are required")]
    MissingFields,

    #[error("{0}")]
    BadRequest(String),

    #[error("Invalid itinerary request")]
    InvalidItinerary(Vec<FieldError>),

    #[error("No itinerary found")]
    NoItineraryFound,

    #[error("Attraction {0} not found")]
    AttractionNotFound(i64),

    /// Storage failure; the message is what the client sees, the source is logged.
    #[error("{message}")]
    Storage {
        message: &'static str,
        #[source]
        source: StoreError,
    },
}

impl ApiError {
    /// Wrap a store failure behind a fixed client-facing message.
    pub fn storage(message: &'static str) -> impl FnOnce(StoreError) -> Self {
        move |source| match source {
            StoreError::NotFound(id) => ApiError::AttractionNotFound(id),
            source => ApiError::Storage { message, source },
        }
    }
}

impl From<ItineraryError> for ApiError {
    fn from(err: ItineraryError) -> Self {
        match err {
            ItineraryError::InvalidRequest(fields) => ApiError::InvalidItinerary(fields),
            ItineraryError::NoItineraryFound => ApiError::NoItineraryFound,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::MissingFields { .. }
            | ApiError::BadRequest { .. }
            | ApiError::InvalidItinerary { .. } => StatusCode::BAD_REQUEST,
            ApiError::NoItineraryFound | ApiError::AttractionNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            ApiError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            ApiError::InvalidItinerary(fields) => {
                json!({ "error": self.to_string(), "fields": fields })
            }
            ApiError::Storage { message, source } => {
                tracing::error!("{message}: {source}");
                json!({ "error": message })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
