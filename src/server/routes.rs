use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::error::ApiError;
use super::state::AppState;
use crate::attractions::deck::Deck;
use crate::attractions::{Attraction, MarkFound, NewAddedGem};
use crate::discovery::simulation::{self, SimulatedWalk};
use crate::discovery::DiscoveryEvent;
use crate::geo::Position;
use crate::itinerary::ItineraryRequest;

/// Add-gem body. Every field is optional here so that a missing one is
/// reported as `All fields are required` rather than a parse failure.
#[derive(Debug, Default, Deserialize)]
pub struct AddGemPayload {
    name: Option<String>,
    image: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    comment: Option<String>,
}

impl AddGemPayload {
    fn into_new_gem(self) -> Result<NewAddedGem, ApiError> {
        fn text(value: Option<String>) -> Result<String, ApiError> {
            value
                .filter(|v| !v.trim().is_empty())
                .ok_or(ApiError::MissingFields)
        }

        Ok(NewAddedGem {
            name: text(self.name)?,
            image: text(self.image)?,
            lat: self.lat.filter(|v| v.is_finite()).ok_or(ApiError::MissingFields)?,
            lon: self.lon.filter(|v| v.is_finite()).ok_or(ApiError::MissingFields)?,
            comment: text(self.comment)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct DeckQuery {
    page: Option<usize>,
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

async fn attractions_with_icons(
    state: &AppState,
    message: &'static str,
) -> Result<Vec<Attraction>, ApiError> {
    let attractions = state
        .store
        .list_attractions()
        .await
        .map_err(ApiError::storage(message))?;

    Ok(attractions
        .into_iter()
        .map(|a| a.with_icon_base(&state.public_base_url))
        .collect())
}

fn event_with_icon(state: &AppState, mut event: DiscoveryEvent) -> DiscoveryEvent {
    event.attraction = event.attraction.with_icon_base(&state.public_base_url);
    event
}

pub async fn attractions_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Attraction>>, ApiError> {
    Ok(Json(attractions_with_icons(&state, "Error getting attractions").await?))
}

pub async fn add_gem_handler(
    State(state): State<AppState>,
    payload: Result<Json<AddGemPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let gem = json_body(payload)?.into_new_gem()?;

    let id = state
        .store
        .insert_added_gem(gem)
        .await
        .map_err(ApiError::storage("Error inserting AddedGem"))?;

    tracing::info!("Stored gem submission {id}");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "AddedGem inserted successfully", "id": id })),
    ))
}

pub async fn itinerary_handler(
    State(state): State<AppState>,
    payload: Result<Json<ItineraryRequest>, JsonRejection>,
) -> Result<Json<Vec<Attraction>>, ApiError> {
    let request = json_body(payload)?;
    // Reject bad input before touching storage
    request.validate()?;

    let attractions = attractions_with_icons(&state, "Error getting itinerary").await?;
    let itinerary = state.selector.select(&request, &attractions)?;

    Ok(Json(itinerary))
}

pub async fn mark_found_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MarkFound>, ApiError> {
    let mut update = state
        .store
        .mark_found(id)
        .await
        .map_err(ApiError::storage("Error updating attraction"))?;

    update.attraction = update.attraction.with_icon_base(&state.public_base_url);
    Ok(Json(update))
}

pub async fn position_handler(
    State(state): State<AppState>,
    payload: Result<Json<Position>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let position = json_body(payload)?;

    let event = state
        .discovery
        .on_position_update(position)
        .await
        .map_err(ApiError::storage("Error checking position"))?
        .map(|event| event_with_icon(&state, event));

    Ok(Json(json!({ "event": event })))
}

pub async fn deck_handler(
    State(state): State<AppState>,
    Query(query): Query<DeckQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let attractions = attractions_with_icons(&state, "Error getting attractions").await?;
    let deck = Deck::from_attractions(&attractions);

    Ok(Json(deck.page(query.page.unwrap_or(1))))
}

pub async fn simulated_hunt_handler(
    State(state): State<AppState>,
    payload: Result<Json<SimulatedWalk>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let walk = json_body(payload)?;
    walk.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let mut report = simulation::replay(&state.discovery, &walk)
        .await
        .map_err(ApiError::storage("Error running simulated hunt"))?;
    report.discoveries = report
        .discoveries
        .into_iter()
        .map(|event| event_with_icon(&state, event))
        .collect();

    tracing::info!(
        "Simulated hunt: {} steps, {} discoveries",
        report.steps,
        report.discoveries.len()
    );

    Ok(Json(report))
}
