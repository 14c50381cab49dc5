//! REST transport.
//!
//! Routes under `/api` mirror what the web and mobile clients call; anything
//! else falls through to the static directory so rewritten icon URLs resolve.

pub mod error;
pub mod routes;
pub mod state;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::discovery::DiscoveryEngine;
use crate::storage::config::{AppConfig, ConfigError};
use crate::storage::AttractionStore;

pub use error::ApiError;
pub use state::AppState;

use routes::{
    add_gem_handler, attractions_handler, deck_handler, itinerary_handler, mark_found_handler,
    position_handler, simulated_hunt_handler,
};

/// API routes only, without static files or middleware.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/attractions", get(attractions_handler))
        .route("/api/attractions/:id/found", post(mark_found_handler))
        .route("/api/addedGems", post(add_gem_handler))
        .route(
            "/api/getItinerary",
            get(itinerary_handler).post(itinerary_handler),
        )
        .route("/api/position", post(position_handler))
        .route("/api/deck", get(deck_handler))
        .route("/api/simulatedHunt", post(simulated_hunt_handler))
        .with_state(state)
}

/// Full application: API, static files, CORS and request tracing.
pub fn router(
    state: AppState,
    static_dir: &Path,
    cors_origin: &str,
) -> Result<Router, ConfigError> {
    let origin = cors_origin
        .parse::<HeaderValue>()
        .map_err(|_| ConfigError::InvalidValue(format!("server.cors_origin={cors_origin}")))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Ok(api_router(state)
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

/// Bind the configured address and serve until Ctrl+C or SIGTERM.
pub async fn serve(config: &AppConfig, store: Arc<dyn AttractionStore>) -> anyhow::Result<()> {
    let engine = DiscoveryEngine::new(config.discovery.radius_meters);
    let state = AppState::new(store, engine, &config.server.public_base_url);
    info!("Discovery radius {} m", state.discovery.engine().radius_meters());
    let app = router(state, &config.server.static_dir, &config.server.cors_origin)?;

    let address = format!("{}:{}", config.server.host, config.server.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
