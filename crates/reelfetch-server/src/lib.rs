//! Reelfetch HTTP server
//!
//! Exposes the extraction pipeline over HTTP.
//!
//! # Routes
//!
//! - `GET /` returns a plaintext liveness string
//! - `GET /api/download?url=<post-url>` returns a JSON envelope:
//!
//! ```json
//! { "success": true, "video_url": "https://...", "thumbnail_url": "https://..." }
//! { "success": false, "error": "A valid Instagram URL is required." }
//! ```

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use reelfetch_core::{MSG_INVALID_URL, ReelScraper, ResponseEnvelope};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod config;

pub use config::ServerConfig;

/// Body of `GET /`
pub const LIVENESS_MESSAGE: &str = "Instagram Downloader Backend is running!";

/// Shared handler state
///
/// The scraper holds no per-request state, so handlers share it without a lock.
#[derive(Clone)]
pub struct AppState {
    pub scraper: Arc<ReelScraper>,
}

impl AppState {
    pub fn new(scraper: ReelScraper) -> Self {
        Self {
            scraper: Arc::new(scraper),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DownloadParams {
    url: Option<String>,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(liveness))
        .route("/api/download", get(download))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

async fn download(
    State(state): State<AppState>,
    query: Result<Query<DownloadParams>, QueryRejection>,
) -> Response {
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            info!("rejected query string: {rejection}");
            return respond(400, ResponseEnvelope::failure(MSG_INVALID_URL));
        }
    };

    let (status, envelope) = state.scraper.download(params.url.as_deref()).await;
    respond(status, envelope)
}

fn respond(status: u16, envelope: ResponseEnvelope) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(envelope)).into_response()
}
