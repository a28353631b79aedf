//! JSON HTTP surface over the viewer handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::client::RacingApiClient;
use crate::normalize::TableKind;
use crate::types::{ErrorResponse, HealthResponse, MeetsResponse, RacesResponse};
use crate::viewer::{load_meets, load_races, parse_date, today};

/// Application state shared across handlers.
pub struct AppState {
    pub client: RacingApiClient,
}

/// Error type for API handlers.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.status.to_string(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct MeetsQuery {
    pub date: Option<String>,
}

/// Build the router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/meets", get(meets))
        .route("/meets/:meet_id/entries", get(entries))
        .route("/meets/:meet_id/results", get(results))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Meets for `?date=YYYY-MM-DD` (default today).
pub async fn meets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MeetsQuery>,
) -> Result<Json<MeetsResponse>, ApiError> {
    let raw = query.date.unwrap_or_else(today);
    let date = parse_date(&raw).map_err(|e| ApiError::bad_request(e.to_string()))?;

    let (response, _) = load_meets(&state.client, &date).await;
    Ok(Json(response))
}

/// Entries for a meet.
pub async fn entries(
    State(state): State<Arc<AppState>>,
    Path(meet_id): Path<String>,
) -> Json<RacesResponse> {
    Json(load_races(&state.client, &meet_id, TableKind::Entries).await)
}

/// Results for a meet.
pub async fn results(
    State(state): State<Arc<AppState>>,
    Path(meet_id): Path<String>,
) -> Json<RacesResponse> {
    Json(load_races(&state.client, &meet_id, TableKind::Results).await)
}
