//! Read-only HTTP lookup for game sessions.
//!
//! One endpoint, mirroring the production route used for link sharing:
//! `GET /api/tictactoe?id=<game id>` returns the session record as JSON.
//! All game writes go through the session protocol; nothing here mutates.

use crate::store::{DocumentStore, StoreError};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Shared store handle for the router.
pub type SharedStore = Arc<dyn DocumentStore>;

/// Builds the lookup router over the given store.
#[instrument(skip(store))]
pub fn router(store: SharedStore) -> Router {
    info!("Building lookup API router");
    Router::new()
        .route("/api/tictactoe", get(lookup_game))
        .with_state(store)
}

#[derive(Debug, Deserialize)]
struct LookupQuery {
    id: Option<String>,
}

/// Fetches a game session by id.
#[instrument(skip(store))]
async fn lookup_game(
    State(store): State<SharedStore>,
    Query(query): Query<LookupQuery>,
) -> Response {
    let Some(id) = query.id else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Game ID is required" })),
        )
            .into_response();
    };

    match store.get(&id).await {
        Ok(snapshot) => {
            debug!(game_id = %id, "Game found");
            (StatusCode::OK, Json(snapshot.record().clone())).into_response()
        }
        Err(StoreError::NotFound(_)) => {
            debug!(game_id = %id, "Game not found");
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Game not found" })),
            )
                .into_response()
        }
        Err(err) => {
            warn!(game_id = %id, error = %err, "Failed to fetch game");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch game" })),
            )
                .into_response()
        }
    }
}
