use crate::state::AppState;

use arcadia_core::prelude::*;
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde_json::json;
use std::collections::HashMap;
use tracing::{error, warn};

pub struct ApiError(anyhow::Error);

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self
            .0
            .downcast_ref::<ValidationError>()
            .map(|invalid| (StatusCode::BAD_REQUEST, invalid.to_string()))
            .unwrap_or_else(|| {
                error!("Request failed: {:#}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            });

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// OPTIONS: CORS preflight, answered without touching the store.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}

/// GET: every game, newest first.
pub async fn list_games<G: GameStore, C: CoverStorage>(
    State(state): State<AppState<G, C>>,
) -> Result<impl IntoResponse, ApiError> {
    let games = state.games.list_games().await?;
    Ok(Json(json!({ "games": games })))
}

/// POST: validates the body, uploads the optional cover, inserts the row.
pub async fn create_game<G: GameStore, C: CoverStorage>(
    State(state): State<AppState<G, C>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let ValidatedCreate { mut game, cover } = CreateGameRequest::from_body(&body)?.validate()?;

    let uploaded_key = match cover {
        Some(cover) => {
            let key = cover.generate_key(state.covers.cover_prefix());
            let content_type = cover.content_type();
            state
                .covers
                .put_object(&key, cover.data, &content_type)
                .await?;
            game.cover_url = Some(state.covers.public_url(&key));
            Some(key)
        }
        None => None,
    };

    match state.games.insert_game(game).await {
        Ok(id) => Ok(Json(json!({ "success": true, "id": id }))),
        Err(insert_err) => {
            if let Some(key) = uploaded_key {
                if state.cleanup_orphaned_covers {
                    if let Err(e) = state.covers.delete_object(&key).await {
                        error!("Failed to remove orphaned cover {key}: {e}");
                    }
                } else {
                    warn!("Insert failed after upload, cover {key} is orphaned");
                }
            }
            Err(ApiError::from(insert_err))
        }
    }
}

/// DELETE ?id=N: removes the game if present. Missing ids are not an error.
///
/// A repeated `id` keeps the last value.
pub async fn delete_game<G: GameStore, C: CoverStorage>(
    State(state): State<AppState<G, C>>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params.map_err(|e| ValidationError::InvalidQuery(e.body_text()))?;
    let id = parse_game_id(params.get("id").map(String::as_str))?;
    state.games.delete_game(id).await?;
    Ok(Json(json!({ "success": true })))
}
