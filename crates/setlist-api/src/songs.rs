//! Handlers for `/api/songs` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/songs` | All songs |
//! | `POST` | `/api/songs` | Body: `{"title":"...","artist":"..."}`; returns 201, 404 for an unknown `pool_id` |
//! | `GET`  | `/api/songs/{id}` | 404 if not found |
//! | `PUT`  | `/api/songs/{id}` | Replaces mutable fields; 404 if the song or its pool is missing |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::Value;
use setlist_core::{entity::Song, store::EntityStore};

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /api/songs`
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<Value>, ApiError>
where
  S: EntityStore,
{
  let songs = state
    .store
    .list_songs()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  state.render_all(&songs)
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /api/songs`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<Song>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EntityStore,
{
  require_pool(&state, body.pool_id).await?;
  let song = state
    .store
    .create_song(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  tracing::info!(id = ?song.id, "created song");
  Ok((StatusCode::CREATED, state.render(&song)?))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /api/songs/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError>
where
  S: EntityStore,
{
  let song = find(&state, id).await?;
  state.render(&song)
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /api/songs/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<Song>,
) -> Result<Json<Value>, ApiError>
where
  S: EntityStore,
{
  require_pool(&state, body.pool_id).await?;
  let song = state
    .store
    .update_song(id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("song {id} not found")))?;
  state.render(&song)
}

async fn find<S: EntityStore>(state: &AppState<S>, id: i64) -> Result<Song, ApiError> {
  state
    .store
    .get_song(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("song {id} not found")))
}

/// Reject a song that points at a pool which does not exist.
async fn require_pool<S: EntityStore>(
  state: &AppState<S>,
  pool_id: Option<i64>,
) -> Result<(), ApiError> {
  let Some(pool_id) = pool_id else { return Ok(()) };
  state
    .store
    .get_pool(pool_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .map(drop)
    .ok_or_else(|| ApiError::NotFound(format!("pool {pool_id} not found")))
}
