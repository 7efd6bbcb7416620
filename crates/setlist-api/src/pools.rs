//! Handlers for `/api/pools` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/pools` | All pools |
//! | `POST` | `/api/pools` | Body: `{"name":"..."}`; returns 201, 404 for an unknown `owner_id` |
//! | `GET`  | `/api/pools/{id}` | 404 if not found |
//! | `PUT`  | `/api/pools/{id}` | Replaces mutable fields; 404 if the pool or its owner is missing |
//! | `GET`  | `/api/pools/{id}/songs` | Songs collected in the pool |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::Value;
use setlist_core::{entity::Pool, store::EntityStore};

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /api/pools`
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<Value>, ApiError>
where
  S: EntityStore,
{
  let pools = state
    .store
    .list_pools()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  state.render_all(&pools)
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /api/pools`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<Pool>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EntityStore,
{
  require_owner(&state, body.owner_id).await?;
  let pool = state
    .store
    .create_pool(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  tracing::info!(id = ?pool.id, "created pool");
  Ok((StatusCode::CREATED, state.render(&pool)?))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /api/pools/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError>
where
  S: EntityStore,
{
  let pool = find(&state, id).await?;
  state.render(&pool)
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /api/pools/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<Pool>,
) -> Result<Json<Value>, ApiError>
where
  S: EntityStore,
{
  require_owner(&state, body.owner_id).await?;
  let pool = state
    .store
    .update_pool(id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("pool {id} not found")))?;
  state.render(&pool)
}

// ─── Songs in pool ────────────────────────────────────────────────────────────

/// `GET /api/pools/{id}/songs`
pub async fn songs<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError>
where
  S: EntityStore,
{
  find(&state, id).await?;
  let songs = state
    .store
    .list_songs_in_pool(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  state.render_all(&songs)
}

async fn find<S: EntityStore>(state: &AppState<S>, id: i64) -> Result<Pool, ApiError> {
  state
    .store
    .get_pool(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("pool {id} not found")))
}

/// Reject a pool whose owner is not a known user.
async fn require_owner<S: EntityStore>(
  state: &AppState<S>,
  owner_id: Option<i64>,
) -> Result<(), ApiError> {
  let Some(owner_id) = owner_id else { return Ok(()) };
  state
    .store
    .get_user(owner_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .map(drop)
    .ok_or_else(|| ApiError::NotFound(format!("user {owner_id} not found")))
}
