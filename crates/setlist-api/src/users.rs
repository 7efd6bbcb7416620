//! Handlers for `/api/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/users` | All users |
//! | `POST` | `/api/users` | Body: `{"username":"...","email":"..."}`; returns 201 |
//! | `GET`  | `/api/users/{id}` | 404 if not found |
//! | `PUT`  | `/api/users/{id}` | Replaces mutable fields; 404 if not found |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde_json::Value;
use setlist_core::{entity::User, store::EntityStore};

use crate::{AppState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /api/users`
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<Value>, ApiError>
where
  S: EntityStore,
{
  let users = state
    .store
    .list_users()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  state.render_all(&users)
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /api/users`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<User>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EntityStore,
{
  let user = state
    .store
    .create_user(body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  tracing::info!(id = ?user.id, "created user");
  Ok((StatusCode::CREATED, state.render(&user)?))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /api/users/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError>
where
  S: EntityStore,
{
  let user = find(&state, id).await?;
  state.render(&user)
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /api/users/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<User>,
) -> Result<Json<Value>, ApiError>
where
  S: EntityStore,
{
  let user = state
    .store
    .update_user(id, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))?;
  state.render(&user)
}

async fn find<S: EntityStore>(state: &AppState<S>, id: i64) -> Result<User, ApiError> {
  state
    .store
    .get_user(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))
}
