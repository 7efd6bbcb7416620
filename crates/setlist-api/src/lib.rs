//! JSON REST API for setlist.
//!
//! Exposes an axum [`Router`] backed by any
//! [`setlist_core::store::EntityStore`]. Every entity in a response goes
//! through the [`Serializer`] chain, so registered resources carry `_links`.
//!
//! | Method | Path | Route name |
//! |--------|------|------------|
//! | `GET`  | `/api/{pools,songs,users}` | `api_get_all_<token>` |
//! | `POST` | `/api/{pools,songs,users}` | `api_post_<token>` |
//! | `GET`  | `/api/{pools,songs,users}/{id}` | `api_get_<token>` |
//! | `PUT`  | `/api/{pools,songs,users}/{id}` | `api_put_<token>` |
//! | `GET`  | `/api/pools/{id}/songs` | `api_get_pool_songs` |

pub mod error;
pub mod pools;
pub mod routes;
pub mod songs;
pub mod users;

use std::{path::PathBuf, sync::Arc};

use axum::{Json, Router, routing::get};
use serde::Deserialize;
use serde_json::Value;
use setlist_core::{
  entity::{Entity, Pool},
  normalize::{Context, JSON_FORMAT, Serializer},
  resource::ResourceRegistry,
  store::EntityStore,
};

pub use error::ApiError;
use routes::{POOL_SONGS_PATH, POOLS, PoolSongsLink, SONGS, USERS};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SETLIST_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("setlist.db") }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       default_host(),
      port:       default_port(),
      store_path: default_store_path(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:      Arc<S>,
  pub serializer: Arc<Serializer>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), serializer: self.serializer.clone() }
  }
}

impl<S> AppState<S> {
  /// State with the API's own route table and every entity registered.
  pub fn new(store: Arc<S>) -> Self {
    let mut registry = ResourceRegistry::with_entities();
    registry.register::<Pool>().with_link(PoolSongsLink);

    let serializer = Serializer::new(Arc::new(routes::route_table()), Arc::new(registry));
    Self { store, serializer: Arc::new(serializer) }
  }

  /// Normalize one entity for a JSON response.
  pub fn render<E: Entity>(&self, entity: &E) -> Result<Json<Value>, ApiError> {
    let value = self.serializer.normalize(entity, JSON_FORMAT, &Context::new())?;
    Ok(Json(value))
  }

  /// Normalize a collection into a JSON array.
  pub fn render_all<E: Entity>(&self, entities: &[E]) -> Result<Json<Value>, ApiError> {
    let values = self
      .serializer
      .normalize_all(entities, JSON_FORMAT, &Context::new())?;
    Ok(Json(Value::Array(values)))
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `store`.
///
/// Paths are absolute (`/api/...`) so they match the named routes used in
/// `_links`.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: EntityStore + 'static,
{
  Router::new()
    // Pools
    .route(POOLS.collection, get(pools::list::<S>).post(pools::create::<S>))
    .route(&POOLS.member(), get(pools::get_one::<S>).put(pools::update::<S>))
    .route(POOL_SONGS_PATH, get(pools::songs::<S>))
    // Songs
    .route(SONGS.collection, get(songs::list::<S>).post(songs::create::<S>))
    .route(&SONGS.member(), get(songs::get_one::<S>).put(songs::update::<S>))
    // Users
    .route(USERS.collection, get(users::list::<S>).post(users::create::<S>))
    .route(&USERS.member(), get(users::get_one::<S>).put(users::update::<S>))
    .with_state(AppState::new(store))
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use chrono::{DateTime, Utc};
  use serde_json::json;
  use setlist_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store))
  }

  async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
  }

  // ── Create ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn post_song_returns_201_with_links_and_lifecycle() {
    let app = app().await;
    let (status, body) = send(
      &app,
      "POST",
      "/api/songs",
      Some(json!({ "title": "Naima", "artist": "John Coltrane" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().unwrap();
    assert_eq!(body["status"], "active");
    assert!(body["created_at"].is_string());
    assert_eq!(body["_links"]["up"], json!({ "method": ["GET"], "path": "/api/songs" }));
    assert_eq!(body["_links"]["self"]["path"], format!("/api/songs/{id}"));
  }

  #[tokio::test]
  async fn post_discards_client_timestamps() {
    let app = app().await;
    let before = Utc::now();
    let (status, body) = send(
      &app,
      "POST",
      "/api/songs",
      Some(json!({
        "title": "Blue in Green",
        "artist": "Miles Davis",
        "created_at": "2999-01-01T00:00:00Z",
        "updated_at": "1990-01-01T00:00:00Z",
        "status": "draft",
      })),
    )
    .await;
    let after = Utc::now();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["created_at"], body["updated_at"]);
    assert_eq!(body["status"], "draft");

    let created_at: DateTime<Utc> =
      body["created_at"].as_str().unwrap().parse().unwrap();
    assert!(created_at >= before && created_at <= after, "created_at = {created_at}");
  }

  #[tokio::test]
  async fn post_song_into_unknown_pool_is_404() {
    let app = app().await;
    let (status, body) = send(
      &app,
      "POST",
      "/api/songs",
      Some(json!({ "title": "Naima", "artist": "John Coltrane", "pool_id": 999 })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("pool 999"));

    let (_, songs) = send(&app, "GET", "/api/songs", None).await;
    assert!(songs.as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn post_pool_with_unknown_owner_is_404() {
    let app = app().await;
    let (status, body) =
      send(&app, "POST", "/api/pools", Some(json!({ "name": "Jazz", "owner_id": 12 }))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("user 12"));
  }

  // ── Read ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn self_link_points_back_to_the_resource() {
    let app = app().await;
    let (_, created) = send(
      &app,
      "POST",
      "/api/users",
      Some(json!({ "username": "ada", "email": "ada@example.com" })),
    )
    .await;

    let self_path = created["_links"]["self"]["path"].as_str().unwrap().to_owned();
    let (status, fetched) = send(&app, "GET", &self_path, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["username"], "ada");
    assert_eq!(fetched["_links"]["self"]["path"], self_path);

    let up = fetched["_links"]["up"]["path"].as_str().unwrap().to_owned();
    let (status, list) = send(&app, "GET", &up, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn get_missing_returns_404() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/api/pools/77", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("77"));
  }

  #[tokio::test]
  async fn pools_link_to_their_songs() {
    let app = app().await;
    let (_, pool) = send(&app, "POST", "/api/pools", Some(json!({ "name": "Jazz" }))).await;
    let pool_id = pool["id"].as_i64().unwrap();
    assert_eq!(pool["_links"]["songs"]["path"], format!("/api/pools/{pool_id}/songs"));

    send(
      &app,
      "POST",
      "/api/songs",
      Some(json!({ "title": "So What", "artist": "Miles Davis", "pool_id": pool_id })),
    )
    .await;
    send(&app, "POST", "/api/songs", Some(json!({ "title": "Loose", "artist": "The Stooges" })))
      .await;

    let (status, songs) = send(&app, "GET", &format!("/api/pools/{pool_id}/songs"), None).await;
    assert_eq!(status, StatusCode::OK);
    let songs = songs.as_array().unwrap();
    assert_eq!(songs.len(), 1);
    assert_eq!(songs[0]["title"], "So What");
    assert!(songs[0]["_links"]["self"].is_object());
  }

  #[tokio::test]
  async fn songs_of_missing_pool_is_404() {
    let app = app().await;
    let (status, _) = send(&app, "GET", "/api/pools/5/songs", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Update ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn put_keeps_created_at_and_status() {
    let app = app().await;
    let (_, pool) = send(
      &app,
      "POST",
      "/api/pools",
      Some(json!({ "name": "Focus", "status": "draft" })),
    )
    .await;
    let id = pool["id"].as_i64().unwrap();

    let (status, updated) = send(
      &app,
      "PUT",
      &format!("/api/pools/{id}"),
      Some(json!({ "name": "Deep focus", "created_at": "2001-01-01T00:00:00Z" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Deep focus");
    assert_eq!(updated["created_at"], pool["created_at"]);
    assert_eq!(updated["status"], "draft");
    assert_eq!(updated["_links"]["self"]["path"], format!("/api/pools/{id}"));
  }

  #[tokio::test]
  async fn put_missing_returns_404() {
    let app = app().await;
    let cases = [
      ("/api/users/3", json!({ "username": "x", "email": "x@example.com" })),
      ("/api/songs/3", json!({ "title": "x", "artist": "y" })),
      ("/api/pools/3", json!({ "name": "x" })),
    ];

    for (uri, body) in cases {
      let (status, body) = send(&app, "PUT", uri, Some(body)).await;
      assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
      assert!(body["error"].as_str().unwrap().contains("3 not found"), "{uri}");
    }
  }

  #[tokio::test]
  async fn put_song_into_unknown_pool_is_404() {
    let app = app().await;
    let (_, song) = send(
      &app,
      "POST",
      "/api/songs",
      Some(json!({ "title": "Naima", "artist": "John Coltrane" })),
    )
    .await;
    let id = song["id"].as_i64().unwrap();

    let (status, _) = send(
      &app,
      "PUT",
      &format!("/api/songs/{id}"),
      Some(json!({ "title": "Naima", "artist": "John Coltrane", "pool_id": 41 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, stored) = send(&app, "GET", &format!("/api/songs/{id}"), None).await;
    assert_eq!(stored["pool_id"], Value::Null);
    assert_eq!(stored["updated_at"], song["updated_at"]);
  }

  #[tokio::test]
  async fn invalid_body_is_rejected() {
    let app = app().await;
    let (status, _) = send(&app, "POST", "/api/songs", Some(json!({ "artist": "nobody" }))).await;
    assert!(status.is_client_error());
  }
}
