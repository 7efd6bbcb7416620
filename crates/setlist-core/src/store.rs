//! The `EntityStore` trait.
//!
//! Implemented by storage backends (e.g. `setlist-store-sqlite`). The API
//! layer depends on this abstraction, not on any concrete backend.
//!
//! Implementations own the lifecycle hooks: every `create_*` must call
//! [`Entity::before_insert`](crate::entity::Entity::before_insert) and every
//! `update_*` must call
//! [`Entity::before_update`](crate::entity::Entity::before_update) before
//! touching storage. Timestamps on entities handed to `create_*` are
//! discarded; the store stamps new rows itself.

use std::future::Future;

use crate::entity::{Pool, Song, User};

/// Abstraction over a setlist store backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait EntityStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Pools ─────────────────────────────────────────────────────────────

  /// Persist a new pool and return it with its assigned id.
  fn create_pool(
    &self,
    pool: Pool,
  ) -> impl Future<Output = Result<Pool, Self::Error>> + Send + '_;

  /// Retrieve a pool by id. Returns `None` if not found.
  fn get_pool(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Pool>, Self::Error>> + Send + '_;

  fn list_pools(&self) -> impl Future<Output = Result<Vec<Pool>, Self::Error>> + Send + '_;

  /// Overwrite the mutable fields of pool `id` and return the stored row, or
  /// `None` if no such pool exists.
  ///
  /// `created_at` is never written; an empty status keeps the stored one.
  fn update_pool(
    &self,
    id: i64,
    pool: Pool,
  ) -> impl Future<Output = Result<Option<Pool>, Self::Error>> + Send + '_;

  // ── Songs ─────────────────────────────────────────────────────────────

  fn create_song(
    &self,
    song: Song,
  ) -> impl Future<Output = Result<Song, Self::Error>> + Send + '_;

  fn get_song(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Song>, Self::Error>> + Send + '_;

  fn list_songs(&self) -> impl Future<Output = Result<Vec<Song>, Self::Error>> + Send + '_;

  /// Songs whose `pool_id` is `pool_id`.
  fn list_songs_in_pool(
    &self,
    pool_id: i64,
  ) -> impl Future<Output = Result<Vec<Song>, Self::Error>> + Send + '_;

  fn update_song(
    &self,
    id: i64,
    song: Song,
  ) -> impl Future<Output = Result<Option<Song>, Self::Error>> + Send + '_;

  // ── Users ─────────────────────────────────────────────────────────────

  fn create_user(
    &self,
    user: User,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn list_users(&self) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  fn update_user(
    &self,
    id: i64,
    user: User,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;
}
