//! Persisted records: pools, the songs collected in them, and their owners.
//!
//! Every entity embeds a [`Lifecycle`] by value. Relationships are plain
//! foreign-key ids; nothing is loaded eagerly.

use serde::{Deserialize, Serialize};

use crate::lifecycle::{self, Lifecycle};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A persisted record with an identity and lifecycle metadata.
pub trait Entity: Serialize + Send + Sync + 'static {
  /// Upper-camel-case type name; the source of the resource-name token.
  const TYPE_NAME: &'static str;

  /// Store-assigned identity, `None` until first insert.
  fn id(&self) -> Option<i64>;

  fn lifecycle(&self) -> &Lifecycle;

  fn lifecycle_mut(&mut self) -> &mut Lifecycle;

  /// Called by the store immediately before an insert.
  fn before_insert(&mut self) { lifecycle::apply_insert_defaults(self.lifecycle_mut()); }

  /// Called by the store immediately before an update.
  fn before_update(&mut self) { lifecycle::apply_update_defaults(self.lifecycle_mut()); }
}

macro_rules! impl_entity {
  ($ty:ty, $name:literal) => {
    impl Entity for $ty {
      const TYPE_NAME: &'static str = $name;

      fn id(&self) -> Option<i64> { self.id }

      fn lifecycle(&self) -> &Lifecycle { &self.lifecycle }

      fn lifecycle_mut(&mut self) -> &mut Lifecycle { &mut self.lifecycle }
    }
  };
}

// ─── Pool ────────────────────────────────────────────────────────────────────

/// A named collection of songs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:          Option<i64>,
  pub name:        String,
  #[serde(default)]
  pub description: Option<String>,
  /// The [`User`] who owns the pool.
  #[serde(default)]
  pub owner_id:    Option<i64>,
  #[serde(flatten)]
  pub lifecycle:   Lifecycle,
}

impl Pool {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Self::default() }
  }
}

impl_entity!(Pool, "Pool");

// ─── Song ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:            Option<i64>,
  pub title:         String,
  pub artist:        String,
  #[serde(default)]
  pub duration_secs: Option<u32>,
  /// The [`Pool`] this song is collected in, if any.
  #[serde(default)]
  pub pool_id:       Option<i64>,
  #[serde(flatten)]
  pub lifecycle:     Lifecycle,
}

impl Song {
  pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
    Self { title: title.into(), artist: artist.into(), ..Self::default() }
  }
}

impl_entity!(Song, "Song");

// ─── User ────────────────────────────────────────────────────────────────────

/// An account that owns pools. Credentials are not modelled here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id:        Option<i64>,
  pub username:  String,
  pub email:     String,
  #[serde(flatten)]
  pub lifecycle: Lifecycle,
}

impl User {
  pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
    Self { username: username.into(), email: email.into(), ..Self::default() }
  }
}

impl_entity!(User, "User");
