//! Lifecycle metadata embedded in every persisted entity.
//!
//! The store calls [`apply_insert_defaults`] immediately before an insert and
//! [`apply_update_defaults`] immediately before an update. Nothing dispatches
//! these implicitly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status assigned to an entity persisted without one.
pub const DEFAULT_STATUS: &str = "active";

/// Creation/update timestamps and a short status string.
///
/// Flattened into the owning entity when serialized. Timestamps are `None`
/// only on entities that have never been persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<DateTime<Utc>>,
  #[serde(default)]
  pub status:     String,
}

impl Lifecycle {
  /// Unpersisted metadata carrying an explicit status.
  pub fn with_status(status: impl Into<String>) -> Self {
    Self { status: status.into(), ..Self::default() }
  }

  pub fn is_persisted(&self) -> bool { self.created_at.is_some() }
}

// ─── Hooks ───────────────────────────────────────────────────────────────────

/// Pre-insert hook using the current time.
pub fn apply_insert_defaults(meta: &mut Lifecycle) {
  apply_insert_defaults_at(meta, Utc::now());
}

/// Pre-insert hook: set `created_at` if unset, always refresh `updated_at`,
/// and fill an empty status with [`DEFAULT_STATUS`].
pub fn apply_insert_defaults_at(meta: &mut Lifecycle, now: DateTime<Utc>) {
  let created_at = *meta.created_at.get_or_insert(now);
  meta.updated_at = Some(now.max(created_at));
  if meta.status.trim().is_empty() {
    meta.status = DEFAULT_STATUS.to_owned();
  }
}

/// Pre-update hook using the current time.
pub fn apply_update_defaults(meta: &mut Lifecycle) {
  apply_update_defaults_at(meta, Utc::now());
}

/// Pre-update hook: refresh `updated_at` and nothing else.
///
/// The new value never precedes `created_at`, so a wall clock stepping
/// backwards cannot break `updated_at >= created_at`.
pub fn apply_update_defaults_at(meta: &mut Lifecycle, now: DateTime<Utc>) {
  meta.updated_at = Some(match meta.created_at {
    Some(created_at) => now.max(created_at),
    None => now,
  });
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone, Utc};

  use super::*;

  fn at(secs: i64) -> DateTime<Utc> { Utc.timestamp_opt(secs, 0).unwrap() }

  #[test]
  fn insert_fills_every_field() {
    let mut meta = Lifecycle::default();
    apply_insert_defaults_at(&mut meta, at(1_000));

    assert_eq!(meta.created_at, Some(at(1_000)));
    assert_eq!(meta.updated_at, Some(at(1_000)));
    assert_eq!(meta.status, DEFAULT_STATUS);
  }

  #[test]
  fn insert_keeps_existing_created_at_and_status() {
    let mut meta = Lifecycle {
      created_at: Some(at(500)),
      updated_at: None,
      status:     "archived".into(),
    };
    apply_insert_defaults_at(&mut meta, at(1_000));

    assert_eq!(meta.created_at, Some(at(500)));
    assert_eq!(meta.updated_at, Some(at(1_000)));
    assert_eq!(meta.status, "archived");
  }

  #[test]
  fn insert_replaces_blank_status() {
    let mut meta = Lifecycle::with_status("   ");
    apply_insert_defaults_at(&mut meta, at(1_000));
    assert_eq!(meta.status, DEFAULT_STATUS);
  }

  #[test]
  fn update_touches_only_updated_at() {
    let mut meta = Lifecycle::with_status("draft");
    apply_insert_defaults_at(&mut meta, at(1_000));
    let before = meta.clone();

    apply_update_defaults_at(&mut meta, at(2_000));

    assert_eq!(meta.created_at, before.created_at);
    assert_eq!(meta.status, "draft");
    assert_eq!(meta.updated_at, Some(at(2_000)));
  }

  #[test]
  fn updated_at_never_precedes_created_at() {
    let mut meta = Lifecycle::default();
    apply_insert_defaults_at(&mut meta, at(1_000));

    // Clock stepped backwards between insert and update.
    apply_update_defaults_at(&mut meta, at(1_000) - Duration::seconds(30));

    assert_eq!(meta.updated_at, meta.created_at);
  }

  #[test]
  fn wall_clock_hooks_are_monotonic_for_one_entity() {
    let mut meta = Lifecycle::default();
    apply_insert_defaults(&mut meta);
    let created_at = meta.created_at;
    let first_update = meta.updated_at;

    apply_update_defaults(&mut meta);

    assert_eq!(meta.created_at, created_at);
    assert!(meta.updated_at >= first_update);
    assert!(meta.updated_at >= meta.created_at);
  }
}
