//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Ids are SQLite rowids.

use chrono::{DateTime, Utc};
use setlist_core::{
  entity::{Pool, Song, User},
  lifecycle::Lifecycle,
};

use crate::{Error, Result};

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Lifecycle
// ────────────────────────────────────────────────────────────────

/// The three lifecycle columns, ready to bind.
pub struct RawLifecycle {
  pub created_at: String,
  pub updated_at: String,
  pub status:     String,
}

/// Encode stamped metadata; both timestamps must already be set.
pub fn encode_lifecycle(meta: &Lifecycle) -> Result<RawLifecycle> {
  let created_at = meta.created_at.ok_or(Error::Unstamped("created_at"))?;
  let updated_at = meta.updated_at.ok_or(Error::Unstamped("updated_at"))?;
  Ok(RawLifecycle {
    created_at: encode_dt(created_at),
    updated_at: encode_dt(updated_at),
    status:     meta.status.clone(),
  })
}

pub fn decode_lifecycle(raw: RawLifecycle) -> Result<Lifecycle> {
  Ok(Lifecycle {
    created_at: Some(decode_dt(&raw.created_at)?),
    updated_at: Some(decode_dt(&raw.updated_at)?),
    status:     raw.status,
  })
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const POOL_COLUMNS: &str =
  "id, name, description, owner_id, created_at, updated_at, status";

pub const SONG_COLUMNS: &str =
  "id, title, artist, duration_secs, pool_id, created_at, updated_at, status";

pub const USER_COLUMNS: &str = "id, username, email, created_at, updated_at, status";

/// Raw values read directly from a `pools` row.
pub struct RawPool {
  pub id:          i64,
  pub name:        String,
  pub description: Option<String>,
  pub owner_id:    Option<i64>,
  pub lifecycle:   RawLifecycle,
}

impl RawPool {
  /// Map a row selected with [`POOL_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      name:        row.get(1)?,
      description: row.get(2)?,
      owner_id:    row.get(3)?,
      lifecycle:   RawLifecycle {
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
        status:     row.get(6)?,
      },
    })
  }

  pub fn into_pool(self) -> Result<Pool> {
    Ok(Pool {
      id:          Some(self.id),
      name:        self.name,
      description: self.description,
      owner_id:    self.owner_id,
      lifecycle:   decode_lifecycle(self.lifecycle)?,
    })
  }
}

/// Raw values read directly from a `songs` row.
pub struct RawSong {
  pub id:            i64,
  pub title:         String,
  pub artist:        String,
  pub duration_secs: Option<i64>,
  pub pool_id:       Option<i64>,
  pub lifecycle:     RawLifecycle,
}

impl RawSong {
  /// Map a row selected with [`SONG_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      title:         row.get(1)?,
      artist:        row.get(2)?,
      duration_secs: row.get(3)?,
      pool_id:       row.get(4)?,
      lifecycle:     RawLifecycle {
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
        status:     row.get(7)?,
      },
    })
  }

  pub fn into_song(self) -> Result<Song> {
    let duration_secs = self
      .duration_secs
      .map(u32::try_from)
      .transpose()
      .map_err(|e| Error::Decode(format!("song {} duration: {e}", self.id)))?;

    Ok(Song {
      id: Some(self.id),
      title: self.title,
      artist: self.artist,
      duration_secs,
      pool_id: self.pool_id,
      lifecycle: decode_lifecycle(self.lifecycle)?,
    })
  }
}

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub id:        i64,
  pub username:  String,
  pub email:     String,
  pub lifecycle: RawLifecycle,
}

impl RawUser {
  /// Map a row selected with [`USER_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:        row.get(0)?,
      username:  row.get(1)?,
      email:     row.get(2)?,
      lifecycle: RawLifecycle {
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
        status:     row.get(5)?,
      },
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:        Some(self.id),
      username:  self.username,
      email:     self.email,
      lifecycle: decode_lifecycle(self.lifecycle)?,
    })
  }
}
