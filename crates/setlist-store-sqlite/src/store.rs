//! [`SqliteStore`] — the SQLite implementation of [`EntityStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use setlist_core::{
  entity::{Entity, Pool, Song, User},
  store::EntityStore,
};

use crate::{
  Error, Result,
  encode::{
    POOL_COLUMNS, RawPool, RawSong, RawUser, SONG_COLUMNS, USER_COLUMNS,
    encode_lifecycle,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A setlist store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Prepare a new row: drop caller-supplied timestamps, then run the
/// pre-insert hook. The status is kept.
fn stage_insert<E: Entity>(entity: &mut E) {
  let meta = entity.lifecycle_mut();
  meta.created_at = None;
  meta.updated_at = None;
  entity.before_insert();
}

/// Prepare `incoming` to replace `existing` with id `id`.
///
/// Carries over the stored `created_at`, keeps the stored status when the
/// caller sent none, then runs the pre-update hook.
fn stage_update<E: Entity>(id: i64, incoming: &mut E, existing: &E) {
  let stored = existing.lifecycle();
  let meta = incoming.lifecycle_mut();
  meta.created_at = stored.created_at;
  if meta.status.trim().is_empty() {
    meta.status = stored.status.clone();
  }
  incoming.before_update();
  tracing::debug!(resource = E::TYPE_NAME, id, "staged update");
}

// ─── EntityStore impl ────────────────────────────────────────────────────────

impl EntityStore for SqliteStore {
  type Error = Error;

  // ── Pools ─────────────────────────────────────────────────────────────────

  async fn create_pool(&self, mut pool: Pool) -> Result<Pool> {
    stage_insert(&mut pool);

    let meta        = encode_lifecycle(&pool.lifecycle)?;
    let name        = pool.name.clone();
    let description = pool.description.clone();
    let owner_id    = pool.owner_id;

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO pools (name, description, owner_id, created_at, updated_at, status)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            name,
            description,
            owner_id,
            meta.created_at,
            meta.updated_at,
            meta.status,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(id, "inserted pool");
    pool.id = Some(id);
    Ok(pool)
  }

  async fn get_pool(&self, id: i64) -> Result<Option<Pool>> {
    let raw: Option<RawPool> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {POOL_COLUMNS} FROM pools WHERE id = ?1"),
            rusqlite::params![id],
            RawPool::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawPool::into_pool).transpose()
  }

  async fn list_pools(&self) -> Result<Vec<Pool>> {
    let raws: Vec<RawPool> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("SELECT {POOL_COLUMNS} FROM pools ORDER BY id"))?;
        let rows = stmt
          .query_map([], RawPool::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPool::into_pool).collect()
  }

  async fn update_pool(&self, id: i64, mut pool: Pool) -> Result<Option<Pool>> {
    let Some(existing) = self.get_pool(id).await? else {
      return Ok(None);
    };
    stage_update(id, &mut pool, &existing);
    pool.id = Some(id);

    let meta        = encode_lifecycle(&pool.lifecycle)?;
    let name        = pool.name.clone();
    let description = pool.description.clone();
    let owner_id    = pool.owner_id;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE pools
             SET name = ?1, description = ?2, owner_id = ?3, updated_at = ?4, status = ?5
           WHERE id = ?6",
          rusqlite::params![name, description, owner_id, meta.updated_at, meta.status, id],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(id, "updated pool");
    Ok(Some(pool))
  }

  // ── Songs ─────────────────────────────────────────────────────────────────

  async fn create_song(&self, mut song: Song) -> Result<Song> {
    stage_insert(&mut song);

    let meta          = encode_lifecycle(&song.lifecycle)?;
    let title         = song.title.clone();
    let artist        = song.artist.clone();
    let duration_secs = song.duration_secs.map(i64::from);
    let pool_id       = song.pool_id;

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO songs (title, artist, duration_secs, pool_id, created_at, updated_at, status)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            title,
            artist,
            duration_secs,
            pool_id,
            meta.created_at,
            meta.updated_at,
            meta.status,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(id, "inserted song");
    song.id = Some(id);
    Ok(song)
  }

  async fn get_song(&self, id: i64) -> Result<Option<Song>> {
    let raw: Option<RawSong> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {SONG_COLUMNS} FROM songs WHERE id = ?1"),
            rusqlite::params![id],
            RawSong::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSong::into_song).transpose()
  }

  async fn list_songs(&self) -> Result<Vec<Song>> {
    let raws: Vec<RawSong> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("SELECT {SONG_COLUMNS} FROM songs ORDER BY id"))?;
        let rows = stmt
          .query_map([], RawSong::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSong::into_song).collect()
  }

  async fn list_songs_in_pool(&self, pool_id: i64) -> Result<Vec<Song>> {
    let raws: Vec<RawSong> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SONG_COLUMNS} FROM songs WHERE pool_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![pool_id], RawSong::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSong::into_song).collect()
  }

  async fn update_song(&self, id: i64, mut song: Song) -> Result<Option<Song>> {
    let Some(existing) = self.get_song(id).await? else {
      return Ok(None);
    };
    stage_update(id, &mut song, &existing);
    song.id = Some(id);

    let meta          = encode_lifecycle(&song.lifecycle)?;
    let title         = song.title.clone();
    let artist        = song.artist.clone();
    let duration_secs = song.duration_secs.map(i64::from);
    let pool_id       = song.pool_id;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE songs
             SET title = ?1, artist = ?2, duration_secs = ?3, pool_id = ?4,
                 updated_at = ?5, status = ?6
           WHERE id = ?7",
          rusqlite::params![
            title,
            artist,
            duration_secs,
            pool_id,
            meta.updated_at,
            meta.status,
            id,
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(id, "updated song");
    Ok(Some(song))
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, mut user: User) -> Result<User> {
    stage_insert(&mut user);

    let meta     = encode_lifecycle(&user.lifecycle)?;
    let username = user.username.clone();
    let email    = user.email.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (username, email, created_at, updated_at, status)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![username, email, meta.created_at, meta.updated_at, meta.status],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(id, "inserted user");
    user.id = Some(id);
    Ok(user)
  }

  async fn get_user(&self, id: i64) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            rusqlite::params![id],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))?;
        let rows = stmt
          .query_map([], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn update_user(&self, id: i64, mut user: User) -> Result<Option<User>> {
    let Some(existing) = self.get_user(id).await? else {
      return Ok(None);
    };
    stage_update(id, &mut user, &existing);
    user.id = Some(id);

    let meta     = encode_lifecycle(&user.lifecycle)?;
    let username = user.username.clone();
    let email    = user.email.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET username = ?1, email = ?2, updated_at = ?3, status = ?4
           WHERE id = ?5",
          rusqlite::params![username, email, meta.updated_at, meta.status, id],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(id, "updated user");
    Ok(Some(user))
  }
}
