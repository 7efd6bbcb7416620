//! SQL schema for the setlist SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Every table carries the lifecycle columns. `created_at` is written by
/// `INSERT` only; no `UPDATE` issued by the store touches it.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT NOT NULL,
    email       TEXT NOT NULL,
    created_at  TEXT NOT NULL,   -- RFC 3339 UTC
    updated_at  TEXT NOT NULL,
    status      TEXT NOT NULL DEFAULT 'active' CHECK (status != '')
);

CREATE TABLE IF NOT EXISTS pools (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    description TEXT,
    owner_id    INTEGER REFERENCES users(id),
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    status      TEXT NOT NULL DEFAULT 'active' CHECK (status != '')
);

CREATE TABLE IF NOT EXISTS songs (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    title         TEXT NOT NULL,
    artist        TEXT NOT NULL,
    duration_secs INTEGER,
    pool_id       INTEGER REFERENCES pools(id),
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    status        TEXT NOT NULL DEFAULT 'active' CHECK (status != '')
);

CREATE INDEX IF NOT EXISTS songs_pool_idx  ON songs(pool_id);
CREATE INDEX IF NOT EXISTS pools_owner_idx ON pools(owner_id);

PRAGMA user_version = 1;
";
