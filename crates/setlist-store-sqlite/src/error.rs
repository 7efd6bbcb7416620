//! Error type for `setlist-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// An entity reached the store without the lifecycle hook having run.
  #[error("lifecycle field {0} is unset")]
  Unstamped(&'static str),

  /// A stored value could not be mapped back onto its Rust type.
  #[error("decode error: {0}")]
  Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
