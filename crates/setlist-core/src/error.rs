//! Error types for `setlist-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("route not found: {0}")]
  RouteNotFound(String),

  #[error("missing field in normalized data: {0}")]
  MissingField(String),

  #[error("route {route:?} requires parameter {param:?}")]
  MissingRouteParameter { route: String, param: String },

  #[error("parameter {param:?} of route {route:?} must be a string or number")]
  InvalidRouteParameter { route: String, param: String },

  #[error("{0} did not serialize to an object")]
  NotAnObject(String),

  #[error("no normalizer supports {type_name} in format {format:?}")]
  UnsupportedFormat { type_name: String, format: String },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
