//! Core types for the setlist backend.
//!
//! Entities, their lifecycle metadata, the resource registry, named routes,
//! and the normalizers that turn entities into link-decorated JSON. This
//! crate is free of HTTP and database dependencies; the store and API crates
//! build on it.

pub mod entity;
pub mod error;
pub mod lifecycle;
pub mod normalize;
pub mod resource;
pub mod routing;
pub mod store;

pub use error::{Error, Result};
