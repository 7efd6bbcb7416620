//! Named routes shared by the axum router and the link normalizer.
//!
//! Each resource is declared once; both the mounted paths and the
//! [`RouteTable`] entries (`api_get_all_<token>`, `api_get_<token>`, ...) are
//! derived from that declaration.

use serde_json::{Map, Value};
use setlist_core::{
  Error, Result,
  normalize::{Link, LinkBuilder},
  routing::{RouteParams, RouteResolver, RouteTable},
};

/// Where a resource is mounted.
#[derive(Debug, Clone, Copy)]
pub struct ResourceRoutes {
  /// Resource-name token, as derived from the entity's type name.
  pub token:      &'static str,
  /// Collection path; members live at `<collection>/{id}`.
  pub collection: &'static str,
}

impl ResourceRoutes {
  pub fn member(&self) -> String { format!("{}/{{id}}", self.collection) }
}

pub const POOLS: ResourceRoutes = ResourceRoutes { token: "pool", collection: "/api/pools" };
pub const SONGS: ResourceRoutes = ResourceRoutes { token: "song", collection: "/api/songs" };
pub const USERS: ResourceRoutes = ResourceRoutes { token: "user", collection: "/api/users" };

pub const RESOURCES: [ResourceRoutes; 3] = [POOLS, SONGS, USERS];

pub const POOL_SONGS_ROUTE: &str = "api_get_pool_songs";
pub const POOL_SONGS_PATH: &str = "/api/pools/{id}/songs";

/// Every named route the API mounts.
pub fn route_table() -> RouteTable {
  let mut table = RouteTable::new();
  for r in RESOURCES {
    let member = r.member();
    table.insert(format!("api_get_all_{}", r.token), r.collection);
    table.insert(format!("api_post_{}", r.token), r.collection);
    table.insert(format!("api_get_{}", r.token), member.clone());
    table.insert(format!("api_put_{}", r.token), member);
  }
  table.insert(POOL_SONGS_ROUTE, POOL_SONGS_PATH);
  table
}

/// `songs`: the songs collected in a pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoolSongsLink;

impl LinkBuilder for PoolSongsLink {
  fn rel(&self) -> &str { "songs" }

  fn build(
    &self,
    _token: &str,
    fields: &Map<String, Value>,
    routes: &dyn RouteResolver,
  ) -> Result<Link> {
    let id = fields
      .get("id")
      .cloned()
      .ok_or_else(|| Error::MissingField("id".to_owned()))?;
    let mut params = RouteParams::new();
    params.insert("id".to_owned(), id);
    Ok(Link::get(routes.resolve(POOL_SONGS_ROUTE, &params)?))
  }
}

#[cfg(test)]
mod tests {
  use setlist_core::resource::resource_token;

  use super::*;

  #[test]
  fn tokens_match_entity_type_names() {
    assert_eq!(POOLS.token, resource_token("Pool"));
    assert_eq!(SONGS.token, resource_token("Song"));
    assert_eq!(USERS.token, resource_token("User"));
  }

  #[test]
  fn table_names_every_resource_route() {
    let table = route_table();
    for r in RESOURCES {
      for prefix in ["api_get_all_", "api_get_", "api_post_", "api_put_"] {
        assert!(table.contains(&format!("{prefix}{}", r.token)), "{prefix}{}", r.token);
      }
    }
    assert_eq!(table.template("api_get_song"), Some("/api/songs/{id}"));
    assert_eq!(table.template("api_get_all_user"), Some("/api/users"));
  }
}
