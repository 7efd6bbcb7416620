//! Resource-name tokens and the registry of normalizable types.
//!
//! Instead of discovering type names at runtime, each entity type is
//! registered once. The registry is both the allow-list consulted by
//! [`LinkNormalizer`](crate::normalize::LinkNormalizer) and the source of the
//! token used to build route names (`api_get_all_<token>`, `api_get_<token>`).

use std::{any::TypeId, collections::HashMap, sync::Arc};

use crate::{entity::Entity, normalize::LinkBuilder};

/// Derive the resource-name token for an upper-camel-case type name.
///
/// An underscore goes before every uppercase character other than the first,
/// then the whole string is lowercased: `SongAlbum` → `song_album`,
/// `ASong` → `a_song`.
pub fn resource_token(type_name: &str) -> String {
  let mut token = String::with_capacity(type_name.len() + 4);
  for (i, c) in type_name.chars().enumerate() {
    if i > 0 && c.is_uppercase() {
      token.push('_');
    }
    token.extend(c.to_lowercase());
  }
  token
}

/// A registered type: its name, token, and any extra link builders.
#[derive(Clone)]
pub struct ResourceEntry {
  pub type_name: &'static str,
  pub token:     String,
  pub links:     Vec<Arc<dyn LinkBuilder>>,
}

impl ResourceEntry {
  /// Attach an additional link emitted after `up` and `self`.
  pub fn with_link(&mut self, builder: impl LinkBuilder + 'static) -> &mut Self {
    self.links.push(Arc::new(builder));
    self
  }
}

impl std::fmt::Debug for ResourceEntry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ResourceEntry")
      .field("type_name", &self.type_name)
      .field("token", &self.token)
      .field("links", &self.links.iter().map(|l| l.rel()).collect::<Vec<_>>())
      .finish()
  }
}

/// Explicit table from type identity to [`ResourceEntry`].
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
  entries: HashMap<TypeId, ResourceEntry>,
}

impl ResourceRegistry {
  pub fn new() -> Self { Self::default() }

  /// Registry pre-populated with every entity this crate defines.
  pub fn with_entities() -> Self {
    let mut registry = Self::new();
    registry.register::<crate::entity::Pool>();
    registry.register::<crate::entity::Song>();
    registry.register::<crate::entity::User>();
    registry
  }

  /// Register `T`, deriving its token from [`Entity::TYPE_NAME`].
  ///
  /// Registering the same type twice keeps the first entry.
  pub fn register<T: Entity>(&mut self) -> &mut ResourceEntry {
    self
      .entries
      .entry(TypeId::of::<T>())
      .or_insert_with(|| ResourceEntry {
        type_name: T::TYPE_NAME,
        token:     resource_token(T::TYPE_NAME),
        links:     Vec::new(),
      })
  }

  pub fn get(&self, type_id: TypeId) -> Option<&ResourceEntry> {
    self.entries.get(&type_id)
  }

  pub fn contains(&self, type_id: TypeId) -> bool {
    self.entries.contains_key(&type_id)
  }

  pub fn token_of<T: Entity>(&self) -> Option<&str> {
    self.get(TypeId::of::<T>()).map(|e| e.token.as_str())
  }

  pub fn len(&self) -> usize { self.entries.len() }

  pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::entity::{Pool, Song, User};

  #[test]
  fn single_word_has_no_underscore() {
    assert_eq!(resource_token("Song"), "song");
  }

  #[test]
  fn camel_case_is_split() {
    assert_eq!(resource_token("SongAlbum"), "song_album");
    assert_eq!(resource_token("PoolMemberInvite"), "pool_member_invite");
  }

  #[test]
  fn leading_uppercase_gets_no_leading_underscore() {
    assert_eq!(resource_token("ASong"), "a_song");
    assert_eq!(resource_token("S"), "s");
  }

  #[test]
  fn every_uppercase_letter_is_split() {
    assert_eq!(resource_token("HTTPRoute"), "h_t_t_p_route");
  }

  #[test]
  fn empty_and_lowercase_names_pass_through() {
    assert_eq!(resource_token(""), "");
    assert_eq!(resource_token("song"), "song");
  }

  #[test]
  fn registry_derives_tokens() {
    let registry = ResourceRegistry::with_entities();
    assert_eq!(registry.len(), 3);
    assert_eq!(registry.token_of::<Pool>(), Some("pool"));
    assert_eq!(registry.token_of::<Song>(), Some("song"));
    assert_eq!(registry.token_of::<User>(), Some("user"));
  }

  #[test]
  fn unregistered_type_is_absent() {
    let mut registry = ResourceRegistry::new();
    registry.register::<Song>();
    assert!(registry.contains(TypeId::of::<Song>()));
    assert!(!registry.contains(TypeId::of::<Pool>()));
    assert_eq!(registry.token_of::<User>(), None);
  }
}
