//! Entity normalization with HATEOAS-style `_links`.
//!
//! A [`Serializer`] holds an ordered list of [`Normalizer`]s and hands each
//! value to the first one whose [`Normalizer::supports`] predicate accepts
//! it. The default chain is a [`LinkNormalizer`] (registered entities in the
//! `json` format) followed by the plain [`ObjectNormalizer`].
//!
//! ```text
//! {
//!   "id": 42,
//!   "title": "...",
//!   "_links": {
//!     "up":   { "method": ["GET"], "path": "/api/songs" },
//!     "self": { "method": ["GET"], "path": "/api/songs/42" }
//!   }
//! }
//! ```

use std::{any::TypeId, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
  Error, Result,
  entity::Entity,
  resource::ResourceRegistry,
  routing::{RouteParams, RouteResolver},
};

/// The only format [`LinkNormalizer`] decorates.
pub const JSON_FORMAT: &str = "json";

/// Key under which links are attached.
pub const LINKS_KEY: &str = "_links";

/// Context key holding an array of field names to drop from the output.
pub const IGNORED_ATTRIBUTES: &str = "ignored_attributes";

/// Free-form options passed through the normalizer chain.
pub type Context = Map<String, Value>;

// ─── Normalizable values ─────────────────────────────────────────────────────

/// Object-safe view of an entity for the normalizer chain.
pub trait Normalize: Send + Sync {
  fn type_name(&self) -> &'static str;

  /// Identity used for allow-list lookups.
  fn resource_type(&self) -> TypeId;

  /// The generic field mapping, in declaration order.
  fn fields(&self) -> Result<Map<String, Value>>;
}

impl<T: Entity> Normalize for T {
  fn type_name(&self) -> &'static str { T::TYPE_NAME }

  fn resource_type(&self) -> TypeId { TypeId::of::<T>() }

  fn fields(&self) -> Result<Map<String, Value>> {
    match serde_json::to_value(self)? {
      Value::Object(map) => Ok(map),
      _ => Err(Error::NotAnObject(T::TYPE_NAME.to_owned())),
    }
  }
}

// ─── Links ───────────────────────────────────────────────────────────────────

/// One navigation entry: the allowed HTTP verbs and the target path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
  pub method: Vec<String>,
  pub path:   String,
}

impl Link {
  pub fn get(path: impl Into<String>) -> Self {
    Self { method: vec!["GET".to_owned()], path: path.into() }
  }
}

/// Builds one named link for a normalized entity.
///
/// `up` and `self` are always emitted; further builders are attached per type
/// through [`ResourceEntry::with_link`](crate::resource::ResourceEntry::with_link).
pub trait LinkBuilder: Send + Sync {
  /// Name of the link inside `_links`.
  fn rel(&self) -> &str;

  fn build(
    &self,
    token: &str,
    fields: &Map<String, Value>,
    routes: &dyn RouteResolver,
  ) -> Result<Link>;
}

/// `up`: the collection endpoint, `api_get_all_<token>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpLink;

impl LinkBuilder for UpLink {
  fn rel(&self) -> &str { "up" }

  fn build(
    &self,
    token: &str,
    _fields: &Map<String, Value>,
    routes: &dyn RouteResolver,
  ) -> Result<Link> {
    let path = routes.resolve(&format!("api_get_all_{token}"), &RouteParams::new())?;
    Ok(Link::get(path))
  }
}

/// `self`: the single-resource endpoint, `api_get_<token>` with `id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfLink;

impl LinkBuilder for SelfLink {
  fn rel(&self) -> &str { "self" }

  fn build(
    &self,
    token: &str,
    fields: &Map<String, Value>,
    routes: &dyn RouteResolver,
  ) -> Result<Link> {
    let id = match fields.get("id") {
      Some(Value::Null) | None => return Err(Error::MissingField("id".to_owned())),
      Some(id) => id.clone(),
    };
    let mut params = RouteParams::new();
    params.insert("id".to_owned(), id);
    let path = routes.resolve(&format!("api_get_{token}"), &params)?;
    Ok(Link::get(path))
  }
}

// ─── Normalizers ─────────────────────────────────────────────────────────────

/// One candidate in the [`Serializer`] chain.
pub trait Normalizer: Send + Sync {
  /// Pure applicability predicate; must not inspect anything but its inputs.
  fn supports(&self, data: &dyn Normalize, format: &str) -> bool;

  fn normalize(
    &self,
    data: &dyn Normalize,
    format: &str,
    context: &Context,
  ) -> Result<Map<String, Value>>;
}

/// The generic serializer: an entity's fields, nothing more.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectNormalizer;

impl Normalizer for ObjectNormalizer {
  fn supports(&self, _data: &dyn Normalize, _format: &str) -> bool { true }

  fn normalize(
    &self,
    data: &dyn Normalize,
    _format: &str,
    context: &Context,
  ) -> Result<Map<String, Value>> {
    let mut fields = data.fields()?;
    if let Some(Value::Array(ignored)) = context.get(IGNORED_ATTRIBUTES) {
      fields.retain(|key, _| !ignored.iter().any(|i| i.as_str() == Some(key.as_str())));
    }
    Ok(fields)
  }
}

/// Decorates registered entities with `_links` when normalizing to `json`.
pub struct LinkNormalizer<R> {
  inner:    ObjectNormalizer,
  routes:   Arc<R>,
  registry: Arc<ResourceRegistry>,
}

impl<R: RouteResolver> LinkNormalizer<R> {
  pub fn new(routes: Arc<R>, registry: Arc<ResourceRegistry>) -> Self {
    Self { inner: ObjectNormalizer, routes, registry }
  }

  /// Build every link for `data`, failing as a whole if any one fails.
  fn links(&self, data: &dyn Normalize, fields: &Map<String, Value>) -> Result<Map<String, Value>> {
    let entry = self
      .registry
      .get(data.resource_type())
      .ok_or_else(|| Error::UnsupportedFormat {
        type_name: data.type_name().to_owned(),
        format:    JSON_FORMAT.to_owned(),
      })?;

    let builders: [&dyn LinkBuilder; 2] = [&UpLink, &SelfLink];
    let extra = entry.links.iter().map(|b| &**b);

    let mut links = Map::new();
    for builder in builders.into_iter().chain(extra) {
      let link = builder.build(&entry.token, fields, self.routes.as_ref())?;
      links.insert(builder.rel().to_owned(), serde_json::to_value(link)?);
    }

    tracing::debug!(resource = %entry.token, count = links.len(), "built links");
    Ok(links)
  }
}

impl<R: RouteResolver> Normalizer for LinkNormalizer<R> {
  fn supports(&self, data: &dyn Normalize, format: &str) -> bool {
    format == JSON_FORMAT && self.registry.contains(data.resource_type())
  }

  fn normalize(
    &self,
    data: &dyn Normalize,
    format: &str,
    context: &Context,
  ) -> Result<Map<String, Value>> {
    let mut fields = self.inner.normalize(data, format, context)?;
    let links = self.links(data, &fields)?;
    fields.insert(LINKS_KEY.to_owned(), Value::Object(links));
    Ok(fields)
  }
}

// ─── Dispatcher ──────────────────────────────────────────────────────────────

/// Ordered normalizer chain; the first supporting normalizer wins.
pub struct Serializer {
  normalizers: Vec<Box<dyn Normalizer>>,
}

impl Serializer {
  /// The default chain: links for registered entities, then plain fields.
  pub fn new<R: RouteResolver + 'static>(
    routes: Arc<R>,
    registry: Arc<ResourceRegistry>,
  ) -> Self {
    let normalizers: Vec<Box<dyn Normalizer>> = vec![
      Box::new(LinkNormalizer::new(routes, registry)),
      Box::new(ObjectNormalizer),
    ];
    Self::with_normalizers(normalizers)
  }

  pub fn with_normalizers(normalizers: Vec<Box<dyn Normalizer>>) -> Self {
    Self { normalizers }
  }

  pub fn normalize(
    &self,
    data: &dyn Normalize,
    format: &str,
    context: &Context,
  ) -> Result<Value> {
    let normalizer = self
      .normalizers
      .iter()
      .find(|n| n.supports(data, format))
      .ok_or_else(|| Error::UnsupportedFormat {
        type_name: data.type_name().to_owned(),
        format:    format.to_owned(),
      })?;
    normalizer.normalize(data, format, context).map(Value::Object)
  }

  pub fn normalize_all<T: Entity>(
    &self,
    items: &[T],
    format: &str,
    context: &Context,
  ) -> Result<Vec<Value>> {
    items
      .iter()
      .map(|item| self.normalize(item, format, context))
      .collect()
  }
}
