//! Named routes and path generation.
//!
//! A [`RouteTable`] maps route names (`api_get_song`) to path templates
//! (`/api/songs/{id}`). Lookups are read-only, so one table can be shared
//! across requests behind an `Arc`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Parameters substituted into a path template.
pub type RouteParams = Map<String, Value>;

/// Turns a route name and parameters into a path.
pub trait RouteResolver: Send + Sync {
  /// Fails with [`Error::RouteNotFound`] when `name` is not registered.
  fn resolve(&self, name: &str, params: &RouteParams) -> Result<String>;
}

/// In-memory route table; the default [`RouteResolver`].
///
/// Deserializes from a plain `name = "template"` map, so routes can come from
/// configuration as well as code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTable {
  routes: HashMap<String, String>,
}

impl RouteTable {
  pub fn new() -> Self { Self::default() }

  /// Add or replace the template for `name`.
  pub fn insert(&mut self, name: impl Into<String>, template: impl Into<String>) {
    self.routes.insert(name.into(), template.into());
  }

  /// Builder-style [`insert`](Self::insert).
  pub fn with(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
    self.insert(name, template);
    self
  }

  pub fn template(&self, name: &str) -> Option<&str> {
    self.routes.get(name).map(String::as_str)
  }

  pub fn contains(&self, name: &str) -> bool { self.routes.contains_key(name) }

  pub fn len(&self) -> usize { self.routes.len() }

  pub fn is_empty(&self) -> bool { self.routes.is_empty() }
}

impl RouteResolver for RouteTable {
  fn resolve(&self, name: &str, params: &RouteParams) -> Result<String> {
    let template = self
      .template(name)
      .ok_or_else(|| Error::RouteNotFound(name.to_owned()))?;
    expand(name, template, params)
  }
}

/// Substitute every `{param}` placeholder in `template`.
///
/// Parameters the template does not mention are ignored.
fn expand(route: &str, template: &str, params: &RouteParams) -> Result<String> {
  let mut path = String::with_capacity(template.len());
  let mut rest = template;

  while let Some(open) = rest.find('{') {
    let Some(close) = rest[open..].find('}').map(|c| open + c) else {
      break;
    };
    path.push_str(&rest[..open]);

    let param = &rest[open + 1..close];
    let value = params.get(param).ok_or_else(|| Error::MissingRouteParameter {
      route: route.to_owned(),
      param: param.to_owned(),
    })?;
    match value {
      Value::String(s) => path.push_str(s),
      Value::Number(n) => path.push_str(&n.to_string()),
      _ => {
        return Err(Error::InvalidRouteParameter {
          route: route.to_owned(),
          param: param.to_owned(),
        });
      }
    }

    rest = &rest[close + 1..];
  }

  path.push_str(rest);
  Ok(path)
}
