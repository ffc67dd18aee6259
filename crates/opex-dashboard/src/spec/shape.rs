use oas3::spec::Server;
use serde_json::{Map, Value};

use super::ResolvedSpec;
use crate::error::{Error, Result};

/// Host declarations of a resolved document, decided once after parsing.
#[derive(Debug, Clone)]
pub enum SpecShape<'a> {
  /// Swagger 2.0: a single implicit server built from `host` and `basePath`.
  Oa2 {
    host: &'a str,
    base_path: &'a str,
    paths: &'a Map<String, Value>,
  },
  /// OpenAPI 3.x: one or more `servers` entries.
  Oa3 {
    servers: Vec<Server>,
    paths: &'a Map<String, Value>,
  },
}

impl<'a> SpecShape<'a> {
  pub fn detect(spec: &'a ResolvedSpec) -> Result<Self> {
    let document = spec.as_value();

    let servers = match document.get("servers") {
      Some(Value::Array(servers)) if !servers.is_empty() => Some(
        serde_json::from_value::<Vec<Server>>(Value::Array(servers.clone()))
          .map_err(|e| Error::config(format!("Invalid \"servers\" declaration: {e}")))?,
      ),
      _ => None,
    };
    let host = document
      .get("host")
      .and_then(Value::as_str)
      .filter(|host| !host.is_empty());

    if servers.is_none() && host.is_none() {
      return Err(Error::config(
        "OpenAPI spec must have either \"servers\" (OA3) or \"host\" (OA2) defined",
      ));
    }

    let paths = document
      .get("paths")
      .and_then(Value::as_object)
      .filter(|paths| !paths.is_empty())
      .ok_or_else(|| {
        Error::config("OpenAPI spec has no paths defined. Cannot generate dashboard for empty specification.")
      })?;

    if let Some(servers) = servers {
      return Ok(Self::Oa3 { servers, paths });
    }

    Ok(Self::Oa2 {
      host: host.unwrap_or_default(),
      base_path: document.get("basePath").and_then(Value::as_str).unwrap_or_default(),
      paths,
    })
  }

  #[must_use]
  pub fn paths(&self) -> &'a Map<String, Value> {
    match self {
      Self::Oa2 { paths, .. } | Self::Oa3 { paths, .. } => paths,
    }
  }

  /// Server URLs with `{variable}` placeholders replaced by their defaults.
  #[must_use]
  pub fn server_urls(&self) -> Vec<String> {
    match self {
      Self::Oa2 { host, base_path, .. } => vec![format!("{host}{base_path}")],
      Self::Oa3 { servers, .. } => servers
        .iter()
        .map(|server| {
          server
            .variables
            .iter()
            .fold(server.url.clone(), |url, (name, variable)| {
              url.replace(&format!("{{{name}}}"), &variable.default)
            })
        })
        .collect(),
    }
  }
}
