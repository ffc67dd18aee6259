use indexmap::IndexMap;
use itertools::Itertools;
use serde_json::Value;
use url::Url;

use super::context::{Endpoint, EvaluationDefaults};
use crate::{
  error::{Error, Result},
  spec::{ResolvedSpec, SpecShape},
  utils::join_paths,
};

const HTTP_METHODS: [&str; 8] = ["delete", "get", "head", "options", "patch", "post", "put", "trace"];

/// Hosts and endpoints derived from a resolved spec.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
  pub hosts: Vec<String>,
  pub endpoints: IndexMap<String, Endpoint>,
}

struct ServerTarget {
  host: Option<String>,
  path_prefix: String,
}

/// Walks the server declarations and path table of `spec`.
///
/// Endpoints are keyed by their full path (server prefix included) in server
/// order, then path order; the first server producing a path wins. Thresholds
/// are copied as given so an unset threshold stays unset.
pub fn extract(
  spec: &ResolvedSpec,
  evaluation: &EvaluationDefaults,
  availability_threshold: Option<f64>,
  response_time_threshold: Option<f64>,
) -> Result<Extraction> {
  let shape = SpecShape::detect(spec)?;
  let targets = shape
    .server_urls()
    .iter()
    .map(String::as_str)
    .map(parse_server)
    .collect::<Result<Vec<_>>>()?;

  let hosts = targets
    .iter()
    .filter_map(|target| target.host.clone())
    .unique()
    .collect::<Vec<_>>();
  if hosts.is_empty() {
    return Err(Error::config(
      "OpenAPI spec servers declare no host. Use absolute server URLs or override \"hosts\".",
    ));
  }

  let defaults = Endpoint::with_defaults(evaluation, availability_threshold, response_time_threshold);
  let mut endpoints = IndexMap::new();
  for target in &targets {
    for (path, item) in shape.paths() {
      if !declares_operation(item) {
        continue;
      }
      endpoints
        .entry(join_paths(&target.path_prefix, path))
        .or_insert_with(|| defaults.clone());
    }
  }

  if endpoints.is_empty() {
    return Err(Error::config(
      "OpenAPI spec declares no HTTP operations. Cannot generate dashboard without endpoints.",
    ));
  }

  Ok(Extraction { hosts, endpoints })
}

fn declares_operation(item: &Value) -> bool {
  item
    .as_object()
    .is_some_and(|operations| operations.keys().any(|key| HTTP_METHODS.contains(&key.to_ascii_lowercase().as_str())))
}

fn parse_server(raw: &str) -> Result<ServerTarget> {
  if raw.starts_with('/') {
    return Ok(ServerTarget {
      host: None,
      path_prefix: raw.split(['?', '#']).next().unwrap_or_default().to_string(),
    });
  }

  let absolute = if raw.starts_with("http://") || raw.starts_with("https://") {
    raw.to_string()
  } else {
    format!("https://{raw}")
  };
  let url = Url::parse(&absolute).map_err(|e| Error::config(format!("Invalid server URL '{raw}': {e}")))?;

  let host = url.host_str().map(|host| match url.port() {
    Some(port) => format!("{host}:{port}"),
    None => host.to_string(),
  });

  Ok(ServerTarget {
    host,
    path_prefix: url.path().to_string(),
  })
}
