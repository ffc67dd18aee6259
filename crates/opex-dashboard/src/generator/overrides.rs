use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::context::{Endpoint, QueryConfig, TemplateContext};
use crate::{
  error::{Error, Result},
  utils::EndpointKey,
};

/// User-supplied patch applied onto a [`TemplateContext`] at render time.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overrides {
  pub endpoints: Option<IndexMap<String, Endpoint>>,
  pub hosts: Option<Vec<String>>,
  pub queries: Option<QueryConfig>,
  #[serde(alias = "base_path")]
  pub base_path: Option<String>,
}

impl Overrides {
  /// Returns a copy whose endpoint keys are plain paths.
  #[must_use]
  pub fn normalized(&self) -> Self {
    Self {
      endpoints: self.endpoints.as_ref().map(normalize_keys),
      ..self.clone()
    }
  }

  /// Deep-merges these overrides onto `base`, leaving `base` untouched.
  pub fn apply_to(&self, base: &TemplateContext) -> Result<TemplateContext> {
    let base_value = serde_json::to_value(base).map_err(|e| Error::config(format!("Invalid template context: {e}")))?;
    let patch = serde_json::to_value(self).map_err(|e| Error::config(format!("Invalid overrides: {e}")))?;
    serde_json::from_value(merge(&base_value, &patch)).map_err(|e| Error::config(format!("Invalid overrides: {e}")))
  }
}

/// Re-keys `"METHOD /path"` entries under `/path` and injects the method.
///
/// When two keys normalize to the same path, the later entry wins.
pub fn normalize_keys(endpoints: &IndexMap<String, Endpoint>) -> IndexMap<String, Endpoint> {
  let mut normalized = IndexMap::with_capacity(endpoints.len());
  for (key, endpoint) in endpoints {
    let parsed = EndpointKey::parse(key);
    let mut endpoint = endpoint.clone();
    if let Some(method) = parsed.method {
      endpoint.method = Some(method.to_string());
    }
    normalized.insert(parsed.path.to_string(), endpoint);
  }
  normalized
}

/// Structural deep merge: objects recurse, everything else (arrays included) is replaced.
#[must_use]
pub fn merge(base: &Value, overrides: &Value) -> Value {
  match (base, overrides) {
    (Value::Object(base_map), Value::Object(override_map)) => {
      let mut merged = base_map.clone();
      for (key, value) in override_map {
        let entry = match merged.get(key) {
          Some(existing) => merge(existing, value),
          None => value.clone(),
        };
        merged.insert(key.clone(), entry);
      }
      Value::Object(merged)
    }
    (_, replacement) => replacement.clone(),
  }
}
