pub mod download;
pub mod loader;
pub mod resolver;
pub mod shape;

use serde_json::Value;

pub use download::download_spec;
pub use resolver::SpecResolver;
pub use shape::SpecShape;

/// A fully dereferenced OpenAPI document.
///
/// Built once per resolution and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSpec(Value);

impl ResolvedSpec {
  #[must_use]
  pub fn new(document: Value) -> Self {
    Self(document)
  }

  #[must_use]
  pub fn as_value(&self) -> &Value {
    &self.0
  }
}
