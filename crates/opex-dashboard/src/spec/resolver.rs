use std::{
  collections::{HashMap, VecDeque},
  path::{Path, PathBuf},
};

use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};
use url::Url;

use super::{
  ResolvedSpec,
  loader::{SpecFormat, SpecLoader},
};
use crate::{
  error::{Error, Result},
  utils::{STDIN_LOCATION, read_stdin},
};

const REF_KEY: &str = "$ref";

/// Parses an OpenAPI document and inlines every `$ref` it contains.
///
/// Nothing is cached: each call to [`SpecResolver::resolve`] reads the source
/// again, so the result only depends on the document as it is on disk.
#[derive(Debug, Clone)]
pub struct SpecResolver {
  location: String,
  base_url: Option<Url>,
}

impl SpecResolver {
  /// `location` is a file path, or `-` for standard input.
  pub fn new(location: impl Into<String>) -> Self {
    Self {
      location: location.into(),
      base_url: None,
    }
  }

  /// Resolves relative references against `base_url` instead of the document location.
  ///
  /// Used for specs downloaded to a temporary file.
  #[must_use]
  pub fn with_base_url(mut self, base_url: Url) -> Self {
    self.base_url = Some(base_url);
    self
  }

  pub async fn resolve(&self) -> Result<ResolvedSpec> {
    let root = self.load_root().await?;
    ensure_openapi_document(&root)?;

    let root_url = self.root_url()?;
    let documents = prefetch_documents(root_url.clone(), root).await?;
    let Some(root) = documents.get(&root_url) else {
      return Err(Error::parse(format!("Unable to load {}", self.location)));
    };

    let inliner = Inliner { documents: &documents };
    let resolved = inliner.inline(root, &root_url, &mut Vec::new())?;
    Ok(ResolvedSpec::new(resolved))
  }

  async fn load_root(&self) -> Result<Value> {
    if self.location == STDIN_LOCATION {
      let bytes = read_stdin()
        .await
        .map_err(|e| Error::parse(format!("Unable to read spec from stdin: {e}")))?;
      return SpecFormat::Unknown.parse(&bytes);
    }
    SpecLoader::open(Path::new(&self.location)).await?.parse()
  }

  fn root_url(&self) -> Result<Url> {
    if let Some(base) = &self.base_url {
      return Ok(base.clone());
    }

    let path = if self.location == STDIN_LOCATION {
      PathBuf::from("stdin")
    } else {
      PathBuf::from(&self.location)
    };
    let absolute = std::path::absolute(&path).map_err(|e| Error::parse(format!("Invalid spec location: {e}")))?;
    Url::from_file_path(&absolute).map_err(|()| Error::parse(format!("Invalid spec location: {}", absolute.display())))
  }
}

fn ensure_openapi_document(root: &Value) -> Result<()> {
  let is_openapi = root
    .as_object()
    .is_some_and(|map| map.contains_key("openapi") || map.contains_key("swagger"));
  if is_openapi {
    Ok(())
  } else {
    Err(Error::parse(
      "document is not an OpenAPI specification: missing \"openapi\" or \"swagger\" version field",
    ))
  }
}

/// Loads every document reachable through external references, breadth first.
async fn prefetch_documents(root_url: Url, root: Value) -> Result<HashMap<Url, Value>> {
  let mut documents = HashMap::new();
  let mut pending = VecDeque::from([(root_url, root)]);

  while let Some((url, document)) = pending.pop_front() {
    let mut references = Vec::new();
    collect_references(&document, &mut references);
    documents.insert(url.clone(), document);

    for reference in references {
      let (location, _) = split_fragment(&reference);
      if location.is_empty() {
        continue;
      }
      let target = document_url(&url, location)?;
      if documents.contains_key(&target) || pending.iter().any(|(queued, _)| queued == &target) {
        continue;
      }
      let document = fetch_document(&target).await?;
      pending.push_back((target, document));
    }
  }

  Ok(documents)
}

fn collect_references(node: &Value, references: &mut Vec<String>) {
  match node {
    Value::Object(map) => {
      if let Some(Value::String(reference)) = map.get(REF_KEY) {
        references.push(reference.clone());
      }
      for value in map.values() {
        collect_references(value, references);
      }
    }
    Value::Array(items) => {
      for item in items {
        collect_references(item, references);
      }
    }
    _ => {}
  }
}

async fn fetch_document(url: &Url) -> Result<Value> {
  match url.scheme() {
    "file" => {
      let path = url
        .to_file_path()
        .map_err(|()| Error::parse(format!("Unable to resolve $ref target {url}")))?;
      SpecLoader::open(&path).await?.parse()
    }
    "http" | "https" => {
      let response = reqwest::get(url.clone())
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| Error::parse(format!("Unable to download {url}: {e}")))?;
      let body = response
        .bytes()
        .await
        .map_err(|e| Error::parse(format!("Unable to download {url}: {e}")))?;
      SpecFormat::from_path(Path::new(url.path())).parse(&body)
    }
    scheme => Err(Error::parse(format!("Unsupported $ref scheme '{scheme}' in {url}"))),
  }
}

fn split_fragment(reference: &str) -> (&str, &str) {
  reference.split_once('#').unwrap_or((reference, ""))
}

fn document_url(base: &Url, location: &str) -> Result<Url> {
  let mut url = base
    .join(location)
    .map_err(|e| Error::parse(format!("Invalid $ref '{location}': {e}")))?;
  url.set_fragment(None);
  Ok(url)
}

struct Inliner<'a> {
  documents: &'a HashMap<Url, Value>,
}

impl Inliner<'_> {
  /// `stack` holds the references being expanded; meeting one again means a cycle.
  fn inline(&self, node: &Value, document: &Url, stack: &mut Vec<String>) -> Result<Value> {
    match node {
      Value::Object(map) => {
        if let Some(Value::String(reference)) = map.get(REF_KEY) {
          return self.inline_reference(map, reference, document, stack);
        }
        let mut inlined = Map::with_capacity(map.len());
        for (key, value) in map {
          inlined.insert(key.clone(), self.inline(value, document, stack)?);
        }
        Ok(Value::Object(inlined))
      }
      Value::Array(items) => items
        .iter()
        .map(|item| self.inline(item, document, stack))
        .collect::<Result<Vec<_>>>()
        .map(Value::Array),
      scalar => Ok(scalar.clone()),
    }
  }

  fn inline_reference(
    &self,
    node: &Map<String, Value>,
    reference: &str,
    document: &Url,
    stack: &mut Vec<String>,
  ) -> Result<Value> {
    let (location, fragment) = split_fragment(reference);
    let target_url = if location.is_empty() {
      document.clone()
    } else {
      document_url(document, location)?
    };
    let pointer = percent_decode_str(fragment)
      .decode_utf8()
      .map_err(|e| Error::parse(format!("Invalid $ref '{reference}': {e}")))?;

    let key = format!("{target_url}#{pointer}");
    if stack.contains(&key) {
      return Ok(Value::Object(node.clone()));
    }

    let target = self
      .documents
      .get(&target_url)
      .and_then(|root| if pointer.is_empty() { Some(root) } else { root.pointer(&pointer) })
      .ok_or_else(|| Error::parse(format!("Unable to resolve $ref '{reference}'")))?;

    stack.push(key);
    let resolved = self.inline(target, &target_url, stack);
    stack.pop();

    let mut resolved = resolved?;
    if let Value::Object(resolved_map) = &mut resolved {
      for (key, value) in node.iter().filter(|(key, _)| key.as_str() != REF_KEY) {
        resolved_map.insert(key.clone(), self.inline(value, document, stack)?);
      }
    }
    Ok(resolved)
  }
}
