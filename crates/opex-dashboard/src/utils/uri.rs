use std::sync::LazyLock;

use regex::Regex;

static PATH_PARAM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[^/]+\}").unwrap());
static MULTI_SLASH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"/{2,}").unwrap());

/// Turns a templated path into an end-anchored regex for log queries.
///
/// Each `{param}` segment becomes `[^/]+`, so an empty segment never matches.
pub(crate) fn uri_to_regex(uri: &str) -> String {
  format!("{}$", PATH_PARAM_RE.replace_all(uri, "[^/]+"))
}

/// Joins a server path prefix with a path key from the spec.
///
/// Slash collisions at the join point collapse to one slash, a trailing slash on
/// the path key is preserved, and the result always starts with `/`.
pub(crate) fn join_paths(prefix: &str, path: &str) -> String {
  let prefix = if prefix.is_empty() { "/" } else { prefix };
  let path = path.strip_prefix('/').unwrap_or(path);
  let joined = format!("{prefix}/{path}");
  let collapsed = MULTI_SLASH_RE.replace_all(&joined, "/");

  let mut normalized = if collapsed.starts_with('/') {
    collapsed.into_owned()
  } else {
    format!("/{collapsed}")
  };

  if path.is_empty() && normalized.len() > 1 && !prefix.ends_with('/') {
    normalized.pop();
  }
  normalized
}
