/// An override key split into its optional HTTP method and its path.
///
/// Keys take either the `"METHOD /path"` form (for example `"GET /users"`) or the
/// plain `"/path"` form. The first space separates a method only when it follows
/// at least one character and is followed by a `/`, so parsing a path again
/// never strips anything from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EndpointKey<'a> {
  pub method: Option<&'a str>,
  pub path: &'a str,
}

impl<'a> EndpointKey<'a> {
  pub fn parse(key: &'a str) -> Self {
    match key.find(' ') {
      Some(index) if index > 0 && key[index + 1..].starts_with('/') => Self {
        method: Some(&key[..index]),
        path: &key[index + 1..],
      },
      _ => Self { method: None, path: key },
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_method_and_path() {
    let key = EndpointKey::parse("GET /users");
    assert_eq!(key.method, Some("GET"));
    assert_eq!(key.path, "/users");
  }

  #[test]
  fn test_parse_plain_path() {
    let key = EndpointKey::parse("/users/{id}");
    assert_eq!(key.method, None);
    assert_eq!(key.path, "/users/{id}");
  }

  #[test]
  fn test_parse_splits_at_first_space_only() {
    let key = EndpointKey::parse("POST /search items");
    assert_eq!(key.method, Some("POST"));
    assert_eq!(key.path, "/search items");
  }

  #[test]
  fn test_parse_path_with_space_is_not_a_method() {
    let key = EndpointKey::parse("/search items");
    assert_eq!(key.method, None);
    assert_eq!(key.path, "/search items");

    let key = EndpointKey::parse("search items");
    assert_eq!(key.method, None);
    assert_eq!(key.path, "search items");
  }

  #[test]
  fn test_parse_leading_space_is_not_a_method() {
    let key = EndpointKey::parse(" /users");
    assert_eq!(key.method, None);
    assert_eq!(key.path, " /users");
  }
}
