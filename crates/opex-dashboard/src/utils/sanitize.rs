use std::sync::LazyLock;

use any_ascii::any_ascii;
use regex::Regex;

static FORBIDDEN_CHARS_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"[{}\[\]()<>@#$%^&*+=|\\;:'",.?/`~]"#).unwrap());

/// Removes punctuation that Azure rejects in resource names.
///
/// Alphanumerics, hyphens, underscores and whitespace are kept as-is.
pub(crate) fn sanitize_name(name: &str) -> String {
  FORBIDDEN_CHARS_RE.replace_all(name, "").into_owned()
}

/// Converts a dashboard display name into the identifier used for Terraform resources.
///
/// # Rules:
/// 1. Transliterates to ASCII.
/// 2. Replaces every space with `_`.
/// 3. Strips the punctuation rejected by [`sanitize_name`].
pub(crate) fn resource_name(display_name: &str) -> String {
  let ascii = any_ascii(display_name);
  sanitize_name(&ascii.replace(' ', "_"))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_sanitize_name_strips_punctuation() {
    assert_eq!(sanitize_name("my {api} [v1] (beta)"), "my api v1 beta");
    assert_eq!(sanitize_name("a@b#c$d%e^f&g*h+i=j|k"), "abcdefghijk");
    assert_eq!(sanitize_name(r#"q\u;o:t'e"s,.?/`~"#), "quotes");
  }

  #[test]
  fn test_sanitize_name_keeps_identifier_chars() {
    assert_eq!(sanitize_name("io-app_backend-01"), "io-app_backend-01");
  }

  #[test]
  fn test_resource_name() {
    assert_eq!(resource_name("My Dashboard"), "My_Dashboard");
    assert_eq!(resource_name("PagoPA (Checkout) API"), "PagoPA_Checkout_API");
    assert_eq!(resource_name("Città Servizi"), "Citta_Servizi");
  }
}
