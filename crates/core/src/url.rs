//! Reference link normalization for furniture and decoration items.

use std::sync::LazyLock;

use regex::Regex;

/// Scheme prefix added to links entered without one.
pub const DEFAULT_SCHEME_PREFIX: &str = "https://";

/// `scheme://` per RFC 3986: a letter followed by letters, digits, `+`, `-` or `.`.
static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("valid regex"));

/// Returns `true` if the link already starts with a `scheme://` prefix.
pub fn has_scheme(url: &str) -> bool {
    SCHEME_RE.is_match(url)
}

/// Normalize a user-entered link.
///
/// Surrounding whitespace is trimmed. A blank link yields `None`; a link
/// without a scheme gets [`DEFAULT_SCHEME_PREFIX`] in place of any leading
/// `//`; a link that already has one is returned unchanged.
pub fn normalize_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if has_scheme(trimmed) {
        Some(trimmed.to_string())
    } else {
        let rest = trimmed.strip_prefix("//").unwrap_or(trimmed);
        Some(format!("{DEFAULT_SCHEME_PREFIX}{rest}"))
    }
}
