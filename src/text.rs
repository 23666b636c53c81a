//! Text normalisation shared by the accent-insensitive filters and search.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use deunicode::deunicode;

static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new("<[^>]*>").unwrap());

/// Transliterates to ASCII and lowercases, so `"Hóa Học"` and `"hoa hoc"`
/// fold to the same value.
pub fn fold(input: &str) -> String {
    deunicode(input).to_lowercase()
}

pub fn strip_html(input: &str) -> Cow<'_, str> {
    if HTML_TAG_RE.is_match(input) {
        Cow::Owned(HTML_TAG_RE.replace_all(input, "").to_string())
    } else {
        Cow::Borrowed(input)
    }
}

/// Folded plain text of an HTML fragment, as stored for full-text search.
pub fn fold_html(input: &str) -> String {
    fold(&strip_html(input))
}
