//! Anchor slugs for gallery titles.

use std::sync::LazyLock;

use regex::Regex;

/// Anything that is not a word character, whitespace, or hyphen.
static PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));

/// Runs of whitespace and hyphens.
static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s-]+").expect("valid regex"));

/// Turn a title into an anchor slug.
///
/// Lower-cases, drops punctuation, collapses whitespace, and joins the
/// remaining words with single hyphens. Hyphens in the input count as word
/// separators, so `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize(title: &str) -> String {
    let lower = title.to_lowercase();
    let words = PUNCT_RE.replace_all(&lower, "");
    SEPARATOR_RE.replace_all(&words, "-").into_owned()
}
