//! Text cleaner for scraped page content.
//!
//! Strips HTML-tag-like spans, URLs, and non-word punctuation, collapses
//! whitespace, and lowercases. The output is what the extraction prompt sees.

use std::sync::LazyLock;

use regex::Regex;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*?>").expect("hardcoded regex is valid"));
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+|www\.\S+").expect("hardcoded regex is valid"));
static PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s.,!?]").expect("hardcoded regex is valid"));
static WS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("hardcoded regex is valid"));

/// Total function over any input; the empty string cleans to itself.
/// Idempotent: cleaning already-clean text is a no-op.
pub fn clean_text(text: &str) -> String {
    let text = TAG_RE.replace_all(text, " ");
    let text = URL_RE.replace_all(&text, " ");
    let text = PUNCT_RE.replace_all(&text, "");
    let text = WS_RE.replace_all(&text, " ");
    text.trim().to_lowercase()
}
