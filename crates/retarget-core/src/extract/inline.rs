//! Inline `<script>` bodies from HTML.

use once_cell::sync::Lazy;
use regex::Regex;

static HTML_SCRIPT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>(?P<code>.*?)</script>").expect("valid script tag regex")
});

/// Returns the body of every `<script>` element that has one, in document order.
pub fn extract_inline_scripts(html: &str) -> Vec<&str> {
    HTML_SCRIPT_RE
        .captures_iter(html)
        .filter_map(|caps| caps.name("code"))
        .map(|m| m.as_str())
        .filter(|code| !code.trim().is_empty())
        .collect()
}
