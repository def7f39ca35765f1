//! Content-type gates deciding which payloads are eligible for text rewriting.

/// Media types treated as executable script.
const SCRIPT_PREFIXES: &[&str] = &[
    "application/javascript",
    "application/x-javascript",
    "text/javascript",
];

/// Media types treated as text by the interception layer.
const TEXTUAL_PREFIXES: &[&str] = &[
    "text/",
    "application/json",
    "application/javascript",
    "application/x-javascript",
    "application/xml",
    "application/xhtml+xml",
];

fn has_any_prefix(content_type: &str, prefixes: &[&str]) -> bool {
    let ct = content_type.trim().to_ascii_lowercase();
    prefixes.iter().any(|p| ct.starts_with(p))
}

/// True if the declared content type is JavaScript (parameters such as
/// `; charset=utf-8` are ignored).
pub fn is_script_type(content_type: &str) -> bool {
    has_any_prefix(content_type, SCRIPT_PREFIXES)
}

/// True if the declared content type is textual (HTML, CSS, JS, JSON, XML).
pub fn is_textual_type(content_type: &str) -> bool {
    has_any_prefix(content_type, TEXTUAL_PREFIXES)
}

/// True for `text/html` and `application/xhtml+xml`.
pub fn is_html_type(content_type: &str) -> bool {
    has_any_prefix(content_type, &["text/html", "application/xhtml+xml"])
}
