//! Candidate collection: every URL-shaped string literal worth resolving.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Schemes that never name a network endpoint.
const IGNORED_SCHEMES: &[&str] = &["data:", "blob:", "javascript:"];

/// First string argument of fetch/axios/`xhr.open` (second argument)/WebSocket.
static NETWORK_CALL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"(?:fetch|axios(?:\.(?:get|post|put))?)\s*\(\s*['"`]([^'"`]+)['"`]"#,
        r#"|xhr\.open\s*\(\s*['"`][A-Z]+['"`]\s*,\s*['"`]([^'"`]+)['"`]"#,
        r#"|new\s+WebSocket\s*\(\s*['"`]([^'"`]+)['"`]"#,
    ))
    .expect("valid network call regex")
});

static ABSOLUTE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"`](https?://[^'"`]+)['"`]"#).expect("valid absolute URL regex"));

static ROOT_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"`](/[^'"`]+)['"`]"#).expect("valid root path regex"));

pub(crate) fn is_ignored_scheme(candidate: &str) -> bool {
    IGNORED_SCHEMES.iter().any(|scheme| {
        candidate
            .get(..scheme.len())
            .map_or(false, |head| head.eq_ignore_ascii_case(scheme))
    })
}

/// Collects raw URL candidates from JavaScript text without resolving or
/// filtering them by host.
///
/// Union of three scans: network call arguments, quoted absolute
/// `http(s)://` strings and quoted strings starting with `/`. Candidates
/// using `data:`, `blob:` or `javascript:` are dropped here.
pub fn collect_candidates(js_text: &str) -> HashSet<String> {
    let mut found = HashSet::new();

    for caps in NETWORK_CALL_RE.captures_iter(js_text) {
        for group in caps.iter().skip(1).flatten() {
            let candidate = group.as_str().trim();
            if !candidate.is_empty() && !is_ignored_scheme(candidate) {
                found.insert(candidate.to_string());
            }
        }
    }

    for re in [&*ABSOLUTE_URL_RE, &*ROOT_PATH_RE] {
        for caps in re.captures_iter(js_text) {
            if let Some(m) = caps.get(1) {
                if !is_ignored_scheme(m.as_str()) {
                    found.insert(m.as_str().to_string());
                }
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_calls() {
        let js = r#"
            fetch( ' /api/users ' );
            axios.post(`/api/save`, body);
            axios("https://api.example.com/a");
            xhr.open("GET", '/api/legacy');
            new WebSocket('wss://example.com/ws');
        "#;
        let c = collect_candidates(js);
        assert!(c.contains("/api/users"));
        assert!(c.contains("/api/save"));
        assert!(c.contains("https://api.example.com/a"));
        assert!(c.contains("/api/legacy"));
        assert!(c.contains("wss://example.com/ws"));
    }

    #[test]
    fn ignored_schemes_dropped() {
        let js = r#"fetch('javascript:alert(1)'); fetch("DATA:text/plain,x"); fetch(`blob:http://e.com/u`);"#;
        assert!(collect_candidates(js).is_empty());
    }

    #[test]
    fn quoted_absolute_and_root_paths() {
        let js = r#"var a = "http://x.com/1"; var b = '/two'; var c = 'three';"#;
        let c = collect_candidates(js);
        assert_eq!(c.len(), 2);
        assert!(c.contains("http://x.com/1"));
        assert!(c.contains("/two"));
    }

    #[test]
    fn is_ignored_scheme_case_insensitive() {
        assert!(is_ignored_scheme("JavaScript:void(0)"));
        assert!(is_ignored_scheme("blob:abc"));
        assert!(!is_ignored_scheme("/data:x"));
        assert!(!is_ignored_scheme(""));
    }
}
