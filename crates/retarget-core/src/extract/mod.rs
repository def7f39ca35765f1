//! URL discovery in JavaScript: which network endpoints does this code talk to?
//!
//! Candidates are collected with plain text patterns, resolved against the
//! page URL, and kept only when their host is on the allow-list (the
//! configured target domains plus the page's own host).

mod candidates;
mod inline;

pub use candidates::collect_candidates;
pub use inline::extract_inline_scripts;

use std::collections::HashSet;
use url::Url;

use crate::rewrite::is_absolute_http;
use crate::url_model::{host_only, normalize};

/// Lowercase, port-stripped hosts that discovered URLs may point at.
fn allowed_host_set<S: AsRef<str>>(allowed_hosts: &[S], base: Option<&Url>) -> HashSet<String> {
    let mut allowed: HashSet<String> = allowed_hosts
        .iter()
        .map(|h| h.as_ref())
        .filter(|h| !h.is_empty())
        .map(host_only)
        .collect();
    if let Some(host) = base.and_then(Url::host_str) {
        allowed.insert(host.to_lowercase());
    }
    allowed
}

/// Resolves one candidate; `None` when it does not parse or has no host.
fn resolve_candidate(candidate: &str, base: Option<&Url>) -> Option<(Url, String)> {
    if is_absolute_http(candidate) {
        let parsed = Url::parse(candidate).ok()?;
        return Some((parsed, normalize(candidate)));
    }
    let joined = base?.join(candidate).ok()?;
    let normalized = normalize(joined.as_str());
    Some((joined, normalized))
}

/// Extracts absolute, normalized URLs from `js_text` whose host is in
/// `allowed_hosts` or is the host of `base_url`.
///
/// Malformed candidates are skipped; the result is empty for empty input.
pub fn extract_urls<S: AsRef<str>>(
    js_text: &str,
    base_url: &str,
    allowed_hosts: &[S],
) -> HashSet<String> {
    let mut result = HashSet::new();
    if js_text.is_empty() {
        return result;
    }

    let candidates = collect_candidates(js_text);
    let base = Url::parse(base_url).ok();
    if base.is_none() {
        tracing::debug!(base_url, "base URL does not parse; relative candidates skipped");
    }
    let allowed = allowed_host_set(allowed_hosts, base.as_ref());

    for candidate in &candidates {
        let Some((resolved, normalized)) = resolve_candidate(candidate, base.as_ref()) else {
            continue;
        };
        let Some(host) = resolved.host_str() else {
            continue;
        };
        if allowed.contains(&host_only(host)) {
            result.insert(normalized);
        }
    }

    tracing::debug!(
        count = result.len(),
        "extracted urls: {:?}",
        result.iter().take(20).collect::<Vec<_>>()
    );
    result
}

/// [`extract_urls`] over every inline `<script>` body of an HTML page.
pub fn extract_from_html<S: AsRef<str>>(
    html: &str,
    base_url: &str,
    allowed_hosts: &[S],
) -> HashSet<String> {
    extract_inline_scripts(html)
        .into_iter()
        .flat_map(|code| extract_urls(code, base_url, allowed_hosts))
        .collect()
}
