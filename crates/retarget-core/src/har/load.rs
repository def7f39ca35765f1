//! Turn HAR entries into intercepted responses.

use anyhow::{Context, Result};
use std::path::Path;
use url::Url;

use crate::intercept::InterceptedResponse;

use super::parse::{HarEntry, HarLog};

/// Reads a HAR file and returns one response per entry with a plain-text body.
///
/// Entries whose body is missing or base64 encoded, or whose request URL does
/// not parse, are skipped.
pub fn load_responses(path: &Path) -> Result<Vec<InterceptedResponse>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read HAR file: {}", path.display()))?;
    let har: HarLog = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse HAR JSON: {}", path.display()))?;

    let total = har.log.entries.len();
    let responses: Vec<_> = har
        .log
        .entries
        .into_iter()
        .filter_map(entry_to_response)
        .collect();
    tracing::debug!(total, loaded = responses.len(), "loaded HAR {}", path.display());
    Ok(responses)
}

fn entry_to_response(entry: HarEntry) -> Option<InterceptedResponse> {
    let content = entry.response.content;
    if content
        .encoding
        .as_deref()
        .is_some_and(|e| e.eq_ignore_ascii_case("base64"))
    {
        return None;
    }
    let text = content.text?;

    let url = match Url::parse(&entry.request.url) {
        Ok(u) => u,
        Err(e) => {
            tracing::debug!(url = %entry.request.url, "skipping HAR entry: {e}");
            return None;
        }
    };
    let host = url.host_str()?.to_string();
    let mut path = url.path().to_string();
    if let Some(q) = url.query() {
        path.push('?');
        path.push_str(q);
    }

    let mut headers: Vec<(String, String)> = entry
        .response
        .headers
        .into_iter()
        .map(|h| (h.name, h.value))
        .collect();
    let has_content_type = headers
        .iter()
        .any(|(n, _)| n.eq_ignore_ascii_case("Content-Type"));
    if !has_content_type {
        if let Some(mime) = content.mime_type.filter(|m| !m.is_empty()) {
            headers.push(("Content-Type".to_string(), mime));
        }
    }

    Some(InterceptedResponse {
        method: entry.request.method,
        scheme: url.scheme().to_string(),
        host,
        port: url.port_or_known_default(),
        path,
        status: entry.response.status,
        headers,
        body: text.into_bytes(),
    })
}
