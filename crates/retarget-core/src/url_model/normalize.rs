//! Canonical form for discovered URLs: fragment removed, scheme and authority
//! lowercased.

/// A URL split around its network location.
///
/// `scheme` is empty for protocol-relative references (`//host/path`).
/// `tail` is everything after the authority (path, query, fragment) verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authority<'a> {
    pub scheme: &'a str,
    pub netloc: &'a str,
    pub tail: &'a str,
}

impl Authority<'_> {
    /// Reassemble with a different authority, keeping scheme and tail.
    pub fn with_netloc(&self, netloc: &str) -> String {
        if self.scheme.is_empty() {
            format!("//{}{}", netloc, self.tail)
        } else {
            format!("{}://{}{}", self.scheme, netloc, self.tail)
        }
    }
}

/// Splits `url` into scheme, network location and tail.
///
/// Returns `None` when the string has no (non-empty) network location, e.g.
/// relative paths, `mailto:` style references or `host:port` strings.
pub fn split_authority(url: &str) -> Option<Authority<'_>> {
    let (scheme, rest) = match url.split_once(':') {
        Some((scheme, rest)) if is_scheme(scheme) => (scheme, rest),
        _ => ("", url),
    };
    let after_slashes = rest.strip_prefix("//")?;
    let end = after_slashes
        .find(['/', '?', '#'])
        .unwrap_or(after_slashes.len());
    let netloc = &after_slashes[..end];
    if netloc.is_empty() {
        return None;
    }
    Some(Authority {
        scheme,
        netloc,
        tail: &after_slashes[end..],
    })
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Normalizes a URL string for comparison and deduplication.
///
/// Trims surrounding whitespace, drops everything from the first `#`, and
/// lowercases the scheme and network location when one is present. Never
/// fails: input without an authority is returned fragment-stripped and trimmed.
pub fn normalize(url: &str) -> String {
    let trimmed = url.trim();
    let without_fragment = match trimmed.split_once('#') {
        Some((head, _)) => head.trim_end(),
        None => trimmed,
    };
    match split_authority(without_fragment) {
        Some(parts) => {
            let scheme = parts.scheme.to_ascii_lowercase();
            let lowered = Authority {
                scheme: &scheme,
                ..parts
            };
            lowered.with_netloc(&parts.netloc.to_lowercase())
        }
        None => without_fragment.to_string(),
    }
}
