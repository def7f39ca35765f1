//! The rewrite rule: where a single URL literal should point after retargeting.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::url_model::split_authority;

/// Origin that rewritten URLs point at.
///
/// Built per response from the live request; never cached across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteTarget {
    pub scheme: String,
    pub host_port: String,
}

impl RewriteTarget {
    pub fn new(scheme: impl Into<String>, host_port: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            host_port: host_port.into(),
        }
    }

    /// Target derived from a request's own scheme, host and port (`host:port`).
    pub fn from_request(scheme: &str, host: &str, port: Option<u16>) -> Self {
        let host_port = match port {
            Some(p) => format!("{host}:{p}"),
            None => host.to_string(),
        };
        Self::new(scheme, host_port)
    }

    /// `scheme://host:port`
    pub fn origin(&self) -> String {
        format!("{}://{}", self.scheme, self.host_port)
    }
}

/// What to do with absolute `http(s)://` references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AbsoluteUrlPolicy {
    /// Leave absolute URLs alone (third-party CDNs keep working).
    #[default]
    Keep,
    /// Replace scheme and authority with the target's.
    Retarget,
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .map_or(false, |head| head.eq_ignore_ascii_case(prefix))
}

/// True for `http://` and `https://` references (scheme case-insensitive).
pub(crate) fn is_absolute_http(url: &str) -> bool {
    starts_with_ignore_case(url, "http://") || starts_with_ignore_case(url, "https://")
}

/// Rewrites one URL literal.
///
/// Rules, first match wins:
/// 1. root-relative (`/x`, not `//x`): the target origin is spliced in front;
/// 2. absolute `http(s)://`: kept, or retargeted under [`AbsoluteUrlPolicy::Retarget`];
/// 3. anything else (protocol-relative, relative, empty): kept.
///
/// Returns `Cow::Borrowed` whenever the URL is unchanged.
pub fn rewrite_url<'a>(
    original: &'a str,
    target: &RewriteTarget,
    policy: AbsoluteUrlPolicy,
) -> Cow<'a, str> {
    if original.starts_with('/') && !original.starts_with("//") {
        return Cow::Owned(format!("{}{}", target.origin(), original));
    }

    if is_absolute_http(original) {
        if policy == AbsoluteUrlPolicy::Keep {
            return Cow::Borrowed(original);
        }
        return match split_authority(original) {
            Some(parts) => {
                let retargeted = format!("{}{}", target.origin(), parts.tail);
                if retargeted == original {
                    Cow::Borrowed(original)
                } else {
                    Cow::Owned(retargeted)
                }
            }
            None => Cow::Borrowed(original),
        };
    }

    Cow::Borrowed(original)
}

/// [`rewrite_url`] with the default policy, taking the target as plain strings.
pub fn rewrite(original: &str, target_scheme: &str, target_host_port: &str) -> String {
    let target = RewriteTarget::new(target_scheme, target_host_port);
    rewrite_url(original, &target, AbsoluteUrlPolicy::Keep).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_relative_gets_target_origin() {
        assert_eq!(
            rewrite("/api/tasks", "http", "192.168.0.16:3007"),
            "http://192.168.0.16:3007/api/tasks"
        );
        assert_eq!(
            rewrite("/a?b=1#c", "https", "h:1"),
            "https://h:1/a?b=1#c"
        );
    }

    #[test]
    fn absolute_kept_by_default() {
        assert_eq!(
            rewrite("http://old.cdn.com/style.css", "https", "new.host:443"),
            "http://old.cdn.com/style.css"
        );
        assert_eq!(rewrite("HTTPS://X.com/y", "http", "h:1"), "HTTPS://X.com/y");
    }

    #[test]
    fn absolute_retargeted_when_enabled() {
        let target = RewriteTarget::new("http", "192.168.0.16:3007");
        assert_eq!(
            rewrite_url(
                "https://old.example.com:8088/api/x?y=1",
                &target,
                AbsoluteUrlPolicy::Retarget
            ),
            "http://192.168.0.16:3007/api/x?y=1"
        );
        assert_eq!(
            rewrite_url("http://old.example.com", &target, AbsoluteUrlPolicy::Retarget),
            "http://192.168.0.16:3007"
        );
    }

    #[test]
    fn retarget_is_idempotent() {
        let target = RewriteTarget::new("http", "h:1");
        let once = rewrite_url("https://a.com/x", &target, AbsoluteUrlPolicy::Retarget);
        let twice = rewrite_url(&once, &target, AbsoluteUrlPolicy::Retarget);
        assert!(matches!(twice, Cow::Borrowed(_)));
        assert_eq!(twice, once);
    }

    #[test]
    fn other_references_unchanged() {
        for url in ["//cdn.example.com/x.js", "./data.json", "styles.css", "", "wss://x/y"] {
            assert_eq!(rewrite(url, "http", "h:1"), url);
        }
    }

    #[test]
    fn target_from_request() {
        let t = RewriteTarget::from_request("https", "example.com", Some(8443));
        assert_eq!(t.host_port, "example.com:8443");
        assert_eq!(t.origin(), "https://example.com:8443");
        let t = RewriteTarget::from_request("http", "example.com", None);
        assert_eq!(t.origin(), "http://example.com");
    }
}
