//! Content rewriter: gate, decode, run the matchers, re-encode.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::content_type::{is_script_type, is_textual_type};

use super::error::RewriteError;
use super::patterns::{standard_matchers, UrlMatcher};
use super::rule::{rewrite_url, AbsoluteUrlPolicy, RewriteTarget};

/// Which declared content types the rewriter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentGate {
    /// JavaScript only.
    #[default]
    Script,
    /// Any textual type (HTML, CSS, JS, JSON, XML).
    Textual,
}

impl ContentGate {
    pub fn admits(self, content_type: &str) -> bool {
        match self {
            ContentGate::Script => is_script_type(content_type),
            ContentGate::Textual => is_textual_type(content_type),
        }
    }
}

/// Why a payload came back untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnchangedReason {
    /// Content type missing or not admitted by the gate.
    ContentType,
    /// Body is not valid UTF-8.
    NotUtf8,
    /// No matcher changed anything.
    NoMatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    Rewritten(Vec<u8>),
    Unchanged(UnchangedReason),
}

/// Compiled matchers plus the rewrite policy.
///
/// Stateless once built; share one instance across threads.
pub struct ContentRewriter {
    matchers: Vec<Box<dyn UrlMatcher>>,
    policy: AbsoluteUrlPolicy,
    gate: ContentGate,
    max_body_bytes: Option<usize>,
}

impl std::fmt::Debug for ContentRewriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.matchers.iter().map(|m| m.name()).collect();
        f.debug_struct("ContentRewriter")
            .field("matchers", &names)
            .field("policy", &self.policy)
            .field("gate", &self.gate)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

impl ContentRewriter {
    /// Rewriter with the standard JS literal / attribute / CSS matchers.
    pub fn new(policy: AbsoluteUrlPolicy, gate: ContentGate) -> Result<Self, RewriteError> {
        Ok(Self::with_matchers(standard_matchers()?, policy, gate))
    }

    /// Rewriter with a custom matcher sequence, run in the given order.
    pub fn with_matchers(
        matchers: Vec<Box<dyn UrlMatcher>>,
        policy: AbsoluteUrlPolicy,
        gate: ContentGate,
    ) -> Self {
        Self {
            matchers,
            policy,
            gate,
            max_body_bytes: None,
        }
    }

    /// Refuse payloads larger than `limit` bytes.
    pub fn with_max_body_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_body_bytes = limit;
        self
    }

    pub fn policy(&self) -> AbsoluteUrlPolicy {
        self.policy
    }

    pub fn gate(&self) -> ContentGate {
        self.gate
    }

    /// Runs every matcher over `text`, each over the previous one's output.
    pub fn rewrite_text<'t>(&self, text: &'t str, target: &RewriteTarget) -> Cow<'t, str> {
        let policy = self.policy;
        let rule = |url: &str| match rewrite_url(url, target, policy) {
            Cow::Owned(new) => Some(new),
            Cow::Borrowed(_) => None,
        };

        let mut current = Cow::Borrowed(text);
        for matcher in &self.matchers {
            let rewritten = match matcher.apply(&current, &rule) {
                Cow::Owned(next) => Some(next),
                Cow::Borrowed(_) => None,
            };
            if let Some(next) = rewritten {
                tracing::debug!(matcher = matcher.name(), "rewrote URL payloads");
                current = Cow::Owned(next);
            }
        }
        current
    }

    /// Gate, decode and rewrite a response body.
    ///
    /// Gate and decode failures are not errors: the outcome says the body was
    /// left alone. Errors mean the caller should forward the original bytes.
    pub fn rewrite(
        &self,
        content: &[u8],
        content_type: Option<&str>,
        target: &RewriteTarget,
    ) -> Result<RewriteOutcome, RewriteError> {
        match content_type {
            Some(ct) if self.gate.admits(ct) => {}
            _ => return Ok(RewriteOutcome::Unchanged(UnchangedReason::ContentType)),
        }

        if let Some(limit) = self.max_body_bytes {
            if content.len() > limit {
                return Err(RewriteError::BodyTooLarge {
                    len: content.len(),
                    limit,
                });
            }
        }

        let Ok(text) = std::str::from_utf8(content) else {
            return Ok(RewriteOutcome::Unchanged(UnchangedReason::NotUtf8));
        };

        match self.rewrite_text(text, target) {
            Cow::Owned(new) => Ok(RewriteOutcome::Rewritten(new.into_bytes())),
            Cow::Borrowed(_) => Ok(RewriteOutcome::Unchanged(UnchangedReason::NoMatch)),
        }
    }
}

static DEFAULT_REWRITER: Lazy<Result<ContentRewriter, RewriteError>> =
    Lazy::new(|| ContentRewriter::new(AbsoluteUrlPolicy::Keep, ContentGate::Script));

/// Rewrites URLs in a script body so root-relative references point at
/// `target_scheme://target_host_port`.
///
/// Every failure path returns the input unchanged; the returned bytes are
/// identical to `content` whenever nothing was substituted.
pub fn process_content(
    content: &[u8],
    content_type: Option<&str>,
    target_scheme: &str,
    target_host_port: &str,
) -> Vec<u8> {
    let rewriter = match &*DEFAULT_REWRITER {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("content rewriter unavailable: {e}");
            return content.to_vec();
        }
    };
    let target = RewriteTarget::new(target_scheme, target_host_port);
    match rewriter.rewrite(content, content_type, &target) {
        Ok(RewriteOutcome::Rewritten(bytes)) => bytes,
        Ok(RewriteOutcome::Unchanged(_)) => content.to_vec(),
        Err(e) => {
            tracing::warn!("rewrite failed, forwarding original: {e}");
            content.to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JS: Option<&str> = Some("application/javascript; charset=utf-8");

    fn rw(text: &str) -> String {
        let out = process_content(text.as_bytes(), JS, "http", "api.mitmproxy.com");
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn root_relative_literals_rewritten() {
        assert_eq!(
            rw("const API_PATH_TPL = `/api/tasks`;"),
            "const API_PATH_TPL = `http://api.mitmproxy.com/api/tasks`;"
        );
    }

    #[test]
    fn absolute_and_relative_untouched() {
        let text = r#"
            const API_URL_ABS = 'http://192.168.0.18:8088/api/fake-api01';
            const HTML_LINK = '<a href="http://old.cdn.com/style.css">Link</a>';
            const REL_PATH = './data.json';
        "#;
        assert_eq!(rw(text), text);
    }

    #[test]
    fn css_url_rewrite() {
        assert_eq!(
            rw("const CSS_BG = \"background-image: url('http://old.cdn.com/bg.png');\";"),
            "const CSS_BG = \"background-image: url('http://old.cdn.com/bg.png');\";"
        );
        assert_eq!(
            rw("el.style.background = \"url('/assets/bg.png')\";"),
            "el.style.background = \"url('http://api.mitmproxy.com/assets/bg.png')\";"
        );
    }

    #[test]
    fn no_op_returns_identical_bytes() {
        let input = "var x = 1;\n// nothing to see\nvar y = 'relative/path';\n".as_bytes();
        assert_eq!(process_content(input, JS, "http", "h:1"), input);
    }

    #[test]
    fn content_type_gate() {
        let input = b"var a = '/api/x';";
        assert_eq!(process_content(input, Some("image/png"), "http", "h:1"), input);
        assert_eq!(process_content(input, None, "http", "h:1"), input);
        assert_eq!(
            process_content(input, Some("text/javascript"), "http", "h:1"),
            b"var a = 'http://h:1/api/x';"
        );
    }

    #[test]
    fn invalid_utf8_returned_unchanged() {
        let input = b"var a = '/api/x'; \xff\xfe";
        assert_eq!(process_content(input, JS, "http", "h:1"), input);
    }

    #[test]
    fn mixed_payload_each_form_rewritten_once() {
        let rewriter = ContentRewriter::new(AbsoluteUrlPolicy::Keep, ContentGate::Textual).unwrap();
        let target = RewriteTarget::new("https", "proxy.local:8443");
        let html = r#"<link href="/css/site.css"><img src='/img/a b.png'>
<style>.hero { background: url(/img/hero.jpg) } .logo { background: url("/img/logo.svg") }</style>
<script>fetch('/api/items'); const cdn = "https://cdn.example.com/lib.js"; const p = "//cdn.example.com/x";</script>"#;
        let out = rewriter.rewrite_text(html, &target);
        let expected = r#"<link href="https://proxy.local:8443/css/site.css"><img src='https://proxy.local:8443/img/a b.png'>
<style>.hero { background: url(https://proxy.local:8443/img/hero.jpg) } .logo { background: url("https://proxy.local:8443/img/logo.svg") }</style>
<script>fetch('https://proxy.local:8443/api/items'); const cdn = "https://cdn.example.com/lib.js"; const p = "//cdn.example.com/x";</script>"#;
        assert_eq!(out, expected);
        assert_eq!(rewriter.rewrite_text(&out, &target), expected);
    }

    #[test]
    fn retarget_policy_rewrites_absolute() {
        let rewriter =
            ContentRewriter::new(AbsoluteUrlPolicy::Retarget, ContentGate::Script).unwrap();
        let target = RewriteTarget::new("http", "192.168.0.16:3007");
        let out = rewriter.rewrite_text(
            "a('http://192.168.0.18:8088/api/fake-api01'); b(\"/x\");",
            &target,
        );
        assert_eq!(
            out,
            "a('http://192.168.0.16:3007/api/fake-api01'); b(\"http://192.168.0.16:3007/x\");"
        );
    }

    #[test]
    fn outcome_reasons() {
        let rewriter = ContentRewriter::new(AbsoluteUrlPolicy::Keep, ContentGate::Script).unwrap();
        let target = RewriteTarget::new("http", "h:1");
        assert_eq!(
            rewriter.rewrite(b"x", Some("text/css"), &target).unwrap(),
            RewriteOutcome::Unchanged(UnchangedReason::ContentType)
        );
        assert_eq!(
            rewriter.rewrite(b"\xff", JS, &target).unwrap(),
            RewriteOutcome::Unchanged(UnchangedReason::NotUtf8)
        );
        assert_eq!(
            rewriter.rewrite(b"var a = 1;", JS, &target).unwrap(),
            RewriteOutcome::Unchanged(UnchangedReason::NoMatch)
        );
    }

    #[test]
    fn oversized_body_is_error() {
        let rewriter = ContentRewriter::new(AbsoluteUrlPolicy::Keep, ContentGate::Script)
            .unwrap()
            .with_max_body_bytes(Some(4));
        let target = RewriteTarget::new("http", "h:1");
        let err = rewriter.rewrite(b"'/abc'", JS, &target).unwrap_err();
        assert!(matches!(err, RewriteError::BodyTooLarge { len: 6, limit: 4 }));
    }
}
