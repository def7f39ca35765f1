//! Response hook: the glue between an interception layer and the rewriter.
//!
//! For each response: strip encoding/length headers, check the host and
//! content type, record discovered endpoints, then rewrite the body relative
//! to the request's own origin. Failures leave the body untouched.

mod response;

pub use response::InterceptedResponse;

use std::sync::Arc;

use crate::config::RetargetConfig;
use crate::content_type::{is_html_type, is_script_type, is_textual_type};
use crate::discovery::DiscoveryLog;
use crate::extract::{extract_from_html, extract_urls};
use crate::rewrite::{ContentRewriter, RewriteError, RewriteOutcome, RewriteTarget};

/// Why the hook left a response alone without trying to rewrite it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotTargetDomain,
    NotTextual,
    EmptyBody,
    /// The rewriter returned an error; original bytes forwarded.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookOutcome {
    Rewritten { before: usize, after: usize },
    Unchanged,
    Skipped(SkipReason),
}

/// True if `host` contains any of `domains` (case-insensitive substring).
pub fn host_matches_any<S: AsRef<str>>(host: &str, domains: &[S]) -> bool {
    if host.is_empty() {
        return false;
    }
    let host = host.to_lowercase();
    domains
        .iter()
        .any(|d| host.contains(&d.as_ref().to_lowercase()))
}

pub struct ResponseHook {
    config: RetargetConfig,
    rewriter: ContentRewriter,
    discovery: Arc<DiscoveryLog>,
}

impl ResponseHook {
    pub fn new(config: RetargetConfig, discovery: Arc<DiscoveryLog>) -> Result<Self, RewriteError> {
        let rewriter = config.build_rewriter()?;
        Ok(Self {
            config,
            rewriter,
            discovery,
        })
    }

    pub fn discovery(&self) -> &Arc<DiscoveryLog> {
        &self.discovery
    }

    pub fn on_request(&self, method: &str, url: &str) {
        tracing::info!("[HOOK-REQUEST] {} {}", method, url);
    }

    pub fn on_response(&self, resp: &mut InterceptedResponse) -> HookOutcome {
        let content_type = resp.content_type().unwrap_or_default().to_string();
        tracing::info!(
            method = %resp.method,
            scheme = %resp.scheme,
            host = %resp.host,
            path = %resp.path,
            status = resp.status,
            content_type = %content_type,
            port = ?resp.port,
            "[RESP]"
        );

        // The body is already decoded, and its length is about to change.
        resp.remove_header("Content-Encoding");
        resp.remove_header("Content-Length");

        if self.config.only_target_domains
            && !host_matches_any(&resp.host, &self.config.target_domains)
        {
            tracing::debug!(host = %resp.host, "not a target domain, skipped");
            return HookOutcome::Skipped(SkipReason::NotTargetDomain);
        }
        if !is_textual_type(&content_type) {
            tracing::info!("[RESP] non-textual response, skipped");
            return HookOutcome::Skipped(SkipReason::NotTextual);
        }
        if resp.body.is_empty() {
            tracing::info!("[RESP] empty body, skipped");
            return HookOutcome::Skipped(SkipReason::EmptyBody);
        }

        if self.config.discover_urls {
            self.discover(resp, &content_type);
        }

        let target = RewriteTarget::from_request(&resp.scheme, &resp.host, resp.port);
        match self.rewriter.rewrite(&resp.body, Some(&content_type), &target) {
            Ok(RewriteOutcome::Rewritten(bytes)) => {
                let before = resp.body.len();
                resp.body = bytes;
                tracing::info!("[REWRITE] rewrote URLs in response from {}", resp.url());
                HookOutcome::Rewritten {
                    before,
                    after: resp.body.len(),
                }
            }
            Ok(RewriteOutcome::Unchanged(reason)) => {
                tracing::info!(?reason, "[REWRITE] no change for {}", resp.url());
                HookOutcome::Unchanged
            }
            Err(e) => {
                tracing::error!("[REWRITE-ERR] failed to rewrite {}: {e}", resp.url());
                HookOutcome::Skipped(SkipReason::Failed)
            }
        }
    }

    /// Records endpoints found in script or inline-script bodies.
    fn discover(&self, resp: &InterceptedResponse, content_type: &str) {
        let Ok(text) = std::str::from_utf8(&resp.body) else {
            return;
        };
        let source = resp.url();
        let allowed = &self.config.target_domains;
        let found = if is_script_type(content_type) {
            extract_urls(text, &source, allowed)
        } else if is_html_type(content_type) {
            extract_from_html(text, &source, allowed)
        } else {
            return;
        };
        if found.is_empty() {
            return;
        }
        let added = self.discovery.record(&source, found);
        tracing::debug!(source = %source, added, "recorded discovered URLs");
    }
}
