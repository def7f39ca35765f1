//! Content rewriting: retarget embedded URLs at a new origin.
//!
//! Three matchers (JS literals, HTML attributes, CSS `url()`) run in that
//! order over a decoded text payload. Each matcher hands only the URL payload
//! to the rewrite rule and re-emits everything around it verbatim, so a pass
//! that rewrites nothing leaves the text byte-for-byte identical.

mod content;
mod error;
mod patterns;
mod rule;

pub use content::{process_content, ContentGate, ContentRewriter, RewriteOutcome, UnchangedReason};
pub use error::RewriteError;
pub use patterns::{standard_matchers, PatternMatcher, UrlMatcher};
pub use rule::{rewrite, rewrite_url, AbsoluteUrlPolicy, RewriteTarget};

pub(crate) use rule::is_absolute_http;
