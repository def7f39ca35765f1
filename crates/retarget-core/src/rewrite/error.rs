//! Errors surfaced by the content rewriter.

/// Failure that prevents a payload from being rewritten.
///
/// Callers forward the original bytes when they see one of these; the
/// rewriter never hands back partially rewritten output.
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    /// A matcher pattern failed to compile.
    #[error("invalid {name} pattern")]
    Pattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },
    /// Payload is larger than the configured rewrite limit.
    #[error("payload of {len} bytes exceeds rewrite limit of {limit} bytes")]
    BodyTooLarge { len: usize, limit: usize },
}
