//! Rewrite command: run the content rewriter over one file.

use anyhow::{Context, Result};
use retarget_core::config::RetargetConfig;
use retarget_core::rewrite::{RewriteOutcome, RewriteTarget};
use std::io::Write;
use std::path::Path;

pub fn run_rewrite(
    cfg: &RetargetConfig,
    path: &Path,
    content_type: &str,
    scheme: &str,
    host_port: &str,
    output: Option<&Path>,
) -> Result<()> {
    let body = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let rewriter = cfg.build_rewriter()?;
    let target = RewriteTarget::new(scheme, host_port);

    let out = match rewriter.rewrite(&body, Some(content_type), &target)? {
        RewriteOutcome::Rewritten(bytes) => {
            tracing::info!(before = body.len(), after = bytes.len(), "rewrote {}", path.display());
            bytes
        }
        RewriteOutcome::Unchanged(reason) => {
            eprintln!("unchanged ({reason:?})");
            body
        }
    };

    match output {
        Some(dest) => std::fs::write(dest, &out)
            .with_context(|| format!("write {}", dest.display()))?,
        None => std::io::stdout()
            .lock()
            .write_all(&out)
            .context("write stdout")?,
    }
    Ok(())
}
