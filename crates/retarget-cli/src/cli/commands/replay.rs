//! Replay command: push recorded HAR responses through the response hook.

use anyhow::Result;
use retarget_core::config::RetargetConfig;
use retarget_core::discovery::DiscoveryLog;
use retarget_core::har;
use retarget_core::intercept::{HookOutcome, ResponseHook};
use std::path::Path;
use std::sync::Arc;

pub fn run_replay(cfg: &RetargetConfig, path: &Path, export: Option<&Path>) -> Result<()> {
    let responses = har::load_responses(path)?;
    let discovery = Arc::new(DiscoveryLog::new());
    let hook = ResponseHook::new(cfg.clone(), Arc::clone(&discovery))?;

    let mut rewritten = 0usize;
    for mut resp in responses {
        let url = resp.url();
        hook.on_request(&resp.method, &url);
        let outcome = hook.on_response(&mut resp);
        let label = match outcome {
            HookOutcome::Rewritten { before, after } => {
                rewritten += 1;
                format!("rewritten {before} -> {after} bytes")
            }
            HookOutcome::Unchanged => "unchanged".to_string(),
            HookOutcome::Skipped(reason) => format!("skipped ({reason:?})"),
        };
        println!("{:<6} {:>3} {}  {}", resp.method, resp.status, url, label);
    }

    println!(
        "{} response(s) rewritten, {} source(s) with discovered URLs",
        rewritten,
        discovery.source_count()
    );
    if let Some(dest) = export {
        discovery.write_json(dest)?;
        println!("discovered URLs written to {}", dest.display());
    }
    Ok(())
}
