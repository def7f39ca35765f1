//! Extract command: print discovered endpoints, sorted.

use anyhow::{Context, Result};
use retarget_core::config::RetargetConfig;
use retarget_core::extract::{extract_from_html, extract_urls};
use std::path::Path;

pub fn run_extract(
    cfg: &RetargetConfig,
    path: &Path,
    base_url: &str,
    allow: &[String],
    html: bool,
) -> Result<()> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;

    let mut allowed: Vec<String> = cfg.target_domains.clone();
    allowed.extend(allow.iter().cloned());

    let found = if html {
        extract_from_html(&text, base_url, &allowed)
    } else {
        extract_urls(&text, base_url, &allowed)
    };

    let mut urls: Vec<_> = found.into_iter().collect();
    urls.sort();
    for url in &urls {
        println!("{url}");
    }
    Ok(())
}
