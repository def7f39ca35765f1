use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::rewrite::{AbsoluteUrlPolicy, ContentGate, ContentRewriter, RewriteError};

/// Global configuration loaded from `~/.config/retarget/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetargetConfig {
    /// Domains considered in scope: the discovery allow-list, and the hosts
    /// whose responses are rewritten when `only_target_domains` is set.
    pub target_domains: Vec<String>,
    /// Only touch responses whose host contains one of `target_domains`.
    pub only_target_domains: bool,
    /// Also point absolute `http(s)://` URLs at the request's origin.
    pub rewrite_absolute_urls: bool,
    /// Content types the rewriter accepts: "script" (default) or "textual".
    pub content_gate: ContentGate,
    /// Run JS URL discovery on script and HTML responses.
    pub discover_urls: bool,
    /// Optional cap on rewritten body size in bytes (None = no cap).
    pub max_body_bytes: Option<usize>,
}

impl Default for RetargetConfig {
    fn default() -> Self {
        Self {
            target_domains: Vec::new(),
            only_target_domains: false,
            rewrite_absolute_urls: false,
            content_gate: ContentGate::Script,
            discover_urls: true,
            max_body_bytes: None,
        }
    }
}

impl RetargetConfig {
    pub fn absolute_url_policy(&self) -> AbsoluteUrlPolicy {
        if self.rewrite_absolute_urls {
            AbsoluteUrlPolicy::Retarget
        } else {
            AbsoluteUrlPolicy::Keep
        }
    }

    /// Content rewriter configured from this file.
    pub fn build_rewriter(&self) -> Result<ContentRewriter, RewriteError> {
        Ok(
            ContentRewriter::new(self.absolute_url_policy(), self.content_gate)?
                .with_max_body_bytes(self.max_body_bytes),
        )
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("retarget")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RetargetConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RetargetConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<RetargetConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: RetargetConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
