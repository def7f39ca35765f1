//! Process-wide record of URLs discovered in script responses.
//!
//! Keyed by the URL of the response the script came from. Response handlers
//! on different threads merge into the same log, so every read-modify-write
//! happens under one lock.

use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct DiscoveryLog {
    inner: Mutex<HashMap<String, BTreeSet<String>>>,
}

impl DiscoveryLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, BTreeSet<String>>> {
        // A panicking writer cannot leave a set half-inserted; keep going.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Merges `urls` into the set recorded for `source`. Returns how many were new.
    pub fn record<I>(&self, source: &str, urls: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let mut map = self.lock();
        let seen = map.entry(source.to_string()).or_default();
        let before = seen.len();
        seen.extend(urls);
        let added = seen.len() - before;
        if seen.is_empty() {
            map.remove(source);
        }
        added
    }

    /// URLs recorded for one source, sorted.
    pub fn urls_for(&self, source: &str) -> Vec<String> {
        self.lock()
            .get(source)
            .map(|s| s.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn source_count(&self) -> usize {
        self.lock().len()
    }

    /// Sorted copy of the whole log.
    pub fn snapshot(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Pretty JSON object: source URL -> sorted array of discovered URLs.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.snapshot()).context("serialize discovery log")
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)
            .with_context(|| format!("write discovery log: {}", path.display()))?;
        tracing::info!(
            sources = self.source_count(),
            "discovery log written to {}",
            path.display()
        );
        Ok(())
    }
}
