// src/crawl/report.rs
// =============================================================================
// What a finished crawl hands back to its caller.
//
// `pages` maps every visited URL to the links found on it, exactly as the
// extractor returned them. BTreeMap keeps the keys sorted, so the sitemap
// file is stable from one run to the next even though workers finish in a
// different order every time.
// =============================================================================

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlReport {
    /// Visited URL -> links found on that page
    pub pages: BTreeMap<String, Vec<String>>,
    /// Visited URL -> why its fetch failed (its entry in `pages` is empty)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub failures: BTreeMap<String, String>,
    /// True if the crawl was stopped before the frontier drained
    #[serde(default)]
    pub interrupted: bool,
}

impl CrawlReport {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    // Total number of links across all pages, duplicates included
    pub fn link_count(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    // True if every visited page was fetched and the crawl ran to the end
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && !self.interrupted
    }

    // Writes the page map as pretty-printed JSON
    //
    // Only `pages` goes into the file: {"<url>": ["<link>", ...], ...}
    pub fn write_sitemap(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &self.pages)
            .with_context(|| format!("Failed to write sitemap to {}", path.display()))?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(())
    }
}
