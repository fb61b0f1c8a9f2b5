// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling from a base URL with a pool of concurrent workers
// - Same-host restriction (links to other sites are recorded, never crawled)
// - Optional depth limit
// - Optional politeness delay before each fetch
// - Deterministic termination: the crawl ends when the frontier drains
//
// Submodules:
// - frontier: the shared work queue with join semantics
// - state: the visited set and the result store
// - worker: the worker loop and the pool lifecycle
// - report: what a finished crawl hands back
// =============================================================================

mod frontier;
mod report;
mod state;
mod worker;

pub use frontier::{CrawlTask, Frontier};
pub use report::CrawlReport;
pub use state::{ResultStore, VisitedSet};
pub use worker::Crawler;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::extract::LinkExtractor;

pub const DEFAULT_WORKERS: usize = 100;

// What to do when fetching a page fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the whole crawl and return the first failure
    Abort,
    /// Record the failure against that URL and keep crawling
    #[default]
    Record,
}

// Settings for a single crawl
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlConfig {
    /// Number of concurrent workers (must be at least 1)
    pub workers: usize,
    /// Pages at this depth or deeper are not crawled; 0 means unlimited
    pub max_depth: usize,
    /// Pause each worker takes before every fetch
    pub delay: Duration,
    pub on_error: FailurePolicy,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            max_depth: 0,
            delay: Duration::ZERO,
            on_error: FailurePolicy::default(),
        }
    }
}

impl CrawlConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_failure_policy(mut self, on_error: FailurePolicy) -> Self {
        self.on_error = on_error;
        self
    }

    // True if a task at this depth must be skipped
    //
    // max_depth = 1: only depth 0 (the base URL) is crawled
    // max_depth = 0: nothing is ever too deep
    pub fn exceeds_depth(&self, depth: usize) -> bool {
        self.max_depth > 0 && depth >= self.max_depth
    }
}

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("crawl worker panicked: {0}")]
    WorkerPanicked(String),
}

// Crawls a website starting from base_url
//
// Parameters:
//   extractor: fetches pages and decides which links are same-host
//   base_url: the page to start from (depth 0)
//   config: worker count, depth limit, delay and failure policy
//
// Returns: the report of every page visited
//
// Example:
//   max_depth=1: only the base page is crawled
//   max_depth=2: the base page and the same-host pages it links to
//   max_depth=0: everything reachable on the same host
pub async fn crawl_website(
    extractor: Arc<dyn LinkExtractor>,
    base_url: &str,
    config: CrawlConfig,
) -> Result<CrawlReport, CrawlError> {
    Crawler::new(extractor, config).crawl(base_url).await
}
