// src/crawl/state.rs
// =============================================================================
// Shared bookkeeping for one crawl: which URLs have been dispatched, and what
// each dispatched page linked to.
//
// Both structures are shared by every worker, so each one sits behind its
// own Mutex. Neither lock is ever held across an .await.
// =============================================================================

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

// URLs already accepted for processing
//
// Grows monotonically. A URL enters the set when a worker accepts its task,
// not when the task is queued.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    // Atomic check-then-add
    //
    // Returns true if the URL was not in the set and this caller claimed it.
    // Two workers racing on the same URL can never both get true.
    pub fn claim(&self, url: &str) -> bool {
        let mut urls = self.urls.lock().unwrap_or_else(PoisonError::into_inner);
        if urls.contains(url) {
            false
        } else {
            urls.insert(url.to_string())
        }
    }

    #[cfg(test)]
    fn contains(&self, url: &str) -> bool {
        self.urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

// Accumulates the outcome of every processed page
//
// Keys are always a subset of the VisitedSet: only the worker that claimed a
// URL writes its entry, so each key is written exactly once.
#[derive(Debug, Default)]
pub struct ResultStore {
    inner: Mutex<Results>,
}

#[derive(Debug, Default)]
struct Results {
    pages: HashMap<String, Vec<String>>,
    failures: HashMap<String, String>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Records the links extracted from a page, exactly as extracted
    pub fn record_links(&self, url: &str, links: Vec<String>) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = inner.pages.insert(url.to_string(), links);
        debug_assert!(previous.is_none(), "page recorded twice: {}", url);
    }

    // Records a page whose fetch failed
    //
    // The page still gets an (empty) entry in the page map so that every
    // visited URL has exactly one entry there
    pub fn record_failure(&self, url: &str, reason: String) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.pages.insert(url.to_string(), Vec::new());
        inner.failures.insert(url.to_string(), reason);
    }

    #[cfg(test)]
    fn page_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pages
            .len()
    }

    // Takes the accumulated results out of the store, sorted by URL
    //
    // Returns (pages, failures). The store is left empty.
    pub fn drain(&self) -> (BTreeMap<String, Vec<String>>, BTreeMap<String, String>) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let pages = std::mem::take(&mut inner.pages).into_iter().collect();
        let failures = std::mem::take(&mut inner.failures).into_iter().collect();
        (pages, failures)
    }
}
