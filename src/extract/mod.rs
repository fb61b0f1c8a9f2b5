// src/extract/mod.rs
// =============================================================================
// This module turns a page URL into the list of links that page exposes.
//
// Submodules:
// - html: parses links out of HTML
// - http: fetches pages over HTTP (the production extractor)
// - scope: decides which links belong to the site being crawled
//
// The crawl engine only talks to the LinkExtractor trait defined here, so
// tests can drive it with an in-memory site instead of a real server.
// =============================================================================

mod html;
mod http;
mod scope;

pub use html::extract_links;
pub use http::{HttpLinkExtractor, DEFAULT_TIMEOUT};
pub use scope::HostScope;

use anyhow::Result;
use async_trait::async_trait;

// What the crawl engine needs from the outside world
//
// Implementations are shared by every worker, hence Send + Sync
#[async_trait]
pub trait LinkExtractor: Send + Sync {
    /// Fetches the page at `url` and returns every link target on it as an
    /// absolute URL string, in page order, duplicates included
    async fn get_links(&self, url: &str) -> Result<Vec<String>>;

    /// True if `url` is an http/https link on the crawl's own host
    fn is_same_host(&self, url: &str) -> bool;
}
