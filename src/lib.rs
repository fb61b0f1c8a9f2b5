// src/lib.rs
// =============================================================================
// sitemappy maps a website: starting from one URL it visits every page on
// the same host and records the links each page exposes.
//
// Modules:
// - crawl: the concurrent crawl engine (frontier, workers, results)
// - extract: fetching pages and pulling links out of them
//
// The command-line front end lives in main.rs and cli.rs.
// =============================================================================

pub mod crawl;
pub mod extract;

pub use crawl::{crawl_website, CrawlConfig, CrawlError, CrawlReport, Crawler, FailurePolicy};
pub use extract::{HostScope, HttpLinkExtractor, LinkExtractor};
