// src/extract/http.rs
// =============================================================================
// The production LinkExtractor: fetches pages over HTTP and parses their links.
//
// Key functionality:
// - One shared reqwest Client for the whole crawl (connection pooling)
// - Per-request timeout, so a hung server cannot stall a worker forever
// - Non-2xx responses are errors; the crawl's failure policy decides what
//   happens to them
// =============================================================================

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use super::html::extract_links;
use super::scope::HostScope;
use super::LinkExtractor;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpLinkExtractor {
    client: Client,
    scope: HostScope,
}

impl HttpLinkExtractor {
    // Creates an extractor for the site rooted at base_url
    //
    // Parameters:
    //   base_url: the crawl's base URL (decides which links are same-host)
    //   timeout: limit for each request, connect through body
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(client, HostScope::new(base_url)?))
    }

    pub fn with_client(client: Client, scope: HostScope) -> Self {
        Self { client, scope }
    }

    // Fetches a web page and returns its HTML content
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("HTTP {}", status));
        }

        let html = response.text().await?;
        Ok(html)
    }
}

#[async_trait]
impl LinkExtractor for HttpLinkExtractor {
    async fn get_links(&self, url: &str) -> Result<Vec<String>> {
        let html = self
            .fetch_page(url)
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        Ok(extract_links(&html, url))
    }

    fn is_same_host(&self, url: &str) -> bool {
        self.scope.contains(url)
    }
}
