// src/extract/scope.rs
// =============================================================================
// Decides which discovered links stay inside the site being mapped.
//
// A link is in scope when it starts with "http://<host>/" or
// "https://<host>/", where <host> is the base URL's host (plus its port when
// the base URL names one explicitly).
//
// This is a plain prefix test on the link text:
// - "https://a.com/x"       -> in scope
// - "https://a.com.evil/x"  -> out (the trailing slash stops substring tricks)
// - "https://blog.a.com/x"  -> out (subdomains are different hosts)
// - "/relative" or "mailto:" -> out (not absolute http/https)
// =============================================================================

use anyhow::{anyhow, Context, Result};
use url::Url;

const HTTP_SCHEMES: [&str; 2] = ["http://", "https://"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostScope {
    // "host" or "host:port"
    authority: String,
}

impl HostScope {
    // Builds the scope from the crawl's base URL
    //
    // Fails if the URL does not parse or has no host (e.g. "mailto:x")
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url).with_context(|| format!("Invalid URL '{}'", base_url))?;

        let host = base
            .host_str()
            .ok_or_else(|| anyhow!("URL has no host: {}", base_url))?;

        let authority = match base.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        Ok(Self { authority })
    }

    #[cfg(test)]
    fn authority(&self) -> &str {
        &self.authority
    }

    pub fn contains(&self, link: &str) -> bool {
        HTTP_SCHEMES.iter().any(|scheme| {
            link.strip_prefix(scheme)
                .and_then(|rest| rest.strip_prefix(self.authority.as_str()))
                .is_some_and(|path| path.starts_with('/'))
        })
    }
}
