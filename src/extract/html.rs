// src/extract/html.rs
// =============================================================================
// Pulls link targets out of an HTML page.
//
// We use the `scraper` crate to parse the page into a DOM and select every
// <a href="..."> element, and the `url` crate to turn relative hrefs into
// absolute URLs.
//
// Unlike a link checker, a site map keeps every link it finds: mailto:, tel:,
// fragments and off-site links are all part of what a page exposes. Deciding
// what to crawl next happens later, in the crawl engine.
//
// Rust concepts:
// - Iterator chains: select -> filter_map -> collect, no manual loops
// - Option<T>: "this href did not produce a link"
// - String slicing and prefix checks (starts_with, split_once)
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

// Extracts all link targets from HTML content, in document order
//
// Parameters:
//   html: the HTML content to parse
//   page_url: the URL the HTML was fetched from (for resolving relative links)
//
// Returns: Vec<String> of link targets
//   - hrefs starting with http:// or https:// are kept exactly as written
//   - everything else is resolved against page_url
//   - empty hrefs and hrefs that cannot be resolved are dropped
//
// Example:
//   html = "<a href='/docs'>Docs</a><a href='mailto:me@a.com'>Mail</a>"
//   page_url = "https://a.com/page"
//   result = ["https://a.com/docs", "mailto:me@a.com"]
pub fn extract_links(html: &str, page_url: &str) -> Vec<String> {
    // Parse the HTML into a document
    let document = Html::parse_document(html);

    // The selector is a constant, so parsing cannot fail at runtime
    let selector = Selector::parse("a[href]").expect("'a[href]' is a valid selector");

    // Parse the page URL once; every relative href is joined onto it
    let base = match Url::parse(page_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(page_url, error = %e, "cannot resolve links against invalid page URL");
            return Vec::new();
        }
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_href(&base, page_url, href))
        .collect()
}

// Resolves one href against the page it was found on
//
// Examples (page = "https://a.com/page"):
//   "https://b.com/x "  -> Some("https://b.com/x ")  (kept verbatim)
//   "/docs"             -> Some("https://a.com/docs")
//   "#careers"          -> Some("https://a.com/page#careers")
//   "mailto:me@a.com"   -> Some("mailto:me@a.com")   (already absolute)
//   ""                  -> None
//
// Examples (page = "https://a.com", nothing after the host):
//   "#careers"          -> Some("https://a.com#careers")
//   "?tab=jobs"         -> Some("https://a.com?tab=jobs")
fn resolve_href(base: &Url, page_url: &str, href: &str) -> Option<String> {
    // Absolute web links are recorded as written, whitespace and all
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }

    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    // Url::join would turn "https://a.com" + "#x" into "https://a.com/#x",
    // which looks like a same-host page and would get crawled. Keep the
    // page URL as typed and just append the fragment or query.
    if (href.starts_with('#') || href.starts_with('?')) && is_bare_host(page_url) {
        return Some(format!("{}{}", page_url, href));
    }

    base.join(href).ok().map(String::from)
}

// True for "https://a.com" or "http://a.com:8080": no path, query or fragment
fn is_bare_host(page_url: &str) -> bool {
    page_url
        .split_once("://")
        .is_some_and(|(_, rest)| !rest.is_empty() && !rest.contains(['/', '?', '#']))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why two filter_map calls?
//    - The first drops <a> elements whose href we cannot read
//    - The second drops hrefs that do not resolve to a link
//    - filter_map = map + "skip the None results" in one step
//
// 2. What does Url::join do?
//    - Resolves a relative reference the way a browser does
//    - "https://a.com/docs/" + "intro" = "https://a.com/docs/intro"
//    - "https://a.com/docs/" + "/intro" = "https://a.com/intro"
//    - An href with its own scheme (mailto:, tel:) comes back unchanged
//
// 3. Why String::from on a Url?
//    - Url implements Into<String>, giving its serialized form
//    - .map(String::from) is shorthand for .map(|url| String::from(url))
//
// 4. What is rest.contains(['/', '?', '#'])?
//    - A char array works as a pattern: "contains any of these chars"
// -----------------------------------------------------------------------------
