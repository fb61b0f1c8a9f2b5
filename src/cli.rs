// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the Cli struct below IS the argument list, and the
// #[arg(...)] attributes configure each flag. Every flag can also be set with
// a SITEMAPPY_* environment variable, which is handy in CI.
//
// Validation happens here, before the crawl engine ever runs:
// - the base URL must be an absolute http:// or https:// URL with a host
// - the worker count must be at least 1
// - delay and timeout must be non-negative numbers of seconds
//
// Rust concepts:
// - #[derive(Parser)]: clap generates the parsing code from the struct
// - ValueEnum: turns an enum into a fixed set of accepted flag values
// - Newtype (Seconds): a one-field struct that gives Duration its own Display
// =============================================================================

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use clap::builder::TypedValueParser;
use clap::{Parser, ValueEnum};
use url::Url;

use sitemappy::crawl::DEFAULT_WORKERS;
use sitemappy::extract::DEFAULT_TIMEOUT;
use sitemappy::{CrawlConfig, FailurePolicy};

#[derive(Parser, Debug)]
#[command(
    name = "sitemappy",
    version,
    about = "Map every page of a website and the links it exposes",
    long_about = "sitemappy crawls a website breadth-first from a base URL, following links \
                  that stay on the same host, and writes a JSON map of each page to the \
                  links found on it."
)]
pub struct Cli {
    /// Website URL to start from (e.g., https://example.com)
    #[arg(value_parser = parse_base_url)]
    pub base_url: String,

    /// Number of pages fetched concurrently
    #[arg(
        short,
        long,
        env = "SITEMAPPY_WORKERS",
        default_value_t = DEFAULT_WORKERS,
        value_parser = clap::value_parser!(u64).range(1..).map(|n| n as usize)
    )]
    pub workers: usize,

    /// Maximum crawl depth (0 = unlimited)
    ///
    /// Depth 1 = just the base page
    /// Depth 2 = the base page + the same-host pages it links to
    #[arg(short = 'd', long, env = "SITEMAPPY_MAX_DEPTH", default_value_t = 0)]
    pub max_depth: usize,

    /// Seconds each worker waits before every fetch (e.g., 0.5)
    #[arg(
        long,
        env = "SITEMAPPY_DELAY",
        default_value_t = Seconds(Duration::ZERO),
        value_parser = parse_seconds
    )]
    pub delay: Seconds,

    /// Seconds before a single page request gives up
    #[arg(
        long,
        env = "SITEMAPPY_TIMEOUT",
        default_value_t = Seconds(DEFAULT_TIMEOUT),
        value_parser = parse_seconds
    )]
    pub timeout: Seconds,

    /// What to do when a page cannot be fetched
    #[arg(long, env = "SITEMAPPY_ON_ERROR", value_enum, default_value_t = OnError::Record)]
    pub on_error: OnError,

    /// File the sitemap JSON is written to
    #[arg(short, long, env = "SITEMAPPY_OUTPUT", default_value = "sitemap.json")]
    pub output: PathBuf,

    /// Print the sitemap JSON to stdout instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Log every page as it is crawled
    #[arg(short, long)]
    pub verbose: bool,
}

// A duration given on the command line as a number of seconds
//
// Display prints it back the same way, which is what clap shows as the
// [default: ...] in --help
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Seconds(pub Duration);

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_secs_f64())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OnError {
    /// Stop the crawl at the first page that fails
    Abort,
    /// Note the failure and keep crawling
    Record,
}

impl From<OnError> for FailurePolicy {
    fn from(value: OnError) -> Self {
        match value {
            OnError::Abort => FailurePolicy::Abort,
            OnError::Record => FailurePolicy::Record,
        }
    }
}

impl Cli {
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig::default()
            .with_workers(self.workers)
            .with_max_depth(self.max_depth)
            .with_delay(self.delay.0)
            .with_failure_policy(self.on_error.into())
    }
}

// Accepts absolute http/https URLs with a host
//
// The URL is returned exactly as typed: it becomes the first key of the
// sitemap, so it is not normalized
fn parse_base_url(value: &str) -> Result<String, String> {
    let invalid = || format!("Invalid URL provided: {}", value);

    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(invalid());
    }

    let url = Url::parse(value).map_err(|_| invalid())?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(value.to_string()),
        _ => Err(invalid()),
    }
}

fn parse_seconds(value: &str) -> Result<Seconds, String> {
    let seconds: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", value))?;

    Duration::try_from_secs_f64(seconds)
        .map(Seconds)
        .map_err(|_| format!("'{}' must be a non-negative number of seconds", value))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. default_value vs default_value_t
//    - default_value = "sitemap.json" is a string clap parses like user input
//    - default_value_t = DEFAULT_WORKERS is a typed value, shown in --help
//      through its Display impl
//
// 2. Why does Seconds exist?
//    - Duration has no Display, so it cannot be a default_value_t directly
//    - Wrapping it lets the defaults come straight from the library constants
//
// 3. What is value_parser!(u64).range(1..).map(...)?
//    - Parse as u64, reject anything below 1, then convert to usize
//    - clap reports a range error itself, so no manual check is needed
// -----------------------------------------------------------------------------
