// src/main.rs
// =============================================================================
// This is the entry point of the sitemappy CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, to stderr, filtered by RUST_LOG)
// 3. Crawl the site; Ctrl-C stops early and keeps what was crawled so far
// 4. Write the sitemap file and print a summary (or the JSON itself)
// 5. Exit with proper code (0 = success, 1 = some pages failed, 2 = error)
// =============================================================================

mod cli;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use futures::future;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use sitemappy::{CrawlReport, Crawler, HttpLinkExtractor};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so that --json output on stdout stays clean
fn init_logging(verbose: bool) {
    let default_level = if verbose { "sitemappy=debug" } else { "sitemappy=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Returns:
//   Ok(0) = every page crawled
//   Ok(1) = crawl finished, but some pages failed or it was interrupted
//   Err   = the crawl could not run or was aborted
async fn run(cli: Cli) -> Result<i32> {
    let extractor = HttpLinkExtractor::new(&cli.base_url, cli.timeout.0)?;
    let crawler = Crawler::new(Arc::new(extractor), cli.crawl_config());

    let report = crawler.crawl_until(&cli.base_url, ctrl_c()).await?;

    report.write_sitemap(&cli.output)?;
    info!(path = %cli.output.display(), "sitemap written");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report.pages)?);
    } else {
        print_summary(&cli.base_url, &report);
    }

    Ok(if report.is_complete() { 0 } else { 1 })
}

// Resolves on the first Ctrl-C
//
// If the signal handler cannot be installed the crawl simply runs to the end
async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => warn!("interrupted, finishing pages in flight"),
        Err(e) => {
            warn!(error = %e, "cannot listen for Ctrl-C");
            future::pending::<()>().await;
        }
    }
}

fn print_summary(base_url: &str, report: &CrawlReport) {
    println!("🔍 Mapped website: {}", base_url);
    if report.interrupted {
        println!("⚠️  Crawl interrupted, the map is partial");
    }

    if !report.failures.is_empty() {
        println!();
        println!("{:<60} {:<40}", "URL", "ERROR");
        println!("{}", "=".repeat(100));
        for (url, reason) in &report.failures {
            println!("{:<60} {:<40}", truncate(url, 57), reason);
        }
        println!();
    }

    println!("📊 Summary:");
    println!("   📄 Pages: {}", report.page_count());
    println!("   🔗 Links: {}", report.link_count());
    println!("   ❌ Failed: {}", report.failures.len());
}

// Truncates long URLs for table display
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
