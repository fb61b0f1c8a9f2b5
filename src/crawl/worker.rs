// src/crawl/worker.rs
// =============================================================================
// The worker pool.
//
// How it works:
// 1. Seed the frontier with (base_url, depth 0)
// 2. Start N workers; each one loops:
//      take a task -> skip it if too deep or already visited -> wait the
//      politeness delay -> fetch its links -> queue the same-host ones at
//      depth + 1 -> record the page -> mark the task complete
// 3. Wait for the frontier to drain (or for a shutdown / abort)
// 4. Close the frontier so idle workers exit, wait for busy workers to
//    finish their current page, and hand back the results
//
// Workers never get killed mid-fetch. Closing the frontier is the only
// stop signal, and a worker only looks at it when it asks for its next task.
//
// Rust concepts:
// - Arc<CrawlState>: one shared state, one cheap handle per worker task
// - JoinSet: a group of spawned tasks we can wait on one at a time
// - tokio::select!: wait on several futures, act on whichever finishes first
// =============================================================================

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use futures::future;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, info_span, warn, Instrument};

use super::frontier::{CrawlTask, Frontier};
use super::report::CrawlReport;
use super::state::{ResultStore, VisitedSet};
use super::{CrawlConfig, CrawlError, FailurePolicy};
use crate::extract::LinkExtractor;

// Runs crawls with one extractor and one configuration
//
// Every call to crawl() builds its own frontier, visited set and result
// store, so nothing carries over between crawls
pub struct Crawler {
    extractor: Arc<dyn LinkExtractor>,
    config: CrawlConfig,
}

// Everything the workers of one crawl share
struct CrawlState {
    frontier: Frontier,
    visited: VisitedSet,
    results: ResultStore,
    extractor: Arc<dyn LinkExtractor>,
    config: CrawlConfig,
    // First failure under FailurePolicy::Abort
    aborted: Mutex<Option<CrawlError>>,
}

enum Stop {
    Drained,
    Interrupted,
    WorkerExited(Result<(), JoinError>),
}

impl Crawler {
    pub fn new(extractor: Arc<dyn LinkExtractor>, config: CrawlConfig) -> Self {
        Self { extractor, config }
    }

    // Crawls until every reachable same-host page has been processed
    pub async fn crawl(&self, base_url: &str) -> Result<CrawlReport, CrawlError> {
        self.crawl_until(base_url, future::pending()).await
    }

    // Like crawl(), but stops early when `shutdown` resolves
    //
    // An early stop still returns Ok: the report holds every page finished
    // so far and has `interrupted` set
    pub async fn crawl_until<F>(&self, base_url: &str, shutdown: F) -> Result<CrawlReport, CrawlError>
    where
        F: Future<Output = ()>,
    {
        if self.config.workers == 0 {
            return Err(CrawlError::NoWorkers);
        }

        let started = Instant::now();
        let state = Arc::new(CrawlState {
            frontier: Frontier::new(),
            visited: VisitedSet::new(),
            results: ResultStore::new(),
            extractor: Arc::clone(&self.extractor),
            config: self.config.clone(),
            aborted: Mutex::new(None),
        });

        info!(
            base_url,
            workers = self.config.workers,
            max_depth = self.config.max_depth,
            delay_ms = self.config.delay.as_millis() as u64,
            "starting crawl"
        );

        // The seed task is the only work at the start
        state.frontier.put(CrawlTask::seed(base_url));

        let mut workers = JoinSet::new();
        for id in 0..self.config.workers {
            let state = Arc::clone(&state);
            workers.spawn(run_worker(state).instrument(info_span!("worker", id)));
        }

        // select! polls `shutdown` by reference, so it has to stay in place
        tokio::pin!(shutdown);
        let stop = tokio::select! {
            _ = state.frontier.join() => Stop::Drained,
            _ = &mut shutdown => Stop::Interrupted,
            Some(exited) = workers.join_next() => Stop::WorkerExited(exited),
        };

        // From here on no new tasks are accepted and idle workers wake up and exit
        state.frontier.close();

        // Wait for busy workers to finish their page, keeping the first panic
        let interrupted = matches!(stop, Stop::Interrupted);
        let mut panicked = match stop {
            Stop::WorkerExited(Err(e)) => Some(e),
            _ => None,
        };
        while let Some(exited) = workers.join_next().await {
            if let Err(e) = exited {
                panicked.get_or_insert(e);
            }
        }

        if let Some(e) = panicked {
            return Err(CrawlError::WorkerPanicked(e.to_string()));
        }

        let aborted = state
            .aborted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(e) = aborted {
            warn!(error = %e, "crawl aborted");
            return Err(e);
        }

        // Every worker has exited, so nothing writes to the store any more
        let (pages, failures) = state.results.drain();
        let report = CrawlReport {
            pages,
            failures,
            interrupted,
        };

        info!(
            pages = report.page_count(),
            links = report.link_count(),
            failures = report.failures.len(),
            interrupted,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "crawl finished"
        );

        Ok(report)
    }
}

// One worker: runs until the frontier is closed
async fn run_worker(state: Arc<CrawlState>) {
    while let Some(task) = state.frontier.take().await {
        process_task(&state, &task).await;
        state.frontier.complete(&task);
    }
    debug!("worker stopped");
}

async fn process_task(state: &CrawlState, task: &CrawlTask) {
    if state.config.exceeds_depth(task.depth) {
        debug!(url = %task.url, depth = task.depth, "skipping page beyond depth limit");
        return;
    }

    // Dedup happens here, on dequeue: the same URL may sit in the queue
    // several times, but only one worker ever gets past this check
    if !state.visited.claim(&task.url) {
        return;
    }

    debug!(
        url = %task.url,
        depth = task.depth,
        visited = state.visited.len(),
        "crawling page"
    );

    // Politeness: only this worker waits, the others keep fetching
    if !state.config.delay.is_zero() {
        tokio::time::sleep(state.config.delay).await;
    }

    match state.extractor.get_links(&task.url).await {
        Ok(links) => {
            // Children go in before complete() runs for this task, so the
            // outstanding count never touches zero while there is work left
            for link in &links {
                if state.extractor.is_same_host(link) {
                    state.frontier.put(task.child(link.as_str()));
                }
            }
            state.results.record_links(&task.url, links);
        }
        Err(e) => {
            // {:#} keeps the whole anyhow context chain on one line
            let reason = format!("{:#}", e);
            match state.config.on_error {
                FailurePolicy::Record => {
                    warn!(url = %task.url, error = %reason, "failed to fetch page");
                    state.results.record_failure(&task.url, reason);
                }
                FailurePolicy::Abort => {
                    state
                        .aborted
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .get_or_insert(CrawlError::Fetch {
                            url: task.url.clone(),
                            reason,
                        });
                    state.frontier.close();
                }
            }
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is the state wrapped in Arc?
//    - tokio::spawn needs a 'static future, so each worker must own its data
//    - Arc::clone gives every worker its own handle to the same CrawlState
//    - The state is freed when the last handle is dropped
//
// 2. What does tokio::select! do here?
//    - Waits for the first of: the frontier draining, the shutdown signal,
//      or a worker exiting
//    - A worker only exits early if it panicked (or the frontier closed),
//      which is why join_next() is one of the branches
//
// 3. Why is the panic reported only after the other workers stop?
//    - Dropping a JoinSet aborts its tasks mid-fetch
//    - Draining it with join_next() lets every worker finish its page first
//
// 4. What is .instrument(info_span!("worker", id))?
//    - Attaches a tracing span to the worker's future
//    - Every log line the worker writes carries its worker id
//
// 5. Why not hold the Mutex while fetching?
//    - A std Mutex guard must not live across an .await
//    - Each lock is taken, used and dropped inside one synchronous block
// -----------------------------------------------------------------------------
