// src/crawl/frontier.rs
// =============================================================================
// The frontier is the shared work queue of the crawl.
//
// It is a FIFO queue of (url, depth) tasks plus an "outstanding work" counter:
// - put() adds a task and bumps the counter
// - complete() is called once a task is fully processed and drops the counter
// - join() waits until the counter hits zero
//
// The counter covers tasks that are queued AND tasks a worker is still
// processing. A worker can enqueue children before it completes its own task,
// so the counter can only reach zero once the whole reachable graph is done.
// That is how the crawl knows it is finished without knowing the page count
// in advance.
//
// close() is the cancellation switch: it wakes every waiting worker and
// joiner, makes take() return None and makes put() drop new tasks.
//
// Rust concepts:
// - VecDeque: FIFO queue, push_back() to add and pop_front() to take
// - std::sync::Mutex: guards the queue and the counter together
// - tokio::sync::Notify: lets async code sleep until another task signals it
// =============================================================================

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::Notify;

// One unit of crawl work
//
// Immutable once created: the seed task is (base_url, 0) and every child
// task is (link, parent.depth + 1)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: String,
    pub depth: usize,
}

impl CrawlTask {
    pub fn seed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: 0,
        }
    }

    // Builds the task for a link discovered on this task's page
    pub fn child(&self, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            depth: self.depth + 1,
        }
    }
}

#[derive(Debug, Default)]
struct FrontierState {
    queue: VecDeque<CrawlTask>,
    outstanding: usize,
    closed: bool,
}

#[derive(Debug, Default)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    // Signalled when a task is queued or the frontier is closed
    available: Notify,
    // Signalled when outstanding work drops to zero or the frontier is closed
    drained: Notify,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    // Enqueues a task and counts it as outstanding work
    //
    // Returns false (and drops the task) once the frontier has been closed
    pub fn put(&self, task: CrawlTask) -> bool {
        {
            let mut state = self.lock();
            if state.closed {
                return false;
            }
            // Counted now, uncounted in complete()
            state.queue.push_back(task);
            state.outstanding += 1;
        }
        // One new task only needs one worker
        self.available.notify_one();
        true
    }

    // Waits for the next task
    //
    // Returns None when the frontier is closed. Tasks still queued at that
    // point are abandoned.
    pub async fn take(&self) -> Option<CrawlTask> {
        loop {
            // Register interest before looking at the queue, so a put() or
            // close() between the check and the await is never missed
            let notified = self.available.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.lock();
                if state.closed {
                    return None;
                }
                if let Some(task) = state.queue.pop_front() {
                    return Some(task);
                }
            }

            notified.await;
        }
    }

    // Marks a task taken from this frontier as fully processed
    pub fn complete(&self, _task: &CrawlTask) {
        let drained = {
            let mut state = self.lock();
            debug_assert!(state.outstanding > 0, "complete() without matching put()");
            state.outstanding = state.outstanding.saturating_sub(1);
            state.outstanding == 0
        };

        if drained {
            self.drained.notify_waiters();
        }
    }

    // Waits until every task put so far, and every task those tasks produced,
    // has been completed, or until the frontier is closed
    pub async fn join(&self) {
        loop {
            let notified = self.drained.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let state = self.lock();
                if state.outstanding == 0 || state.closed {
                    return;
                }
            }

            notified.await;
        }
    }

    // Cancels the frontier: no new tasks are accepted and every waiter wakes up
    pub fn close(&self) {
        self.lock().closed = true;
        // notify_waiters() wakes everyone currently waiting, not just one
        self.available.notify_waiters();
        self.drained.notify_waiters();
    }

    #[cfg(test)]
    fn is_closed(&self) -> bool {
        self.lock().closed
    }

    #[cfg(test)]
    fn outstanding(&self) -> usize {
        self.lock().outstanding
    }

    // The lock is never held across an await and no code path panics while
    // holding it, so a poisoned lock still guards consistent data
    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a std Mutex in async code?
//    - The lock is only held for a few lines and never across an .await
//    - tokio's Mutex is only needed when a guard must live across an .await
//
// 2. What does notified.as_mut().enable() do?
//    - Creating a Notified future does not register it yet
//    - enable() registers it right away, before we look at the queue
//    - A notify that lands between "queue is empty" and ".await" is then
//      still delivered instead of being lost
//
// 3. What is tokio::pin!?
//    - enable() needs a pinned future (one that will not move in memory)
//    - pin! pins it on the stack, which is enough inside one function
//
// 4. What is unwrap_or_else(PoisonError::into_inner)?
//    - A Mutex becomes "poisoned" if a thread panics while holding it
//    - into_inner takes the guard anyway instead of panicking again
// -----------------------------------------------------------------------------
