//! Admission control for outbound requests.
//!
//! # Responsibilities
//! - Cap the number of requests on the wire at once
//! - Start waiting requests in arrival order
//! - Release a slot when a request finishes, however it finishes
//!
//! # Design Decisions
//! - Built on `tokio::sync::Semaphore`, which grants permits in FIFO order
//! - Slots are RAII guards, so a dropped or failed task frees its slot

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A bounded-concurrency FIFO queue. Clones share the same slots.
#[derive(Debug, Clone)]
pub struct RequestQueue {
    inner: Arc<QueueInner>,
}

#[derive(Debug)]
struct QueueInner {
    permits: Arc<Semaphore>,
    max_concurrent: usize,
    in_flight: AtomicUsize,
    waiting: AtomicUsize,
}

impl RequestQueue {
    /// Create a queue running at most `max_concurrent` tasks (minimum 1).
    pub fn new(max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            inner: Arc::new(QueueInner {
                permits: Arc::new(Semaphore::new(max_concurrent)),
                max_concurrent,
                in_flight: AtomicUsize::new(0),
                waiting: AtomicUsize::new(0),
            }),
        }
    }

    /// Run `task` once a slot is free.
    ///
    /// The task is not started until admitted. Its output, success or
    /// failure, is returned to the caller unchanged.
    pub async fn enqueue<F, Fut, T>(&self, task: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let _slot = self.acquire().await;
        task().await
    }

    /// Wait for a slot. The slot is held until the returned guard is dropped.
    pub async fn acquire(&self) -> QueueSlot {
        let waiting = WaitGuard::new(&self.inner.waiting);
        let permit = match self.inner.permits.clone().acquire_owned().await {
            Ok(permit) => Some(permit),
            // The semaphore is never closed; degrade to unbounded if it ever is.
            Err(_) => None,
        };
        drop(waiting);

        let in_flight = self.inner.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!(
            in_flight,
            max = self.inner.max_concurrent,
            "Request admitted"
        );
        QueueSlot {
            queue: self.inner.clone(),
            _permit: permit,
        }
    }

    /// Tasks currently running.
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    /// Tasks waiting for a slot.
    pub fn waiting(&self) -> usize {
        self.inner.waiting.load(Ordering::SeqCst)
    }

    pub fn max_concurrent(&self) -> usize {
        self.inner.max_concurrent
    }
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::new(5)
    }
}

/// A RAII guard holding one queue slot.
#[derive(Debug)]
pub struct QueueSlot {
    queue: Arc<QueueInner>,
    _permit: Option<OwnedSemaphorePermit>,
}

impl Drop for QueueSlot {
    fn drop(&mut self) {
        self.queue.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Counts a waiter for as long as it is alive, including when cancelled.
struct WaitGuard<'a>(&'a AtomicUsize);

impl<'a> WaitGuard<'a> {
    fn new(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for WaitGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
