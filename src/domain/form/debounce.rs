//! Per-key debouncing of deferred work

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// Runs at most one delayed task per key; rescheduling a key aborts the
/// task already waiting for it.
///
/// Scheduling spawns onto the current tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(HashMap::new()),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` once `delay` has elapsed without another call for `key`
    pub fn schedule<F>(&self, key: impl Into<String>, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let key = key.into();
        let delay = self.delay;
        let mut pending = self.pending.lock();

        if let Some(previous) = pending.remove(&key) {
            previous.abort();
        }

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });

        pending.retain(|_, h| !h.is_finished());
        pending.insert(key, handle);
    }

    /// Abort the task waiting for `key`; returns whether one was pending
    pub fn cancel(&self, key: &str) -> bool {
        match self.pending.lock().remove(key) {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    pub fn cancel_all(&self) {
        for (_, handle) in self.pending.lock().drain() {
            handle.abort();
        }
    }

    pub fn is_pending(&self, key: &str) -> bool {
        self.pending
            .lock()
            .get(key)
            .is_some_and(|h| !h.is_finished())
    }

    pub fn pending_count(&self) -> usize {
        self.pending
            .lock()
            .values()
            .filter(|h| !h.is_finished())
            .count()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_runs_after_delay() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        debouncer.schedule("ctx-size", async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending("ctx-size"));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(debouncer.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_replaces_pending_task() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let seen = Arc::new(Mutex::new(Vec::new()));

        for value in [1, 2, 3] {
            let seen = seen.clone();
            debouncer.schedule("threads", async move {
                seen.lock().push(value);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(*seen.lock(), vec![3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let calls = Arc::new(AtomicUsize::new(0));

        for key in ["temp", "top-k"] {
            let counter = calls.clone();
            debouncer.schedule(key, async move {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert_eq!(debouncer.pending_count(), 2);
        tokio::time::sleep(Duration::from_millis(301)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_run() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        debouncer.schedule("seed", async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(debouncer.cancel("seed"));
        assert!(!debouncer.cancel("seed"));

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
