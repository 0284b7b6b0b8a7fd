use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, JoinHandle};

use log::debug;

use crate::core::actions::cancellation::{CancelToken, RunToken};

struct QueueInner {
    runs: Vec<RunToken>,
    handles: Vec<JoinHandle<()>>,
}

/// Single-flight discipline over render runs: at most one run is
/// authoritative, and appending a new one cancels every run tracked
/// before it.
///
/// Cancelled runs are dropped from tracking immediately — in-flight
/// work is not aborted, it just finds its token cancelled at the next
/// poll and winds down. [`has_running_job`] therefore answers "is any
/// *tracked* run still live", which is what a finishing run consults to
/// decide whether its late result may still commit.
///
/// [`has_running_job`]: RenderQueue::has_running_job
pub struct RenderQueue {
    generation: AtomicU64,
    inner: Mutex<QueueInner>,
}

impl RenderQueue {
    #[must_use]
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            inner: Mutex::new(QueueInner {
                runs: Vec::new(),
                handles: Vec::new(),
            }),
        }
    }

    /// Cancels and forgets all tracked runs, then starts `run` on its
    /// own thread with a fresh token and generation. Returns the
    /// generation.
    pub fn append<F>(&self, run: F) -> u64
    where
        F: FnOnce(RunToken, u64) + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let token = RunToken::new();

        let mut inner = self.inner.lock().unwrap();
        Self::cancel_tracked(&mut inner);
        inner.runs.push(token.clone());

        // Reap run threads that already finished; live ones stay
        // joinable for shutdown.
        inner.handles.retain(|handle| !handle.is_finished());

        let handle = thread::spawn(move || run(token, generation));
        inner.handles.push(handle);

        debug!("run {} appended", generation);
        generation
    }

    /// Cancels and forgets all tracked runs without starting a new one;
    /// used when the user begins a new interaction before the next run
    /// is ready to submit.
    pub fn cancel_previous(&self) {
        let mut inner = self.inner.lock().unwrap();
        Self::cancel_tracked(&mut inner);
    }

    #[must_use]
    pub fn has_running_job(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.runs.iter().any(|token| !token.is_cancelled())
    }

    /// Waits for every started run thread to finish. Joining happens
    /// outside the lock so finishing runs can still consult the queue.
    pub fn join_all(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut inner = self.inner.lock().unwrap();
            inner.handles.drain(..).collect()
        };

        for handle in handles {
            let _ = handle.join();
        }
    }

    pub fn shutdown(&self) {
        self.cancel_previous();
        self.join_all();
    }

    fn cancel_tracked(inner: &mut QueueInner) {
        if !inner.runs.is_empty() {
            debug!("cancelling {} tracked run(s)", inner.runs.len());
        }
        for token in &inner.runs {
            token.cancel();
        }
        inner.runs.clear();
    }
}

impl Default for RenderQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RenderQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}
