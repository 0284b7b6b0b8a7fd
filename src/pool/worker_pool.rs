use std::collections::VecDeque;
use std::error::Error;
use std::fmt;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use log::debug;

use crate::core::data::point::Point;
use crate::core::data::tile_job::TileJob;
use crate::pool::escape_time_computer::EscapeTimeComputer;
use crate::pool::ports::TileComputer;

/// Worker count used by the application when nothing else is configured.
pub const DEFAULT_POOL_SIZE: usize = 8;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WorkerPoolError {
    NoWorkers,
}

impl fmt::Display for WorkerPoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWorkers => write!(f, "worker pool needs at least one worker"),
        }
    }
}

impl Error for WorkerPoolError {}

struct Dispatch {
    job: TileJob,
    result_tx: Sender<Vec<Point>>,
    epoch: u64,
}

enum WorkerMessage {
    Dispatch(Dispatch),
    Stop,
}

struct QueuedJob {
    job: TileJob,
    result_tx: Sender<Vec<Point>>,
}

struct PoolState {
    idle: Vec<usize>,
    pending: VecDeque<QueuedJob>,
    epoch: u64,
}

struct PoolShared {
    state: Mutex<PoolState>,
    computer: Arc<dyn TileComputer>,
    senders: Vec<Sender<WorkerMessage>>,
}

/// A tile result that has been submitted but not necessarily computed.
///
/// Dropping it abandons the result; the worker's send simply fails.
pub struct PendingTile {
    result_rx: Receiver<Vec<Point>>,
}

impl PendingTile {
    /// Blocks until the tile is computed. A job flushed by
    /// [`WorkerPool::terminate`] resolves to an empty point set, as does
    /// a job orphaned by pool shutdown; neither is an error.
    #[must_use]
    pub fn wait(self) -> Vec<Point> {
        self.result_rx.recv().unwrap_or_default()
    }
}

/// Fixed-size pool of compute workers with a FIFO overflow queue.
///
/// Jobs are dispatched to workers in strict submission order: a job is
/// handed to an idle worker immediately, or queued until a worker frees
/// and claims the oldest queued job itself. Completion order is not
/// ordered — each caller waits only on its own [`PendingTile`].
///
/// The pool holds no cancellation state. [`terminate`] flushes the
/// queue and suppresses results dispatched before the call (both
/// resolve empty), then keeps accepting submissions — the transient
/// flush that precedes a superseding render run.
///
/// [`terminate`]: WorkerPool::terminate
pub struct WorkerPool {
    shared: Arc<PoolShared>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(workers: usize, computer: Arc<dyn TileComputer>) -> Result<Self, WorkerPoolError> {
        if workers == 0 {
            return Err(WorkerPoolError::NoWorkers);
        }

        let mut senders = Vec::with_capacity(workers);
        let mut receivers = Vec::with_capacity(workers);
        for _ in 0..workers {
            let (tx, rx) = mpsc::channel();
            senders.push(tx);
            receivers.push(rx);
        }

        let shared = Arc::new(PoolShared {
            state: Mutex::new(PoolState {
                idle: (0..workers).collect(),
                pending: VecDeque::new(),
                epoch: 0,
            }),
            computer,
            senders,
        });

        let handles = receivers
            .into_iter()
            .enumerate()
            .map(|(index, messages)| {
                let worker_shared = Arc::clone(&shared);
                thread::spawn(move || Self::worker_loop(index, &messages, &worker_shared))
            })
            .collect();

        debug!("worker pool started with {} workers", workers);

        Ok(Self {
            shared,
            workers: handles,
        })
    }

    pub fn with_escape_time(workers: usize) -> Result<Self, WorkerPoolError> {
        Self::new(workers, Arc::new(EscapeTimeComputer))
    }

    /// Submits a tile job. Dispatches to an idle worker if one exists,
    /// otherwise appends to the FIFO queue.
    #[must_use]
    pub fn submit(&self, job: TileJob) -> PendingTile {
        let (result_tx, result_rx) = mpsc::channel();

        let mut state = self.shared.state.lock().unwrap();
        if let Some(index) = state.idle.pop() {
            let dispatch = Dispatch {
                job,
                result_tx,
                epoch: state.epoch,
            };
            drop(state);
            // Send outside the lock; a worker that already stopped just
            // leaves the caller with an empty result.
            let _ = self.shared.senders[index].send(WorkerMessage::Dispatch(dispatch));
        } else {
            state.pending.push_back(QueuedJob { job, result_tx });
            debug!("workers busy, {} tile(s) queued", state.pending.len());
        }

        PendingTile { result_rx }
    }

    /// Flushes the pool: every queued job resolves empty, and results of
    /// jobs dispatched before this call are suppressed to empty. The
    /// pool stays open for new submissions.
    pub fn terminate(&self) {
        let mut state = self.shared.state.lock().unwrap();
        state.epoch += 1;

        let flushed = state.pending.len();
        for queued in state.pending.drain(..) {
            let _ = queued.result_tx.send(Vec::new());
        }

        if flushed > 0 {
            debug!("terminate flushed {} queued tile(s)", flushed);
        }
    }

    /// Stops the worker threads and joins them. Queued jobs resolve
    /// empty first. Run by `Drop`; only needed explicitly when shutdown
    /// ordering matters to the caller.
    pub fn shutdown(&mut self) {
        self.terminate();

        for sender in &self.shared.senders {
            let _ = sender.send(WorkerMessage::Stop);
        }
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }

    fn worker_loop(index: usize, messages: &Receiver<WorkerMessage>, shared: &Arc<PoolShared>) {
        while let Ok(message) = messages.recv() {
            let WorkerMessage::Dispatch(mut dispatch) = message else {
                return;
            };

            loop {
                let points = shared.computer.compute(&dispatch.job);

                let mut state = shared.state.lock().unwrap();
                let suppressed = dispatch.epoch != state.epoch;
                if suppressed {
                    debug!("worker {} suppressing result of flushed tile", index);
                }
                let _ = dispatch
                    .result_tx
                    .send(if suppressed { Vec::new() } else { points });

                // Claim the oldest queued job before going idle; the
                // queue is only non-empty while no worker is idle.
                match state.pending.pop_front() {
                    Some(next) => {
                        dispatch = Dispatch {
                            job: next.job,
                            result_tx: next.result_tx,
                            epoch: state.epoch,
                        };
                    }
                    None => {
                        state.idle.push(index);
                        break;
                    }
                }
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
