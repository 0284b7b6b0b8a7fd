use std::sync::{Arc, Weak};
use std::time::Instant;

use log::{debug, info};

use crate::controllers::progressive::data::render_request::{RenderRequest, RenderRequestError};
use crate::controllers::progressive::data::run_summary::RunSummary;
use crate::controllers::progressive::events::render_event::RenderEvent;
use crate::controllers::progressive::orchestrator::render_progressive;
use crate::controllers::progressive::ports::render_sink::RenderSink;
use crate::controllers::progressive::render_queue::RenderQueue;
use crate::core::actions::cancellation::CancelToken;
use crate::core::data::transform::Transform;
use crate::pool::worker_pool::WorkerPool;

/// Wires the supersession queue, the worker pool and the render sink
/// into the submit/cancel surface the view layer talks to.
///
/// Each accepted submission becomes one run: `Started` is emitted, the
/// progressive renderer executes, and `Completed` follows — unless the
/// run was superseded, in which case its result is discarded. A
/// cancelled run that is still the only tracked run does commit, so a
/// cancellation racing a nearly-finished run never loses the frame.
pub struct ProgressiveController {
    pool: Arc<WorkerPool>,
    sink: Arc<dyn RenderSink>,
    queue: Arc<RenderQueue>,
}

impl ProgressiveController {
    pub fn new(pool: Arc<WorkerPool>, sink: Arc<dyn RenderSink>) -> Self {
        Self {
            pool,
            sink,
            queue: Arc::new(RenderQueue::new()),
        }
    }

    /// Validates the request synchronously — a rejected request starts
    /// nothing — then supersedes any tracked run and starts this one.
    /// Returns the run's generation.
    pub fn submit(
        &self,
        request: RenderRequest,
        transform: Transform,
    ) -> Result<u64, RenderRequestError> {
        request.validate()?;

        // Flush tiles the superseded run still has queued so the new
        // run's tiles are not stuck behind stale work.
        self.pool.terminate();

        let pool = Arc::clone(&self.pool);
        let sink = Arc::clone(&self.sink);
        // The run only needs the queue for the late-result check; a
        // weak handle keeps run threads out of the queue's ownership.
        let queue: Weak<RenderQueue> = Arc::downgrade(&self.queue);

        let generation = self.queue.append(move |token, generation| {
            sink.present(RenderEvent::Started { generation });
            let start = Instant::now();

            let Ok(real_cell_size) =
                render_progressive(&request, transform, &token, &pool, sink.as_ref(), generation)
            else {
                // Unreachable: the request was validated above.
                return;
            };

            let superseded = token.is_cancelled()
                && queue
                    .upgrade()
                    .is_some_and(|queue| queue.has_running_job());

            if superseded {
                debug!("run {} superseded, discarding its result", generation);
                return;
            }

            info!(
                "run {} completed in {:?} at cell {:.3}x{:.3}",
                generation,
                start.elapsed(),
                real_cell_size.cell_w,
                real_cell_size.cell_h
            );
            sink.present(RenderEvent::Completed(RunSummary {
                generation,
                real_cell_size,
                render_duration: start.elapsed(),
            }));
        });

        Ok(generation)
    }

    /// Cancels whatever is running and flushes the pool's backlog; the
    /// view layer calls this when a new interaction begins before the
    /// next request exists.
    pub fn cancel(&self) {
        self.queue.cancel_previous();
        self.pool.terminate();
    }

    #[must_use]
    pub fn has_running_job(&self) -> bool {
        self.queue.has_running_job()
    }

    /// Waits for all started runs to wind down.
    pub fn join_all(&self) {
        self.queue.join_all();
    }
}
