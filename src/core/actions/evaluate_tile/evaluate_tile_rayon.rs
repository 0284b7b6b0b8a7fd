use rayon::prelude::*;

use crate::core::actions::cancellation::{CANCEL_CHECK_INTERVAL_SAMPLES, CancelToken, Cancelled};
use crate::core::actions::escape_time::escape_time;
use crate::core::data::complex::Complex;
use crate::core::data::point::Point;
use crate::core::data::tile_job::TileJob;

/// One-shot, cancel-aware tile evaluation on rayon's work-stealing pool.
///
/// Used by the export path, where a single large tile is the whole job
/// and the worker pool's per-tile concurrency buys nothing. Columns are
/// computed in parallel and collected in order, so the output matches
/// [`evaluate_tile`](super::evaluate_tile) exactly.
///
/// Cancellation is polled at each column start and every
/// [`CANCEL_CHECK_INTERVAL_SAMPLES`] samples within a column. Returning
/// [`Cancelled`] is expected control flow, not a failure to report.
pub fn evaluate_tile_rayon<C: CancelToken>(
    job: &TileJob,
    cancel: &C,
) -> Result<Vec<Point>, Cancelled> {
    let step_x = job.zone.width() / f64::from(job.step_count_x);
    let step_y = job.zone.height() / f64::from(job.step_count_y);

    let columns: Result<Vec<Vec<Point>>, Cancelled> = (0..job.step_count_x)
        .into_par_iter()
        .map(|i| {
            let x = job.zone.xmin() + f64::from(i) * step_x;
            let mut column = Vec::with_capacity(job.step_count_y as usize);

            for j in 0..job.step_count_y {
                if j as usize % CANCEL_CHECK_INTERVAL_SAMPLES == 0 && cancel.is_cancelled() {
                    return Err(Cancelled);
                }

                let y = job.zone.ymin() + f64::from(j) * step_y;
                let iterations = escape_time(
                    Complex { real: x, imag: y },
                    job.nb_iteration,
                    job.threshold,
                );
                column.push(Point { x, y, iterations });
            }

            Ok(column)
        })
        .collect();

    columns.map(|c| c.into_iter().flatten().collect())
}
