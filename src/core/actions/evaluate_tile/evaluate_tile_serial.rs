use crate::core::actions::escape_time::escape_time;
use crate::core::data::complex::Complex;
use crate::core::data::point::Point;
use crate::core::data::tile_job::TileJob;

/// Samples the job's zone on its grid and evaluates the escape loop at
/// every sample. Output order is x-index outer, y-index inner, and is
/// kept stable: consumers only rely on it for deterministic redraw, but
/// tests pin it down.
///
/// Runs on the caller's thread; each pool worker is already one
/// concurrency slot, so no inner parallelism here.
#[must_use]
pub fn evaluate_tile(job: &TileJob) -> Vec<Point> {
    let step_x = job.zone.width() / f64::from(job.step_count_x);
    let step_y = job.zone.height() / f64::from(job.step_count_y);

    let mut points = Vec::with_capacity(job.step_count_x as usize * job.step_count_y as usize);
    for i in 0..job.step_count_x {
        let x = job.zone.xmin() + f64::from(i) * step_x;
        for j in 0..job.step_count_y {
            let y = job.zone.ymin() + f64::from(j) * step_y;
            let iterations = escape_time(
                Complex { real: x, imag: y },
                job.nb_iteration,
                job.threshold,
            );
            points.push(Point { x, y, iterations });
        }
    }

    points
}
