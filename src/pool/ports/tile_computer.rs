use crate::core::data::point::Point;
use crate::core::data::tile_job::TileJob;

/// Compute port of the worker pool.
///
/// The pool schedules; what a worker actually does with a job sits
/// behind this trait, so tests can inject computers with artificial
/// delays and dispatch logs.
pub trait TileComputer: Send + Sync {
    fn compute(&self, job: &TileJob) -> Vec<Point>;
}
