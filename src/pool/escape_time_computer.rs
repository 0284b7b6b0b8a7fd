use crate::core::actions::evaluate_tile::evaluate_tile;
use crate::core::data::point::Point;
use crate::core::data::tile_job::TileJob;
use crate::pool::ports::TileComputer;

/// Production computer: serial escape-time evaluation of the tile grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscapeTimeComputer;

impl TileComputer for EscapeTimeComputer {
    fn compute(&self, job: &TileJob) -> Vec<Point> {
        evaluate_tile(job)
    }
}
