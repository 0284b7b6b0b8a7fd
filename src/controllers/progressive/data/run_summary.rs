use std::time::Duration;

use crate::core::data::real_cell_size::RealCellSize;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RunSummary {
    pub generation: u64,
    pub real_cell_size: RealCellSize,
    pub render_duration: Duration,
}
