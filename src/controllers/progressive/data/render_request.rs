use std::error::Error;
use std::fmt;

use crate::core::data::zone::Zone;

/// Upper bound on the refinement depth accepted by a request. Each
/// level fans out four ways, so the leaf count grows as `4^depth`; this
/// bound keeps the fan-out within what the scoped-thread recursion can
/// sensibly spawn.
pub const MAX_RENDER_DEPTH: u32 = 6;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RenderRequestError {
    NonPositiveThreshold { threshold: f64 },
    NonPositiveZoom { zoom: f64 },
    NonPositiveCellSize { target_cell_size: f64 },
    DepthTooDeep { depth: u32, max: u32 },
}

impl fmt::Display for RenderRequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveThreshold { threshold } => {
                write!(f, "divergence threshold must be positive: {}", threshold)
            }
            Self::NonPositiveZoom { zoom } => {
                write!(f, "zoom must be positive: {}", zoom)
            }
            Self::NonPositiveCellSize { target_cell_size } => {
                write!(f, "target cell size must be positive: {}", target_cell_size)
            }
            Self::DepthTooDeep { depth, max } => {
                write!(f, "refinement depth {} exceeds the maximum of {}", depth, max)
            }
        }
    }
}

impl Error for RenderRequestError {}

/// Snapshot of every parameter for one render run.
///
/// Immutable by design: built once per user interaction and owned by
/// that run. The zone is already validated by its own constructor;
/// [`validate`](Self::validate) covers the remaining numeric fields and
/// runs before any work starts, so a bad request never begins a partial
/// run.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub zone: Zone,
    pub zoom: f64,
    pub depth: u32,
    pub target_cell_size: f64,
    pub nb_iteration: u32,
    pub threshold: f64,
    pub is_debugging: bool,
}

impl RenderRequest {
    pub fn validate(&self) -> Result<(), RenderRequestError> {
        if !(self.threshold > 0.0 && self.threshold.is_finite()) {
            return Err(RenderRequestError::NonPositiveThreshold {
                threshold: self.threshold,
            });
        }

        if !(self.zoom > 0.0 && self.zoom.is_finite()) {
            return Err(RenderRequestError::NonPositiveZoom { zoom: self.zoom });
        }

        if !(self.target_cell_size > 0.0 && self.target_cell_size.is_finite()) {
            return Err(RenderRequestError::NonPositiveCellSize {
                target_cell_size: self.target_cell_size,
            });
        }

        if self.depth > MAX_RENDER_DEPTH {
            return Err(RenderRequestError::DepthTooDeep {
                depth: self.depth,
                max: MAX_RENDER_DEPTH,
            });
        }

        Ok(())
    }
}
