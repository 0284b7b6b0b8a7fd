use std::error::Error;
use std::fmt;
use std::path::Path;
use std::time::Instant;

use log::info;

use crate::controllers::progressive::data::render_request::{RenderRequest, RenderRequestError};
use crate::core::actions::cancellation::NeverCancel;
use crate::core::actions::evaluate_tile::evaluate_tile_rayon;
use crate::core::data::pixel_buffer::{PixelBuffer, PixelBufferError};
use crate::core::data::tile_job::TileJob;
use crate::core::data::transform::Transform;
use crate::presenters::canvas::rasterize_points;
use crate::presenters::colour_map::IterationColourMap;
use crate::storage::write_ppm::write_ppm;

#[derive(Debug)]
pub enum ExportError {
    Request(RenderRequestError),
    Buffer(PixelBufferError),
    Io(std::io::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(err) => write!(f, "render request error: {}", err),
            Self::Buffer(err) => write!(f, "pixel buffer error: {}", err),
            Self::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Request(err) => Some(err),
            Self::Buffer(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<RenderRequestError> for ExportError {
    fn from(err: RenderRequestError) -> Self {
        Self::Request(err)
    }
}

impl From<PixelBufferError> for ExportError {
    fn from(err: PixelBufferError) -> Self {
        Self::Buffer(err)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Renders the requested zone in a single pass at the target cell size
/// and rasterizes it through the colour map.
///
/// No pool, no refinement, no cancellation: the whole zone is one big
/// tile evaluated column-parallel on rayon. The progressive path is for
/// interaction; this one is for writing a finished frame out.
pub fn export_zone(
    request: &RenderRequest,
    colour_map: &dyn IterationColourMap,
) -> Result<PixelBuffer, ExportError> {
    request.validate()?;

    let zone_w = request.zone.width() * request.zoom;
    let zone_h = request.zone.height() * request.zoom;
    let step_count_x = ((zone_w / request.target_cell_size).trunc() as u32).max(1);
    let step_count_y = ((zone_h / request.target_cell_size).trunc() as u32).max(1);

    let job = TileJob {
        zone: request.zone,
        step_count_x,
        step_count_y,
        nb_iteration: request.nb_iteration,
        threshold: request.threshold,
    };

    let points = match evaluate_tile_rayon(&job, &NeverCancel) {
        Ok(points) => points,
        Err(_) => unreachable!("NeverCancel token should never signal cancellation"),
    };

    let width = (zone_w.ceil() as u32).max(1);
    let height = (zone_h.ceil() as u32).max(1);
    let mut buffer = PixelBuffer::new(width, height)?;

    rasterize_points(
        &mut buffer,
        &points,
        zone_w / f64::from(step_count_x),
        zone_h / f64::from(step_count_y),
        request.nb_iteration,
        Transform::anchored_to(request.zone, request.zoom),
        colour_map,
    );

    Ok(buffer)
}

pub fn export_zone_to_ppm(
    request: &RenderRequest,
    colour_map: &dyn IterationColourMap,
    filepath: impl AsRef<Path>,
) -> Result<(), ExportError> {
    let start = Instant::now();
    let buffer = export_zone(request, colour_map)?;
    write_ppm(&buffer, &filepath)?;

    info!(
        "exported {}x{} frame in {:?} to {}",
        buffer.width(),
        buffer.height(),
        start.elapsed(),
        filepath.as_ref().display()
    );

    Ok(())
}
