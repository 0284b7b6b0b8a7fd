use std::sync::Mutex;

use crate::controllers::progressive::events::render_event::RenderEvent;
use crate::controllers::progressive::ports::render_sink::RenderSink;
use crate::core::data::colour::Colour;
use crate::core::data::pixel_buffer::{PixelBuffer, PixelBufferError};
use crate::core::data::point::Point;
use crate::core::data::real_cell_size::RealCellSize;
use crate::core::data::transform::Transform;
use crate::core::data::zone::Zone;
use crate::presenters::colour_map::IterationColourMap;

const DEBUG_STROKE: Colour = Colour { r: 0, g: 255, b: 0 };

struct TileLayer {
    level: u32,
    zone: Zone,
    points: Vec<Point>,
    cell_w: f64,
    cell_h: f64,
    nb_iteration: u32,
    is_debugging: bool,
    transform: Transform,
}

#[derive(Default)]
struct CanvasState {
    layers: Vec<TileLayer>,
    real_cell_size: Option<RealCellSize>,
    computing: bool,
}

/// Software canvas consuming render events.
///
/// Tiles accumulate as layers; compositing paints them coarse-to-fine,
/// so a finer tile always covers the coarse one beneath it, and a
/// retire event drops a covered coarse layer outright. A `Started`
/// event clears the canvas for the new run. Because tiles accumulate
/// off-screen and [`composite`](Self::composite) builds a whole frame
/// at once, a half-drawn refinement is never observable.
pub struct CanvasPresenter {
    width: u32,
    height: u32,
    colour_map: Box<dyn IterationColourMap>,
    state: Mutex<CanvasState>,
}

impl CanvasPresenter {
    #[must_use]
    pub fn new(width: u32, height: u32, colour_map: Box<dyn IterationColourMap>) -> Self {
        Self {
            width,
            height,
            colour_map,
            state: Mutex::new(CanvasState::default()),
        }
    }

    #[must_use]
    pub fn is_computing(&self) -> bool {
        self.state.lock().unwrap().computing
    }

    #[must_use]
    pub fn real_cell_size(&self) -> Option<RealCellSize> {
        self.state.lock().unwrap().real_cell_size
    }

    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.state.lock().unwrap().layers.len()
    }

    /// Paints the accumulated layers into a fresh frame.
    pub fn composite(&self) -> Result<PixelBuffer, PixelBufferError> {
        let state = self.state.lock().unwrap();
        let mut buffer = PixelBuffer::new(self.width, self.height)?;

        let mut layers: Vec<&TileLayer> = state.layers.iter().collect();
        // Stable by level: coarse under fine, arrival order within a
        // level.
        layers.sort_by_key(|layer| layer.level);

        for layer in layers {
            rasterize_points(
                &mut buffer,
                &layer.points,
                layer.cell_w,
                layer.cell_h,
                layer.nb_iteration,
                layer.transform,
                self.colour_map.as_ref(),
            );

            if layer.is_debugging {
                stroke_zone(&mut buffer, layer.zone, layer.transform);
            }
        }

        Ok(buffer)
    }
}

impl RenderSink for CanvasPresenter {
    fn present(&self, event: RenderEvent) {
        let mut state = self.state.lock().unwrap();
        match event {
            RenderEvent::Started { .. } => {
                state.layers.clear();
                state.computing = true;
            }
            RenderEvent::Tile(tile) => {
                state.layers.push(TileLayer {
                    level: tile.level,
                    zone: tile.zone,
                    points: tile.points,
                    cell_w: tile.cell_w,
                    cell_h: tile.cell_h,
                    nb_iteration: tile.nb_iteration,
                    is_debugging: tile.is_debugging,
                    transform: tile.transform,
                });
            }
            RenderEvent::Retire { level, zone, .. } => {
                state
                    .layers
                    .retain(|layer| !(layer.level == level && layer.zone == zone));
            }
            RenderEvent::Completed(summary) => {
                state.real_cell_size = Some(summary.real_cell_size);
                state.computing = false;
            }
        }
    }
}

/// Fills one cell per point, mapped through the run's view transform.
/// Cells overhanging the buffer are clipped by the buffer itself.
pub fn rasterize_points(
    buffer: &mut PixelBuffer,
    points: &[Point],
    cell_w: f64,
    cell_h: f64,
    nb_iteration: u32,
    transform: Transform,
    colour_map: &dyn IterationColourMap,
) {
    let width = i64::from(buffer.width());
    let height = i64::from(buffer.height());

    for point in points {
        let view_x = transform.to_view_x(point.x);
        let view_y = transform.to_view_y(point.y);

        let x_start = (view_x.floor() as i64).max(0);
        let y_start = (view_y.floor() as i64).max(0);
        let x_end = ((view_x + cell_w).ceil() as i64).min(width);
        let y_end = ((view_y + cell_h).ceil() as i64).min(height);

        let colour = colour_map.colour(point.iterations, nb_iteration);
        for y in y_start..y_end {
            for x in x_start..x_end {
                buffer.set_pixel(x as u32, y as u32, colour);
            }
        }
    }
}

fn stroke_zone(buffer: &mut PixelBuffer, zone: Zone, transform: Transform) {
    let x_start = transform.to_view_x(zone.xmin()).round() as i64;
    let x_end = transform.to_view_x(zone.xmax()).round() as i64;
    let y_start = transform.to_view_y(zone.ymin()).round() as i64;
    let y_end = transform.to_view_y(zone.ymax()).round() as i64;

    for x in x_start..=x_end {
        set_clipped(buffer, x, y_start);
        set_clipped(buffer, x, y_end);
    }
    for y in y_start..=y_end {
        set_clipped(buffer, x_start, y);
        set_clipped(buffer, x_end, y);
    }
}

fn set_clipped(buffer: &mut PixelBuffer, x: i64, y: i64) {
    if x >= 0 && y >= 0 {
        buffer.set_pixel(x as u32, y as u32, DEBUG_STROKE);
    }
}
