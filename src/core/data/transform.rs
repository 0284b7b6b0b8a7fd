use crate::core::data::zone::Zone;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Translation {
    pub x: f64,
    pub y: f64,
}

/// Snapshot of the view mapping for one render run.
///
/// The view layer owns the live pan/zoom state; the renderer only ever
/// sees this frozen copy, taken when the run is submitted, so a run is
/// never affected by view mutations that happen while it computes.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub zoom: f64,
    pub translation: Translation,
}

impl Transform {
    /// Maps the zone's minimum corner to the raster origin, so the whole
    /// zone lands in `[0, width) x [0, height)` of a buffer sized
    /// `zone.width() * zoom` by `zone.height() * zoom`.
    #[must_use]
    pub fn anchored_to(zone: Zone, zoom: f64) -> Self {
        Self {
            zoom,
            translation: Translation {
                x: -zone.xmin() * zoom,
                y: -zone.ymin() * zoom,
            },
        }
    }

    #[must_use]
    pub fn to_view_x(&self, x: f64) -> f64 {
        x * self.zoom + self.translation.x
    }

    #[must_use]
    pub fn to_view_y(&self, y: f64) -> f64 {
        y * self.zoom + self.translation.y
    }
}
