use std::error::Error;
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ZoneError {
    NotFinite {
        xmin: f64,
        xmax: f64,
        ymin: f64,
        ymax: f64,
    },
    InvertedAxis {
        width: f64,
        height: f64,
    },
}

impl fmt::Display for ZoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFinite {
                xmin,
                xmax,
                ymin,
                ymax,
            } => {
                write!(
                    f,
                    "zone bounds must be finite: x {}..{}, y {}..{}",
                    xmin, xmax, ymin, ymax
                )
            }
            Self::InvertedAxis { width, height } => {
                write!(f, "zone extents must not be negative: {}x{}", width, height)
            }
        }
    }
}

impl Error for ZoneError {}

/// A closed rectangle in fractal-plane coordinates.
///
/// Zero-area zones are legal (they arise when the user selects a
/// degenerate rectangle) and simply yield coincident sample points
/// downstream. Bounds are validated once at construction; every
/// subdivision builds new zones from already-valid ones.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Zone {
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
}

impl Zone {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Result<Self, ZoneError> {
        if !(xmin.is_finite() && xmax.is_finite() && ymin.is_finite() && ymax.is_finite()) {
            return Err(ZoneError::NotFinite {
                xmin,
                xmax,
                ymin,
                ymax,
            });
        }

        let width = xmax - xmin;
        let height = ymax - ymin;

        if width < 0.0 || height < 0.0 {
            return Err(ZoneError::InvertedAxis { width, height });
        }

        Ok(Self {
            xmin,
            xmax,
            ymin,
            ymax,
        })
    }

    #[must_use]
    pub fn xmin(&self) -> f64 {
        self.xmin
    }

    #[must_use]
    pub fn xmax(&self) -> f64 {
        self.xmax
    }

    #[must_use]
    pub fn ymin(&self) -> f64 {
        self.ymin
    }

    #[must_use]
    pub fn ymax(&self) -> f64 {
        self.ymax
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_new_valid() {
        let zone = Zone::new(-2.25, 1.25, -1.5, 1.5).unwrap();

        assert_eq!(zone.xmin(), -2.25);
        assert_eq!(zone.xmax(), 1.25);
        assert_eq!(zone.ymin(), -1.5);
        assert_eq!(zone.ymax(), 1.5);
        assert_eq!(zone.width(), 3.5);
        assert_eq!(zone.height(), 3.0);
        assert_eq!(zone.area(), 10.5);
    }

    #[test]
    fn test_zone_zero_area_is_legal() {
        let point_zone = Zone::new(0.5, 0.5, -0.25, -0.25).unwrap();
        let line_zone = Zone::new(0.0, 1.0, 2.0, 2.0).unwrap();

        assert_eq!(point_zone.area(), 0.0);
        assert_eq!(line_zone.area(), 0.0);
        assert_eq!(line_zone.width(), 1.0);
    }

    #[test]
    fn test_zone_rejects_inverted_axes() {
        let inverted_x = Zone::new(1.0, 0.0, 0.0, 1.0);
        let inverted_y = Zone::new(0.0, 1.0, 1.0, 0.0);

        assert_eq!(
            inverted_x,
            Err(ZoneError::InvertedAxis {
                width: -1.0,
                height: 1.0
            })
        );
        assert_eq!(
            inverted_y,
            Err(ZoneError::InvertedAxis {
                width: 1.0,
                height: -1.0
            })
        );
    }

    #[test]
    fn test_zone_rejects_non_finite_bounds() {
        assert!(Zone::new(f64::NAN, 1.0, 0.0, 1.0).is_err());
        assert!(Zone::new(0.0, f64::INFINITY, 0.0, 1.0).is_err());
        assert!(Zone::new(0.0, 1.0, f64::NEG_INFINITY, 1.0).is_err());
        assert!(Zone::new(0.0, 1.0, 0.0, f64::NAN).is_err());
    }
}
