//! Geoid height queries over a loaded grid.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::error::Result;
use crate::grid::GeoidGrid;
use crate::interpolation::{bicubic, bilinear};
use crate::types::{GeoidMetadata, Interpolation};

/// A named geoid grid paired with an interpolation method.
///
/// Cloning is cheap: the grid is shared. Views with different methods can
/// be made from the same grid with [`Geoid::with_interpolation`].
#[derive(Debug, Clone)]
pub struct Geoid {
    name: String,
    grid: Arc<GeoidGrid>,
    interpolation: Interpolation,
}

impl Geoid {
    pub fn new(name: impl Into<String>, grid: Arc<GeoidGrid>, interpolation: Interpolation) -> Self {
        Self {
            name: name.into(),
            grid,
            interpolation,
        }
    }

    /// Load a grid file and name the view after the file stem.
    pub fn open(path: impl AsRef<Path>, interpolation: Interpolation) -> Result<Self> {
        let path = path.as_ref();
        let grid = GeoidGrid::open(path)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, Arc::new(grid), interpolation))
    }

    /// Same grid, different interpolation.
    pub fn with_interpolation(&self, interpolation: Interpolation) -> Self {
        Self {
            name: self.name.clone(),
            grid: Arc::clone(&self.grid),
            interpolation,
        }
    }

    /// Height of the geoid above the ellipsoid, in meters, at `lat`, `lon`
    /// degrees.
    ///
    /// Returns NaN if `lat` is NaN or outside [-90°, 90°], or if `lon` is
    /// not finite. Longitude may be given in any range.
    pub fn height(&self, lat: f64, lon: f64) -> f64 {
        if lat.is_nan() || lat.abs() > 90.0 {
            return f64::NAN;
        }
        let lon = reduce_longitude(lon);
        if lon.is_nan() {
            return f64::NAN;
        }

        let grid = &*self.grid;
        let mut fx = lon * grid.lon_resolution();
        let mut fy = (90.0 - lat) * grid.lat_resolution();
        let mut ix = fx.floor() as i64;
        let iy = fy.floor() as i64;
        fx -= ix as f64;
        fy -= iy as f64;

        let width = grid.width() as i64;
        if ix < 0 {
            ix += width;
        } else if ix >= width {
            ix -= width;
        }

        let blended = match self.interpolation {
            Interpolation::Bilinear => bilinear(grid, ix, iy, fx, fy),
            Interpolation::Cubic => bicubic(grid, ix, iy, fx, fy),
        };
        grid.offset() + grid.scale() * blended
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid(&self) -> &Arc<GeoidGrid> {
        &self.grid
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn description(&self) -> Option<&str> {
        self.grid.description()
    }

    pub fn capture_time(&self) -> Option<NaiveDateTime> {
        self.grid.capture_time()
    }

    /// Maximum interpolation error for this view's method, in meters.
    pub fn max_error(&self) -> Option<f64> {
        self.grid.max_error(self.interpolation)
    }

    /// RMS interpolation error for this view's method, in meters.
    pub fn rms_error(&self) -> Option<f64> {
        self.grid.rms_error(self.interpolation)
    }

    pub fn scale(&self) -> f64 {
        self.grid.scale()
    }

    pub fn offset(&self) -> f64 {
        self.grid.offset()
    }

    pub fn metadata(&self) -> GeoidMetadata {
        GeoidMetadata {
            name: self.name.clone(),
            interpolation: self.interpolation,
            width: self.grid.width(),
            height: self.grid.height(),
            offset: self.grid.offset(),
            scale: self.grid.scale(),
            description: self.grid.description().map(str::to_string),
            capture_time: self.grid.capture_time(),
            max_error: self.max_error(),
            rms_error: self.rms_error(),
        }
    }
}

/// Bring a longitude into [0°, 360°].
///
/// Values already in range are returned unchanged, so 360° stays 360°.
/// Non-finite input gives NaN.
fn reduce_longitude(lon: f64) -> f64 {
    if (0.0..=360.0).contains(&lon) {
        lon
    } else if lon.is_finite() {
        lon.rem_euclid(360.0)
    } else {
        f64::NAN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pgm::PgmHeader;

    fn geoid(interpolation: Interpolation) -> Geoid {
        let header = PgmHeader {
            width: 4,
            height: 3,
            offset: -100.0,
            scale: 0.5,
            description: Some("test grid".to_string()),
            capture_time: None,
            max_cubic_error: Some(0.01),
            max_bilinear_error: Some(0.2),
            rms_cubic_error: Some(0.001),
            rms_bilinear_error: Some(0.02),
        };
        let samples = vec![0, 10, 20, 30, 100, 110, 120, 130, 200, 210, 220, 230];
        let grid = GeoidGrid::from_parts("test", header, samples).unwrap();
        Geoid::new("test", Arc::new(grid), interpolation)
    }

    #[test]
    fn test_reduce_longitude() {
        assert_eq!(reduce_longitude(0.0), 0.0);
        assert_eq!(reduce_longitude(360.0), 360.0);
        assert_eq!(reduce_longitude(-90.0), 270.0);
        assert_eq!(reduce_longitude(725.0), 5.0);
        assert_eq!(reduce_longitude(-720.0), 0.0);
        assert!(reduce_longitude(f64::INFINITY).is_nan());
        assert!(reduce_longitude(f64::NEG_INFINITY).is_nan());
        assert!(reduce_longitude(f64::NAN).is_nan());
    }

    #[test]
    fn test_invalid_input_is_nan() {
        let g = geoid(Interpolation::Bilinear);
        assert!(g.height(f64::NAN, 0.0).is_nan());
        assert!(g.height(90.5, 0.0).is_nan());
        assert!(g.height(-91.0, 0.0).is_nan());
        assert!(g.height(0.0, f64::NAN).is_nan());
        assert!(g.height(0.0, f64::INFINITY).is_nan());
    }

    #[test]
    fn test_bilinear_at_nodes() {
        let g = geoid(Interpolation::Bilinear);
        // rows are 90 degrees apart, columns 90 degrees apart
        assert_eq!(g.height(90.0, 0.0), -100.0);
        assert_eq!(g.height(0.0, 90.0), -100.0 + 0.5 * 110.0);
        assert_eq!(g.height(-90.0, 270.0), -100.0 + 0.5 * 230.0);
    }

    #[test]
    fn test_bilinear_midpoint() {
        let g = geoid(Interpolation::Bilinear);
        // between samples 0, 10, 100, 110
        assert_eq!(g.height(45.0, 45.0), -100.0 + 0.5 * 55.0);
    }

    #[test]
    fn test_longitude_360_matches_0() {
        for method in [Interpolation::Bilinear, Interpolation::Cubic] {
            let g = geoid(method);
            assert_eq!(g.height(30.0, 360.0), g.height(30.0, 0.0));
            assert_eq!(g.height(30.0, -360.0), g.height(30.0, 0.0));
        }
    }

    #[test]
    fn test_view_accessors() {
        let cubic = geoid(Interpolation::Cubic);
        assert_eq!(cubic.max_error(), Some(0.01));
        assert_eq!(cubic.rms_error(), Some(0.001));

        let bilinear = cubic.with_interpolation(Interpolation::Bilinear);
        assert_eq!(bilinear.max_error(), Some(0.2));
        assert_eq!(bilinear.rms_error(), Some(0.02));
        assert!(Arc::ptr_eq(cubic.grid(), bilinear.grid()));

        let meta = bilinear.metadata();
        assert_eq!(meta.name, "test");
        assert_eq!(meta.interpolation, Interpolation::Bilinear);
        assert_eq!((meta.width, meta.height), (4, 3));
        assert_eq!(meta.description.as_deref(), Some("test grid"));
    }
}
