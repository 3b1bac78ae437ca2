//! In-memory geoid grid.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::error::{GeoidError, Result};
use crate::pgm::{self, PgmHeader};
use crate::types::Interpolation;

/// Degrees of longitude covered by the grid.
const LON_SPAN: f64 = 360.0;

/// Degrees of latitude covered by the grid.
const LAT_SPAN: f64 = 180.0;

/// A loaded geoid grid.
///
/// Samples are stored row-major starting at the north pole (row 0 is
/// latitude 90°) and at longitude 0°. Columns are cyclic, the last row is
/// latitude -90°. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct GeoidGrid {
    source: String,
    header: PgmHeader,
    samples: Vec<u16>,
    lon_resolution: f64,
    lat_resolution: f64,
}

impl GeoidGrid {
    /// Build a grid from a decoded header and its samples.
    pub fn from_parts(source: impl Into<String>, header: PgmHeader, samples: Vec<u16>) -> Result<Self> {
        let source = source.into();
        if header.width < 2 || header.height < 2 {
            return Err(GeoidError::format(
                source,
                format!("image resolution {}x{} is too small", header.width, header.height),
            ));
        }
        let expected = header.sample_count();
        if samples.len() < expected {
            return Err(GeoidError::truncated(source, expected, samples.len()));
        }
        if samples.len() > expected {
            return Err(GeoidError::format(
                source,
                format!("expected {} samples, got {}", expected, samples.len()),
            ));
        }

        let lon_resolution = header.width as f64 / LON_SPAN;
        let lat_resolution = (header.height - 1) as f64 / LAT_SPAN;

        Ok(Self {
            source,
            header,
            samples,
            lon_resolution,
            lat_resolution,
        })
    }

    /// Parse a PGM grid from `reader`. `source` names the resource in errors
    /// and logs.
    pub fn from_reader<R: BufRead>(source: &str, mut reader: R) -> Result<Self> {
        let header = pgm::read_header(source, &mut reader)?;
        let samples = pgm::read_samples(source, reader, header.sample_count())?;
        Self::from_parts(source, header, samples)
    }

    /// Load a PGM grid from a file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = path.display().to_string();
        let start = Instant::now();

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| source.clone());
                return Err(GeoidError::resource_unavailable(name, path));
            }
            Err(e) => return Err(e.into()),
        };

        debug!(path = %source, "Reading geoid grid");
        let grid = Self::from_reader(&source, BufReader::new(file))?;

        info!(
            path = %source,
            width = grid.width(),
            height = grid.height(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded geoid grid"
        );
        Ok(grid)
    }

    /// Resource the grid was read from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn header(&self) -> &PgmHeader {
        &self.header
    }

    pub fn width(&self) -> usize {
        self.header.width
    }

    pub fn height(&self) -> usize {
        self.header.height
    }

    pub fn offset(&self) -> f64 {
        self.header.offset
    }

    pub fn scale(&self) -> f64 {
        self.header.scale
    }

    pub fn description(&self) -> Option<&str> {
        self.header.description.as_deref()
    }

    pub fn capture_time(&self) -> Option<NaiveDateTime> {
        self.header.capture_time
    }

    /// Samples per degree of longitude.
    pub fn lon_resolution(&self) -> f64 {
        self.lon_resolution
    }

    /// Samples per degree of latitude.
    pub fn lat_resolution(&self) -> f64 {
        self.lat_resolution
    }

    /// Maximum interpolation error reported in the header for `method`.
    pub fn max_error(&self, method: Interpolation) -> Option<f64> {
        match method {
            Interpolation::Cubic => self.header.max_cubic_error,
            Interpolation::Bilinear => self.header.max_bilinear_error,
        }
    }

    /// RMS interpolation error reported in the header for `method`.
    pub fn rms_error(&self, method: Interpolation) -> Option<f64> {
        match method {
            Interpolation::Cubic => self.header.rms_cubic_error,
            Interpolation::Bilinear => self.header.rms_bilinear_error,
        }
    }

    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    /// Raw sample at column `ix`, row `iy`.
    ///
    /// Columns wrap around the globe; rows are clamped to the poles.
    pub fn sample_at(&self, ix: i64, iy: i64) -> f64 {
        let width = self.header.width as i64;
        let last_row = self.header.height as i64 - 1;
        let x = ix.rem_euclid(width) as usize;
        let y = iy.clamp(0, last_row) as usize;
        f64::from(self.samples[y * self.header.width + x])
    }
}
