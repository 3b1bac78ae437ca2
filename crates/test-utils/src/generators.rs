//! Test data generators for synthetic geoid grids.
//!
//! These generators create predictable, verifiable PGM images that can be
//! used across the test suite without the real (large) geoid grids.

use std::io;
use std::path::{Path, PathBuf};

/// Creates samples where each value is `col * 100 + row`.
///
/// This makes it easy to verify that data is being read correctly by
/// checking that `samples[row * width + col] == col * 100 + row`.
///
/// # Example
///
/// ```
/// use test_utils::create_index_samples;
///
/// let samples = create_index_samples(10, 5);
/// assert_eq!(samples.len(), 50);
/// assert_eq!(samples[1], 100);  // col=1, row=0
/// assert_eq!(samples[10], 1);   // col=0, row=1
/// ```
pub fn create_index_samples(width: usize, height: usize) -> Vec<u16> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 100 + row) as u16);
        }
    }
    data
}

/// Creates samples that look irregular but are fully deterministic.
///
/// Value is `(col * 7919 + row * 104729 + col * row * 31) mod 65536`, which
/// exercises the whole 16-bit range.
pub fn create_scrambled_samples(width: usize, height: usize) -> Vec<u16> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push(((col * 7919 + row * 104_729 + col * row * 31) % 65_536) as u16);
        }
    }
    data
}

/// Builder for 16-bit binary PGM geoid grids.
///
/// Defaults to a valid image with offset -108, scale 0.003 (the values used
/// by the EGM grids) and all samples zero. Individual header parts can be
/// removed or corrupted to test error handling.
///
/// # Example
///
/// ```
/// use test_utils::PgmBuilder;
///
/// let bytes = PgmBuilder::new(4, 3).description("tiny").build();
/// assert!(bytes.starts_with(b"P5\n"));
/// assert_eq!(bytes.len(), "P5\n# Description tiny\n# Offset -108\n# Scale 0.003\n4 3\n65535\n".len() + 24);
/// ```
#[derive(Debug, Clone)]
pub struct PgmBuilder {
    width: usize,
    height: usize,
    magic: String,
    comments: Vec<String>,
    offset: Option<String>,
    scale: Option<String>,
    dimensions: Option<String>,
    max_value: Option<String>,
    samples: Vec<u16>,
    truncate_bytes: usize,
}

impl PgmBuilder {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            magic: "P5".to_string(),
            comments: Vec::new(),
            offset: Some("-108".to_string()),
            scale: Some("0.003".to_string()),
            dimensions: Some(format!("{} {}", width, height)),
            max_value: Some("65535".to_string()),
            samples: vec![0; width * height],
            truncate_bytes: 0,
        }
    }

    pub fn magic(mut self, magic: &str) -> Self {
        self.magic = magic.to_string();
        self
    }

    pub fn description(self, text: &str) -> Self {
        self.comment(&format!("# Description {}", text))
    }

    pub fn datetime(self, text: &str) -> Self {
        self.comment(&format!("# DateTime {}", text))
    }

    /// Add max/RMS error comments for cubic and bilinear interpolation.
    pub fn errors(self, max_cubic: f64, max_bilinear: f64, rms_cubic: f64, rms_bilinear: f64) -> Self {
        self.comment(&format!("# MaxCubicError {}", max_cubic))
            .comment(&format!("# MaxBilinearError {}", max_bilinear))
            .comment(&format!("# RMSCubicError {}", rms_cubic))
            .comment(&format!("# RMSBilinearError {}", rms_bilinear))
    }

    /// Add a raw header line.
    pub fn comment(mut self, line: &str) -> Self {
        self.comments.push(line.to_string());
        self
    }

    pub fn offset(mut self, offset: f64) -> Self {
        self.offset = Some(offset.to_string());
        self
    }

    /// Write `text` verbatim as the offset value.
    pub fn offset_text(mut self, text: &str) -> Self {
        self.offset = Some(text.to_string());
        self
    }

    pub fn without_offset(mut self) -> Self {
        self.offset = None;
        self
    }

    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale.to_string());
        self
    }

    pub fn without_scale(mut self) -> Self {
        self.scale = None;
        self
    }

    /// Replace the `"<width> <height>"` line.
    pub fn dimension_line(mut self, line: &str) -> Self {
        self.dimensions = Some(line.to_string());
        self
    }

    pub fn without_dimensions(mut self) -> Self {
        self.dimensions = None;
        self
    }

    pub fn max_value(mut self, token: &str) -> Self {
        self.max_value = Some(token.to_string());
        self
    }

    pub fn without_max_value(mut self) -> Self {
        self.max_value = None;
        self
    }

    /// Use `samples` as the payload. The length is not checked.
    pub fn samples(mut self, samples: Vec<u16>) -> Self {
        self.samples = samples;
        self
    }

    /// Fill the payload with `f(col, row)`.
    pub fn fill_with(mut self, f: impl Fn(usize, usize) -> u16) -> Self {
        let mut samples = Vec::with_capacity(self.width * self.height);
        for row in 0..self.height {
            for col in 0..self.width {
                samples.push(f(col, row));
            }
        }
        self.samples = samples;
        self
    }

    /// Drop the last `bytes` bytes of the payload.
    pub fn truncate(mut self, bytes: usize) -> Self {
        self.truncate_bytes = bytes;
        self
    }

    /// Serialize the image.
    pub fn build(&self) -> Vec<u8> {
        let mut header = format!("{}\n", self.magic);
        for line in &self.comments {
            header.push_str(line);
            header.push('\n');
        }
        if let Some(offset) = &self.offset {
            header.push_str(&format!("# Offset {}\n", offset));
        }
        if let Some(scale) = &self.scale {
            header.push_str(&format!("# Scale {}\n", scale));
        }
        if let Some(dimensions) = &self.dimensions {
            header.push_str(dimensions);
            header.push('\n');
        }
        if let Some(max_value) = &self.max_value {
            header.push_str(max_value);
            header.push('\n');
        }

        let mut bytes = header.into_bytes();
        for sample in &self.samples {
            bytes.extend_from_slice(&sample.to_be_bytes());
        }
        let len = bytes.len().saturating_sub(self.truncate_bytes);
        bytes.truncate(len);
        bytes
    }

    /// Write the image to `<dir>/<name>.pgm` and return its path.
    pub fn write_to(&self, dir: &Path, name: &str) -> io::Result<PathBuf> {
        let path = dir.join(format!("{}.pgm", name));
        std::fs::write(&path, self.build())?;
        Ok(path)
    }
}
