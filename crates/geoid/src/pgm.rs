//! Reader for 16-bit binary PGM geoid grids.
//!
//! Layout:
//!
//! ```text
//! P5
//! # Description WGS84 EGM96, 15-minute grid
//! # Offset -108
//! # Scale 0.003
//! 1440 721
//! 65535
//! <width * height big-endian u16 samples>
//! ```
//!
//! Header lines are `\n` terminated. Metadata comments may appear in any
//! order before the dimension line; values that fail to parse are ignored.

use std::io::{BufRead, Read};

use bytes::Buf;
use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::{GeoidError, Result};

/// Magic token of a binary grayscale PGM image.
pub const MAGIC: &str = "P5";

/// The only accepted maximum sample value (2 bytes per pixel).
pub const MAX_SAMPLE_TOKEN: &str = "65535";

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Decoded and validated PGM header.
#[derive(Debug, Clone, PartialEq)]
pub struct PgmHeader {
    pub width: usize,
    pub height: usize,
    pub offset: f64,
    pub scale: f64,
    pub description: Option<String>,
    pub capture_time: Option<NaiveDateTime>,
    pub max_cubic_error: Option<f64>,
    pub max_bilinear_error: Option<f64>,
    pub rms_cubic_error: Option<f64>,
    pub rms_bilinear_error: Option<f64>,
}

impl PgmHeader {
    /// Number of samples in the payload.
    pub fn sample_count(&self) -> usize {
        self.width * self.height
    }
}

/// Header fields as they are collected, before validation.
#[derive(Debug, Default)]
struct RawHeader {
    dimensions: Option<(i64, i64)>,
    offset: Option<f64>,
    scale: Option<f64>,
    description: Option<String>,
    capture_time: Option<NaiveDateTime>,
    max_cubic_error: Option<f64>,
    max_bilinear_error: Option<f64>,
    rms_cubic_error: Option<f64>,
    rms_bilinear_error: Option<f64>,
    /// Set once the `65535` token has been seen.
    complete: bool,
}

impl RawHeader {
    fn apply_comment(&mut self, resource: &str, token: &str) {
        if let Some(value) = token.strip_prefix("# Description") {
            self.description = Some(value.trim().to_string());
        } else if let Some(value) = token.strip_prefix("# DateTime") {
            let value = value.trim();
            match NaiveDateTime::parse_from_str(value, DATETIME_FORMAT) {
                Ok(time) => self.capture_time = Some(time),
                Err(e) => debug!(resource, value, error = %e, "Ignoring unparseable DateTime"),
            }
        } else if let Some(value) = token.strip_prefix("# Offset") {
            set_number(resource, "Offset", value, &mut self.offset);
        } else if let Some(value) = token.strip_prefix("# Scale") {
            set_number(resource, "Scale", value, &mut self.scale);
        } else if let Some(value) = token.strip_prefix("# MaxCubicError") {
            set_number(resource, "MaxCubicError", value, &mut self.max_cubic_error);
        } else if let Some(value) = token.strip_prefix("# MaxBilinearError") {
            set_number(resource, "MaxBilinearError", value, &mut self.max_bilinear_error);
        } else if let Some(value) = token.strip_prefix("# RMSCubicError") {
            set_number(resource, "RMSCubicError", value, &mut self.rms_cubic_error);
        } else if let Some(value) = token.strip_prefix("# RMSBilinearError") {
            set_number(resource, "RMSBilinearError", value, &mut self.rms_bilinear_error);
        }
    }

    fn validate(self, resource: &str) -> Result<PgmHeader> {
        if !self.complete {
            return Err(GeoidError::format(resource, "cannot decode image header"));
        }

        let offset = match self.offset {
            Some(offset) if offset.is_finite() => offset,
            Some(offset) if !offset.is_nan() => {
                return Err(GeoidError::format(
                    resource,
                    format!("offset must be finite, got {}", offset),
                ))
            }
            _ => return Err(GeoidError::format(resource, "cannot estimate offset")),
        };

        let scale = match self.scale {
            Some(scale) if !scale.is_nan() => scale,
            _ => return Err(GeoidError::format(resource, "cannot estimate scale")),
        };

        if scale <= 0.0 || scale.is_infinite() {
            return Err(GeoidError::format(
                resource,
                format!("scale must be positive, got {}", scale),
            ));
        }

        let (width, height) = match self.dimensions {
            Some((w, h)) if w >= 2 && h >= 2 => (w, h),
            Some((w, h)) => {
                return Err(GeoidError::format(
                    resource,
                    format!("image resolution {}x{} is too small", w, h),
                ))
            }
            None => return Err(GeoidError::format(resource, "missing image resolution")),
        };

        let width = usize::try_from(width)
            .map_err(|_| GeoidError::format(resource, "image width out of range"))?;
        let height = usize::try_from(height)
            .map_err(|_| GeoidError::format(resource, "image height out of range"))?;
        if width.checked_mul(height).and_then(|n| n.checked_mul(2)).is_none() {
            return Err(GeoidError::format(resource, "image resolution overflows"));
        }

        Ok(PgmHeader {
            width,
            height,
            offset,
            scale,
            description: self.description,
            capture_time: self.capture_time,
            max_cubic_error: self.max_cubic_error,
            max_bilinear_error: self.max_bilinear_error,
            rms_cubic_error: self.rms_cubic_error,
            rms_bilinear_error: self.rms_bilinear_error,
        })
    }
}

fn set_number(resource: &str, key: &str, value: &str, slot: &mut Option<f64>) {
    let value = value.trim();
    match value.parse::<f64>() {
        Ok(v) => *slot = Some(v),
        Err(_) => debug!(resource, key, value, "Ignoring unparseable header value"),
    }
}

/// Read one `\n` terminated token. Returns an empty string at end of input.
fn read_token<R: BufRead>(reader: &mut R) -> Result<String> {
    let mut buf = Vec::new();
    reader.read_until(b'\n', &mut buf)?;
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Parse `"<width> <height>"`. Only the first space separates the two.
fn parse_dimensions(token: &str) -> Option<(i64, i64)> {
    let (w, h) = token.split_once(' ')?;
    Some((w.trim().parse().ok()?, h.trim().parse().ok()?))
}

/// Read and validate the header, leaving `reader` positioned at the first
/// sample.
pub fn read_header<R: BufRead>(resource: &str, reader: &mut R) -> Result<PgmHeader> {
    let magic = read_token(reader)?;
    if magic != MAGIC {
        return Err(GeoidError::format(resource, "the image is not in PGM format"));
    }

    let mut raw = RawHeader::default();
    loop {
        let token = read_token(reader)?;
        if token.is_empty() {
            break;
        }

        if token.starts_with('#') {
            raw.apply_comment(resource, &token);
        } else if token.contains(' ') {
            match parse_dimensions(&token) {
                Some(dims) => raw.dimensions = Some(dims),
                None => {
                    debug!(resource, token = %token, "Undecodable resolution token");
                    break;
                }
            }
        } else {
            raw.complete = token == MAX_SAMPLE_TOKEN;
            if !raw.complete {
                debug!(resource, token = %token, "Unsupported maximum sample value");
            }
            break;
        }
    }

    let header = raw.validate(resource)?;
    debug!(
        resource,
        width = header.width,
        height = header.height,
        offset = header.offset,
        scale = header.scale,
        "Decoded PGM header"
    );
    Ok(header)
}

/// Read `count` big-endian 16-bit samples.
///
/// Buffers grow with the bytes actually read, never with the sample count
/// claimed by the header.
pub fn read_samples<R: Read>(resource: &str, reader: R, count: usize) -> Result<Vec<u16>> {
    let expected_bytes = count
        .checked_mul(2)
        .ok_or_else(|| GeoidError::format(resource, "image resolution overflows"))?;

    let mut buf = Vec::new();
    reader.take(expected_bytes as u64).read_to_end(&mut buf)?;
    if buf.len() < expected_bytes {
        return Err(GeoidError::truncated(resource, count, buf.len() / 2));
    }

    let mut payload = &buf[..];
    let mut samples = Vec::with_capacity(buf.len() / 2);
    while payload.has_remaining() {
        samples.push(payload.get_u16());
    }
    Ok(samples)
}
