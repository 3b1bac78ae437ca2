//! Geoid height service.
//!
//! Loads global geoid grids stored as 16-bit binary PGM images and answers
//! geoid height queries (height of the geoid above the WGS84 ellipsoid, in
//! meters) by bilinear or bicubic interpolation.
//!
//! # Architecture
//!
//! ```text
//! GeoidService (active view, lazy default load)
//!        |
//!        v
//! GeoidRegistry (one Arc<GeoidGrid> per name, loaded exactly once)
//!        |
//!        v
//! GeoidGrid::open -> pgm::read_header + pgm::read_samples
//!
//! Geoid (grid + interpolation) -> height(lat, lon)
//! ```
//!
//! Grids are immutable once loaded and may be shared freely between
//! threads. The same grid backs cubic and bilinear views without being read
//! twice.
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use std::sync::Arc;
//! use geoid::{Geoid, GeoidGrid, Interpolation};
//!
//! let mut pgm = b"P5\n# Offset -10\n# Scale 0.5\n2 2\n65535\n".to_vec();
//! pgm.extend_from_slice(&[0, 20, 0, 20, 0, 20, 0, 20]);
//! let grid = GeoidGrid::from_reader("flat", Cursor::new(pgm)).unwrap();
//!
//! let geoid = Geoid::new("flat", Arc::new(grid), Interpolation::Bilinear);
//! assert_eq!(geoid.height(12.0, 34.0), 0.0);
//! assert!(geoid.height(91.0, 0.0).is_nan());
//! ```

pub mod config;
pub mod error;
pub mod geoid;
pub mod grid;
pub mod interpolation;
pub mod pgm;
pub mod registry;
pub mod service;
pub mod types;

pub use config::GeoidConfig;
pub use error::{GeoidError, Result};
pub use geoid::Geoid;
pub use grid::GeoidGrid;
pub use interpolation::Stencil;
pub use pgm::PgmHeader;
pub use registry::GeoidRegistry;
pub use service::GeoidService;
pub use types::{GeoidMetadata, Interpolation, RegistryStats};
