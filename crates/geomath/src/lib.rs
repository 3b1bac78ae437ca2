//! Angular arithmetic for geodesic computations.
//!
//! Implements the small set of numerical primitives that ellipsoidal
//! algorithms lean on everywhere. Every function is total over the IEEE-754
//! double domain: signed zeros are preserved, infinities and NaNs propagate
//! and nothing panics on unusual input.
//!
//! - [`arith`]: squaring, odd-parity `atanh`, vector normalization,
//!   error-free two-term summation and Horner polynomial evaluation.
//! - [`angle`]: angle rounding near zero, normalization to ±180°, latitude
//!   checks and the exact difference of two angles.
//! - [`trig`]: sine, cosine and `atan2` in degrees with exact results at
//!   the cardinal directions.
//!
//! # Example
//!
//! ```
//! use geomath::{sincosd, atan2d, sum};
//!
//! let (s, c) = sincosd(90.0);
//! assert_eq!((s, c), (1.0, 0.0));
//!
//! assert_eq!(atan2d(0.0, -1.0), 180.0);
//!
//! let (s, t) = sum(1.0, 1e-20);
//! assert_eq!(s, 1.0);
//! assert_eq!(t, 1e-20);
//! ```

pub mod angle;
pub mod arith;
pub mod trig;

pub use angle::{ang_diff, ang_normalize, ang_round, ieee_remainder, lat_fix};
pub use arith::{atanh, norm, polyval, sq, sum, DIGITS};
pub use trig::{atan2d, sincosd, sincosde};
