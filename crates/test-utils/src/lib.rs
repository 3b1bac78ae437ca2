//! Shared test utilities for the geoid-toolkit workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Test data path helpers
//! - Skip macros for optional test data (the real geoid grids are large)
//! - Synthetic PGM grid builders
//! - Known-value fixtures
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{require_test_file, PgmBuilder};
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Macro to skip a test if the required file is not found.
///
/// This is useful for tests that depend on external data files that may not
/// be present in all environments (e.g., CI without the geoid grids).
///
/// # Usage
///
/// ```ignore
/// use test_utils::require_test_file;
///
/// #[test]
/// fn test_egm96_heights() {
///     let path = require_test_file!("egm96-15.pgm");
///     // Test code using path...
/// }
/// ```
///
/// If the file is not found, the test will print a skip message and return early.
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: Test file '{}' not found. Install the geoid data or set TEST_DATA_DIR.",
                    $name
                );
                return;
            }
        }
    }};
}

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if !(diff <= epsilon) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for exact floating-point equivalence.
///
/// Stricter than `==` in one way and looser in another: `+0.0` and `-0.0`
/// are different, and NaN is equivalent to NaN.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_equiv;
///
/// assert_equiv!(f64::NAN, f64::NAN); // passes
/// assert_equiv!(-0.0, 0.0);          // fails
/// ```
#[macro_export]
macro_rules! assert_equiv {
    ($left:expr, $right:expr) => {{
        let left: f64 = $left;
        let right: f64 = $right;
        if !$crate::equiv(left, right) {
            panic!(
                "assertion failed: `(left equiv right)`\n  left: `{:?}`,\n right: `{:?}`",
                left, right
            );
        }
    }};
}

/// Route `tracing` output to the test harness.
///
/// Honors `RUST_LOG` and defaults to `debug`. Safe to call from every test;
/// only the first call installs the subscriber.
pub fn init_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

/// Equivalence used by [`assert_equiv!`].
pub fn equiv(x: f64, y: f64) -> bool {
    if x.is_nan() || y.is_nan() {
        x.is_nan() && y.is_nan()
    } else {
        x == y && x.is_sign_negative() == y.is_sign_negative()
    }
}
