//! Angle reduction, rounding and differencing.
//!
//! All angles are in degrees.

use crate::arith::sum;

/// Values below this magnitude are snapped by [`ang_round`].
const ROUND_THRESHOLD: f64 = 1.0 / 16.0;

/// IEEE-754 remainder of `x` with respect to `y`.
///
/// Returns `x - n*y` where `n` is the integer nearest `x/y`, ties going to
/// the even integer. Unlike `%` (which truncates the quotient) the result
/// lies in `[-y/2, y/2]`. The computation is exact; a zero result carries
/// the sign of `x` and a non-finite `x` yields NaN. `y` must be positive and
/// finite.
pub fn ieee_remainder(x: f64, y: f64) -> f64 {
    // fmod by 2y keeps the parity of the quotient and is exact.
    let r = if x.is_finite() { x % (2.0 * y) } else { f64::NAN };
    let a = r.abs();
    let half = y / 2.0;
    let v = if a <= half {
        a
    } else if a < 3.0 * half {
        a - y
    } else {
        a - 2.0 * y
    };
    if x.is_sign_negative() {
        -v
    } else {
        v
    }
}

/// Coarsen a value close to zero.
///
/// Magnitudes below 1/16 are rounded onto a grid of spacing 2⁻⁵⁷ (about
/// 0.7 pm on the earth for an angle in degrees), which removes the
/// near-singular cases where `x` is tiny but non-zero. `-0` stays `-0` and
/// tiny negative numbers become `-0`.
pub fn ang_round(x: f64) -> f64 {
    let z = ROUND_THRESHOLD;
    let mut y = x.abs();
    if y < z {
        // Must not be simplified to y.
        y = z - (z - y);
    }
    y.copysign(x)
}

/// Reduce an angle to the range [-180°, 180°).
///
/// Exact multiples of ±180° keep the sign of `x`, so `ang_normalize(180.0)`
/// is `+180` and `ang_normalize(-540.0)` is `-180`. The range of `x` is
/// unrestricted.
pub fn ang_normalize(x: f64) -> f64 {
    let y = ieee_remainder(x, 360.0);
    if y.abs() == 180.0 {
        180.0_f64.copysign(x)
    } else {
        y
    }
}

/// Returns `x` if it is a valid latitude in [-90°, 90°], otherwise NaN.
pub fn lat_fix(x: f64) -> f64 {
    if x.abs() > 90.0 {
        f64::NAN
    } else {
        x
    }
}

/// Exact difference `y - x` of two angles reduced to [-180°, 180°].
///
/// Returns `(d, e)` where `d` is the difference rounded to the nearest
/// double and `e` the truncation error, so that `d + e` is exact. When the
/// difference is ±0° or ±180° the sign of `d` follows the sign of `y - x`;
/// if `e` is non-zero then `d` and `e` have opposite signs. `|e|` never
/// exceeds 2⁻²⁶.
pub fn ang_diff(x: f64, y: f64) -> (f64, f64) {
    let (d, t) = sum(ieee_remainder(-x, 360.0), ieee_remainder(y, 360.0));
    let (d, e) = sum(ieee_remainder(d, 360.0), t);
    if d == 0.0 || d.abs() == 180.0 {
        let sign = if e == 0.0 { y - x } else { -e };
        (d.copysign(sign), e)
    } else {
        (d, e)
    }
}
