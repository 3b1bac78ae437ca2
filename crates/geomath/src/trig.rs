//! Trigonometric functions with arguments and results in degrees.
//!
//! The argument is reduced exactly to [-45°, 45°] before conversion to
//! radians, so the results obey the elementary identities exactly, e.g.
//! `sin 9° = cos 81° = -sin 123456789°`.

use crate::angle::ang_round;

/// Round half up, matching the quadrant selection of the reduction.
///
/// Returns 0 for NaN.
fn quadrant(d: f64) -> i32 {
    let x = d / 90.0;
    let f = x.floor();
    let q = if x - f >= 0.5 { f + 1.0 } else { f };
    // |d| < 360 here, the cast cannot saturate; NaN maps to 0
    q as i32
}

/// Sine and cosine of the reduced angle `d` (with `|d| <= 45`) after the
/// correction-aware conversion to radians in `r`.
fn reduced_sin_cos(d: f64, r: f64) -> (f64, f64) {
    if d.abs() == 45.0 {
        let c = 0.5_f64.sqrt();
        (c.copysign(r), c)
    } else if d.abs() == 30.0 {
        (0.5_f64.copysign(r), 0.75_f64.sqrt())
    } else {
        r.sin_cos()
    }
}

/// Rotate a reduced `(s, c)` pair into quadrant `q` and fix up signed zeros.
fn rotate(q: i32, s: f64, c: f64, x: f64) -> (f64, f64) {
    let (mut sinx, cosx) = match q & 3 {
        0 => (s, c),
        1 => (c, -s),
        2 => (-s, -c),
        _ => (-c, s),
    };
    if sinx == 0.0 {
        sinx = sinx.copysign(x);
    }
    (sinx, 0.0 + cosx)
}

/// Sine and cosine of `x` degrees.
///
/// Multiples of 90° give exact 0/±1 results, and zero sines carry the sign
/// of `x` (`sincosd(-0.0) == (-0.0, 1.0)`). Residuals of exactly 30° or 45°
/// return the exact surds. Infinite or NaN arguments give `(NaN, NaN)`.
pub fn sincosd(x: f64) -> (f64, f64) {
    let mut d = x % 360.0;
    let q = quadrant(d);
    d -= 90.0 * f64::from(q);
    // now |d| <= 45
    let r = d.to_radians();
    let (s, c) = reduced_sin_cos(d, r);
    rotate(q, s, c, x)
}

/// Sine and cosine of `x + t` degrees, for a reduced angle `x` in
/// [-180°, 180°] and a small correction `t`.
///
/// [`ang_round`] is applied to the reduced sum so that `x + t` landing
/// extremely close to (but not on) a cardinal direction still behaves.
pub fn sincosde(x: f64, t: f64) -> (f64, f64) {
    let mut d = x % 360.0;
    let q = quadrant(d);
    d -= 90.0 * f64::from(q);
    let r = ang_round(d + t).to_radians();
    let (s, c) = reduced_sin_cos(d, r);
    rotate(q, s, c, x)
}

/// `atan2(y, x)` in degrees, in the range [-180°, 180°].
///
/// The arguments are swapped and negated so that the underlying `atan2`
/// works in [-45°, 45°], then the result is moved back to the right
/// quadrant. `atan2d(±0, -1)` is `±180`.
pub fn atan2d(y: f64, x: f64) -> f64 {
    let (mut y, mut x) = (y, x);
    let mut q = 0;
    if y.abs() > x.abs() {
        std::mem::swap(&mut x, &mut y);
        q = 2;
    }
    if x < 0.0 {
        x = -x;
        q += 1;
    }
    // here x >= 0 and x >= |y|
    let ang = y.atan2(x).to_degrees();
    match q {
        1 => 180.0_f64.copysign(y) - ang,
        2 => 90.0 - ang,
        3 => -90.0 + ang,
        _ => ang,
    }
}
