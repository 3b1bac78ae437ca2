//! Basic arithmetic helpers.

/// Number of binary digits in the fraction of an `f64`.
pub const DIGITS: u32 = f64::MANTISSA_DIGITS;

/// Returns `x²`.
#[inline]
pub fn sq(x: f64) -> f64 {
    x * x
}

/// Inverse hyperbolic tangent with enforced odd parity.
///
/// Computed through `ln_1p` to stay accurate near zero. The sign of the
/// argument is restored afterwards, so `atanh(-x) == -atanh(x)` holds for
/// every `x`, signed zeros included.
pub fn atanh(x: f64) -> f64 {
    let y = x.abs();
    let y = (2.0 * y / (1.0 - y)).ln_1p() / 2.0;
    if x > 0.0 {
        y
    } else if x < 0.0 {
        -y
    } else {
        x
    }
}

/// Normalize a sine/cosine pair so that `sinx² + cosx² = 1`.
pub fn norm(sinx: f64, cosx: f64) -> (f64, f64) {
    let r = sinx.hypot(cosx);
    (sinx / r, cosx / r)
}

/// Error-free sum of two numbers.
///
/// Returns `(s, t)` with `s = round(u + v)` and `t = u + v - s` exactly
/// (Knuth, TAOCP Vol 2, 4.2.2, Theorem B). When `s` is zero the residual is
/// `s` itself so the sign of a zero sum is never disturbed.
pub fn sum(u: f64, v: f64) -> (f64, f64) {
    let s = u + v;
    let up = s - v;
    let vpp = s - up;
    let up = up - u;
    let vpp = vpp - v;
    // u + v = s + t = round(u + v) + t
    let t = if s != 0.0 { 0.0 - (up + vpp) } else { s };
    (s, t)
}

/// Evaluate a polynomial of order `n` with Horner's method.
///
/// Computes `Σ p[k] * x^(n-k)` for `k = 0..=n`; callers wanting a
/// coefficient table offset pass the sub-slice starting there. Returns 0 if
/// `n < 0` and `p[0]` if `n == 0`, even when `x` is infinite or NaN.
///
/// # Panics
///
/// Panics if `p` holds fewer than `n + 1` coefficients.
pub fn polyval(n: i32, p: &[f64], x: f64) -> f64 {
    let Ok(order) = usize::try_from(n) else {
        return 0.0;
    };
    p[1..=order].iter().fold(p[0], |y, &c| y * x + c)
}
