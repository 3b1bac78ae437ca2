//! Bilinear and bicubic blending of grid samples.
//!
//! Both functions take the cell `(ix, iy)` containing the query point and
//! the fractional offsets `fx`, `fy` within it, and return a blended raw
//! sample value (before offset and scale are applied).

use crate::grid::GeoidGrid;

/// Number of samples in the cubic stencil.
const STENCIL_SIZE: usize = 12;

/// Number of terms of a bivariate cubic.
const N_TERMS: usize = 10;

/// Least-squares coefficients for the interior 12-point stencil, one row of
/// `N_TERMS` per stencil sample.
#[rustfmt::skip]
const CUBIC: [i32; STENCIL_SIZE * N_TERMS] = [
    9, -18, -88, 0, 96, 90, 0, 0, -60, -20,
    -9, 18, 8, 0, -96, 30, 0, 0, 60, -20,
    9, -88, -18, 90, 96, 0, -20, -60, 0, 0,
    186, -42, -42, -150, -96, -150, 60, 60, 60, 60,
    54, 162, -78, 30, -24, -90, -60, 60, -60, 60,
    -9, -32, 18, 30, 24, 0, 20, -60, 0, 0,
    -9, 8, 18, 30, -96, 0, -20, 60, 0, 0,
    54, -78, 162, -90, -24, 30, 60, -60, 60, -60,
    -54, 78, 78, 90, 144, 90, -60, -60, -60, -60,
    9, -8, -18, -30, -24, 0, 20, 60, 0, 0,
    -9, 18, -32, 0, 24, 30, 0, 0, -60, 20,
    9, -18, -8, 0, -24, -30, 0, 0, 60, 20,
];

/// Coefficients for the first row, where the northern neighbors collapse
/// onto the pole.
#[rustfmt::skip]
const CUBIC_NORTH: [i32; STENCIL_SIZE * N_TERMS] = [
    0, 0, -131, 0, 138, 144, 0, 0, -102, -31,
    0, 0, 7, 0, -138, 42, 0, 0, 102, -31,
    62, 0, -31, 0, 0, -62, 0, 0, 0, 31,
    124, 0, -62, 0, 0, -124, 0, 0, 0, 62,
    124, 0, -62, 0, 0, -124, 0, 0, 0, 62,
    62, 0, -31, 0, 0, -62, 0, 0, 0, 31,
    0, 0, 45, 0, -183, -9, 0, 93, 18, 0,
    0, 0, 216, 0, 33, 87, 0, -93, 12, -93,
    0, 0, 156, 0, 153, 99, 0, -93, -12, -93,
    0, 0, -45, 0, -3, 9, 0, 93, -18, 0,
    0, 0, -55, 0, 48, 42, 0, 0, -84, 31,
    0, 0, -7, 0, -48, -42, 0, 0, 84, 31,
];

/// Coefficients for the second-to-last row, next to the south pole.
#[rustfmt::skip]
const CUBIC_SOUTH: [i32; STENCIL_SIZE * N_TERMS] = [
    18, -36, -122, 0, 120, 135, 0, 0, -84, -31,
    -18, 36, -2, 0, -120, 51, 0, 0, 84, -31,
    36, -165, -27, 93, 147, -9, 0, -93, 18, 0,
    210, 45, -111, -93, -57, -192, 0, 93, 12, 93,
    162, 141, -75, -93, -129, -180, 0, 93, -12, 93,
    -36, -21, 27, 93, 39, 9, 0, -93, -18, 0,
    0, 0, 62, 0, 0, 31, 0, 0, 0, -31,
    0, 0, 124, 0, 0, 62, 0, 0, 0, -62,
    0, 0, 124, 0, 0, 62, 0, 0, 0, -62,
    0, 0, 62, 0, 0, 31, 0, 0, 0, -31,
    -18, 36, -64, 0, 66, 51, 0, 0, -102, 31,
    18, -36, 2, 0, -66, -51, 0, 0, 102, 31,
];

/// Sample offsets `(dx, dy)` of the cubic stencil relative to `(ix, iy)`.
const STENCIL: [(i64, i64); STENCIL_SIZE] = [
    (0, -1),
    (1, -1),
    (-1, 0),
    (0, 0),
    (1, 0),
    (2, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (2, 1),
    (0, 2),
    (1, 2),
];

/// Coefficient table selection for the bicubic fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stencil {
    Interior,
    NorthEdge,
    SouthEdge,
}

impl Stencil {
    /// Table to use for a cell in row `iy` of a grid with `height` rows.
    pub fn for_row(iy: i64, height: usize) -> Self {
        if iy == 0 {
            Self::NorthEdge
        } else if iy == height as i64 - 2 {
            Self::SouthEdge
        } else {
            Self::Interior
        }
    }

    fn coefficients(&self) -> &'static [i32; STENCIL_SIZE * N_TERMS] {
        match self {
            Self::Interior => &CUBIC,
            Self::NorthEdge => &CUBIC_NORTH,
            Self::SouthEdge => &CUBIC_SOUTH,
        }
    }

    /// Common denominator of the table.
    fn normalizer(&self) -> f64 {
        match self {
            Self::Interior => 240.0,
            Self::NorthEdge | Self::SouthEdge => 372.0,
        }
    }
}

/// Bilinear blend of the four corners of cell `(ix, iy)`.
pub fn bilinear(grid: &GeoidGrid, ix: i64, iy: i64, fx: f64, fy: f64) -> f64 {
    let v00 = grid.sample_at(ix, iy);
    let v01 = grid.sample_at(ix + 1, iy);
    let v10 = grid.sample_at(ix, iy + 1);
    let v11 = grid.sample_at(ix + 1, iy + 1);

    let a = (1.0 - fx) * v00 + fx * v01;
    let b = (1.0 - fx) * v10 + fx * v11;
    (1.0 - fy) * a + fy * b
}

/// Bicubic least-squares fit over the 12 samples around cell `(ix, iy)`.
pub fn bicubic(grid: &GeoidGrid, ix: i64, iy: i64, fx: f64, fy: f64) -> f64 {
    let mut v = [0.0; STENCIL_SIZE];
    for (value, (dx, dy)) in v.iter_mut().zip(STENCIL) {
        *value = grid.sample_at(ix + dx, iy + dy);
    }

    let stencil = Stencil::for_row(iy, grid.height());
    let c3 = stencil.coefficients();
    let c0 = stencil.normalizer();

    let mut t = [0.0; N_TERMS];
    for (i, term) in t.iter_mut().enumerate() {
        let mut acc = 0.0;
        for (j, value) in v.iter().enumerate() {
            acc += value * f64::from(c3[N_TERMS * j + i]);
        }
        *term = acc / c0;
    }

    t[0] + fx * (t[1] + fx * (t[3] + fx * t[6]))
        + fy * (t[2] + fx * (t[4] + fx * t[7]) + fy * (t[5] + fx * t[8] + fy * t[9]))
}
