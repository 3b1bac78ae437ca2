//! Common test fixtures for geoid tests.

/// Geoid grid file names as distributed by GeographicLib.
pub mod files {
    /// EGM96 at 15 minute resolution (1440 x 721).
    pub const EGM96_15: &str = "egm96-15.pgm";

    /// EGM96 at 5 minute resolution (4320 x 2161).
    pub const EGM96_5: &str = "egm96-5.pgm";

    /// EGM2008 at 1 minute resolution.
    pub const EGM2008_1: &str = "egm2008-1.pgm";
}

/// Properties of the EGM96 15 minute grid.
pub mod egm96_15 {
    pub const WIDTH: usize = 1440;
    pub const HEIGHT: usize = 721;
    pub const OFFSET: f64 = -108.0;
    pub const SCALE: f64 = 0.003;

    /// Tolerance, in meters, for the reference heights below.
    pub const HEIGHT_TOLERANCE: f64 = 0.2;

    /// Reference geoid heights `(lat, lon, height_m)`.
    pub const KNOWN_HEIGHTS: &[(f64, f64, f64)] = &[
        (89.74, 5.75, 13.89),
        (86.5, 217.25, 11.76),
        (71.25, 8.0, 43.56),
        (54.0, 182.25, 2.35),
        (35.5, 186.0, -12.91),
        (14.75, 213.5, -8.07),
        (-22.25, 221.5, -10.18),
        (-37.5, 13.0, 25.61),
        (-51.75, 157.25, -17.88),
        (-70.5, 346.0, 5.18),
        (-74.5, 22.0, 17.5),
        (-84.5, 306.25, -25.71),
        (-86.75, 328.75, -21.81),
        (-90.0, 0.0, -29.54),
    ];
}

/// Coordinates exercising the edges of the query domain.
pub mod coords {
    /// Latitudes that are rejected.
    pub const INVALID_LATITUDES: &[f64] = &[90.000001, -90.000001, 91.0, -180.0, 1e300, f64::INFINITY];

    /// Longitudes congruent to 10 degrees.
    pub const LONGITUDES_AT_10: &[f64] = &[10.0, 370.0, -350.0, 730.0, -710.0, 36_010.0];
}
