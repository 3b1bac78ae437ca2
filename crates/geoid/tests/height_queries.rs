//! Geoid height queries against synthetic grids and, when installed, the
//! EGM96 15 minute grid.

use std::sync::Arc;

use geoid::{Geoid, GeoidConfig, GeoidGrid, GeoidService, Interpolation};
use test_utils::fixtures::{coords, egm96_15};
use test_utils::{
    assert_approx_eq, create_scrambled_samples, init_test_logging, require_test_file,
    temp_test_dir, PgmBuilder,
};

const WIDTH: usize = 16;
const HEIGHT: usize = 9;

fn scrambled(interpolation: Interpolation) -> Geoid {
    let dir = temp_test_dir();
    let path = PgmBuilder::new(WIDTH, HEIGHT)
        .samples(create_scrambled_samples(WIDTH, HEIGHT))
        .write_to(dir.path(), "scrambled")
        .unwrap();
    Geoid::open(path, interpolation).unwrap()
}

/// `(lat, lon, bilinear, cubic)` for the scrambled 16 x 9 grid.
const SCRAMBLED_HEIGHTS: &[(f64, f64, f64, f64)] = &[
    (37.3, 12.8, -15.572840829629612, -12.611947036093255),
    (89.9, 200.0, -71.16017629629638, -4.095330728494545),
    (80.0, 100.0, -37.35362962962962, -47.32280072127085),
    (-70.0, 355.0, -64.30155555555547, -88.63063956369746),
    (-89.5, 45.0, -99.65393333333334, -55.687599299084034),
    (-90.0, 0.0, 46.20000000000002, 46.203487499999994),
    (90.0, 0.0, -108.0, -65.5375),
    (0.0, 359.99, -30.913902666666644, -23.655046996892594),
    (-12.5, -47.25, -13.944933333333367, -16.963005475994564),
];

#[test]
fn test_bilinear_heights() {
    let geoid = scrambled(Interpolation::Bilinear);
    for &(lat, lon, expected, _) in SCRAMBLED_HEIGHTS {
        assert_approx_eq!(geoid.height(lat, lon), expected, 1e-9);
    }
}

#[test]
fn test_cubic_heights() {
    // covers the interior, north-edge and south-edge coefficient tables
    let geoid = scrambled(Interpolation::Cubic);
    for &(lat, lon, _, expected) in SCRAMBLED_HEIGHTS {
        assert_approx_eq!(geoid.height(lat, lon), expected, 1e-9);
    }
}

#[test]
fn test_bilinear_at_north_pole_is_first_sample() {
    let geoid = scrambled(Interpolation::Bilinear);
    assert_eq!(geoid.height(90.0, 0.0), geoid.offset());
}

#[test]
fn test_latitude_bounds() {
    for method in [Interpolation::Bilinear, Interpolation::Cubic] {
        let geoid = scrambled(method);
        assert!(geoid.height(90.0, 10.0).is_finite());
        assert!(geoid.height(-90.0, 10.0).is_finite());
        for &lat in coords::INVALID_LATITUDES {
            assert!(geoid.height(lat, 10.0).is_nan(), "lat {}", lat);
        }
        assert!(geoid.height(f64::NAN, 10.0).is_nan());
    }
}

#[test]
fn test_longitude_wraparound() {
    for method in [Interpolation::Bilinear, Interpolation::Cubic] {
        let geoid = scrambled(method);
        let reference = geoid.height(-33.3, 10.0);
        for &lon in coords::LONGITUDES_AT_10 {
            assert_eq!(geoid.height(-33.3, lon), reference, "lon {}", lon);
        }
        assert_eq!(geoid.height(12.0, 0.0), geoid.height(12.0, 360.0));
        assert!(geoid.height(12.0, f64::NAN).is_nan());
        assert!(geoid.height(12.0, f64::NEG_INFINITY).is_nan());
    }
}

#[test]
fn test_longitude_far_out_of_range_is_bounded() {
    let geoid = scrambled(Interpolation::Cubic);
    let h = geoid.height(0.0, 1e308);
    assert!(h.is_finite());
}

#[test]
fn test_constant_grid_is_flat() {
    let grid = GeoidGrid::from_reader(
        "flat",
        std::io::Cursor::new(
            PgmBuilder::new(WIDTH, HEIGHT)
                .offset(-10.0)
                .scale(0.5)
                .fill_with(|_, _| 40)
                .build(),
        ),
    )
    .unwrap();
    let grid = Arc::new(grid);
    for method in [Interpolation::Bilinear, Interpolation::Cubic] {
        let geoid = Geoid::new("flat", Arc::clone(&grid), method);
        for (lat, lon) in [(90.0, 0.0), (89.99, 123.0), (0.0, 0.0), (-45.0, 359.0), (-90.0, 180.0)] {
            assert_approx_eq!(geoid.height(lat, lon), 10.0, 1e-9);
        }
    }
}

#[test]
fn test_service_matches_direct_view() {
    init_test_logging();
    let dir = temp_test_dir();
    PgmBuilder::new(WIDTH, HEIGHT)
        .samples(create_scrambled_samples(WIDTH, HEIGHT))
        .write_to(dir.path(), "scrambled")
        .unwrap();
    let service = GeoidService::new(GeoidConfig::with_data_dir(dir.path()));
    assert!(service.initialize(Some("scrambled"), Some(false)));

    for &(lat, lon, expected, _) in SCRAMBLED_HEIGHTS {
        assert_approx_eq!(service.height(lat, lon), expected, 1e-9);
    }

    assert!(service.initialize(Some("scrambled"), Some(true)));
    for &(lat, lon, _, expected) in SCRAMBLED_HEIGHTS {
        assert_approx_eq!(service.height(lat, lon), expected, 1e-9);
    }
    assert_eq!(service.registry().stats().loads, 1);
}

#[test]
fn test_egm96_known_heights() {
    let path = require_test_file!(test_utils::fixtures::files::EGM96_15);
    let geoid = Geoid::open(&path, Interpolation::Cubic).unwrap();

    assert_eq!(geoid.grid().width(), egm96_15::WIDTH);
    assert_eq!(geoid.grid().height(), egm96_15::HEIGHT);
    assert_eq!(geoid.offset(), egm96_15::OFFSET);
    assert_eq!(geoid.scale(), egm96_15::SCALE);

    for &(lat, lon, expected) in egm96_15::KNOWN_HEIGHTS {
        assert_approx_eq!(geoid.height(lat, lon), expected, egm96_15::HEIGHT_TOLERANCE);
    }
}

#[test]
fn test_egm96_bilinear_close_to_cubic() {
    let path = require_test_file!(test_utils::fixtures::files::EGM96_15);
    let cubic = Geoid::open(&path, Interpolation::Cubic).unwrap();
    let bilinear = cubic.with_interpolation(Interpolation::Bilinear);

    let max_error = bilinear.max_error().unwrap_or(1.0);
    for &(lat, lon, _) in egm96_15::KNOWN_HEIGHTS {
        let diff = (cubic.height(lat, lon) - bilinear.height(lat, lon)).abs();
        assert!(diff <= 2.0 * max_error + 0.2, "({}, {}): {}", lat, lon, diff);
    }
}
