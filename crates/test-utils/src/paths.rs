//! Path utilities for locating test data files.
//!
//! The real geoid grids are tens of megabytes and are not checked in. Tests
//! that need them look in several places and skip when nothing is found.

use std::path::PathBuf;

/// Default install location of GeographicLib geoid grids.
pub const SYSTEM_GEOID_DIR: &str = "/usr/local/share/GeographicLib/geoids";

/// Returns the workspace root directory.
///
/// This is determined by walking up from the current crate's manifest directory
/// until we find the workspace Cargo.toml.
pub fn workspace_root() -> PathBuf {
    // Start from the test-utils crate manifest dir
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Returns the path to the testdata directory for a specific crate.
///
/// # Arguments
///
/// * `crate_name` - The name of the crate (e.g., "geoid")
///
/// # Returns
///
/// The path to `crates/{crate_name}/testdata/`
pub fn crate_testdata_dir(crate_name: &str) -> PathBuf {
    workspace_root()
        .join("crates")
        .join(crate_name)
        .join("testdata")
}

/// Searches for a test file in multiple locations.
///
/// This function checks the following locations in order:
/// 1. Environment variable `TEST_DATA_DIR` (if set)
/// 2. Environment variable `GEOID_DATA_DIR` (if set)
/// 3. `crates/geoid/testdata/`
/// 4. `testdata/` at the workspace root
/// 5. The system GeographicLib geoid directory
///
/// # Arguments
///
/// * `name` - The filename to search for (e.g., "egm96-15.pgm")
///
/// # Returns
///
/// `Some(PathBuf)` if the file is found, `None` otherwise.
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let mut candidates = Vec::new();

    for var in ["TEST_DATA_DIR", "GEOID_DATA_DIR"] {
        if let Ok(dir) = std::env::var(var) {
            candidates.push(PathBuf::from(dir).join(name));
        }
    }

    let root = workspace_root();
    candidates.extend([
        crate_testdata_dir("geoid").join(name),
        root.join("testdata").join(name), // workspace-level testdata
        PathBuf::from(SYSTEM_GEOID_DIR).join(name),
    ]);

    candidates.into_iter().find(|path| path.exists())
}

/// Creates a temporary directory for test output.
///
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
///
/// # Returns
///
/// A `tempfile::TempDir` that will be automatically cleaned up.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}
