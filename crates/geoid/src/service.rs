//! Geoid service facade.
//!
//! Holds the active geoid view and answers height queries against it,
//! loading the configured default grid on first use if nothing has been
//! initialized.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use chrono::NaiveDateTime;
use tracing::{debug, error, info};

use crate::config::GeoidConfig;
use crate::error::Result;
use crate::geoid::Geoid;
use crate::registry::GeoidRegistry;
use crate::types::{GeoidMetadata, Interpolation};

/// Geoid height service.
///
/// ```no_run
/// use geoid::{GeoidConfig, GeoidService};
///
/// let service = GeoidService::new(GeoidConfig::from_env());
/// if service.initialize(Some("egm96-5"), Some(true)) {
///     let n = service.height(42.0, -75.0);
///     println!("geoid height: {} m", n);
/// }
/// ```
pub struct GeoidService {
    registry: Arc<GeoidRegistry>,
    active: RwLock<Option<Geoid>>,
    /// Set after an implicit load failure has been reported.
    reported_failure: AtomicBool,
}

impl GeoidService {
    pub fn new(config: GeoidConfig) -> Self {
        Self::with_registry(Arc::new(GeoidRegistry::new(config)))
    }

    /// Service backed by a registry shared with other services.
    pub fn with_registry(registry: Arc<GeoidRegistry>) -> Self {
        Self {
            registry,
            active: RwLock::new(None),
            reported_failure: AtomicBool::new(false),
        }
    }

    /// Service configured from environment variables.
    pub fn from_env() -> Self {
        Self::new(GeoidConfig::from_env())
    }

    pub fn registry(&self) -> &Arc<GeoidRegistry> {
        &self.registry
    }

    /// Select grid `name` with cubic or bilinear interpolation, loading it
    /// if needed. Missing arguments take the configured defaults.
    ///
    /// Returns false if the grid cannot be loaded; the previously active
    /// view, if any, stays active.
    pub fn initialize(&self, name: Option<&str>, cubic: Option<bool>) -> bool {
        match self.try_initialize(name, cubic) {
            Ok(_) => true,
            Err(e) => {
                error!(error = %e, "Failed to initialize geoid");
                false
            }
        }
    }

    /// Like [`initialize`](Self::initialize) but returns the activated view
    /// or the load error.
    pub fn try_initialize(&self, name: Option<&str>, cubic: Option<bool>) -> Result<Geoid> {
        let geoid = self.load(name, cubic)?;
        log_activated(&geoid);
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = Some(geoid.clone());
        self.reported_failure.store(false, Ordering::Relaxed);
        Ok(geoid)
    }

    /// Activate the default grid unless another view was activated while it
    /// was loading. Returns whichever view ends up active.
    fn initialize_default(&self) -> Result<Geoid> {
        let geoid = self.load(None, None)?;
        let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
        if active.is_none() {
            log_activated(&geoid);
        }
        let geoid = active.get_or_insert(geoid).clone();
        self.reported_failure.store(false, Ordering::Relaxed);
        Ok(geoid)
    }

    fn load(&self, name: Option<&str>, cubic: Option<bool>) -> Result<Geoid> {
        let config = self.registry.config();
        let name = name.unwrap_or(&config.default_name);
        let interpolation = cubic
            .map(Interpolation::from_cubic)
            .unwrap_or(config.interpolation);
        self.registry.geoid(name, interpolation)
    }

    pub fn is_initialized(&self) -> bool {
        self.read_active(|g| g.is_some())
    }

    /// Geoid height in meters at `lat`, `lon` degrees.
    ///
    /// Returns NaN for an invalid latitude or longitude, or when no grid is
    /// active and the default grid cannot be loaded.
    pub fn height(&self, lat: f64, lon: f64) -> f64 {
        if lat.is_nan() || lat.abs() > 90.0 || lon.is_nan() {
            return f64::NAN;
        }

        match self.geoid() {
            Some(geoid) => geoid.height(lat, lon),
            None => match self.initialize_default() {
                Ok(geoid) => geoid.height(lat, lon),
                Err(e) => {
                    if self.reported_failure.swap(true, Ordering::Relaxed) {
                        debug!(error = %e, "Default geoid still unavailable");
                    } else {
                        error!(error = %e, "Failed to load default geoid");
                    }
                    f64::NAN
                }
            },
        }
    }

    /// The active view.
    pub fn geoid(&self) -> Option<Geoid> {
        self.read_active(|g| g.clone())
    }

    pub fn name(&self) -> Option<String> {
        self.read_active(|g| g.as_ref().map(|g| g.name().to_string()))
    }

    pub fn description(&self) -> Option<String> {
        self.read_active(|g| g.as_ref().and_then(|g| g.description().map(str::to_string)))
    }

    pub fn capture_time(&self) -> Option<NaiveDateTime> {
        self.read_active(|g| g.as_ref().and_then(Geoid::capture_time))
    }

    pub fn interpolation(&self) -> Option<Interpolation> {
        self.read_active(|g| g.as_ref().map(Geoid::interpolation))
    }

    pub fn max_error(&self) -> Option<f64> {
        self.read_active(|g| g.as_ref().and_then(Geoid::max_error))
    }

    pub fn rms_error(&self) -> Option<f64> {
        self.read_active(|g| g.as_ref().and_then(Geoid::rms_error))
    }

    pub fn scale(&self) -> Option<f64> {
        self.read_active(|g| g.as_ref().map(Geoid::scale))
    }

    pub fn offset(&self) -> Option<f64> {
        self.read_active(|g| g.as_ref().map(Geoid::offset))
    }

    pub fn metadata(&self) -> Option<GeoidMetadata> {
        self.read_active(|g| g.as_ref().map(Geoid::metadata))
    }

    fn read_active<T>(&self, f: impl FnOnce(&Option<Geoid>) -> T) -> T {
        let guard = self.active.read().unwrap_or_else(PoisonError::into_inner);
        f(&*guard)
    }
}

fn log_activated(geoid: &Geoid) {
    info!(
        name = geoid.name(),
        interpolation = %geoid.interpolation(),
        width = geoid.grid().width(),
        height = geoid.grid().height(),
        "Geoid initialized"
    );
}

impl Default for GeoidService {
    fn default() -> Self {
        Self::new(GeoidConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::thread;
    use test_utils::PgmBuilder;

    fn service() -> (tempfile::TempDir, GeoidService) {
        let dir = tempfile::tempdir().unwrap();
        PgmBuilder::new(8, 5)
            .description("synthetic")
            .datetime("2024-01-02 03:04:05")
            .errors(0.01, 0.2, 0.001, 0.02)
            .fill_with(|x, y| (100 * x + 10 * y) as u16)
            .write_to(dir.path(), "egm96-15")
            .unwrap();
        PgmBuilder::new(4, 3).write_to(dir.path(), "flat").unwrap();
        let service = GeoidService::new(GeoidConfig::with_data_dir(dir.path()));
        (dir, service)
    }

    #[test]
    fn test_uninitialized_accessors() {
        let (_dir, service) = service();
        assert!(!service.is_initialized());
        assert_eq!(service.name(), None);
        assert_eq!(service.scale(), None);
        assert_eq!(service.metadata(), None);
    }

    #[test]
    fn test_initialize_defaults() {
        let (_dir, service) = service();
        assert!(service.initialize(None, None));
        assert_eq!(service.name().as_deref(), Some("egm96-15"));
        assert_eq!(service.interpolation(), Some(Interpolation::Cubic));
        assert_eq!(service.description().as_deref(), Some("synthetic"));
        assert_eq!(
            service.capture_time().map(|t| t.to_string()).as_deref(),
            Some("2024-01-02 03:04:05")
        );
        assert_eq!(service.max_error(), Some(0.01));
        assert_eq!(service.rms_error(), Some(0.001));
    }

    #[test]
    fn test_bilinear_selects_bilinear_errors() {
        let (_dir, service) = service();
        assert!(service.initialize(Some("egm96-15"), Some(false)));
        assert_eq!(service.interpolation(), Some(Interpolation::Bilinear));
        assert_eq!(service.max_error(), Some(0.2));
        assert_eq!(service.rms_error(), Some(0.02));
    }

    #[test]
    fn test_failed_initialize_keeps_active_view() {
        let (_dir, service) = service();
        assert!(service.initialize(Some("flat"), Some(true)));
        assert!(!service.initialize(Some("missing"), Some(true)));
        assert_eq!(service.name().as_deref(), Some("flat"));
    }

    #[test]
    fn test_height_loads_default_lazily() {
        let (_dir, service) = service();
        assert!(service.height(f64::NAN, 0.0).is_nan());
        assert!(!service.is_initialized());

        let h = service.height(0.0, 0.0);
        assert!(h.is_finite());
        assert!(service.is_initialized());
        assert_eq!(service.name().as_deref(), Some("egm96-15"));
    }

    #[test]
    fn test_height_without_data_is_nan() {
        let dir = tempfile::tempdir().unwrap();
        let service = GeoidService::new(GeoidConfig::with_data_dir(dir.path()));
        assert!(service.height(10.0, 10.0).is_nan());
        assert!(service.height(10.0, 10.0).is_nan());
        assert!(!service.is_initialized());
        assert_eq!(service.registry().stats().failures, 2);
    }

    #[test]
    fn test_reinitialize_does_not_reload() {
        let (_dir, service) = service();
        assert!(service.initialize(Some("flat"), Some(true)));
        assert!(service.initialize(Some("flat"), Some(true)));
        assert!(service.initialize(Some("flat"), Some(false)));
        let stats = service.registry().stats();
        assert_eq!(stats.loads, 1);
        assert_eq!(stats.hits, 2);
    }

    #[test]
    fn test_default_load_keeps_explicit_view() {
        let (_dir, service) = service();
        assert!(service.initialize(Some("flat"), Some(false)));

        // a lazy default load that observed no active view before this one
        let active = service.initialize_default().unwrap();
        assert_eq!(active.name(), "flat");
        assert_eq!(service.name().as_deref(), Some("flat"));
        assert_eq!(service.interpolation(), Some(Interpolation::Bilinear));
    }

    #[test]
    fn test_initialize_races_with_lazy_height() {
        for _ in 0..20 {
            let (_dir, service) = service();
            let service = Arc::new(service);
            let barrier = Arc::new(Barrier::new(2));

            let query = {
                let service = Arc::clone(&service);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    service.height(10.0, 20.0)
                })
            };
            let init = {
                let service = Arc::clone(&service);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    service.initialize(Some("flat"), Some(false))
                })
            };

            assert!(query.join().unwrap().is_finite());
            assert!(init.join().unwrap());
            assert_eq!(service.name().as_deref(), Some("flat"));
            assert_eq!(service.interpolation(), Some(Interpolation::Bilinear));
        }
    }

    #[test]
    fn test_shared_registry() {
        let (_dir, service) = service();
        let other = GeoidService::with_registry(Arc::clone(service.registry()));
        assert!(service.initialize(Some("flat"), None));
        assert!(other.initialize(Some("flat"), Some(false)));
        assert_eq!(service.registry().stats().loads, 1);
        assert_eq!(other.interpolation(), Some(Interpolation::Bilinear));
        assert_eq!(service.interpolation(), Some(Interpolation::Cubic));
    }
}
