//! Shared cache of loaded geoid grids.
//!
//! Each grid name owns a load cell that is initialized at most once, so
//! concurrent first requests for the same name read the resource once and
//! all receive the same `Arc<GeoidGrid>`. A failed load leaves nothing
//! behind and the next request retries.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::config::GeoidConfig;
use crate::error::{GeoidError, Result};
use crate::geoid::Geoid;
use crate::grid::GeoidGrid;
use crate::types::{Interpolation, RegistryStats};

type LoadCell = Arc<OnceCell<Arc<GeoidGrid>>>;

/// Thread-safe registry of geoid grids keyed by name.
pub struct GeoidRegistry {
    config: GeoidConfig,
    grids: RwLock<HashMap<String, LoadCell>>,
    hits: AtomicU64,
    loads: AtomicU64,
    failures: AtomicU64,
}

impl GeoidRegistry {
    pub fn new(config: GeoidConfig) -> Self {
        Self {
            config,
            grids: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            loads: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &GeoidConfig {
        &self.config
    }

    /// Get the grid called `name`, loading it on first use.
    pub fn get(&self, name: &str) -> Result<Arc<GeoidGrid>> {
        validate_name(name)?;
        let cell = self.cell(name);

        let mut loaded = false;
        let result = cell.get_or_try_init(|| {
            loaded = true;
            let path = self.config.resource_path(name);
            debug!(name, path = %path.display(), "Loading geoid grid");
            GeoidGrid::open(&path).map(Arc::new)
        });

        match result {
            Ok(grid) => {
                if loaded {
                    self.loads.fetch_add(1, Ordering::Relaxed);
                } else {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                }
                Ok(Arc::clone(grid))
            }
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                self.discard_if_empty(name, &cell);
                Err(e)
            }
        }
    }

    /// Get a view of grid `name` with the given interpolation.
    pub fn geoid(&self, name: &str, interpolation: Interpolation) -> Result<Geoid> {
        let grid = self.get(name)?;
        Ok(Geoid::new(name, grid, interpolation))
    }

    /// Whether grid `name` is loaded.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.read()
            .get(name)
            .map(|cell| cell.get().is_some())
            .unwrap_or(false)
    }

    /// Names of all loaded grids, sorted.
    pub fn loaded_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .read()
            .iter()
            .filter(|(_, cell)| cell.get().is_some())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }

    /// Drop grid `name` from the registry. Views already handed out keep
    /// their grid alive. Returns true if a loaded grid was removed.
    pub fn evict(&self, name: &str) -> bool {
        self.write()
            .remove(name)
            .map(|cell| cell.get().is_some())
            .unwrap_or(false)
    }

    /// Drop all grids.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Get registry statistics.
    pub fn stats(&self) -> RegistryStats {
        let entries = self
            .read()
            .values()
            .filter(|cell| cell.get().is_some())
            .count();
        RegistryStats {
            hits: self.hits.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            entries,
        }
    }

    fn cell(&self, name: &str) -> LoadCell {
        if let Some(cell) = self.read().get(name) {
            return Arc::clone(cell);
        }
        Arc::clone(self.write().entry(name.to_string()).or_default())
    }

    fn discard_if_empty(&self, name: &str, cell: &LoadCell) {
        let mut grids = self.write();
        let stale = grids
            .get(name)
            .map(|current| Arc::ptr_eq(current, cell) && current.get().is_none())
            .unwrap_or(false);
        if stale {
            grids.remove(name);
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, LoadCell>> {
        self.grids.read().unwrap_or_else(|poisoned| {
            warn!("Geoid registry lock poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, LoadCell>> {
        self.grids.write().unwrap_or_else(|poisoned| {
            warn!("Geoid registry lock poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }
}

impl Default for GeoidRegistry {
    fn default() -> Self {
        Self::new(GeoidConfig::default())
    }
}

impl std::fmt::Debug for GeoidRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoidRegistry")
            .field("data_dir", &self.config.data_dir)
            .field("loaded", &self.loaded_names())
            .finish()
    }
}

/// Grid names are file stems inside the data directory.
fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(GeoidError::Config(format!("invalid geoid name '{}'", name)));
    }
    Ok(())
}
