//! Test support utilities shared across unit and integration tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::ffi::OsString;
use std::rc::Rc;
use std::sync::{Mutex, MutexGuard, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};

use crate::driver::{DriverError, DriverRegistry, StoreDriver};
use crate::layout;
use crate::metadata::{Backup, Volume};

/// Scheme under which [`MemoryDriver::registry`] registers the driver.
pub const MEMORY_SCHEME: &str = "mem";

/// Default canonical base URL reported by [`MemoryDriver`].
pub const MEMORY_BASE_URL: &str = "mem://store";

/// In-memory backup store used to drive deterministic listing outcomes.
///
/// Clones share the same objects, so a clone handed to a registry observes
/// everything seeded afterwards.
#[derive(Clone, Debug)]
pub struct MemoryDriver {
    base_url: String,
    state: Rc<RefCell<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    objects: BTreeMap<Utf8PathBuf, Vec<u8>>,
    failing_reads: BTreeSet<Utf8PathBuf>,
    failing_lists: BTreeSet<Utf8PathBuf>,
    calls: usize,
}

impl Default for MemoryDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDriver {
    /// Creates an empty store reporting [`MEMORY_BASE_URL`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(MEMORY_BASE_URL)
    }

    /// Creates an empty store reporting `base_url` as its canonical URL.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            state: Rc::new(RefCell::new(MemoryState::default())),
        }
    }

    /// Builds a registry that resolves `mem://` locators to this store.
    #[must_use]
    pub fn registry(&self) -> DriverRegistry {
        let mut registry = DriverRegistry::new();
        let driver = self.clone();
        registry.register(MEMORY_SCHEME, move |_| {
            Ok(Box::new(driver.clone()) as Box<dyn StoreDriver>)
        });
        registry
    }

    /// Stores a volume record at its layout path.
    ///
    /// # Errors
    ///
    /// Returns the serialiser error when the record cannot be encoded.
    pub fn put_volume(&self, volume: &Volume) -> Result<(), serde_json::Error> {
        let bytes = serde_json::to_vec(volume)?;
        self.put_raw(layout::volume_config_path(&volume.name), bytes);
        Ok(())
    }

    /// Stores a backup record at its layout path.
    ///
    /// # Errors
    ///
    /// Returns the serialiser error when the record cannot be encoded.
    pub fn put_backup(&self, backup: &Backup) -> Result<(), serde_json::Error> {
        let bytes = serde_json::to_vec(backup)?;
        self.put_raw(
            layout::backup_config_path(&backup.name, &backup.volume_name),
            bytes,
        );
        Ok(())
    }

    /// Stores arbitrary bytes at `path`.
    pub fn put_raw(&self, path: impl Into<Utf8PathBuf>, bytes: impl Into<Vec<u8>>) {
        self.state
            .borrow_mut()
            .objects
            .insert(path.into(), bytes.into());
    }

    /// Makes every read of `path` fail with an I/O error.
    pub fn fail_read(&self, path: impl Into<Utf8PathBuf>) {
        self.state.borrow_mut().failing_reads.insert(path.into());
    }

    /// Makes every listing of `path` fail with an I/O error.
    pub fn fail_list(&self, path: impl Into<Utf8PathBuf>) {
        self.state.borrow_mut().failing_lists.insert(path.into());
    }

    /// Number of `list` and `read` calls served so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state.borrow().calls
    }

    fn record_call(&self) {
        self.state.borrow_mut().calls += 1;
    }
}

impl StoreDriver for MemoryDriver {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn list(&self, path: &Utf8Path) -> Result<Vec<String>, DriverError> {
        self.record_call();
        let state = self.state.borrow();
        if state.failing_lists.contains(path) {
            return Err(DriverError::Io {
                path: path.to_string(),
                message: String::from("simulated list failure"),
            });
        }

        let children: BTreeSet<String> = state
            .objects
            .keys()
            .filter_map(|key| key.strip_prefix(path).ok())
            .filter_map(|rest| rest.components().next())
            .map(|component| component.as_str().to_owned())
            .collect();
        if children.is_empty() {
            return Err(DriverError::NotFound {
                path: path.to_string(),
            });
        }
        Ok(children.into_iter().collect())
    }

    fn read(&self, path: &Utf8Path) -> Result<Vec<u8>, DriverError> {
        self.record_call();
        let state = self.state.borrow();
        if state.failing_reads.contains(path) {
            return Err(DriverError::Io {
                path: path.to_string(),
                message: String::from("simulated read failure"),
            });
        }
        state
            .objects
            .get(path)
            .cloned()
            .ok_or_else(|| DriverError::NotFound {
                path: path.to_string(),
            })
    }
}

/// Global mutex used to serialise environment mutation in tests.
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Guard that holds the env mutex and restores variables on drop.
pub struct EnvGuard {
    previous: Vec<(String, Option<OsString>)>,
    _guard: MutexGuard<'static, ()>,
}

impl EnvGuard {
    /// Sets and clears environment variables while holding a global mutex.
    ///
    /// Pairs with a `None` value remove the variable for the guard's lifetime.
    #[must_use]
    pub fn set_vars(pairs: &[(&str, Option<&str>)]) -> Self {
        let guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let mut previous = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            let old = env::var_os(key);
            // SAFETY: Environment mutation is serialised by `ENV_LOCK`, preventing races.
            unsafe {
                match value {
                    Some(text) => env::set_var(key, text),
                    None => env::remove_var(key),
                }
            }
            previous.push(((*key).to_owned(), old));
        }

        Self {
            previous,
            _guard: guard,
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, old) in &self.previous {
            // SAFETY: Environment mutation is serialised by holding `_guard`.
            unsafe {
                match old {
                    Some(val) => env::set_var(key, val),
                    None => env::remove_var(key),
                }
            }
        }
    }
}
