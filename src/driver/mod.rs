//! Storage driver contract and the registry that resolves destinations.
//!
//! A driver exposes the primitive read-only operations this crate needs from
//! a backend: enumerate the children of a prefix, read a whole record, and
//! report the canonical URL of the destination it was opened against.
//! Drivers are created through a [`DriverRegistry`], an explicit scheme to
//! factory mapping built once at startup so tests can inject their own.

mod vfs;

use std::collections::BTreeMap;
use std::fmt;

use camino::Utf8Path;
use thiserror::Error;
use tracing::debug;

use crate::error::BackupStoreError;

pub use vfs::{VFS_SCHEME, VfsDriver};

/// Failures reported by a driver for a single backend round-trip.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DriverError {
    /// Raised when the object or prefix does not exist.
    #[error("{path} does not exist")]
    NotFound {
        /// Path relative to the destination root.
        path: String,
    },
    /// Raised for any other backend failure.
    #[error("failed to access {path}: {message}")]
    Io {
        /// Path relative to the destination root.
        path: String,
        /// Backend error message.
        message: String,
    },
}

/// Read-only operations a backup store backend must provide.
pub trait StoreDriver: fmt::Debug {
    /// Canonical base URL of the destination.
    fn base_url(&self) -> &str;

    /// Lists the names of the direct children of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::NotFound`] when `path` does not exist and
    /// [`DriverError::Io`] when the backend fails.
    fn list(&self, path: &Utf8Path) -> Result<Vec<String>, DriverError>;

    /// Reads the whole object stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::NotFound`] when no object exists at `path` and
    /// [`DriverError::Io`] when the backend fails.
    fn read(&self, path: &Utf8Path) -> Result<Vec<u8>, DriverError>;
}

/// Constructor stored in a [`DriverRegistry`] for one scheme.
pub type DriverFactory = Box<dyn Fn(&str) -> Result<Box<dyn StoreDriver>, BackupStoreError>>;

/// Maps destination schemes to driver constructors.
#[derive(Default)]
pub struct DriverRegistry {
    factories: BTreeMap<String, DriverFactory>,
}

impl DriverRegistry {
    /// Creates a registry with no schemes registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in drivers registered.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(VFS_SCHEME, |locator| {
            VfsDriver::open(locator).map(|driver| Box::new(driver) as Box<dyn StoreDriver>)
        });
        registry
    }

    /// Registers `factory` for `scheme`, replacing any previous entry.
    pub fn register<F>(&mut self, scheme: &str, factory: F)
    where
        F: Fn(&str) -> Result<Box<dyn StoreDriver>, BackupStoreError> + 'static,
    {
        self.factories
            .insert(scheme.to_ascii_lowercase(), Box::new(factory));
    }

    /// Opens a driver for `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`BackupStoreError::UnsupportedDestination`] when the locator
    /// has no scheme or no driver is registered for it, and whatever the
    /// factory reports (typically [`BackupStoreError::Connection`]) when the
    /// backend session cannot be established.
    pub fn resolve(&self, destination: &str) -> Result<Box<dyn StoreDriver>, BackupStoreError> {
        let unsupported = || BackupStoreError::UnsupportedDestination {
            destination: destination.to_owned(),
        };
        let scheme = scheme_of(destination).ok_or_else(unsupported)?;
        let factory = self
            .factories
            .get(&scheme.to_ascii_lowercase())
            .ok_or_else(unsupported)?;

        let driver = factory(destination)?;
        debug!(
            scheme,
            base_url = driver.base_url(),
            "resolved backup store driver"
        );
        Ok(driver)
    }
}

impl fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("schemes", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Returns the scheme of a `scheme://rest` locator.
pub(crate) fn scheme_of(locator: &str) -> Option<&str> {
    let (scheme, _) = locator.split_once("://")?;
    let mut chars = scheme.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    chars
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '+' | '-' | '.'))
        .then_some(scheme)
}
