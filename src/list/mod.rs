//! Listing of volumes and their backups.
//!
//! A list call resolves one driver for the destination, then aggregates the
//! requested volume (or every volume) into [`VolumeInfo`] values. The first
//! failure aborts the whole call; no partial mapping is ever returned.

use std::collections::BTreeMap;

use tracing::{debug, instrument};

use crate::driver::{DriverRegistry, StoreDriver};
use crate::error::BackupStoreError;
use crate::info::{self, BackupSummary, VolumeInfo};
use crate::metadata;
use crate::name::is_valid_name;

/// Volumes keyed by name, as returned by a list call.
pub type VolumeListing = BTreeMap<String, VolumeInfo>;

/// Lists volumes of a destination using drivers from a registry.
#[derive(Clone, Copy, Debug)]
pub struct ListOrchestrator<'a> {
    registry: &'a DriverRegistry,
}

impl<'a> ListOrchestrator<'a> {
    /// Creates an orchestrator resolving destinations through `registry`.
    #[must_use]
    pub const fn new(registry: &'a DriverRegistry) -> Self {
        Self { registry }
    }

    /// Lists `volume` at `destination`, or every volume when `volume` is
    /// empty. Each listed volume must have been created by
    /// `storage_driver`.
    ///
    /// # Errors
    ///
    /// Returns [`BackupStoreError::InvalidName`] before contacting the
    /// backend when a non-empty `volume` fails the naming policy, and
    /// otherwise the first resolver, loader or ownership error encountered.
    #[instrument(skip(self))]
    pub fn list(
        &self,
        volume: &str,
        destination: &str,
        storage_driver: &str,
    ) -> Result<VolumeListing, BackupStoreError> {
        if !volume.is_empty() {
            ensure_valid_name(volume)?;
        }

        let driver = self.registry.resolve(destination)?;
        if volume.is_empty() {
            list_all_volumes(driver.as_ref(), storage_driver)
        } else {
            let info = list_volume(volume, driver.as_ref(), storage_driver)?;
            Ok(BTreeMap::from([(volume.to_owned(), info)]))
        }
    }
}

/// Lists every volume reachable through `driver`.
///
/// # Errors
///
/// Returns the first enumeration, loader or ownership error encountered.
pub fn list_all_volumes<D>(driver: &D, storage_driver: &str) -> Result<VolumeListing, BackupStoreError>
where
    D: StoreDriver + ?Sized,
{
    metadata::list_volume_names(driver)?
        .into_iter()
        .map(|name| {
            let info = list_volume(&name, driver, storage_driver)?;
            Ok((name, info))
        })
        .collect()
}

/// Loads one volume and all of its backups.
///
/// # Errors
///
/// Returns [`BackupStoreError::InvalidName`] when the volume or one of its
/// enumerated backups has a name outside the policy,
/// [`BackupStoreError::DriverMismatch`] when the volume belongs to another
/// storage driver, and the first loader error otherwise.
pub fn list_volume<D>(
    volume: &str,
    driver: &D,
    storage_driver: &str,
) -> Result<VolumeInfo, BackupStoreError>
where
    D: StoreDriver + ?Sized,
{
    ensure_valid_name(volume)?;

    let backup_names = metadata::list_backup_names(volume, driver)?;
    let record = metadata::load_volume(volume, driver)?;
    if record.driver != storage_driver {
        return Err(BackupStoreError::DriverMismatch {
            volume: volume.to_owned(),
            found: record.driver,
            expected: storage_driver.to_owned(),
        });
    }

    let mut volume_info = info::project_volume(&record);
    volume_info.backups = backup_names
        .iter()
        .map(|backup_name| {
            ensure_valid_name(backup_name)?;
            let backup = metadata::load_backup(backup_name, volume, driver)?;
            let summary = info::project_backup(&backup, driver.base_url());
            Ok((summary.url.clone(), summary))
        })
        .collect::<Result<BTreeMap<String, BackupSummary>, BackupStoreError>>()?;
    debug!(
        volume,
        backups = volume_info.backups.len(),
        "listed volume"
    );
    Ok(volume_info)
}

fn ensure_valid_name(name: &str) -> Result<(), BackupStoreError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(BackupStoreError::InvalidName {
            name: name.to_owned(),
        })
    }
}

/// Lists volumes using the built-in drivers.
///
/// # Errors
///
/// See [`ListOrchestrator::list`].
pub fn list(
    volume: &str,
    destination: &str,
    storage_driver: &str,
) -> Result<VolumeListing, BackupStoreError> {
    let registry = DriverRegistry::with_defaults();
    ListOrchestrator::new(&registry).list(volume, destination, storage_driver)
}
