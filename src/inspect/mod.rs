//! Inspection of a single backup identified by its URL.

use tracing::{debug, instrument};

use crate::backup_url::{self, BackupRef};
use crate::driver::{DriverRegistry, StoreDriver};
use crate::error::BackupStoreError;
use crate::info::{self, BackupDetail};
use crate::metadata;

/// Resolves backup URLs into fully described backups.
#[derive(Clone, Copy, Debug)]
pub struct InspectOrchestrator<'a> {
    registry: &'a DriverRegistry,
}

impl<'a> InspectOrchestrator<'a> {
    /// Creates an orchestrator resolving destinations through `registry`.
    #[must_use]
    pub const fn new(registry: &'a DriverRegistry) -> Self {
        Self { registry }
    }

    /// Describes the backup named by `url`, including its volume.
    ///
    /// The URL is decoded before any driver is resolved, so a malformed URL
    /// never contacts a backend. The driver is then resolved from the
    /// destination embedded in the URL. The returned URL is re-derived from
    /// the driver's canonical base URL, so an equivalent alternate spelling
    /// of the destination is normalised.
    ///
    /// # Errors
    ///
    /// Returns [`BackupStoreError::MalformedUrl`] for foreign strings and the
    /// first resolver or loader error otherwise.
    #[instrument(skip(self))]
    pub fn inspect_backup(&self, url: &str) -> Result<BackupDetail, BackupStoreError> {
        let backup_ref = backup_url::decode(url)?;
        let driver = self.registry.resolve(&backup_ref.destination)?;
        describe(&backup_ref, driver.as_ref())
    }

    /// Describes the backup named by `url`, which must belong to
    /// `destination`.
    ///
    /// # Errors
    ///
    /// Returns [`BackupStoreError::DestinationMismatch`] when the URL was
    /// issued for another destination, and the errors of
    /// [`Self::inspect_backup`] otherwise.
    #[instrument(skip(self))]
    pub fn inspect_backup_within(
        &self,
        url: &str,
        destination: &str,
    ) -> Result<BackupDetail, BackupStoreError> {
        let backup_ref = backup_url::decode_for(url, destination)?;
        let driver = self.registry.resolve(destination)?;
        describe(&backup_ref, driver.as_ref())
    }
}

fn describe<D>(backup_ref: &BackupRef, driver: &D) -> Result<BackupDetail, BackupStoreError>
where
    D: StoreDriver + ?Sized,
{
    let volume = metadata::load_volume(&backup_ref.volume, driver)?;
    let backup = metadata::load_backup(&backup_ref.backup, &backup_ref.volume, driver)?;
    debug!(
        backup = %backup.name,
        volume = %volume.name,
        "loaded backup for inspection"
    );
    Ok(info::project_full_backup(&backup, &volume, driver.base_url()))
}

/// Inspects a backup using the built-in drivers.
///
/// # Errors
///
/// See [`InspectOrchestrator::inspect_backup`].
pub fn inspect_backup(url: &str) -> Result<BackupDetail, BackupStoreError> {
    let registry = DriverRegistry::with_defaults();
    InspectOrchestrator::new(&registry).inspect_backup(url)
}
