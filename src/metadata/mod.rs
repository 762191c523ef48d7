//! Volume and backup records and the loaders that read them from a driver.
//!
//! Records are JSON documents with `PascalCase` keys. Sizes are written as
//! decimal strings; plain numbers are accepted on read.

use camino::Utf8Path;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::driver::{DriverError, StoreDriver};
use crate::error::BackupStoreError;
use crate::layout;
use crate::size_text;

/// Volume record as persisted by the backup store.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Volume {
    /// Volume name, unique within the store.
    pub name: String,
    /// Storage driver that created the volume.
    pub driver: String,
    /// Volume size in bytes.
    #[serde(with = "size_text")]
    pub size: u64,
    /// Creation timestamp as recorded by the backend.
    pub created_time: String,
    /// Name of the most recent backup, empty when none exists.
    #[serde(default)]
    pub last_backup_name: String,
}

/// Backup record as persisted by the backup store.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Backup {
    /// Backup name, unique within its volume.
    pub name: String,
    /// Name of the volume this backup was taken from.
    pub volume_name: String,
    /// Name of the snapshot the backup was taken from.
    pub snapshot_name: String,
    /// Creation timestamp of the source snapshot.
    pub snapshot_created_at: String,
    /// Completion timestamp of the backup.
    pub created_time: String,
    /// Backup size in bytes.
    #[serde(with = "size_text")]
    pub size: u64,
}

/// Loads the record for `volume`.
///
/// # Errors
///
/// Returns [`BackupStoreError::VolumeNotFound`] when no record exists,
/// [`BackupStoreError::CorruptMetadata`] when it cannot be parsed or names
/// another volume, and
/// [`BackupStoreError::Connection`] when the read fails.
pub fn load_volume<D>(volume: &str, driver: &D) -> Result<Volume, BackupStoreError>
where
    D: StoreDriver + ?Sized,
{
    let path = layout::volume_config_path(volume);
    let record: Volume = read_record(driver, &path, || BackupStoreError::VolumeNotFound {
        volume: volume.to_owned(),
    })?;
    if record.name != volume {
        return Err(misplaced_record(
            &path,
            format!("record names volume {:?}", record.name),
        ));
    }
    Ok(record)
}

/// Loads the record for `backup` of `volume`.
///
/// # Errors
///
/// Returns [`BackupStoreError::BackupNotFound`] when no record exists,
/// [`BackupStoreError::CorruptMetadata`] when it cannot be parsed or does
/// not describe `backup` of `volume`, and
/// [`BackupStoreError::Connection`] when the read fails.
pub fn load_backup<D>(backup: &str, volume: &str, driver: &D) -> Result<Backup, BackupStoreError>
where
    D: StoreDriver + ?Sized,
{
    let path = layout::backup_config_path(backup, volume);
    let record: Backup = read_record(driver, &path, || BackupStoreError::BackupNotFound {
        backup: backup.to_owned(),
        volume: volume.to_owned(),
    })?;
    if record.name != backup || record.volume_name != volume {
        return Err(misplaced_record(
            &path,
            format!(
                "record names backup {:?} of volume {:?}",
                record.name, record.volume_name
            ),
        ));
    }
    Ok(record)
}

/// Lists the names of every backup recorded for `volume`.
///
/// A volume without a backups directory has no backups. Order is
/// unspecified.
///
/// # Errors
///
/// Returns [`BackupStoreError::Enumeration`] when the backend fails.
pub fn list_backup_names<D>(volume: &str, driver: &D) -> Result<Vec<String>, BackupStoreError>
where
    D: StoreDriver + ?Sized,
{
    let dir = layout::backups_dir(volume);
    let Some(entries) = list_or_missing(driver, &dir)? else {
        return Ok(Vec::new());
    };

    let names: Vec<String> = entries
        .iter()
        .filter_map(|entry| layout::backup_name_from_file(entry))
        .map(str::to_owned)
        .collect();
    debug!(volume, count = names.len(), "enumerated backups");
    Ok(names)
}

/// Lists the names of every volume in the store.
///
/// A store without a volumes directory is empty. Order is unspecified.
/// Entries that are not part of the layout are skipped: layer entries that
/// are not two hex digits, and volume entries whose name does not hash to
/// the layer they were found in.
///
/// # Errors
///
/// Returns [`BackupStoreError::Enumeration`] when the backend fails or a
/// checksum layer disappears while it is being walked.
pub fn list_volume_names<D>(driver: &D) -> Result<Vec<String>, BackupStoreError>
where
    D: StoreDriver + ?Sized,
{
    let root = layout::volumes_root();
    let Some(layer1_dirs) = list_or_missing(driver, &root)? else {
        return Ok(Vec::new());
    };

    let mut names = Vec::new();
    for layer1 in layer1_dirs.iter().filter(|entry| layout::is_layer_name(entry)) {
        let layer1_path = root.join(layer1);
        let layer2_dirs = list_required(driver, &layer1_path)?;
        for layer2 in layer2_dirs.iter().filter(|entry| layout::is_layer_name(entry)) {
            let layer2_path = layer1_path.join(layer2);
            names.extend(
                list_required(driver, &layer2_path)?
                    .into_iter()
                    .filter(|entry| layout::volume_dir(entry) == layer2_path.join(entry)),
            );
        }
    }
    debug!(count = names.len(), "enumerated volumes");
    Ok(names)
}

fn read_record<D, T, F>(driver: &D, path: &Utf8Path, not_found: F) -> Result<T, BackupStoreError>
where
    D: StoreDriver + ?Sized,
    T: DeserializeOwned,
    F: FnOnce() -> BackupStoreError,
{
    let bytes = driver.read(path).map_err(|err| match err {
        DriverError::NotFound { .. } => not_found(),
        DriverError::Io { path: at, message } => BackupStoreError::Connection {
            destination: format!("{}/{at}", driver.base_url()),
            message,
        },
    })?;
    serde_json::from_slice(&bytes).map_err(|err| BackupStoreError::CorruptMetadata {
        path: path.to_string(),
        message: err.to_string(),
    })
}

fn list_or_missing<D>(driver: &D, path: &Utf8Path) -> Result<Option<Vec<String>>, BackupStoreError>
where
    D: StoreDriver + ?Sized,
{
    match driver.list(path) {
        Ok(entries) => Ok(Some(entries)),
        Err(DriverError::NotFound { .. }) => Ok(None),
        Err(err) => Err(enumeration_error(path, &err)),
    }
}

fn list_required<D>(driver: &D, path: &Utf8Path) -> Result<Vec<String>, BackupStoreError>
where
    D: StoreDriver + ?Sized,
{
    driver.list(path).map_err(|err| enumeration_error(path, &err))
}

fn misplaced_record(path: &Utf8Path, message: String) -> BackupStoreError {
    BackupStoreError::CorruptMetadata {
        path: path.to_string(),
        message,
    }
}

fn enumeration_error(path: &Utf8Path, err: &DriverError) -> BackupStoreError {
    BackupStoreError::Enumeration {
        path: path.to_string(),
        message: err.to_string(),
    }
}
