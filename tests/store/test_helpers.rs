//! Shared fixtures and helpers for backup store BDD scenarios.

use backupstore::test_support::MemoryDriver;
use backupstore::{Backup, BackupDetail, BackupStoreError, Volume, VolumeListing};
use rstest::fixture;

#[derive(Clone, Debug)]
pub enum Outcome<T> {
    Success(T),
    Failure(BackupStoreError),
}

impl<T> From<Result<T, BackupStoreError>> for Outcome<T> {
    fn from(value: Result<T, BackupStoreError>) -> Self {
        match value {
            Ok(success) => Self::Success(success),
            Err(err) => Self::Failure(err),
        }
    }
}

#[derive(Clone, Debug)]
pub struct StoreContext {
    pub store: MemoryDriver,
    pub listing: Option<Outcome<VolumeListing>>,
    pub inspection: Option<Outcome<BackupDetail>>,
}

#[fixture]
pub fn store_context() -> StoreContext {
    StoreContext {
        store: MemoryDriver::new(),
        listing: None,
        inspection: None,
    }
}

pub fn volume_record(name: &str, driver: &str) -> Volume {
    Volume {
        name: name.to_owned(),
        driver: driver.to_owned(),
        size: 2_147_483_648,
        created_time: String::from("2024-03-01T10:00:00Z"),
        last_backup_name: String::new(),
    }
}

pub fn backup_record(name: &str, volume: &str) -> Backup {
    Backup {
        name: name.to_owned(),
        volume_name: volume.to_owned(),
        snapshot_name: format!("snap-{name}"),
        snapshot_created_at: String::from("2024-03-02T10:00:00Z"),
        created_time: String::from("2024-03-02T10:05:00Z"),
        size: 1024,
    }
}

/// Returns the variant name used by feature files to name an error.
pub const fn error_kind(err: &BackupStoreError) -> &'static str {
    match err {
        BackupStoreError::InvalidName { .. } => "InvalidName",
        BackupStoreError::UnsupportedDestination { .. } => "UnsupportedDestination",
        BackupStoreError::Connection { .. } => "Connection",
        BackupStoreError::VolumeNotFound { .. } => "VolumeNotFound",
        BackupStoreError::BackupNotFound { .. } => "BackupNotFound",
        BackupStoreError::CorruptMetadata { .. } => "CorruptMetadata",
        BackupStoreError::Enumeration { .. } => "Enumeration",
        BackupStoreError::DriverMismatch { .. } => "DriverMismatch",
        BackupStoreError::MalformedUrl { .. } => "MalformedUrl",
        BackupStoreError::DestinationMismatch { .. } => "DestinationMismatch",
    }
}
