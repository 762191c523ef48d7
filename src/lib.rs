//! Core library for the `backupstore` listing and inspection tool.
//!
//! The crate reconstructs a queryable view of a backup store from the
//! primitive enumerate/read operations of a storage driver: which volumes
//! exist, which backups belong to each, and the full provenance of a single
//! backup identified by its backup URL. It never writes to the store.

pub mod backup_url;
pub mod config;
pub mod driver;
pub mod error;
pub mod info;
pub mod inspect;
pub mod layout;
pub mod list;
pub mod metadata;
pub mod name;
mod size_text;
pub mod test_support;

pub use backup_url::BackupRef;
pub use config::{ConfigError, StoreConfig};
pub use driver::{DriverError, DriverRegistry, StoreDriver, VfsDriver};
pub use error::BackupStoreError;
pub use info::{BackupDetail, BackupInfo, BackupSummary, VolumeInfo, VolumeProvenance};
pub use inspect::{InspectOrchestrator, inspect_backup};
pub use list::{ListOrchestrator, VolumeListing, list};
pub use metadata::{Backup, Volume};
