//! External views of volume and backup records.
//!
//! List results carry [`BackupSummary`] values, which have no volume
//! provenance. Inspection yields a [`BackupDetail`], which always does.
//! [`BackupInfo`] holds either when a caller needs one type for both.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::backup_url;
use crate::metadata::{Backup, Volume};
use crate::size_text;

/// A volume as reported by a list call.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VolumeInfo {
    /// Volume name.
    pub name: String,
    /// Storage driver that created the volume.
    pub driver: String,
    /// Volume size in bytes.
    #[serde(with = "size_text")]
    pub size: u64,
    /// Creation timestamp.
    pub created: String,
    /// Name of the most recent backup, empty when none exists.
    pub last_backup_name: String,
    /// Backups of the volume keyed by backup URL.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub backups: BTreeMap<String, BackupSummary>,
}

/// A backup without volume provenance, as listed under its volume.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BackupSummary {
    /// Backup name.
    pub name: String,
    /// Backup URL, the external handle for this backup.
    #[serde(rename = "URL")]
    pub url: String,
    /// Name of the source snapshot.
    pub snapshot_name: String,
    /// Creation timestamp of the source snapshot.
    pub snapshot_created: String,
    /// Completion timestamp of the backup.
    pub created: String,
    /// Backup size in bytes.
    #[serde(with = "size_text")]
    pub size: u64,
}

/// Description of the volume a backup was taken from.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VolumeProvenance {
    /// Volume name.
    pub volume_name: String,
    /// Storage driver that created the volume.
    pub volume_driver: String,
    /// Volume size in bytes.
    #[serde(with = "size_text")]
    pub volume_size: u64,
    /// Volume creation timestamp.
    pub volume_created: String,
}

/// A backup together with the volume it was taken from.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BackupDetail {
    /// Fields shared with the list view.
    #[serde(flatten)]
    pub summary: BackupSummary,
    /// Volume provenance.
    #[serde(flatten)]
    pub volume: VolumeProvenance,
}

/// Either projection of a backup.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BackupInfo {
    /// List view.
    Summary(BackupSummary),
    /// Inspect view.
    Detail(BackupDetail),
}

impl BackupInfo {
    /// Fields present in both views.
    #[must_use]
    pub const fn summary(&self) -> &BackupSummary {
        match self {
            Self::Summary(summary) => summary,
            Self::Detail(detail) => &detail.summary,
        }
    }

    /// Volume provenance, present only for the inspect view.
    #[must_use]
    pub const fn provenance(&self) -> Option<&VolumeProvenance> {
        match self {
            Self::Summary(_) => None,
            Self::Detail(detail) => Some(&detail.volume),
        }
    }
}

impl From<BackupSummary> for BackupInfo {
    fn from(value: BackupSummary) -> Self {
        Self::Summary(value)
    }
}

impl From<BackupDetail> for BackupInfo {
    fn from(value: BackupDetail) -> Self {
        Self::Detail(value)
    }
}

/// Projects a volume record with an empty backup mapping.
#[must_use]
pub fn project_volume(volume: &Volume) -> VolumeInfo {
    VolumeInfo {
        name: volume.name.clone(),
        driver: volume.driver.clone(),
        size: volume.size,
        created: volume.created_time.clone(),
        last_backup_name: volume.last_backup_name.clone(),
        backups: BTreeMap::new(),
    }
}

/// Projects a backup record for the list view; the URL is derived from
/// `base_url`.
#[must_use]
pub fn project_backup(backup: &Backup, base_url: &str) -> BackupSummary {
    BackupSummary {
        name: backup.name.clone(),
        url: backup_url::encode(&backup.name, &backup.volume_name, base_url),
        snapshot_name: backup.snapshot_name.clone(),
        snapshot_created: backup.snapshot_created_at.clone(),
        created: backup.created_time.clone(),
        size: backup.size,
    }
}

/// Projects a backup record together with its volume for the inspect view.
#[must_use]
pub fn project_full_backup(backup: &Backup, volume: &Volume, base_url: &str) -> BackupDetail {
    BackupDetail {
        summary: project_backup(backup, base_url),
        volume: VolumeProvenance {
            volume_name: volume.name.clone(),
            volume_driver: volume.driver.clone(),
            volume_size: volume.size,
            volume_created: volume.created_time.clone(),
        },
    }
}
