//! Object layout of a backup store.
//!
//! Volumes are spread over two directory layers derived from the SHA-512 of
//! their name so that no single prefix grows unbounded:
//!
//! ```text
//! backupstore/volumes/<l1>/<l2>/<volume>/volume.cfg
//! backupstore/volumes/<l1>/<l2>/<volume>/backups/backup_<backup>.cfg
//! ```

use camino::Utf8PathBuf;
use sha2::{Digest, Sha512};

/// Top-level directory holding all backup store metadata.
pub const STORE_BASE: &str = "backupstore";
/// Directory under [`STORE_BASE`] containing the volume layers.
pub const VOLUME_DIRECTORY: &str = "volumes";
/// File name of a volume record.
pub const VOLUME_CONFIG_FILE: &str = "volume.cfg";
/// Directory under a volume containing backup records.
pub const BACKUP_DIRECTORY: &str = "backups";
/// Prefix of every backup record file name.
pub const BACKUP_CONFIG_PREFIX: &str = "backup_";
/// Suffix of every record file name.
pub const CONFIG_SUFFIX: &str = ".cfg";

const LAYER1_WIDTH: usize = 2;
const LAYER2_WIDTH: usize = 2;

/// Returns the root of the volume layers.
#[must_use]
pub fn volumes_root() -> Utf8PathBuf {
    Utf8PathBuf::from(STORE_BASE).join(VOLUME_DIRECTORY)
}

/// Returns the directory holding everything recorded for `volume`.
#[must_use]
pub fn volume_dir(volume: &str) -> Utf8PathBuf {
    let checksum = hex::encode(Sha512::digest(volume.as_bytes()));
    let (layer1, rest) = checksum.split_at(LAYER1_WIDTH);
    let (layer2, _) = rest.split_at(LAYER2_WIDTH);
    volumes_root().join(layer1).join(layer2).join(volume)
}

/// Returns whether `entry` can name a checksum layer directory.
///
/// Layers are always two lower-case hex digits, so anything else found next
/// to them (a stray README, an editor backup) is not part of the layout.
#[must_use]
pub fn is_layer_name(entry: &str) -> bool {
    entry.len() == LAYER1_WIDTH
        && entry
            .bytes()
            .all(|byte| byte.is_ascii_digit() || (b'a'..=b'f').contains(&byte))
}

/// Returns the path of the record describing `volume`.
#[must_use]
pub fn volume_config_path(volume: &str) -> Utf8PathBuf {
    volume_dir(volume).join(VOLUME_CONFIG_FILE)
}

/// Returns the directory holding the backup records of `volume`.
#[must_use]
pub fn backups_dir(volume: &str) -> Utf8PathBuf {
    volume_dir(volume).join(BACKUP_DIRECTORY)
}

/// Returns the path of the record describing `backup` of `volume`.
#[must_use]
pub fn backup_config_path(backup: &str, volume: &str) -> Utf8PathBuf {
    backups_dir(volume).join(backup_file_name(backup))
}

/// Returns the record file name used for `backup`.
#[must_use]
pub fn backup_file_name(backup: &str) -> String {
    format!("{BACKUP_CONFIG_PREFIX}{backup}{CONFIG_SUFFIX}")
}

/// Extracts the backup name from a record file name, ignoring entries that do
/// not follow the `backup_<name>.cfg` shape.
#[must_use]
pub fn backup_name_from_file(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix(BACKUP_CONFIG_PREFIX)?
        .strip_suffix(CONFIG_SUFFIX)
        .filter(|name| !name.is_empty())
}
