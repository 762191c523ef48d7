//! Temporary on-disk backup stores laid out the way the `vfs` driver reads them.

use backupstore::layout;
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use tempfile::TempDir;

/// Backup store rooted in a temporary directory that is removed on drop.
pub struct VfsStore {
    _temp: TempDir,
    root: Utf8PathBuf,
    dir: Dir,
}

impl VfsStore {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("create tempdir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf())
            .expect("tempdir path is utf8")
            .canonicalize_utf8()
            .expect("canonical tempdir");
        let dir = Dir::open_ambient_dir(&root, ambient_authority()).expect("open tempdir");
        Self {
            _temp: temp,
            root,
            dir,
        }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Destination locator naming this store.
    pub fn locator(&self) -> String {
        format!("vfs://{}", self.root)
    }

    pub fn add_volume(&self, name: &str, driver: &str) -> &Self {
        let record = format!(
            r#"{{"Name":"{name}","Driver":"{driver}","Size":"2147483648","CreatedTime":"2024-03-01T10:00:00Z","LastBackupName":""}}"#
        );
        self.write(&layout::volume_config_path(name), &record);
        self
    }

    pub fn add_backup(&self, name: &str, volume: &str) -> &Self {
        let record = format!(
            r#"{{"Name":"{name}","VolumeName":"{volume}","SnapshotName":"snap-{name}","SnapshotCreatedAt":"2024-03-02T10:00:00Z","CreatedTime":"2024-03-02T10:05:00Z","Size":"1048576"}}"#
        );
        self.write(&layout::backup_config_path(name, volume), &record);
        self
    }

    pub fn write(&self, path: &Utf8Path, contents: &str) {
        if let Some(parent) = path.parent() {
            self.dir.create_dir_all(parent).expect("create parent dirs");
        }
        self.dir.write(path, contents).expect("write record");
    }
}
