//! Local filesystem driver rooted at a capability directory.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};

use super::{DriverError, StoreDriver};
use crate::error::BackupStoreError;

/// Scheme handled by [`VfsDriver`].
pub const VFS_SCHEME: &str = "vfs";

/// Serves a backup store laid out under a local directory.
///
/// Locators take the form `vfs:///absolute/path`. Every record access is
/// confined to the opened directory.
#[derive(Debug)]
pub struct VfsDriver {
    root: Dir,
    base_url: String,
}

impl VfsDriver {
    /// Opens the directory named by a `vfs://` locator.
    ///
    /// # Errors
    ///
    /// Returns [`BackupStoreError::UnsupportedDestination`] when the locator
    /// does not use the `vfs` scheme and [`BackupStoreError::Connection`]
    /// when the path is relative or cannot be opened.
    pub fn open(locator: &str) -> Result<Self, BackupStoreError> {
        let raw_path = locator
            .strip_prefix("vfs://")
            .ok_or_else(|| BackupStoreError::UnsupportedDestination {
                destination: locator.to_owned(),
            })?;
        let path = Utf8Path::new(raw_path);
        if !path.is_absolute() {
            return Err(BackupStoreError::Connection {
                destination: locator.to_owned(),
                message: String::from("vfs destinations require an absolute path"),
            });
        }

        let connection_error = |err: io::Error| BackupStoreError::Connection {
            destination: locator.to_owned(),
            message: err.to_string(),
        };
        let canonical: Utf8PathBuf = path.canonicalize_utf8().map_err(connection_error)?;
        let root = Dir::open_ambient_dir(&canonical, ambient_authority()).map_err(connection_error)?;

        Ok(Self {
            root,
            base_url: format!("{VFS_SCHEME}://{canonical}"),
        })
    }
}

impl StoreDriver for VfsDriver {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    fn list(&self, path: &Utf8Path) -> Result<Vec<String>, DriverError> {
        let entries = self.root.read_dir(path).map_err(|err| map_io(path, &err))?;
        let mut names = Vec::new();
        for entry in entries {
            let name = entry
                .and_then(|item| item.file_name())
                .map_err(|err| map_io(path, &err))?;
            names.push(name);
        }
        Ok(names)
    }

    fn read(&self, path: &Utf8Path) -> Result<Vec<u8>, DriverError> {
        self.root.read(path).map_err(|err| map_io(path, &err))
    }
}

fn map_io(path: &Utf8Path, err: &io::Error) -> DriverError {
    if err.kind() == io::ErrorKind::NotFound {
        DriverError::NotFound {
            path: path.to_string(),
        }
    } else {
        DriverError::Io {
            path: path.to_string(),
            message: err.to_string(),
        }
    }
}
