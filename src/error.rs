//! Error type shared by the listing and inspection paths.

use thiserror::Error;

/// Errors raised while resolving drivers, decoding backup URLs, or loading
/// metadata from a backup store.
///
/// Every failure aborts the current call unchanged; nothing is retried.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum BackupStoreError {
    /// Raised when a volume or backup name fails the naming policy.
    #[error("invalid name {name:?}: names must be at least two characters of [A-Za-z0-9_.-] starting with a letter or digit")]
    InvalidName {
        /// Name that was rejected.
        name: String,
    },
    /// Raised when no driver is registered for the destination scheme.
    #[error("destination {destination} is not supported: no driver registered for its scheme")]
    UnsupportedDestination {
        /// Destination locator supplied by the caller.
        destination: String,
    },
    /// Raised when a backend session cannot be established or a read fails.
    #[error("failed to reach {destination}: {message}")]
    Connection {
        /// Destination or object path being accessed.
        destination: String,
        /// Underlying failure description.
        message: String,
    },
    /// Raised when no record exists for a volume.
    #[error("volume {volume} not found in backup store")]
    VolumeNotFound {
        /// Requested volume name.
        volume: String,
    },
    /// Raised when no record exists for a backup of a volume.
    #[error("backup {backup} of volume {volume} not found in backup store")]
    BackupNotFound {
        /// Requested backup name.
        backup: String,
        /// Volume the backup was expected to belong to.
        volume: String,
    },
    /// Raised when a metadata record cannot be parsed.
    #[error("corrupt metadata at {path}: {message}")]
    CorruptMetadata {
        /// Record path relative to the destination.
        path: String,
        /// Parser error message.
        message: String,
    },
    /// Raised when the backend fails to enumerate a prefix.
    #[error("failed to enumerate {path}: {message}")]
    Enumeration {
        /// Prefix being listed.
        path: String,
        /// Underlying failure description.
        message: String,
    },
    /// Raised when a volume was created by a different storage driver.
    #[error("volume {volume} belongs to driver {found}, not {expected}")]
    DriverMismatch {
        /// Volume whose owner did not match.
        volume: String,
        /// Driver recorded in the volume metadata.
        found: String,
        /// Driver the caller expected.
        expected: String,
    },
    /// Raised when a backup URL does not follow the locator grammar.
    #[error("malformed backup URL {url:?}: {reason}")]
    MalformedUrl {
        /// URL as supplied by the caller.
        url: String,
        /// Which part of the grammar was violated.
        reason: String,
    },
    /// Raised when a backup URL points at another destination.
    #[error("backup URL targets destination {found}, expected {expected}")]
    DestinationMismatch {
        /// Destination the caller expected.
        expected: String,
        /// Destination embedded in the URL.
        found: String,
    },
}

impl BackupStoreError {
    pub(crate) fn malformed_url(url: &str, reason: &str) -> Self {
        Self::MalformedUrl {
            url: url.to_owned(),
            reason: reason.to_owned(),
        }
    }
}
