//! Backup URL codec.
//!
//! A backup URL locates one backup without a central index by appending the
//! backup and volume names to the destination's base URL:
//!
//! ```text
//! vfs:///srv/backups?backup=backup-1&volume=vol1
//! ```
//!
//! The query is `application/x-www-form-urlencoded`, so encoding is injective
//! for any pair of names. Decoding accepts only the exact form produced by
//! [`encode`] and names that pass the naming policy.

use url::form_urlencoded;

use crate::driver::scheme_of;
use crate::error::BackupStoreError;
use crate::name::is_valid_name;

const BACKUP_KEY: &str = "backup";
const VOLUME_KEY: &str = "volume";

/// A decoded backup URL.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BackupRef {
    /// Destination locator embedded in the URL.
    pub destination: String,
    /// Name of the backup.
    pub backup: String,
    /// Name of the volume owning the backup.
    pub volume: String,
}

impl BackupRef {
    /// Fails when the URL was issued for a destination other than
    /// `expected`. Trailing slashes are not significant.
    ///
    /// # Errors
    ///
    /// Returns [`BackupStoreError::DestinationMismatch`] on mismatch.
    pub fn ensure_destination(&self, expected: &str) -> Result<(), BackupStoreError> {
        if trim_destination(&self.destination) == trim_destination(expected) {
            Ok(())
        } else {
            Err(BackupStoreError::DestinationMismatch {
                expected: expected.to_owned(),
                found: self.destination.clone(),
            })
        }
    }
}

/// Encodes the URL of `backup` of `volume` stored at `destination`.
#[must_use]
pub fn encode(backup: &str, volume: &str, destination: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair(BACKUP_KEY, backup)
        .append_pair(VOLUME_KEY, volume)
        .finish();
    format!("{destination}?{query}")
}

/// Decodes a backup URL into its destination, backup and volume names.
///
/// # Errors
///
/// Returns [`BackupStoreError::MalformedUrl`] when `url` was not produced by
/// [`encode`] or carries names that fail the naming policy.
pub fn decode(url: &str) -> Result<BackupRef, BackupStoreError> {
    let (destination, query) = url
        .rsplit_once('?')
        .ok_or_else(|| BackupStoreError::malformed_url(url, "missing query"))?;
    if scheme_of(destination).is_none() {
        return Err(BackupStoreError::malformed_url(
            url,
            "destination has no scheme",
        ));
    }

    let mut backup_value = None;
    let mut volume_value = None;
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let slot = match key.as_ref() {
            BACKUP_KEY => &mut backup_value,
            VOLUME_KEY => &mut volume_value,
            _ => return Err(BackupStoreError::malformed_url(url, "unexpected query key")),
        };
        if slot.is_some() {
            return Err(BackupStoreError::malformed_url(url, "duplicate query key"));
        }
        *slot = Some(value.into_owned());
    }

    let backup = backup_value
        .ok_or_else(|| BackupStoreError::malformed_url(url, "missing backup"))?;
    let volume = volume_value
        .ok_or_else(|| BackupStoreError::malformed_url(url, "missing volume"))?;
    if !is_valid_name(&backup) || !is_valid_name(&volume) {
        return Err(BackupStoreError::malformed_url(
            url,
            "backup or volume name fails the naming policy",
        ));
    }
    if encode(&backup, &volume, destination) != url {
        return Err(BackupStoreError::malformed_url(url, "not in canonical form"));
    }

    Ok(BackupRef {
        destination: destination.to_owned(),
        backup,
        volume,
    })
}

/// Decodes a backup URL that must belong to `destination`.
///
/// # Errors
///
/// Returns [`BackupStoreError::MalformedUrl`] as [`decode`] does and
/// [`BackupStoreError::DestinationMismatch`] when the URL names another
/// destination.
pub fn decode_for(url: &str, destination: &str) -> Result<BackupRef, BackupStoreError> {
    let backup_ref = decode(url)?;
    backup_ref.ensure_destination(destination)?;
    Ok(backup_ref)
}

fn trim_destination(destination: &str) -> &str {
    let trimmed = destination.trim_end_matches('/');
    if trimmed.ends_with(':') {
        // keep `vfs:///` distinct from `vfs:`
        destination
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const DEST: &str = "vfs:///srv/backups";

    #[rstest]
    fn encode_appends_names_to_destination() {
        assert_eq!(
            encode("backup-1", "vol1", DEST),
            "vfs:///srv/backups?backup=backup-1&volume=vol1"
        );
    }

    #[rstest]
    #[case("backup-1", "vol1")]
    #[case("b.2_x", "pvc-0f3a")]
    fn decode_reverses_encode(#[case] backup: &str, #[case] volume: &str) {
        let decoded = decode(&encode(backup, volume, DEST)).expect("url should decode");

        assert_eq!(decoded.backup, backup);
        assert_eq!(decoded.volume, volume);
        assert_eq!(decoded.destination, DEST);
    }

    #[rstest]
    fn encode_escapes_query_metacharacters() {
        let first = encode("a&volume=b", "c", DEST);
        let second = encode("a", "b&volume=c", DEST);

        assert_ne!(first, second);
        assert_eq!(first, "vfs:///srv/backups?backup=a%26volume%3Db&volume=c");
    }

    #[rstest]
    fn encode_uses_form_encoding_for_spaces() {
        assert_eq!(
            encode("a b", "c/d", DEST),
            "vfs:///srv/backups?backup=a+b&volume=c%2Fd"
        );
    }

    #[rstest]
    #[case("")]
    #[case("vfs:///srv/backups")]
    #[case("/srv/backups?backup=b1&volume=vol1")]
    #[case("vfs:///srv/backups?volume=vol1&backup=b1")]
    #[case("vfs:///srv/backups?backup=b1")]
    #[case("vfs:///srv/backups?backup=b1&volume=vol1&extra=1")]
    #[case("vfs:///srv/backups?backup=b1&backup=b2")]
    #[case("vfs:///srv/backups?backup=b1&volume")]
    #[case("vfs:///srv/backups?backup=b%2&volume=vol1")]
    #[case("vfs:///srv/backups?backup=-b1&volume=vol1")]
    #[case("vfs:///srv/backups?backup=b%31&volume=vol1")]
    #[case("vfs:///srv/backups?backup=b+1&volume=vol1")]
    #[case("vfs:///srv/backups?backup=%62%31&volume=vol1")]
    fn decode_rejects_foreign_strings(#[case] url: &str) {
        let err = decode(url).expect_err("url should be rejected");

        assert!(
            matches!(err, BackupStoreError::MalformedUrl { .. }),
            "unexpected error: {err}"
        );
    }

    #[rstest]
    #[case(DEST)]
    #[case("vfs:///srv/backups/")]
    fn decode_for_accepts_same_destination(#[case] destination: &str) {
        let url = encode("b1", "vol1", DEST);

        let decoded = decode_for(&url, destination).expect("destination should match");
        assert_eq!((decoded.backup.as_str(), decoded.volume.as_str()), ("b1", "vol1"));
    }

    #[rstest]
    fn decode_for_rejects_other_destination() {
        let url = encode("b1", "vol1", DEST);

        let err = decode_for(&url, "vfs:///srv/other").expect_err("should mismatch");
        assert_eq!(
            err,
            BackupStoreError::DestinationMismatch {
                expected: String::from("vfs:///srv/other"),
                found: String::from(DEST),
            }
        );
    }
}
