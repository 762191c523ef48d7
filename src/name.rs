//! Naming policy shared by volumes and backups.

/// Returns `true` when `name` is acceptable as a volume or backup name.
///
/// Names start with an ASCII letter or digit, are at least two characters
/// long, and otherwise contain only ASCII letters, digits, `_`, `.` and `-`.
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphanumeric() {
        return false;
    }

    let mut rest = chars.peekable();
    if rest.peek().is_none() {
        return false;
    }
    rest.all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-'))
}
