use crate::{Result, StorageError};

/// Check that `key` names a single entry inside its store
///
/// Rejects empty keys, `.` and `..`, and anything containing a path
/// separator or NUL byte.
pub fn validate_key(key: &str) -> Result<&str> {
    let escapes = key.is_empty() || key == "." || key == ".." || key.contains(['/', '\\', '\0']);

    if escapes {
        return Err(StorageError::InvalidKey(key.to_owned()));
    }

    Ok(key)
}
