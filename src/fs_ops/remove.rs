use std::fs;
use std::io;
use std::path::Path;

use super::helpers::io_error_with_help_io;

/// Result of an idempotent delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

/// Remove a file; an already-absent file is `NotFound`, not an error.
/// Other failures carry the path and a platform hint.
pub fn remove_file_idempotent(path: &Path) -> io::Result<RemoveOutcome> {
    match fs::remove_file(path) {
        Ok(()) => Ok(RemoveOutcome::Removed),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(RemoveOutcome::NotFound),
        Err(e) => Err(io_error_with_help_io("remove file", path)(e)),
    }
}
