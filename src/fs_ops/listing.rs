//! Flat directory listing (immediate entries only, names only).

use std::collections::BTreeSet;
use std::path::Path;
use walkdir::WalkDir;

use crate::errors::CustodyError;

/// Names of the non-directory entries directly inside `dir`.
pub fn list_file_names(dir: &Path) -> Result<BTreeSet<String>, CustodyError> {
    let mut names = BTreeSet::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| CustodyError::ListDirectory {
            path: dir.to_path_buf(),
            source: e.into_io_error().unwrap_or_else(|| std::io::Error::other("directory walk failed")),
        })?;
        if entry.file_type().is_dir() {
            continue;
        }
        names.insert(entry.file_name().to_string_lossy().into_owned());
    }
    Ok(names)
}
