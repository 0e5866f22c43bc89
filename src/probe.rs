//! Directory probe: existence checks and on-demand creation.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::CustodyError;
use crate::output as out;

/// A directory plus the role it plays, used in every diagnostic about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRef {
    pub path: PathBuf,
    pub role: String,
}

impl DirectoryRef {
    pub fn new(path: impl Into<PathBuf>, role: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            role: role.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

/// Return whether `dir` exists. When not silent, a missing directory is
/// reported with its role and path.
pub fn exists(dir: &DirectoryRef, silent: bool) -> bool {
    if dir.path.is_dir() {
        return true;
    }
    debug!(role = %dir.role, path = %dir.path.display(), "directory not found");
    if !silent {
        out::print_detail(&format!("The {} was NOT FOUND.", dir.role));
        out::print_detail(&format!("Path: {}", dir.path.display()));
    }
    false
}

/// Hard precondition: fail with `MissingDirectory` when absent.
pub fn require_exists(dir: &DirectoryRef) -> Result<(), CustodyError> {
    if dir.path.is_dir() {
        Ok(())
    } else {
        Err(CustodyError::MissingDirectory {
            role: dir.role.clone(),
            path: dir.path.clone(),
        })
    }
}

/// Create `dir` if it does not exist yet. Existing directories are left alone
/// without any output. Returns true when the directory was created.
pub fn ensure_exists(dir: &DirectoryRef, silent: bool) -> Result<bool, CustodyError> {
    if dir.path.is_dir() {
        return Ok(false);
    }
    fs::create_dir(&dir.path).map_err(|source| CustodyError::CreateDirectory {
        role: dir.role.clone(),
        path: dir.path.clone(),
        source,
    })?;
    info!(role = %dir.role, path = %dir.path.display(), "Created directory");
    if !silent {
        out::print_detail(&format!("The {} was created.", dir.role));
        out::print_detail(&format!("Path: {}", dir.path.display()));
    }
    Ok(true)
}
