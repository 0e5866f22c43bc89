//! Rename helper.
//! - Windows: clears an existing destination first (rename does not overwrite there).
//! - Unix: best-effort fsync of the destination directory afterwards.

use std::fs;
use std::io;
use std::path::Path;

pub(super) fn rename_replace(src: &Path, dst: &Path) -> io::Result<()> {
    #[cfg(windows)]
    if dst.exists() {
        match fs::remove_file(dst) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }

    fs::rename(src, dst)?;

    #[cfg(unix)]
    if let Some(parent) = dst.parent() {
        // A failed fsync does not undo a completed rename.
        let _ = super::util::fsync_dir(parent);
    }
    Ok(())
}
