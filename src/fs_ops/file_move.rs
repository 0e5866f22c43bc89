//! File move: rename when possible, safe copy + remove across filesystems.
//! Staging and archive frequently live on different mounts (scratch vs home),
//! so the fallback is the common path on clusters.

use anyhow::Result;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use super::atomic::rename_replace;
use super::copy::safe_copy_and_rename;
use super::helpers::io_error_with_help;
use super::util::is_cross_device;

/// Move `src` to `dest`, replacing an existing destination file.
pub fn move_file(src: &Path, dest: &Path) -> Result<()> {
    match rename_replace(src, dest) {
        Ok(()) => {
            debug!(src = %src.display(), dest = %dest.display(), "renamed");
            Ok(())
        }
        Err(e) if is_cross_device(&e) => {
            debug!(src = %src.display(), "cross-device rename; copying instead");
            safe_copy_and_rename(src, dest)?;
            fs::remove_file(src).map_err(io_error_with_help("remove original file", src))?;
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(io_error_with_help("move file", src)(e))
        }
        Err(e) => {
            warn!(error = %e, src = %src.display(), "rename failed, using copy + remove");
            safe_copy_and_rename(src, dest)?;
            fs::remove_file(src).map_err(io_error_with_help("remove original file", src))?;
            Ok(())
        }
    }
}
