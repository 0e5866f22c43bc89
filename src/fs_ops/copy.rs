//! Safe copy: write into a hidden temp file beside the destination, fsync it,
//! then rename over the final name. A failed copy never leaves a truncated
//! destination file behind.

use anyhow::{anyhow, Result};
use std::fs::{self, File};
use std::path::Path;

use super::atomic::rename_replace;
use super::helpers::io_error_with_help;
use super::util::unique_temp_path;

pub fn safe_copy_and_rename(src: &Path, dest: &Path) -> Result<()> {
    let dest_dir = dest
        .parent()
        .ok_or_else(|| anyhow!("destination has no parent: {}", dest.display()))?;
    let file_name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".into());
    let tmp = unique_temp_path(dest_dir, &file_name);

    let result = (|| -> Result<()> {
        fs::copy(src, &tmp).map_err(io_error_with_help("copy to temporary file", &tmp))?;
        File::open(&tmp)
            .and_then(|f| f.sync_all())
            .map_err(io_error_with_help("sync temporary file", &tmp))?;
        rename_replace(&tmp, dest).map_err(io_error_with_help("rename into place", dest))?;
        Ok(())
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}
