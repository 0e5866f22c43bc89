//! Platform-specific helpers for the config template and the log file.
//! Unix gets owner-only permissions and a symlink-safe atomic write; other
//! platforms fall back to plain std behavior.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{open_log_file_secure_append, set_dir_mode_0700, write_config_secure_new_0600};

#[cfg(not(unix))]
pub use windows::{open_log_file_secure_append, set_dir_mode_0700, write_config_secure_new_0600};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Hidden sibling name for an atomic write of `target`.
/// Pattern: .hym_custody.config.tmp.<pid>.<nanos>.<seq>
fn tmp_sibling_name(target: &Path) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos()).unwrap_or(0);
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    target
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!(".hym_custody.config.tmp.{pid}.{nanos}.{seq}"))
}
