//! I/O error enrichment.
//!
//! Wraps io::Error with the operation, the path, and a short platform-aware
//! hint so per-file failures in a transfer report are actionable on their own.
//!
//! Usage:
//!   fs::rename(a, b).map_err(io_error_with_help("move file", a))?;

use anyhow::anyhow;
use std::io;
use std::path::Path;

/// Hint keyed on the raw OS error code, if we recognise it.
#[cfg(unix)]
fn os_hint(code: i32) -> Option<&'static str> {
    let hint = match code {
        libc::EACCES | libc::EPERM => "permission denied; check ownership and write permissions",
        libc::EXDEV => "cross-filesystem; rename not possible",
        libc::ENOENT => "path not found; verify it exists",
        libc::EEXIST => "already exists",
        libc::ENOSPC => "insufficient space on device",
        libc::EDQUOT => "disk quota exceeded",
        libc::EROFS => "read-only filesystem; cannot write here",
        libc::EISDIR => "is a directory, expected a file",
        libc::ENAMETOOLONG => "filename or path too long",
        _ => return None,
    };
    Some(hint)
}

#[cfg(windows)]
fn os_hint(code: i32) -> Option<&'static str> {
    let hint = match code {
        5 => "access denied; check permissions",
        17 => "not same device; rename not possible",
        32 => "sharing violation; file is in use",
        2 | 3 => "path not found; verify it exists",
        112 => "insufficient disk space",
        _ => return None,
    };
    Some(hint)
}

fn kind_hint(kind: io::ErrorKind) -> Option<&'static str> {
    match kind {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions"),
        io::ErrorKind::NotFound => Some("path not found; verify it exists"),
        io::ErrorKind::AlreadyExists => Some("already exists"),
        _ => None,
    }
}

fn build_message(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    match e.raw_os_error() {
        Some(code) => {
            if let Some(h) = os_hint(code) {
                msg.push_str(" (");
                msg.push_str(h);
                msg.push(')');
            }
            msg.push_str(&format!(" [os code: {code}]"));
        }
        None => {
            if let Some(h) = kind_hint(e.kind()) {
                msg.push_str(" (");
                msg.push_str(h);
                msg.push(')');
            }
        }
    }
    msg
}

/// `.map_err` adapter for anyhow code paths.
pub fn io_error_with_help<'a>(op: &'a str, path: &'a Path) -> impl FnOnce(io::Error) -> anyhow::Error + 'a {
    move |e: io::Error| anyhow!(build_message(op, path, &e))
}

/// `.map_err` adapter for io::Result code paths; keeps the ErrorKind.
pub fn io_error_with_help_io<'a>(op: &'a str, path: &'a Path) -> impl FnOnce(io::Error) -> io::Error + 'a {
    move |e: io::Error| io::Error::new(e.kind(), build_message(op, path, &e))
}
