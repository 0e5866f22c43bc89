//! Status file reader.
//! `hstat.d` is whitespace-separated text; a scalar is the token that follows
//! its key (e.g. `i3dbout= 40`).

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::errors::CustodyError;

/// Name of the run status file inside a data directory.
pub const STATUS_FILE: &str = "hstat.d";
/// Key holding the number of output cycles written by the run.
pub const NCYC_KEY: &str = "i3dbout=";

/// Integer that follows the first occurrence of `key` in `file`.
pub fn read_scalar_field(file: &Path, key: &str) -> Result<i64> {
    let text = fs::read_to_string(file).with_context(|| format!("Unable to open the file \"{}\"", file.display()))?;
    let missing = || CustodyError::StatusFieldMissing {
        file: file.to_path_buf(),
        key: key.to_string(),
    };
    let mut words = text.split_whitespace();
    words.find(|w| *w == key).ok_or_else(missing)?;
    let value = words.next().ok_or_else(missing)?;
    value
        .parse::<i64>()
        .with_context(|| format!("Value \"{value}\" for \"{key}\" in {} is not an integer", file.display()))
}

/// Number of cycles (Ncyc) recorded in `<data_dir>/hstat.d`.
pub fn read_ncyc(data_dir: &Path) -> Result<u32> {
    let file = data_dir.join(STATUS_FILE);
    let n = read_scalar_field(&file, NCYC_KEY)?;
    u32::try_from(n).with_context(|| format!("Negative cycle count {n} in {}", file.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_value_after_key() {
        let td = tempdir().unwrap();
        fs::write(td.path().join(STATUS_FILE), "nx= 64 ny= 32\n i3dbout= 40 i3dbout= 7\n").unwrap();
        assert_eq!(read_ncyc(td.path()).unwrap(), 40);
    }

    #[test]
    fn missing_key_is_typed_error() {
        let td = tempdir().unwrap();
        let f = td.path().join(STATUS_FILE);
        fs::write(&f, "nx= 64\n").unwrap();
        let err = read_scalar_field(&f, NCYC_KEY).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CustodyError>(),
            Some(CustodyError::StatusFieldMissing { .. })
        ));
    }

    #[test]
    fn key_at_end_of_file_is_missing() {
        let td = tempdir().unwrap();
        let f = td.path().join(STATUS_FILE);
        fs::write(&f, "i3dbout=").unwrap();
        assert!(read_scalar_field(&f, NCYC_KEY).is_err());
    }
}
