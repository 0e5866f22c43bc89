//! Config validation: directory layout sanity before any file is touched.

use anyhow::{Result, bail};
use std::path::{Component, Path};
use tracing::{error, info};

use super::types::Config;

impl Config {
    /// Subdirectory names must be single path components, and the code and run
    /// directories must not resolve to the same place.
    pub fn validate(&self) -> Result<()> {
        ensure_single_component(&self.data_subdir, "data_subdir")?;
        ensure_single_component(&self.silo_subdir, "silo_subdir")?;
        ensure_single_component(&self.probe_subdir, "probe_subdir")?;

        if let (Some(code), Some(run)) = (&self.code_path, &self.run_path) {
            let code_real = dunce::canonicalize(code).unwrap_or_else(|_| code.clone());
            let run_real = dunce::canonicalize(run).unwrap_or_else(|_| run.clone());
            if code_real == run_real {
                error!("code_path and run_path resolve to the same path: {}", code_real.display());
                bail!(
                    "code_path and run_path resolve to the same path: '{}'",
                    code_real.display()
                );
            }
            info!(
                "Config validated: code='{}' run='{}' data='{}'",
                code.display(),
                run.display(),
                self.data_subdir
            );
        }
        Ok(())
    }
}

fn ensure_single_component(name: &str, key: &str) -> Result<()> {
    let mut comps = Path::new(name).components();
    match (comps.next(), comps.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => {
            error!("{key} must be a plain directory name: '{name}'");
            bail!("{key} must be a plain directory name, got '{name}'")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn same_code_and_run_path_rejected() {
        let td = tempdir().unwrap();
        let cfg = Config {
            code_path: Some(td.path().to_path_buf()),
            run_path: Some(td.path().join(".")),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn subdir_must_be_plain_name() {
        let cfg = Config {
            data_subdir: "../HYM_Data".into(),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
        Config::default().validate().unwrap();
    }
}
