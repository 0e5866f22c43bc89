//! Core configuration types.
//! - Config holds runtime settings with defaults matching the HYM tree layout.
//! - LogLevel represents verbosity with simple parsing helpers.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::paths;
use super::{
    DATA_FLAGS_DEFAULT, DATA_SUBDIR_DEFAULT, PROBE_EXE_DEFAULT, PROBE_SUBDIR_DEFAULT, SILO_EXE_DEFAULT,
    SILO_SUBDIR_DEFAULT,
};
use crate::dataset::RunLayout;
use crate::fields::{CycleSelector, FieldMask};
use crate::pipeline::PipelinePaths;
use crate::runner::ProcessRunner;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Case-insensitive; accepts a few common aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        })
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Active code directory the simulation writes into.
    pub code_path: Option<PathBuf>,
    /// Run archive directory.
    pub run_path: Option<PathBuf>,
    pub data_subdir: String,
    pub silo_subdir: String,
    pub probe_subdir: String,
    pub silo_exe: PathBuf,
    pub probe_exe: PathBuf,
    /// Default field mask for conversion.
    pub data_flags: FieldMask,
    /// Default cycle selector (0 = all).
    pub cycle: u32,
    /// Default probe array rotation, degrees.
    pub phi_rot: f64,
    pub log_level: LogLevel,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            code_path: None,
            run_path: None,
            data_subdir: DATA_SUBDIR_DEFAULT.into(),
            silo_subdir: SILO_SUBDIR_DEFAULT.into(),
            probe_subdir: PROBE_SUBDIR_DEFAULT.into(),
            silo_exe: SILO_EXE_DEFAULT.into(),
            probe_exe: PROBE_EXE_DEFAULT.into(),
            data_flags: DATA_FLAGS_DEFAULT.parse().unwrap_or_default(),
            cycle: 0,
            phi_rot: 0.0,
            log_level: LogLevel::Normal,
            log_file: paths::default_log_path(),
        }
    }
}

impl Config {
    /// Code and run directories; errors when either is unset.
    pub fn layout(&self) -> anyhow::Result<RunLayout> {
        let code = self
            .code_path
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("code_path is not configured (set <code_path> or --code-path)"))?;
        let run = self
            .run_path
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("run_path is not configured (set <run_path> or --run-path)"))?;
        Ok(RunLayout::new(code, run, &self.data_subdir))
    }

    pub fn pipeline_paths(&self) -> anyhow::Result<PipelinePaths> {
        let layout = self.layout()?;
        let run = layout.run_dir.path.clone();
        Ok(PipelinePaths::new(layout, run.join(&self.silo_subdir), run.join(&self.probe_subdir)))
    }

    pub fn runner(&self) -> ProcessRunner {
        ProcessRunner::new(&self.silo_exe, &self.probe_exe)
    }

    pub fn default_cycle(&self) -> CycleSelector {
        CycleSelector::from_arg(self.cycle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_aliases() {
        assert_eq!(LogLevel::parse("TRACE"), Some(LogLevel::Debug));
        assert_eq!("verbose".parse::<LogLevel>(), Ok(LogLevel::Info));
        assert!("loud".parse::<LogLevel>().is_err());
        assert_eq!(LogLevel::Quiet.to_string(), "quiet");
    }

    #[test]
    fn pipeline_paths_hang_off_run_dir() {
        let cfg = Config {
            code_path: Some("/code".into()),
            run_path: Some("/runs/r1".into()),
            ..Default::default()
        };
        let p = cfg.pipeline_paths().unwrap();
        assert_eq!(p.layout.data_dir.path, PathBuf::from("/runs/r1/HYM_Data"));
        assert_eq!(p.silo_dir.path, PathBuf::from("/runs/r1/SILO_Data"));
        assert_eq!(p.probe_dir.path, PathBuf::from("/runs/r1/Probe_Data"));
        assert_eq!(cfg.silo_exe, PathBuf::from("./HYM_SILO.exe"));
    }

    #[test]
    fn layout_requires_both_paths() {
        let cfg = Config {
            run_path: Some("/runs/r1".into()),
            ..Default::default()
        };
        assert!(cfg.layout().unwrap_err().to_string().contains("code_path"));
    }
}
