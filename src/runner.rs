//! External conversion tools.
//!
//! The SILO converter and the probe extractor are opaque executables driven by
//! positional arguments. `ConversionRunner` keeps process spawning out of the
//! pipeline so it can be exercised with a fake runner.

use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

use crate::errors::CustodyError;
use crate::fields::{CycleSelector, FieldMask};

/// `<silo_exe> <data_dir> <silo_dir> <cycle> <fields>`
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertRequest {
    pub data_dir: PathBuf,
    pub silo_dir: PathBuf,
    pub cycle: CycleSelector,
    pub fields: FieldMask,
}

impl ConvertRequest {
    pub fn args(&self) -> Vec<String> {
        vec![
            self.data_dir.display().to_string(),
            self.silo_dir.display().to_string(),
            self.cycle.as_arg().to_string(),
            self.fields.to_string(),
        ]
    }
}

/// `<probe_exe> <silo_dir> <probe_dir> <cycle> <phi_rot>`
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeRequest {
    pub silo_dir: PathBuf,
    pub probe_dir: PathBuf,
    pub cycle: CycleSelector,
    /// Rotation of the synthetic probe array, degrees.
    pub phi_rot: f64,
}

impl ProbeRequest {
    pub fn args(&self) -> Vec<String> {
        vec![
            self.silo_dir.display().to_string(),
            self.probe_dir.display().to_string(),
            self.cycle.as_arg().to_string(),
            format!("{:.6}", self.phi_rot),
        ]
    }
}

/// Exit status and captured output of one tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    pub success: bool,
    /// None when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutcome {
    /// Turn an unsuccessful exit into `CollaboratorFailed`.
    pub fn ensure_success(self, tool: &str) -> Result<Self, CustodyError> {
        if self.success {
            return Ok(self);
        }
        let status = match self.code {
            Some(c) => format!("exit code {c}"),
            None => "terminated by signal".to_string(),
        };
        Err(CustodyError::CollaboratorFailed {
            tool: tool.to_string(),
            status,
        })
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(c) => write!(f, "exit code {c}"),
            None => f.write_str("terminated by signal"),
        }
    }
}

pub trait ConversionRunner {
    fn convert(&mut self, req: &ConvertRequest) -> Result<RunOutcome>;
    fn extract_probe(&mut self, req: &ProbeRequest) -> Result<RunOutcome>;
}

/// Spawns the configured executables and waits for them.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    pub silo_exe: PathBuf,
    pub probe_exe: PathBuf,
}

impl ProcessRunner {
    pub fn new(silo_exe: impl Into<PathBuf>, probe_exe: impl Into<PathBuf>) -> Self {
        Self {
            silo_exe: silo_exe.into(),
            probe_exe: probe_exe.into(),
        }
    }

    fn run(exe: &Path, args: &[String]) -> Result<RunOutcome> {
        debug!(exe = %exe.display(), ?args, "spawning");
        let output = Command::new(exe)
            .args(args)
            .output()
            .with_context(|| format!("failed to start '{}'", exe.display()))?;
        let outcome = RunOutcome {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        info!(exe = %exe.display(), status = %outcome, "tool finished");
        Ok(outcome)
    }
}

impl ConversionRunner for ProcessRunner {
    fn convert(&mut self, req: &ConvertRequest) -> Result<RunOutcome> {
        Self::run(&self.silo_exe, &req.args())
    }

    fn extract_probe(&mut self, req: &ProbeRequest) -> Result<RunOutcome> {
        Self::run(&self.probe_exe, &req.args())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_arguments() {
        let c = ConvertRequest {
            data_dir: "/runs/r1/HYM_Data".into(),
            silo_dir: "/runs/r1/SILO".into(),
            cycle: CycleSelector::All,
            fields: "10110".parse().unwrap(),
        };
        assert_eq!(c.args(), ["/runs/r1/HYM_Data", "/runs/r1/SILO", "0", "10110"]);

        let p = ProbeRequest {
            silo_dir: "/runs/r1/SILO".into(),
            probe_dir: "/runs/r1/Probe_Data".into(),
            cycle: CycleSelector::Single(3),
            phi_rot: 22.5,
        };
        assert_eq!(p.args()[2..], ["3", "22.500000"]);
    }

    #[test]
    fn failed_outcome_becomes_error() {
        let o = RunOutcome {
            success: false,
            code: Some(2),
            ..Default::default()
        };
        let err = o.ensure_success("HYM_SILO").unwrap_err();
        assert_eq!(err.to_string(), "HYM_SILO exited unsuccessfully (exit code 2)");
    }

    #[cfg(unix)]
    #[test]
    fn process_runner_captures_status() {
        let mut r = ProcessRunner::new("false", "true");
        let req = ProbeRequest {
            silo_dir: "a".into(),
            probe_dir: "b".into(),
            cycle: CycleSelector::All,
            phi_rot: 0.0,
        };
        assert!(r.extract_probe(&req).unwrap().success);
        let conv = ConvertRequest {
            data_dir: "a".into(),
            silo_dir: "b".into(),
            cycle: CycleSelector::All,
            fields: FieldMask::default(),
        };
        assert!(!r.convert(&conv).unwrap().success);
    }
}
