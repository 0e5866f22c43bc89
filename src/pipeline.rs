//! Conversion preparation pipeline.
//!
//! For a conversion request: build the essential list from the field mask,
//! locate (or promote) the data set, make sure the SILO output directory
//! exists, read Ncyc and check the cycle selector. For a probe request: make
//! sure the probe output directory exists. Then run the tools and report the
//! elapsed time.

use anyhow::Result;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::confirm::{self, Confirm};
use crate::dataset::{self, EssentialFiles, LocateOutcome, RunLayout};
use crate::fields::{CycleSelector, FieldMask};
use crate::output as out;
use crate::probe::{self, DirectoryRef};
use crate::runner::{ConversionRunner, ConvertRequest, ProbeRequest, RunOutcome};
use crate::status;

/// Directories touched by the pipeline.
#[derive(Debug, Clone)]
pub struct PipelinePaths {
    pub layout: RunLayout,
    pub silo_dir: DirectoryRef,
    pub probe_dir: DirectoryRef,
}

impl PipelinePaths {
    pub fn new(layout: RunLayout, silo_dir: impl Into<PathBuf>, probe_dir: impl Into<PathBuf>) -> Self {
        Self {
            layout,
            silo_dir: DirectoryRef::new(silo_dir, "SILO output directory"),
            probe_dir: DirectoryRef::new(probe_dir, "Probe output directory"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrepareRequest {
    pub convert: bool,
    pub probe: bool,
    pub cycle: CycleSelector,
    pub fields: FieldMask,
    pub phi_rot: f64,
}

#[derive(Debug, Default)]
pub struct PrepareSummary {
    pub located: Option<LocateOutcome>,
    pub ncyc: Option<u32>,
    pub convert: Option<RunOutcome>,
    pub probe: Option<RunOutcome>,
    pub elapsed: Duration,
}

pub fn prepare(
    paths: &PipelinePaths,
    req: &PrepareRequest,
    catalog: &Catalog,
    confirm: &mut dyn Confirm,
    runner: &mut dyn ConversionRunner,
) -> Result<PrepareSummary> {
    let mut summary = PrepareSummary::default();
    let essential = EssentialFiles::builder().with_fields(&req.fields).build();

    if req.convert {
        summary.located = Some(dataset::locate_or_promote(&paths.layout, catalog, &essential, confirm)?);
        if !probe::exists(&paths.silo_dir, false) {
            confirm::require(confirm, "Would you like to create the SILO output directory?")?;
            probe::ensure_exists(&paths.silo_dir, false)?;
        }
        let ncyc = status::read_ncyc(&paths.layout.data_dir.path)?;
        out::print_user(&format!("\n  Ncyc = {ncyc}"));
        req.cycle.check(ncyc)?;
        summary.ncyc = Some(ncyc);
    }
    if req.probe && !probe::exists(&paths.probe_dir, false) {
        probe::ensure_exists(&paths.probe_dir, false)?;
    }

    let start = Instant::now();
    if req.convert {
        out::print_heading("Converting HYM Data to SILO Databases:");
        let convert = ConvertRequest {
            data_dir: paths.layout.data_dir.path.clone(),
            silo_dir: paths.silo_dir.path.clone(),
            cycle: req.cycle,
            fields: req.fields,
        };
        let outcome = runner.convert(&convert)?;
        echo_tool_output(&outcome);
        summary.convert = Some(outcome.clone().ensure_success("SILO conversion")?);
        out::print_user("  Conversion operations completed.");
    }
    if req.probe {
        out::print_heading("Extracting the probe data:");
        let probe_req = ProbeRequest {
            silo_dir: paths.silo_dir.path.clone(),
            probe_dir: paths.probe_dir.path.clone(),
            cycle: req.cycle,
            phi_rot: req.phi_rot,
        };
        let outcome = runner.extract_probe(&probe_req)?;
        echo_tool_output(&outcome);
        summary.probe = Some(outcome.clone().ensure_success("probe extraction")?);
        out::print_user("  Data extraction operations completed.");
    }
    summary.elapsed = start.elapsed();
    out::print_user(&format!("\n  Total time elapsed: {}", format_elapsed(summary.elapsed)));
    info!(elapsed_ms = summary.elapsed.as_millis() as u64, "pipeline finished");
    Ok(summary)
}

fn echo_tool_output(outcome: &RunOutcome) {
    for line in outcome.stdout.lines() {
        out::print_user(line);
    }
    for line in outcome.stderr.lines() {
        warn!(target: "collaborator", "{line}");
    }
}

/// `MM:SS.ss`
pub fn format_elapsed(d: Duration) -> String {
    let total = d.as_secs_f64();
    let mins = (total / 60.0).floor();
    let secs = total - mins * 60.0;
    format!("{:02}:{:05.2}", mins as u64, secs)
}
