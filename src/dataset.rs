//! Data-set locator and validator.
//!
//! A directory holds a usable HYM data set when every essential file is
//! present. Partial sets are always fatal: the converter assumes completeness.
//! When the archive has nothing yet, a complete set in the active code
//! directory can be promoted into it with a run transfer.

use anyhow::Result;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::catalog::{Catalog, FileSet, TransferIntent};
use crate::confirm::{self, Confirm};
use crate::errors::CustodyError;
use crate::fields::FieldMask;
use crate::fs_ops;
use crate::output as out;
use crate::probe::{self, DirectoryRef};
use crate::transfer::{self, TransferOptions, TransferReport, TransferRequest};

/// Files that must all exist before conversion. Frozen once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EssentialFiles(FileSet);

impl EssentialFiles {
    /// Status and grid files are always required.
    pub fn builder() -> EssentialFilesBuilder {
        EssentialFilesBuilder {
            files: FileSet::new(["hstat.d", "hgrid.d"]),
        }
    }

    pub fn files(&self) -> &FileSet {
        &self.0
    }
}

impl Default for EssentialFiles {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone)]
pub struct EssentialFilesBuilder {
    files: FileSet,
}

impl EssentialFilesBuilder {
    /// Require the raw output file of every selected field.
    pub fn with_fields(mut self, mask: &FieldMask) -> Self {
        for field in mask.selected() {
            self = self.with_file(field.data_file());
        }
        self
    }

    pub fn with_file(mut self, name: &str) -> Self {
        if !self.files.contains(name) {
            self.files.push(name);
        }
        self
    }

    pub fn build(self) -> EssentialFiles {
        EssentialFiles(self.files)
    }
}

/// Result of a validation pass that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSetState {
    /// Every essential file is present.
    Complete,
    /// None are present (or the directory does not exist).
    Absent,
}

/// Check `dir` for a complete data set. Some-but-not-all essential files is an
/// `IncompleteDataSet` error naming exactly the missing ones.
pub fn validate(dir: &DirectoryRef, essential: &EssentialFiles, silent: bool) -> Result<DataSetState, CustodyError> {
    if !probe::exists(dir, silent) {
        return Ok(DataSetState::Absent);
    }
    let present = fs_ops::list_file_names(&dir.path)?;
    let missing: Vec<String> = essential
        .files()
        .iter()
        .filter(|f| !present.contains(*f))
        .map(str::to_string)
        .collect();

    if missing.is_empty() {
        info!(dir = %dir.path.display(), "complete data set found");
        Ok(DataSetState::Complete)
    } else if missing.len() == essential.files().len() {
        Ok(DataSetState::Absent)
    } else {
        if !silent {
            out::print_detail("An incomplete data set was located.");
            out::print_detail(&format!("Missing Files: {}", missing.join(", ")));
        }
        Err(CustodyError::IncompleteDataSet {
            dir: dir.path.clone(),
            missing,
        })
    }
}

/// Where a run's data lives.
#[derive(Debug, Clone)]
pub struct RunLayout {
    /// Active code directory the simulation writes into (staging).
    pub code_dir: DirectoryRef,
    /// Run archive directory.
    pub run_dir: DirectoryRef,
    /// Data storage subdirectory inside the run archive.
    pub data_dir: DirectoryRef,
}

impl RunLayout {
    pub fn new(code_dir: impl Into<PathBuf>, run_dir: impl Into<PathBuf>, data_subdir: &str) -> Self {
        let run_dir: PathBuf = run_dir.into();
        Self {
            code_dir: DirectoryRef::new(code_dir, "active code directory"),
            data_dir: DirectoryRef::new(run_dir.join(data_subdir), "data storage subdirectory"),
            run_dir: DirectoryRef::new(run_dir, "run archive directory"),
        }
    }
}

#[derive(Debug)]
pub enum LocateOutcome {
    /// The archive already held a complete data set.
    AlreadyArchived,
    /// A complete set was moved over from the code directory.
    Promoted(TransferReport),
}

/// Make sure the archive's data directory holds a complete data set,
/// promoting one from the code directory if the archive has none.
pub fn locate_or_promote(
    layout: &RunLayout,
    catalog: &Catalog,
    essential: &EssentialFiles,
    confirm: &mut dyn Confirm,
) -> Result<LocateOutcome> {
    if validate(&layout.data_dir, essential, false)? == DataSetState::Complete {
        return Ok(LocateOutcome::AlreadyArchived);
    }

    confirm::require(
        confirm,
        "A suitable HYM data set was not found in storage.  Look in the active code directory for a new HYM data set?",
    )?;

    if !probe::exists(&layout.code_dir, false) {
        return Err(CustodyError::MissingDirectory {
            role: layout.code_dir.role.clone(),
            path: layout.code_dir.path.clone(),
        }
        .into());
    }

    match validate(&layout.code_dir, essential, false)? {
        DataSetState::Complete => {}
        DataSetState::Absent => {
            return Err(CustodyError::NoDataSet {
                archive: layout.data_dir.path.clone(),
                staging: layout.code_dir.path.clone(),
            }
            .into());
        }
    }

    out::print_heading("A new HYM data set was found in the active code directory.");
    out::print_detail("Answering yes to this prompt will:");
    out::print_detail("(1) Create the run archive directory (if necessary).");
    out::print_detail("(2) Create the data storage subdirectory (if necessary).");
    out::print_detail("(3) Move the new HYM data files to the data storage subdirectory.");
    confirm::require(confirm, "Proceed with these actions?")?;

    probe::ensure_exists(&layout.run_dir, false)?;
    probe::ensure_exists(&layout.data_dir, false)?;

    let req = TransferRequest {
        source: layout.code_dir.clone(),
        dest: layout.data_dir.clone(),
        intent: TransferIntent::RunTransfer,
        manual: None,
        options: TransferOptions::silent(),
    };
    let report = transfer::execute(catalog, confirm, &req)?;
    if report.has_failures() {
        warn!(failed = report.failures.len(), "some files could not be promoted into the archive");
    }
    info!(
        from = %layout.code_dir.path.display(),
        to = %layout.data_dir.path.display(),
        moved = report.moved.len(),
        "Promoted data set into the run archive"
    );
    Ok(LocateOutcome::Promoted(report))
}
