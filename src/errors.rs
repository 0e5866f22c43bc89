//! Typed error definitions for hym_custody.
//! Every fatal condition of a transfer or data-set check maps to one variant,
//! so the top-level handler can log a stable kind/code and tests can match on it.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CustodyError {
    #[error("The transfer intent \"{0}\" is not recognized.")]
    UnknownIntent(String),

    #[error("A MANUAL transfer requires move, copy or remove lists from the caller.")]
    ManualListsMissing,

    #[error("Invalid field selector \"{0}\": expected 5 characters of '1' or '0'.")]
    InvalidFieldMask(String),

    #[error("Cycle {cycle} is outside the available range [1, {ncyc}].")]
    CycleOutOfRange { cycle: u32, ncyc: u32 },

    #[error("The {role} was not found: {}", path.display())]
    MissingDirectory { role: String, path: PathBuf },

    #[error("Could not create the {role} at {}: {source}", path.display())]
    CreateDirectory {
        role: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not list directory {}: {source}", path.display())]
    ListDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No files were found to transfer for {label}.")]
    EmptyPlan { label: String },

    #[error("An incomplete data set was found in {}; missing files: {}", dir.display(), missing.join(", "))]
    IncompleteDataSet { dir: PathBuf, missing: Vec<String> },

    #[error("No valid HYM data set could be located (searched {} and {}).", archive.display(), staging.display())]
    NoDataSet { archive: PathBuf, staging: PathBuf },

    #[error("Information is missing from the status file {}: key \"{key}\" not found.", file.display())]
    StatusFieldMissing { file: PathBuf, key: String },

    #[error("Stopping based on user input: {prompt}")]
    UserAbort { prompt: String },

    #[error("{tool} exited unsuccessfully ({status})")]
    CollaboratorFailed { tool: String, status: String },
}

impl CustodyError {
    /// Stable numeric code, used as the process exit status and in structured logs.
    pub fn code(&self) -> i32 {
        match self {
            CustodyError::UnknownIntent(_)
            | CustodyError::ManualListsMissing
            | CustodyError::InvalidFieldMask(_)
            | CustodyError::CycleOutOfRange { .. } => 2,
            CustodyError::MissingDirectory { .. } => 3,
            CustodyError::CreateDirectory { .. } | CustodyError::ListDirectory { .. } => 4,
            CustodyError::EmptyPlan { .. } => 5,
            CustodyError::IncompleteDataSet { .. } => 6,
            CustodyError::NoDataSet { .. } => 7,
            CustodyError::StatusFieldMissing { .. } => 8,
            CustodyError::UserAbort { .. } => 9,
            CustodyError::CollaboratorFailed { .. } => 10,
        }
    }

    /// Short machine-friendly kind name for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CustodyError::UnknownIntent(_) => "unknown_intent",
            CustodyError::ManualListsMissing => "manual_lists_missing",
            CustodyError::InvalidFieldMask(_) => "invalid_field_mask",
            CustodyError::CycleOutOfRange { .. } => "cycle_out_of_range",
            CustodyError::MissingDirectory { .. } => "missing_directory",
            CustodyError::CreateDirectory { .. } => "create_directory",
            CustodyError::ListDirectory { .. } => "list_directory",
            CustodyError::EmptyPlan { .. } => "empty_plan",
            CustodyError::IncompleteDataSet { .. } => "incomplete_data_set",
            CustodyError::NoDataSet { .. } => "no_data_set",
            CustodyError::StatusFieldMissing { .. } => "status_field_missing",
            CustodyError::UserAbort { .. } => "user_abort",
            CustodyError::CollaboratorFailed { .. } => "collaborator_failed",
        }
    }
}
