//! Core library for `hym_custody`.
//!
//! Moves, copies and purges named groups of HYM simulation output files
//! between an active code directory and a run archive, validates that a
//! directory holds a complete data set before conversion, and drives the
//! external SILO conversion and probe extraction tools.
//!
//! The binary wires these together behind a CLI; every operation here takes
//! its confirmation source and process runner as arguments so it can be driven
//! from tests without a terminal.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod confirm;
pub mod dataset;
pub mod errors;
pub mod fields;
pub mod fs_ops;
pub mod output;
pub mod pipeline;
pub mod platform;
pub mod probe;
pub mod runner;
pub mod status;
pub mod transfer;

pub use catalog::{Catalog, FileSet, ManualSets, ResolvedSets, TransferIntent};
pub use config::{
    Config, LoadResult, LogLevel, create_template_config, default_config_path, default_log_path,
    load_config_from_xml_path, load_or_init, path_has_symlink_ancestor,
};
pub use confirm::{AssumeYes, Confirm, ConsolePrompt, Decision, ScriptedConfirm};
pub use dataset::{DataSetState, EssentialFiles, LocateOutcome, RunLayout, locate_or_promote, validate};
pub use errors::CustodyError;
pub use fields::{CycleSelector, Field, FieldMask};
pub use pipeline::{PipelinePaths, PrepareRequest, PrepareSummary, prepare};
pub use probe::DirectoryRef;
pub use runner::{ConversionRunner, ConvertRequest, ProbeRequest, ProcessRunner, RunOutcome};
pub use transfer::{TransferOptions, TransferPlan, TransferReport, TransferRequest, execute};
