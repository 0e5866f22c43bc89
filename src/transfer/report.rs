use std::fmt;
use std::path::PathBuf;

use super::plan::TransferPlan;
use crate::catalog::TransferIntent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOp {
    Move,
    Copy,
    Remove,
}

impl fmt::Display for TransferOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TransferOp::Move => "move",
            TransferOp::Copy => "copy",
            TransferOp::Remove => "remove",
        })
    }
}

/// A single file operation that failed inside an otherwise confirmed batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpFailure {
    pub op: TransferOp,
    pub file: String,
    pub message: String,
}

/// What a transfer planned and what it actually did.
#[derive(Debug, Clone)]
pub struct TransferReport {
    pub intent: TransferIntent,
    pub source: PathBuf,
    pub dest: PathBuf,
    pub plan: TransferPlan,
    pub dry_run: bool,
    pub moved: Vec<String>,
    pub copied: Vec<String>,
    pub deleted: Vec<String>,
    /// Delete targets that vanished between listing and removal.
    pub not_found_for_removal: Vec<String>,
    pub failures: Vec<OpFailure>,
}

impl TransferReport {
    pub(super) fn new(intent: TransferIntent, source: PathBuf, dest: PathBuf, plan: TransferPlan, dry_run: bool) -> Self {
        Self {
            intent,
            source,
            dest,
            plan,
            dry_run,
            moved: Vec::new(),
            copied: Vec::new(),
            deleted: Vec::new(),
            not_found_for_removal: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.plan.label
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Files whose operation completed.
    pub fn completed(&self) -> usize {
        self.moved.len() + self.copied.len() + self.deleted.len()
    }
}
