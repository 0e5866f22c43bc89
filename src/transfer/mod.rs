//! Transfer orchestrator.
//!
//! Sequence for one request:
//! 1. resolve the intent into move/copy/remove lists
//! 2. require the source directory
//! 3. offer to create a missing destination (only if something is moved/copied)
//! 4. filter the lists against the source listing; an empty plan is fatal
//! 5. report counts and ask to proceed
//! 6. ask before overwriting, once per list with collisions
//! 7. move, then copy, then remove; per-file failures are recorded, not fatal
//!
//! Silent mode skips every prompt and all progress output. Fatal errors are
//! still returned to the caller.

mod plan;
mod report;

pub use plan::{filter_files, CategoryPlan, TransferPlan};
pub use report::{OpFailure, TransferOp, TransferReport};

use anyhow::Result;
use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::catalog::{Catalog, ManualSets, TransferIntent};
use crate::confirm::{self, Confirm};
use crate::errors::CustodyError;
use crate::fs_ops::{self, RemoveOutcome};
use crate::output as out;
use crate::probe::{self, DirectoryRef};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferOptions {
    /// No prompts, no progress output.
    pub silent: bool,
    /// Resolve and report the plan without touching the filesystem.
    pub dry_run: bool,
}

impl TransferOptions {
    pub fn silent() -> Self {
        Self {
            silent: true,
            dry_run: false,
        }
    }
}

/// Everything needed to run one transfer.
#[derive(Debug, Clone)]
pub struct TransferRequest<'a> {
    pub source: DirectoryRef,
    pub dest: DirectoryRef,
    pub intent: TransferIntent,
    pub manual: Option<&'a ManualSets>,
    pub options: TransferOptions,
}

impl<'a> TransferRequest<'a> {
    pub fn new(source: impl AsRef<Path>, dest: impl AsRef<Path>, intent: TransferIntent) -> Self {
        Self {
            source: DirectoryRef::new(source.as_ref(), "source directory"),
            dest: DirectoryRef::new(dest.as_ref(), "destination directory"),
            intent,
            manual: None,
            options: TransferOptions::default(),
        }
    }

    pub fn with_manual(mut self, manual: &'a ManualSets) -> Self {
        self.manual = Some(manual);
        self
    }

    pub fn with_options(mut self, options: TransferOptions) -> Self {
        self.options = options;
        self
    }
}

/// Run a transfer to completion. See the module docs for the sequence.
pub fn execute(catalog: &Catalog, confirm: &mut dyn Confirm, req: &TransferRequest<'_>) -> Result<TransferReport> {
    let TransferOptions { silent, dry_run } = req.options;
    let resolved = catalog.resolve(req.intent, req.manual)?;
    let dest_needed = resolved.dest_needed();

    if !silent {
        out::print_heading("Initiating file transfer for HYM project files:");
        out::print_detail(&format!("Source Dir:      {}", req.source.path.display()));
        if dest_needed {
            out::print_detail(&format!("Destination Dir: {}", req.dest.path.display()));
        }
    }

    probe::require_exists(&req.source)?;

    let mut dest_exists = probe::exists(&req.dest, true);
    if dest_needed && !dest_exists {
        if dry_run {
            if !silent {
                out::print_detail(&format!("Dry-run: would create {}", req.dest.path.display()));
            }
        } else {
            if !silent {
                confirm::require(
                    confirm,
                    "The destination directory was not found.  Create this directory?",
                )?;
            }
            probe::ensure_exists(&req.dest, silent)?;
            dest_exists = true;
        }
    }

    let present = fs_ops::list_file_names(&req.source.path)?;
    let plan = TransferPlan::build(&resolved, &present);
    debug!(intent = %req.intent, moves = plan.to_move.found(), copies = plan.to_copy.found(), removals = plan.to_delete.found(), "plan built");

    if !silent {
        out::print_heading("Ready to execute the file transfer:");
        out::print_detail(&format!("Transfer Description: {}", plan.label));
        out::print_detail(&format!("Number of files to MOVE:   {:02}/{:02}", plan.to_move.found(), plan.to_move.requested));
        out::print_detail(&format!("Number of files to COPY:   {:02}/{:02}", plan.to_copy.found(), plan.to_copy.requested));
        out::print_detail(&format!("Number of files to REMOVE: {:02}/{:02}", plan.to_delete.found(), plan.to_delete.requested));
    }

    if plan.is_empty() {
        return Err(CustodyError::EmptyPlan {
            label: plan.label.to_string(),
        }
        .into());
    }

    if !silent && !dry_run {
        confirm::require(confirm, "Proceed with the file transfer?")?;
    }

    if dest_needed && dest_exists {
        let dest_names = fs_ops::list_file_names(&req.dest.path)?;
        for files in [&plan.to_move.files, &plan.to_copy.files] {
            check_overwrite(confirm, &req.dest, files, &dest_names, req.options)?;
        }
    }

    let mut report = TransferReport::new(
        req.intent,
        req.source.path.clone(),
        req.dest.path.clone(),
        plan,
        dry_run,
    );
    if dry_run {
        if !silent {
            out::print_info("Dry-run: no files were moved, copied or removed.");
        }
        return Ok(report);
    }

    run_batch(&req.source, &req.dest, &mut report, silent);

    info!(
        intent = %req.intent,
        source = %req.source.path.display(),
        dest = %req.dest.path.display(),
        moved = report.moved.len(),
        copied = report.copied.len(),
        deleted = report.deleted.len(),
        failed = report.failures.len(),
        "Transfer finished"
    );
    if !silent {
        out::print_user("  Data file transfer complete.");
    }
    Ok(report)
}

/// One prompt for the names in `files` that already exist in the destination.
fn check_overwrite(
    confirm: &mut dyn Confirm,
    dest: &DirectoryRef,
    files: &[String],
    dest_names: &std::collections::BTreeSet<String>,
    options: TransferOptions,
) -> Result<()> {
    let conflicts: Vec<&str> = files
        .iter()
        .filter(|f| dest_names.contains(f.as_str()))
        .map(String::as_str)
        .collect();
    if conflicts.is_empty() {
        return Ok(());
    }
    warn!(dest = %dest.path.display(), conflicts = ?conflicts, "destination files will be overwritten");
    if options.silent {
        return Ok(());
    }
    out::print_heading("File overwrite warning:");
    out::print_detail(&format!("Destination directory: {}", dest.path.display()));
    out::print_detail(&format!("Existing files: {}", conflicts.join(", ")));
    if options.dry_run {
        return Ok(());
    }
    confirm::require(confirm, "Should the files be overwritten?")
}

/// Execute the confirmed plan: moves, then copies, then removals.
fn run_batch(source: &DirectoryRef, dest: &DirectoryRef, report: &mut TransferReport, silent: bool) {
    if !silent {
        out::print_heading("Executing the file transfer:");
    }

    for name in report.plan.to_move.files.clone() {
        let result = fs_ops::move_file(&source.join(&name), &dest.join(&name));
        record(report, TransferOp::Move, name, result, silent);
    }
    for name in report.plan.to_copy.files.clone() {
        let result = fs_ops::safe_copy_and_rename(&source.join(&name), &dest.join(&name));
        record(report, TransferOp::Copy, name, result, silent);
    }
    for name in report.plan.to_delete.files.clone() {
        let path = source.join(&name);
        match fs_ops::remove_file_idempotent(&path) {
            Ok(RemoveOutcome::Removed) => {
                if !silent {
                    out::print_detail(&format!("Deleting file \"{name}\" ... done."));
                }
                report.deleted.push(name);
            }
            Ok(RemoveOutcome::NotFound) => {
                info!(file = %path.display(), "File not found for removal");
                if !silent {
                    out::print_detail(&format!("File \"{}\" not found for removal.", path.display()));
                }
                report.not_found_for_removal.push(name);
            }
            Err(e) => record(report, TransferOp::Remove, name, Err(e.into()), silent),
        }
    }
}

fn record(report: &mut TransferReport, op: TransferOp, name: String, result: Result<()>, silent: bool) {
    let verb = match op {
        TransferOp::Move => "Moving",
        TransferOp::Copy => "Copying",
        TransferOp::Remove => "Deleting",
    };
    match result {
        Ok(()) => {
            debug!(%op, file = %name, "done");
            if !silent {
                out::print_detail(&format!("{verb} file \"{name}\" ... done."));
            }
            match op {
                TransferOp::Move => report.moved.push(name),
                TransferOp::Copy => report.copied.push(name),
                TransferOp::Remove => report.deleted.push(name),
            }
        }
        Err(e) => {
            error!(%op, file = %name, error = %e, "file operation failed; continuing with the batch");
            if !silent {
                out::print_detail(&format!("{verb} file \"{name}\" ... FAILED"));
            }
            report.failures.push(OpFailure {
                op,
                file: name,
                message: format!("{e:#}"),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::ScriptedConfirm;
    use assert_fs::prelude::*;
    use assert_fs::TempDir;

    fn touch_all(dir: &assert_fs::fixture::ChildPath, names: &[&str]) {
        dir.create_dir_all().unwrap();
        for n in names {
            dir.child(n).write_str(n).unwrap();
        }
    }

    #[test]
    fn run_transfer_moves_copies_and_removes_in_order() {
        let td = TempDir::new().unwrap();
        let code = td.child("code");
        let data = td.child("data");
        touch_all(&code, &["hstat.d", "hgrid.d", "t.out", "makefile", "start.d", "notes.txt"]);
        data.create_dir_all().unwrap();

        let mut c = ScriptedConfirm::yes(1);
        let req = TransferRequest::new(code.path(), data.path(), TransferIntent::RunTransfer);
        let report = execute(&Catalog::hym(), &mut c, &req).unwrap();

        assert_eq!(report.moved, ["hgrid.d", "hstat.d", "t.out"]);
        assert_eq!(report.copied, ["makefile"]);
        assert_eq!(report.deleted, ["start.d"]);
        assert!(report.failures.is_empty());
        assert_eq!(c.asked(), ["Proceed with the file transfer?"]);

        assert!(data.child("hgrid.d").path().exists());
        assert!(!code.child("hgrid.d").path().exists());
        assert!(code.child("makefile").path().exists());
        assert!(data.child("makefile").path().exists());
        assert!(!code.child("start.d").path().exists());
        assert!(code.child("notes.txt").path().exists());
    }
}
