//! Application orchestrator.
//! Loads/merges config, initializes logging, dispatches the subcommand and maps
//! any failure to a logged kind/code and the process exit status.

use anyhow::{Result, bail};
use clap::CommandFactory;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use hym_custody::cli::{Args, Command, PrepareArgs, TransferArgs};
use hym_custody::output as out;
use hym_custody::{
    AssumeYes, Catalog, Config, Confirm, ConsolePrompt, CustodyError, DataSetState, DirectoryRef, EssentialFiles,
    FieldMask, LoadResult, LocateOutcome, PrepareRequest, TransferIntent, TransferOptions, TransferReport,
    TransferRequest, default_config_path, load_or_init,
};

use crate::logging::init_tracing;

/// Run the CLI application and return the process exit status.
pub fn run(args: Args) -> i32 {
    if args.print_config {
        print_config_location(&args);
        return 0;
    }

    let mut cfg = match load_or_init(args.config.as_deref()) {
        Ok((cfg, LoadResult::CreatedTemplate(path))) => {
            out::print_success(&format!("A template config was written to: {}", path.display()));
            out::print_info("Edit it to set <code_path> and <run_path>, or pass --code-path/--run-path.");
            cfg
        }
        Ok((cfg, _)) => cfg,
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            return 2;
        }
    };
    args.apply_overrides(&mut cfg);

    let guard = match init_tracing(cfg.log_level, cfg.log_file.as_deref(), args.json) {
        Ok(g) => g,
        Err(e) => {
            out::print_error(&format!("Failed to initialize logging: {e}"));
            return 1;
        }
    };
    debug!(?args, "starting hym_custody");

    let code = match dispatch(&args, &cfg) {
        Ok(code) => code,
        Err(e) => report_error(&e),
    };

    // Flush the file writer before exit.
    drop(guard);
    code
}

fn print_config_location(args: &Args) {
    let (origin, path) = match (&args.config, default_config_path()) {
        (Some(p), _) => ("--config", Some(p.clone())),
        (None, p) if std::env::var_os(hym_custody::config::CONFIG_ENV).is_some() => ("HYM_CUSTODY_CONFIG", p),
        (None, p) => ("default", p),
    };
    match path {
        Some(p) => {
            out::print_info(&format!("Config path ({origin}):\n  {}", p.display()));
            if p.exists() {
                out::print_info("A config file exists at that location.");
            } else {
                out::print_info("No config file exists there yet. Run any command to create a template.");
            }
        }
        None => out::print_error("Could not determine a default config path."),
    }
}

/// Log a stable kind/code for typed errors and return the exit status.
fn report_error(e: &anyhow::Error) -> i32 {
    match e.downcast_ref::<CustodyError>() {
        Some(ce @ CustodyError::UserAbort { .. }) => {
            warn!(code = ce.code(), kind = ce.kind(), "{ce}");
            out::print_warn("Stopping based on user input.");
            ce.code()
        }
        Some(ce) => {
            error!(code = ce.code(), kind = ce.kind(), "{ce}");
            out::print_error(&format!("{e:#}"));
            ce.code()
        }
        None => {
            error!(error = %format!("{e:#}"), "command failed");
            out::print_error(&format!("{e:#}"));
            1
        }
    }
}

fn confirm_source(args: &Args) -> Box<dyn Confirm> {
    if args.yes { Box::new(AssumeYes) } else { Box::new(ConsolePrompt::stdio()) }
}

fn dispatch(args: &Args, cfg: &Config) -> Result<i32> {
    cfg.validate()?;
    let catalog = Catalog::hym();
    let mut confirm = confirm_source(args);

    match &args.command {
        None => {
            out::print_error("No command given.");
            let _ = Args::command().print_help();
            Ok(2)
        }
        Some(Command::Transfer(t)) => run_transfer(t, &catalog, confirm.as_mut()),
        Some(Command::Validate { dir, fields }) => {
            let dir = match dir {
                Some(d) => DirectoryRef::new(d, "data directory"),
                None => cfg.layout()?.data_dir,
            };
            let essential = essential_for(fields.as_ref().unwrap_or(&cfg.data_flags));
            match hym_custody::validate(&dir, &essential, false)? {
                DataSetState::Complete => {
                    out::print_success(&format!("A complete HYM data set was found in {}", dir.path.display()));
                    Ok(0)
                }
                DataSetState::Absent => {
                    out::print_warn(&format!("No HYM data set was found in {}", dir.path.display()));
                    Ok(1)
                }
            }
        }
        Some(Command::Locate { fields }) => {
            let layout = cfg.layout()?;
            let essential = essential_for(fields.as_ref().unwrap_or(&cfg.data_flags));
            match hym_custody::locate_or_promote(&layout, &catalog, &essential, confirm.as_mut())? {
                LocateOutcome::AlreadyArchived => {
                    out::print_success(&format!("HYM data set located in {}", layout.data_dir.path.display()));
                }
                LocateOutcome::Promoted(report) => {
                    summarize(&report);
                    out::print_success(&format!("HYM data set promoted into {}", layout.data_dir.path.display()));
                }
            }
            Ok(0)
        }
        Some(Command::Prepare(p)) => run_prepare(p, cfg, &catalog, confirm.as_mut()),
        Some(Command::Ncyc { dir }) => {
            let dir: PathBuf = match dir {
                Some(d) => d.clone(),
                None => cfg.layout()?.data_dir.path,
            };
            let ncyc = hym_custody::status::read_ncyc(&dir)?;
            out::print_user(&format!("Ncyc = {ncyc}"));
            Ok(0)
        }
    }
}

fn essential_for(fields: &FieldMask) -> EssentialFiles {
    EssentialFiles::builder().with_fields(fields).build()
}

fn run_transfer(t: &TransferArgs, catalog: &Catalog, confirm: &mut dyn Confirm) -> Result<i32> {
    let manual = t.manual_sets();
    if manual.is_some() && t.intent != TransferIntent::Manual {
        warn!(intent = %t.intent, "--move/--copy/--delete are only used by the manual intent; ignoring them");
    }
    let manual = manual.filter(|_| t.intent == TransferIntent::Manual);

    let dest = match &t.dest {
        Some(d) => d.clone(),
        None => {
            if catalog.resolve(t.intent, manual.as_ref())?.dest_needed() {
                bail!("--dest is required for the {} intent", t.intent);
            }
            t.source.clone()
        }
    };

    let mut req = TransferRequest::new(&t.source, &dest, t.intent).with_options(TransferOptions {
        silent: t.quiet,
        dry_run: t.dry_run,
    });
    if let Some(m) = manual.as_ref() {
        req = req.with_manual(m);
    }

    let report = hym_custody::execute(catalog, confirm, &req)?;
    if !t.quiet {
        summarize(&report);
    }
    Ok(if report.has_failures() { 1 } else { 0 })
}

fn summarize(report: &TransferReport) {
    if report.dry_run {
        return;
    }
    info!(
        label = report.label(),
        moved = report.moved.len(),
        copied = report.copied.len(),
        deleted = report.deleted.len(),
        "transfer summary"
    );
    for f in &report.failures {
        out::print_warn(&format!("{} of \"{}\" failed: {}", f.op, f.file, f.message));
    }
    if !report.not_found_for_removal.is_empty() {
        out::print_info(&format!(
            "Not present for removal: {}",
            report.not_found_for_removal.join(", ")
        ));
    }
}

fn run_prepare(p: &PrepareArgs, cfg: &Config, catalog: &Catalog, confirm: &mut dyn Confirm) -> Result<i32> {
    if !p.convert && !p.probe {
        bail!("Nothing to do: pass --convert and/or --probe");
    }
    let paths = cfg.pipeline_paths()?;
    let req = PrepareRequest {
        convert: p.convert,
        probe: p.probe,
        cycle: p.cycle.map(hym_custody::CycleSelector::from_arg).unwrap_or_else(|| cfg.default_cycle()),
        fields: p.fields.unwrap_or(cfg.data_flags),
        phi_rot: p.phi_rot.unwrap_or(cfg.phi_rot),
    };
    let mut runner = cfg.runner();
    let summary = hym_custody::prepare(&paths, &req, catalog, confirm, &mut runner)?;
    if let Some(LocateOutcome::Promoted(report)) = &summary.located {
        summarize(report);
    }
    Ok(0)
}
