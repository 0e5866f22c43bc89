//! CLI definition and parsing.
//!
//! Notes:
//! - Global flags override values from the XML config.
//! - --debug is a shorthand for --log-level debug.

use clap::{Args as ClapArgs, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::catalog::{FileSet, ManualSets, TransferIntent};
use crate::config::types::{Config, LogLevel};
use crate::fields::FieldMask;

/// Move, copy, purge and validate HYM simulation data sets.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Custody of HYM simulation data sets between code and archive directories")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Config file to read (overrides HYM_CUSTODY_CONFIG and the default location).
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Override the active code directory.
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub code_path: Option<PathBuf>,

    /// Override the run archive directory.
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub run_path: Option<PathBuf>,

    #[arg(short = 'd', long, global = true, help = "Enable debug logging (shorthand for --log-level debug)")]
    pub debug: bool,

    #[arg(long, global = true, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    #[arg(long, global = true, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Answer every confirmation prompt with yes.
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    #[arg(long, help = "Print the config file location and exit")]
    pub print_config: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Move, copy and delete catalog file sets between two directories.
    Transfer(TransferArgs),
    /// Check a directory for a complete HYM data set.
    Validate {
        /// Directory to check (defaults to the configured data directory).
        #[arg(value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
        /// Also require the data files of these fields.
        #[arg(long)]
        fields: Option<FieldMask>,
    },
    /// Make sure the archive holds a data set, promoting one from the code directory if needed.
    Locate {
        #[arg(long)]
        fields: Option<FieldMask>,
    },
    /// Locate the data set, then run SILO conversion and/or probe extraction.
    Prepare(PrepareArgs),
    /// Print the number of output cycles recorded in hstat.d.
    Ncyc {
        #[arg(value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
    },
}

#[derive(ClapArgs, Debug, Clone)]
pub struct TransferArgs {
    /// run-transfer, full-copy, data-copy, partial-copy, full-transfer, partial-transfer, purge, manual
    pub intent: TransferIntent,

    #[arg(long, short = 's', value_hint = ValueHint::DirPath)]
    pub source: PathBuf,

    /// Not needed when nothing is moved or copied (purge).
    #[arg(long, short = 'D', value_hint = ValueHint::DirPath)]
    pub dest: Option<PathBuf>,

    /// File to move (manual intent; repeatable).
    #[arg(long = "move", value_name = "FILE")]
    pub to_move: Vec<String>,

    /// File to copy (manual intent; repeatable).
    #[arg(long = "copy", value_name = "FILE")]
    pub to_copy: Vec<String>,

    /// File to delete from the source (manual intent; repeatable).
    #[arg(long = "delete", value_name = "FILE")]
    pub to_delete: Vec<String>,

    /// Skip all prompts and console reporting.
    #[arg(long, short = 'q')]
    pub quiet: bool,

    /// Show what would be done, but do not modify files/directories.
    #[arg(long)]
    pub dry_run: bool,
}

impl TransferArgs {
    /// Caller-supplied sets; None unless at least one list was given.
    pub fn manual_sets(&self) -> Option<ManualSets> {
        let sets = ManualSets {
            to_move: FileSet::new(self.to_move.iter().cloned()),
            to_copy: FileSet::new(self.to_copy.iter().cloned()),
            to_delete: FileSet::new(self.to_delete.iter().cloned()),
        };
        (!sets.is_empty()).then_some(sets)
    }
}

#[derive(ClapArgs, Debug, Clone)]
pub struct PrepareArgs {
    /// Convert the raw data to SILO databases.
    #[arg(long)]
    pub convert: bool,

    /// Extract synthetic probe data from the SILO databases.
    #[arg(long)]
    pub probe: bool,

    /// Cycle to process (0 = all); defaults to the config value.
    #[arg(long)]
    pub cycle: Option<u32>,

    /// Field mask p n B v J, e.g. 10110; defaults to <data_flags>.
    #[arg(long)]
    pub fields: Option<FieldMask>,

    /// Probe array rotation in degrees; defaults to <phi_rot>.
    #[arg(long = "phi", allow_hyphen_values = true)]
    pub phi_rot: Option<f64>,
}

impl Args {
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(p) = &self.code_path {
            cfg.code_path = Some(p.clone());
        }
        if let Some(p) = &self.run_path {
            cfg.run_path = Some(p.clone());
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_with_manual_lists() {
        let args = Args::try_parse_from([
            "hym_custody", "transfer", "manual", "--source", "/a", "--dest", "/b", "--move", "x.d", "--move", "y.d",
            "--delete", "z.d", "--quiet",
        ])
        .unwrap();
        let Some(Command::Transfer(t)) = args.command else {
            panic!("expected transfer");
        };
        assert_eq!(t.intent, TransferIntent::Manual);
        assert!(t.quiet);
        let sets = t.manual_sets().unwrap();
        assert_eq!(sets.to_move.as_slice(), ["x.d", "y.d"]);
        assert!(sets.to_copy.is_empty());
        assert_eq!(sets.to_delete.as_slice(), ["z.d"]);
    }

    #[test]
    fn unknown_intent_rejected() {
        assert!(Args::try_parse_from(["hym_custody", "transfer", "archive", "--source", "/a"]).is_err());
    }

    #[test]
    fn overrides_and_debug_precedence() {
        let args = Args::try_parse_from([
            "hym_custody", "--log-level", "quiet", "--debug", "--run-path", "/runs/r2", "ncyc",
        ])
        .unwrap();
        let mut cfg = Config::default();
        args.apply_overrides(&mut cfg);
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.run_path, Some(PathBuf::from("/runs/r2")));
        assert_eq!(cfg.code_path, None);
    }

    #[test]
    fn prepare_flags() {
        let args = Args::try_parse_from([
            "hym_custody", "prepare", "--convert", "--cycle", "3", "--fields", "10010", "--phi", "-15.0",
        ])
        .unwrap();
        let Some(Command::Prepare(p)) = args.command else {
            panic!("expected prepare");
        };
        assert!(p.convert && !p.probe);
        assert_eq!(p.cycle, Some(3));
        assert_eq!(p.fields.unwrap().to_string(), "10010");
        assert_eq!(p.phi_rot, Some(-15.0));
    }
}
