//! File set catalog.
//! Named groups of HYM output files and the rules that turn a transfer intent
//! into move/copy/remove lists. The catalog is built once and passed around by
//! reference; nothing here mutates after construction.

use std::fmt;
use std::str::FromStr;

use crate::errors::CustodyError;

/// Ordered list of file names. Order is kept for reporting; membership is what
/// matters when the list is matched against a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSet(Vec<String>);

impl FileSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Concatenate sets in order (duplicates kept).
    pub fn concat(parts: &[&FileSet]) -> Self {
        Self(parts.iter().flat_map(|p| p.0.iter().cloned()).collect())
    }

    pub fn push(&mut self, name: impl Into<String>) {
        self.0.push(name.into());
    }
}

impl<'a> IntoIterator for &'a FileSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Symbolic transfer request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferIntent {
    /// Move run output, copy support files, remove the restart file.
    RunTransfer,
    FullCopy,
    DataCopy,
    PartialCopy,
    FullTransfer,
    PartialTransfer,
    Purge,
    /// Caller supplies the three lists.
    Manual,
}

impl TransferIntent {
    pub const ALL: [TransferIntent; 8] = [
        TransferIntent::RunTransfer,
        TransferIntent::FullCopy,
        TransferIntent::DataCopy,
        TransferIntent::PartialCopy,
        TransferIntent::FullTransfer,
        TransferIntent::PartialTransfer,
        TransferIntent::Purge,
        TransferIntent::Manual,
    ];

    /// Human-readable description used in reports.
    pub fn label(self) -> &'static str {
        match self {
            TransferIntent::RunTransfer => "RUN TRANSFER",
            TransferIntent::FullCopy => "FULL COPY",
            TransferIntent::DataCopy => "DATA COPY",
            TransferIntent::PartialCopy => "PARTIAL COPY",
            TransferIntent::FullTransfer => "FULL TRANSFER",
            TransferIntent::PartialTransfer => "PARTIAL TRANSFER",
            TransferIntent::Purge => "PURGE",
            TransferIntent::Manual => "MANUAL",
        }
    }

    fn name(self) -> &'static str {
        match self {
            TransferIntent::RunTransfer => "run-transfer",
            TransferIntent::FullCopy => "full-copy",
            TransferIntent::DataCopy => "data-copy",
            TransferIntent::PartialCopy => "partial-copy",
            TransferIntent::FullTransfer => "full-transfer",
            TransferIntent::PartialTransfer => "partial-transfer",
            TransferIntent::Purge => "purge",
            TransferIntent::Manual => "manual",
        }
    }
}

impl fmt::Display for TransferIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransferIntent {
    type Err = CustodyError;

    /// Accepts kebab-case names and the historical snake-case keys
    /// (`run_xfer`, `part_copy`, ...), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        let intent = match key.as_str() {
            "run-transfer" | "run-xfer" => TransferIntent::RunTransfer,
            "full-copy" => TransferIntent::FullCopy,
            "data-copy" => TransferIntent::DataCopy,
            "partial-copy" | "part-copy" => TransferIntent::PartialCopy,
            "full-transfer" | "full-xfer" => TransferIntent::FullTransfer,
            "partial-transfer" | "part-xfer" => TransferIntent::PartialTransfer,
            "purge" => TransferIntent::Purge,
            "manual" => TransferIntent::Manual,
            _ => return Err(CustodyError::UnknownIntent(s.to_string())),
        };
        Ok(intent)
    }
}

/// Lists supplied by the caller for a MANUAL transfer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualSets {
    pub to_move: FileSet,
    pub to_copy: FileSet,
    pub to_delete: FileSet,
}

impl ManualSets {
    pub fn is_empty(&self) -> bool {
        self.to_move.is_empty() && self.to_copy.is_empty() && self.to_delete.is_empty()
    }
}

/// Resolved request lists for one intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSets {
    pub to_move: FileSet,
    pub to_copy: FileSet,
    pub to_delete: FileSet,
    pub label: &'static str,
}

impl ResolvedSets {
    /// The destination matters only if something is moved or copied.
    pub fn dest_needed(&self) -> bool {
        !self.to_move.is_empty() || !self.to_copy.is_empty()
    }

    pub fn requested_total(&self) -> usize {
        self.to_move.len() + self.to_copy.len() + self.to_delete.len()
    }
}

/// Base file categories of a HYM run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    /// Large 3D output and dumps.
    pub bulk_data: FileSet,
    /// Status, history and 2D/field-history output.
    pub partial: FileSet,
    /// Job stdout/stderr.
    pub logs: FileSet,
    /// Inputs and build files copied with every run.
    pub support: FileSet,
    /// Restart marker removed after a run transfer or purge.
    pub start: FileSet,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::hym()
    }
}

impl Catalog {
    /// Standard HYM layout.
    pub fn hym() -> Self {
        Self {
            bulk_data: FileSet::new([
                "hgrid.d", "h3ds.d", "h3ds_ff.d", "h3db.d", "h3dv.d", "h3dj.d", "0.dmp",
            ]),
            partial: FileSet::new([
                "hstat.d",
                "hmen.d",
                "history.d",
                "hfh3.d",
                "hfh3_ssx.d",
                "hfh3.l",
                "h2ds_psi.d",
                "h2ds_bt.d",
            ]),
            logs: FileSet::new(["t.err", "t.out"]),
            support: FileSet::new(["hybm.p", "frcin_read.p", "hybm.i", "hmin.i", "fscript", "makefile"]),
            start: FileSet::new(["start.d"]),
        }
    }

    /// Everything a run writes (data + partial + logs).
    pub fn run_output(&self) -> FileSet {
        FileSet::concat(&[&self.bulk_data, &self.partial, &self.logs])
    }

    /// Map an intent to its move/copy/remove lists.
    pub fn resolve(
        &self,
        intent: TransferIntent,
        manual: Option<&ManualSets>,
    ) -> Result<ResolvedSets, CustodyError> {
        let empty = FileSet::default;
        let (to_move, to_copy, to_delete) = match intent {
            TransferIntent::RunTransfer => (self.run_output(), self.support.clone(), self.start.clone()),
            TransferIntent::FullCopy => (
                empty(),
                FileSet::concat(&[&self.bulk_data, &self.partial, &self.logs, &self.support]),
                empty(),
            ),
            TransferIntent::DataCopy => (empty(), FileSet::concat(&[&self.bulk_data, &self.partial]), empty()),
            TransferIntent::PartialCopy => (
                empty(),
                FileSet::concat(&[&self.partial, &self.logs, &self.support]),
                empty(),
            ),
            TransferIntent::FullTransfer => (
                FileSet::concat(&[&self.bulk_data, &self.partial, &self.logs, &self.support]),
                empty(),
                empty(),
            ),
            TransferIntent::PartialTransfer => (
                FileSet::concat(&[&self.partial, &self.logs, &self.support]),
                empty(),
                empty(),
            ),
            TransferIntent::Purge => (
                empty(),
                empty(),
                FileSet::concat(&[&self.bulk_data, &self.partial, &self.logs, &self.start]),
            ),
            TransferIntent::Manual => match manual {
                Some(m) if !m.is_empty() => (m.to_move.clone(), m.to_copy.clone(), m.to_delete.clone()),
                _ => return Err(CustodyError::ManualListsMissing),
            },
        };
        Ok(ResolvedSets {
            to_move,
            to_copy,
            to_delete,
            label: intent.label(),
        })
    }
}
