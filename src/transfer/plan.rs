//! Transfer plan: the requested lists reconciled against a source listing.

use std::collections::{BTreeSet, HashSet};

use crate::catalog::{FileSet, ResolvedSets};

/// One category (move, copy or remove) after filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPlan {
    /// How many names the intent asked for.
    pub requested: usize,
    /// The requested names that exist in the source, in request order.
    pub files: Vec<String>,
}

impl CategoryPlan {
    pub fn found(&self) -> usize {
        self.files.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    pub label: &'static str,
    pub to_move: CategoryPlan,
    pub to_copy: CategoryPlan,
    pub to_delete: CategoryPlan,
}

/// Keep the requested names that appear in `present`. Request order is kept
/// and repeated names collapse to their first occurrence, so filtering an
/// already-filtered list gives the same list back.
pub fn filter_files(requested: &FileSet, present: &BTreeSet<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    requested
        .iter()
        .filter(|name| present.contains(*name) && seen.insert(*name))
        .map(str::to_string)
        .collect()
}

impl TransferPlan {
    pub fn build(resolved: &ResolvedSets, present: &BTreeSet<String>) -> Self {
        let category = |set: &FileSet| CategoryPlan {
            requested: set.len(),
            files: filter_files(set, present),
        };
        Self {
            label: resolved.label,
            to_move: category(&resolved.to_move),
            to_copy: category(&resolved.to_copy),
            to_delete: category(&resolved.to_delete),
        }
    }

    pub fn total_found(&self) -> usize {
        self.to_move.found() + self.to_copy.found() + self.to_delete.found()
    }

    pub fn is_empty(&self) -> bool {
        self.total_found() == 0
    }
}
