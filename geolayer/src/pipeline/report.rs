//! Batch computation report.

use super::error::ComputeError;
use crate::layer::LayerId;
use std::fmt;

/// What happened to one kernel layer during a batch run.
#[derive(Debug, Clone, PartialEq)]
pub enum ComputeOutcome {
    /// The layer was derived and is now valid.
    Completed,
    /// The layer's own computation failed.
    Failed(ComputeError),
    /// The layer was skipped because a (transitive) source failed.
    Skipped { blocked_on: String },
}

/// One report line.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub id: LayerId,
    pub name: String,
    pub outcome: ComputeOutcome,
}

/// Per-layer outcomes of a [`Pipeline::compute_all`](crate::pipeline::Pipeline::compute_all)
/// run, in execution order.
#[derive(Debug, Clone, Default)]
pub struct ComputeReport {
    entries: Vec<ReportEntry>,
}

impl ComputeReport {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn push(&mut self, id: LayerId, name: String, outcome: ComputeOutcome) {
        self.entries.push(ReportEntry { id, name, outcome });
    }

    /// Entries in execution order.
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn completed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.outcome == ComputeOutcome::Completed)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, ComputeOutcome::Failed(_)))
            .count()
    }

    pub fn skipped_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, ComputeOutcome::Skipped { .. }))
            .count()
    }

    /// True when every kernel layer completed.
    pub fn is_clean(&self) -> bool {
        self.completed_count() == self.entries.len()
    }
}

impl fmt::Display for ComputeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} kernel layers: {} completed, {} failed, {} skipped",
            self.entries.len(),
            self.completed_count(),
            self.failed_count(),
            self.skipped_count()
        )?;
        for entry in &self.entries {
            match &entry.outcome {
                ComputeOutcome::Completed => writeln!(f, "  {} {}: ok", entry.id, entry.name)?,
                ComputeOutcome::Failed(err) => {
                    writeln!(f, "  {} {}: failed: {}", entry.id, entry.name, err)?
                }
                ComputeOutcome::Skipped { blocked_on } => writeln!(
                    f,
                    "  {} {}: skipped (blocked on '{}')",
                    entry.id, entry.name, blocked_on
                )?,
            }
        }
        Ok(())
    }
}
