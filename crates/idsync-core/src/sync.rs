//! Export and import reconciliation
//!
//! This module implements one generic reconciliation algorithm over the
//! [`ResourceHandler`](crate::handler::ResourceHandler) capability set:
//! - export: list, merge synthetic entries, filter, download, template, write
//! - import: scan, list, delete unmatched, filter, fill, create or update
//!
//! Per-resource failures are recorded and the pass continues. Only a failed
//! `list()` (or an unreadable input directory) aborts a pass.

mod actions;
mod executor;
mod orchestrator;
mod policy;
mod reporting;

#[cfg(test)]
pub(crate) mod testing;

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

pub use actions::{ImportAction, ImportActionResolver};
pub use executor::ExportWriter;
pub use orchestrator::SyncEngine;
pub use policy::ExclusionPolicy;
pub use reporting::SyncReporter;

use crate::error::SyncError;

/// Why a resource was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkipReason {
    /// Filtered out by `include_only` / `exclude`
    Excluded,
    /// Local content could not be parsed or lacks its identifying field
    Invalid,
    /// Not a resource file (hidden or unsupported extension)
    NoOp,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excluded => write!(f, "excluded"),
            Self::Invalid => write!(f, "invalid content"),
            Self::NoOp => write!(f, "not a resource file"),
        }
    }
}

/// Mutation that a dry run would have performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlannedAction {
    /// Write an exported file
    Write,
    /// Create a resource on the server
    Create,
    /// Update a deployed resource
    Update,
    /// Delete a deployed resource
    Delete,
}

impl fmt::Display for PlannedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write => write!(f, "write"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Terminal outcome for one resource in one pass
#[derive(Debug)]
pub enum Outcome {
    /// Written to the given file
    Exported(PathBuf),
    /// Created on the server
    Created,
    /// Updated on the server
    Updated,
    /// Removed from the server
    Deleted,
    /// Left alone
    Skipped(SkipReason),
    /// Dry run: would have been performed
    Planned(PlannedAction),
    /// Operation failed
    Failed(SyncError),
}

/// A resource name paired with its outcome
#[derive(Debug)]
pub struct ResourceOutcome {
    /// Resource name (file-derived on import, server-reported on export)
    pub name: String,
    /// What happened to it
    pub outcome: Outcome,
}

/// Synchronization result with statistics
#[derive(Debug, Default)]
pub struct SyncResult {
    /// Files written
    pub exported: usize,
    /// Resources created
    pub created: usize,
    /// Resources updated
    pub updated: usize,
    /// Resources deleted
    pub deleted: usize,
    /// Resources skipped
    pub skipped: usize,
    /// Skip reasons with counts
    pub skip_reasons: BTreeMap<SkipReason, usize>,
    /// Dry-run actions with counts
    pub planned: usize,
    /// Errors encountered, attributed to resource names
    pub errors: Vec<String>,
    /// Non-fatal diagnostics
    pub warnings: Vec<String>,
    /// Every outcome in processing order
    pub outcomes: Vec<ResourceOutcome>,
    /// The pass stopped early because of an interrupt
    pub interrupted: bool,
}

impl SyncResult {
    /// Record the terminal outcome of one resource
    pub fn record(&mut self, name: impl Into<String>, outcome: Outcome) {
        match &outcome {
            Outcome::Exported(_) => self.exported += 1,
            Outcome::Created => self.created += 1,
            Outcome::Updated => self.updated += 1,
            Outcome::Deleted => self.deleted += 1,
            Outcome::Skipped(reason) => {
                self.skipped += 1;
                *self.skip_reasons.entry(*reason).or_insert(0) += 1;
            }
            Outcome::Planned(_) => self.planned += 1,
            Outcome::Failed(err) => self.errors.push(err.to_string()),
        }
        self.outcomes.push(ResourceOutcome {
            name: name.into(),
            outcome,
        });
    }

    /// Outcome recorded for a resource name, if any
    #[must_use]
    pub fn outcome_of(&self, name: &str) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .find(|o| o.name == name)
            .map(|o| &o.outcome)
    }

    /// Total operations performed
    #[must_use]
    pub const fn total_operations(&self) -> usize {
        self.exported + self.created + self.updated + self.deleted
    }

    /// Whether the pass completed with no failures
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.errors.is_empty() && !self.interrupted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_updates_counters() {
        let mut result = SyncResult::default();
        result.record("A", Outcome::Created);
        result.record("B", Outcome::Skipped(SkipReason::Excluded));
        result.record("C", Outcome::Skipped(SkipReason::Excluded));
        result.record(
            "D",
            Outcome::Failed(SyncError::Server {
                resource: "D".to_string(),
            }),
        );

        assert_eq!(result.created, 1);
        assert_eq!(result.skipped, 2);
        assert_eq!(result.skip_reasons[&SkipReason::Excluded], 2);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("D:"));
        assert!(!result.is_success());
        assert!(matches!(result.outcome_of("A"), Some(Outcome::Created)));
        assert!(result.outcome_of("Z").is_none());
    }

    #[test]
    fn test_interrupted_is_not_success() {
        let result = SyncResult {
            interrupted: true,
            ..SyncResult::default()
        };
        assert!(!result.is_success());
    }
}
