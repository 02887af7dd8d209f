//! Sync pass reporting and statistics

use std::fmt::Write;

use super::SyncResult;
use crate::resource::ResourceKind;

/// Sync pass reporter
pub struct SyncReporter;

impl SyncReporter {
    /// Generate a summary report for one resource type
    #[must_use]
    pub fn generate_summary(kind: ResourceKind, result: &SyncResult) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "\n=== {kind} ===");
        if result.exported > 0 {
            let _ = writeln!(output, "Exported: {}", result.exported);
        }
        let _ = writeln!(output, "Created:  {}", result.created);
        let _ = writeln!(output, "Updated:  {}", result.updated);
        let _ = writeln!(output, "Deleted:  {}", result.deleted);

        let _ = write!(output, "Skipped:  {}", result.skipped);
        for (reason, count) in &result.skip_reasons {
            let _ = write!(output, " ({reason}: {count})");
        }
        let _ = writeln!(output);

        if result.planned > 0 {
            let _ = writeln!(output, "Planned:  {} (dry run)", result.planned);
        }

        if !result.warnings.is_empty() {
            let _ = writeln!(output, "\nWarnings ({}):", result.warnings.len());
            for warning in &result.warnings {
                let _ = writeln!(output, "  - {warning}");
            }
        }

        if !result.errors.is_empty() {
            let _ = writeln!(output, "\nErrors ({}):", result.errors.len());
            for error in &result.errors {
                let _ = writeln!(output, "  - {error}");
            }
        }

        let _ = writeln!(output, "\nTotal operations: {}", result.total_operations());

        if result.interrupted {
            output.push_str("Status: ✗ Interrupted\n");
        } else if result.is_success() {
            output.push_str("Status: ✓ Success\n");
        } else {
            output.push_str("Status: ✗ Completed with errors\n");
        }

        output
    }
}
