//! Analysis result and its derived report.
//!
//! A `ConflictAnalysis` is ephemeral: it is valid for the lifetime of the
//! call that produced it and is never persisted.

use serde::{Deserialize, Serialize};

use super::conflict::{PotentialConflict, Severity};

/// Outcome of one pre-merge analysis between two branches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConflictAnalysis {
    /// Branch being merged.
    pub source_branch: String,
    /// Branch being merged into.
    pub target_branch: String,
    /// Predicted conflicts, ordered by severity rank then file path.
    pub conflicts: Vec<PotentialConflict>,
    /// Files touched by exactly one side; cannot conflict.
    pub safe_files: Vec<String>,
    /// When the analysis ran (RFC3339).
    pub analyzed_at: String,
}

impl ConflictAnalysis {
    pub fn report(&self) -> ConflictReport {
        ConflictReport::from_conflicts(&self.conflicts)
    }
}

/// Aggregated counts over a conflict list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictReport {
    pub high_count: usize,
    pub medium_count: usize,
    pub low_count: usize,
}

impl ConflictReport {
    pub fn from_conflicts(conflicts: &[PotentialConflict]) -> Self {
        let mut report = Self {
            high_count: 0,
            medium_count: 0,
            low_count: 0,
        };
        for conflict in conflicts {
            match conflict.severity {
                Severity::High => report.high_count += 1,
                Severity::Medium => report.medium_count += 1,
                Severity::Low => report.low_count += 1,
            }
        }
        report
    }

    pub fn total(&self) -> usize {
        self.high_count + self.medium_count + self.low_count
    }

    pub fn has_conflicts(&self) -> bool {
        self.total() > 0
    }

    /// One-line summary. Zero-valued severities are omitted from the joined
    /// clause, e.g. "3 potential conflicts: 2 high, 1 low".
    pub fn summary(&self) -> String {
        if !self.has_conflicts() {
            return "No conflicts detected. Safe to merge!".to_string();
        }

        let mut parts = Vec::new();
        if self.high_count > 0 {
            parts.push(format!("{} high", self.high_count));
        }
        if self.medium_count > 0 {
            parts.push(format!("{} medium", self.medium_count));
        }
        if self.low_count > 0 {
            parts.push(format!("{} low", self.low_count));
        }

        format!("{} potential conflicts: {}", self.total(), parts.join(", "))
    }
}
