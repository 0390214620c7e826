//! Domain error types for pre-merge analysis.
//!
//! Only structural failures surface here: they abort the entire analysis
//! with no report produced. Per-file lookup failures are absorbed inside
//! the collector and never reach the caller.

use thiserror::Error;

/// Failure of a whole analysis call.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The two refs share no common ancestor (unrelated histories).
    #[error("no merge base between '{source_branch}' and '{target_branch}': unrelated histories")]
    NoMergeBase {
        source_branch: String,
        target_branch: String,
    },

    /// A structural VCS failure, e.g. listing changed files for a side.
    #[error("version control backend failed: {0}")]
    Vcs(#[from] anyhow::Error),
}
