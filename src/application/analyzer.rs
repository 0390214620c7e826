//! Analysis entry point.
//!
//! One `analyze` call is a pure function of (source ref, target ref,
//! repository): it holds no state across calls, so independent analyses of
//! different branch pairs can run in parallel. The only shared resource is
//! the injected VCS backend, which bounds its own process pool.

use std::sync::Arc;

use super::classifier::{ConflictClassifier, DEFAULT_ADJACENCY_THRESHOLD};
use super::collector::BranchChangeCollector;
use crate::domain::{AnalysisError, ConflictAnalysis};
use crate::infra::git::VcsFacade;

/// Predicts merge conflicts between two branches without touching the
/// working tree or repository state.
pub struct ConflictAnalyzer {
    vcs: Arc<dyn VcsFacade>,
    threshold: u32,
}

impl ConflictAnalyzer {
    pub fn new(vcs: Arc<dyn VcsFacade>) -> Self {
        Self {
            vcs,
            threshold: DEFAULT_ADJACENCY_THRESHOLD,
        }
    }

    /// Overrides the adjacency threshold used for MEDIUM classification.
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Runs one analysis of merging `source` into `target`.
    ///
    /// All-or-nothing: a structural failure yields an error and no report;
    /// per-file data loss degrades precision silently. The returned report
    /// is deterministically ordered, so repeated runs on unchanged refs are
    /// structurally identical.
    pub async fn analyze(
        &self,
        source: &str,
        target: &str,
    ) -> Result<ConflictAnalysis, AnalysisError> {
        log::info!("analyzing merge of {} into {}", source, target);

        let collector = BranchChangeCollector::new(Arc::clone(&self.vcs));
        let (ancestor, source_changes, target_changes) = collector.collect(source, target).await?;

        let classifier =
            ConflictClassifier::new(source, target).with_threshold(self.threshold);
        let (conflicts, safe_files) = classifier.classify(&source_changes, &target_changes);

        log::info!(
            "analysis of {}..{} (base {}): {} conflicts, {} safe files",
            source,
            target,
            ancestor,
            conflicts.len(),
            safe_files.len()
        );

        Ok(ConflictAnalysis {
            source_branch: source.to_string(),
            target_branch: target.to_string(),
            conflicts,
            safe_files,
            analyzed_at: chrono::Utc::now().to_rfc3339(),
        })
    }
}
