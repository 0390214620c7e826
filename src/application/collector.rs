//! Per-branch change-set collection.
//!
//! Builds one `FileChange` map per branch relative to the common ancestor.
//! The merge-base lookup is structural: without it there is nothing to
//! compare and the whole analysis aborts. Per-file lookups are not: a file
//! whose diff, author, or commit lookup fails is dropped from its side and
//! remembered as failed, so classification can keep it out of the safe list
//! too. Degrading precision is acceptable; fabricating a conflict or a safe
//! verdict is not.

use futures::StreamExt;
use futures::stream;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use crate::domain::{AnalysisError, FileChange};
use crate::infra::git::VcsFacade;
use crate::infra::hunks::parse_zero_context_diff;

/// Cap on concurrent per-file lookups within one branch side.
pub const MAX_FILE_LOOKUPS: usize = 8;

/// One branch's changes relative to the merge base.
#[derive(Debug, Clone, Default)]
pub struct BranchChanges {
    /// Per-file changes keyed by path.
    pub changes: HashMap<String, FileChange>,
    /// Files whose lookups failed; excluded from all classification.
    pub failed: BTreeSet<String>,
}

/// Orchestrates VCS calls to build both branch change-sets.
pub struct BranchChangeCollector {
    vcs: Arc<dyn VcsFacade>,
}

impl BranchChangeCollector {
    pub fn new(vcs: Arc<dyn VcsFacade>) -> Self {
        Self { vcs }
    }

    /// Collects both sides relative to their merge base.
    ///
    /// Returns the ancestor commit id and the two change-sets. Fails with
    /// [`AnalysisError::NoMergeBase`] when the histories are unrelated.
    pub async fn collect(
        &self,
        source: &str,
        target: &str,
    ) -> Result<(String, BranchChanges, BranchChanges), AnalysisError> {
        let ancestor = self
            .vcs
            .merge_base(source, target)
            .await?
            .ok_or_else(|| AnalysisError::NoMergeBase {
                source_branch: source.to_string(),
                target_branch: target.to_string(),
            })?;

        log::debug!(
            "merge base of {} and {} is {}",
            source,
            target,
            ancestor
        );

        let (source_changes, target_changes) = tokio::try_join!(
            self.collect_side(&ancestor, source),
            self.collect_side(&ancestor, target),
        )?;

        Ok((ancestor, source_changes, target_changes))
    }

    /// Collects one branch side under a bounded worker pool.
    async fn collect_side(
        &self,
        ancestor: &str,
        head: &str,
    ) -> Result<BranchChanges, AnalysisError> {
        let files = self.vcs.changed_files(ancestor, head).await?;
        log::debug!("{} files changed on {} since {}", files.len(), head, ancestor);

        let mut side = BranchChanges::default();
        let mut lookups = stream::iter(files.into_iter().map(|path| {
            let vcs = Arc::clone(&self.vcs);
            let ancestor = ancestor.to_string();
            let head = head.to_string();
            async move {
                let result = collect_file(vcs.as_ref(), &ancestor, &head, &path).await;
                (path, result)
            }
        }))
        .buffer_unordered(MAX_FILE_LOOKUPS);

        while let Some((path, result)) = lookups.next().await {
            match result {
                Ok(change) => {
                    side.changes.insert(path, change);
                }
                Err(err) => {
                    log::warn!("dropping {} on {}: {:#}", path, head, err);
                    side.failed.insert(path);
                }
            }
        }

        Ok(side)
    }
}

/// Fetches diff, author, and commit for one file on one branch tip.
async fn collect_file(
    vcs: &dyn VcsFacade,
    ancestor: &str,
    head: &str,
    path: &str,
) -> anyhow::Result<FileChange> {
    let (diff, last_author, last_commit) = tokio::try_join!(
        vcs.file_diff(ancestor, head, path),
        vcs.last_author(head, path),
        vcs.last_commit(head, path),
    )?;

    let hunks = parse_zero_context_diff(&diff);
    Ok(FileChange {
        path: path.to_string(),
        lines: hunks.lines,
        added: hunks.added,
        last_author,
        last_commit,
    })
}
