use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Everything one branch did to a single file, relative to the merge base.
///
/// Owned by one branch's collection pass and rebuilt fresh per analysis.
/// Line numbers use the new file's numbering so both sides of a comparison
/// speak about the same coordinate space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileChange {
    /// File path relative to the repository root.
    pub path: String,
    /// Changed line numbers (additions and deletion positions).
    pub lines: BTreeSet<u32>,
    /// Added content keyed by line number. Deletions carry no content.
    pub added: BTreeMap<u32, String>,
    /// Last author to touch the file on this branch tip.
    pub last_author: String,
    /// Last commit touching the file on this branch tip.
    pub last_commit: String,
}

impl FileChange {
    /// Joins the added content for the given inclusive line range with
    /// newlines. Lines without stored content (deletions) are skipped.
    pub fn added_text_in_range(&self, start: u32, end: u32) -> String {
        self.added
            .range(start..=end)
            .map(|(_, content)| content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
