//! Zero-context diff parsing for a single file.
//!
//! Works on `git diff --unified=0` output, where every hunk line is an edit
//! and new-file line numbers map directly to edit locations.

use std::collections::{BTreeMap, BTreeSet};

/// Changed positions extracted from one file's zero-context diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HunkChanges {
    /// Changed line numbers in the new file's numbering.
    pub lines: BTreeSet<u32>,
    /// Added content keyed by line number. Deletions carry no content.
    pub added: BTreeMap<u32, String>,
}

impl HunkChanges {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Parses a zero-context unified diff for one file into changed-line
/// positions and added content.
///
/// A hunk header resets the cursor to the new-file start line. An addition
/// records the cursor and advances it; a deletion records the current cursor
/// as a changed position without advancing; anything else is context and
/// only advances. Binary-file diffs and empty input yield empty results so
/// they are never mistaken for changes.
pub fn parse_zero_context_diff(diff_text: &str) -> HunkChanges {
    let mut changes = HunkChanges::default();
    let mut cursor: u32 = 0;
    let mut in_hunk = false;

    for line in diff_text.lines() {
        if line.starts_with("@@") {
            match parse_hunk_header(line) {
                Some(new_start) => {
                    cursor = new_start;
                    in_hunk = true;
                }
                None => {
                    log::warn!("skipping malformed hunk header: {}", line);
                    in_hunk = false;
                }
            }
            continue;
        }

        if !in_hunk {
            // File headers, index lines, "Binary files ... differ".
            continue;
        }

        if line.starts_with('+') && !line.starts_with("+++") {
            changes.lines.insert(cursor);
            changes.added.insert(cursor, line[1..].to_string());
            cursor += 1;
        } else if line.starts_with('-') && !line.starts_with("---") {
            changes.lines.insert(cursor);
        } else if line.starts_with('\\') {
            // "\ No newline at end of file" annotates the previous line and
            // occupies no position in either file.
        } else {
            cursor += 1;
        }
    }

    changes
}

/// Extracts the new-file start line from a hunk header.
///
/// Format: `@@ -old_start[,old_count] +new_start[,new_count] @@ ...`
/// The count is optional when the hunk covers a single line.
fn parse_hunk_header(line: &str) -> Option<u32> {
    let new_part = line
        .split_whitespace()
        .find(|part| part.starts_with('+'))?;
    let start = new_part[1..].split(',').next()?;
    start.parse().ok()
}
