//! Severity classification of two branch change-sets.
//!
//! Compares the two sides file by file. Files touched by both sides become
//! conflicts; files touched by exactly one side are safe. A file that
//! failed collection on either side is neither: verdicts are never invented
//! for partial data.

use std::collections::BTreeSet;

use super::collector::BranchChanges;
use crate::domain::{FileChange, LineRange, PotentialConflict, Severity};

/// Default adjacency threshold in lines, boundary inclusive.
pub const DEFAULT_ADJACENCY_THRESHOLD: u32 = 3;

/// Compares two change-sets and emits severity-tagged conflicts.
pub struct ConflictClassifier {
    source_branch: String,
    target_branch: String,
    threshold: u32,
}

impl ConflictClassifier {
    pub fn new(source_branch: impl Into<String>, target_branch: impl Into<String>) -> Self {
        Self {
            source_branch: source_branch.into(),
            target_branch: target_branch.into(),
            threshold: DEFAULT_ADJACENCY_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Classifies the two sides into conflicts and safe files.
    ///
    /// The conflict list is deterministically ordered by severity rank
    /// (highest first), then file path, then source range. Safe files are
    /// sorted by path.
    pub fn classify(
        &self,
        source: &BranchChanges,
        target: &BranchChanges,
    ) -> (Vec<PotentialConflict>, Vec<String>) {
        let mut conflicts = Vec::new();
        let mut safe_files = Vec::new();

        let mut all_paths: BTreeSet<&String> =
            source.changes.keys().chain(target.changes.keys()).collect();
        // Lookup failures disqualify a file from any verdict.
        all_paths.retain(|path| !source.failed.contains(*path) && !target.failed.contains(*path));

        for path in all_paths {
            match (source.changes.get(path), target.changes.get(path)) {
                (Some(source_change), Some(target_change)) => {
                    self.classify_file(source_change, target_change, &mut conflicts);
                }
                (Some(_), None) | (None, Some(_)) => {
                    safe_files.push(path.clone());
                }
                (None, None) => unreachable!("path came from one of the maps"),
            }
        }

        conflicts.sort_by(|a, b| {
            b.severity
                .rank()
                .cmp(&a.severity.rank())
                .then_with(|| a.file.cmp(&b.file))
                .then_with(|| a.source_range.start.cmp(&b.source_range.start))
                .then_with(|| a.target_range.start.cmp(&b.target_range.start))
        });

        (conflicts, safe_files)
    }

    /// Classifies one file touched by both sides.
    fn classify_file(
        &self,
        source: &FileChange,
        target: &FileChange,
        conflicts: &mut Vec<PotentialConflict>,
    ) {
        let overlap: BTreeSet<u32> = source.lines.intersection(&target.lines).copied().collect();

        if !overlap.is_empty() {
            for run in contiguous_runs(&overlap) {
                conflicts.push(self.conflict(
                    source,
                    target,
                    run,
                    run,
                    Severity::High,
                    Some(source.added_text_in_range(run.start, run.end)),
                    Some(target.added_text_in_range(run.start, run.end)),
                ));
            }
            return;
        }

        let adjacent = adjacent_pairs(&source.lines, &target.lines, self.threshold);
        if !adjacent.is_empty() {
            for (source_line, target_line) in adjacent {
                conflicts.push(self.conflict(
                    source,
                    target,
                    LineRange::single(source_line),
                    LineRange::single(target_line),
                    Severity::Medium,
                    None,
                    None,
                ));
            }
            return;
        }

        // Same file, unrelated regions: one informational conflict spanning
        // each side's full changed extent.
        if let (Some(source_span), Some(target_span)) = (span(&source.lines), span(&target.lines)) {
            conflicts.push(self.conflict(
                source,
                target,
                source_span,
                target_span,
                Severity::Low,
                None,
                None,
            ));
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn conflict(
        &self,
        source: &FileChange,
        target: &FileChange,
        source_range: LineRange,
        target_range: LineRange,
        severity: Severity,
        source_text: Option<String>,
        target_text: Option<String>,
    ) -> PotentialConflict {
        PotentialConflict {
            file: source.path.clone(),
            source_branch: self.source_branch.clone(),
            target_branch: self.target_branch.clone(),
            source_range,
            target_range,
            source_author: source.last_author.clone(),
            target_author: target.last_author.clone(),
            source_commit: source.last_commit.clone(),
            target_commit: target.last_commit.clone(),
            severity,
            source_text,
            target_text,
        }
    }
}

/// Groups a sorted line set into maximal contiguous runs.
fn contiguous_runs(lines: &BTreeSet<u32>) -> Vec<LineRange> {
    let mut runs = Vec::new();
    let mut iter = lines.iter().copied();

    let Some(first) = iter.next() else {
        return runs;
    };
    let mut start = first;
    let mut end = first;

    for line in iter {
        if line == end + 1 {
            end = line;
        } else {
            runs.push(LineRange::new(start, end));
            start = line;
            end = line;
        }
    }
    runs.push(LineRange::new(start, end));
    runs
}

/// Finds all (source, target) line pairs within the threshold, excluding
/// exact matches.
///
/// Two-pointer sweep over both sorted sets instead of a nested scan, so
/// large hunks stay near-linear while producing the same pairs. Pairs come
/// out ordered by (source, target) line.
fn adjacent_pairs(
    source_lines: &BTreeSet<u32>,
    target_lines: &BTreeSet<u32>,
    threshold: u32,
) -> Vec<(u32, u32)> {
    let targets: Vec<u32> = target_lines.iter().copied().collect();
    let mut pairs = Vec::new();
    let mut window_start = 0usize;

    for &source_line in source_lines {
        let low = source_line.saturating_sub(threshold);
        while window_start < targets.len() && targets[window_start] < low {
            window_start += 1;
        }
        for &target_line in &targets[window_start..] {
            if target_line > source_line + threshold {
                break;
            }
            if target_line != source_line {
                pairs.push((source_line, target_line));
            }
        }
    }

    pairs
}

/// Inclusive min..max span of a line set.
fn span(lines: &BTreeSet<u32>) -> Option<LineRange> {
    let start = *lines.first()?;
    let end = *lines.last()?;
    Some(LineRange::new(start, end))
}
