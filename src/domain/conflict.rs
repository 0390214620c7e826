use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Conflict-risk classification for a predicted collision.
///
/// HIGH means both branches touched the same lines and a textual merge will
/// stop; MEDIUM means the changes sit close enough that three-way merge
/// context is likely to collide; LOW means the branches touched the same
/// file in unrelated regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Ordinal rank used for sorting conflicts. Higher rank sorts first.
    ///
    /// Sorting must never rely on the label text: alphabetically
    /// "high" < "low" < "medium", which inverts the intended order.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::High => 2,
            Severity::Medium => 1,
            Severity::Low => 0,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LOW" => Ok(Severity::Low),
            "MEDIUM" => Ok(Severity::Medium),
            "HIGH" => Ok(Severity::High),
            other => Err(format!("unknown severity: {}", other)),
        }
    }
}

/// Inclusive range of line numbers in new-file numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Single-line range.
    pub fn single(line: u32) -> Self {
        Self {
            start: line,
            end: line,
        }
    }

    pub fn contains(&self, line: u32) -> bool {
        line >= self.start && line <= self.end
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// A predicted collision between two branches in one file.
///
/// Produced once by classification and never mutated. `source_text` and
/// `target_text` carry the overlapping added lines from each side and are
/// populated only for HIGH conflicts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PotentialConflict {
    /// File path relative to the repository root.
    pub file: String,
    /// Branch being merged.
    pub source_branch: String,
    /// Branch being merged into.
    pub target_branch: String,
    /// Changed line range on the source branch.
    pub source_range: LineRange,
    /// Changed line range on the target branch.
    pub target_range: LineRange,
    /// Last author to touch the file on the source branch tip.
    pub source_author: String,
    /// Last author to touch the file on the target branch tip.
    pub target_author: String,
    /// Last commit touching the file on the source branch tip.
    pub source_commit: String,
    /// Last commit touching the file on the target branch tip.
    pub target_commit: String,
    pub severity: Severity,
    /// Overlapping added text from the source side (HIGH only).
    pub source_text: Option<String>,
    /// Overlapping added text from the target side (HIGH only).
    pub target_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_rank_order() {
        assert!(Severity::High.rank() > Severity::Medium.rank());
        assert!(Severity::Medium.rank() > Severity::Low.rank());
    }

    #[test]
    fn test_severity_display_parse() {
        assert_eq!(Severity::High.to_string(), "HIGH");
        assert_eq!(Severity::from_str("medium").unwrap(), Severity::Medium);
        assert!(Severity::from_str("critical").is_err());
    }

    #[test]
    fn test_line_range_display() {
        assert_eq!(LineRange::single(42).to_string(), "42");
        assert_eq!(LineRange::new(10, 14).to_string(), "10-14");
    }

    #[test]
    fn test_line_range_contains() {
        let range = LineRange::new(5, 7);
        assert!(range.contains(5));
        assert!(range.contains(7));
        assert!(!range.contains(8));
    }
}
