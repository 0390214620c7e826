//! Integration tests for the git subprocess backend.
//!
//! These build scratch repositories with the system `git` and skip
//! gracefully when it is not installed.

use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use premerge::application::ConflictAnalyzer;
use premerge::domain::{AnalysisError, LineRange, Severity};
use premerge::infra::git::GitCli;
use tempfile::tempdir;

fn git(repo: &Path, args: &[&str]) -> bool {
    Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(args)
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn write_lines(repo: &Path, name: &str, lines: &[&str]) {
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(repo.join(name), content).unwrap();
}

/// Sets up a repo where `feature` and `main` both rewrite line 3 of a.txt
/// and `feature` additionally adds feat.txt.
///
/// Returns false when git is unavailable, so callers can skip.
fn setup_diverged_repo(repo: &Path) -> bool {
    if !git(repo, &["init", "-b", "main"]) {
        return false;
    }
    assert!(git(repo, &["config", "user.name", "Test User"]));
    assert!(git(repo, &["config", "user.email", "test@example.com"]));
    assert!(git(repo, &["config", "commit.gpgsign", "false"]));

    let base: Vec<String> = (1..=10).map(|n| format!("line {}", n)).collect();
    let base_refs: Vec<&str> = base.iter().map(String::as_str).collect();
    write_lines(repo, "a.txt", &base_refs);
    assert!(git(repo, &["add", "."]));
    assert!(git(repo, &["commit", "-m", "base"]));

    assert!(git(repo, &["checkout", "-b", "feature"]));
    let mut feature = base_refs.clone();
    feature[2] = "line 3 feature";
    write_lines(repo, "a.txt", &feature);
    write_lines(repo, "feat.txt", &["feature only"]);
    assert!(git(repo, &["add", "."]));
    assert!(git(repo, &["commit", "-m", "feature change"]));

    assert!(git(repo, &["checkout", "main"]));
    let mut mainline = base_refs.clone();
    mainline[2] = "line 3 main";
    write_lines(repo, "a.txt", &mainline);
    assert!(git(repo, &["add", "."]));
    assert!(git(repo, &["commit", "-m", "main change"]));

    true
}

#[tokio::test]
async fn predicts_high_conflict_on_real_repo() {
    let dir = tempdir().unwrap();
    if !setup_diverged_repo(dir.path()) {
        return; // Skip if git is not installed
    }

    let vcs = GitCli::new(dir.path()).unwrap();
    let analyzer = ConflictAnalyzer::new(Arc::new(vcs));
    let analysis = analyzer.analyze("feature", "main").await.unwrap();

    assert_eq!(analysis.conflicts.len(), 1);
    let conflict = &analysis.conflicts[0];
    assert_eq!(conflict.file, "a.txt");
    assert_eq!(conflict.severity, Severity::High);
    assert_eq!(conflict.source_range, LineRange::new(3, 3));
    assert_eq!(conflict.target_range, LineRange::new(3, 3));
    assert_eq!(conflict.source_text.as_deref(), Some("line 3 feature"));
    assert_eq!(conflict.target_text.as_deref(), Some("line 3 main"));
    assert_eq!(conflict.source_author, "Test User");
    assert!(!conflict.source_commit.is_empty());
    assert_ne!(conflict.source_commit, conflict.target_commit);

    assert_eq!(analysis.safe_files, vec!["feat.txt"]);
    assert_eq!(analysis.report().summary(), "1 potential conflicts: 1 high");
}

#[tokio::test]
async fn analysis_leaves_repository_state_untouched() {
    let dir = tempdir().unwrap();
    if !setup_diverged_repo(dir.path()) {
        return;
    }

    let vcs = GitCli::new(dir.path()).unwrap();
    let analyzer = ConflictAnalyzer::new(Arc::new(vcs));
    analyzer.analyze("feature", "main").await.unwrap();

    // Still on main with a clean worktree.
    let head = Command::new("git")
        .arg("-C")
        .arg(dir.path())
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .output()
        .unwrap();
    assert_eq!(String::from_utf8_lossy(&head.stdout).trim(), "main");

    let status = Command::new("git")
        .arg("-C")
        .arg(dir.path())
        .args(["status", "--porcelain"])
        .output()
        .unwrap();
    assert!(status.stdout.is_empty());
}

#[tokio::test]
async fn unrelated_histories_report_no_merge_base() {
    let dir = tempdir().unwrap();
    if !setup_diverged_repo(dir.path()) {
        return;
    }

    assert!(git(dir.path(), &["checkout", "--orphan", "lonely"]));
    assert!(git(dir.path(), &["commit", "--allow-empty", "-m", "orphan root"]));

    let vcs = GitCli::new(dir.path()).unwrap();
    let analyzer = ConflictAnalyzer::new(Arc::new(vcs));
    let result = analyzer.analyze("lonely", "main").await;

    assert!(matches!(result, Err(AnalysisError::NoMergeBase { .. })));
}

#[tokio::test]
async fn file_without_trailing_newline_still_classifies_same_line_high() {
    let dir = tempdir().unwrap();
    let repo = dir.path();
    if !git(repo, &["init", "-b", "main"]) {
        return; // Skip if git is not installed
    }
    assert!(git(repo, &["config", "user.name", "Test User"]));
    assert!(git(repo, &["config", "user.email", "test@example.com"]));
    assert!(git(repo, &["config", "commit.gpgsign", "false"]));

    // No trailing newline, so git emits "\ No newline at end of file".
    std::fs::write(repo.join("n.txt"), "one\ntwo\nthree").unwrap();
    assert!(git(repo, &["add", "."]));
    assert!(git(repo, &["commit", "-m", "base"]));

    assert!(git(repo, &["checkout", "-b", "feature"]));
    std::fs::write(repo.join("n.txt"), "one\ntwo\nthree feature").unwrap();
    assert!(git(repo, &["commit", "-am", "feature change"]));

    assert!(git(repo, &["checkout", "main"]));
    std::fs::write(repo.join("n.txt"), "one\ntwo\nthree main").unwrap();
    assert!(git(repo, &["commit", "-am", "main change"]));

    let vcs = GitCli::new(repo).unwrap();
    let analyzer = ConflictAnalyzer::new(Arc::new(vcs));
    let analysis = analyzer.analyze("feature", "main").await.unwrap();

    assert_eq!(analysis.conflicts.len(), 1);
    let conflict = &analysis.conflicts[0];
    assert_eq!(conflict.severity, Severity::High);
    assert_eq!(conflict.source_range, LineRange::new(3, 3));
    assert_eq!(conflict.source_text.as_deref(), Some("three feature"));
    assert_eq!(conflict.target_text.as_deref(), Some("three main"));
}

#[tokio::test]
async fn zero_context_diff_round_trips_through_backend() {
    use premerge::infra::git::VcsFacade;
    use premerge::infra::hunks::parse_zero_context_diff;

    let dir = tempdir().unwrap();
    if !setup_diverged_repo(dir.path()) {
        return;
    }

    let vcs = GitCli::new(dir.path()).unwrap();
    let base = vcs.merge_base("feature", "main").await.unwrap().unwrap();
    let diff = vcs.file_diff(&base, "feature", "a.txt").await.unwrap();

    let changes = parse_zero_context_diff(&diff);
    assert_eq!(changes.lines.iter().copied().collect::<Vec<_>>(), vec![3]);
    assert_eq!(changes.added[&3], "line 3 feature");
}
