//! Version-control access for the analysis engine.
//!
//! All VCS access goes through the [`VcsFacade`] trait so the collector and
//! classifier can be exercised against a scripted fake backend without
//! spawning real subprocesses. [`GitCli`] is the production implementation.

pub mod cli;

pub use cli::GitCli;

use anyhow::Result;
use async_trait::async_trait;

/// Asynchronous, fallible façade over the version-control system.
///
/// Every method is a point lookup; callers decide how failures propagate.
/// `merge_base` returns `Ok(None)` when the two refs share no common
/// ancestor, which is a structural condition rather than an IO error.
#[async_trait]
pub trait VcsFacade: Send + Sync {
    /// Common ancestor commit of two refs, or `None` for unrelated histories.
    async fn merge_base(&self, a: &str, b: &str) -> Result<Option<String>>;

    /// Paths changed between `base` and `head`.
    async fn changed_files(&self, base: &str, head: &str) -> Result<Vec<String>>;

    /// Zero-context unified diff for one file between `base` and `head`.
    async fn file_diff(&self, base: &str, head: &str, path: &str) -> Result<String>;

    /// Author of the last commit touching `path` on `head`.
    async fn last_author(&self, head: &str, path: &str) -> Result<String>;

    /// Id of the last commit touching `path` on `head`.
    async fn last_commit(&self, head: &str, path: &str) -> Result<String>;
}
