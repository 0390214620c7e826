//! Git subprocess backend.
//!
//! Shells out to the `git` binary with `-C <repo>` for every lookup. Calls
//! are bounded two ways: a shared semaphore caps how many git processes run
//! at once, and each call carries a timeout so a pathological repository
//! cannot stall an analysis indefinitely. Spawned processes are killed when
//! their future is dropped, so cancelling an analysis reaps its children.

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::Semaphore;

use super::VcsFacade;

/// Default cap on concurrent git subprocesses.
pub const DEFAULT_MAX_PROCESSES: usize = 8;

/// Default per-call timeout.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Production [`VcsFacade`] backed by the `git` CLI.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_path: PathBuf,
    git_bin: PathBuf,
    call_timeout: Duration,
    permits: Arc<Semaphore>,
}

impl GitCli {
    /// Creates a backend for the given repository, locating `git` on PATH.
    pub fn new(repo_path: impl Into<PathBuf>) -> Result<Self> {
        let git_bin = which::which("git").context("locate git binary on PATH")?;
        Ok(Self {
            repo_path: repo_path.into(),
            git_bin,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            permits: Arc::new(Semaphore::new(DEFAULT_MAX_PROCESSES)),
        })
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_max_processes(mut self, max: usize) -> Self {
        self.permits = Arc::new(Semaphore::new(max.max(1)));
        self
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// Runs one git invocation under the process cap and call timeout.
    async fn run(&self, args: &[&str]) -> Result<Output> {
        let _permit = self
            .permits
            .acquire()
            .await
            .context("git process pool closed")?;

        let future = Command::new(&self.git_bin)
            .arg("-C")
            .arg(&self.repo_path)
            .args(args)
            .kill_on_drop(true)
            .output();

        match tokio::time::timeout(self.call_timeout, future).await {
            Ok(result) => result.with_context(|| format!("spawn git {}", args.join(" "))),
            Err(_) => Err(anyhow!(
                "git {} timed out after {:?}",
                args.join(" "),
                self.call_timeout
            )),
        }
    }

    /// Runs git and returns trimmed stdout, failing on non-zero exit.
    async fn run_expecting_success(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("git {} failed: {}", args.join(" "), stderr.trim());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl VcsFacade for GitCli {
    async fn merge_base(&self, a: &str, b: &str) -> Result<Option<String>> {
        let output = self.run(&["merge-base", a, b]).await?;
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();

        if output.status.success() && !stdout.is_empty() {
            return Ok(Some(stdout));
        }

        // Exit code 1 with empty output means unrelated histories; anything
        // else (bad ref, not a repository) is a real error.
        if output.status.code() == Some(1) && stdout.is_empty() {
            return Ok(None);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("git merge-base {} {} failed: {}", a, b, stderr.trim())
    }

    async fn changed_files(&self, base: &str, head: &str) -> Result<Vec<String>> {
        let stdout = self
            .run_expecting_success(&["diff", "--name-only", base, head])
            .await?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn file_diff(&self, base: &str, head: &str, path: &str) -> Result<String> {
        self.run_expecting_success(&["diff", "--unified=0", base, head, "--", path])
            .await
    }

    async fn last_author(&self, head: &str, path: &str) -> Result<String> {
        let author = self
            .run_expecting_success(&["log", "-1", "--format=%an", head, "--", path])
            .await?;
        if author.is_empty() {
            bail!("no commits touch '{}' on '{}'", path, head);
        }
        Ok(author)
    }

    async fn last_commit(&self, head: &str, path: &str) -> Result<String> {
        let commit = self
            .run_expecting_success(&["log", "-1", "--format=%H", head, "--", path])
            .await?;
        if commit.is_empty() {
            bail!("no commits touch '{}' on '{}'", path, head);
        }
        Ok(commit)
    }
}
