//! Version-control client.
//!
//! [`VcsClient`] is the seam between the reconciler and git. The production
//! implementation, [`GitCli`], shells out to the `git` binary. Every
//! invocation is scoped to an explicit working directory; nothing depends on
//! the process's own current directory.
//!
//! Clone and pull run without a timeout because the run cannot proceed
//! without them. The read-only commands used for update probing (`fetch`,
//! `rev-list`) run under [`SyncConfig::command_timeout`] and are killed when
//! it expires.
//!
//! [`SyncConfig::command_timeout`]: crate::config::SyncConfig::command_timeout

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Result, SyncError};

/// Commit counts between local `HEAD` and its upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Divergence {
    /// Local commits not on the upstream.
    pub ahead: u32,
    /// Upstream commits not in local `HEAD`.
    pub behind: u32,
}

/// Operations the sync core needs from a version-control system.
#[async_trait]
pub trait VcsClient: Send + Sync {
    /// Clone `url` into `dest`, which must not exist yet.
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()>;

    /// The revision `HEAD` currently points at.
    fn head(&self, dir: &Path) -> Result<String>;

    /// Fast-forward `dir` to its upstream.
    fn pull(&self, dir: &Path) -> Result<()>;

    /// Fetch from the upstream without touching the working tree, then count
    /// commits on each side.
    async fn remote_divergence(&self, dir: &Path) -> Result<Divergence>;
}

/// Whether `dir` is a git working tree root.
pub fn is_git_repo(dir: &Path) -> bool {
    dir.join(".git").exists()
}

/// [`VcsClient`] backed by the `git` binary.
#[derive(Debug, Clone)]
pub struct GitCli {
    command_timeout: Duration,
}

impl GitCli {
    pub fn new(command_timeout: Duration) -> Self {
        Self { command_timeout }
    }

    fn run(&self, args: &[&str], cwd: &Path) -> Result<String> {
        tracing::debug!(args = ?args, cwd = %cwd.display(), "running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| external(args, cwd, format!("failed to spawn git: {e}")))?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
        } else {
            Err(external(args, cwd, error_detail(&output.stdout, &output.stderr)))
        }
    }

    async fn run_timed(&self, args: &[&str], cwd: &Path) -> Result<String> {
        tracing::debug!(args = ?args, cwd = %cwd.display(), "running git (timed)");
        let child = tokio::process::Command::new("git")
            .args(args)
            .current_dir(cwd)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| external(args, cwd, format!("failed to spawn git: {e}")))?;

        // On timeout the child is dropped and killed via `kill_on_drop(true)`.
        let output = match tokio::time::timeout(self.command_timeout, child.wait_with_output())
            .await
        {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(external(args, cwd, format!("process error: {e}"))),
            Err(_) => {
                tracing::warn!(
                    args = ?args,
                    cwd = %cwd.display(),
                    timeout_secs = self.command_timeout.as_secs(),
                    "git command timed out"
                );
                return Err(SyncError::Timeout {
                    command: format!("git {}", args.join(" ")),
                    seconds: self.command_timeout.as_secs(),
                });
            }
        };

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
        } else {
            Err(external(args, cwd, error_detail(&output.stdout, &output.stderr)))
        }
    }
}

#[async_trait]
impl VcsClient for GitCli {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
        let parent = dest.parent().unwrap_or(dest);
        let dest_str = dest.to_string_lossy();
        self.run(&["clone", "--quiet", url, dest_str.as_ref()], parent)?;
        tracing::info!(url = %url, dest = %dest.display(), "repository cloned");
        Ok(())
    }

    fn head(&self, dir: &Path) -> Result<String> {
        self.run(&["rev-parse", "HEAD"], dir)
    }

    fn pull(&self, dir: &Path) -> Result<()> {
        self.run(&["pull", "--ff-only", "--quiet"], dir).map(|_| ())
    }

    async fn remote_divergence(&self, dir: &Path) -> Result<Divergence> {
        self.run_timed(&["fetch", "--quiet"], dir).await?;
        let counts = self
            .run_timed(&["rev-list", "--left-right", "--count", "HEAD...@{upstream}"], dir)
            .await?;
        parse_left_right(&counts).ok_or_else(|| {
            external(
                &["rev-list"],
                dir,
                format!("unexpected rev-list output: {counts:?}"),
            )
        })
    }
}

/// Parse `git rev-list --left-right --count A...B` output (`"<left>\t<right>"`).
pub fn parse_left_right(output: &str) -> Option<Divergence> {
    let mut parts = output.split_whitespace();
    let ahead = parts.next()?.parse().ok()?;
    let behind = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Divergence { ahead, behind })
}

fn external(args: &[&str], cwd: &Path, detail: String) -> SyncError {
    SyncError::ExternalTool {
        command: format!("git {}", args.join(" ")),
        dir: cwd.to_path_buf(),
        detail,
    }
}

fn error_detail(stdout: &[u8], stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr).trim().to_string();
    if !stderr.is_empty() {
        return stderr;
    }
    let stdout = String::from_utf8_lossy(stdout).trim().to_string();
    if !stdout.is_empty() {
        return stdout;
    }
    "unknown git error".to_string()
}
