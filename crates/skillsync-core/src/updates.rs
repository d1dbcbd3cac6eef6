//! Update probing and pulling for git-backed skills.
//!
//! [`UpdateProber::probe_many`] checks every skill concurrently, bounded by
//! [`SyncConfig::probe_concurrency`]. Each probe owns its directory and
//! produces an independent result, so a slow or failing remote only affects
//! its own entry. A probe that fails or exceeds [`SyncConfig::probe_timeout`]
//! yields [`UpdateStatus::Indeterminate`].
//!
//! [`SyncConfig::probe_concurrency`]: crate::config::SyncConfig::probe_concurrency
//! [`SyncConfig::probe_timeout`]: crate::config::SyncConfig::probe_timeout

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use futures::stream;

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::vcs::{Divergence, VcsClient, is_git_repo};

/// Remote status of a git-backed skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    /// The upstream has commits not in local `HEAD`. `ahead` is non-zero
    /// when the branches have diverged.
    Behind { commits: u32, ahead: u32 },
    /// Local `HEAD` has commits the upstream lacks.
    Ahead { commits: u32 },
    /// Local `HEAD` and upstream match.
    Even,
    /// Status could not be determined (fetch failed, timed out, or no
    /// upstream is tracked).
    Indeterminate { reason: String },
}

impl UpdateStatus {
    pub fn has_update(&self) -> bool {
        matches!(self, Self::Behind { .. })
    }
}

impl From<Divergence> for UpdateStatus {
    fn from(d: Divergence) -> Self {
        if d.behind > 0 {
            Self::Behind {
                commits: d.behind,
                ahead: d.ahead,
            }
        } else if d.ahead > 0 {
            Self::Ahead { commits: d.ahead }
        } else {
            Self::Even
        }
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Behind { commits, ahead: 0 } => write!(f, "{commits} update(s) available"),
            Self::Behind { commits, ahead } => {
                write!(f, "{commits} update(s) available, {ahead} local commit(s) diverged")
            }
            Self::Ahead { commits } => write!(f, "{commits} unpushed commit(s)"),
            Self::Even => f.write_str("up to date"),
            Self::Indeterminate { reason } => write!(f, "unknown ({reason})"),
        }
    }
}

/// Concurrent, time-bounded remote status checks.
pub struct UpdateProber {
    vcs: Arc<dyn VcsClient>,
    timeout: Duration,
    concurrency: usize,
}

impl UpdateProber {
    pub fn new(vcs: Arc<dyn VcsClient>, config: &SyncConfig) -> Self {
        Self {
            vcs,
            timeout: config.probe_timeout,
            concurrency: config.probe_concurrency.max(1),
        }
    }

    /// Probe one skill directory.
    pub async fn probe(&self, dir: &Path) -> UpdateStatus {
        match tokio::time::timeout(self.timeout, self.vcs.remote_divergence(dir)).await {
            Ok(Ok(divergence)) => divergence.into(),
            Ok(Err(e)) => {
                tracing::debug!(dir = %dir.display(), error = %e, "update probe failed");
                UpdateStatus::Indeterminate {
                    reason: short_reason(&e),
                }
            }
            Err(_) => {
                tracing::warn!(
                    dir = %dir.display(),
                    timeout_secs = self.timeout.as_secs(),
                    "update probe timed out"
                );
                UpdateStatus::Indeterminate {
                    reason: "timed out".into(),
                }
            }
        }
    }

    /// Probe every `(name, dir)` pair. Every name gets a result; ordering of
    /// the map is irrelevant.
    pub async fn probe_many(
        &self,
        skills: Vec<(String, PathBuf)>,
    ) -> HashMap<String, UpdateStatus> {
        let total = skills.len();
        let results: HashMap<String, UpdateStatus> = stream::iter(skills)
            .map(|(name, dir)| async move {
                let status = self.probe(&dir).await;
                (name, status)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        tracing::debug!(total, "update probes finished");
        results
    }
}

fn short_reason(e: &SyncError) -> String {
    match e {
        SyncError::Timeout { .. } => "timed out".into(),
        SyncError::ExternalTool { detail, .. } => {
            detail.lines().next().unwrap_or("git failed").to_owned()
        }
        other => other.to_string(),
    }
}

/// Result of updating one skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullOutcome {
    /// `HEAD` did not move.
    UpToDate,
    /// `HEAD` moved from `from` to `to`.
    Updated { from: String, to: String },
    /// The update failed; `detail` is the tool's own diagnostic.
    Error { detail: String },
    /// Not a git-backed skill.
    Skipped,
}

/// Fast-forward a skill directory and report what changed, judged by
/// comparing `HEAD` before and after.
pub fn pull_skill(vcs: &dyn VcsClient, dir: &Path) -> PullOutcome {
    if !is_git_repo(dir) {
        return PullOutcome::Skipped;
    }

    let result = vcs.head(dir).and_then(|before| {
        vcs.pull(dir)?;
        let after = vcs.head(dir)?;
        Ok((before, after))
    });

    match result {
        Ok((before, after)) if before == after => PullOutcome::UpToDate,
        Ok((from, to)) => {
            tracing::info!(dir = %dir.display(), from = %from, to = %to, "skill updated");
            PullOutcome::Updated { from, to }
        }
        Err(SyncError::ExternalTool { detail, .. }) => PullOutcome::Error { detail },
        Err(e) => PullOutcome::Error {
            detail: e.to_string(),
        },
    }
}
