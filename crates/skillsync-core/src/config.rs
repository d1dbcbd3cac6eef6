//! Sync configuration.
//!
//! [`SyncConfig`] is built once at process start and passed explicitly into
//! the platform registry, the reconciler, and the update prober. Nothing in
//! the core reads ambient state on its own, so tests construct a config
//! rooted in a temporary directory and never touch the real home directory.
//!
//! Resolution order for [`SyncConfig::load`]:
//!
//! 1. Built-in defaults (`~/.skill_repo`, the built-in platform table).
//! 2. `$SKILLSYNC_REPO` for the repository root.
//! 3. An explicit repository override (the CLI `--repo-dir` flag).
//! 4. `<repo_root>/.skillsync.toml`, if present.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, SyncError};

/// Default repository directory name, relative to the home directory.
pub const DEFAULT_REPO_DIR: &str = ".skill_repo";

/// Ledger file name inside the repository root.
pub const LEDGER_FILE: &str = ".skill_sync_metadata.json";

/// Optional configuration file name inside the repository root.
pub const CONFIG_FILE: &str = ".skillsync.toml";

/// Environment variable overriding the repository root.
pub const REPO_ENV: &str = "SKILLSYNC_REPO";

const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 15;
const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PROBE_CONCURRENCY: usize = 8;

/// Static description of one integration target.
///
/// `global` is relative to the home directory, `local` to the working
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlatformSpec {
    pub id: String,
    pub name: String,
    pub global: PathBuf,
    pub local: PathBuf,
}

impl PlatformSpec {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        global: impl Into<PathBuf>,
        local: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            global: global.into(),
            local: local.into(),
        }
    }
}

/// The built-in platform table, in display order.
pub fn builtin_platforms() -> Vec<PlatformSpec> {
    vec![
        PlatformSpec::new("claude", "Claude Code", ".claude/skills", ".claude/skills"),
        PlatformSpec::new("copilot", "GitHub Copilot", ".copilot/skills", ".github/skills"),
        PlatformSpec::new(
            "antigravity",
            "Google Antigravity",
            ".gemini/antigravity/skills",
            ".agent/skills",
        ),
        PlatformSpec::new("cursor", "Cursor", ".cursor/skills", ".cursor/skills"),
        PlatformSpec::new("opencode", "OpenCode", ".config/opencode/skill", ".opencode/skill"),
        PlatformSpec::new("codex", "OpenAI Codex", ".codex/skills", ".codex/skills"),
        PlatformSpec::new("gemini", "Gemini CLI", ".gemini/skills", ".gemini/skills"),
        PlatformSpec::new(
            "windsurf",
            "Windsurf",
            ".codeium/windsurf/skills",
            ".windsurf/skills",
        ),
        PlatformSpec::new("qwen", "Qwen Code", ".qwen/skills", ".qwen/skills"),
        PlatformSpec::new("qoder", "Qoder", ".qoder/skills", ".qoder/skills"),
    ]
}

/// Immutable runtime configuration.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Central repository holding canonical skill content.
    pub repo_root: PathBuf,

    /// Base for global platform roots.
    pub home_dir: PathBuf,

    /// Base for project-local platform roots.
    pub work_dir: PathBuf,

    /// Platform table, in display order.
    pub platforms: Vec<PlatformSpec>,

    /// Upper bound for one whole update probe (fetch + rev-list).
    ///
    /// Default: **15 s**.
    pub probe_timeout: Duration,

    /// Upper bound for each read-only git command inside a probe.
    ///
    /// Default: **10 s**.
    pub command_timeout: Duration,

    /// Maximum number of probes in flight at once.
    ///
    /// Default: **8**.
    pub probe_concurrency: usize,
}

impl SyncConfig {
    /// Create a configuration with defaults for the given home and working
    /// directories.
    pub fn new(home_dir: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        let home_dir = home_dir.into();
        Self {
            repo_root: home_dir.join(DEFAULT_REPO_DIR),
            home_dir,
            work_dir: work_dir.into(),
            platforms: builtin_platforms(),
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
            command_timeout: Duration::from_secs(DEFAULT_COMMAND_TIMEOUT_SECS),
            probe_concurrency: DEFAULT_PROBE_CONCURRENCY,
        }
    }

    /// Resolve the configuration for this process.
    pub fn load(repo_override: Option<PathBuf>) -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| SyncError::Config("cannot determine home directory".into()))?;
        let cwd = std::env::current_dir().map_err(|e| SyncError::io(".", e))?;

        let mut config = Self::new(home, cwd);

        if let Ok(dir) = std::env::var(REPO_ENV) {
            if !dir.trim().is_empty() {
                config.repo_root = PathBuf::from(dir);
            }
        }
        if let Some(dir) = repo_override {
            config.repo_root = dir;
        }
        // Links point at the repository, so it must not depend on the cwd.
        if config.repo_root.is_relative() {
            config.repo_root = config.work_dir.join(&config.repo_root);
        }

        config.apply_file()
    }

    /// Merge `<repo_root>/.skillsync.toml` into this configuration.
    ///
    /// A missing file leaves the configuration unchanged. Platforms declared
    /// in the file replace built-ins with the same id and are appended
    /// otherwise.
    pub fn apply_file(mut self) -> Result<Self> {
        let path = self.config_file_path();
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(self),
            Err(e) => return Err(SyncError::io(path, e)),
        };

        let file: FileConfig = toml::from_str(&content)
            .map_err(|e| SyncError::Config(format!("{}: {e}", path.display())))?;

        if let Some(secs) = file.probe.timeout_secs {
            self.probe_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(secs) = file.probe.command_timeout_secs {
            self.command_timeout = Duration::from_secs(secs.max(1));
        }
        if let Some(n) = file.probe.concurrency {
            self.probe_concurrency = n.max(1);
        }

        for spec in file.platforms {
            match self.platforms.iter_mut().find(|p| p.id == spec.id) {
                Some(existing) => *existing = spec,
                None => self.platforms.push(spec),
            }
        }

        tracing::debug!(path = %path.display(), "configuration file applied");
        Ok(self)
    }

    pub fn with_repo_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.repo_root = dir.into();
        self
    }

    pub fn with_platforms(mut self, platforms: Vec<PlatformSpec>) -> Self {
        self.platforms = platforms;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    pub fn with_probe_concurrency(mut self, n: usize) -> Self {
        self.probe_concurrency = n.max(1);
        self
    }

    /// Path of the ledger file.
    pub fn ledger_path(&self) -> PathBuf {
        self.repo_root.join(LEDGER_FILE)
    }

    /// Path of the optional configuration file.
    pub fn config_file_path(&self) -> PathBuf {
        self.repo_root.join(CONFIG_FILE)
    }

    /// Canonical repository path for a skill.
    pub fn canonical_path(&self, skill: &str) -> PathBuf {
        self.repo_root.join(skill)
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    probe: ProbeSection,
    #[serde(default)]
    platforms: Vec<PlatformSpec>,
}

#[derive(Debug, Default, Deserialize)]
struct ProbeSection {
    timeout_secs: Option<u64>,
    command_timeout_secs: Option<u64>,
    concurrency: Option<usize>,
}
