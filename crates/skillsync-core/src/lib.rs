//! Skill synchronisation core for skillsync.
//!
//! Keeps one canonical copy of every skill in a central repository and
//! exposes it to each AI coding platform through a symlink.
//!
//! This crate provides:
//!
//! - **Platform registry**: resolves which platform skill directories exist
//!   in global (home) or local (project) mode.
//!
//! - **Location prober**: classifies a path as absent, an owned link, a
//!   foreign or broken link, or unmanaged local content.
//!
//! - **Reconciler**: installs from a directory, a `.skill`/`.zip` archive,
//!   or a git remote; links into platforms; uninstalls; fast-forwards
//!   git-backed skills.
//!
//! - **Ledger**: the JSON record of where each skill was synced, pruned of
//!   dead targets on every save.
//!
//! - **Update prober**: concurrent, time-bounded remote checks for
//!   git-backed skills.
//!
//! # Decisions
//!
//! The core never prompts. Target selection, overwrite confirmation, and
//! removal selection go through a [`Decider`]; [`ScriptedDecider`] answers
//! from fixed values.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use skillsync_core::{
//!     GitCli, Reconciler, ScanMode, ScriptedDecider, SkillSource, SyncConfig,
//! };
//!
//! let config = SyncConfig::load(None).unwrap();
//! let vcs = Arc::new(GitCli::new(config.command_timeout));
//! let source = SkillSource::parse("./my-skill", &config.work_dir).unwrap();
//!
//! let reconciler = Reconciler::new(config, ScanMode::Global, vcs);
//! reconciler
//!     .install(&source, false, &mut ScriptedDecider::default())
//!     .unwrap();
//! ```

pub mod archive;
pub mod config;
pub mod conflict;
pub mod decision;
pub mod discovery;
pub mod error;
pub mod fsops;
pub mod ledger;
pub mod location;
pub mod platform;
pub mod probe;
pub mod reconcile;
pub mod source;
pub mod status;
pub mod updates;
pub mod vcs;

pub use config::{PlatformSpec, SyncConfig, builtin_platforms};
pub use conflict::classify;
pub use decision::{Decider, RemovalChoice, ScriptedDecider, TargetChoice};
pub use discovery::discover_all;
pub use error::{Result, SyncError};
pub use ledger::{Ledger, LedgerEntry};
pub use location::{Location, LocationId};
pub use platform::{Platform, ScanMode};
pub use probe::{LocationState, probe};
pub use reconcile::{InstallOutcome, InstallReport, Reconciler, RepoAction, UninstallOutcome};
pub use source::SkillSource;
pub use status::{Inventory, SkillStatus, Summary};
pub use updates::{PullOutcome, UpdateProber, UpdateStatus};
pub use vcs::{Divergence, GitCli, VcsClient};
