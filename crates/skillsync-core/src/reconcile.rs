//! Reconciler: install, uninstall, and update skills across the repository
//! and every platform.
//!
//! Within one install the repository is mutated first, then each platform
//! location, then the ledger. A run interrupted at any point leaves a state
//! that the same install can be re-run against: owned symlinks are skipped,
//! so re-running never recreates identical links.
//!
//! New repository content is always assembled in a hidden staging directory
//! inside the repository root and moved into place only once it is
//! complete. A failed copy, extraction, or clone therefore leaves any
//! existing canonical copy untouched and registers nothing in the ledger.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::archive;
use crate::config::SyncConfig;
use crate::conflict::{classify, is_self_install};
use crate::decision::Decider;
use crate::error::{Result, SyncError};
use crate::fsops::{copy_tree, create_symlink, exists_or_symlink, remove_path};
use crate::ledger::Ledger;
use crate::location::{Location, LocationId, present};
use crate::platform::{Platform, ScanMode, discover};
use crate::probe::{LocationState, probe, resolve};
use crate::source::{SkillSource, validate_name};
use crate::updates::{PullOutcome, pull_skill};
use crate::vcs::{VcsClient, is_git_repo};

/// Prefix of staging directories inside the repository root.
const STAGING_PREFIX: &str = ".staging-";

/// What happened to the repository copy during an install.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoAction {
    /// Source already was the canonical path.
    Unchanged,
    /// New content stored.
    Created,
    /// Existing content replaced.
    Replaced,
}

/// Summary of a completed install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub skill: String,
    pub canonical: PathBuf,
    pub repo: RepoAction,
    /// Freshly created links.
    pub linked: Vec<PathBuf>,
    /// Links that already pointed at the canonical path.
    pub unchanged: Vec<PathBuf>,
    /// Locations whose previous content was removed before linking.
    pub replaced: Vec<PathBuf>,
    /// Locations that could not be linked, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

/// Result of [`Reconciler::install`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed(InstallReport),
    /// Conflicts were found and overwriting was declined. Nothing was
    /// written.
    Declined { conflicts: Vec<Location> },
}

/// Summary of an uninstall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallOutcome {
    Removed {
        removed: Vec<Location>,
        failed: Vec<(Location, String)>,
        ledger_entry_dropped: bool,
    },
    /// No location was selected.
    Cancelled,
}

/// Drives installs, uninstalls, and updates against one platform context.
pub struct Reconciler {
    config: SyncConfig,
    platforms: Vec<Platform>,
    vcs: Arc<dyn VcsClient>,
}

impl Reconciler {
    /// Create a reconciler over the platforms available in `mode`.
    pub fn new(config: SyncConfig, mode: ScanMode, vcs: Arc<dyn VcsClient>) -> Self {
        let platforms = discover(&config, mode);
        Self::with_platforms(config, platforms, vcs)
    }

    /// Create a reconciler over an explicit platform list.
    pub fn with_platforms(
        config: SyncConfig,
        platforms: Vec<Platform>,
        vcs: Arc<dyn VcsClient>,
    ) -> Self {
        Self {
            config,
            platforms,
            vcs,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn vcs(&self) -> Arc<dyn VcsClient> {
        Arc::clone(&self.vcs)
    }

    // -----------------------------------------------------------------------
    // Install
    // -----------------------------------------------------------------------

    /// Install `source` into the repository and link it into the platforms
    /// the decider selects.
    ///
    /// Without `force`, conflicts are put to the decider; declining aborts
    /// before anything is written. With `force` (or after confirmation),
    /// conflicting content at the repository path and at the selected
    /// platform paths is removed. Platforms that were not selected are never
    /// touched.
    pub fn install(
        &self,
        source: &SkillSource,
        force: bool,
        decider: &mut dyn Decider,
    ) -> Result<InstallOutcome> {
        let skill = source.name().to_owned();
        let canonical = self.config.canonical_path(&skill);

        let requested = decider
            .select_targets(&skill, &self.platforms)
            .map_err(SyncError::Interaction)?;
        let targets = self.resolve_platforms(&requested)?;

        let conflicts = classify(&self.config, &skill, source.local_path(), &targets);
        let mut force = force;
        if !conflicts.is_empty() && !force {
            let approved = decider
                .confirm_overwrite(&skill, &conflicts)
                .map_err(SyncError::Interaction)?;
            if !approved {
                tracing::info!(skill = %skill, conflicts = conflicts.len(), "install declined");
                return Ok(InstallOutcome::Declined { conflicts });
            }
            force = true;
        }

        tracing::info!(
            skill = %skill,
            source = %source,
            targets = targets.len(),
            "installing skill"
        );

        let repo = self.store_in_repo(source, &canonical, force)?;
        let expected = resolve(&canonical);

        let mut report = InstallReport {
            skill: skill.clone(),
            canonical: canonical.clone(),
            repo,
            linked: Vec::new(),
            unchanged: Vec::new(),
            replaced: Vec::new(),
            failed: Vec::new(),
        };

        for platform in &targets {
            let path = platform.skill_path(&skill);
            match self.link(&skill, platform, &path, &canonical, &expected, force) {
                Ok(LinkAction::Unchanged) => report.unchanged.push(path),
                Ok(LinkAction::Created) => report.linked.push(path),
                Ok(LinkAction::Replaced) => {
                    report.replaced.push(path.clone());
                    report.linked.push(path);
                }
                Err(e) => {
                    tracing::error!(
                        skill = %skill,
                        platform = %platform.id,
                        error = %e,
                        "link failed"
                    );
                    report.failed.push((path, e.to_string()));
                }
            }
        }

        let synced: Vec<PathBuf> = report
            .linked
            .iter()
            .chain(report.unchanged.iter())
            .cloned()
            .collect();
        let ledger_path = self.config.ledger_path();
        let mut ledger = Ledger::load(&ledger_path)?;
        ledger.record_install(&skill, &canonical, &synced);
        ledger.save(&ledger_path)?;

        tracing::info!(
            skill = %skill,
            linked = report.linked.len(),
            unchanged = report.unchanged.len(),
            failed = report.failed.len(),
            "skill installed"
        );
        Ok(InstallOutcome::Installed(report))
    }

    fn resolve_platforms(&self, ids: &[String]) -> Result<Vec<Platform>> {
        for id in ids {
            if !self.platforms.iter().any(|p| &p.id == id) {
                return Err(SyncError::UnknownPlatform(id.clone()));
            }
        }
        Ok(self
            .platforms
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    fn store_in_repo(
        &self,
        source: &SkillSource,
        canonical: &Path,
        force: bool,
    ) -> Result<RepoAction> {
        let repo_root = &self.config.repo_root;
        if let Some(path) = source.local_path() {
            if is_self_install(&self.config, source.name(), path) {
                tracing::debug!(
                    path = %canonical.display(),
                    "source is canonical, nothing to copy"
                );
                return Ok(RepoAction::Unchanged);
            }
            if resolve(repo_root).starts_with(resolve(path)) {
                return Err(SyncError::InvalidSource {
                    source_arg: path.display().to_string(),
                    reason: format!("directory contains the repository {}", repo_root.display()),
                });
            }
        }

        std::fs::create_dir_all(repo_root).map_err(|e| SyncError::io(repo_root, e))?;

        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(repo_root)
            .map_err(|e| SyncError::io(repo_root, e))?;
        let content = staging.path().join("content");

        let root = match source {
            SkillSource::Directory { path, .. } => {
                copy_tree(path, &content)?;
                content
            }
            SkillSource::Archive { path, .. } => archive::extract(path, &content)?,
            SkillSource::Git { url, .. } => {
                self.vcs.clone_repo(url, &content)?;
                content
            }
        };

        let action = if exists_or_symlink(canonical) {
            if !force {
                return Err(SyncError::Conflict {
                    skill: source.name().to_owned(),
                    path: canonical.to_path_buf(),
                });
            }
            tracing::warn!(path = %canonical.display(), "replacing existing repository copy");
            remove_path(canonical)?;
            RepoAction::Replaced
        } else {
            RepoAction::Created
        };

        std::fs::rename(&root, canonical).map_err(|e| SyncError::io(canonical, e))?;
        tracing::info!(path = %canonical.display(), "stored in repository");
        Ok(action)
    }

    fn link(
        &self,
        skill: &str,
        platform: &Platform,
        path: &Path,
        canonical: &Path,
        expected: &Path,
        force: bool,
    ) -> Result<LinkAction> {
        let action = match probe(path, Some(expected)) {
            LocationState::OwnedSymlink => {
                tracing::debug!(platform = %platform.id, path = %path.display(), "already linked");
                return Ok(LinkAction::Unchanged);
            }
            LocationState::Absent => LinkAction::Created,
            state if force => {
                if state == LocationState::ForeignDirectory {
                    tracing::warn!(
                        skill = %skill,
                        platform = %platform.id,
                        path = %path.display(),
                        "deleting foreign content to make room for link"
                    );
                } else {
                    tracing::info!(
                        platform = %platform.id,
                        path = %path.display(),
                        state = state.label(),
                        "replacing link"
                    );
                }
                remove_path(path)?;
                LinkAction::Replaced
            }
            _ => {
                return Err(SyncError::Conflict {
                    skill: skill.to_owned(),
                    path: path.to_path_buf(),
                });
            }
        };

        create_symlink(canonical, path)?;
        tracing::info!(platform = %platform.id, path = %path.display(), "linked");
        Ok(action)
    }

    // -----------------------------------------------------------------------
    // Uninstall
    // -----------------------------------------------------------------------

    /// Every occupied location of `skill`, repository first.
    ///
    /// Names that are not a single visible directory entry are rejected, so
    /// no location can resolve outside the repository or a platform root.
    pub fn locations(&self, skill: &str) -> Result<Vec<Location>> {
        validate_name(skill)?;
        Ok(present(&self.config, skill, &self.platforms))
    }

    /// Remove `skill` from the locations the decider selects.
    ///
    /// Removing the repository copy drops the ledger entry; removing only
    /// platform links drops exactly those targets and lets the save prune
    /// any other dead ones.
    pub fn uninstall(&self, skill: &str, decider: &mut dyn Decider) -> Result<UninstallOutcome> {
        let found = self.locations(skill)?;
        if found.is_empty() {
            return Err(SyncError::NotFound(format!(
                "skill `{skill}` is not installed in any location"
            )));
        }

        let selected = decider
            .select_removals(skill, &found)
            .map_err(SyncError::Interaction)?;
        let chosen: Vec<Location> = found
            .into_iter()
            .filter(|l| selected.contains(&l.id))
            .collect();
        if chosen.is_empty() {
            tracing::info!(skill = %skill, "uninstall cancelled");
            return Ok(UninstallOutcome::Cancelled);
        }

        let mut removed = Vec::new();
        let mut failed = Vec::new();
        for location in chosen {
            match remove_path(&location.path) {
                Ok(_) => {
                    tracing::info!(
                        skill = %skill,
                        location = %location.id,
                        path = %location.path.display(),
                        "removed"
                    );
                    removed.push(location);
                }
                Err(e) => {
                    tracing::error!(
                        skill = %skill,
                        location = %location.id,
                        error = %e,
                        "remove failed"
                    );
                    failed.push((location, e.to_string()));
                }
            }
        }

        let ledger_path = self.config.ledger_path();
        let mut ledger = Ledger::load(&ledger_path)?;
        let mut ledger_entry_dropped = false;
        if ledger.contains(skill) {
            if removed.iter().any(|l| l.id == LocationId::Repo) {
                ledger.remove(skill);
                ledger_entry_dropped = true;
            } else {
                let paths: Vec<PathBuf> = removed.iter().map(|l| l.path.clone()).collect();
                ledger.forget_targets(skill, &paths);
            }
            ledger.save(&ledger_path)?;
        }

        Ok(UninstallOutcome::Removed {
            removed,
            failed,
            ledger_entry_dropped,
        })
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    /// Repository skills that are git working trees, sorted by name.
    pub fn git_skills(&self) -> Vec<(String, PathBuf)> {
        crate::discovery::repo_skills(&self.config.repo_root)
            .into_iter()
            .map(|name| {
                let path = self.config.canonical_path(&name);
                (name, path)
            })
            .filter(|(_, path)| is_git_repo(path))
            .collect()
    }

    /// Fast-forward one repository skill.
    pub fn update(&self, skill: &str) -> Result<PullOutcome> {
        validate_name(skill)?;
        let path = self.config.canonical_path(skill);
        if !path.is_dir() {
            return Err(SyncError::NotFound(format!(
                "skill `{skill}` is not in the repository"
            )));
        }
        Ok(pull_skill(self.vcs.as_ref(), &path))
    }
}

enum LinkAction {
    Unchanged,
    Created,
    Replaced,
}

#[cfg(all(test, unix))]
mod tests {
    use std::os::unix::fs::symlink;

    use async_trait::async_trait;

    use super::*;
    use crate::decision::ScriptedDecider;
    use crate::vcs::Divergence;

    /// Clone writes a marker file, or fails when the URL says so.
    struct StubVcs;

    #[async_trait]
    impl VcsClient for StubVcs {
        fn clone_repo(&self, url: &str, dest: &Path) -> Result<()> {
            if url.contains("fail") {
                return Err(SyncError::ExternalTool {
                    command: "git clone".into(),
                    dir: dest.to_path_buf(),
                    detail: "fatal: repository not found".into(),
                });
            }
            std::fs::create_dir_all(dest.join(".git")).unwrap();
            std::fs::write(dest.join("SKILL.md"), url).unwrap();
            Ok(())
        }

        fn head(&self, _dir: &Path) -> Result<String> {
            Ok("abc".into())
        }

        fn pull(&self, _dir: &Path) -> Result<()> {
            Ok(())
        }

        async fn remote_divergence(&self, _dir: &Path) -> Result<Divergence> {
            Ok(Divergence::default())
        }
    }

    struct Env {
        tmp: tempfile::TempDir,
        rec: Reconciler,
    }

    fn env() -> Env {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = SyncConfig::new(tmp.path(), tmp.path()).with_repo_root(tmp.path().join("repo"));
        let platforms = vec![
            Platform::new("a", "A", tmp.path().join("a")),
            Platform::new("b", "B", tmp.path().join("b")),
        ];
        let rec = Reconciler::with_platforms(cfg, platforms, Arc::new(StubVcs));
        Env { tmp, rec }
    }

    fn make_source(root: &Path, name: &str) -> SkillSource {
        let dir = root.join("src").join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("SKILL.md"), format!("# {name}")).unwrap();
        SkillSource::parse(dir.to_str().unwrap(), root).unwrap()
    }

    #[test]
    fn unknown_platform_is_rejected_before_writing() {
        let e = env();
        let src = make_source(e.tmp.path(), "foo");
        let err = e
            .rec
            .install(&src, false, &mut ScriptedDecider::targets(["zzz"]))
            .unwrap_err();
        assert!(matches!(err, SyncError::UnknownPlatform(id) if id == "zzz"));
        assert!(!e.rec.config().canonical_path("foo").exists());
    }

    #[test]
    fn declined_conflict_writes_nothing() {
        let e = env();
        let src = make_source(e.tmp.path(), "foo");
        let foreign = e.tmp.path().join("a/foo");
        std::fs::create_dir_all(&foreign).unwrap();

        let outcome = e
            .rec
            .install(&src, false, &mut ScriptedDecider::targets(["a", "b"]))
            .unwrap();

        match outcome {
            InstallOutcome::Declined { conflicts } => {
                assert_eq!(conflicts.len(), 1);
                assert_eq!(conflicts[0].path, foreign);
            }
            other => panic!("expected decline, got {other:?}"),
        }
        assert!(!e.rec.config().canonical_path("foo").exists());
        assert!(!e.tmp.path().join("b/foo").exists());
        assert!(!e.rec.config().ledger_path().exists());
    }

    #[test]
    fn confirmed_overwrite_replaces_foreign_directory() {
        let e = env();
        let src = make_source(e.tmp.path(), "foo");
        std::fs::create_dir_all(e.tmp.path().join("a/foo")).unwrap();

        let outcome = e
            .rec
            .install(&src, false, &mut ScriptedDecider::targets(["a"]).with_overwrite(true))
            .unwrap();

        let InstallOutcome::Installed(report) = outcome else {
            panic!("expected install");
        };
        assert_eq!(report.replaced, [e.tmp.path().join("a/foo")]);
        assert_eq!(
            probe(&e.tmp.path().join("a/foo"), Some(report.canonical.as_path())),
            LocationState::OwnedSymlink
        );
    }

    #[test]
    fn adopting_a_platform_directory_keeps_its_content() {
        let e = env();
        let local = e.tmp.path().join("a/foo");
        std::fs::create_dir_all(&local).unwrap();
        std::fs::write(local.join("SKILL.md"), "local copy").unwrap();
        let src = SkillSource::parse(local.to_str().unwrap(), e.tmp.path()).unwrap();

        e.rec
            .install(&src, true, &mut ScriptedDecider::targets(["a"]))
            .unwrap();

        let canonical = e.rec.config().canonical_path("foo");
        assert_eq!(std::fs::read_to_string(canonical.join("SKILL.md")).unwrap(), "local copy");
        assert_eq!(probe(&local, Some(canonical.as_path())), LocationState::OwnedSymlink);
        assert_eq!(std::fs::read_to_string(local.join("SKILL.md")).unwrap(), "local copy");
    }

    #[test]
    fn reinstall_from_repo_is_a_noop_for_repo() {
        let e = env();
        let src = make_source(e.tmp.path(), "foo");
        e.rec
            .install(&src, false, &mut ScriptedDecider::targets(["a"]))
            .unwrap();

        let canonical = e.rec.config().canonical_path("foo");
        let again = SkillSource::parse(canonical.to_str().unwrap(), e.tmp.path()).unwrap();
        let InstallOutcome::Installed(report) = e
            .rec
            .install(&again, false, &mut ScriptedDecider::targets(["a", "b"]))
            .unwrap()
        else {
            panic!("expected install");
        };

        assert_eq!(report.repo, RepoAction::Unchanged);
        assert_eq!(report.unchanged, [e.tmp.path().join("a/foo")]);
        assert_eq!(report.linked, [e.tmp.path().join("b/foo")]);
    }

    #[test]
    fn git_source_is_cloned_through_staging() {
        let e = env();
        let src = SkillSource::parse("https://example.com/acme/writer.git", e.tmp.path()).unwrap();
        e.rec
            .install(&src, false, &mut ScriptedDecider::targets(Vec::<String>::new()))
            .unwrap();

        let canonical = e.rec.config().canonical_path("writer");
        assert!(canonical.join(".git").is_dir());
        assert_eq!(e.rec.git_skills(), [("writer".to_string(), canonical)]);
        let leftovers: Vec<_> = std::fs::read_dir(&e.rec.config().repo_root)
            .unwrap()
            .flatten()
            .filter(|d| d.file_name().to_string_lossy().starts_with(STAGING_PREFIX))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn failed_clone_keeps_existing_copy_and_ledger() {
        let e = env();
        let canonical = e.rec.config().canonical_path("fail");
        std::fs::create_dir_all(&canonical).unwrap();
        std::fs::write(canonical.join("SKILL.md"), "keep me").unwrap();

        let src = SkillSource::parse("https://example.com/fail.git", e.tmp.path()).unwrap();
        let err = e
            .rec
            .install(&src, true, &mut ScriptedDecider::targets(["a"]))
            .unwrap_err();

        assert!(matches!(err, SyncError::ExternalTool { .. }));
        assert_eq!(std::fs::read_to_string(canonical.join("SKILL.md")).unwrap(), "keep me");
        assert!(!e.tmp.path().join("a/fail").exists());
        assert!(!e.rec.config().ledger_path().exists());
    }

    #[test]
    fn uninstall_nothing_is_not_found() {
        let e = env();
        let err = e
            .rec
            .uninstall("ghost", &mut ScriptedDecider::default())
            .unwrap_err();
        assert!(matches!(err, SyncError::NotFound(_)));
    }

    #[test]
    fn uninstall_empty_selection_cancels() {
        let e = env();
        let src = make_source(e.tmp.path(), "foo");
        e.rec
            .install(&src, false, &mut ScriptedDecider::targets(["a"]))
            .unwrap();

        let outcome = e
            .rec
            .uninstall("foo", &mut ScriptedDecider::default().with_removals(Vec::new()))
            .unwrap();
        assert_eq!(outcome, UninstallOutcome::Cancelled);
        assert!(e.tmp.path().join("a/foo").exists());
    }

    #[test]
    fn uninstall_repo_drops_ledger_entry_and_orphans_links() {
        let e = env();
        let src = make_source(e.tmp.path(), "foo");
        e.rec
            .install(&src, false, &mut ScriptedDecider::targets(["a"]))
            .unwrap();

        let outcome = e
            .rec
            .uninstall(
                "foo",
                &mut ScriptedDecider::default().with_removals(vec![LocationId::Repo]),
            )
            .unwrap();

        let UninstallOutcome::Removed { ledger_entry_dropped, .. } = outcome else {
            panic!("expected removal");
        };
        assert!(ledger_entry_dropped);
        let ledger = Ledger::load(&e.rec.config().ledger_path()).unwrap();
        assert!(!ledger.contains("foo"));
        assert_eq!(
            probe(&e.tmp.path().join("a/foo"), None),
            LocationState::BrokenSymlink
        );
    }

    #[test]
    fn names_outside_a_single_entry_are_rejected_untouched() {
        let e = env();
        let src = make_source(e.tmp.path(), "foo");
        e.rec
            .install(&src, false, &mut ScriptedDecider::targets(["a"]))
            .unwrap();
        let victim = e.tmp.path().join("projects");
        std::fs::create_dir_all(&victim).unwrap();
        let repo_root = e.rec.config().repo_root.clone();
        let ledger_before = std::fs::read(e.rec.config().ledger_path()).unwrap();

        for name in ["", "..", victim.to_str().unwrap()] {
            let mut decider = ScriptedDecider::default().with_removals(vec![LocationId::Repo]);
            assert!(
                matches!(e.rec.uninstall(name, &mut decider), Err(SyncError::InvalidName(_))),
                "uninstall accepted {name:?}"
            );
            assert!(matches!(e.rec.locations(name), Err(SyncError::InvalidName(_))));
            assert!(matches!(e.rec.update(name), Err(SyncError::InvalidName(_))));
        }

        assert!(victim.is_dir());
        assert!(repo_root.join("foo/SKILL.md").is_file());
        assert!(e.tmp.path().join("a/foo").exists());
        assert_eq!(std::fs::read(e.rec.config().ledger_path()).unwrap(), ledger_before);
    }

    #[test]
    fn source_containing_the_repository_is_rejected() {
        let e = env();
        std::fs::create_dir_all(&e.rec.config().repo_root).unwrap();
        let src = SkillSource::Directory {
            name: "home".into(),
            path: e.tmp.path().to_path_buf(),
        };

        let err = e
            .rec
            .install(&src, true, &mut ScriptedDecider::targets(["a"]))
            .unwrap_err();

        assert!(matches!(err, SyncError::InvalidSource { .. }));
        assert!(!e.rec.config().canonical_path("home").exists());
        assert!(!e.tmp.path().join("a/home").exists());
    }

    #[test]
    fn update_reports_missing_and_skipped() {
        let e = env();
        assert!(matches!(e.rec.update("ghost"), Err(SyncError::NotFound(_))));

        let src = make_source(e.tmp.path(), "plain");
        e.rec
            .install(&src, false, &mut ScriptedDecider::targets(Vec::<String>::new()))
            .unwrap();
        assert_eq!(e.rec.update("plain").unwrap(), PullOutcome::Skipped);
    }

    #[test]
    fn broken_link_is_replaced_on_forced_install() {
        let e = env();
        std::fs::create_dir_all(e.tmp.path().join("b")).unwrap();
        symlink("/definitely/gone", e.tmp.path().join("b/foo")).unwrap();
        let src = make_source(e.tmp.path(), "foo");

        let InstallOutcome::Installed(report) = e
            .rec
            .install(&src, true, &mut ScriptedDecider::targets(["b"]))
            .unwrap()
        else {
            panic!("expected install");
        };
        assert_eq!(report.replaced.len(), 1);
        assert_eq!(
            probe(&e.tmp.path().join("b/foo"), Some(report.canonical.as_path())),
            LocationState::OwnedSymlink
        );
    }
}
