//! Decision boundary between the reconciler and whoever drives it.
//!
//! The reconciler never prompts. Every choice it needs (which platforms to
//! link, whether conflicts may be overwritten, which locations to remove)
//! goes through a [`Decider`]. The CLI supplies a terminal implementation;
//! tests and non-interactive runs use [`ScriptedDecider`].

use std::io;

use crate::location::{Location, LocationId};
use crate::platform::Platform;

/// Supplies the choices an install or uninstall needs.
pub trait Decider {
    /// Platform ids to link `skill` into, chosen from `available`.
    fn select_targets(&mut self, skill: &str, available: &[Platform]) -> io::Result<Vec<String>>;

    /// Whether the listed conflicting locations may be replaced.
    fn confirm_overwrite(&mut self, skill: &str, conflicts: &[Location]) -> io::Result<bool>;

    /// Locations to remove, chosen from `present`. An empty selection
    /// cancels the uninstall.
    fn select_removals(&mut self, skill: &str, present: &[Location])
    -> io::Result<Vec<LocationId>>;
}

/// Which platforms a scripted install targets.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TargetChoice {
    /// Every available platform.
    #[default]
    All,
    /// Exactly these platform ids.
    Only(Vec<String>),
}

/// Which locations a scripted uninstall removes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RemovalChoice {
    /// Every present location.
    #[default]
    All,
    /// Only these locations, when present.
    Only(Vec<LocationId>),
}

/// A [`Decider`] with every answer fixed up front.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDecider {
    pub targets: TargetChoice,
    pub overwrite: bool,
    pub removals: RemovalChoice,
}

impl ScriptedDecider {
    /// Link into `ids`, never overwrite.
    pub fn targets<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: TargetChoice::Only(ids.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_removals(mut self, removals: Vec<LocationId>) -> Self {
        self.removals = RemovalChoice::Only(removals);
        self
    }
}

impl Decider for ScriptedDecider {
    fn select_targets(&mut self, _skill: &str, available: &[Platform]) -> io::Result<Vec<String>> {
        Ok(match &self.targets {
            TargetChoice::All => available.iter().map(|p| p.id.clone()).collect(),
            TargetChoice::Only(ids) => ids.clone(),
        })
    }

    fn confirm_overwrite(&mut self, _skill: &str, _conflicts: &[Location]) -> io::Result<bool> {
        Ok(self.overwrite)
    }

    fn select_removals(
        &mut self,
        _skill: &str,
        present: &[Location],
    ) -> io::Result<Vec<LocationId>> {
        Ok(match &self.removals {
            RemovalChoice::All => present.iter().map(|l| l.id.clone()).collect(),
            RemovalChoice::Only(ids) => present
                .iter()
                .filter(|l| ids.contains(&l.id))
                .map(|l| l.id.clone())
                .collect(),
        })
    }
}
