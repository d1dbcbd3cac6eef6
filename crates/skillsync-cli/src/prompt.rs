//! Terminal prompts for install, uninstall, and update.
//!
//! [`TerminalDecider`] answers the core's [`Decider`] questions either from
//! command-line flags or by asking on the terminal. Reader and writer are
//! injected so the prompts can be driven from tests.

use std::io::{self, BufRead, Write};

use skillsync_core::{Decider, Location, LocationId, Platform, RemovalChoice, TargetChoice};

// ---------------------------------------------------------------------------
// Selection parsing
// ---------------------------------------------------------------------------

/// Parse a numbered-menu answer such as `1,3`, `2 4`, or `all`.
///
/// `count` is the number of real options; option `count + 1` is the
/// trailing "All" entry. Empty input yields `default`. Returns zero-based
/// indices, sorted and deduplicated, or the first token that is not a
/// valid choice.
pub fn parse_selection(input: &str, count: usize, default: &[usize]) -> Result<Vec<usize>, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(default.to_vec());
    }

    let mut picked = Vec::new();
    for token in trimmed
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        if token.eq_ignore_ascii_case("all") {
            return Ok((0..count).collect());
        }
        match token.parse::<usize>() {
            Ok(n) if n == count + 1 => return Ok((0..count).collect()),
            Ok(n) if (1..=count).contains(&n) => picked.push(n - 1),
            _ => return Err(token.to_owned()),
        }
    }

    picked.sort_unstable();
    picked.dedup();
    Ok(picked)
}

// ---------------------------------------------------------------------------
// TerminalDecider
// ---------------------------------------------------------------------------

/// A [`Decider`] backed by a terminal, with optional answers preset from
/// flags.
pub struct TerminalDecider<R, W> {
    input: R,
    out: W,
    targets: Option<TargetChoice>,
    removals: Option<RemovalChoice>,
    interactive: bool,
}

impl<R: BufRead, W: Write> TerminalDecider<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self {
            input,
            out,
            targets: None,
            removals: None,
            interactive: true,
        }
    }

    /// Answer the platform selection without asking.
    pub fn with_targets(mut self, targets: TargetChoice) -> Self {
        self.targets = Some(targets);
        self
    }

    /// Answer the removal selection without asking.
    pub fn with_removals(mut self, removals: RemovalChoice) -> Self {
        self.removals = Some(removals);
        self
    }

    /// Never prompt. Selections default to everything, overwrites are
    /// declined.
    pub fn non_interactive(mut self) -> Self {
        self.interactive = false;
        self
    }

    /// Show a numbered menu of `labels` followed by an "All" entry and read
    /// the answer, asking again on invalid input. End of input counts as an
    /// empty answer.
    pub fn choose(
        &mut self,
        heading: &str,
        labels: &[String],
        all_label: &str,
        default: &[usize],
    ) -> io::Result<Vec<usize>> {
        writeln!(self.out)?;
        writeln!(self.out, "  {heading}")?;
        for (i, label) in labels.iter().enumerate() {
            writeln!(self.out, "    ({}) {label}", i + 1)?;
        }
        writeln!(self.out, "    ({}) {all_label}", labels.len() + 1)?;
        writeln!(self.out)?;

        loop {
            write!(self.out, "  Enter choice (e.g. '1,2' or 'all'): ")?;
            self.out.flush()?;

            let line = self.read_line()?;
            match parse_selection(&line, labels.len(), default) {
                Ok(picked) => return Ok(picked),
                Err(token) => writeln!(self.out, "  Invalid choice `{token}`, try again.")?,
            }
        }
    }

    /// Ask a yes/no question; anything but `y`/`yes` is no.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        write!(self.out, "  {question} [y/N]: ")?;
        self.out.flush()?;
        let answer = self.read_line()?.trim().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line)
    }
}

impl<R: BufRead, W: Write> Decider for TerminalDecider<R, W> {
    fn select_targets(&mut self, skill: &str, available: &[Platform]) -> io::Result<Vec<String>> {
        let all = || available.iter().map(|p| p.id.clone()).collect::<Vec<_>>();

        match &self.targets {
            Some(TargetChoice::All) => return Ok(all()),
            Some(TargetChoice::Only(ids)) => return Ok(ids.clone()),
            None => {}
        }
        if available.is_empty() {
            writeln!(
                self.out,
                "  No platform skill directories found; storing in the repository only."
            )?;
            return Ok(Vec::new());
        }
        if !self.interactive {
            return Ok(all());
        }

        let labels: Vec<String> = available
            .iter()
            .map(|p| format!("{} ({})", p.name, p.root.display()))
            .collect();
        let everything: Vec<usize> = (0..available.len()).collect();
        let picked = self.choose(
            &format!("Select platforms to enable `{skill}`:"),
            &labels,
            "All (default)",
            &everything,
        )?;
        Ok(picked.into_iter().map(|i| available[i].id.clone()).collect())
    }

    fn confirm_overwrite(&mut self, skill: &str, conflicts: &[Location]) -> io::Result<bool> {
        writeln!(self.out)?;
        writeln!(self.out, "  `{skill}` already exists in {} location(s):", conflicts.len())?;
        for loc in conflicts {
            writeln!(self.out, "    - {}: {} [{}]", loc.name, loc.path.display(), loc.state)?;
        }

        if !self.interactive {
            writeln!(self.out, "  Re-run with --force to overwrite.")?;
            return Ok(false);
        }
        self.confirm("Overwrite existing installations?")
    }

    fn select_removals(
        &mut self,
        skill: &str,
        present: &[Location],
    ) -> io::Result<Vec<LocationId>> {
        let chosen: Vec<LocationId> = match &self.removals {
            Some(RemovalChoice::All) => present.iter().map(|l| l.id.clone()).collect(),
            Some(RemovalChoice::Only(ids)) => {
                for id in ids {
                    if !present.iter().any(|l| &l.id == id) {
                        writeln!(self.out, "  `{skill}` is not present in {id}, skipping.")?;
                    }
                }
                present
                    .iter()
                    .filter(|l| ids.contains(&l.id))
                    .map(|l| l.id.clone())
                    .collect()
            }
            None if !self.interactive => present.iter().map(|l| l.id.clone()).collect(),
            None => {
                let labels: Vec<String> = present
                    .iter()
                    .map(|l| format!("{} ({}) [{}]", l.name, l.path.display(), l.state))
                    .collect();
                let picked = self.choose(
                    &format!("Select locations to remove `{skill}` from:"),
                    &labels,
                    "All locations",
                    &[],
                )?;
                picked.into_iter().map(|i| present[i].id.clone()).collect()
            }
        };

        if !self.interactive || chosen.is_empty() {
            return Ok(chosen);
        }

        // Interactive runs always confirm before deleting.
        let names: Vec<&str> = present
            .iter()
            .filter(|l| chosen.contains(&l.id))
            .map(|l| l.name.as_str())
            .collect();
        writeln!(self.out)?;
        writeln!(self.out, "  Will remove from: {}", names.join(", "))?;
        if self.confirm("Confirm?")? {
            Ok(chosen)
        } else {
            writeln!(self.out, "  Uninstall cancelled.")?;
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::PathBuf;

    use skillsync_core::LocationState;

    use super::*;

    fn decider(input: &str) -> TerminalDecider<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalDecider::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn platforms() -> Vec<Platform> {
        vec![
            Platform::new("claude", "Claude Code", "/h/.claude/skills"),
            Platform::new("cursor", "Cursor", "/h/.cursor/skills"),
            Platform::new("codex", "OpenAI Codex", "/h/.codex/skills"),
        ]
    }

    fn location(id: LocationId, state: LocationState) -> Location {
        Location {
            name: id.to_string(),
            path: PathBuf::from("/somewhere").join(id.to_string()),
            id,
            state,
        }
    }

    #[test]
    fn selection_parsing() {
        assert_eq!(parse_selection("1,3", 3, &[]), Ok(vec![0, 2]));
        assert_eq!(parse_selection(" 3 1 1 ", 3, &[]), Ok(vec![0, 2]));
        assert_eq!(parse_selection("4", 3, &[]), Ok(vec![0, 1, 2]));
        assert_eq!(parse_selection("ALL", 3, &[]), Ok(vec![0, 1, 2]));
        assert_eq!(parse_selection("", 3, &[1]), Ok(vec![1]));
        assert_eq!(parse_selection("0", 3, &[]), Err("0".into()));
        assert_eq!(parse_selection("2,x", 3, &[]), Err("x".into()));
    }

    #[test]
    fn empty_answer_selects_every_platform() {
        let mut d = decider("\n");
        let ids = d.select_targets("foo", &platforms()).unwrap();
        assert_eq!(ids, ["claude", "cursor", "codex"]);
    }

    #[test]
    fn invalid_answer_is_asked_again() {
        let mut d = decider("9\n2\n");
        let ids = d.select_targets("foo", &platforms()).unwrap();
        assert_eq!(ids, ["cursor"]);
        let shown = String::from_utf8(d.out).unwrap();
        assert!(shown.contains("Invalid choice `9`"));
    }

    #[test]
    fn preset_targets_skip_the_prompt() {
        let mut d = decider("").with_targets(TargetChoice::Only(vec!["codex".into()]));
        assert_eq!(d.select_targets("foo", &platforms()).unwrap(), ["codex"]);
        assert!(d.out.is_empty());
    }

    #[test]
    fn overwrite_needs_explicit_yes() {
        let conflicts = [location(
            LocationId::Platform("claude".into()),
            LocationState::ForeignDirectory,
        )];
        assert!(decider("y\n").confirm_overwrite("foo", &conflicts).unwrap());
        assert!(!decider("\n").confirm_overwrite("foo", &conflicts).unwrap());
        assert!(!decider("").confirm_overwrite("foo", &conflicts).unwrap());

        let mut quiet = decider("y\n").non_interactive();
        assert!(!quiet.confirm_overwrite("foo", &conflicts).unwrap());
        assert!(String::from_utf8(quiet.out).unwrap().contains("--force"));
    }

    #[test]
    fn empty_removal_answer_cancels() {
        let present = [
            location(LocationId::Repo, LocationState::ForeignDirectory),
            location(LocationId::Platform("claude".into()), LocationState::OwnedSymlink),
        ];
        assert!(decider("\n").select_removals("foo", &present).unwrap().is_empty());
        assert_eq!(
            decider("2\ny\n").select_removals("foo", &present).unwrap(),
            [LocationId::Platform("claude".into())]
        );
        assert_eq!(decider("3\ny\n").select_removals("foo", &present).unwrap().len(), 2);
    }

    #[test]
    fn removal_needs_a_final_yes() {
        let present = [
            location(LocationId::Repo, LocationState::ForeignDirectory),
            location(LocationId::Platform("claude".into()), LocationState::OwnedSymlink),
        ];
        let mut d = decider("1\nn\n");
        assert!(d.select_removals("foo", &present).unwrap().is_empty());
        let shown = String::from_utf8(d.out).unwrap();
        assert!(shown.contains("Will remove from: repo"));
        assert!(shown.contains("Uninstall cancelled."));

        let mut preset = decider("\n").with_removals(RemovalChoice::All);
        assert!(preset.select_removals("foo", &present).unwrap().is_empty());

        let mut quiet = decider("").with_removals(RemovalChoice::All).non_interactive();
        assert_eq!(quiet.select_removals("foo", &present).unwrap().len(), 2);
    }

    #[test]
    fn preset_removals_report_missing_locations() {
        let present = [location(LocationId::Repo, LocationState::ForeignDirectory)];
        let mut d = decider("y\n").with_removals(RemovalChoice::Only(vec![
            LocationId::Repo,
            LocationId::Platform("cursor".into()),
        ]));
        assert_eq!(d.select_removals("foo", &present).unwrap(), [LocationId::Repo]);
        assert!(String::from_utf8(d.out).unwrap().contains("not present in cursor"));
    }
}
