//! Replace / merge / abort decision for a topic that may already have entries.
//!
//! | existing | answer    | replace policy         | merge policy            |
//! |----------|-----------|------------------------|-------------------------|
//! | none     | yes / -   | fresh                  | fresh                   |
//! | some     | yes       | remove all, then write | add new, update matches |
//! | some     | no answer | add new, or abort      | add new, update matches |
//! | any      | no        | abort                  | abort                   |
//!
//! Only an explicit yes deletes anything. Without an answer the replace
//! policy follows the non-interactive default: `proceed` generates alongside
//! the existing entries, `abort` stops.
//!
//! Selection (per-entry mode) narrows the planned entries only. Removal under
//! the replace policy always covers every existing entry for the slug.

use crate::error::{Result, SkillError};
use crate::types::{Confirmation, NonInteractiveDefault, ReplacementPolicy, SelectionMode};
use serde::Serialize;

// ---------------------------------------------------------------------------
// PlannedEntry
// ---------------------------------------------------------------------------

/// An entry the invocation intends to write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedEntry {
    pub name: String,
    /// Human title in its original spelling, used for the body heading.
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtopic: Option<String>,
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// A choice against the numbered preview list (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    None,
    Only(Picks),
    Skip(Picks),
}

/// 1-based numbers picked from the preview, kept as inclusive ranges so a
/// wide range costs nothing before it is checked against the preview length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picks(Vec<(usize, usize)>);

impl Picks {
    fn contains(&self, n: usize) -> bool {
        self.0.iter().any(|&(a, b)| a <= n && n <= b)
    }

    /// A picked number outside `1..=count`, if any.
    fn out_of_range(&self, count: usize) -> Option<usize> {
        self.0.iter().find_map(|&(a, b)| match (a, b) {
            (0, _) => Some(0),
            (_, b) if b > count => Some(b),
            _ => None,
        })
    }
}

impl std::str::FromStr for Selection {
    type Err = SkillError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "all" | "yes" | "y" => return Ok(Selection::All),
            "none" | "no" | "n" => return Ok(Selection::None),
            _ => {}
        }
        if let Some(rest) = s.strip_prefix("only") {
            return Ok(Selection::Only(parse_numbers(rest)?));
        }
        if let Some(rest) = s.strip_prefix("skip") {
            return Ok(Selection::Skip(parse_numbers(rest)?));
        }
        Ok(Selection::Only(parse_numbers(&s)?))
    }
}

/// Parse `1,3`, `2 4` or `2-4` into picks.
fn parse_numbers(s: &str) -> Result<Picks> {
    let bad = || SkillError::InvalidInput(format!("cannot read selection '{}'", s.trim()));
    let mut out = Vec::new();
    for part in s.split(|c: char| c == ',' || c.is_whitespace()) {
        if part.is_empty() {
            continue;
        }
        if let Some((a, b)) = part.split_once('-') {
            let a: usize = a.parse().map_err(|_| bad())?;
            let b: usize = b.parse().map_err(|_| bad())?;
            if a > b {
                return Err(bad());
            }
            out.push((a, b));
        } else {
            let n: usize = part.parse().map_err(|_| bad())?;
            out.push((n, n));
        }
    }
    if out.is_empty() {
        return Err(bad());
    }
    Ok(Picks(out))
}

impl Selection {
    /// Indices (0-based) of the entries this selection keeps out of `count`.
    pub fn resolve(&self, count: usize) -> Result<Vec<usize>> {
        let check = |picks: &Picks| -> Result<()> {
            match picks.out_of_range(count) {
                Some(n) => Err(SkillError::InvalidInput(format!(
                    "selection {n} is out of range 1-{count}"
                ))),
                None => Ok(()),
            }
        };
        Ok(match self {
            Selection::All => (0..count).collect(),
            Selection::None => Vec::new(),
            Selection::Only(picks) => {
                check(picks)?;
                (0..count).filter(|i| picks.contains(i + 1)).collect()
            }
            Selection::Skip(picks) => {
                check(picks)?;
                (0..count).filter(|i| !picks.contains(i + 1)).collect()
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Preview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewLine {
    pub number: usize,
    pub name: String,
    pub exists: bool,
}

/// Numbered list of planned entries, flagging those that already exist.
pub fn preview(planned: &[PlannedEntry], existing: &[String]) -> Vec<PreviewLine> {
    planned
        .iter()
        .enumerate()
        .map(|(i, p)| PreviewLine {
            number: i + 1,
            name: p.name.clone(),
            exists: existing.contains(&p.name),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct DecisionInput<'a> {
    pub policy: ReplacementPolicy,
    pub mode: SelectionMode,
    pub confirmation: Confirmation,
    pub selection: Option<&'a Selection>,
    pub non_interactive: NonInteractiveDefault,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Decision {
    /// Nothing exists yet; write the planned entries.
    Fresh { create: Vec<PlannedEntry> },
    /// Remove every existing entry for the slug, then write the planned ones.
    Replace {
        remove: Vec<String>,
        create: Vec<PlannedEntry>,
    },
    /// Write new entries, refresh metadata of existing ones, keep the rest.
    Merge {
        create: Vec<PlannedEntry>,
        update: Vec<PlannedEntry>,
        retain: Vec<String>,
    },
    Abort { reason: String },
}

impl Decision {
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Fresh { .. } => "fresh",
            Decision::Replace { .. } => "replace",
            Decision::Merge { .. } => "merge",
            Decision::Abort { .. } => "abort",
        }
    }

    pub fn is_abort(&self) -> bool {
        matches!(self, Decision::Abort { .. })
    }
}

/// Whether the caller should ask before applying: always in per-entry mode
/// (the user picks from the preview), and before replacing existing entries.
pub fn needs_confirmation(
    existing: &[String],
    policy: ReplacementPolicy,
    mode: SelectionMode,
) -> bool {
    mode == SelectionMode::PerEntry
        || (!existing.is_empty() && policy == ReplacementPolicy::Replace)
}

pub fn decide(
    existing: &[String],
    planned: &[PlannedEntry],
    input: DecisionInput<'_>,
) -> Result<Decision> {
    if planned.is_empty() {
        return Err(SkillError::InvalidInput(
            "nothing to generate: no entries planned".to_string(),
        ));
    }

    let selected: Vec<PlannedEntry> = match (input.mode, input.selection) {
        (SelectionMode::PerTopic, Some(_)) => {
            return Err(SkillError::InvalidInput(
                "entry selection needs per-entry mode".to_string(),
            ))
        }
        (SelectionMode::PerTopic, None) => planned.to_vec(),
        (SelectionMode::PerEntry, sel) => sel
            .unwrap_or(&Selection::All)
            .resolve(planned.len())?
            .into_iter()
            .map(|i| planned[i].clone())
            .collect(),
    };

    if input.confirmation == Confirmation::Declined {
        return Ok(abort("declined by user"));
    }
    if selected.is_empty() {
        return Ok(abort("no entries selected"));
    }

    if existing.is_empty() {
        return Ok(Decision::Fresh { create: selected });
    }

    // Only an explicit confirmation deletes. Without an answer the replace
    // policy either generates alongside what exists or stops.
    let decision = match (input.policy, input.confirmation, input.non_interactive) {
        (ReplacementPolicy::Replace, Confirmation::Confirmed, _) => Decision::Replace {
            remove: existing.to_vec(),
            create: selected,
        },
        (ReplacementPolicy::Replace, _, NonInteractiveDefault::Abort) => {
            abort("existing entries found and replacement was not confirmed")
        }
        _ => additive(existing, selected),
    };
    tracing::debug!(
        decision = decision.label(),
        existing = existing.len(),
        policy = %input.policy,
        "replacement decision"
    );
    Ok(decision)
}

/// Create what is new, refresh what exists, keep everything else.
fn additive(existing: &[String], selected: Vec<PlannedEntry>) -> Decision {
    let (update, create): (Vec<_>, Vec<_>) = selected
        .into_iter()
        .partition(|p| existing.contains(&p.name));
    let retain = existing
        .iter()
        .filter(|name| !update.iter().any(|u| &u.name == *name))
        .cloned()
        .collect();
    Decision::Merge {
        create,
        update,
        retain,
    }
}

fn abort(reason: &str) -> Decision {
    Decision::Abort {
        reason: reason.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn planned(names: &[&str]) -> Vec<PlannedEntry> {
        names
            .iter()
            .map(|n| PlannedEntry {
                name: n.to_string(),
                title: n.to_string(),
                subtopic: None,
            })
            .collect()
    }

    fn names(entries: &[PlannedEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    fn input(policy: ReplacementPolicy, confirmation: Confirmation) -> DecisionInput<'static> {
        DecisionInput {
            policy,
            mode: SelectionMode::PerTopic,
            confirmation,
            selection: None,
            non_interactive: NonInteractiveDefault::Proceed,
        }
    }

    fn existing(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_existing_is_fresh_under_every_policy() {
        for &policy in ReplacementPolicy::all() {
            for answer in [Confirmation::Confirmed, Confirmation::NoAnswer] {
                let d = decide(&[], &planned(&["react-hooks"]), input(policy, answer)).unwrap();
                match d {
                    Decision::Fresh { create } => assert_eq!(names(&create), ["react-hooks"]),
                    other => panic!("expected fresh, got {other:?}"),
                }
            }
        }
    }

    #[test]
    fn declined_aborts_under_every_policy() {
        for &policy in ReplacementPolicy::all() {
            for ex in [existing(&[]), existing(&["react"])] {
                let d = decide(&ex, &planned(&["react"]), input(policy, Confirmation::Declined))
                    .unwrap();
                assert!(d.is_abort(), "{policy}: {d:?}");
            }
        }
    }

    #[test]
    fn confirmed_replace_removes_every_existing_entry() {
        let ex = existing(&["react-hooks", "react-old-thing", "react-state"]);
        let d = decide(
            &ex,
            &planned(&["react-hooks", "react-context"]),
            input(ReplacementPolicy::Replace, Confirmation::Confirmed),
        )
        .unwrap();
        match d {
            Decision::Replace { remove, create } => {
                assert_eq!(remove, ex);
                assert_eq!(names(&create), ["react-hooks", "react-context"]);
            }
            other => panic!("expected replace, got {other:?}"),
        }
    }

    #[test]
    fn replace_without_answer_never_deletes() {
        let ex = existing(&["react-hooks", "react-legacy"]);
        let plan = planned(&["react-state"]);
        let mut inp = input(ReplacementPolicy::Replace, Confirmation::NoAnswer);
        match decide(&ex, &plan, inp).unwrap() {
            Decision::Merge {
                create,
                update,
                retain,
            } => {
                assert_eq!(names(&create), ["react-state"]);
                assert!(update.is_empty());
                assert_eq!(retain, ex);
            }
            other => panic!("expected additive merge, got {other:?}"),
        }
        inp.non_interactive = NonInteractiveDefault::Abort;
        assert!(decide(&ex, &plan, inp).unwrap().is_abort());
    }

    #[test]
    fn merge_adds_updates_and_retains() {
        let ex = existing(&["react-hooks", "react-legacy"]);
        let d = decide(
            &ex,
            &planned(&["react-hooks", "react-context"]),
            input(ReplacementPolicy::Merge, Confirmation::NoAnswer),
        )
        .unwrap();
        match d {
            Decision::Merge {
                create,
                update,
                retain,
            } => {
                assert_eq!(names(&create), ["react-context"]);
                assert_eq!(names(&update), ["react-hooks"]);
                assert_eq!(retain, ["react-legacy"]);
            }
            other => panic!("expected merge, got {other:?}"),
        }
    }

    #[test]
    fn per_entry_selection_narrows_creation_not_removal() {
        let ex = existing(&["react-a", "react-b"]);
        let sel: Selection = "skip 2".parse().unwrap();
        let d = decide(
            &ex,
            &planned(&["react-x", "react-y", "react-z"]),
            DecisionInput {
                policy: ReplacementPolicy::Replace,
                mode: SelectionMode::PerEntry,
                confirmation: Confirmation::Confirmed,
                selection: Some(&sel),
                non_interactive: NonInteractiveDefault::Proceed,
            },
        )
        .unwrap();
        match d {
            Decision::Replace { remove, create } => {
                assert_eq!(remove, ex);
                assert_eq!(names(&create), ["react-x", "react-z"]);
            }
            other => panic!("expected replace, got {other:?}"),
        }
    }

    #[test]
    fn selecting_nothing_aborts() {
        let sel = Selection::None;
        let d = decide(
            &[],
            &planned(&["a"]),
            DecisionInput {
                policy: ReplacementPolicy::Merge,
                mode: SelectionMode::PerEntry,
                confirmation: Confirmation::Confirmed,
                selection: Some(&sel),
                non_interactive: NonInteractiveDefault::Proceed,
            },
        )
        .unwrap();
        assert!(d.is_abort());
    }

    #[test]
    fn selection_in_per_topic_mode_is_invalid() {
        let sel = Selection::All;
        let mut inp = input(ReplacementPolicy::Merge, Confirmation::Confirmed);
        inp.selection = Some(&sel);
        assert!(decide(&[], &planned(&["a"]), inp).is_err());
    }

    #[test]
    fn empty_plan_is_invalid() {
        let inp = input(ReplacementPolicy::Merge, Confirmation::Confirmed);
        assert!(matches!(
            decide(&[], &[], inp),
            Err(SkillError::InvalidInput(_))
        ));
    }

    #[test]
    fn selection_parsing() {
        assert_eq!("all".parse::<Selection>().unwrap(), Selection::All);
        assert_eq!("None".parse::<Selection>().unwrap(), Selection::None);
        assert_eq!(
            "only 1,3".parse::<Selection>().unwrap(),
            Selection::Only(Picks(vec![(1, 1), (3, 3)]))
        );
        assert_eq!(
            "skip 2,4".parse::<Selection>().unwrap(),
            Selection::Skip(Picks(vec![(2, 2), (4, 4)]))
        );
        assert_eq!(
            "2-4".parse::<Selection>().unwrap().resolve(5).unwrap(),
            vec![1, 2, 3]
        );
        assert!("skip".parse::<Selection>().is_err());
        assert!("only a,b".parse::<Selection>().is_err());
        assert!("4-2".parse::<Selection>().is_err());
    }

    #[test]
    fn selection_resolution_checks_range() {
        let only: Selection = "only 1,3".parse().unwrap();
        assert_eq!(only.resolve(3).unwrap(), vec![0, 2]);
        assert!(only.resolve(2).is_err());
        let skip: Selection = "skip 2".parse().unwrap();
        assert_eq!(skip.resolve(3).unwrap(), vec![0, 2]);
        assert!("only 0".parse::<Selection>().unwrap().resolve(3).is_err());
    }

    #[test]
    fn oversized_range_is_rejected_without_expanding() {
        let sel: Selection = "only 1-9999999999".parse().unwrap();
        match sel.resolve(3) {
            Err(SkillError::InvalidInput(msg)) => assert!(msg.contains("9999999999")),
            other => panic!("expected InvalidInput, got {other:?}"),
        }
        let skip: Selection = format!("skip 2-{}", usize::MAX).parse().unwrap();
        assert!(skip.resolve(3).is_err());
    }

    #[test]
    fn preview_flags_existing() {
        let lines = preview(&planned(&["a", "b"]), &existing(&["b"]));
        assert_eq!(lines[0].number, 1);
        assert!(!lines[0].exists);
        assert!(lines[1].exists);
    }

    #[test]
    fn confirmation_is_needed_before_replacing() {
        let ex = existing(&["a"]);
        assert!(needs_confirmation(&ex, ReplacementPolicy::Replace, SelectionMode::PerTopic));
        assert!(!needs_confirmation(&ex, ReplacementPolicy::Merge, SelectionMode::PerTopic));
        assert!(!needs_confirmation(&[], ReplacementPolicy::Replace, SelectionMode::PerTopic));
        assert!(needs_confirmation(&[], ReplacementPolicy::Merge, SelectionMode::PerEntry));
    }
}
