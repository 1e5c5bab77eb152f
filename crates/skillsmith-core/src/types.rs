use crate::error::SkillError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Scope
// ---------------------------------------------------------------------------

/// Which output root an invocation writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// `<project>/.claude/skills`, visible to one project.
    Project,
    /// `<home>/.claude/skills`, visible to every project of the user.
    User,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::Project => "project",
            Scope::User => "user",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Scope {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" | "local" => Ok(Scope::Project),
            "user" | "global" => Ok(Scope::User),
            _ => Err(SkillError::InvalidInput(format!(
                "unknown scope '{s}' (expected project or user)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// ReplacementPolicy
// ---------------------------------------------------------------------------

/// What happens to existing entries when a topic is generated again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacementPolicy {
    /// Delete every existing entry for the slug, then write the new set.
    Replace,
    /// Add new entries, refresh metadata of existing ones, keep the rest.
    Merge,
}

impl ReplacementPolicy {
    pub fn all() -> &'static [ReplacementPolicy] {
        &[ReplacementPolicy::Replace, ReplacementPolicy::Merge]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReplacementPolicy::Replace => "replace",
            ReplacementPolicy::Merge => "merge",
        }
    }
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReplacementPolicy {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(ReplacementPolicy::Replace),
            "merge" | "update" => Ok(ReplacementPolicy::Merge),
            _ => Err(SkillError::InvalidInput(format!(
                "unknown replacement policy '{s}' (expected replace or merge)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// SelectionMode
// ---------------------------------------------------------------------------

/// Granularity of the confirmation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionMode {
    /// One yes/no for the whole topic.
    PerTopic,
    /// A numbered preview; the user picks which planned entries to generate.
    PerEntry,
}

impl SelectionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionMode::PerTopic => "per-topic",
            SelectionMode::PerEntry => "per-entry",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SelectionMode {
    type Err = SkillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "per-topic" | "topic" => Ok(SelectionMode::PerTopic),
            "per-entry" | "entry" => Ok(SelectionMode::PerEntry),
            _ => Err(SkillError::InvalidInput(format!(
                "unknown selection mode '{s}' (expected per-topic or per-entry)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// One entry named after the topic slug.
    Single,
    /// One entry per subtopic, named `<topic>-<subtopic>`.
    Multi,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Single => "single",
            Layout::Multi => "multi",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Confirmation
// ---------------------------------------------------------------------------

/// The user's answer at the confirmation point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confirmation {
    Confirmed,
    Declined,
    /// No answer was given (non-interactive run, no `--yes`/`--no`).
    NoAnswer,
}

/// What a run without an answer does when existing entries would be replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonInteractiveDefault {
    Proceed,
    Abort,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_parses_aliases() {
        assert_eq!("global".parse::<Scope>().unwrap(), Scope::User);
        assert_eq!("local".parse::<Scope>().unwrap(), Scope::Project);
        assert!("everywhere".parse::<Scope>().is_err());
    }

    #[test]
    fn policy_round_trips_through_display() {
        for p in ReplacementPolicy::all() {
            assert_eq!(p.to_string().parse::<ReplacementPolicy>().unwrap(), *p);
        }
        assert_eq!(
            "update".parse::<ReplacementPolicy>().unwrap(),
            ReplacementPolicy::Merge
        );
    }

    #[test]
    fn selection_mode_serializes_kebab_case() {
        let yaml = serde_yaml::to_string(&SelectionMode::PerEntry).unwrap();
        assert_eq!(yaml.trim(), "per-entry");
    }
}
