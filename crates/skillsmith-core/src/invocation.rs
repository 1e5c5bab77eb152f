//! Parsing of the raw argument string that follows a slash command.
//!
//! Modifiers are recognised as whole whitespace-separated tokens anywhere in
//! the string (`/learn react hooks --global` and `/learn --global react hooks`
//! are the same request). Everything that is not a modifier is topic text.

use crate::error::{Result, SkillError};
use crate::slug;
use crate::types::{Layout, ReplacementPolicy, Scope};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Invocation {
    /// Topic text with modifier tokens removed and whitespace normalised.
    pub topic: String,
    pub scope: Option<Scope>,
    pub policy: Option<ReplacementPolicy>,
    pub layout: Option<Layout>,
    pub focus: Option<String>,
}

impl Invocation {
    pub fn parse(raw: &str) -> Result<Self> {
        let mut inv = Invocation::default();
        let mut words: Vec<&str> = Vec::new();
        let mut tokens = raw.split_whitespace();

        while let Some(tok) = tokens.next() {
            match tok {
                "--global" | "--user" => set_once(&mut inv.scope, Scope::User, tok)?,
                "--project" | "--local" => set_once(&mut inv.scope, Scope::Project, tok)?,
                "--replace" => set_once(&mut inv.policy, ReplacementPolicy::Replace, tok)?,
                "--update" | "--merge" => set_once(&mut inv.policy, ReplacementPolicy::Merge, tok)?,
                "--single" => set_once(&mut inv.layout, Layout::Single, tok)?,
                "--multi" => set_once(&mut inv.layout, Layout::Multi, tok)?,
                "--focus" => {
                    let area = tokens.next().ok_or_else(|| {
                        SkillError::InvalidInput("--focus needs an area".to_string())
                    })?;
                    inv.focus = Some(area.to_string());
                }
                _ => {
                    if let Some(area) = tok.strip_prefix("--focus=") {
                        inv.focus = Some(area.to_string());
                    } else {
                        if tok.starts_with("--") {
                            tracing::debug!(token = tok, "unknown modifier kept as topic text");
                        }
                        words.push(tok);
                    }
                }
            }
        }

        inv.topic = words.join(" ");
        Ok(inv)
    }

    /// The topic slug, or `InvalidInput` when the topic is missing.
    pub fn topic_slug(&self) -> Result<String> {
        slug::slugify(&self.topic)
    }
}

/// Record a modifier, rejecting contradictory ones (`--global --project`).
fn set_once<T: PartialEq + Copy>(slot: &mut Option<T>, value: T, tok: &str) -> Result<()> {
    match *slot {
        Some(existing) if existing != value => Err(SkillError::InvalidInput(format!(
            "conflicting modifier '{tok}'"
        ))),
        _ => {
            *slot = Some(value);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_modifiers_anywhere() {
        let inv = Invocation::parse("--global laravel 12 --replace").unwrap();
        assert_eq!(inv.topic, "laravel 12");
        assert_eq!(inv.scope, Some(Scope::User));
        assert_eq!(inv.policy, Some(ReplacementPolicy::Replace));
        assert_eq!(inv.topic_slug().unwrap(), "laravel-12");
    }

    #[test]
    fn no_modifiers_leaves_everything_unset() {
        let inv = Invocation::parse("  React   Hooks ").unwrap();
        assert_eq!(inv.topic, "React Hooks");
        assert_eq!(inv.scope, None);
        assert_eq!(inv.policy, None);
        assert_eq!(inv.layout, None);
    }

    #[test]
    fn conflicting_scope_is_invalid() {
        assert!(matches!(
            Invocation::parse("react --global --project"),
            Err(SkillError::InvalidInput(_))
        ));
        // repeating the same modifier is harmless
        let inv = Invocation::parse("react --global --user").unwrap();
        assert_eq!(inv.scope, Some(Scope::User));
    }

    #[test]
    fn conflicting_policy_is_invalid() {
        assert!(Invocation::parse("react --replace --update").is_err());
    }

    #[test]
    fn focus_forms() {
        let a = Invocation::parse("--focus api").unwrap();
        assert_eq!(a.focus.as_deref(), Some("api"));
        assert_eq!(a.topic, "");
        let b = Invocation::parse("--focus=db --multi").unwrap();
        assert_eq!(b.focus.as_deref(), Some("db"));
        assert_eq!(b.layout, Some(Layout::Multi));
        assert!(Invocation::parse("--focus").is_err());
    }

    #[test]
    fn unknown_modifiers_stay_in_topic() {
        let inv = Invocation::parse("vim --cheatsheet").unwrap();
        assert_eq!(inv.topic, "vim --cheatsheet");
        assert_eq!(inv.topic_slug().unwrap(), "vim-cheatsheet");
    }

    #[test]
    fn empty_topic_after_stripping() {
        let inv = Invocation::parse("--global").unwrap();
        assert!(matches!(inv.topic_slug(), Err(SkillError::InvalidInput(_))));
    }
}
