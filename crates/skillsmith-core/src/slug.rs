//! Topic → slug normalisation and entry naming.

use crate::error::{Result, SkillError};
use regex::Regex;
use std::sync::OnceLock;

pub const MAX_SLUG_LEN: usize = 64;
/// Longest entry name: a full topic slug, a hyphen and a full subtopic slug.
pub const MAX_ENTRY_LEN: usize = 2 * MAX_SLUG_LEN + 1;

static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();
static DISALLOWED_RE: OnceLock<Regex> = OnceLock::new();
static HYPHENS_RE: OnceLock<Regex> = OnceLock::new();
static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn whitespace_re() -> &'static Regex {
    WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

fn disallowed_re() -> &'static Regex {
    DISALLOWED_RE.get_or_init(|| Regex::new(r"[^a-z0-9\-]").unwrap())
}

fn hyphens_re() -> &'static Regex {
    HYPHENS_RE.get_or_init(|| Regex::new(r"-{2,}").unwrap())
}

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

/// Normalise a free-text topic into a filesystem-safe slug.
///
/// Lowercases, turns whitespace runs into a single hyphen, drops everything
/// outside `[a-z0-9-]`, collapses repeated hyphens and trims them from both
/// ends. The result is capped at [`MAX_SLUG_LEN`].
///
/// Fails with [`SkillError::InvalidInput`] when nothing usable remains, so the
/// caller can ask for a topic instead of writing an unnamed entry.
pub fn slugify(topic: &str) -> Result<String> {
    let lower = topic.trim().to_lowercase();
    let hyphenated = whitespace_re().replace_all(&lower, "-");
    let cleaned = disallowed_re().replace_all(&hyphenated, "");
    let collapsed = hyphens_re().replace_all(&cleaned, "-");
    let slug = truncate(collapsed.trim_matches('-'));

    if slug.is_empty() {
        return Err(SkillError::InvalidInput(if topic.trim().is_empty() {
            "topic is empty: specify what to learn".to_string()
        } else {
            format!("topic '{}' has no letters or digits", topic.trim())
        }));
    }
    Ok(slug)
}

/// Cap a normalised slug at [`MAX_SLUG_LEN`], cutting at the last hyphen
/// inside the limit when there is one.
fn truncate(slug: &str) -> String {
    if slug.len() <= MAX_SLUG_LEN {
        return slug.to_string();
    }
    // slug is ASCII here, byte slicing is safe
    let head = &slug[..MAX_SLUG_LEN];
    let cut = match head.rfind('-') {
        Some(pos) if pos > 0 => &head[..pos],
        _ => head,
    };
    cut.trim_end_matches('-').to_string()
}

/// Name of a multi-skill entry: `<topic>-<subtopic>`.
///
/// A subtopic that already carries the topic prefix ("react hooks" under
/// topic "react") is not prefixed a second time. Both parts are capped
/// separately, so the name always keeps the whole topic slug and a non-empty
/// subtopic part, at most [`MAX_ENTRY_LEN`] long.
pub fn entry_name(topic_slug: &str, subtopic: &str) -> Result<String> {
    let sub = slugify(subtopic)?;
    if sub == topic_slug || sub.starts_with(&format!("{topic_slug}-")) {
        return Ok(sub);
    }
    Ok(format!("{topic_slug}-{sub}"))
}

/// True when `name` is the slug itself or one of its `slug-*` entries.
pub fn matches_prefix(name: &str, slug: &str) -> bool {
    name == slug
        || name
            .strip_prefix(slug)
            .is_some_and(|rest| rest.starts_with('-') && rest.len() > 1)
}

/// Check an entry name (or a topic slug, which is never longer).
pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > MAX_ENTRY_LEN || !slug_re().is_match(slug) {
        return Err(SkillError::InvalidSlug(slug.to_string()));
    }
    if slug.contains("--") {
        return Err(SkillError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_examples() {
        assert_eq!(slugify("Laravel 12").unwrap(), "laravel-12");
        assert_eq!(
            slugify("  Kubernetes Networking!!").unwrap(),
            "kubernetes-networking"
        );
        assert_eq!(slugify("React Hooks").unwrap(), "react-hooks");
    }

    #[test]
    fn collapses_whitespace_and_punctuation() {
        assert_eq!(slugify("rust \t  async\nruntime").unwrap(), "rust-async-runtime");
        assert_eq!(slugify("Node.js / Express").unwrap(), "nodejs-express");
        assert_eq!(slugify("--already--hyphenated--").unwrap(), "already-hyphenated");
        assert_eq!(slugify("C++ templates").unwrap(), "c-templates");
    }

    #[test]
    fn output_alphabet_and_idempotence() {
        let topics = [
            "Laravel 12",
            "  Kubernetes Networking!!",
            "Über café — naïve",
            "a",
            "ALL CAPS TOPIC 2024",
            "tabs\tand\nnewlines",
            "emoji 🚀 launch",
            &"very long topic name ".repeat(10),
        ];
        for t in topics {
            let s = slugify(t).unwrap();
            assert!(
                s.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "bad char in {s:?}"
            );
            assert!(!s.starts_with('-') && !s.ends_with('-'), "edge hyphen in {s:?}");
            assert!(s.len() <= MAX_SLUG_LEN);
            assert_eq!(slugify(&s).unwrap(), s, "not idempotent for {t:?}");
            validate_slug(&s).unwrap_or_else(|_| panic!("slugify produced invalid slug {s:?}"));
        }
    }

    #[test]
    fn long_topics_cut_at_word_boundary() {
        let s = slugify(&"kubernetes ".repeat(10)).unwrap();
        assert!(s.len() <= MAX_SLUG_LEN);
        assert!(s.split('-').all(|w| w == "kubernetes"));
    }

    #[test]
    fn empty_topics_are_invalid_input() {
        for t in ["", "   ", "!!!", "—"] {
            assert!(
                matches!(slugify(t), Err(SkillError::InvalidInput(_))),
                "expected InvalidInput for {t:?}"
            );
        }
    }

    #[test]
    fn entry_names() {
        assert_eq!(entry_name("react", "Hooks").unwrap(), "react-hooks");
        assert_eq!(entry_name("react", "React Hooks").unwrap(), "react-hooks");
        assert_eq!(entry_name("react", "react").unwrap(), "react");
        assert_eq!(
            entry_name("laravel-12", "Eloquent ORM").unwrap(),
            "laravel-12-eloquent-orm"
        );
        assert!(entry_name("react", "??").is_err());
    }

    #[test]
    fn long_topic_keeps_every_subtopic() {
        let topic = slugify("kubernetes networking deep dive into container network cni").unwrap();
        assert!(topic.len() >= 58 && topic.len() <= MAX_SLUG_LEN);
        let calico = entry_name(&topic, "calico").unwrap();
        let cilium = entry_name(&topic, "cilium").unwrap();
        assert_eq!(calico, format!("{topic}-calico"));
        assert_eq!(cilium, format!("{topic}-cilium"));
        assert!(matches_prefix(&calico, &topic));
        validate_slug(&cilium).unwrap();
    }

    #[test]
    fn full_length_topic_and_subtopic_still_compose() {
        let topic = slugify(&format!("{} {}", "a".repeat(40), "b".repeat(40))).unwrap();
        let topic = format!("{topic}-{}", "c".repeat(MAX_SLUG_LEN - topic.len() - 1));
        assert_eq!(topic.len(), MAX_SLUG_LEN);
        let name = entry_name(&topic, &"d".repeat(80)).unwrap();
        assert!(name.starts_with(&format!("{topic}-d")));
        assert!(name.len() <= MAX_ENTRY_LEN);
        assert!(matches_prefix(&name, &topic));
        validate_slug(&name).unwrap();
    }

    #[test]
    fn prefix_matching() {
        assert!(matches_prefix("react", "react"));
        assert!(matches_prefix("react-hooks", "react"));
        assert!(!matches_prefix("reactive", "react"));
        assert!(!matches_prefix("react-", "react"));
        assert!(!matches_prefix("preact", "react"));
    }

    #[test]
    fn valid_slugs() {
        for slug in ["react-hooks", "a", "laravel-12", "x1"] {
            validate_slug(slug).unwrap_or_else(|_| panic!("expected valid: {slug}"));
        }
    }

    #[test]
    fn invalid_slugs() {
        for slug in [
            "",
            "-starts-with-dash",
            "ends-with-dash-",
            "has spaces",
            "UPPER",
            "a_b",
            "double--dash",
        ] {
            assert!(validate_slug(slug).is_err(), "expected invalid: {slug}");
        }
    }
}
