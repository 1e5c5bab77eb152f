//! `SKILL.md`: YAML frontmatter followed by a Markdown body.

use crate::error::{Result, SkillError};
use crate::paths;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMeta {
    /// Entry name, identical to the directory name.
    pub name: String,
    pub description: String,
    /// Slug of the topic the entry was generated for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtopic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated: Option<NaiveDate>,
    #[serde(default)]
    pub sources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillDocument {
    pub meta: SkillMeta,
    pub body: String,
}

// ---------------------------------------------------------------------------
// Frontmatter parsing
// ---------------------------------------------------------------------------

/// Split `content` into the YAML between the first pair of `---` lines and
/// everything after the closing delimiter.
fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---")?;
    let rest = if let Some(r) = rest.strip_prefix('\n') {
        r
    } else if let Some(r) = rest.strip_prefix("\r\n") {
        r
    } else {
        return None;
    };
    let (fm, after) = if let Some(after) = rest.strip_prefix("---") {
        ("", after)
    } else {
        let end = rest.find("\n---")?;
        (&rest[..end], &rest[end + 4..])
    };
    let body = after
        .strip_prefix("\r\n")
        .or_else(|| after.strip_prefix('\n'))
        .unwrap_or(after);
    Some((fm, body))
}

impl SkillDocument {
    /// Parse a document; `None` when the frontmatter is missing or malformed.
    pub fn parse(content: &str) -> Option<Self> {
        let (fm, body) = split_frontmatter(content)?;
        let meta: SkillMeta = serde_yaml::from_str(fm).ok()?;
        Some(Self {
            meta,
            body: body.trim_start_matches(['\n', '\r']).to_string(),
        })
    }

    pub fn render(&self) -> Result<String> {
        let yaml = serde_yaml::to_string(&self.meta)?;
        let mut out = String::with_capacity(yaml.len() + self.body.len() + 16);
        out.push_str("---\n");
        out.push_str(&yaml);
        out.push_str("---\n\n");
        out.push_str(&self.body);
        if !self.body.ends_with('\n') {
            out.push('\n');
        }
        Ok(out)
    }

    /// Load `<root>/<name>/SKILL.md`.
    pub fn load(root: &Path, name: &str) -> Result<Self> {
        let path = paths::skill_file(root, name);
        if !path.is_file() {
            return Err(SkillError::EntryNotFound(name.to_string()));
        }
        let content = std::fs::read_to_string(&path)?;
        Self::parse(&content).ok_or_else(|| {
            SkillError::InvalidInput(format!("{} has no valid frontmatter", path.display()))
        })
    }

    /// Write `SKILL.md` into `dir`, creating it when needed.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        let rendered = self.render()?;
        crate::io::atomic_write(&dir.join(paths::SKILL_FILE), rendered.as_bytes())
    }
}

/// Metadata of the entry directory `dir`, if it has a readable `SKILL.md`.
pub fn read_meta(dir: &Path) -> Option<SkillMeta> {
    let path = dir.join(paths::SKILL_FILE);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), %e, "failed to read SKILL.md");
            return None;
        }
    };
    let doc = SkillDocument::parse(&content);
    if doc.is_none() {
        tracing::warn!(path = %path.display(), "SKILL.md has no valid frontmatter");
    }
    doc.map(|d| d.meta)
}

/// Body for supplied content: kept as-is when it opens with a heading,
/// otherwise prefixed with `# <title>`.
pub fn default_body(title: &str, content: &str) -> String {
    let content = content.trim();
    if content.starts_with('#') {
        format!("{content}\n")
    } else if content.is_empty() {
        format!("# {title}\n")
    } else {
        format!("# {title}\n\n{content}\n")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
