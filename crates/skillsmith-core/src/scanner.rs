//! Read-only enumeration of existing entries under an output root.

use crate::document::{self, SkillMeta};
use crate::error::{Result, SkillError};
use crate::paths;
use crate::slug;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct EntrySummary {
    pub name: String,
    pub path: PathBuf,
    /// `None` when the entry has no readable `SKILL.md` frontmatter.
    pub meta: Option<SkillMeta>,
}

/// Names of visible entry directories in `root`, sorted. A missing root is
/// an empty registry.
fn entry_names(root: &Path) -> Result<Vec<String>> {
    let entries = match std::fs::read_dir(root) {
        Ok(e) => e,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(SkillError::fs("read", root, e)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SkillError::fs("read", root, e))?;
        let is_dir = entry
            .file_type()
            .map_err(|e| SkillError::fs("read", entry.path(), e))?
            .is_dir();
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_dir || paths::is_hidden(&name) {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}

/// Entries belonging to `slug`: the entry named exactly `slug` plus every
/// `slug-*` entry. A prefix match whose `SKILL.md` names a different topic
/// (`react-native-navigation` under `react`) is not ours and is left out.
pub fn scan(root: &Path, slug: &str) -> Result<Vec<String>> {
    let mut matched = Vec::new();
    for name in entry_names(root)? {
        if !slug::matches_prefix(&name, slug) {
            continue;
        }
        if name != slug {
            let declared = document::read_meta(&paths::entry_dir(root, &name))
                .and_then(|m| m.topic);
            if let Some(topic) = declared {
                if topic != slug {
                    tracing::debug!(entry = %name, %topic, "prefix match owned by another topic");
                    continue;
                }
            }
        }
        matched.push(name);
    }
    Ok(matched)
}

/// Every entry under `root` with whatever metadata it carries.
pub fn list_all(root: &Path) -> Result<Vec<EntrySummary>> {
    Ok(entry_names(root)?
        .into_iter()
        .map(|name| {
            let path = paths::entry_dir(root, &name);
            let meta = document::read_meta(&path);
            EntrySummary { name, path, meta }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SkillDocument;
    use tempfile::TempDir;

    fn write_entry(root: &Path, name: &str, topic: Option<&str>) {
        SkillDocument {
            meta: SkillMeta {
                name: name.to_string(),
                description: format!("{name} skill"),
                topic: topic.map(str::to_string),
                subtopic: None,
                generated: None,
                sources: Vec::new(),
            },
            body: "# x\n".to_string(),
        }
        .write_to(&root.join(name))
        .unwrap();
    }

    #[test]
    fn missing_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("does/not/exist");
        assert!(scan(&root, "react").unwrap().is_empty());
        assert!(list_all(&root).unwrap().is_empty());
    }

    #[test]
    fn matches_exact_and_prefix_sorted() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        for name in ["react-state", "react", "react-hooks", "reactive", "vue"] {
            write_entry(root, name, Some("react"));
        }
        assert_eq!(
            scan(root, "react").unwrap(),
            vec!["react", "react-hooks", "react-state"]
        );
    }

    #[test]
    fn prefix_owned_by_other_topic_is_excluded() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write_entry(root, "react-hooks", Some("react"));
        write_entry(root, "react-native-navigation", Some("react-native"));
        // hand-made entry without metadata matches by name
        std::fs::create_dir_all(root.join("react-legacy")).unwrap();

        assert_eq!(
            scan(root, "react").unwrap(),
            vec!["react-hooks", "react-legacy"]
        );
        assert_eq!(
            scan(root, "react-native").unwrap(),
            vec!["react-native-navigation"]
        );
    }

    #[test]
    fn skips_files_and_hidden_dirs() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::write(root.join("react-notes"), "file, not entry").unwrap();
        std::fs::create_dir_all(root.join(format!("{}react", paths::STAGING_PREFIX))).unwrap();
        std::fs::create_dir_all(root.join(".react-hidden")).unwrap();
        write_entry(root, "react", None);
        assert_eq!(scan(root, "react").unwrap(), vec!["react"]);
    }

    #[test]
    fn scan_does_not_mutate() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write_entry(root, "react-hooks", Some("react"));
        let before = std::fs::read_to_string(root.join("react-hooks/SKILL.md")).unwrap();
        scan(root, "react").unwrap();
        let after = std::fs::read_to_string(root.join("react-hooks/SKILL.md")).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn list_all_reports_metadata() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write_entry(root, "git", None);
        std::fs::create_dir_all(root.join("bare")).unwrap();
        let all = list_all(root).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "bare");
        assert!(all[0].meta.is_none());
        assert_eq!(all[1].meta.as_ref().unwrap().description, "git skill");
    }
}
