//! Deterministic inputs for `/analyze`: the project's top-level source areas.

use crate::error::{Result, SkillError};
use crate::invocation::Invocation;
use crate::slug;
use crate::types::Scope;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Build output and dependency directories that never describe the project.
pub const IGNORED_DIRS: &[&str] = &[
    "target",
    "node_modules",
    "dist",
    "build",
    "out",
    "vendor",
    "coverage",
    "__pycache__",
];

const MAX_DEPTH: usize = 3;
const MAX_FILES: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Area {
    /// Directory name as it appears on disk.
    pub name: String,
    pub slug: String,
    /// Relative paths of files in the area, sorted, at most [`MAX_FILES`].
    pub files: Vec<String>,
    /// True when the listing was cut short.
    pub truncated: bool,
}

fn skip(name: &str) -> bool {
    name.starts_with('.') || IGNORED_DIRS.contains(&name)
}

/// The topic `/analyze` uses when none is given: the project directory name.
pub fn project_topic(project: &Path) -> Result<String> {
    let canonical = project.canonicalize().unwrap_or_else(|_| project.to_path_buf());
    canonical
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            SkillError::InvalidInput(format!(
                "cannot derive a topic from '{}': name one explicitly",
                project.display()
            ))
        })
}

/// Top-level directories of `project` that look like source areas, sorted by
/// name.
pub fn discover_areas(project: &Path) -> Result<Vec<Area>> {
    let mut areas = Vec::new();
    for entry in std::fs::read_dir(project).map_err(|e| SkillError::fs("read", project, e))? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !entry.file_type()?.is_dir() || skip(&name) {
            continue;
        }
        let Ok(area_slug) = slug::slugify(&name) else {
            tracing::debug!(dir = %name, "directory name has no slug, skipped");
            continue;
        };
        let mut files = Vec::new();
        let mut truncated = false;
        collect_files(&entry.path(), &name, 1, &mut files, &mut truncated)?;
        files.sort();
        areas.push(Area {
            name,
            slug: area_slug,
            files,
            truncated,
        });
    }
    areas.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(areas)
}

fn collect_files(
    dir: &Path,
    rel: &str,
    depth: usize,
    out: &mut Vec<String>,
    truncated: &mut bool,
) -> Result<()> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)?.collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|e| e.file_name());
    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        if skip(&name) {
            continue;
        }
        let path = format!("{rel}/{name}");
        if entry.file_type()?.is_dir() {
            if depth < MAX_DEPTH {
                collect_files(&entry.path(), &path, depth + 1, out, truncated)?;
            } else {
                *truncated = true;
            }
        } else if out.len() < MAX_FILES {
            out.push(path);
        } else {
            *truncated = true;
            return Ok(());
        }
    }
    Ok(())
}

/// Keep the areas whose slug contains the slug of `focus`. Nothing left is
/// an input error that lists what could have been chosen.
pub fn apply_focus(areas: Vec<Area>, focus: &str) -> Result<Vec<Area>> {
    let needle = slug::slugify(focus)?;
    let suggestions: Vec<String> = areas.iter().map(|a| a.slug.clone()).collect();
    let kept: Vec<Area> = areas
        .into_iter()
        .filter(|a| a.slug.contains(&needle))
        .collect();
    if kept.is_empty() {
        return Err(SkillError::NoFocusMatch {
            focus: focus.to_string(),
            suggestions,
        });
    }
    Ok(kept)
}

/// Skill body for an area: a file map the agent can start from.
pub fn area_body(project_name: &str, area: &Area) -> String {
    let mut body = format!(
        "# {project_name}: {}\n\n## Files\n\n",
        area.name
    );
    if area.files.is_empty() {
        body.push_str("(no files)\n");
    }
    for f in &area.files {
        body.push_str(&format!("- `{f}`\n"));
    }
    if area.truncated {
        body.push_str("- …\n");
    }
    body
}

/// An `/analyze` invocation turned into learn inputs.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// The invocation with topic and scope filled in.
    pub invocation: Invocation,
    /// One subtopic per area, in area order.
    pub subtopics: Vec<String>,
    /// Entry bodies keyed by entry name.
    pub bodies: BTreeMap<String, String>,
}

/// Derive topic, subtopics and bodies for analyzing `project`. The topic
/// defaults to the project directory name and the scope to project.
pub fn prepare(inv: &Invocation, project: &Path) -> Result<Analysis> {
    let mut invocation = inv.clone();
    if invocation.topic.trim().is_empty() {
        invocation.topic = project_topic(project)?;
    }
    invocation.scope = Some(invocation.scope.unwrap_or(Scope::Project));
    let topic_slug = invocation.topic_slug()?;

    let mut areas = discover_areas(project)?;
    if let Some(focus) = &invocation.focus {
        areas = apply_focus(areas, focus)?;
    }
    if areas.is_empty() {
        return Err(SkillError::InvalidInput(format!(
            "no source directories found in {}",
            project.display()
        )));
    }

    let mut bodies = BTreeMap::new();
    for area in &areas {
        bodies.insert(
            slug::entry_name(&topic_slug, &area.name)?,
            area_body(&invocation.topic, area),
        );
    }
    Ok(Analysis {
        subtopics: areas.into_iter().map(|a| a.name).collect(),
        invocation,
        bodies,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        let p = dir.path();
        for f in [
            "src/main.rs",
            "src/api/routes.rs",
            "src/api/handlers.rs",
            "migrations/001_init.sql",
            "target/debug/app",
            "node_modules/left-pad/index.js",
            ".git/HEAD",
            "README.md",
        ] {
            let path = p.join(f);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, "x").unwrap();
        }
        dir
    }

    #[test]
    fn discovers_source_areas_only() {
        let dir = project();
        let areas = discover_areas(dir.path()).unwrap();
        let names: Vec<_> = areas.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["migrations", "src"]);
        assert_eq!(
            areas[1].files,
            ["src/api/handlers.rs", "src/api/routes.rs", "src/main.rs"]
        );
        assert!(!areas[1].truncated);
    }

    #[test]
    fn file_listing_is_bounded() {
        let dir = TempDir::new().unwrap();
        let area = dir.path().join("assets");
        std::fs::create_dir_all(&area).unwrap();
        for i in 0..(MAX_FILES + 5) {
            std::fs::write(area.join(format!("f{i:03}.txt")), "x").unwrap();
        }
        let areas = discover_areas(dir.path()).unwrap();
        assert_eq!(areas[0].files.len(), MAX_FILES);
        assert!(areas[0].truncated);
    }

    #[test]
    fn focus_filters_by_slug() {
        let dir = project();
        let areas = discover_areas(dir.path()).unwrap();
        let kept = apply_focus(areas, "Migrations").unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].slug, "migrations");
    }

    #[test]
    fn focus_without_match_suggests_areas() {
        let dir = project();
        let areas = discover_areas(dir.path()).unwrap();
        match apply_focus(areas, "frontend") {
            Err(SkillError::NoFocusMatch { focus, suggestions }) => {
                assert_eq!(focus, "frontend");
                assert_eq!(suggestions, ["migrations", "src"]);
            }
            other => panic!("expected NoFocusMatch, got {other:?}"),
        }
    }

    #[test]
    fn project_topic_is_dir_name() {
        let dir = TempDir::new().unwrap();
        let p = dir.path().join("Billing Service");
        std::fs::create_dir_all(&p).unwrap();
        assert_eq!(project_topic(&p).unwrap(), "Billing Service");
    }

    #[test]
    fn prepare_defaults_topic_and_scope() {
        let dir = project();
        let inv = Invocation::parse("--focus src").unwrap();
        let analysis = prepare(&inv, dir.path()).unwrap();
        assert_eq!(analysis.invocation.scope, Some(Scope::Project));
        assert!(!analysis.invocation.topic.is_empty());
        assert_eq!(analysis.subtopics, ["src"]);
        let slug = analysis.invocation.topic_slug().unwrap();
        assert!(analysis.bodies.contains_key(&format!("{slug}-src")));
    }

    #[test]
    fn prepare_keeps_explicit_topic_and_scope() {
        let dir = project();
        let inv = Invocation::parse("billing --global").unwrap();
        let analysis = prepare(&inv, dir.path()).unwrap();
        assert_eq!(analysis.invocation.topic, "billing");
        assert_eq!(analysis.invocation.scope, Some(Scope::User));
        assert_eq!(
            analysis.bodies.keys().collect::<Vec<_>>(),
            ["billing-migrations", "billing-src"]
        );
    }

    #[test]
    fn body_lists_files() {
        let area = Area {
            name: "src".to_string(),
            slug: "src".to_string(),
            files: vec!["src/main.rs".to_string()],
            truncated: true,
        };
        let body = area_body("app", &area);
        assert!(body.starts_with("# app: src\n"));
        assert!(body.contains("- `src/main.rs`\n"));
        assert!(body.contains("…"));
    }
}
