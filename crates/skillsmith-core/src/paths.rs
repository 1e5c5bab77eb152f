use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const CLAUDE_DIR: &str = ".claude";
pub const SKILLS_DIR: &str = ".claude/skills";
pub const CONFIG_FILE: &str = ".claude/skillsmith.yaml";

pub const SKILL_FILE: &str = "SKILL.md";

/// Prefixes of the hidden working directories the applier creates inside an
/// output root. The scanner never reports them as entries.
pub const STAGING_PREFIX: &str = ".skillsmith-staging-";
pub const TRASH_PREFIX: &str = ".skillsmith-trash-";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `<base>/.claude/skills`, where `base` is a project directory or a home
/// directory.
pub fn skills_dir(base: &Path) -> PathBuf {
    base.join(SKILLS_DIR)
}

pub fn entry_dir(root: &Path, name: &str) -> PathBuf {
    root.join(name)
}

pub fn skill_file(root: &Path, name: &str) -> PathBuf {
    entry_dir(root, name).join(SKILL_FILE)
}

pub fn config_path(project: &Path) -> PathBuf {
    project.join(CONFIG_FILE)
}

pub fn claude_dir(project: &Path) -> PathBuf {
    project.join(CLAUDE_DIR)
}

/// True for names the scanner must skip (hidden dirs, staging, trash).
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_helpers() {
        let base = Path::new("/tmp/proj");
        assert_eq!(
            skills_dir(base),
            PathBuf::from("/tmp/proj/.claude/skills")
        );
        assert_eq!(
            skill_file(&skills_dir(base), "react-hooks"),
            PathBuf::from("/tmp/proj/.claude/skills/react-hooks/SKILL.md")
        );
        assert_eq!(
            config_path(base),
            PathBuf::from("/tmp/proj/.claude/skillsmith.yaml")
        );
    }

    #[test]
    fn working_dirs_are_hidden() {
        assert!(is_hidden(&format!("{STAGING_PREFIX}abc")));
        assert!(is_hidden(&format!("{TRASH_PREFIX}abc")));
        assert!(!is_hidden("react-hooks"));
    }
}
