use crate::error::{Result, SkillError};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// Prevents partial writes from leaving a truncated SKILL.md behind.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    std::fs::create_dir_all(dir).map_err(|e| SkillError::fs("create", dir, e))?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| SkillError::fs("create", dir, e))?;
    tmp.write_all(data)
        .map_err(|e| SkillError::fs("write", path, e))?;
    tmp.persist(path)
        .map_err(|e| SkillError::fs("write", path, e.error))?;
    Ok(())
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| SkillError::fs("create", path, e))
}

/// Rename `from` to `to`. Both must live on the same filesystem, which holds
/// for the staging and trash directories since they sit inside the output root.
pub fn move_dir(from: &Path, to: &Path) -> Result<()> {
    std::fs::rename(from, to).map_err(|e| SkillError::fs("move", from, e))
}

pub fn remove_dir(path: &Path) -> Result<()> {
    std::fs::remove_dir_all(path).map_err(|e| SkillError::fs("delete", path, e))
}
