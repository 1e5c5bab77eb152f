//! All-or-nothing application of a [`Decision`] to an output root.
//!
//! New entries are rendered into a hidden staging directory first, entries
//! being replaced are moved into a hidden trash directory, and only then are
//! staged entries moved into place. Any failure moves everything back, so a
//! slug never ends up with a mixture of old and new entries. If moving back
//! fails too, the trash directory is kept and its path is part of the error.

use crate::decision::{Decision, PlannedEntry};
use crate::document::SkillDocument;
use crate::error::{Result, SkillError};
use crate::paths;
use crate::scope::Target;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Filesystem mutations the applier performs; swapped out in tests to inject
/// failures at a chosen step.
pub trait FsOps {
    fn move_dir(&self, from: &Path, to: &Path) -> Result<()>;
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()>;
    fn remove_dir(&self, path: &Path) -> Result<()>;
}

pub struct RealFs;

impl FsOps for RealFs {
    fn move_dir(&self, from: &Path, to: &Path) -> Result<()> {
        crate::io::move_dir(from, to)
    }

    fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        crate::io::atomic_write(path, data)
    }

    fn remove_dir(&self, path: &Path) -> Result<()> {
        crate::io::remove_dir(path)
    }
}

/// What actually changed on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Applied {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub removed: Vec<String>,
    pub retained: Vec<String>,
}

pub fn apply(
    target: &Target,
    decision: &Decision,
    render: &dyn Fn(&PlannedEntry) -> Result<SkillDocument>,
) -> Result<Applied> {
    apply_with(&RealFs, target, decision, render)
}

pub fn apply_with(
    fs: &dyn FsOps,
    target: &Target,
    decision: &Decision,
    render: &dyn Fn(&PlannedEntry) -> Result<SkillDocument>,
) -> Result<Applied> {
    let no_names: &[String] = &[];
    let no_entries: &[PlannedEntry] = &[];
    let (create, update, remove, retain) = match decision {
        Decision::Fresh { create } => (create.as_slice(), no_entries, no_names, no_names),
        Decision::Replace { remove, create } => {
            (create.as_slice(), no_entries, remove.as_slice(), no_names)
        }
        Decision::Merge {
            create,
            update,
            retain,
        } => (
            create.as_slice(),
            update.as_slice(),
            no_names,
            retain.as_slice(),
        ),
        Decision::Abort { reason } => {
            return Err(SkillError::InvalidInput(format!(
                "cannot apply an aborted decision: {reason}"
            )))
        }
    };
    let root = target.root.as_path();

    // Nothing is mutated until every check and render has succeeded.
    for p in create {
        let dest = paths::entry_dir(root, &p.name);
        if dest.exists() && !remove.contains(&p.name) {
            return Err(SkillError::InvalidInput(format!(
                "entry '{}' already exists and is not part of this topic",
                p.name
            )));
        }
    }
    let updates = update
        .iter()
        .map(|p| refreshed(root, p, render))
        .collect::<Result<Vec<_>>>()?;

    crate::io::ensure_dir(root)?;
    let staging = hidden_dir(root, paths::STAGING_PREFIX)?;
    for p in create {
        render(p)?.write_to(&staging.path().join(&p.name))?;
    }

    let trash = hidden_dir(root, paths::TRASH_PREFIX)?;
    let mut txn = Txn::new(fs, root, trash.path());

    if let Err(e) = mutate(&mut txn, remove, create, staging.path(), &updates) {
        if txn.rollback() {
            return Err(e);
        }
        // Removed entries that could not be moved back live on in the trash.
        let kept = trash.keep();
        tracing::error!(trash = %kept.display(), "rollback incomplete; trash directory kept");
        return Err(SkillError::RollbackIncomplete {
            trash: kept,
            source: Box::new(e),
        });
    }

    for dir in [trash, staging] {
        let path = dir.path().to_path_buf();
        if let Err(e) = dir.close() {
            tracing::warn!(path = %path.display(), %e, "failed to clean up working directory");
        }
    }

    let applied = Applied {
        created: create.iter().map(|p| p.name.clone()).collect(),
        updated: update.iter().map(|p| p.name.clone()).collect(),
        removed: remove.to_vec(),
        retained: retain.to_vec(),
    };
    tracing::debug!(
        root = %root.display(),
        created = applied.created.len(),
        updated = applied.updated.len(),
        removed = applied.removed.len(),
        "applied decision"
    );
    Ok(applied)
}

fn mutate(
    txn: &mut Txn<'_>,
    remove: &[String],
    create: &[PlannedEntry],
    staging: &Path,
    updates: &[(PathBuf, Option<String>, String)],
) -> Result<()> {
    for name in remove {
        txn.trash(name)?;
    }
    for p in create {
        txn.place(&staging.join(&p.name), &p.name)?;
    }
    for (path, old, new) in updates {
        txn.rewrite(path, old.as_deref(), new)?;
    }
    Ok(())
}

fn hidden_dir(root: &Path, prefix: &str) -> Result<TempDir> {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir_in(root)
        .map_err(|e| SkillError::fs("create", root, e))
}

/// New `SKILL.md` content for an existing entry: fresh metadata, the existing
/// body kept so hand edits survive. Returns (path, previous content, new content).
fn refreshed(
    root: &Path,
    entry: &PlannedEntry,
    render: &dyn Fn(&PlannedEntry) -> Result<SkillDocument>,
) -> Result<(PathBuf, Option<String>, String)> {
    let path = paths::skill_file(root, &entry.name);
    let fresh = render(entry)?;
    let old = match std::fs::read_to_string(&path) {
        Ok(c) => Some(c),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(SkillError::fs("read", &path, e)),
    };
    let body = match &old {
        Some(content) => match SkillDocument::parse(content) {
            Some(doc) => doc.body,
            None => content.clone(),
        },
        None => fresh.body.clone(),
    };
    let doc = SkillDocument {
        meta: fresh.meta,
        body,
    };
    Ok((path, old, doc.render()?))
}

// ---------------------------------------------------------------------------
// Txn: undo log for the mutation phase
// ---------------------------------------------------------------------------

enum Step {
    Trashed(String),
    Placed(String),
    Rewrote(PathBuf, Option<String>),
}

struct Txn<'a> {
    fs: &'a dyn FsOps,
    root: &'a Path,
    trash: &'a Path,
    done: Vec<Step>,
}

impl<'a> Txn<'a> {
    fn new(fs: &'a dyn FsOps, root: &'a Path, trash: &'a Path) -> Self {
        Self {
            fs,
            root,
            trash,
            done: Vec::new(),
        }
    }

    fn trash(&mut self, name: &str) -> Result<()> {
        self.fs
            .move_dir(&self.root.join(name), &self.trash.join(name))?;
        self.done.push(Step::Trashed(name.to_string()));
        Ok(())
    }

    fn place(&mut self, staged: &Path, name: &str) -> Result<()> {
        self.fs.move_dir(staged, &self.root.join(name))?;
        self.done.push(Step::Placed(name.to_string()));
        Ok(())
    }

    fn rewrite(&mut self, path: &Path, old: Option<&str>, new: &str) -> Result<()> {
        self.fs.write_file(path, new.as_bytes())?;
        self.done
            .push(Step::Rewrote(path.to_path_buf(), old.map(str::to_string)));
        Ok(())
    }

    /// Undo completed steps in reverse order. Every step is attempted even
    /// after one fails; returns whether all of them succeeded.
    fn rollback(&mut self) -> bool {
        let mut clean = true;
        while let Some(step) = self.done.pop() {
            let result = match &step {
                Step::Placed(name) => self.fs.remove_dir(&self.root.join(name)),
                Step::Trashed(name) => self
                    .fs
                    .move_dir(&self.trash.join(name), &self.root.join(name)),
                Step::Rewrote(path, Some(old)) => self.fs.write_file(path, old.as_bytes()),
                Step::Rewrote(path, None) => std::fs::remove_file(path)
                    .map_err(|e| SkillError::fs("delete", path, e)),
            };
            if let Err(e) = result {
                tracing::error!(%e, "rollback step failed");
                clean = false;
            }
        }
        clean
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
