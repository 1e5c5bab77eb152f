//! Scope → output root resolution.
//!
//! The scope is decided once per invocation and carried in a [`Target`];
//! nothing downstream looks at flags or configuration again.

use crate::error::{Result, SkillError};
use crate::paths;
use crate::types::Scope;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// The two base directories an invocation can write under. The home
/// directory is only required once something targets the user scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roots {
    pub project: PathBuf,
    pub home: Option<PathBuf>,
}

impl Roots {
    pub fn new(project: impl Into<PathBuf>, home: impl Into<PathBuf>) -> Self {
        Self {
            project: project.into(),
            home: Some(home.into()),
        }
    }

    /// Pair `project` with the invoking user's home directory, if there is one.
    pub fn detect(project: &Path) -> Self {
        Self {
            project: project.to_path_buf(),
            home: home::home_dir(),
        }
    }

    /// Output root for `scope`. Fails only for the user scope when no home
    /// directory is known.
    pub fn output_root(&self, scope: Scope) -> Result<PathBuf> {
        match scope {
            Scope::Project => Ok(paths::skills_dir(&self.project)),
            Scope::User => self
                .home
                .as_deref()
                .map(paths::skills_dir)
                .ok_or(SkillError::HomeNotFound),
        }
    }
}

/// A resolved scope and the directory it maps to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Target {
    pub scope: Scope,
    pub root: PathBuf,
}

impl Target {
    pub fn new(scope: Scope, roots: &Roots) -> Result<Self> {
        Ok(Self {
            scope,
            root: roots.output_root(scope)?,
        })
    }
}

/// Pick the scope for an invocation: an explicit modifier wins, otherwise the
/// configured default.
pub fn resolve_scope(requested: Option<Scope>, default: Scope) -> Scope {
    requested.unwrap_or(default)
}
