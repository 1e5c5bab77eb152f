use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SkillError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("focus '{focus}' matched nothing; available: {}", .suggestions.join(", "))]
    NoFocusMatch {
        focus: String,
        suggestions: Vec<String>,
    },

    #[error("invalid slug '{0}': must be lowercase alphanumeric with hyphens")]
    InvalidSlug(String),

    #[error("entry not found: {0}")]
    EntryNotFound(String),

    #[error(
        "research unavailable for '{topic}' after {attempts} attempt(s): provide the content manually"
    )]
    ResearchUnavailable { topic: String, attempts: u32 },

    #[error("research command not found: {0}")]
    ResearchCommandNotFound(String),

    #[error("research command failed: {0}")]
    ResearchFailed(String),

    #[error("failed to {op} {}: {source}", .path.display())]
    Filesystem {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{source}; rollback incomplete, removed entries kept in {}", .trash.display())]
    RollbackIncomplete {
        trash: PathBuf,
        #[source]
        source: Box<SkillError>,
    },

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SkillError {
    pub fn fs(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SkillError::Filesystem {
            op,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SkillError>;
