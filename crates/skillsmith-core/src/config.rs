use crate::error::Result;
use crate::paths;
use crate::types::{NonInteractiveDefault, ReplacementPolicy, Scope, SelectionMode};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ResearchConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// External lookup command: `[program, args...]`; the query is appended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Findings shorter than this (in characters) count as insufficient.
    #[serde(default = "default_min_findings_len")]
    pub min_findings_len: usize,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_min_findings_len() -> usize {
    200
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            command: None,
            max_attempts: default_max_attempts(),
            min_findings_len: default_min_findings_len(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Scope used when an invocation carries no scope modifier.
    #[serde(default = "default_scope")]
    pub default_scope: Scope,
    #[serde(default = "default_policy")]
    pub policy: ReplacementPolicy,
    #[serde(default = "default_selection")]
    pub selection: SelectionMode,
    /// What happens when replacement needs confirmation and nobody can answer:
    /// `proceed` generates alongside the existing entries, `abort` stops.
    /// Neither deletes anything.
    #[serde(default = "default_non_interactive")]
    pub non_interactive: NonInteractiveDefault,
    #[serde(default)]
    pub research: ResearchConfig,
}

fn default_version() -> u32 {
    1
}

fn default_scope() -> Scope {
    Scope::Project
}

fn default_policy() -> ReplacementPolicy {
    ReplacementPolicy::Replace
}

fn default_selection() -> SelectionMode {
    SelectionMode::PerTopic
}

fn default_non_interactive() -> NonInteractiveDefault {
    NonInteractiveDefault::Proceed
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            default_scope: default_scope(),
            policy: default_policy(),
            selection: default_selection(),
            non_interactive: default_non_interactive(),
            research: ResearchConfig::default(),
        }
    }
}

impl Config {
    /// Load `<project>/.claude/skillsmith.yaml`; a missing file means defaults.
    pub fn load(project: &Path) -> Result<Self> {
        let path = paths::config_path(project);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, project: &Path) -> Result<()> {
        let path = paths::config_path(project);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.version != 1 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("unsupported config version {}", self.version),
            });
        }

        if self.research.max_attempts == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "research.max_attempts is 0: every lookup will be reported unavailable"
                    .to_string(),
            });
        } else if self.research.max_attempts > 5 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "research.max_attempts is {}; only 5 query phrasings exist",
                    self.research.max_attempts
                ),
            });
        }

        match &self.research.command {
            Some(cmd) if cmd.is_empty() || cmd[0].trim().is_empty() => {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: "research.command is empty".to_string(),
                });
            }
            Some(cmd) if which::which(&cmd[0]).is_err() => {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("research command '{}' not found on PATH", cmd[0]),
                });
            }
            _ => {}
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
