//! Bounded research retries.
//!
//! The lookup itself is delegated to a [`Researcher`]; this module only varies
//! the query phrasing, caps the number of attempts and turns an exhausted
//! search into [`SkillError::ResearchUnavailable`]. Nothing is ever invented
//! when every attempt comes back short.

use crate::error::{Result, SkillError};
use std::process::{Command, Stdio};

/// Text returned by a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Findings {
    pub query: String,
    pub content: String,
    /// URLs or references the researcher reported, one per line of the
    /// trailing `Sources:` block if present.
    pub sources: Vec<String>,
}

pub trait Researcher {
    /// Look `query` up. `Ok(None)` means the lookup ran but found nothing
    /// useful; `Err` means the researcher itself could not run.
    fn lookup(&self, query: &str) -> Result<Option<Findings>>;
}

/// Query phrasings tried in order.
pub fn query_variants(topic: &str) -> Vec<String> {
    let topic = topic.trim();
    vec![
        topic.to_string(),
        format!("{topic} documentation"),
        format!("{topic} best practices"),
        format!("{topic} tutorial"),
        format!("{topic} examples"),
    ]
}

/// Try up to `max_attempts` phrasings of `topic`, returning the first findings
/// with at least `min_len` characters of content.
pub fn research(
    researcher: &dyn Researcher,
    topic: &str,
    max_attempts: u32,
    min_len: usize,
) -> Result<Findings> {
    let mut attempts = 0u32;
    for query in query_variants(topic).into_iter().take(max_attempts as usize) {
        attempts += 1;
        match researcher.lookup(&query)? {
            Some(f) if f.content.trim().len() >= min_len => {
                tracing::debug!(%query, attempts, "research succeeded");
                return Ok(f);
            }
            Some(f) => {
                tracing::debug!(%query, len = f.content.trim().len(), "findings too short");
            }
            None => tracing::debug!(%query, "no findings"),
        }
    }
    Err(SkillError::ResearchUnavailable {
        topic: topic.to_string(),
        attempts,
    })
}

// ---------------------------------------------------------------------------
// CommandResearcher
// ---------------------------------------------------------------------------

/// Runs an external command with the query appended as the last argument and
/// reads findings from its stdout. A non-zero exit counts as an empty attempt.
#[derive(Debug, Clone)]
pub struct CommandResearcher {
    program: String,
    args: Vec<String>,
}

impl CommandResearcher {
    /// Build from `[program, args...]`, checking that the program resolves.
    pub fn new(command: &[String]) -> Result<Self> {
        let (program, args) = command.split_first().ok_or_else(|| {
            SkillError::InvalidInput("research command is empty".to_string())
        })?;
        which::which(program)
            .map_err(|_| SkillError::ResearchCommandNotFound(program.clone()))?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

impl Researcher for CommandResearcher {
    fn lookup(&self, query: &str) -> Result<Option<Findings>> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(query)
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| SkillError::ResearchFailed(format!("{}: {e}", self.program)))?;

        if !output.status.success() {
            tracing::warn!(
                program = %self.program,
                code = ?output.status.code(),
                %query,
                "research command exited unsuccessfully"
            );
            return Ok(None);
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(parse_findings(query, &stdout)))
    }
}

/// Split command output into content and an optional trailing `Sources:`
/// block of `- <url>` lines.
pub fn parse_findings(query: &str, output: &str) -> Findings {
    let (content, sources) = match output.rfind("\nSources:") {
        Some(pos) => {
            let sources = output[pos + "\nSources:".len()..]
                .lines()
                .map(|l| l.trim().trim_start_matches(['-', '*']).trim())
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect();
            (&output[..pos], sources)
        }
        None => (output, Vec::new()),
    };
    Findings {
        query: query.to_string(),
        content: content.trim().to_string(),
        sources,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
