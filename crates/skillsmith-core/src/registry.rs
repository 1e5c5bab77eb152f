//! The regeneration pipeline:
//! slug → scope/root → scan → decide → gather content → apply → report.
//!
//! [`Plan`] captures everything resolved up front (slug, [`Target`], policy,
//! planned entries, existing entries). Later steps only read from it.

use crate::apply::{self, Applied};
use crate::config::Config;
use crate::decision::{self, Decision, DecisionInput, PlannedEntry, PreviewLine, Selection};
use crate::document::{self, SkillDocument, SkillMeta};
use crate::error::{Result, SkillError};
use crate::invocation::Invocation;
use crate::research::{self, Researcher};
use crate::scanner;
use crate::scope::{self, Roots, Target};
use crate::slug;
use crate::types::{Confirmation, Layout, NonInteractiveDefault, ReplacementPolicy, SelectionMode};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    /// Topic as the user spelled it.
    pub topic: String,
    pub slug: String,
    pub target: Target,
    pub policy: ReplacementPolicy,
    pub mode: SelectionMode,
    pub layout: Layout,
    pub planned: Vec<PlannedEntry>,
    pub existing: Vec<String>,
}

impl Plan {
    /// Resolve an invocation against the configuration and scan the target.
    ///
    /// Layout follows the modifiers when given; otherwise subtopics mean
    /// multi-skill mode and no subtopics mean a single entry.
    pub fn new(
        inv: &Invocation,
        subtopics: &[String],
        config: &Config,
        roots: &Roots,
    ) -> Result<Self> {
        let slug = inv.topic_slug()?;
        let scope = scope::resolve_scope(inv.scope, config.default_scope);
        let target = Target::new(scope, roots)?;
        let policy = inv.policy.unwrap_or(config.policy);

        let layout = match (inv.layout, subtopics.is_empty()) {
            (Some(Layout::Multi), true) => {
                return Err(SkillError::InvalidInput(
                    "multi-skill mode needs at least one subtopic".to_string(),
                ))
            }
            (Some(layout), _) => layout,
            (None, true) => Layout::Single,
            (None, false) => Layout::Multi,
        };

        let planned = match layout {
            Layout::Single => {
                if !subtopics.is_empty() {
                    tracing::warn!(count = subtopics.len(), "single-skill mode ignores subtopics");
                }
                vec![PlannedEntry {
                    name: slug.clone(),
                    title: inv.topic.clone(),
                    subtopic: None,
                }]
            }
            Layout::Multi => {
                let mut planned: Vec<PlannedEntry> = Vec::new();
                for sub in subtopics {
                    let name = slug::entry_name(&slug, sub)?;
                    if planned.iter().any(|p| p.name == name) {
                        tracing::warn!(%name, "duplicate subtopic dropped");
                        continue;
                    }
                    planned.push(PlannedEntry {
                        name,
                        title: sub.trim().to_string(),
                        subtopic: Some(sub.trim().to_string()),
                    });
                }
                planned
            }
        };

        let existing = scanner::scan(&target.root, &slug)?;
        tracing::debug!(
            %slug,
            scope = %target.scope,
            root = %target.root.display(),
            planned = planned.len(),
            existing = existing.len(),
            "planned invocation"
        );

        Ok(Self {
            topic: inv.topic.clone(),
            slug,
            target,
            policy,
            mode: config.selection,
            layout,
            planned,
            existing,
        })
    }

    pub fn preview(&self) -> Vec<PreviewLine> {
        decision::preview(&self.planned, &self.existing)
    }

    pub fn needs_confirmation(&self) -> bool {
        decision::needs_confirmation(&self.existing, self.policy, self.mode)
    }

    pub fn decide(
        &self,
        confirmation: Confirmation,
        selection: Option<&Selection>,
        non_interactive: NonInteractiveDefault,
    ) -> Result<Decision> {
        decision::decide(
            &self.existing,
            &self.planned,
            DecisionInput {
                policy: self.policy,
                mode: self.mode,
                confirmation,
                selection,
                non_interactive,
            },
        )
    }
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// Text and provenance for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryContent {
    pub description: String,
    pub sources: Vec<String>,
    pub body: String,
}

/// Where entry bodies come from.
pub enum ContentSource<'a> {
    /// The same user-supplied text for every entry.
    Manual(String),
    /// Looked up per entry with bounded retries.
    Research {
        researcher: &'a dyn Researcher,
        max_attempts: u32,
        min_len: usize,
    },
    /// Bodies keyed by entry name (analyze).
    Prepared(BTreeMap<String, String>),
}

/// Entries a decision will write (created and updated), in plan order.
pub fn entries_to_write(decision: &Decision) -> Vec<&PlannedEntry> {
    match decision {
        Decision::Fresh { create } | Decision::Replace { create, .. } => create.iter().collect(),
        Decision::Merge { create, update, .. } => create.iter().chain(update).collect(),
        Decision::Abort { .. } => Vec::new(),
    }
}

/// Collect content for every entry the decision writes. Runs before anything
/// on disk changes, so a research failure leaves the registry untouched.
pub fn gather_content(
    plan: &Plan,
    decision: &Decision,
    source: &ContentSource<'_>,
    description: Option<&str>,
    extra_sources: &[String],
) -> Result<BTreeMap<String, EntryContent>> {
    let mut out = BTreeMap::new();
    for entry in entries_to_write(decision) {
        let (text, mut sources) = match source {
            ContentSource::Manual(text) => (text.clone(), Vec::new()),
            ContentSource::Research {
                researcher,
                max_attempts,
                min_len,
            } => {
                let query = match &entry.subtopic {
                    Some(sub) => format!("{} {sub}", plan.topic),
                    None => plan.topic.clone(),
                };
                let findings = research::research(*researcher, &query, *max_attempts, *min_len)?;
                (findings.content, findings.sources)
            }
            ContentSource::Prepared(bodies) => match bodies.get(&entry.name) {
                Some(body) => (body.clone(), Vec::new()),
                None => {
                    return Err(SkillError::InvalidInput(format!(
                        "no content prepared for '{}'",
                        entry.name
                    )))
                }
            },
        };
        for s in extra_sources {
            if !sources.contains(s) {
                sources.push(s.clone());
            }
        }
        out.insert(
            entry.name.clone(),
            EntryContent {
                description: description
                    .map(str::to_string)
                    .unwrap_or_else(|| default_description(plan, entry)),
                sources,
                body: document::default_body(&entry.title, &text),
            },
        );
    }
    Ok(out)
}

fn default_description(plan: &Plan, entry: &PlannedEntry) -> String {
    match &entry.subtopic {
        Some(sub) => format!("{sub} ({})", plan.topic),
        None => format!("Reference notes on {}", plan.topic),
    }
}

/// Assemble the `SKILL.md` for `entry`.
pub fn render_entry(
    plan: &Plan,
    entry: &PlannedEntry,
    content: &EntryContent,
    generated: NaiveDate,
) -> SkillDocument {
    SkillDocument {
        meta: SkillMeta {
            name: entry.name.clone(),
            description: content.description.clone(),
            topic: Some(plan.slug.clone()),
            subtopic: entry.subtopic.clone(),
            generated: Some(generated),
            sources: content.sources.clone(),
        },
        body: content.body.clone(),
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub topic: String,
    pub slug: String,
    pub scope: crate::types::Scope,
    pub root: PathBuf,
    pub decision: String,
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub removed: Vec<String>,
    pub retained: Vec<String>,
    /// Planned entries left out by the selection.
    pub skipped: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
}

impl Report {
    fn from_applied(plan: &Plan, decision: &Decision, applied: Applied) -> Self {
        let written: Vec<&str> = applied
            .created
            .iter()
            .chain(&applied.updated)
            .map(String::as_str)
            .collect();
        let skipped = plan
            .planned
            .iter()
            .filter(|p| !written.contains(&p.name.as_str()))
            .map(|p| p.name.clone())
            .collect();
        Self {
            topic: plan.topic.clone(),
            slug: plan.slug.clone(),
            scope: plan.target.scope,
            root: plan.target.root.clone(),
            decision: decision.label().to_string(),
            created: applied.created,
            updated: applied.updated,
            removed: applied.removed,
            retained: applied.retained,
            skipped,
            aborted: None,
        }
    }

    pub fn aborted(plan: &Plan, reason: &str) -> Self {
        Self {
            topic: plan.topic.clone(),
            slug: plan.slug.clone(),
            scope: plan.target.scope,
            root: plan.target.root.clone(),
            decision: "abort".to_string(),
            created: Vec::new(),
            updated: Vec::new(),
            removed: Vec::new(),
            retained: plan.existing.clone(),
            skipped: plan.planned.iter().map(|p| p.name.clone()).collect(),
            aborted: Some(reason.to_string()),
        }
    }
}

/// Apply `decision` using the gathered `content`. An abort decision produces
/// an aborted report and touches nothing.
pub fn execute(
    plan: &Plan,
    decision: &Decision,
    content: &BTreeMap<String, EntryContent>,
    generated: NaiveDate,
) -> Result<Report> {
    if let Decision::Abort { reason } = decision {
        return Ok(Report::aborted(plan, reason));
    }
    let render = |entry: &PlannedEntry| -> Result<SkillDocument> {
        let c = content.get(&entry.name).ok_or_else(|| {
            SkillError::InvalidInput(format!("no content gathered for '{}'", entry.name))
        })?;
        Ok(render_entry(plan, entry, c, generated))
    };
    let applied = apply::apply(&plan.target, decision, &render)?;
    Ok(Report::from_applied(plan, decision, applied))
}

/// Delete every entry belonging to `slug` under `target`, all or nothing.
pub fn remove(target: &Target, slug: &str) -> Result<Vec<String>> {
    let existing = scanner::scan(&target.root, slug)?;
    if existing.is_empty() {
        return Err(SkillError::EntryNotFound(slug.to_string()));
    }
    let decision = Decision::Replace {
        remove: existing,
        create: Vec::new(),
    };
    let applied = apply::apply(target, &decision, &|e: &PlannedEntry| -> Result<SkillDocument> {
        Err(SkillError::InvalidInput(format!(
            "removal does not write '{}'",
            e.name
        )))
    })?;
    Ok(applied.removed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
