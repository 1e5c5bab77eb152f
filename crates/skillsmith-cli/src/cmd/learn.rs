use super::{load_config, parse_invocation};
use crate::output::{print_json, print_preview, print_report};
use crate::prompt;
use anyhow::Context;
use clap::Args;
use skillsmith_core::analyze;
use skillsmith_core::config::Config;
use skillsmith_core::decision::{Decision, Selection};
use skillsmith_core::invocation::Invocation;
use skillsmith_core::registry::{self, ContentSource, Plan, Report};
use skillsmith_core::research::CommandResearcher;
use skillsmith_core::scope::Roots;
use skillsmith_core::types::{Confirmation, Layout, ReplacementPolicy, SelectionMode};
use skillsmith_core::SkillError;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct GenerateArgs {
    /// Subtopic; repeat for several. Each becomes its own <topic>-<subtopic> entry
    #[arg(long = "subtopic", short = 's', value_name = "SUBTOPIC")]
    subtopics: Vec<String>,

    /// Frontmatter description for the generated entries
    #[arg(long)]
    description: Option<String>,

    /// Source URL to record in the frontmatter; repeatable
    #[arg(long = "source", value_name = "URL")]
    sources: Vec<String>,

    /// Entry content, used instead of running the research command
    #[arg(long, conflicts_with = "body_file")]
    body: Option<String>,

    /// Read entry content from a file ("-" for stdin)
    #[arg(long, value_name = "PATH")]
    body_file: Option<PathBuf>,

    /// Confirm replacement of existing entries without asking
    #[arg(long, short = 'y', conflicts_with = "no")]
    yes: bool,

    /// Decline replacement of existing entries without asking
    #[arg(long)]
    no: bool,

    /// Pick entries from the numbered preview: all, none, "only 1,3", "skip 2"
    #[arg(long, value_name = "CHOICE")]
    select: Option<String>,

    /// Topic and modifiers, e.g. "laravel 12 --global --update"
    #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

// ---------------------------------------------------------------------------
// plan
// ---------------------------------------------------------------------------

pub fn plan(root: &Path, args: GenerateArgs, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let inv = parse_invocation(&args.args)?;
    let mut plan = Plan::new(&inv, &args.subtopics, &config, &Roots::detect(root))?;
    let selection = selection(&args, &mut plan)?;
    let confirmation = flag_confirmation(&args).unwrap_or(Confirmation::NoAnswer);
    let decision = plan.decide(confirmation, selection.as_ref(), config.non_interactive)?;

    if json {
        print_json(&serde_json::json!({
            "plan": plan,
            "preview": plan.preview(),
            "needs_confirmation": plan.needs_confirmation(),
            "decision": decision,
        }))?;
        return Ok(());
    }

    println!(
        "'{}' -> {} ({} scope, {} policy)",
        plan.topic,
        plan.target.root.display(),
        plan.target.scope,
        plan.policy
    );
    print_preview(&plan.preview());
    if !plan.existing.is_empty() {
        println!("Existing: {}", plan.existing.join(", "));
    }
    match &decision {
        Decision::Abort { reason } => println!("Would abort: {reason}"),
        d => println!("Would {}.", d.label()),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// learn
// ---------------------------------------------------------------------------

pub fn learn(root: &Path, args: GenerateArgs, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let inv = parse_invocation(&args.args)?;
    generate(root, &config, &inv, &args.subtopics, &args, None, json)
}

// ---------------------------------------------------------------------------
// analyze
// ---------------------------------------------------------------------------

pub fn analyze(root: &Path, args: GenerateArgs, json: bool) -> anyhow::Result<()> {
    if !args.subtopics.is_empty() {
        anyhow::bail!("analyze derives subtopics from the project; use --focus to narrow them");
    }
    if args.body.is_some() || args.body_file.is_some() {
        anyhow::bail!("analyze writes its own content; --body is only for learn");
    }
    let config = load_config(root)?;
    let inv = parse_invocation(&args.args)?;
    if inv.layout == Some(Layout::Single) {
        anyhow::bail!("analyze always writes one entry per source area");
    }
    let analysis = analyze::prepare(&inv, root)?;
    tracing::debug!(areas = analysis.subtopics.len(), "analyzed project");
    generate(
        root,
        &config,
        &analysis.invocation,
        &analysis.subtopics,
        &args,
        Some(analysis.bodies),
        json,
    )
}

// ---------------------------------------------------------------------------
// Shared pipeline
// ---------------------------------------------------------------------------

fn generate(
    root: &Path,
    config: &Config,
    inv: &Invocation,
    subtopics: &[String],
    args: &GenerateArgs,
    prepared: Option<BTreeMap<String, String>>,
    json: bool,
) -> anyhow::Result<()> {
    let mut plan = Plan::new(inv, subtopics, config, &Roots::detect(root))?;
    let mut selection = selection(args, &mut plan)?;

    let confirmation = match flag_confirmation(args) {
        Some(c) => c,
        None if plan.needs_confirmation() && !json && prompt::is_interactive() => {
            ask(&plan, &mut selection)?
        }
        None => Confirmation::NoAnswer,
    };

    let decision = plan.decide(confirmation, selection.as_ref(), config.non_interactive)?;
    if let Decision::Abort { reason } = &decision {
        return emit(&Report::aborted(&plan, reason), json);
    }

    let manual = read_body(args)?;
    let researcher = match (&prepared, &manual, &config.research.command) {
        (None, None, Some(command)) => Some(CommandResearcher::new(command)?),
        _ => None,
    };
    let source = if let Some(bodies) = prepared {
        ContentSource::Prepared(bodies)
    } else if let Some(text) = manual {
        ContentSource::Manual(text)
    } else if let Some(researcher) = &researcher {
        ContentSource::Research {
            researcher,
            max_attempts: config.research.max_attempts,
            min_len: config.research.min_findings_len,
        }
    } else {
        return Err(SkillError::ResearchUnavailable {
            topic: plan.topic.clone(),
            attempts: 0,
        }
        .into());
    };

    let content = registry::gather_content(
        &plan,
        &decision,
        &source,
        args.description.as_deref(),
        &args.sources,
    )?;
    let generated = chrono::Local::now().date_naive();
    let report = registry::execute(&plan, &decision, &content, generated)?;
    tracing::info!(
        slug = %report.slug,
        decision = %report.decision,
        created = report.created.len(),
        removed = report.removed.len(),
        "skills regenerated"
    );
    emit(&report, json)
}

fn emit(report: &Report, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(report)
    } else {
        print_report(report);
        Ok(())
    }
}

/// `--select` switches the plan to per-entry mode.
fn selection(args: &GenerateArgs, plan: &mut Plan) -> anyhow::Result<Option<Selection>> {
    let Some(raw) = &args.select else {
        return Ok(None);
    };
    let sel: Selection = raw.parse()?;
    plan.mode = SelectionMode::PerEntry;
    Ok(Some(sel))
}

fn flag_confirmation(args: &GenerateArgs) -> Option<Confirmation> {
    if args.yes {
        Some(Confirmation::Confirmed)
    } else if args.no {
        Some(Confirmation::Declined)
    } else {
        None
    }
}

/// Show the preview and ask. Per-entry mode asks for a selection (unless one
/// was given); per-topic mode asks a single yes/no.
fn ask(plan: &Plan, selection: &mut Option<Selection>) -> anyhow::Result<Confirmation> {
    eprintln!(
        "'{}' in {} ({} scope):",
        plan.topic,
        plan.target.root.display(),
        plan.target.scope
    );
    for line in plan.preview() {
        let marker = if line.exists { "exists" } else { "new" };
        eprintln!("  {:>2}. {}  ({marker})", line.number, line.name);
    }
    let orphans: Vec<&String> = plan
        .existing
        .iter()
        .filter(|name| !plan.planned.iter().any(|p| &p.name == *name))
        .collect();
    if !orphans.is_empty() {
        eprintln!(
            "  also present: {}",
            orphans.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
        );
    }

    if plan.mode == SelectionMode::PerEntry {
        if selection.is_none() {
            *selection = Some(prompt::select(plan.planned.len())?);
        }
        if plan.existing.is_empty() || plan.policy != ReplacementPolicy::Replace {
            return Ok(Confirmation::Confirmed);
        }
    }
    prompt::confirm(&format!(
        "Replace {} existing entr{} for '{}'?",
        plan.existing.len(),
        if plan.existing.len() == 1 { "y" } else { "ies" },
        plan.slug
    ))
}

fn read_body(args: &GenerateArgs) -> anyhow::Result<Option<String>> {
    if let Some(body) = &args.body {
        return Ok(Some(body.clone()));
    }
    match &args.body_file {
        Some(path) if path.as_os_str() == "-" => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read content from stdin")?;
            Ok(Some(text))
        }
        Some(path) => std::fs::read_to_string(path)
            .map(Some)
            .with_context(|| format!("failed to read {}", path.display())),
        None => Ok(None),
    }
}
