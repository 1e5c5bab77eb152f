use super::{load_config, parse_invocation};
use crate::output::{print_json, print_table};
use crate::prompt;
use skillsmith_core::document::SkillDocument;
use skillsmith_core::scope::{self, Roots, Target};
use skillsmith_core::types::{Confirmation, Scope};
use skillsmith_core::{paths, registry, scanner, slug};
use std::path::Path;

fn target_for(root: &Path, global: bool) -> anyhow::Result<Target> {
    let scope = if global { Scope::User } else { Scope::Project };
    Ok(Target::new(scope, &Roots::detect(root))?)
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

pub fn list(root: &Path, global: bool, json: bool) -> anyhow::Result<()> {
    let target = target_for(root, global)?;
    let entries = scanner::list_all(&target.root)?;

    if json {
        print_json(&entries)?;
        return Ok(());
    }

    if entries.is_empty() {
        println!("No skills in {}.", target.root.display());
        return Ok(());
    }

    let rows = entries
        .iter()
        .map(|e| match &e.meta {
            Some(m) => vec![
                e.name.clone(),
                m.topic.clone().unwrap_or_else(|| "-".to_string()),
                m.generated
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                m.description.clone(),
            ],
            None => vec![
                e.name.clone(),
                "-".to_string(),
                "-".to_string(),
                "(no SKILL.md frontmatter)".to_string(),
            ],
        })
        .collect();
    print_table(&["NAME", "TOPIC", "GENERATED", "DESCRIPTION"], rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

pub fn show(root: &Path, name: &str, global: bool, json: bool) -> anyhow::Result<()> {
    slug::validate_slug(name)?;
    let target = target_for(root, global)?;
    let doc = SkillDocument::load(&target.root, name)?;

    if json {
        print_json(&serde_json::json!({
            "name": name,
            "path": paths::skill_file(&target.root, name),
            "meta": doc.meta,
            "body": doc.body,
        }))?;
    } else {
        print!("{}", doc.render()?);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// remove
// ---------------------------------------------------------------------------

pub fn remove(root: &Path, args: &[String], yes: bool, json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let inv = parse_invocation(args)?;
    let slug = inv.topic_slug()?;
    let target = Target::new(
        scope::resolve_scope(inv.scope, config.default_scope),
        &Roots::detect(root),
    )?;

    if !yes {
        let existing = scanner::scan(&target.root, &slug)?;
        if existing.is_empty() {
            return Err(skillsmith_core::SkillError::EntryNotFound(slug).into());
        }
        if !prompt::is_interactive() {
            anyhow::bail!(
                "refusing to remove {} entr{} for '{slug}' without --yes",
                existing.len(),
                if existing.len() == 1 { "y" } else { "ies" }
            );
        }
        eprintln!("Entries in {}:", target.root.display());
        for name in &existing {
            eprintln!("  {name}");
        }
        if prompt::confirm("Remove them?")? != Confirmation::Confirmed {
            println!("Aborted: nothing was removed.");
            return Ok(());
        }
    }

    let removed = registry::remove(&target, &slug)?;
    tracing::info!(%slug, count = removed.len(), "removed entries");

    if json {
        print_json(&serde_json::json!({
            "slug": slug,
            "scope": target.scope,
            "root": target.root,
            "removed": removed,
        }))?;
    } else {
        println!("Removed: {}", removed.join(", "));
    }
    Ok(())
}
