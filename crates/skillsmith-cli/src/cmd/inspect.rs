use super::{load_config, parse_invocation};
use crate::output::print_json;
use skillsmith_core::scanner;
use skillsmith_core::scope::{self, Roots, Target};
use skillsmith_core::slug;
use std::path::Path;

// ---------------------------------------------------------------------------
// slug
// ---------------------------------------------------------------------------

pub fn slug(topic: &[String], json: bool) -> anyhow::Result<()> {
    let topic = topic.join(" ");
    let slug = slug::slugify(&topic)?;
    if json {
        print_json(&serde_json::json!({ "topic": topic, "slug": slug }))?;
    } else {
        println!("{slug}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// resolve
// ---------------------------------------------------------------------------

pub fn resolve(root: &Path, args: &[String], json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let inv = parse_invocation(args)?;
    let roots = Roots::detect(root);
    let target = Target::new(scope::resolve_scope(inv.scope, config.default_scope), &roots)?;
    let slug = inv.topic_slug().ok();
    let policy = inv.policy.unwrap_or(config.policy);

    if json {
        print_json(&serde_json::json!({
            "topic": inv.topic,
            "slug": slug,
            "scope": target.scope,
            "root": target.root,
            "policy": policy,
        }))?;
    } else {
        println!("scope:  {}", target.scope);
        println!("root:   {}", target.root.display());
        println!("policy: {policy}");
        if let Some(slug) = slug {
            println!("entry:  {}", target.root.join(slug).display());
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// scan
// ---------------------------------------------------------------------------

pub fn scan(root: &Path, args: &[String], json: bool) -> anyhow::Result<()> {
    let config = load_config(root)?;
    let inv = parse_invocation(args)?;
    let slug = inv.topic_slug()?;
    let roots = Roots::detect(root);
    let target = Target::new(scope::resolve_scope(inv.scope, config.default_scope), &roots)?;
    let existing = scanner::scan(&target.root, &slug)?;

    if json {
        print_json(&serde_json::json!({
            "slug": slug,
            "scope": target.scope,
            "root": target.root,
            "existing": existing,
        }))?;
        return Ok(());
    }

    if existing.is_empty() {
        println!("No entries for '{slug}' in {}.", target.root.display());
    } else {
        for name in &existing {
            println!("{name}");
        }
    }
    Ok(())
}
