//! Terminal questions for the confirmation step.
//!
//! Prompts go to stderr so `--json` output and pipes stay clean. When either
//! end is not a terminal nobody can answer, and callers fall back to
//! [`Confirmation::NoAnswer`].

use anyhow::Context;
use skillsmith_core::decision::Selection;
use skillsmith_core::types::Confirmation;
use std::io::{BufRead, IsTerminal, Write};

pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
}

fn ask(question: &str) -> anyhow::Result<String> {
    let mut err = std::io::stderr().lock();
    write!(err, "{question} ")?;
    err.flush()?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read answer")?;
    Ok(line.trim().to_string())
}

/// Yes/no question; anything but an explicit yes declines.
pub fn confirm(question: &str) -> anyhow::Result<Confirmation> {
    let answer = ask(&format!("{question} [y/N]"))?.to_lowercase();
    Ok(match answer.as_str() {
        "y" | "yes" => Confirmation::Confirmed,
        _ => Confirmation::Declined,
    })
}

/// Ask which previewed entries to keep until the answer parses. An empty
/// answer keeps everything.
pub fn select(count: usize) -> anyhow::Result<Selection> {
    loop {
        let answer = ask(&format!(
            "Entries to write (all, none, only 1,3, skip 2) [1-{count}, default all]:"
        ))?;
        if answer.is_empty() {
            return Ok(Selection::All);
        }
        match answer.parse::<Selection>() {
            Ok(sel) => match sel.resolve(count) {
                Ok(_) => return Ok(sel),
                Err(e) => eprintln!("{e}"),
            },
            Err(e) => eprintln!("{e}"),
        }
    }
}
