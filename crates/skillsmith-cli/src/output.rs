use serde::Serialize;
use skillsmith_core::decision::PreviewLine;
use skillsmith_core::registry::Report;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<String>| {
        let padded: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{cell:w$}")
            })
            .collect();
        println!("{}", padded.join("  ").trim_end());
    };

    line(headers.iter().map(|h| h.to_string()).collect());
    line(widths.iter().map(|&w| "-".repeat(w)).collect());
    for row in rows {
        line(row);
    }
}

/// Numbered preview of planned entries, marking the ones already on disk.
pub fn print_preview(lines: &[PreviewLine]) {
    for l in lines {
        let marker = if l.exists { "exists" } else { "new" };
        println!("  {:>2}. {}  ({marker})", l.number, l.name);
    }
}

pub fn print_report(report: &Report) {
    if let Some(reason) = &report.aborted {
        println!("Aborted: {reason}. Nothing was changed.");
        return;
    }
    println!(
        "{} '{}' ({} scope) in {}",
        report.decision,
        report.topic,
        report.scope,
        report.root.display()
    );
    let sections: [(&str, &Vec<String>); 5] = [
        ("created", &report.created),
        ("updated", &report.updated),
        ("removed", &report.removed),
        ("retained", &report.retained),
        ("skipped", &report.skipped),
    ];
    for (label, names) in sections {
        if !names.is_empty() {
            println!("  {label}: {}", names.join(", "));
        }
    }
}
