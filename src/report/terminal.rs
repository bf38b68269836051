use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::models::{Coordinates, DefinitionSummary, FileSummary};

/// Render a colored terminal report, one section per summarized component.
pub fn render(
    summaries: &[(Coordinates, DefinitionSummary)],
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    if quiet {
        for (coordinates, summary) in summaries {
            let licensed = summary.files.iter().filter(|f| f.license.is_some()).count();
            let attributed = summary
                .files
                .iter()
                .filter(|f| f.attributions.is_some())
                .count();
            println!(
                "{}  Files: {}  Licensed: {}  Attributed: {}  Declared: {}",
                coordinates,
                summary.files.len(),
                licensed,
                attributed,
                declared_of(summary).unwrap_or("-"),
            );
        }
        return Ok(());
    }

    println!("\n {} v{}", "summarizr".bold(), env!("CARGO_PKG_VERSION"));

    for (coordinates, summary) in summaries {
        println!("\n {}", coordinates.to_string().bold());

        match declared_of(summary) {
            Some(declared) => println!("   Declared license : {}", declared.green()),
            None => println!("   Declared license : {}", "none".dimmed()),
        }
        match summary.described.as_ref().and_then(|d| d.release_date.as_deref()) {
            Some(date) => println!("   Release date     : {}", date),
            None => println!("   Release date     : {}", "unknown".dimmed()),
        }
        if let Some(website) = summary.described.as_ref().and_then(|d| d.project_website.as_deref()) {
            println!("   Project website  : {}", website);
        }
        if let Some(tracker) = summary.described.as_ref().and_then(|d| d.issue_tracker.as_deref()) {
            println!("   Issue tracker    : {}", tracker);
        }

        if summary.files.is_empty() {
            continue;
        }

        let with_facts = summary.files.iter().filter(|f| has_facts(f)).count();
        println!(
            "   Files            : {} scanned, {} with license or attribution facts\n",
            summary.files.len(),
            with_facts
        );
        render_table(&summary.files, verbose);
    }
    println!();

    Ok(())
}

fn declared_of(summary: &DefinitionSummary) -> Option<&str> {
    summary.licensed.as_ref().map(|l| l.declared.as_str())
}

fn has_facts(file: &FileSummary) -> bool {
    file.license.is_some() || file.attributions.is_some()
}

fn render_table(files: &[FileSummary], verbose: bool) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Path").add_attribute(Attribute::Bold),
            Cell::new("License").add_attribute(Attribute::Bold),
            Cell::new("Attributions").add_attribute(Attribute::Bold),
        ]);

    for file in files.iter().filter(|f| verbose || has_facts(f)) {
        let license_cell = match file.license.as_deref() {
            Some(license) => Cell::new(license).fg(Color::Green),
            None => Cell::new("-").fg(Color::DarkGrey),
        };
        let attributions = match &file.attributions {
            Some(statements) => statements.join("; "),
            None => String::new(),
        };
        table.add_row(vec![
            Cell::new(&file.path),
            license_cell,
            Cell::new(attributions),
        ]);
    }

    println!("{}", table);
}
