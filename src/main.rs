//! `summarizr` — normalize raw scan-tool harvests into canonical definition summaries.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`config::load_config`]).
//! 3. Collect harvest documents: local JSON files, plus `--url` fetches from
//!    a harvest store ([`store`]).
//! 4. Select the tool summarizer and summarize each harvest ([`summarizer`]).
//! 5. Render the requested report ([`report`], or JSON via serde_json).
//! 6. Exit `0` (all summarized) or `1` (at least one invalid harvest).

mod cli;
mod config;
mod expression;
mod models;
mod report;
mod store;
mod summarizer;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;

use cli::{Cli, ReportFormat, ToolArg};
use config::load_config;
use models::{Coordinates, DefinitionSummary};
use summarizer::clearlydefined::ClearlyDefinedSummarizer;
use summarizer::scancode::ScanCodeSummarizer;
use summarizer::Summarizer;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.inputs.is_empty() && cli.url.is_empty() {
        eprintln!("No harvest inputs given; pass one or more files or --url");
        std::process::exit(1);
    }

    let config = load_config(cli.config.as_deref())?;

    // Collect (label, harvest document) pairs, files first, in input order
    let mut harvests: Vec<(String, Value)> = Vec::new();
    for path in &cli.inputs {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let document: Value = serde_json::from_str(&content)
            .with_context(|| format!("{} is not valid JSON", path.display()))?;
        harvests.push((path.display().to_string(), document));
    }
    if !cli.url.is_empty() {
        harvests.extend(fetch_harvests(&cli.url, cli.quiet).await?);
    }

    // Select the summarizer for the producing tool
    let summarizer: Box<dyn Summarizer> = match cli.tool {
        ToolArg::Scancode => match config.resolver.license_files.clone() {
            Some(names) => Box::new(ScanCodeSummarizer::with_license_files(names)),
            None => Box::new(ScanCodeSummarizer::new()),
        },
        ToolArg::ClearlyDefined => Box::new(ClearlyDefinedSummarizer::new()),
    };

    let mut summaries: Vec<(Coordinates, DefinitionSummary)> = Vec::new();
    let mut failures = 0usize;

    for (label, document) in &harvests {
        let coordinates =
            Coordinates::new(cli.coordinates.clone().unwrap_or_else(|| label.clone()));
        match summarizer.summarize(&coordinates, document) {
            Ok(summary) => summaries.push((coordinates, summary)),
            Err(error) => {
                failures += 1;
                eprintln!("  {} {}: {}", "✗".red(), label, error);
            }
        }
    }

    match cli.report {
        ReportFormat::Terminal => report::terminal::render(&summaries, cli.verbose, cli.quiet)?,
        ReportFormat::Json => print_json(&summaries, config.output.pretty)?,
    }

    if failures > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// A single harvest prints one object; several print an array.
fn print_json(summaries: &[(Coordinates, DefinitionSummary)], pretty: bool) -> Result<()> {
    let value = if summaries.len() == 1 {
        serde_json::to_value(&summaries[0].1)?
    } else {
        serde_json::to_value(summaries.iter().map(|(_, summary)| summary).collect::<Vec<_>>())?
    };
    let rendered = if pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };
    println!("{}", rendered);
    Ok(())
}

async fn fetch_harvests(urls: &[String], quiet: bool) -> Result<Vec<(String, Value)>> {
    use futures::future::join_all;

    const BATCH_SIZE: usize = 16;

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;

    let pb = if !quiet && urls.len() > 1 {
        let pb = ProgressBar::new(urls.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut harvests = Vec::with_capacity(urls.len());
    for batch in urls.chunks(BATCH_SIZE) {
        let futures: Vec<_> = batch
            .iter()
            .map(|url| {
                let client = client.clone();
                let url = url.clone();
                async move {
                    store::fetch_harvest(&client, &url)
                        .await
                        .map(|document| (url, document))
                }
            })
            .collect();

        for result in join_all(futures).await {
            harvests.push(result?);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Fetched");
    }

    Ok(harvests)
}
