use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "summarizr",
    about = "Normalize raw scan-tool harvests into canonical definition summaries",
    version
)]
pub struct Cli {
    /// Harvest JSON files to summarize
    #[arg(value_name = "HARVEST")]
    pub inputs: Vec<PathBuf>,

    /// Fetch a harvest document from a harvest store URL (repeatable)
    #[arg(long, value_name = "URL")]
    pub url: Vec<String>,

    /// Tool that produced the harvests
    #[arg(long, default_value = "scancode", value_name = "TOOL")]
    pub tool: ToolArg,

    /// Opaque component coordinates attached to the output [default: the input name]
    #[arg(long, value_name = "SPEC")]
    pub coordinates: Option<String>,

    /// Config file [default: ./.summarizr/config.toml, fallback ~/.config/summarizr/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Show every file row, not just files carrying license or attribution facts
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary counts
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, PartialEq, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[derive(Debug, Clone, PartialEq, clap::ValueEnum)]
pub enum ToolArg {
    Scancode,
    ClearlyDefined,
}
