//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sitegroom",
    version,
    about = "Static-site hygiene for generated HTML",
    long_about = "Sitegroom — scan a tree of generated HTML pages to strip leftover fragments from the old content platform and audit pages against SEO heuristics.\n\nConfiguration precedence: CLI > sitegroom.toml > defaults.",
    after_help = "Examples:\n  sitegroom clean --dry-run\n  sitegroom clean --root public\n  sitegroom audit --severity warning\n  sitegroom audit --all --json",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands for cleanup and auditing.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current sitegroom version.")]
    Version,
    /// Strip obsolete platform fragments
    #[command(
        about = "Strip obsolete platform fragments",
        long_about = "Apply the fragment-removal rule table to every discovered page. Files are rewritten only when at least one fragment was removed and --dry-run is not set.",
        after_help = "Examples:\n  sitegroom clean\n  sitegroom clean --dry-run --output json"
    )]
    Clean {
        #[arg(long, help = "Scan root (default: current dir)")]
        root: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Report removals without writing any file")]
        dry_run: bool,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Audit pages against SEO heuristics
    #[command(
        about = "Audit pages against SEO heuristics",
        long_about = "Evaluate every discovered page against the fixed SEO rule table using its markup and metadata header. Never writes.",
        after_help = "Examples:\n  sitegroom audit\n  sitegroom audit --severity error\n  sitegroom audit --all --json"
    )]
    Audit {
        #[arg(long, help = "Scan root (default: current dir)")]
        root: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Include files without errors or warnings in the report")]
        all: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Emit the full statistics object as JSON")]
        json: bool,
        #[arg(long, help = "Minimum severity: error|warning|info (default: info)")]
        severity: Option<String>,
    },
}
