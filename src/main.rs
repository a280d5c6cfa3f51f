//! Sitegroom CLI binary entry point.
//! Delegates to modules for clean/audit and prints results.

mod audit;
mod clean;
mod cli;
mod config;
mod discover;
mod frontmatter;
mod models;
mod output;
mod utils;

use clap::Parser;
use cli::{Cli, Commands};
use std::path::PathBuf;

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Clean {
            root,
            dry_run,
            output,
        } => {
            let eff = resolve_or_exit(config::resolve_effective(
                root.as_deref(),
                output.as_deref(),
                if dry_run { Some(true) } else { None },
                None,
                None,
            ));
            note_missing_config(&eff.root);
            let rules = match clean::load_rules(&eff.extra_rules) {
                Ok(r) => r,
                Err(msg) => {
                    eprintln!("{} {}", utils::error_prefix(), msg);
                    std::process::exit(2);
                }
            };
            let files = discover_or_exit(&eff.root, &eff.include, &eff.exclude);
            if eff.dry_run && eff.output != "json" {
                eprintln!(
                    "{} {}",
                    utils::note_prefix(),
                    "Dry run; no files will be modified."
                );
            }
            let (outcomes, errors) = clean::run_clean(&eff.root, &rules, &files, !eff.dry_run);
            let summary = clean::summarize(&outcomes);
            output::print_clean(&outcomes, &summary, &eff.output, !eff.dry_run, &errors);
        }
        Commands::Audit {
            root,
            all,
            json,
            severity,
        } => {
            let eff = resolve_or_exit(config::resolve_effective(
                root.as_deref(),
                if json { Some("json") } else { None },
                None,
                severity.as_deref(),
                if all { Some(true) } else { None },
            ));
            note_missing_config(&eff.root);
            let files = discover_or_exit(&eff.root, &eff.include, &eff.exclude);
            let (report, errors) = audit::run_audit(&eff.root, &files, eff.severity);
            output::print_audit(&report, eff.output == "json", eff.all, &errors);
        }
    }
}

fn resolve_or_exit(res: Result<config::Effective, String>) -> config::Effective {
    match res {
        Ok(eff) => eff,
        Err(msg) => {
            eprintln!("{} {}", utils::error_prefix(), msg);
            std::process::exit(2);
        }
    }
}

fn note_missing_config(root: &std::path::Path) {
    if config::load_config(root).is_none() {
        eprintln!(
            "{} {}",
            utils::note_prefix(),
            "No sitegroom.toml found; using defaults."
        );
    }
}

fn discover_or_exit(
    root: &std::path::Path,
    include: &[String],
    exclude: &[String],
) -> Vec<PathBuf> {
    match discover::discover_files(root, include, exclude) {
        Ok(files) => files,
        Err(msg) => {
            eprintln!("{} {}", utils::error_prefix(), msg);
            std::process::exit(1);
        }
    }
}
