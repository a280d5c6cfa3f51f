//! Output rendering for the clean and audit commands.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-item fields and a top-level summary; its shape is produced by pure
//! `compose_*` functions so it can be asserted in tests.

use crate::clean::{CleanOutcome, CleanSummary};
use crate::models::{AuditReport, Severity};
use crate::utils::error_prefix;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

fn print_errors(errors: &[String]) {
    for e in errors {
        eprintln!("{} {}", error_prefix(), e);
    }
}

/// Print cleanup results in the requested format.
pub fn print_clean(
    outcomes: &[CleanOutcome],
    summary: &CleanSummary,
    output: &str,
    write: bool,
    errors: &[String],
) {
    print_errors(errors);
    if output == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(&compose_clean_json(outcomes, summary, write)).unwrap()
        );
        return;
    }
    let color = use_colors(output);
    for o in outcomes {
        if o.total == 0 {
            continue;
        }
        let verb = if o.wrote { "cleaned:" } else { "would clean:" };
        if color {
            let verb = if o.wrote {
                verb.green().bold().to_string()
            } else {
                verb.yellow().bold().to_string()
            };
            println!("✂ {} {} ({} removed)", verb, o.file.bold(), o.total);
        } else {
            println!("✂ {} {} ({} removed)", verb, o.file, o.total);
        }
    }
    if !summary.per_rule.is_empty() {
        let by_rule = summary
            .per_rule
            .iter()
            .map(|(name, n)| format!("{}={}", name, n))
            .collect::<Vec<_>>()
            .join(" ");
        println!("— By rule — {}", by_rule);
    }
    let line = format!(
        "— Summary — scanned={} modified={} removed={}",
        summary.files_scanned, summary.files_modified, summary.total_removals
    );
    if color {
        println!("{}", line.bold());
    } else {
        println!("{}", line);
    }
}

/// Print audit results in the requested format.
///
/// The human report lists files with at least one error/warning finding;
/// `all` widens it to every scanned file.
pub fn print_audit(report: &AuditReport, json: bool, all: bool, errors: &[String]) {
    print_errors(errors);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&compose_audit_json(report)).unwrap()
        );
        return;
    }
    let color = use_colors("human");
    for fa in &report.files {
        if !all && !fa.flagged() {
            continue;
        }
        if color {
            println!("{}", fa.file.bold());
        } else {
            println!("{}", fa.file);
        }
        if fa.findings.is_empty() {
            println!("  ✔ no issues");
            continue;
        }
        for f in &fa.findings {
            let (icon, sev) = match f.severity {
                Severity::Error => {
                    if color {
                        ("✖".red().to_string(), "⟦error⟧".red().bold().to_string())
                    } else {
                        ("✖".to_string(), "⟦error⟧".to_string())
                    }
                }
                Severity::Warning => {
                    if color {
                        ("▲".yellow().to_string(), "⟦warn⟧".yellow().bold().to_string())
                    } else {
                        ("▲".to_string(), "⟦warn⟧".to_string())
                    }
                }
                Severity::Info => {
                    if color {
                        ("◆".blue().to_string(), "⟦info⟧".blue().bold().to_string())
                    } else {
                        ("◆".to_string(), "⟦info⟧".to_string())
                    }
                }
            };
            match &f.detail {
                Some(d) => println!("  {} {} ❲{}❳ — {} ({})", icon, sev, f.rule, f.message, d),
                None => println!("  {} {} ❲{}❳ — {}", icon, sev, f.rule, f.message),
            }
        }
    }
    let s = &report.summary;
    if !s.per_rule.is_empty() {
        let by_rule = s
            .per_rule
            .iter()
            .map(|(name, n)| format!("{}={}", name, n))
            .collect::<Vec<_>>()
            .join(" ");
        println!("— By rule — {}", by_rule);
    }
    let line = format!(
        "— Summary — errors={} warnings={} infos={} scanned={} flagged={}",
        s.errors, s.warnings, s.infos, s.files_scanned, s.files_with_issues
    );
    if color {
        println!("{}", line.bold());
    } else {
        println!("{}", line);
    }
}

/// Compose cleanup JSON object (pure) for testing/snapshot purposes.
pub fn compose_clean_json(
    outcomes: &[CleanOutcome],
    summary: &CleanSummary,
    write: bool,
) -> JsonVal {
    json!({
        "dry_run": !write,
        "results": outcomes,
        "summary": summary,
    })
}

/// Compose audit JSON object (pure) for testing/snapshot purposes.
pub fn compose_audit_json(report: &AuditReport) -> JsonVal {
    // Directly serialize AuditReport as JSON, keeping stable shape
    serde_json::to_value(report).unwrap()
}
