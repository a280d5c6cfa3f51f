//! SEO audit pass: a fixed table of checks over page text and metadata.
//!
//! Each rule pairs a predicate with an optional detail extractor. The
//! detail closure only runs once the predicate holds, and a detail that
//! cannot be computed degrades to an absent detail rather than dropping
//! the finding. Rules never see each other's output and never mutate the
//! document; the audit always reads the original text.
//!
//! Checks operate on markup via pattern matching, not a DOM. That is good
//! enough for the heading, image and entity heuristics here and keeps the
//! pass dependency-light.

use crate::frontmatter::{self, Metadata};
use crate::models::{AuditReport, AuditSummary, FileAudit, Finding, Severity};
use crate::utils::display_path;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Compiled patterns shared by the audit checks, built once per run.
pub struct Patterns {
    h1: Regex,
    img: Regex,
    alt: Regex,
    entity: Regex,
}

impl Patterns {
    pub fn new() -> Patterns {
        Patterns {
            h1: Regex::new(r"(?i)<h1[\s>]").expect("h1 pattern"),
            img: Regex::new(r"(?is)<img\b[^>]*>").expect("img pattern"),
            alt: Regex::new(r#"(?is)\balt\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#).expect("alt pattern"),
            entity: Regex::new(r"&#[0-9]+;|&[a-zA-Z][a-zA-Z0-9]*;").expect("entity pattern"),
        }
    }
}

impl Default for Patterns {
    fn default() -> Patterns {
        Patterns::new()
    }
}

/// One document under audit: original text, parsed metadata header, and
/// the shared compiled patterns.
pub struct DocContext<'a> {
    pub text: &'a str,
    pub meta: &'a Metadata,
    pub patterns: &'a Patterns,
}

impl DocContext<'_> {
    fn h1_count(&self) -> usize {
        self.patterns.h1.find_iter(self.text).count()
    }

    fn title(&self) -> Option<&str> {
        self.meta.get("title")
    }

    fn description(&self) -> Option<&str> {
        self.meta.get("description")
    }

    /// (images with no alt attribute, images with a blank alt value)
    fn alt_counts(&self) -> (usize, usize) {
        let mut missing = 0usize;
        let mut blank = 0usize;
        for tag in self.patterns.img.find_iter(self.text) {
            match self.patterns.alt.find(tag.as_str()) {
                None => missing += 1,
                Some(m) => {
                    let raw = m.as_str();
                    let value = raw
                        .split_once('=')
                        .map(|(_, v)| v.trim())
                        .unwrap_or("");
                    let value = value
                        .trim_matches(|c| c == '"' || c == '\'')
                        .trim();
                    if value.is_empty() {
                        blank += 1;
                    }
                }
            }
        }
        (missing, blank)
    }

    /// Distinct encoded entities appearing in title or description.
    fn meta_entities(&self) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        for field in [self.title(), self.description()].into_iter().flatten() {
            for m in self.patterns.entity.find_iter(field) {
                found.insert(m.as_str().to_string());
            }
        }
        found
    }
}

type Predicate = fn(&DocContext) -> bool;
type Detail = fn(&DocContext) -> Option<String>;

/// One audit check: name, severity, fixed message, predicate, and an
/// optional deferred detail extractor.
pub struct AuditRule {
    pub name: &'static str,
    pub severity: Severity,
    pub message: &'static str,
    pub predicate: Predicate,
    pub detail: Option<Detail>,
}

/// The audit rule table, evaluated in this order for every file.
pub const RULES: &[AuditRule] = &[
    AuditRule {
        name: "missing-h1",
        severity: Severity::Error,
        message: "No <h1> heading found",
        predicate: missing_h1,
        detail: None,
    },
    AuditRule {
        name: "multiple-h1",
        severity: Severity::Warning,
        message: "More than one <h1> heading",
        predicate: multiple_h1,
        detail: Some(multiple_h1_detail),
    },
    AuditRule {
        name: "missing-title",
        severity: Severity::Error,
        message: "Missing title in metadata header",
        predicate: missing_title,
        detail: None,
    },
    AuditRule {
        name: "missing-description",
        severity: Severity::Error,
        message: "Missing description in metadata header",
        predicate: missing_description,
        detail: None,
    },
    AuditRule {
        name: "truncated-description",
        severity: Severity::Warning,
        message: "Description looks truncated",
        predicate: truncated_description,
        detail: Some(truncated_description_detail),
    },
    AuditRule {
        name: "short-description",
        severity: Severity::Warning,
        message: "Description shorter than recommended",
        predicate: short_description,
        detail: Some(description_length_detail),
    },
    AuditRule {
        name: "long-description",
        severity: Severity::Info,
        message: "Description longer than recommended",
        predicate: long_description,
        detail: Some(description_length_detail),
    },
    AuditRule {
        name: "missing-social-image",
        severity: Severity::Warning,
        message: "No social preview image configured",
        predicate: missing_social_image,
        detail: None,
    },
    AuditRule {
        name: "img-missing-alt",
        severity: Severity::Warning,
        message: "Images without usable alt text",
        predicate: images_missing_alt,
        detail: Some(images_missing_alt_detail),
    },
    AuditRule {
        name: "encoded-entities",
        severity: Severity::Warning,
        message: "HTML entities encoded in metadata",
        predicate: encoded_entities,
        detail: Some(encoded_entities_detail),
    },
    AuditRule {
        name: "missing-canonical",
        severity: Severity::Info,
        message: "No canonical or og_url set",
        predicate: missing_canonical,
        detail: None,
    },
];

fn missing_h1(ctx: &DocContext) -> bool {
    ctx.h1_count() == 0
}

fn multiple_h1(ctx: &DocContext) -> bool {
    ctx.h1_count() > 1
}

fn multiple_h1_detail(ctx: &DocContext) -> Option<String> {
    Some(format!("{} <h1> elements found", ctx.h1_count()))
}

fn missing_title(ctx: &DocContext) -> bool {
    ctx.title().is_none()
}

fn missing_description(ctx: &DocContext) -> bool {
    ctx.description().is_none()
}

fn truncated_description(ctx: &DocContext) -> bool {
    match ctx.description() {
        Some(d) if d.chars().count() > 50 => looks_truncated(d),
        _ => false,
    }
}

// Heuristic, and known to false-positive on descriptions ending in
// abbreviations or numerals ("etc.", "in 42"). Kept as-is.
fn looks_truncated(desc: &str) -> bool {
    let d = desc.trim_end();
    if d.ends_with("...") || d.ends_with('…') {
        return true;
    }
    if let Some(last) = d.split_whitespace().last() {
        let word = last.trim_end_matches(|c: char| !c.is_alphanumeric());
        if !word.is_empty() && word.chars().count() <= 3 {
            return true;
        }
    }
    !d.ends_with(['.', '!', '?', '"', '\'', '\u{201d}', '\u{2019}'])
}

fn truncated_description_detail(ctx: &DocContext) -> Option<String> {
    let d = ctx.description()?;
    let head: String = d.chars().take(80).collect();
    Some(format!("{}…", head))
}

fn short_description(ctx: &DocContext) -> bool {
    ctx.description()
        .is_some_and(|d| d.chars().count() < 50)
}

fn long_description(ctx: &DocContext) -> bool {
    ctx.description()
        .is_some_and(|d| d.chars().count() > 160)
}

fn description_length_detail(ctx: &DocContext) -> Option<String> {
    let d = ctx.description()?;
    Some(format!(
        "{} characters; recommended 120-160",
        d.chars().count()
    ))
}

fn missing_social_image(ctx: &DocContext) -> bool {
    ctx.meta.first_of(&["image", "og_image"]).is_none()
}

fn images_missing_alt(ctx: &DocContext) -> bool {
    let (missing, blank) = ctx.alt_counts();
    missing + blank > 0
}

fn images_missing_alt_detail(ctx: &DocContext) -> Option<String> {
    let (missing, blank) = ctx.alt_counts();
    Some(format!("{} without alt, {} with empty alt", missing, blank))
}

fn encoded_entities(ctx: &DocContext) -> bool {
    !ctx.meta_entities().is_empty()
}

fn encoded_entities_detail(ctx: &DocContext) -> Option<String> {
    let entities = ctx.meta_entities();
    if entities.is_empty() {
        return None;
    }
    Some(entities.into_iter().collect::<Vec<_>>().join(", "))
}

fn missing_canonical(ctx: &DocContext) -> bool {
    ctx.meta.first_of(&["canonical", "og_url"]).is_none()
}

/// Evaluate the rule table against one document.
///
/// Rules below `min_severity` are suppressed entirely: no findings and no
/// contribution to statistics.
pub fn audit_document(ctx: &DocContext, min_severity: Severity) -> Vec<Finding> {
    let mut findings = Vec::new();
    for rule in RULES {
        if rule.severity < min_severity {
            continue;
        }
        if (rule.predicate)(ctx) {
            let detail = rule.detail.and_then(|f| f(ctx));
            findings.push(Finding {
                rule: rule.name.to_string(),
                severity: rule.severity,
                message: rule.message.to_string(),
                detail,
            });
        }
    }
    findings
}

/// Run the audit over `files`, strictly in list order. Never writes.
///
/// Per-file read failures are collected as error strings and skip the
/// file; the run continues.
pub fn run_audit(
    root: &Path,
    files: &[PathBuf],
    min_severity: Severity,
) -> (AuditReport, Vec<String>) {
    let patterns = Patterns::new();
    let mut reports: Vec<FileAudit> = Vec::new();
    let mut errors = Vec::new();
    for path in files {
        let rel = display_path(root, path);
        let text = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                errors.push(format!("{}: {}", rel, e));
                continue;
            }
        };
        let meta = frontmatter::parse(&text);
        let ctx = DocContext {
            text: &text,
            meta: &meta,
            patterns: &patterns,
        };
        let findings = audit_document(&ctx, min_severity);
        reports.push(FileAudit {
            file: rel,
            findings,
        });
    }
    let summary = summarize(&reports);
    (
        AuditReport {
            files: reports,
            summary,
        },
        errors,
    )
}

/// Fold per-file findings into run statistics.
pub fn summarize(files: &[FileAudit]) -> AuditSummary {
    let mut per_rule: BTreeMap<String, usize> = BTreeMap::new();
    let mut errors = 0usize;
    let mut warnings = 0usize;
    let mut infos = 0usize;
    let mut files_with_issues = 0usize;
    for fa in files {
        if !fa.findings.is_empty() {
            files_with_issues += 1;
        }
        for f in &fa.findings {
            *per_rule.entry(f.rule.clone()).or_default() += 1;
            match f.severity {
                Severity::Error => errors += 1,
                Severity::Warning => warnings += 1,
                Severity::Info => infos += 1,
            }
        }
    }
    AuditSummary {
        errors,
        warnings,
        infos,
        files_scanned: files.len(),
        files_with_issues,
        per_rule,
    }
}
