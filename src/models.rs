//! Shared data models for audit findings and run summaries.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
/// Severity of an audit finding. Ordered `info < warning < error` so a
/// minimum-severity threshold is a plain comparison.
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Parse a CLI/config severity token.
    pub fn parse(s: &str) -> Option<Severity> {
        match s {
            "error" => Some(Severity::Error),
            "warning" | "warn" => Some(Severity::Warning),
            "info" => Some(Severity::Info),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
/// One rule's positive result against one document.
pub struct Finding {
    pub rule: String,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

#[derive(Serialize)]
/// All findings for a single scanned file.
pub struct FileAudit {
    pub file: String,
    pub findings: Vec<Finding>,
}

impl FileAudit {
    /// True when the file carries at least one error- or warning-level
    /// finding; the default detailed report only lists such files.
    pub fn flagged(&self) -> bool {
        self.findings
            .iter()
            .any(|f| f.severity >= Severity::Warning)
    }
}

#[derive(Serialize)]
/// Run-wide audit statistics used by printers.
pub struct AuditSummary {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub files_scanned: usize,
    pub files_with_issues: usize,
    pub per_rule: BTreeMap<String, usize>,
}

#[derive(Serialize)]
/// Audit results container.
pub struct AuditReport {
    pub files: Vec<FileAudit>,
    pub summary: AuditSummary,
}
