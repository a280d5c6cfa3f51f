//! Configuration discovery and effective settings resolution.
//!
//! Sitegroom reads `sitegroom.toml|yaml|yml` from the scan root (or the
//! closest ancestor) and merges it with CLI flags. Defaults:
//! - `output`: `human`
//! - `[scan].include`: `["**/*.html"]`
//! - `[scan].exclude`: VCS, dependency, and build-output directories
//!   (user entries are appended, e.g. for sub-site directories)
//! - `[clean].dry_run`: false
//! - `[audit].severity`: `info` (no filtering), `[audit].all`: false
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::models::Severity;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_INCLUDE: &[&str] = &["**/*.html"];
const DEFAULT_EXCLUDE: &[&str] = &[
    ".git/**",
    "node_modules/**",
    "vendor/**",
    "target/**",
    "_site/**",
    "dist/**",
    "build/**",
];

#[derive(Debug, Default, Deserialize, Clone)]
/// File discovery configuration under `[scan]`.
pub struct ScanCfg {
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Clone)]
/// An extra fragment-removal rule under `[[clean.rules]]`.
pub struct RuleCfg {
    pub name: String,
    pub pattern: String,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Cleanup configuration under `[clean]`.
pub struct CleanCfg {
    pub dry_run: Option<bool>,
    #[serde(default)]
    pub rules: Vec<RuleCfg>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Audit configuration under `[audit]`.
pub struct AuditCfg {
    pub severity: Option<String>,
    pub all: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `sitegroom.toml|yaml`.
pub struct SitegroomConfig {
    pub output: Option<String>,
    pub scan: Option<ScanCfg>,
    pub clean: Option<CleanCfg>,
    pub audit: Option<AuditCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub root: PathBuf,
    pub output: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub dry_run: bool,
    pub severity: Severity,
    pub all: bool,
    pub extra_rules: Vec<RuleCfg>,
}

/// Walk upward from `start` to detect the scan root.
///
/// Stops when a `sitegroom.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join("sitegroom.toml").exists()
            || cur.join("sitegroom.yaml").exists()
            || cur.join("sitegroom.yml").exists()
        {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `SitegroomConfig` from `sitegroom.toml` or `sitegroom.yaml|yml` if present.
pub fn load_config(root: &Path) -> Option<SitegroomConfig> {
    let toml_path = root.join("sitegroom.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        let cfg: SitegroomConfig = toml::from_str(&s).ok()?;
        return Some(cfg);
    }
    for yml in ["sitegroom.yaml", "sitegroom.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            let cfg: SitegroomConfig = serde_yaml::from_str(&s).ok()?;
            return Some(cfg);
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
///
/// Fails on an unrecognized severity token so a typo never silently widens
/// or narrows a run.
pub fn resolve_effective(
    cli_root: Option<&str>,
    cli_output: Option<&str>,
    cli_dry_run: Option<bool>,
    cli_severity: Option<&str>,
    cli_all: Option<bool>,
) -> Result<Effective, String> {
    let start = PathBuf::from(cli_root.unwrap_or("."));
    let root = detect_root(&start);
    let cfg = load_config(&root).unwrap_or_default();

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let scan = cfg.scan.unwrap_or_default();
    let include = scan
        .include
        .unwrap_or_else(|| DEFAULT_INCLUDE.iter().map(|s| s.to_string()).collect());
    let mut exclude: Vec<String> = DEFAULT_EXCLUDE.iter().map(|s| s.to_string()).collect();
    exclude.extend(scan.exclude.unwrap_or_default());

    let clean = cfg.clean.unwrap_or_default();
    let dry_run = cli_dry_run.or(clean.dry_run).unwrap_or(false);

    let audit = cfg.audit.unwrap_or_default();
    let severity_src = cli_severity
        .map(|s| s.to_string())
        .or(audit.severity)
        .unwrap_or_else(|| "info".to_string());
    let severity = Severity::parse(&severity_src).ok_or_else(|| {
        format!(
            "unknown severity '{}' (expected error|warning|info)",
            severity_src
        )
    })?;
    let all = cli_all.or(audit.all).unwrap_or(false);

    Ok(Effective {
        root,
        output,
        include,
        exclude,
        dry_run,
        severity,
        all,
        extra_rules: clean.rules,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("sitegroom.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
output = "json"

[scan]
exclude = ["archive/**"]

[audit]
severity = "warning"

[[clean.rules]]
name = "tracking-pixel"
pattern = '<img[^>]*class="tracker"[^>]*>'
    "#
        )
        .unwrap();

        // Resolve using explicit root to avoid global CWD races
        let eff = resolve_effective(root.to_str(), None, None, None, None).unwrap();
        assert_eq!(eff.output, "json");
        assert_eq!(eff.severity, Severity::Warning);
        assert!(eff.exclude.iter().any(|e| e == "archive/**"));
        assert!(eff.exclude.iter().any(|e| e == ".git/**"));
        assert_eq!(eff.include, vec!["**/*.html"]);
        assert_eq!(eff.extra_rules.len(), 1);
        assert_eq!(eff.extra_rules[0].name, "tracking-pixel");
    }

    #[test]
    fn test_load_yaml_and_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("sitegroom.yaml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
output: human
clean:
  dry_run: true
            "#
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), None, None, None, None).unwrap();
        assert_eq!(eff.output, "human");
        assert!(eff.dry_run);
        // severity defaults to info (no filtering)
        assert_eq!(eff.severity, Severity::Info);
        assert!(!eff.all);
    }

    #[test]
    fn test_cli_precedence_over_config() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("sitegroom.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
output = "json"

[clean]
dry_run = true

[audit]
severity = "error"
            "#
        )
        .unwrap();

        let eff = resolve_effective(
            root.to_str(),
            Some("human"),
            Some(false),
            Some("info"),
            Some(true),
        )
        .unwrap();
        assert_eq!(eff.output, "human");
        assert!(!eff.dry_run);
        assert_eq!(eff.severity, Severity::Info);
        assert!(eff.all);
    }

    #[test]
    fn test_unknown_severity_is_rejected() {
        let dir = tempdir().unwrap();
        let err =
            resolve_effective(dir.path().to_str(), None, None, Some("fatal"), None).unwrap_err();
        assert!(err.contains("fatal"));
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let eff = resolve_effective(dir.path().to_str(), None, None, None, None).unwrap();
        assert_eq!(eff.output, "human");
        assert_eq!(eff.include, vec!["**/*.html"]);
        assert!(eff.exclude.iter().any(|e| e == "node_modules/**"));
        assert!(eff.extra_rules.is_empty());
    }
}
