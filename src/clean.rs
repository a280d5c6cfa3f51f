//! Fragment-removal pass for pages generated by the old content platform.
//!
//! The rule table is an ordered list of named matchers. Each matcher
//! targets one self-contained fragment (an element or comment-fenced
//! block with a recognizable open and close marker) and swallows trailing
//! whitespace up to the line break so removal leaves no blank-line
//! residue. Rules run in table order over the shrinking document; a rule
//! that matches nothing contributes zero to the counts.
//!
//! Matchers stay deliberately defensive: pages in the wild carry all, some,
//! or none of the historical fragments, and non-greedy bodies keep the
//! patterns bounded.

use crate::config::RuleCfg;
use crate::utils::display_path;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A named fragment-removal rule.
#[derive(Debug)]
pub struct CleanRule {
    pub name: String,
    pub pattern: Regex,
}

#[derive(Serialize)]
/// Per-file cleanup outcome.
pub struct CleanOutcome {
    pub file: String,
    pub removals: BTreeMap<String, usize>,
    pub total: usize,
    pub wrote: bool,
}

#[derive(Serialize)]
/// Run-wide cleanup statistics used by printers.
pub struct CleanSummary {
    pub files_scanned: usize,
    pub files_modified: usize,
    pub total_removals: usize,
    pub per_rule: BTreeMap<String, usize>,
}

// The historical cleanup scripts shipped two overlapping tables; this is
// the merged superset, applied as one pass.
const BUILTIN_RULES: &[(&str, &str)] = &[
    (
        "legacy-block",
        r"(?s)<!-- legacy:begin [a-z0-9-]+ -->.*?<!-- legacy:end [a-z0-9-]+ -->[ \t]*\r?\n?",
    ),
    (
        "share-section",
        r#"(?s)<section[^>]*class="[^"]*\bshare(?:-links)?\b[^"]*"[^>]*>.*?</section>[ \t]*\r?\n?"#,
    ),
    (
        "related-posts",
        r#"(?s)<aside[^>]*class="[^"]*\brelated-posts\b[^"]*"[^>]*>.*?</aside>[ \t]*\r?\n?"#,
    ),
    (
        "emoji-script",
        r#"(?s)<script[^>]*\bemoji\b[^>]*>.*?</script>[ \t]*\r?\n?"#,
    ),
    (
        "emoji-style",
        r#"(?s)<style[^>]*\bemoji\b[^>]*>.*?</style>[ \t]*\r?\n?"#,
    ),
    (
        "generator-meta",
        r#"<meta[^>]*name="generator"[^>]*/?>[ \t]*\r?\n?"#,
    ),
    (
        "shortlink",
        r#"<link[^>]*rel="shortlink"[^>]*/?>[ \t]*\r?\n?"#,
    ),
];

/// Build the active rule table: the built-in rules followed by any extra
/// rules from `[[clean.rules]]` in the config file.
///
/// A built-in pattern that fails to compile is a bug; a configured pattern
/// that fails to compile is a fatal config error reported to the caller.
pub fn load_rules(extra: &[RuleCfg]) -> Result<Vec<CleanRule>, String> {
    let mut rules: Vec<CleanRule> = BUILTIN_RULES
        .iter()
        .map(|(name, pat)| CleanRule {
            name: name.to_string(),
            pattern: Regex::new(pat).expect("built-in clean pattern"),
        })
        .collect();
    for cfg in extra {
        let pattern = Regex::new(&cfg.pattern)
            .map_err(|e| format!("bad pattern for clean rule '{}': {}", cfg.name, e))?;
        rules.push(CleanRule {
            name: cfg.name.clone(),
            pattern,
        });
    }
    Ok(rules)
}

/// Apply every rule in table order to `text`.
///
/// Returns the transformed text plus per-rule removal counts. Counting and
/// deletion use the same matcher, so the counts are exact, and a second
/// pass over the output removes nothing.
pub fn clean_text(rules: &[CleanRule], text: &str) -> (String, BTreeMap<String, usize>) {
    let mut doc = text.to_string();
    let mut counts = BTreeMap::new();
    for rule in rules {
        let n = rule.pattern.find_iter(&doc).count();
        if n > 0 {
            doc = rule.pattern.replace_all(&doc, "").into_owned();
            counts.insert(rule.name.clone(), n);
        }
    }
    (doc, counts)
}

/// Run the cleanup pass over `files`, strictly in list order.
///
/// When `write` is false (dry run) nothing is mutated, but the reported
/// counts are identical to a real run. Read and write failures are
/// collected as error strings and never abort the run.
pub fn run_clean(
    root: &Path,
    rules: &[CleanRule],
    files: &[PathBuf],
    write: bool,
) -> (Vec<CleanOutcome>, Vec<String>) {
    let mut outcomes = Vec::new();
    let mut errors = Vec::new();
    for path in files {
        let rel = display_path(root, path);
        let data = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                errors.push(format!("{}: {}", rel, e));
                continue;
            }
        };
        let (cleaned, removals) = clean_text(rules, &data);
        let total: usize = removals.values().sum();
        let mut wrote = false;
        if total > 0 && write {
            match fs::write(path, &cleaned) {
                Ok(()) => wrote = true,
                Err(e) => errors.push(format!("{}: {}", rel, e)),
            }
        }
        outcomes.push(CleanOutcome {
            file: rel,
            removals,
            total,
            wrote,
        });
    }
    (outcomes, errors)
}

/// Fold per-file outcomes into run statistics.
pub fn summarize(outcomes: &[CleanOutcome]) -> CleanSummary {
    let mut per_rule: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_removals = 0usize;
    let mut files_modified = 0usize;
    for o in outcomes {
        if o.total > 0 {
            files_modified += 1;
        }
        total_removals += o.total;
        for (name, n) in &o.removals {
            *per_rule.entry(name.clone()).or_default() += n;
        }
    }
    CleanSummary {
        files_scanned: outcomes.len(),
        files_modified,
        total_removals,
        per_rule,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const PAGE: &str = r##"<html>
<head>
<meta name="generator" content="OldPlatform 4.2" />
<link rel="shortlink" href="https://ex.am/?p=42" />
</head>
<body>
<h1>Post</h1>
<!-- legacy:begin toolbar --><div>old toolbar</div><!-- legacy:end toolbar -->
<p>Body text.</p>
<section class="share-links"><a href="#">tweet</a></section>
<aside class="related-posts"><ul><li>other</li></ul></aside>
<script src="/js/legacy-emoji.js"></script>
</body>
</html>
"##;

    #[test]
    fn test_clean_text_counts_and_strips() {
        let rules = load_rules(&[]).unwrap();
        let (out, counts) = clean_text(&rules, PAGE);
        assert_eq!(counts.get("generator-meta"), Some(&1));
        assert_eq!(counts.get("shortlink"), Some(&1));
        assert_eq!(counts.get("legacy-block"), Some(&1));
        assert_eq!(counts.get("share-section"), Some(&1));
        assert_eq!(counts.get("related-posts"), Some(&1));
        assert_eq!(counts.get("emoji-script"), Some(&1));
        assert!(!out.contains("share-links"));
        assert!(!out.contains("legacy:begin"));
        assert!(!out.contains("generator"));
        // untouched content survives
        assert!(out.contains("<h1>Post</h1>"));
        assert!(out.contains("<p>Body text.</p>"));
        // no blank-line residue where fragments sat on their own lines
        assert!(!out.contains("\n\n\n"));
    }

    #[test]
    fn test_clean_text_is_idempotent() {
        let rules = load_rules(&[]).unwrap();
        let (once, _) = clean_text(&rules, PAGE);
        let (twice, counts) = clean_text(&rules, &once);
        assert_eq!(once, twice);
        assert!(counts.is_empty());
    }

    #[test]
    fn test_zero_matches_is_not_an_error() {
        let rules = load_rules(&[]).unwrap();
        let (out, counts) = clean_text(&rules, "<html><body><p>clean</p></body></html>");
        assert!(counts.is_empty());
        assert_eq!(out, "<html><body><p>clean</p></body></html>");
    }

    #[test]
    fn test_multiple_occurrences_counted() {
        let rules = load_rules(&[]).unwrap();
        let text = "<section class=\"share\">a</section>\n<section class=\"share\">b</section>\n";
        let (out, counts) = clean_text(&rules, text);
        assert_eq!(counts.get("share-section"), Some(&2));
        assert_eq!(out, "");
    }

    #[test]
    fn test_extra_rule_from_config() {
        let extra = vec![RuleCfg {
            name: "tracking-pixel".into(),
            pattern: r#"<img[^>]*class="tracker"[^>]*/?>[ \t]*\r?\n?"#.into(),
        }];
        let rules = load_rules(&extra).unwrap();
        let (out, counts) =
            clean_text(&rules, "<img class=\"tracker\" src=\"/t.gif\" />\n<p>x</p>\n");
        assert_eq!(counts.get("tracking-pixel"), Some(&1));
        assert_eq!(out, "<p>x</p>\n");
    }

    #[test]
    fn test_bad_config_pattern_is_rejected() {
        let extra = vec![RuleCfg {
            name: "broken".into(),
            pattern: "(".into(),
        }];
        let err = load_rules(&extra).unwrap_err();
        assert!(err.contains("broken"));
    }

    #[test]
    fn test_dry_run_reports_same_counts_and_writes_nothing() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let page = root.join("post.html");
        std::fs::write(&page, PAGE).unwrap();
        let rules = load_rules(&[]).unwrap();
        let files = vec![page.clone()];

        let (dry, errs) = run_clean(root, &rules, &files, false);
        assert!(errs.is_empty());
        assert_eq!(std::fs::read_to_string(&page).unwrap(), PAGE);
        assert!(!dry[0].wrote);

        let (real, errs) = run_clean(root, &rules, &files, true);
        assert!(errs.is_empty());
        assert!(real[0].wrote);
        assert_eq!(dry[0].total, real[0].total);
        assert_eq!(dry[0].removals, real[0].removals);
        assert_ne!(std::fs::read_to_string(&page).unwrap(), PAGE);

        // second real run: already clean, nothing written
        let (again, _) = run_clean(root, &rules, &files, true);
        assert_eq!(again[0].total, 0);
        assert!(!again[0].wrote);
    }

    #[test]
    fn test_unreadable_file_is_logged_and_skipped() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let missing = root.join("gone.html");
        let rules = load_rules(&[]).unwrap();
        let (outcomes, errors) = run_clean(root, &rules, &[missing], true);
        assert!(outcomes.is_empty());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("gone.html"));
    }

    #[test]
    fn test_summary_totals_match_per_rule() {
        let rules = load_rules(&[]).unwrap();
        let (_, counts) = clean_text(&rules, PAGE);
        let outcome = CleanOutcome {
            file: "post.html".into(),
            total: counts.values().sum(),
            removals: counts,
            wrote: false,
        };
        let summary = summarize(&[outcome]);
        assert_eq!(summary.files_scanned, 1);
        assert_eq!(summary.files_modified, 1);
        assert_eq!(
            summary.total_removals,
            summary.per_rule.values().sum::<usize>()
        );
    }
}
