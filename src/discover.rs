//! File discovery: glob-based enumeration with an exclusion list.
//!
//! Include patterns are resolved relative to the scan root; exclusion
//! patterns are matched against the root-relative form of each hit, so
//! `.git/**` or `node_modules/**` prune whole subtrees regardless of where
//! the root itself lives. The returned list is sorted and deduplicated to
//! keep runs deterministic.

use glob::{glob, Pattern};
use std::path::{Path, PathBuf};

/// Enumerate files under `root` matching any `include` pattern, excluding
/// those whose root-relative path matches an `exclude` pattern.
///
/// A malformed pattern on either list is an unrecoverable discovery
/// failure; the caller aborts the run. Unreadable directory entries are
/// skipped so one bad subtree cannot sink the scan.
pub fn discover_files(
    root: &Path,
    include: &[String],
    exclude: &[String],
) -> Result<Vec<PathBuf>, String> {
    let excludes: Vec<Pattern> = exclude
        .iter()
        .map(|p| Pattern::new(p).map_err(|e| format!("bad exclude pattern '{}': {}", p, e)))
        .collect::<Result<_, _>>()?;

    let mut files: Vec<PathBuf> = Vec::new();
    for pat in include {
        let abs = root.join(pat).to_string_lossy().to_string();
        let entries =
            glob(&abs).map_err(|e| format!("bad include pattern '{}': {}", pat, e))?;
        for entry in entries.flatten() {
            if !entry.is_file() {
                continue;
            }
            let rel = entry.strip_prefix(root).unwrap_or(&entry);
            if excludes.iter().any(|ex| ex.matches_path(rel)) {
                continue;
            }
            files.push(entry);
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}
