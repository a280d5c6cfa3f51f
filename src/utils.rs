//! Supporting helpers: colored message prefixes and path display.

use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Prefix for fatal or per-file error messages on stderr.
pub fn error_prefix() -> String {
    if color_enabled() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

/// Prefix for friendly notes on stderr.
pub fn note_prefix() -> String {
    if color_enabled() {
        "note:".cyan().bold().to_string()
    } else {
        "note:".to_string()
    }
}

/// Display a scanned path relative to the scan root when possible.
pub fn display_path(root: &Path, path: &Path) -> String {
    pathdiff::diff_paths(path, root)
        .unwrap_or_else(|| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_path_relativizes() {
        let root = Path::new("/site");
        assert_eq!(
            display_path(root, Path::new("/site/blog/a.html")),
            "blog/a.html"
        );
    }

    #[test]
    fn test_display_path_outside_root() {
        // diff_paths still produces a ../ form for siblings of the root
        let root = Path::new("/site/sub");
        assert_eq!(
            display_path(root, Path::new("/site/a.html")),
            "../a.html"
        );
    }
}
