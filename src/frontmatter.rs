//! Metadata header extraction for generated pages.
//!
//! A page may start with a delimited block of `key: value` lines:
//!
//! ```text
//! ---
//! title: "Hello"
//! description: World
//! ---
//! <html>...
//! ```
//!
//! The block is recognized only when the very first line is the `---`
//! marker. Values may be wrapped in matching single or double quotes
//! (stripped) or left bare (trimmed). Lines that do not parse as
//! `key: value` are skipped; a missing or unterminated block yields an
//! empty mapping. Absent keys are significant to the audit checks and are
//! never an error here.

use std::collections::BTreeMap;

const DELIM: &str = "---";

#[derive(Debug, Default, Clone)]
/// Key/value metadata parsed from a page's header block.
pub struct Metadata {
    map: BTreeMap<String, String>,
}

impl Metadata {
    /// Look up a key, returning the trimmed value only when it is
    /// non-blank. Blank and absent values are equivalent downstream.
    pub fn get(&self, key: &str) -> Option<&str> {
        let v = self.map.get(key)?.trim();
        if v.is_empty() {
            None
        } else {
            Some(v)
        }
    }

    /// First non-blank value among `keys`, in order.
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.get(k))
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }
}

/// Parse the leading metadata block of `text`.
pub fn parse(text: &str) -> Metadata {
    let mut lines = text.lines();
    match lines.next() {
        Some(first) if first.trim_end() == DELIM => {}
        _ => return Metadata::default(),
    }

    let mut map = BTreeMap::new();
    for line in lines {
        if line.trim() == DELIM {
            return Metadata { map };
        }
        if let Some((key, value)) = parse_key_value(line) {
            map.insert(key.to_string(), value.to_string());
        }
    }
    // Unterminated block: treat as no header at all.
    Metadata::default()
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return None;
    }
    Some((key, strip_quotes(value.trim())))
}

fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if value.len() >= 2
        && ((bytes[0] == b'"' && bytes[value.len() - 1] == b'"')
            || (bytes[0] == b'\'' && bytes[value.len() - 1] == b'\''))
    {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_header() {
        let meta = parse("---\ntitle: \"Hello\"\ndescription: World\n---\nbody");
        assert_eq!(meta.get("title"), Some("Hello"));
        assert_eq!(meta.get("description"), Some("World"));
        assert_eq!(meta.len(), 2);
    }

    #[test]
    fn test_no_leading_delimiter_yields_empty() {
        let meta = parse("<html>\n---\ntitle: x\n---\n");
        assert!(meta.is_empty());
    }

    #[test]
    fn test_unterminated_header_yields_empty() {
        let meta = parse("---\ntitle: x\nno closing marker");
        assert!(meta.is_empty());
    }

    #[test]
    fn test_single_quotes_and_bare_values() {
        let meta = parse("---\ntitle: 'A page'\nimage:   /img/cover.png  \n---\n");
        assert_eq!(meta.get("title"), Some("A page"));
        assert_eq!(meta.get("image"), Some("/img/cover.png"));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let meta = parse("---\ntitle: ok\nnot a pair\nbad key!: x\n- list: no\n---\n");
        assert_eq!(meta.get("title"), Some("ok"));
        assert_eq!(meta.len(), 1);
    }

    #[test]
    fn test_blank_value_is_absent() {
        let meta = parse("---\ndescription:\ntitle: \"  \"\n---\n");
        assert_eq!(meta.get("description"), None);
        assert_eq!(meta.get("title"), None);
    }

    #[test]
    fn test_first_of_order() {
        let meta = parse("---\nog_image: /og.png\nimage: /cover.png\n---\n");
        assert_eq!(meta.first_of(&["image", "og_image"]), Some("/cover.png"));
        assert_eq!(meta.first_of(&["banner", "og_image"]), Some("/og.png"));
        assert_eq!(meta.first_of(&["banner"]), None);
    }

    #[test]
    fn test_colon_in_value_kept() {
        let meta = parse("---\ncanonical: https://example.com/post\n---\n");
        assert_eq!(meta.get("canonical"), Some("https://example.com/post"));
    }
}
