//! Doc-comment tag parser.
//!
//! Comments are read line by line. `@tag text` opens an entry for `tag`,
//! untagged lines continue the open entry, and text before the first tag
//! belongs to `description`. A blank line closes the open entry.

use crate::tree::DocTreeNode;
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

/// Tag given to untagged text.
pub const DEFAULT_TAG: &str = "description";

static RE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@([A-Za-z_][A-Za-z0-9_-]*)(?:[[:blank:]]+(.*))?$").unwrap());

/// Parsed comment: tag name to values, in first-seen order.
pub type CommentTags = IndexMap<String, Vec<String>>;

/// Strip comment markers from one line.
fn strip_markers(line: &str) -> &str {
    let mut s = line.trim();
    for prefix in ["/**", "/*!", "/*", "///", "//!", "//"] {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest;
            break;
        }
    }
    if let Some(rest) = s.strip_suffix("*/") {
        s = rest;
    }
    let s = s.trim_start();
    s.strip_prefix('*').unwrap_or(s).trim()
}

pub fn parse_tags(comment: &str) -> CommentTags {
    let mut tags = CommentTags::new();
    let mut open: Option<String> = None;

    for raw in comment.lines() {
        let line = strip_markers(raw);
        if line.is_empty() {
            open = None;
            continue;
        }

        if let Some(caps) = RE_TAG.captures(line) {
            let tag = caps[1].to_string();
            let text = caps.get(2).map_or("", |m| m.as_str().trim()).to_string();
            tags.entry(tag.clone()).or_default().push(text);
            open = Some(tag);
            continue;
        }

        match open {
            Some(ref tag) => {
                if let Some(last) = tags.get_mut(tag).and_then(|v| v.last_mut()) {
                    if !last.is_empty() {
                        last.push('\n');
                    }
                    last.push_str(line);
                }
            }
            None => {
                let values = tags.entry(DEFAULT_TAG.to_string()).or_default();
                match values.last_mut() {
                    Some(last) => {
                        last.push('\n');
                        last.push_str(line);
                    }
                    None => values.push(line.to_string()),
                }
                open = Some(DEFAULT_TAG.to_string());
            }
        }
    }
    tags
}

/// Append a `doxygen` branch holding every tag value of `comment`.
///
/// Returns whether the comment carried any text at all.
pub fn generate_doxygen_node(comment: &str, parent: &mut DocTreeNode) -> bool {
    let tags = parse_tags(comment);
    if tags.is_empty() {
        return false;
    }
    let doxygen = parent.append_child("doxygen");
    for (tag, values) in &tags {
        for value in values {
            doxygen.append_child_with_value_escaped(tag.as_str(), value.as_str());
        }
    }
    true
}
