//! Physical-line classification for the configuration format.
//!
//! Three line shapes exist: skippable (blank or comment-only), an
//! `use "<relpath>"` include directive, and a
//! `<type> <name> = <value>[ # comment]` declaration. Anything else is a
//! syntax error the loader reports with file/line context.

use kl_common::NAME_PATTERN;
use regex::Regex;
use std::sync::LazyLock;

/// `use "<relpath>"`, matched against the whole line.
static INCLUDE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^use "(.*)"$"#).expect("include regex"));

/// `<type> <name> = <value>[ # comment]`, matched against the whole line.
///
/// The value is a run of non-space, non-`#` characters and `"..."` segments;
/// quoted segments may contain spaces and `#`.
static DECLARATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"^({NAME_PATTERN}) +({NAME_PATTERN}) *= *((?:[^# ]|"[^"]*")*) *(?:#.*)?$"#
    ))
    .expect("declaration regex")
});

/// One classified physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// Blank or comment-only; contributes nothing.
    Skip,
    /// Include directive with its raw relative path.
    Include { relpath: &'a str },
    /// Declaration with its raw (leading-trimmed) value text.
    Declaration {
        type_name: &'a str,
        name: &'a str,
        value: &'a str,
    },
}

/// Classify one physical line, or `None` for a line matching no shape.
pub fn classify(line: &str) -> Option<Line<'_>> {
    if is_skippable(line) {
        return Some(Line::Skip);
    }
    if let Some(caps) = INCLUDE_RE.captures(line) {
        let relpath = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        return Some(Line::Include { relpath });
    }
    let caps = DECLARATION_RE.captures(line)?;
    Some(Line::Declaration {
        type_name: caps.get(1).map(|m| m.as_str()).unwrap_or_default(),
        name: caps.get(2).map(|m| m.as_str()).unwrap_or_default(),
        value: caps.get(3).map(|m| m.as_str()).unwrap_or_default().trim_start(),
    })
}

/// Blank, whitespace-only, or whitespace followed by a `#` comment.
fn is_skippable(line: &str) -> bool {
    for c in line.chars() {
        if c == '#' {
            return true;
        }
        if !c.is_whitespace() {
            return false;
        }
    }
    true
}
