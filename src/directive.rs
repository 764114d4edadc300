//! Recognition of directive lines.
//!
//! A line is a directive when it contains a `{{ ... }}` span holding one of
//! the following, with arbitrary whitespace between keywords:
//!
//! ```text
//! {{if <condition>}}
//! {{else if <condition>}}
//! {{else}}
//! {{endif}}
//! ```
//!
//! The span may be surrounded by other text, so directives can sit inside the
//! host format's own comments (`#@{{if ...}}`, `<!-- {{endif}} -->`,
//! `// {{else}}`). The whole line is consumed as control flow.

use crate::constants::{DIRECTIVE_CLOSE, DIRECTIVE_OPEN};

/// A control-flow instruction recognised on a line.
///
/// Conditions are kept as raw text; they are parsed only when they need to be
/// evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    If(&'a str),
    ElseIf(&'a str),
    Else,
    Endif,
}

impl<'a> Directive<'a> {
    /// Recognises `line` as a directive, or returns `None` for plain text.
    ///
    /// Spans are tried left to right; the first one that forms a directive wins.
    pub fn parse(line: &'a str) -> Option<Self> {
        let mut rest = line;
        while let Some(start) = rest.find(DIRECTIVE_OPEN) {
            let body = &rest[start + DIRECTIVE_OPEN.len()..];
            let end = body.find(DIRECTIVE_CLOSE)?;
            if let Some(directive) = Self::from_span(body[..end].trim()) {
                return Some(directive);
            }
            // `{` is one byte, so this stays on a char boundary
            rest = &rest[start + 1..];
        }
        None
    }

    fn from_span(inner: &'a str) -> Option<Self> {
        match inner {
            "endif" => return Some(Directive::Endif),
            "else" => return Some(Directive::Else),
            _ => {}
        }

        if let Some(rest) = keyword(inner, "else") {
            return keyword(rest, "if").map(Directive::ElseIf);
        }
        keyword(inner, "if").map(Directive::If)
    }
}

/// Strips `word` followed by at least one whitespace character and returns the
/// non-empty remainder.
fn keyword<'a>(text: &'a str, word: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(word)?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let rest = rest.trim();
    (!rest.is_empty()).then_some(rest)
}
