//! Template text → template tree.
//!
//! Parsing goes through JSON: every placeholder token is rewritten into the
//! reserved encoding (see [`crate::encoding`]), the result is handed to
//! `serde_json`, and the generic tree is decoded back into placeholders.

use serde_json::Value;

use crate::encoding::{self, POLY_ARG_NAME_KEY};
use crate::error::{Result, TemplateError, TemplateErrorKind};
use crate::scanner::{CLOSE, OPEN, Scanner, Span, Token, TokenKind};
use crate::value::TemplateValue;

/// Options for parsing.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Accept `//` and `/* */` comments and drop them (default: true)
    pub allow_comments: bool,

    /// Fail when a literal object has the reserved placeholder shape
    /// instead of reading it as a placeholder (default: true)
    pub reject_ambiguous: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            allow_comments: true,
            reject_ambiguous: true,
        }
    }
}

impl ParseOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat comments as malformed input.
    pub const fn forbid_comments(mut self) -> Self {
        self.allow_comments = false;
        self
    }

    /// Read literal objects of the reserved shape as placeholders.
    pub const fn accept_ambiguous(mut self) -> Self {
        self.reject_ambiguous = false;
        self
    }
}

/// Where a piece of the rewritten text came from.
#[derive(Debug, Clone, Copy)]
struct Segment {
    /// Offset in the rewritten text
    rewritten: usize,
    /// The source token
    source: Span,
    /// Whether the token was copied unchanged
    verbatim: bool,
}

/// The template text as plain JSON.
#[derive(Debug, Default)]
struct Rewrite {
    json: String,
    /// The same text with every placeholder as `null`
    literal: String,
    segments: Vec<Segment>,
    /// First literal `"$polyArgName"` key in the source
    reserved_key: Option<Span>,
}

impl Rewrite {
    fn push(&mut self, token: &Token<'_>, text: &str, verbatim: bool, placeholder: bool) {
        self.segments.push(Segment {
            rewritten: self.json.len(),
            source: token.span,
            verbatim,
        });
        self.json.push_str(text);
        self.literal.push_str(if placeholder { "null" } else { text });
    }

    /// Map an offset in the rewritten text back to the template text.
    fn source_span(&self, offset: usize, source: &str) -> Span {
        let idx = self.segments.partition_point(|s| s.rewritten <= offset);
        let Some(segment) = idx.checked_sub(1).map(|i| self.segments[i]) else {
            return Span::new(0, 0);
        };
        if !segment.verbatim {
            return segment.source;
        }
        let mut at = segment.source.offset + (offset - segment.rewritten);
        at = at.min(segment.source.end().saturating_sub(1));
        while !source.is_char_boundary(at) {
            at -= 1;
        }
        let len = source[at..].chars().next().map_or(0, char::len_utf8);
        Span::new(at, len)
    }
}

/// Parse template text.
pub(crate) fn parse(scanner: &Scanner, options: &ParseOptions, text: &str) -> Result<TemplateValue> {
    let tokens = scanner.scan(text);
    let rewrite = rewrite(&tokens, options).map_err(|err| err.with_source(text))?;

    let generic: Value = serde_json::from_str(&rewrite.json).map_err(|err| {
        let offset = rewritten_offset(&rewrite.json, err.line(), err.column());
        TemplateError::new(
            TemplateErrorKind::InvalidJson {
                message: json_error_message(&err),
            },
            rewrite.source_span(offset, text),
        )
        .with_source(text)
    })?;

    if options.reject_ambiguous {
        if let Some(span) = rewrite.reserved_key {
            if literal_placeholders(&rewrite.literal) > 0 {
                return Err(
                    TemplateError::new(TemplateErrorKind::AmbiguousArgumentShape, span)
                        .with_source(text),
                );
            }
        }
    }

    let mut decoded = 0;
    let tree = encoding::decode(generic, &mut decoded);
    debug!(
        tokens = tokens.len(),
        placeholders = decoded,
        "parsed template"
    );
    Ok(tree)
}

/// How many objects of the reserved shape the template spells out itself.
///
/// Duplicate keys resolve the same way as in the rewritten text, so every
/// literal counted here would survive into the tree.
fn literal_placeholders(literal: &str) -> usize {
    let mut count = 0;
    if let Ok(value) = serde_json::from_str::<Value>(literal) {
        encoding::decode(value, &mut count);
    }
    count
}

fn rewrite(tokens: &[Token<'_>], options: &ParseOptions) -> Result<Rewrite> {
    let mut out = Rewrite {
        json: String::with_capacity(tokens.iter().map(|t| t.text.len()).sum()),
        ..Rewrite::default()
    };

    for token in tokens {
        match token.kind {
            TokenKind::Illegal => {
                return Err(TemplateError::new(
                    TemplateErrorKind::IllegalToken {
                        text: token.text.to_string(),
                    },
                    token.span,
                ));
            }
            kind if kind.is_comment() => {
                if !options.allow_comments {
                    return Err(TemplateError::new(
                        TemplateErrorKind::IllegalToken {
                            text: token.text.to_string(),
                        },
                        token.span,
                    ));
                }
                // keeps `1/**/2` from becoming `12`
                out.push(token, " ", false, false);
            }
            TokenKind::Placeholder => {
                let name = token.text[OPEN.len()..token.text.len() - CLOSE.len()].trim();
                trace!(name, "bare placeholder");
                out.push(token, &encoding::encode_placeholder(name, false), false, true);
            }
            TokenKind::String => match quoted_placeholder_name(token.text) {
                Some(name) => {
                    trace!(name = name.as_str(), "quoted placeholder");
                    out.push(token, &encoding::encode_placeholder(&name, true), false, true);
                }
                None => out.push(token, token.text, true, false),
            },
            TokenKind::AttrKey => {
                if out.reserved_key.is_none()
                    && serde_json::from_str::<String>(token.text).is_ok_and(|k| k == POLY_ARG_NAME_KEY)
                {
                    out.reserved_key = Some(token.span);
                }
                out.push(token, token.text, true, false);
            }
            _ => out.push(token, token.text, true, false),
        }
    }

    Ok(out)
}

/// The name if the string literal is written as exactly one `{{name}}`.
///
/// The braces must appear as is: `"\u007b{x}}"` is the literal text `{{x}}`.
fn quoted_placeholder_name(literal: &str) -> Option<String> {
    let raw = literal.strip_prefix('"')?.strip_suffix('"')?;
    whole_placeholder_name(raw)?;
    let content: String = serde_json::from_str(literal).ok()?;
    whole_placeholder_name(&content).map(str::to_string)
}

/// The trimmed name if `content` is exactly one `{{name}}`.
pub(crate) fn whole_placeholder_name(content: &str) -> Option<&str> {
    let name = content.strip_prefix(OPEN)?.strip_suffix(CLOSE)?;
    let trimmed = name.trim();
    if trimmed.is_empty() || name.contains(['{', '}']) {
        return None;
    }
    Some(trimmed)
}

/// Byte offset for a 1-based line and the column `serde_json` reports.
fn rewritten_offset(json: &str, line: usize, column: usize) -> usize {
    let line_start: usize = json
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(json.len())
}

/// `serde_json`'s message without its position, which refers to the
/// rewritten text.
fn json_error_message(err: &serde_json::Error) -> String {
    let message = err.to_string();
    match message.rfind(" at line ") {
        Some(idx) => message[..idx].to_string(),
        None => message,
    }
}

/// Drop comments from template text, keeping everything else verbatim.
///
/// A block comment leaves one space behind so the tokens around it stay
/// apart; a line comment ends before its newline and leaves nothing.
pub(crate) fn strip_comments(scanner: &Scanner, text: &str) -> String {
    scanner
        .scan(text)
        .into_iter()
        .filter_map(|t| match t.kind {
            TokenKind::LineComment => None,
            TokenKind::BlockComment => Some(" "),
            _ => Some(t.text),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_names() {
        assert_eq!(quoted_placeholder_name(r#""{{name}}""#).as_deref(), Some("name"));
        assert_eq!(quoted_placeholder_name(r#""{{ name }}""#).as_deref(), Some("name"));
        assert_eq!(quoted_placeholder_name(r#""{{a\"b}}""#).as_deref(), Some("a\"b"));
        assert_eq!(quoted_placeholder_name(r#""x {{name}}""#), None);
        assert_eq!(quoted_placeholder_name(r#""{{a}}{{b}}""#), None);
        assert_eq!(quoted_placeholder_name(r#""{{ }}""#), None);
        assert_eq!(quoted_placeholder_name(r#""{{}}""#), None);
        assert_eq!(quoted_placeholder_name(r#""\u007b{x}}""#), None);
        assert_eq!(quoted_placeholder_name(r#""{{x\u007d}""#), None);
    }

    #[test]
    fn offsets_from_line_and_column() {
        let json = "{\n  \"a\": x\n}";
        assert_eq!(rewritten_offset(json, 2, 8), 9);
        assert_eq!(&json[9..10], "x");
        assert_eq!(rewritten_offset(json, 1, 0), 0);
        assert_eq!(rewritten_offset(json, 9, 99), json.len());
    }

    #[test]
    fn rewrite_encodes_placeholders() {
        let tokens = Scanner::new().scan(r#"[{{a}}, "{{ b }}", "c {{d}}"]"#);
        let rewrite = rewrite(&tokens, &ParseOptions::default()).unwrap();
        assert_eq!(
            rewrite.json,
            r#"[{"$polyArgName":"a","quoted":false}, {"$polyArgName":"b","quoted":true}, "c {{d}}"]"#
        );
        assert_eq!(rewrite.literal, r#"[null, null, "c {{d}}"]"#);
    }

    #[test]
    fn literal_reserved_objects_are_counted() {
        assert_eq!(literal_placeholders(r#"{"a": null, "b": 1}"#), 0);
        assert_eq!(
            literal_placeholders(r#"{"a": null, "a": 1, "b": {"$polyArgName": "y", "quoted": false}}"#),
            1
        );
        assert_eq!(literal_placeholders("[1,"), 0);
    }
}
