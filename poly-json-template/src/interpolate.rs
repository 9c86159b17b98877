//! `{{name}}` references embedded in literal strings.
//!
//! Only a string that is exactly one placeholder becomes a
//! [`Placeholder`](crate::Placeholder) node. Anywhere else `{{name}}` is
//! text, but rendering can still fill it in.

use core::ops::Range;

use crate::scanner::{CLOSE, OPEN};

/// One `{{name}}` inside a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Reference<'a> {
    /// Byte range of the whole reference, braces included
    pub range: Range<usize>,
    /// The trimmed name
    pub name: &'a str,
}

/// Innermost, non-overlapping references in `s`, left to right.
pub(crate) fn references(s: &str) -> impl Iterator<Item = Reference<'_>> {
    let mut pos = 0;
    core::iter::from_fn(move || {
        loop {
            let open = pos + s.get(pos..)?.find(OPEN)?;
            let inner = open + OPEN.len();
            let close = inner + s[inner..].find('}')?;
            let content = &s[inner..close];
            let name = content.trim();
            if content.contains('{') || name.is_empty() || !s[close..].starts_with(CLOSE) {
                pos = open + 1;
                continue;
            }
            let end = close + CLOSE.len();
            pos = end;
            return Some(Reference {
                range: open..end,
                name,
            });
        }
    })
}

/// Replace each reference for which `value_for` returns text.
///
/// References it answers `None` for are kept verbatim.
pub(crate) fn interpolate<E>(
    s: &str,
    mut value_for: impl FnMut(&str) -> Result<Option<String>, E>,
) -> Result<String, E> {
    let mut out = String::with_capacity(s.len());
    let mut copied = 0;
    for reference in references(s) {
        if let Some(text) = value_for(reference.name)? {
            out.push_str(&s[copied..reference.range.start]);
            out.push_str(&text);
            copied = reference.range.end;
        }
    }
    out.push_str(&s[copied..]);
    Ok(out)
}
