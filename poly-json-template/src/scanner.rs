//! Hand-written scanner that classifies every span of a template.
//!
//! The scanner's job is to find token boundaries, not to interpret them.
//! Its output is lossless: concatenating the text of every token reproduces
//! the input byte for byte. Scanning never fails; characters that fit no
//! rule come out as [`TokenKind::Illegal`] and the parser reports them.

/// A byte span into the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Byte offset of the first byte
    pub offset: usize,
    /// Length in bytes
    pub len: usize,
}

impl Span {
    /// Create a span from an offset and a length.
    pub const fn new(offset: usize, len: usize) -> Self {
        Self { offset, len }
    }

    /// Offset one past the last byte.
    pub const fn end(&self) -> usize {
        self.offset + self.len
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.offset, span.len).into()
    }
}

/// `true`, `false` or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
}

/// Classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of whitespace
    Whitespace,
    /// `{`
    ObjectStart,
    /// `}`
    ObjectEnd,
    /// `[`
    ArrayStart,
    /// `]`
    ArrayEnd,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// A quoted string immediately followed by `:`
    AttrKey,
    /// Any other quoted string, quotes included
    String,
    /// A numeric literal
    Number,
    /// A keyword literal
    Literal(Literal),
    /// `// ...` up to the end of the line
    LineComment,
    /// `/* ... */`
    BlockComment,
    /// A bare `{{name}}`
    Placeholder,
    /// Anything the grammar does not recognize
    Illegal,
}

impl TokenKind {
    /// Whether this is a comment of either style.
    pub const fn is_comment(self) -> bool {
        matches!(self, TokenKind::LineComment | TokenKind::BlockComment)
    }
}

/// A classified slice of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    /// What the slice is
    pub kind: TokenKind,
    /// The slice itself
    pub text: &'src str,
    /// Where the slice sits in the input
    pub span: Span,
}

/// Opening placeholder delimiter.
pub(crate) const OPEN: &str = "{{";
/// Closing placeholder delimiter.
pub(crate) const CLOSE: &str = "}}";

/// Template scanner.
///
/// Built once and then shared; [`Scanner::scan`] only needs `&self`.
#[derive(Debug, Clone)]
pub struct Scanner {
    keywords: [(&'static str, Literal); 3],
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    /// Create a scanner for the template grammar.
    pub const fn new() -> Self {
        Self {
            keywords: [
                ("true", Literal::True),
                ("false", Literal::False),
                ("null", Literal::Null),
            ],
        }
    }

    /// Split `input` into classified tokens covering all of it.
    pub fn scan<'src>(&self, input: &'src str) -> Vec<Token<'src>> {
        let mut tokens = Vec::new();
        let mut pos = 0;
        while let Some(c) = input[pos..].chars().next() {
            let (kind, len) = self.next_token(&input[pos..], c);
            tokens.push(Token {
                kind,
                text: &input[pos..pos + len],
                span: Span::new(pos, len),
            });
            pos += len;
        }
        tokens
    }

    /// Classify the token at the start of `rest`, whose first char is `c`.
    /// The returned length is always at least one char.
    fn next_token(&self, rest: &str, c: char) -> (TokenKind, usize) {
        match c {
            c if c.is_whitespace() => {
                let len = rest
                    .find(|c: char| !c.is_whitespace())
                    .unwrap_or(rest.len());
                (TokenKind::Whitespace, len)
            }
            '"' => match string_len(rest) {
                Some(len) if rest[len..].trim_start().starts_with(':') => {
                    (TokenKind::AttrKey, len)
                }
                Some(len) => (TokenKind::String, len),
                None => (TokenKind::Illegal, rest.len()),
            },
            '{' => match placeholder_len(rest) {
                Some(len) => (TokenKind::Placeholder, len),
                None => (TokenKind::ObjectStart, 1),
            },
            '}' => (TokenKind::ObjectEnd, 1),
            '[' => (TokenKind::ArrayStart, 1),
            ']' => (TokenKind::ArrayEnd, 1),
            ',' => (TokenKind::Comma, 1),
            ':' => (TokenKind::Colon, 1),
            '/' if rest.starts_with("//") => {
                let len = rest
                    .find(|c: char| c == '\n' || c == '\r')
                    .unwrap_or(rest.len());
                (TokenKind::LineComment, len)
            }
            '/' if rest.starts_with("/*") => match rest[2..].find("*/") {
                Some(i) => (TokenKind::BlockComment, i + 4),
                None => (TokenKind::Illegal, rest.len()),
            },
            '-' | '0'..='9' => match number_len(rest.as_bytes()) {
                0 => (TokenKind::Illegal, 1),
                len => (TokenKind::Number, len),
            },
            c if is_word_char(c) => {
                let len = rest.find(|c| !is_word_char(c)).unwrap_or(rest.len());
                let word = &rest[..len];
                match self.keywords.iter().find(|(kw, _)| *kw == word) {
                    Some((_, literal)) => (TokenKind::Literal(*literal), len),
                    None => (TokenKind::Illegal, len),
                }
            }
            c => (TokenKind::Illegal, c.len_utf8()),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Length of the quoted string at the start of `rest`, closing quote
/// included, or `None` if it never closes.
fn string_len(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut i = 1;
    loop {
        match bytes.get(i)? {
            b'\\' => i += 2,
            b'"' => return Some(i + 1),
            _ => i += 1,
        }
    }
}

/// Length of the `{{name}}` at the start of `rest`, if there is one.
///
/// The name runs up to the first `}` and must be followed by a second `}`,
/// contain no `{`, and not be blank.
fn placeholder_len(rest: &str) -> Option<usize> {
    let inner = rest.strip_prefix(OPEN)?;
    let close = inner.find('}')?;
    let name = &inner[..close];
    if name.contains('{') || name.trim().is_empty() || !inner[close..].starts_with(CLOSE) {
        return None;
    }
    Some(OPEN.len() + close + CLOSE.len())
}

/// Length of the number at the start of `bytes`, zero if there is none.
fn number_len(bytes: &[u8]) -> usize {
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let start = usize::from(bytes.first() == Some(&b'-'));
    let mut end = digits_from(start);
    if end == start {
        return 0;
    }

    if bytes.get(end) == Some(&b'.') && bytes.get(end + 1).is_some_and(u8::is_ascii_digit) {
        end = digits_from(end + 1);
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        if bytes.get(exp).is_some_and(u8::is_ascii_digit) {
            end = digits_from(exp);
        }
    }

    end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<(TokenKind, &str)> {
        Scanner::new()
            .scan(input)
            .into_iter()
            .filter(|t| t.kind != TokenKind::Whitespace)
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn scan_is_lossless() {
        let inputs = [
            "",
            r#"{"name": {{name}}, "lastName": "{{lastName}}"}"#,
            "[1, -2.5e+3, true, false, null] // trailing",
            "/* head */ {\"a\": \"un\\\"closed\"}",
            "{{ {{ }} }} ?? ünïcödé \"open",
            "{\"a\": 1,\r\n // c\r\n \"b\": 2}",
        ];
        let scanner = Scanner::new();
        for input in inputs {
            let tokens = scanner.scan(input);
            let joined: String = tokens.iter().map(|t| t.text).collect();
            assert_eq!(joined, input);
            for t in &tokens {
                assert_eq!(&input[t.span.offset..t.span.end()], t.text);
            }
        }
    }

    #[test]
    fn classifies_template_tokens() {
        assert_eq!(
            kinds(r#"{"name": {{name}}, "lastName": "{{lastName}}", "n": [-1.5, null]}"#),
            vec![
                (TokenKind::ObjectStart, "{"),
                (TokenKind::AttrKey, "\"name\""),
                (TokenKind::Colon, ":"),
                (TokenKind::Placeholder, "{{name}}"),
                (TokenKind::Comma, ","),
                (TokenKind::AttrKey, "\"lastName\""),
                (TokenKind::Colon, ":"),
                (TokenKind::String, "\"{{lastName}}\""),
                (TokenKind::Comma, ","),
                (TokenKind::AttrKey, "\"n\""),
                (TokenKind::Colon, ":"),
                (TokenKind::ArrayStart, "["),
                (TokenKind::Number, "-1.5"),
                (TokenKind::Comma, ","),
                (TokenKind::Literal(Literal::Null), "null"),
                (TokenKind::ArrayEnd, "]"),
                (TokenKind::ObjectEnd, "}"),
            ]
        );
    }

    #[test]
    fn attr_key_allows_space_before_colon() {
        assert_eq!(
            kinds("{\"a\"  \n : \"b\"}"),
            vec![
                (TokenKind::ObjectStart, "{"),
                (TokenKind::AttrKey, "\"a\""),
                (TokenKind::Colon, ":"),
                (TokenKind::String, "\"b\""),
                (TokenKind::ObjectEnd, "}"),
            ]
        );
    }

    #[test]
    fn placeholder_inside_text_stays_in_string() {
        assert_eq!(
            kinds(r#"["The name is {{name}}", "{{a}} and {{b}}"]"#),
            vec![
                (TokenKind::ArrayStart, "["),
                (TokenKind::String, "\"The name is {{name}}\""),
                (TokenKind::Comma, ","),
                (TokenKind::String, "\"{{a}} and {{b}}\""),
                (TokenKind::ArrayEnd, "]"),
            ]
        );
    }

    #[test]
    fn nested_closing_braces_after_placeholder() {
        assert_eq!(
            kinds(r#"{"a":{"b":{{x}}}}"#)
                .into_iter()
                .map(|(k, _)| k)
                .collect::<Vec<_>>(),
            vec![
                TokenKind::ObjectStart,
                TokenKind::AttrKey,
                TokenKind::Colon,
                TokenKind::ObjectStart,
                TokenKind::AttrKey,
                TokenKind::Colon,
                TokenKind::Placeholder,
                TokenKind::ObjectEnd,
                TokenKind::ObjectEnd,
            ]
        );
    }

    #[test]
    fn braces_that_are_not_placeholders() {
        assert_eq!(
            kinds("{{}} {{ }} {{a{b}}"),
            vec![
                (TokenKind::ObjectStart, "{"),
                (TokenKind::ObjectStart, "{"),
                (TokenKind::ObjectEnd, "}"),
                (TokenKind::ObjectEnd, "}"),
                (TokenKind::ObjectStart, "{"),
                (TokenKind::ObjectStart, "{"),
                (TokenKind::ObjectEnd, "}"),
                (TokenKind::ObjectEnd, "}"),
                (TokenKind::ObjectStart, "{"),
                (TokenKind::ObjectStart, "{"),
                (TokenKind::Illegal, "a"),
                (TokenKind::ObjectStart, "{"),
                (TokenKind::Illegal, "b"),
                (TokenKind::ObjectEnd, "}"),
                (TokenKind::ObjectEnd, "}"),
            ]
        );
    }

    #[test]
    fn comments() {
        assert_eq!(
            kinds("1 // one\n/* two */ 2"),
            vec![
                (TokenKind::Number, "1"),
                (TokenKind::LineComment, "// one"),
                (TokenKind::BlockComment, "/* two */"),
                (TokenKind::Number, "2"),
            ]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(number_len(b"0"), 1);
        assert_eq!(number_len(b"-12.50e-3,"), 9);
        assert_eq!(number_len(b"1.}"), 1);
        assert_eq!(number_len(b"7e"), 1);
        assert_eq!(number_len(b"-"), 0);
        assert_eq!(number_len(b"-x"), 0);
    }

    #[test]
    fn illegal_input() {
        assert_eq!(
            kinds("[undefined, -, \"open"),
            vec![
                (TokenKind::ArrayStart, "["),
                (TokenKind::Illegal, "undefined"),
                (TokenKind::Comma, ","),
                (TokenKind::Illegal, "-"),
                (TokenKind::Comma, ","),
                (TokenKind::Illegal, "\"open"),
            ]
        );
        assert_eq!(kinds("/* never closed"), vec![(TokenKind::Illegal, "/* never closed")]);
        assert_eq!(kinds("#"), vec![(TokenKind::Illegal, "#")]);
    }
}
