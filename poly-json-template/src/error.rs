//! Error types for template parsing and rendering.

use core::fmt::{self, Display};

use crate::scanner::Span;

/// Error type for every fallible template operation.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateError {
    /// The specific kind of error
    pub kind: TemplateErrorKind,
    /// Span in the template text where the error occurred
    pub span: Option<Span>,
    /// The template text (for diagnostics)
    pub source_code: Option<String>,
}

impl Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for TemplateError {}

impl TemplateError {
    /// Create a new error with span information
    pub const fn new(kind: TemplateErrorKind, span: Span) -> Self {
        TemplateError {
            kind,
            span: Some(span),
            source_code: None,
        }
    }

    /// Create an error without span information
    pub const fn without_span(kind: TemplateErrorKind) -> Self {
        TemplateError {
            kind,
            span: None,
            source_code: None,
        }
    }

    /// Attach the template text for rich diagnostics
    pub fn with_source(mut self, source: &str) -> Self {
        self.source_code = Some(source.to_string());
        self
    }

    /// Whether the template text itself is not a valid template.
    pub const fn is_malformed(&self) -> bool {
        self.kind.is_malformed()
    }
}

/// Specific error kinds
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateErrorKind {
    /// The text contains something that is neither JSON nor a placeholder
    IllegalToken {
        /// The offending text
        text: String,
    },
    /// After placeholders were rewritten the text is still not valid JSON
    InvalidJson {
        /// Message from the JSON parser
        message: String,
    },
    /// A literal object in the template has the reserved placeholder shape
    AmbiguousArgumentShape,
    /// A placeholder names an argument the caller did not supply
    MissingArgument {
        /// The argument name
        name: String,
        /// Where in the output the placeholder sits, e.g. `$.user.ids[0]`
        path: String,
    },
    /// A placeholder name that is empty or contains braces
    InvalidPlaceholderName {
        /// The rejected name
        name: String,
    },
    /// Encoded JSON text that could not be read
    InvalidEncoding {
        /// Message from the JSON parser
        message: String,
    },
}

impl Display for TemplateErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateErrorKind::IllegalToken { text } => {
                write!(f, "malformed template: unexpected `{text}`")
            }
            TemplateErrorKind::InvalidJson { message } => {
                write!(f, "malformed template: {message}")
            }
            TemplateErrorKind::AmbiguousArgumentShape => write!(
                f,
                "template contains a literal object with the reserved `{}` shape",
                crate::POLY_ARG_NAME_KEY
            ),
            TemplateErrorKind::MissingArgument { name, path } => {
                write!(f, "missing argument `{name}` at {path}")
            }
            TemplateErrorKind::InvalidPlaceholderName { name } => {
                write!(f, "invalid placeholder name {name:?}")
            }
            TemplateErrorKind::InvalidEncoding { message } => {
                write!(f, "invalid encoded template: {message}")
            }
        }
    }
}

impl TemplateErrorKind {
    /// Whether this kind means the template text is malformed.
    pub const fn is_malformed(&self) -> bool {
        matches!(
            self,
            TemplateErrorKind::IllegalToken { .. } | TemplateErrorKind::InvalidJson { .. }
        )
    }

    /// Get an error code for this kind of error.
    pub const fn code(&self) -> &'static str {
        match self {
            TemplateErrorKind::IllegalToken { .. } => "template::malformed::illegal_token",
            TemplateErrorKind::InvalidJson { .. } => "template::malformed::invalid_json",
            TemplateErrorKind::AmbiguousArgumentShape => "template::ambiguous_argument_shape",
            TemplateErrorKind::MissingArgument { .. } => "template::missing_argument",
            TemplateErrorKind::InvalidPlaceholderName { .. } => {
                "template::invalid_placeholder_name"
            }
            TemplateErrorKind::InvalidEncoding { .. } => "template::invalid_encoding",
        }
    }

    /// Get a label describing where/what the error points to.
    pub fn label(&self) -> String {
        match self {
            TemplateErrorKind::IllegalToken { text } => format!("unexpected '{text}'"),
            TemplateErrorKind::InvalidJson { .. } => "invalid JSON here".into(),
            TemplateErrorKind::AmbiguousArgumentShape => "reserved key".into(),
            TemplateErrorKind::MissingArgument { name, .. } => format!("no value for '{name}'"),
            TemplateErrorKind::InvalidPlaceholderName { .. } => "invalid name".into(),
            TemplateErrorKind::InvalidEncoding { .. } => "invalid encoding".into(),
        }
    }

    fn help(&self) -> Option<String> {
        match self {
            TemplateErrorKind::IllegalToken { .. } => {
                Some("values must be JSON or a `{{name}}` placeholder".into())
            }
            TemplateErrorKind::AmbiguousArgumentShape => Some(format!(
                "objects with exactly the keys `{}` and `{}` are reserved for placeholders",
                crate::POLY_ARG_NAME_KEY,
                crate::QUOTED_KEY
            )),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TemplateErrorKind {
    fn from(err: serde_json::Error) -> Self {
        TemplateErrorKind::InvalidEncoding {
            message: err.to_string(),
        }
    }
}

impl miette::Diagnostic for TemplateError {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.source_code
            .as_ref()
            .map(|s| s as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = miette::LabeledSpan> + '_>> {
        let span = self.span?;
        Some(Box::new(core::iter::once(miette::LabeledSpan::at(
            span,
            self.kind.label(),
        ))))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        self.kind
            .help()
            .map(|help| Box::new(help) as Box<dyn Display + 'a>)
    }
}

/// Result type for template operations
pub type Result<T> = core::result::Result<T, TemplateError>;
