//! Placeholder-aware JSON templates.
//!
//! A template is JSON text in which some values are placeholders:
//!
//! ```text
//! {"id": {{userId}}, "label": "{{label}}", "note": "hi {{name}}"}
//! ```
//!
//! A bare `{{userId}}` may be replaced by any JSON value. A quoted
//! `"{{label}}"` fills a string slot, so numbers and booleans supplied for
//! it are turned into their text. A placeholder that shares its string with
//! other text (`"hi {{name}}"`) is part of a literal string.
//!
//! The pipeline is: [`parse`] text into a [`TemplateValue`] tree, [`render`]
//! a tree with arguments into a [`serde_json::Value`], and
//! [`to_template_string`] a tree back into text.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//!
//! let tree = poly_json_template::parse(r#"{"age": {{age}}, "label": "{{flag}}"}"#).unwrap();
//! let out = poly_json_template::render(&tree, &json!({"age": 42, "flag": true})).unwrap();
//! assert_eq!(out, json!({"age": 42, "label": "true"}));
//! assert_eq!(
//!     poly_json_template::to_template_string(&tree),
//!     r#"{"age":{{age}},"label":"{{flag}}"}"#
//! );
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Trace-level logging macro that forwards to `tracing::trace!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}

/// Trace-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// Debug-level logging macro that forwards to `tracing::debug!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Debug-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

mod args;
mod encoding;
mod error;
mod interpolate;
mod merge;
mod parser;
mod scanner;
mod serializer;
mod value;

pub use args::Arguments;
pub use encoding::{POLY_ARG_NAME_KEY, QUOTED_KEY};
pub use error::{Result, TemplateError, TemplateErrorKind};
pub use merge::{MissingArgument, RenderOptions, TemplateInput};
pub use parser::ParseOptions;
pub use scanner::{Literal, Scanner, Span, Token, TokenKind};
pub use serializer::SerializeOptions;
pub use value::{Placeholder, TemplateValue};

/// A configured template engine.
///
/// Building one sets up the scanner once; after that every method takes
/// `&self` and touches no shared state, so one engine can serve any number
/// of threads.
///
/// ```
/// use poly_json_template::{JsonTemplate, MissingArgument, RenderOptions};
/// use serde_json::json;
///
/// let engine = JsonTemplate::new()
///     .with_render_options(RenderOptions::new().missing(MissingArgument::Null));
/// let out = engine.render(r#"{"a": {{a}}, "b": {{b}}}"#, &json!({"a": 1})).unwrap();
/// assert_eq!(out, json!({"a": 1, "b": null}));
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonTemplate {
    scanner: Scanner,
    parse_options: ParseOptions,
    render_options: RenderOptions,
    serialize_options: SerializeOptions,
}

impl JsonTemplate {
    /// An engine with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Replace the render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Replace the options used by [`JsonTemplate::to_template_string`].
    pub fn with_serialize_options(mut self, options: SerializeOptions) -> Self {
        self.serialize_options = options;
        self
    }

    /// Classify every span of `text`. Never fails.
    pub fn tokenize<'src>(&self, text: &'src str) -> Vec<Token<'src>> {
        self.scanner.scan(text)
    }

    /// Parse template text into a tree.
    ///
    /// Fails with a malformed-template error (see
    /// [`TemplateError::is_malformed`]) when the text is not JSON once its
    /// placeholders are accounted for, and with
    /// [`TemplateErrorKind::AmbiguousArgumentShape`] when a literal object
    /// looks exactly like an encoded placeholder.
    pub fn parse(&self, text: &str) -> Result<TemplateValue> {
        parser::parse(&self.scanner, &self.parse_options, text)
    }

    /// Fill a template with arguments.
    ///
    /// Text is parsed first; a tree is used as is. The tree is never
    /// modified.
    pub fn render<'t, A: Arguments + ?Sized>(
        &self,
        template: impl Into<TemplateInput<'t>>,
        args: &A,
    ) -> Result<serde_json::Value> {
        let template: TemplateInput<'t> = template.into();
        match template {
            TemplateInput::Text(text) => {
                let tree = self.parse(text)?;
                merge::render(&tree, args, &self.render_options)
            }
            TemplateInput::Tree(tree) => merge::render(tree, args, &self.render_options),
        }
    }

    /// Write a tree as template text using the engine's serialize options.
    pub fn to_template_string(&self, tree: &TemplateValue) -> String {
        serializer::to_template_string(tree, &self.serialize_options)
    }

    /// Write a tree as pretty-printed template text, keeping the engine's
    /// indentation.
    pub fn to_template_string_pretty(&self, tree: &TemplateValue) -> String {
        let options = self.serialize_options.clone().pretty();
        serializer::to_template_string(tree, &options)
    }

    /// Drop `//` and `/* */` comments, leaving strings and everything else
    /// as they were.
    pub fn strip_comments(&self, text: &str) -> String {
        parser::strip_comments(&self.scanner, text)
    }
}

/// Parse template text with default options.
pub fn parse(text: &str) -> Result<TemplateValue> {
    JsonTemplate::new().parse(text)
}

/// Render a template (text or tree) with default options.
pub fn render<'t, A: Arguments + ?Sized>(
    template: impl Into<TemplateInput<'t>>,
    args: &A,
) -> Result<serde_json::Value> {
    JsonTemplate::new().render(template, args)
}

/// Compact template text for a tree.
pub fn to_template_string(tree: &TemplateValue) -> String {
    serializer::to_template_string(tree, &SerializeOptions::default())
}

/// Pretty-printed template text for a tree.
pub fn to_template_string_pretty(tree: &TemplateValue) -> String {
    serializer::to_template_string(tree, &SerializeOptions::default().pretty())
}

/// Template text for a tree with custom options.
pub fn to_template_string_with_options(tree: &TemplateValue, options: &SerializeOptions) -> String {
    serializer::to_template_string(tree, options)
}

/// Drop comments from template text with a default scanner.
pub fn strip_comments(text: &str) -> String {
    JsonTemplate::new().strip_comments(text)
}
