//! Template tree + arguments → concrete JSON.

use core::fmt::Write;

use serde_json::{Map, Value};

use crate::args::Arguments;
use crate::error::{Result, TemplateError, TemplateErrorKind};
use crate::interpolate;
use crate::value::{Placeholder, TemplateValue};

/// What to do with a placeholder whose argument was not supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingArgument {
    /// Leave the value out: an object drops the member, an array gets
    /// `null`, and a placeholder at the root renders as `null`.
    #[default]
    Omit,
    /// Render `null` in its place.
    Null,
    /// Fail with [`TemplateErrorKind::MissingArgument`].
    Fail,
}

/// Options for rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Policy for missing arguments (default: [`MissingArgument::Omit`])
    pub missing: MissingArgument,

    /// Fill `{{name}}` references inside literal strings (default: true)
    pub interpolate_strings: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            missing: MissingArgument::Omit,
            interpolate_strings: true,
        }
    }
}

impl RenderOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the missing-argument policy.
    pub const fn missing(mut self, missing: MissingArgument) -> Self {
        self.missing = missing;
        self
    }

    /// Copy literal strings untouched.
    pub const fn no_interpolation(mut self) -> Self {
        self.interpolate_strings = false;
        self
    }
}

/// Something [`render`](crate::render) accepts as a template.
#[derive(Debug, Clone, Copy)]
pub enum TemplateInput<'a> {
    /// Template text, parsed before rendering
    Text(&'a str),
    /// An already parsed tree
    Tree(&'a TemplateValue),
}

impl<'a> From<&'a str> for TemplateInput<'a> {
    fn from(text: &'a str) -> Self {
        TemplateInput::Text(text)
    }
}

impl<'a> From<&'a String> for TemplateInput<'a> {
    fn from(text: &'a String) -> Self {
        TemplateInput::Text(text)
    }
}

impl<'a> From<&'a TemplateValue> for TemplateInput<'a> {
    fn from(tree: &'a TemplateValue) -> Self {
        TemplateInput::Tree(tree)
    }
}

#[derive(Debug, Clone, Copy)]
enum PathSegment<'a> {
    Key(&'a str),
    Index(usize),
}

struct Merger<'a, A: ?Sized> {
    args: &'a A,
    options: &'a RenderOptions,
    path: Vec<PathSegment<'a>>,
}

/// Render a parsed tree. The tree is only read; the output is built fresh.
pub(crate) fn render<A: Arguments + ?Sized>(
    tree: &TemplateValue,
    args: &A,
    options: &RenderOptions,
) -> Result<Value> {
    let mut merger = Merger {
        args,
        options,
        path: Vec::new(),
    };
    Ok(merger.merge(tree)?.unwrap_or(Value::Null))
}

impl<'a, A: Arguments + ?Sized> Merger<'a, A> {
    /// `None` means the value is absent.
    fn merge(&mut self, node: &'a TemplateValue) -> Result<Option<Value>> {
        let value = match node {
            TemplateValue::Null => Value::Null,
            TemplateValue::Bool(b) => Value::Bool(*b),
            TemplateValue::Number(n) => Value::Number(n.clone()),
            TemplateValue::String(s) if self.options.interpolate_strings => {
                Value::String(self.interpolate(s)?)
            }
            TemplateValue::String(s) => Value::String(s.clone()),
            TemplateValue::Placeholder(placeholder) => return self.substitute(placeholder),
            TemplateValue::Object(members) => {
                let mut out = Map::with_capacity(members.len());
                for (key, member) in members {
                    self.path.push(PathSegment::Key(key));
                    let merged = self.merge(member)?;
                    self.path.pop();
                    if let Some(merged) = merged {
                        out.insert(key.clone(), merged);
                    }
                }
                Value::Object(out)
            }
            TemplateValue::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    self.path.push(PathSegment::Index(index));
                    let merged = self.merge(item)?;
                    self.path.pop();
                    out.push(merged.unwrap_or(Value::Null));
                }
                Value::Array(out)
            }
        };
        Ok(Some(value))
    }

    fn substitute(&self, placeholder: &Placeholder) -> Result<Option<Value>> {
        let Some(value) = self.args.argument(placeholder.name()) else {
            trace!(name = placeholder.name(), "argument missing");
            return match self.options.missing {
                MissingArgument::Omit => Ok(None),
                MissingArgument::Null => Ok(Some(Value::Null)),
                MissingArgument::Fail => Err(self.missing(placeholder.name())),
            };
        };
        trace!(
            name = placeholder.name(),
            quoted = placeholder.is_quoted(),
            "substituting argument"
        );

        let value = match value {
            // a quoted slot keeps holding a string
            Value::Bool(b) if placeholder.is_quoted() => Value::String(b.to_string()),
            Value::Number(n) if placeholder.is_quoted() => Value::String(n.to_string()),
            value => value.clone(),
        };
        Ok(Some(value))
    }

    fn interpolate(&self, s: &str) -> Result<String> {
        interpolate::interpolate(s, |name| match self.args.argument(name) {
            Some(Value::String(text)) => Ok(Some(text.clone())),
            Some(value) => Ok(Some(value.to_string())),
            None if self.options.missing == MissingArgument::Fail => Err(self.missing(name)),
            None => Ok(None),
        })
    }

    fn missing(&self, name: &str) -> TemplateError {
        TemplateError::without_span(TemplateErrorKind::MissingArgument {
            name: name.to_string(),
            path: self.path_string(),
        })
    }

    /// `$.user.ids[0]`, with keys that are not plain identifiers quoted.
    fn path_string(&self) -> String {
        let mut out = String::from("$");
        for segment in &self.path {
            match segment {
                PathSegment::Key(key) if is_plain_key(key) => {
                    let _ = write!(out, ".{key}");
                }
                PathSegment::Key(key) => {
                    let _ = write!(out, "[{}]", Value::String(key.to_string()));
                }
                PathSegment::Index(index) => {
                    let _ = write!(out, "[{index}]");
                }
            }
        }
        out
    }
}

fn is_plain_key(key: &str) -> bool {
    let mut chars = key.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
