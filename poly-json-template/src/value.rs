//! The template tree.

use indexmap::{IndexMap, IndexSet};
use serde_json::Number;

use crate::error::{TemplateError, TemplateErrorKind};
use crate::interpolate;

/// A substitution point in a template.
///
/// `quoted` records whether the placeholder filled a whole JSON string
/// (`"{{name}}"`) or stood where any bare value could (`{{name}}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Placeholder {
    name: String,
    quoted: bool,
}

impl Placeholder {
    /// Create a placeholder, checking the name.
    ///
    /// Names must be non-empty, must not contain `{` or `}`, and must not
    /// start or end with whitespace (the parser trims names, so such a name
    /// could never come back out of a parse).
    pub fn new(name: impl Into<String>, quoted: bool) -> Result<Self, TemplateError> {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(TemplateError::without_span(
                TemplateErrorKind::InvalidPlaceholderName { name },
            ));
        }
        Ok(Self { name, quoted })
    }

    /// A bare placeholder, `{{name}}`.
    pub fn bare(name: impl Into<String>) -> Result<Self, TemplateError> {
        Self::new(name, false)
    }

    /// A quoted placeholder, `"{{name}}"`.
    pub fn quoted(name: impl Into<String>) -> Result<Self, TemplateError> {
        Self::new(name, true)
    }

    /// The argument name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the placeholder occupied a whole string literal.
    pub const fn is_quoted(&self) -> bool {
        self.quoted
    }
}

pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.trim() == name && !name.contains(['{', '}'])
}

/// A node of a parsed template.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateValue {
    /// `null`
    Null,
    /// `true` or `false`
    Bool(bool),
    /// A numeric literal
    Number(Number),
    /// A literal string; any `{{...}}` inside it is plain text
    String(String),
    /// A substitution point
    Placeholder(Placeholder),
    /// An object, members in document order
    Object(IndexMap<String, TemplateValue>),
    /// An array
    Array(Vec<TemplateValue>),
}

impl TemplateValue {
    /// Whether this node is a placeholder.
    pub const fn is_placeholder(&self) -> bool {
        matches!(self, TemplateValue::Placeholder(_))
    }

    /// The placeholder, if this node is one.
    pub const fn as_placeholder(&self) -> Option<&Placeholder> {
        match self {
            TemplateValue::Placeholder(placeholder) => Some(placeholder),
            _ => None,
        }
    }

    /// Member `key` of an object node.
    pub fn get(&self, key: &str) -> Option<&TemplateValue> {
        match self {
            TemplateValue::Object(members) => members.get(key),
            _ => None,
        }
    }

    /// Every placeholder in the tree, in document order, duplicates included.
    pub fn placeholders(&self) -> Vec<&Placeholder> {
        let mut out = Vec::new();
        self.visit(&mut |node| {
            if let TemplateValue::Placeholder(placeholder) = node {
                out.push(placeholder);
            }
        });
        out
    }

    /// Names of every argument the template refers to, first occurrence
    /// first, each name once.
    ///
    /// Besides placeholders this includes `{{name}}` references embedded in
    /// literal strings, since rendering can fill those too.
    pub fn argument_names(&self) -> Vec<&str> {
        let mut names = IndexSet::new();
        self.visit(&mut |node| match node {
            TemplateValue::Placeholder(placeholder) => {
                names.insert(placeholder.name());
            }
            TemplateValue::String(s) => {
                names.extend(interpolate::references(s).map(|r| r.name));
            }
            _ => {}
        });
        names.into_iter().collect()
    }

    /// Pre-order walk; object keys are not visited.
    fn visit<'a>(&'a self, f: &mut impl FnMut(&'a TemplateValue)) {
        f(self);
        match self {
            TemplateValue::Object(members) => {
                for v in members.values() {
                    v.visit(f);
                }
            }
            TemplateValue::Array(items) => {
                for v in items {
                    v.visit(f);
                }
            }
            _ => {}
        }
    }
}

impl From<Placeholder> for TemplateValue {
    fn from(placeholder: Placeholder) -> Self {
        TemplateValue::Placeholder(placeholder)
    }
}

impl From<bool> for TemplateValue {
    fn from(b: bool) -> Self {
        TemplateValue::Bool(b)
    }
}

impl From<&str> for TemplateValue {
    fn from(s: &str) -> Self {
        TemplateValue::String(s.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(s: String) -> Self {
        TemplateValue::String(s)
    }
}

impl From<Number> for TemplateValue {
    fn from(n: Number) -> Self {
        TemplateValue::Number(n)
    }
}

macro_rules! from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for TemplateValue {
                fn from(n: $ty) -> Self {
                    TemplateValue::Number(Number::from(n))
                }
            }
        )*
    };
}

from_integer!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

impl From<Vec<TemplateValue>> for TemplateValue {
    fn from(items: Vec<TemplateValue>) -> Self {
        TemplateValue::Array(items)
    }
}

impl From<IndexMap<String, TemplateValue>> for TemplateValue {
    fn from(members: IndexMap<String, TemplateValue>) -> Self {
        TemplateValue::Object(members)
    }
}

impl<K: Into<String>> FromIterator<(K, TemplateValue)> for TemplateValue {
    fn from_iter<I: IntoIterator<Item = (K, TemplateValue)>>(iter: I) -> Self {
        TemplateValue::Object(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Plain JSON; never produces placeholders.
impl From<serde_json::Value> for TemplateValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => TemplateValue::Null,
            serde_json::Value::Bool(b) => TemplateValue::Bool(b),
            serde_json::Value::Number(n) => TemplateValue::Number(n),
            serde_json::Value::String(s) => TemplateValue::String(s),
            serde_json::Value::Array(items) => {
                TemplateValue::Array(items.into_iter().map(TemplateValue::from).collect())
            }
            serde_json::Value::Object(members) => members
                .into_iter()
                .map(|(k, v)| (k, TemplateValue::from(v)))
                .collect(),
        }
    }
}
