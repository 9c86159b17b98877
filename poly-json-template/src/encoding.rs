//! The reserved JSON encoding of placeholders.
//!
//! While parsing, every placeholder is rewritten as
//! `{"$polyArgName": "<name>", "quoted": <bool>}` so that an ordinary JSON
//! parser can read the template. The same encoding is how a template tree is
//! written with serde.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{TemplateError, TemplateErrorKind};
use crate::value::{Placeholder, TemplateValue};

/// Key holding the argument name in an encoded placeholder.
pub const POLY_ARG_NAME_KEY: &str = "$polyArgName";

/// Key holding the quoted flag in an encoded placeholder.
pub const QUOTED_KEY: &str = "quoted";

/// Encode one placeholder as JSON text.
pub(crate) fn encode_placeholder(name: &str, quoted: bool) -> String {
    let mut out = String::with_capacity(name.len() + 40);
    out.push_str("{\"");
    out.push_str(POLY_ARG_NAME_KEY);
    out.push_str("\":");
    // a `String` always serializes
    out.push_str(&Value::String(name.to_string()).to_string());
    out.push_str(",\"");
    out.push_str(QUOTED_KEY);
    out.push_str(if quoted { "\":true}" } else { "\":false}" });
    out
}

/// The placeholder an object encodes, if it has exactly the reserved shape.
fn decode_placeholder(members: &Map<String, Value>) -> Option<Placeholder> {
    if members.len() != 2 {
        return None;
    }
    let name = members.get(POLY_ARG_NAME_KEY)?.as_str()?;
    let quoted = members.get(QUOTED_KEY)?.as_bool()?;
    Placeholder::new(name, quoted).ok()
}

/// Decode a generic JSON tree, counting the placeholders found.
pub(crate) fn decode(value: Value, placeholders: &mut usize) -> TemplateValue {
    match value {
        Value::Object(members) => {
            if let Some(placeholder) = decode_placeholder(&members) {
                *placeholders += 1;
                return TemplateValue::Placeholder(placeholder);
            }
            TemplateValue::Object(
                members
                    .into_iter()
                    .map(|(k, v)| (k, decode(v, placeholders)))
                    .collect(),
            )
        }
        Value::Array(items) => TemplateValue::Array(
            items
                .into_iter()
                .map(|v| decode(v, placeholders))
                .collect(),
        ),
        scalar => TemplateValue::from(scalar),
    }
}

impl TemplateValue {
    /// Read a tree from its encoded form.
    ///
    /// Any object with exactly the keys [`POLY_ARG_NAME_KEY`] (a valid name)
    /// and [`QUOTED_KEY`] (a bool) becomes a placeholder.
    pub fn from_encoded(value: Value) -> Self {
        decode(value, &mut 0)
    }

    /// Read a tree from encoded JSON text.
    pub fn from_encoded_str(text: &str) -> Result<Self, TemplateError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|err| TemplateError::without_span(TemplateErrorKind::from(err)))?;
        Ok(Self::from_encoded(value))
    }

    /// The encoded form of this tree.
    pub fn to_encoded(&self) -> Value {
        match self {
            TemplateValue::Null => Value::Null,
            TemplateValue::Bool(b) => Value::Bool(*b),
            TemplateValue::Number(n) => Value::Number(n.clone()),
            TemplateValue::String(s) => Value::String(s.clone()),
            TemplateValue::Placeholder(placeholder) => {
                let mut members = Map::new();
                members.insert(
                    POLY_ARG_NAME_KEY.to_string(),
                    Value::String(placeholder.name().to_string()),
                );
                members.insert(QUOTED_KEY.to_string(), Value::Bool(placeholder.is_quoted()));
                Value::Object(members)
            }
            TemplateValue::Object(members) => Value::Object(
                members
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_encoded()))
                    .collect(),
            ),
            TemplateValue::Array(items) => {
                Value::Array(items.iter().map(TemplateValue::to_encoded).collect())
            }
        }
    }
}

impl Serialize for Placeholder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(POLY_ARG_NAME_KEY, self.name())?;
        map.serialize_entry(QUOTED_KEY, &self.is_quoted())?;
        map.end()
    }
}

impl Serialize for TemplateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TemplateValue::Null => serializer.serialize_unit(),
            TemplateValue::Bool(b) => serializer.serialize_bool(*b),
            TemplateValue::Number(n) => n.serialize(serializer),
            TemplateValue::String(s) => serializer.serialize_str(s),
            TemplateValue::Placeholder(placeholder) => placeholder.serialize(serializer),
            TemplateValue::Object(members) => {
                let mut map = serializer.serialize_map(Some(members.len()))?;
                for (k, v) in members {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            TemplateValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for TemplateValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(TemplateValue::from_encoded)
    }
}
