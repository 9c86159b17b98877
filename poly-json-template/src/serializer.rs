//! Template tree → template text.

use core::fmt::Write;

use crate::parser::whole_placeholder_name;
use crate::scanner::{CLOSE, OPEN};
use crate::value::TemplateValue;

/// Options for writing template text.
#[derive(Debug, Clone)]
pub struct SerializeOptions {
    /// Whether to pretty-print with indentation (default: false)
    pub pretty: bool,

    /// Indentation string for pretty-printing (default: four spaces)
    pub indent: &'static str,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: "    ",
        }
    }
}

impl SerializeOptions {
    /// Create new default options (compact output).
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable pretty-printing with default indentation.
    pub const fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Set a custom indentation string (implies pretty-printing).
    pub const fn indent(mut self, indent: &'static str) -> Self {
        self.indent = indent;
        self.pretty = true;
        self
    }
}

/// Writes template text.
struct TemplateWriter<'o> {
    out: String,
    depth: usize,
    options: &'o SerializeOptions,
}

/// Render a tree as template text.
pub(crate) fn to_template_string(tree: &TemplateValue, options: &SerializeOptions) -> String {
    let mut writer = TemplateWriter {
        out: String::new(),
        depth: 0,
        options,
    };
    writer.write_value(tree);
    writer.out
}

impl TemplateWriter<'_> {
    /// Write a newline and indentation if in pretty mode.
    fn write_indent(&mut self) {
        if self.options.pretty {
            self.out.push('\n');
            for _ in 0..self.depth {
                self.out.push_str(self.options.indent);
            }
        }
    }

    fn write_value(&mut self, value: &TemplateValue) {
        match value {
            TemplateValue::Null => self.out.push_str("null"),
            TemplateValue::Bool(true) => self.out.push_str("true"),
            TemplateValue::Bool(false) => self.out.push_str("false"),
            TemplateValue::Number(n) => {
                let _ = write!(self.out, "{n}");
            }
            // a literal `{{name}}` keeps its first brace escaped
            TemplateValue::String(s) if whole_placeholder_name(s).is_some() => {
                self.out.push_str("\"\\u007b");
                for c in s[1..].chars() {
                    self.write_json_escaped_char(c);
                }
                self.out.push('"');
            }
            TemplateValue::String(s) => self.write_json_string(s),
            TemplateValue::Placeholder(placeholder) => {
                let text = format!("{OPEN}{}{CLOSE}", placeholder.name());
                if placeholder.is_quoted() {
                    self.write_json_string(&text);
                } else {
                    self.out.push_str(&text);
                }
            }
            TemplateValue::Object(members) => {
                if members.is_empty() {
                    self.out.push_str("{}");
                    return;
                }
                self.out.push('{');
                self.depth += 1;
                for (i, (key, member)) in members.iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.write_indent();
                    self.write_json_string(key);
                    self.out.push(':');
                    if self.options.pretty {
                        self.out.push(' ');
                    }
                    self.write_value(member);
                }
                self.depth -= 1;
                self.write_indent();
                self.out.push('}');
            }
            TemplateValue::Array(items) => {
                if items.is_empty() {
                    self.out.push_str("[]");
                    return;
                }
                self.out.push('[');
                self.depth += 1;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.out.push(',');
                    }
                    self.write_indent();
                    self.write_value(item);
                }
                self.depth -= 1;
                self.write_indent();
                self.out.push(']');
            }
        }
    }

    fn write_json_string(&mut self, s: &str) {
        self.out.push('"');
        for c in s.chars() {
            self.write_json_escaped_char(c);
        }
        self.out.push('"');
    }

    #[inline]
    fn write_json_escaped_char(&mut self, c: char) {
        match c {
            '"' => self.out.push_str("\\\""),
            '\\' => self.out.push_str("\\\\"),
            '\n' => self.out.push_str("\\n"),
            '\r' => self.out.push_str("\\r"),
            '\t' => self.out.push_str("\\t"),
            '\u{08}' => self.out.push_str("\\b"),
            '\u{0C}' => self.out.push_str("\\f"),
            c if c.is_ascii_control() => {
                let _ = write!(self.out, "\\u{:04x}", c as u32);
            }
            c => self.out.push(c),
        }
    }
}
