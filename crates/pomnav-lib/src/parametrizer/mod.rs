//! `$name` templating for JSON snippets kept in variables files.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::errors::Result;

/// Substitutes `$name` / `${name}` placeholders from a fixed mapping.
///
/// Unknown names and malformed placeholders stay as written and `$$` is an
/// escaped `$`. String values are inserted bare, other values as JSON text.
#[derive(Debug, Clone, Default)]
pub struct Parametrizer {
    mapping: BTreeMap<String, Value>,
}

impl Parametrizer {
    pub fn new(mapping: BTreeMap<String, Value>) -> Self {
        Self { mapping }
    }

    pub fn mapping(&self) -> &BTreeMap<String, Value> {
        &self.mapping
    }

    pub fn parametrize(&self, template: &str) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(pos) = rest.find('$') {
            out.push_str(&rest[..pos]);
            let after = &rest[pos + 1..];

            if let Some(tail) = after.strip_prefix('$') {
                out.push('$');
                rest = tail;
                continue;
            }

            let (name, consumed) = match after.strip_prefix('{') {
                Some(braced) => match braced.find('}') {
                    Some(end) if is_identifier(&braced[..end]) => (&braced[..end], end + 2),
                    _ => ("", 0),
                },
                None => {
                    let len = identifier_len(after);
                    (&after[..len], len)
                }
            };

            match self.mapping.get(name).filter(|_| !name.is_empty()) {
                Some(value) => {
                    out.push_str(&render_value(value));
                    rest = &after[consumed..];
                }
                None => {
                    out.push('$');
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }

    /// Parametrize `template` and parse the result as JSON.
    pub fn json_loads(&self, template: &str) -> Result<Value> {
        Ok(serde_json::from_str(&self.parametrize(template))?)
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn identifier_len(s: &str) -> usize {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return 0,
    }
    chars
        .find(|(_, c)| !(*c == '_' || c.is_ascii_alphanumeric()))
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && identifier_len(s) == s.len()
}
