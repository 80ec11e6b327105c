//! Raw Form Input

use serde::Deserialize;
use std::collections::HashMap;

/// A single raw value as it arrives from a form or JSON body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<bool> for RawValue {
    fn from(v: bool) -> Self {
        RawValue::Bool(v)
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self {
        RawValue::Number(v)
    }
}

impl From<&str> for RawValue {
    fn from(v: &str) -> Self {
        RawValue::Text(v.to_string())
    }
}

/// Unvalidated form submission: field name to optional raw value.
///
/// Any field may be legitimately absent; the normalizer supplies per-field
/// defaults. Deserializes directly from a JSON object.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RawInput {
    fields: HashMap<String, RawValue>,
}

impl RawInput {
    /// Create an empty input (all fields absent)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<RawValue>) -> &mut Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Look up a raw value by field name
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields.get(key)
    }

    /// Number of fields present
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields are present
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Numeric interpretation of a field.
    ///
    /// Absent fields take `default`. Booleans count as 1/0. A string that
    /// does not parse as a finite number is treated as absent.
    pub fn number(&self, key: &str, default: f64) -> f64 {
        match self.fields.get(key) {
            None => default,
            Some(RawValue::Number(n)) if n.is_finite() => *n,
            Some(RawValue::Number(_)) => default,
            Some(RawValue::Bool(b)) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Some(RawValue::Text(t)) => t
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .unwrap_or(default),
        }
    }

    /// Boolean-ish interpretation: 1 iff the value is the string "yes",
    /// the string "1", or the boolean true; otherwise 0 (including absent).
    pub fn binary(&self, key: &str) -> f64 {
        match self.fields.get(key) {
            Some(RawValue::Bool(true)) => 1.0,
            Some(RawValue::Text(t)) if t == "yes" || t == "1" => 1.0,
            _ => 0.0,
        }
    }

    /// Text interpretation of a field; non-text or absent values take
    /// `default`.
    pub fn text<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.fields.get(key) {
            Some(RawValue::Text(t)) => t,
            _ => default,
        }
    }

    /// Whether the field holds exactly the given categorical label
    pub fn matches(&self, key: &str, label: &str) -> bool {
        matches!(self.fields.get(key), Some(RawValue::Text(t)) if t == label)
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
