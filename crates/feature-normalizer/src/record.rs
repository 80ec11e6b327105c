//! Feature Record

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// A single feature value: a number, or a text label for the pass-through
/// fields (subject, gender).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Num(f64),
    Text(String),
}

/// The fixed-schema feature payload sent to the prediction models.
///
/// Fields keep their schema order, so the record serializes as a JSON object
/// with the documented columns in documented order. Immutable once produced
/// by the normalizer; the model layer upserts the grade columns (G1, G2,
/// Gvg) on its own copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureRecord {
    fields: Vec<(String, FeatureValue)>,
}

impl FeatureRecord {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Append a numeric field
    pub fn push_num(&mut self, name: impl Into<String>, value: f64) {
        self.fields.push((name.into(), FeatureValue::Num(value)));
    }

    /// Append a text field
    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields
            .push((name.into(), FeatureValue::Text(value.into())));
    }

    /// Set a numeric field, appending it if not present
    pub fn insert_num(&mut self, name: &str, value: f64) {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = FeatureValue::Num(value),
            None => self.push_num(name, value),
        }
    }

    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Numeric value of a field, if present and numeric
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(FeatureValue::Num(v)) => Some(*v),
            _ => None,
        }
    }

    /// Text value of a field, if present and textual
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(FeatureValue::Text(t)) => Some(t),
            _ => None,
        }
    }

    /// Iterate fields in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
