//! Loosely typed entity attributes.
//!
//! The hub returns attributes as an arbitrary JSON object. Only strings and
//! numbers matter to the tools; everything else is treated as absent so that
//! callers fall back to their sentinel values instead of failing.

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(from = "serde_json::Value")]
pub enum AttrValue {
    #[default]
    Absent,
    Text(String),
    Number(f64),
}

impl From<serde_json::Value> for AttrValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => AttrValue::Text(s),
            serde_json::Value::Number(n) => n.as_f64().map_or(AttrValue::Absent, AttrValue::Number),
            _ => AttrValue::Absent,
        }
    }
}

impl AttrValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numbers pass through; text is parsed, so `"21.5"` reads as `21.5`.
    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            AttrValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            AttrValue::Absent => None,
        }
    }
}

static ABSENT: AttrValue = AttrValue::Absent;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct Attributes(HashMap<String, AttrValue>);

impl Attributes {
    pub fn get(&self, key: &str) -> &AttrValue {
        self.0.get(key).unwrap_or(&ABSENT)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).as_text()
    }

    pub fn decimal(&self, key: &str) -> Option<f64> {
        self.get(key).as_decimal()
    }
}

impl<K: Into<String>> FromIterator<(K, AttrValue)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, AttrValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
