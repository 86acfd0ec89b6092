use serde::Deserialize;
use strum::{AsRefStr, Display};

use crate::attribute::Attributes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum EntityDomain {
    Light,
    Climate,
}

impl EntityDomain {
    /// The `"<domain>."` prefix every entity id of this domain starts with.
    pub fn prefix(&self) -> String {
        format!("{}.", self)
    }

    pub fn matches(&self, entity_id: &str) -> bool {
        entity_id.starts_with(&self.prefix())
    }
}

/// Keeps the ids belonging to `domain`, in the order the hub returned them.
pub fn filter_by_domain(ids: &[String], domain: EntityDomain) -> Vec<String> {
    ids.iter().filter(|id| domain.matches(id)).cloned().collect()
}

/// Current state of a single entity as returned by `/api/states/<id>`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EntityState {
    pub entity_id: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub attributes: Attributes,
}

impl EntityState {
    /// `friendly_name` when it is usable text, otherwise derived from the id.
    pub fn display_name(&self) -> String {
        self.attributes
            .text("friendly_name")
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| fallback_name(&self.entity_id))
    }
}

/// `light.kitchen_lamp` becomes `Kitchen Lamp`.
pub fn fallback_name(entity_id: &str) -> String {
    let object_id = entity_id
        .split_once('.')
        .map_or(entity_id, |(_, rest)| rest);
    title_case(&object_id.replace('_', " "))
}

/// Uppercases the first letter of every alphabetic run and lowercases the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}
