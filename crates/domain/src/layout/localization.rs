//! Localized display names for buildings and floors
//!
//! The layout itself is immutable after parsing; this side-table is the
//! one piece that may be swapped out when the host changes language.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Localized strings for one building or floor id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalizedNames {
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub description: Option<String>,
}

/// Side-table of id to localized names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizationTable(HashMap<String, LocalizedNames>);

impl LocalizationTable {
    pub fn new(entries: HashMap<String, LocalizedNames>) -> Self {
        Self(entries)
    }

    /// Localized name for an id, falling back to the id itself.
    pub fn name_for<'a>(&'a self, id: &'a str) -> &'a str {
        self.0
            .get(id)
            .and_then(|names| names.name.as_deref())
            .unwrap_or(id)
    }

    pub fn short_name_for(&self, id: &str) -> Option<&str> {
        self.0.get(id).and_then(|names| names.short_name.as_deref())
    }
}
