//! Per-type `Default` records.
//!
//! `Default <Type> <keyword> { args }` stores `<Type> <keyword> { args }`
//! under the type name. Every later `Define` of that type replays the stored
//! records against the new entity, in the order they were registered.

use std::collections::HashMap;

/// Stored `Default` entries keyed by type name.
#[derive(Clone, Debug, Default)]
pub struct DefaultRegistry {
    entries: HashMap<String, Vec<Vec<String>>>,
}

impl DefaultRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores one entry (`<Type> <keyword> ...`) for a type.
    pub fn insert(&mut self, type_name: impl Into<String>, entry: Vec<String>) {
        self.entries.entry(type_name.into()).or_default().push(entry);
    }

    /// Returns the entries for a type, oldest first.
    #[must_use]
    pub fn get(&self, type_name: &str) -> &[Vec<String>] {
        self.entries.get(type_name).map_or(&[], Vec::as_slice)
    }

    /// Returns the entries for a type with the type token replaced by an
    /// entity name, ready for keyword dispatch.
    #[must_use]
    pub fn records_for(&self, type_name: &str, entity_name: &str) -> Vec<Vec<String>> {
        self.get(type_name)
            .iter()
            .map(|entry| {
                let mut tokens = entry.clone();
                if let Some(first) = tokens.first_mut() {
                    *first = entity_name.to_string();
                }
                tokens
            })
            .collect()
    }

    /// Returns the number of types with defaults.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no defaults are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
