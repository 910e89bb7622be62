//! Entity type registry.
//!
//! Maps type names (as written after `Define`) to factories that produce the
//! type's declared keywords. Populated once at startup, looked up by string
//! when a `Define` record is processed.

use std::collections::HashMap;
use std::fmt;

use simcfg_foundation::TypeId;

use crate::input::{InputRecord, InputSpec};

/// Produces the keyword declarations for a fresh instance of a type.
pub type InputFactory = Box<dyn Fn() -> Vec<InputSpec>>;

/// A registered entity type.
pub struct EntityType {
    name: String,
    factory: InputFactory,
}

impl EntityType {
    /// Returns the type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the keyword declarations for a new instance.
    #[must_use]
    pub fn input_specs(&self) -> Vec<InputSpec> {
        (self.factory)()
    }
}

impl fmt::Debug for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityType")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Registry of entity types and deprecated type-name aliases.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: Vec<EntityType>,
    by_name: HashMap<String, TypeId>,
    aliases: HashMap<String, String>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type, or replaces the factory of an existing one.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> TypeId
    where
        F: Fn() -> Vec<InputSpec> + 'static,
    {
        let name = name.into();
        if let Some(&id) = self.by_name.get(&name) {
            self.types[id.index()].factory = Box::new(factory);
            return id;
        }

        #[allow(clippy::cast_possible_truncation)]
        let id = TypeId::new(self.types.len() as u32);
        self.by_name.insert(name.clone(), id);
        self.types.push(EntityType {
            name,
            factory: Box::new(factory),
        });
        id
    }

    /// Records that `old` is a deprecated spelling of `current`.
    pub fn register_alias(&mut self, old: impl Into<String>, current: impl Into<String>) {
        self.aliases.insert(old.into(), current.into());
    }

    /// Returns the deprecated-name table.
    #[must_use]
    pub fn aliases(&self) -> &HashMap<String, String> {
        &self.aliases
    }

    /// Resolves a type name, following a deprecated alias if needed.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied().or_else(|| {
            self.aliases
                .get(name)
                .and_then(|current| self.by_name.get(current).copied())
        })
    }

    /// Returns a registered type.
    #[must_use]
    pub fn get(&self, id: TypeId) -> Option<&EntityType> {
        self.types.get(id.index())
    }

    /// Returns a type's name, or `"?"` for an unknown handle.
    #[must_use]
    pub fn name(&self, id: TypeId) -> &str {
        self.get(id).map_or("?", EntityType::name)
    }

    /// Builds the input records for a new instance of a type.
    #[must_use]
    pub fn instantiate(&self, id: TypeId) -> Vec<InputRecord> {
        self.get(id)
            .map(|t| t.input_specs().into_iter().map(InputRecord::new).collect())
            .unwrap_or_default()
    }

    /// Iterates over types in registration order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &EntityType)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, t)| (TypeId::new(i as u32), t))
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
