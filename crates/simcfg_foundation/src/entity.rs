//! Entity and type handles, and parsed entity references.

use std::fmt;

/// Handle to an entity in the live model.
///
/// Entities are never destroyed mid-session, so a plain index is enough.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity ID from a storage index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the storage index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Handle to a registered entity type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
pub struct TypeId(u32);

impl TypeId {
    /// Creates a new type ID from a registry index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the registry index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A name token split into an optional region and a bare name.
///
/// `Line1/Conveyor` names `Conveyor` inside the region `Line1`; a token
/// without `/` names an entity in the global namespace. Only the first `/`
/// separates, so the bare name may itself contain further slashes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntityRef {
    /// Region qualifier, if any.
    pub region: Option<String>,
    /// The bare name.
    pub name: String,
}

impl EntityRef {
    /// Creates a reference in the global namespace.
    #[must_use]
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            region: None,
            name: name.into(),
        }
    }

    /// Creates a reference inside a region.
    #[must_use]
    pub fn in_region(region: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            region: Some(region.into()),
            name: name.into(),
        }
    }

    /// Parses a name token.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        match token.split_once('/') {
            Some((region, name)) => Self::in_region(region, name),
            None => Self::global(token),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{region}/{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}
