//! The live model: every defined entity, its namespaces, and keyword application.
//!
//! Names live in one of two kinds of namespace. A bare name is bound in the
//! global namespace; `region/name` is bound in the namespace owned by the
//! region entity, which itself must be a globally named entity.

use std::collections::HashMap;

use simcfg_foundation::{EntityId, EntityRef, Error, ErrorKind, Result, TypeId};

use crate::entity::Entity;
use crate::registry::TypeRegistry;

/// All entities of a loaded model.
#[derive(Debug, Default)]
pub struct Model {
    registry: TypeRegistry,
    entities: Vec<Entity>,
    global: HashMap<String, EntityId>,
    regions: HashMap<EntityId, HashMap<String, EntityId>>,
    session_edited: bool,
    /// Entities below this index were present when loading finished.
    loaded: usize,
}

impl Model {
    /// Creates an empty model over a type registry.
    #[must_use]
    pub fn new(registry: TypeRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    /// Returns the type registry.
    #[must_use]
    pub const fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Returns a mutable reference to the type registry.
    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    /// Removes every entity, keeping the registered types.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.global.clear();
        self.regions.clear();
        self.session_edited = false;
        self.loaded = 0;
    }

    /// Returns the number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if no entities are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterates over entities in definition order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Returns an entity by handle.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        self.entities
            .get_mut(id.index())
            .ok_or_else(|| Error::new(ErrorKind::Internal(format!("stale handle {id:?}"))))
    }

    /// Returns the type name of an entity.
    #[must_use]
    pub fn type_name(&self, id: EntityId) -> &str {
        self.entity(id)
            .map_or("?", |e| self.registry.name(e.type_id()))
    }

    /// Looks up an entity by name token without reporting errors.
    #[must_use]
    pub fn lookup(&self, token: &str) -> Option<&Entity> {
        self.resolve(token).ok().and_then(|id| self.entity(id))
    }

    /// Resolves a name token (optionally `region/name`) to an entity.
    ///
    /// # Errors
    ///
    /// Returns a resolution failure if the region or the name is unknown.
    pub fn resolve(&self, token: &str) -> Result<EntityId> {
        self.resolve_ref(&EntityRef::parse(token))
    }

    /// Resolves a parsed reference to an entity.
    ///
    /// # Errors
    ///
    /// Returns a resolution failure if the region or the name is unknown.
    pub fn resolve_ref(&self, name: &EntityRef) -> Result<EntityId> {
        match &name.region {
            None => self
                .global
                .get(&name.name)
                .copied()
                .ok_or_else(|| Error::not_found("entity", name.name.clone())),
            Some(region) => {
                let region_id = self
                    .global
                    .get(region)
                    .copied()
                    .ok_or_else(|| Error::not_found("region", region.clone()))?;
                self.regions
                    .get(&region_id)
                    .and_then(|scope| scope.get(&name.name))
                    .copied()
                    .ok_or_else(|| Error::not_found("entity", name.to_string()))
            }
        }
    }

    /// Creates an entity of the given type and binds its name.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NameCollision`] if the name is already bound in
    /// its namespace (the existing binding is left untouched), or a
    /// resolution failure if the region does not exist.
    pub fn define(&mut self, type_id: TypeId, name: &EntityRef) -> Result<EntityId> {
        if self.registry.get(type_id).is_none() {
            return Err(Error::not_found("entity type", format!("{type_id:?}")));
        }

        let region_id = match &name.region {
            Some(region) => Some(
                self.global
                    .get(region)
                    .copied()
                    .ok_or_else(|| Error::not_found("region", region.clone()))?,
            ),
            None => None,
        };

        let existing = match region_id {
            Some(r) => self.regions.get(&r).and_then(|scope| scope.get(&name.name)),
            None => self.global.get(&name.name),
        };
        if let Some(&existing) = existing {
            return Err(Error::name_collision(name.to_string(), self.type_name(existing)));
        }

        #[allow(clippy::cast_possible_truncation)]
        let id = EntityId::new(self.entities.len() as u32);
        let inputs = self.registry.instantiate(type_id);
        self.entities
            .push(Entity::new(id, name.clone(), type_id, inputs));

        match region_id {
            Some(r) => {
                self.regions
                    .entry(r)
                    .or_default()
                    .insert(name.name.clone(), id);
            }
            None => {
                self.global.insert(name.name.clone(), id);
            }
        }
        Ok(id)
    }

    /// Applies one keyword command to an entity.
    ///
    /// Empty `args` restore the keyword's default. The value is always
    /// validated; it is stored only if it differs from the current value
    /// string, and only then, when `edit` is set, are the input, the entity,
    /// and the session flagged as edited. Returns whether the value changed.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::EntityLocked`], [`ErrorKind::KeywordUnknown`], or
    /// the value parser's [`ErrorKind::ValueValidation`] error annotated with
    /// an `entity.keyword` frame.
    pub fn apply_keyword(
        &mut self,
        id: EntityId,
        keyword: &str,
        args: &[String],
        edit: bool,
    ) -> Result<bool> {
        let entity = self
            .entity(id)
            .ok_or_else(|| Error::new(ErrorKind::Internal(format!("stale handle {id:?}"))))?;
        let name = entity.qualified_name();
        if entity.is_locked() {
            return Err(Error::locked(name));
        }
        let index = entity
            .input_index(keyword)
            .ok_or_else(|| Error::keyword_unknown(name.clone(), keyword))?;

        let exists = |n: &str| self.resolve(n).is_ok();
        let value = entity.inputs()[index]
            .next_value(args, &exists)
            .map_err(|e| e.with_frame(format!("{name}.{keyword}")))?;

        let entity = self.entity_mut(id)?;
        let changed = entity.input_at_mut(index).set_value(value, edit);
        if changed && edit {
            entity.set_edited();
            self.session_edited = true;
        }
        Ok(changed)
    }

    /// Flags an entity as created during this session.
    ///
    /// # Errors
    ///
    /// Returns an internal error for a handle from another model.
    pub fn mark_added(&mut self, id: EntityId) -> Result<()> {
        self.entity_mut(id)?.set_added();
        self.session_edited = true;
        Ok(())
    }

    /// Locks or unlocks an entity against keyword changes.
    ///
    /// # Errors
    ///
    /// Returns an internal error for a handle from another model.
    pub fn set_locked(&mut self, id: EntityId, locked: bool) -> Result<()> {
        self.entity_mut(id)?.set_locked(locked);
        Ok(())
    }

    /// Returns true once any entity was added or any input edited.
    #[must_use]
    pub const fn is_session_edited(&self) -> bool {
        self.session_edited
    }

    /// Clears the session-edited flag (after a save).
    pub fn clear_session_edited(&mut self) {
        self.session_edited = false;
    }

    /// Records the current state as the loaded baseline.
    ///
    /// Entities and values flagged as added or edited by the file itself
    /// (after an added-records marker) keep their flags, but are no longer
    /// pending: the file already holds them, so a delta that includes the
    /// file must not repeat them.
    pub fn mark_loaded(&mut self) {
        for entity in &mut self.entities {
            entity.clear_pending();
        }
        self.loaded = self.entities.len();
        self.session_edited = false;
    }

    /// Iterates over entities added since the model was last marked as loaded.
    pub fn pending_added(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().skip(self.loaded).filter(|e| e.is_added())
    }

    /// Iterates over entities with values edited since the model was last
    /// marked as loaded.
    pub fn pending_edited(&self) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(|e| e.pending_inputs().next().is_some())
    }
}
