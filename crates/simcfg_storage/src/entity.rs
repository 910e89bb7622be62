//! Entities: a named instance of a registered type plus its keyword inputs.

use simcfg_foundation::{EntityId, EntityRef, TypeId};

use crate::input::InputRecord;

/// A defined entity and the live state of its keywords.
///
/// Edit tracking happens at two levels: each [`InputRecord`] carries its own
/// `edited` flag, and the entity carries `edited` (some input was edited) and
/// `added` (created during this session rather than loaded from the file).
#[derive(Clone, Debug)]
pub struct Entity {
    id: EntityId,
    name: EntityRef,
    type_id: TypeId,
    inputs: Vec<InputRecord>,
    locked: bool,
    added: bool,
    edited: bool,
}

impl Entity {
    pub(crate) fn new(id: EntityId, name: EntityRef, type_id: TypeId, inputs: Vec<InputRecord>) -> Self {
        Self {
            id,
            name,
            type_id,
            inputs,
            locked: false,
            added: false,
            edited: false,
        }
    }

    /// Returns the entity's handle.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the name as defined, including any region.
    #[must_use]
    pub const fn name(&self) -> &EntityRef {
        &self.name
    }

    /// Returns the `region/name` form used in records.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        self.name.to_string()
    }

    /// Returns the entity's type.
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns all inputs in declaration order.
    #[must_use]
    pub fn inputs(&self) -> &[InputRecord] {
        &self.inputs
    }

    /// Looks up the input bound to a keyword.
    #[must_use]
    pub fn input(&self, keyword: &str) -> Option<&InputRecord> {
        self.inputs.iter().find(|i| i.keyword() == keyword)
    }

    pub(crate) fn input_index(&self, keyword: &str) -> Option<usize> {
        self.inputs.iter().position(|i| i.keyword() == keyword)
    }

    pub(crate) fn input_at_mut(&mut self, index: usize) -> &mut InputRecord {
        &mut self.inputs[index]
    }

    /// Returns the inputs that were edited this session.
    pub fn edited_inputs(&self) -> impl Iterator<Item = &InputRecord> {
        self.inputs.iter().filter(|i| i.is_edited())
    }

    /// Returns the inputs edited since the model was last marked as loaded.
    pub fn pending_inputs(&self) -> impl Iterator<Item = &InputRecord> {
        self.inputs.iter().filter(|i| i.is_pending())
    }

    pub(crate) fn clear_pending(&mut self) {
        for input in &mut self.inputs {
            input.clear_pending();
        }
    }

    /// Returns true if the entity rejects keyword changes.
    #[must_use]
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Returns true if the entity was created during this session.
    #[must_use]
    pub const fn is_added(&self) -> bool {
        self.added
    }

    /// Returns true if any input was edited this session.
    #[must_use]
    pub const fn is_edited(&self) -> bool {
        self.edited
    }

    pub(crate) fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub(crate) fn set_added(&mut self) {
        self.added = true;
    }

    pub(crate) fn set_edited(&mut self) {
        self.edited = true;
    }
}
