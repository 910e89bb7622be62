//! Entity types, keyword inputs, and the live model for simcfg.
//!
//! This crate provides:
//! - [`TypeRegistry`] - Type name to keyword-declaration factories
//! - [`InputRecord`] / [`ValueKind`] - Per-keyword state and validation
//! - [`Entity`] - A defined instance with added/edited flags
//! - [`Model`] - Namespaces, name resolution, and keyword application

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod input;
pub mod model;
pub mod registry;

pub use entity::Entity;
pub use input::{InputRecord, InputSpec, ValueKind};
pub use model::Model;
pub use registry::{EntityType, TypeRegistry};
