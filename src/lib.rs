//! simcfg - Loader for a line-oriented model-definition language
//!
//! This crate re-exports all layers of the simcfg system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: simcfg_runtime     — Loader, live edits, delta save, shell, CLI
//! Layer 2: simcfg_language    — Tokenizer, record assembly, legacy rewrites
//! Layer 1: simcfg_storage     — Entity types, keyword inputs, model
//! Layer 0: simcfg_foundation  — Core types (EntityId, EntityRef, Error)
//! ```

pub use simcfg_foundation as foundation;
pub use simcfg_language as language;
pub use simcfg_runtime as runtime;
pub use simcfg_storage as storage;
