//! Core identifiers and error types for simcfg.
//!
//! This crate provides:
//! - [`EntityId`] / [`TypeId`] - Handles into the live model
//! - [`EntityRef`] - A parsed `region/name` reference
//! - [`literal`] - Helpers for `'…'` literal tokens
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod entity;
pub mod error;
pub mod literal;

pub use entity::{EntityId, EntityRef, TypeId};
pub use error::{Error, ErrorContext, ErrorKind, Result};
