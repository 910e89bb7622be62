//! Integration tests for Layer 1: Storage
//!
//! Tests for the type registry, keyword inputs, namespaces, and edit flags.

mod inputs;
mod model;
