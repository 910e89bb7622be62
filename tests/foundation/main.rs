//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: EntityRef, Error, and literal quoting.

mod names;
