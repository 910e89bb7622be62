//! Integration tests for Layer 2: Language
//!
//! Tests for the tokenizer, record assembly, command splitting, and
//! backward-compatibility rewriting.

mod records;
mod rewrite;
