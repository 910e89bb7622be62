//! Tokenizer, record assembly, and record rewriting for the simcfg language.
//!
//! # Pipeline
//!
//! ```text
//! physical line ──► Tokenizer ──► RecordAssembler ──► compat::rewrite ──► RecordKind
//!                                   (brace depth)      (legacy shapes)        │
//!                                                                             ▼
//!                                             Define / Default / Include / Stop / Keyword
//!                                                                             │
//!                                                                  split_record (keywords)
//! ```
//!
//! # Modules
//!
//! - [`tokenizer`] - Line to tokens, literals and comments
//! - [`record`] - Brace-balanced record assembly
//! - [`compat`] - Backward-compatibility rewrite rules
//! - [`directive`] - Directive classification and shape checks
//! - [`command`] - Keyword record to `(entity, keyword, args)` commands

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod command;
pub mod compat;
pub mod directive;
pub mod record;
pub mod tokenizer;

pub use command::{KeywordCommand, split_commands, split_record};
pub use directive::{DefaultDirective, DefineDirective, IncludeDirective, RecordKind};
pub use record::{DEFAULT_MAX_BRACE_DEPTH, Record, RecordAssembler};
pub use tokenizer::Tokenizer;
