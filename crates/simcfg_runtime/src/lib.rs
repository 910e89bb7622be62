//! Loader, live edits, delta save, and interactive shell for simcfg.
//!
//! This crate provides:
//! - [`ModelLoader`] - The directive dispatcher and include pipeline
//! - [`LogSink`] - Error/warning counting and the `.log` trace file
//! - [`save`] - Delta save and the `.inp` input report
//! - [`Shell`] - Interactive editing on top of a loaded model
//! - The `simcfg` command-line binary

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod catalog;
pub mod config;
pub mod defaults;
pub mod editor;
pub mod loader;
pub mod log;
pub mod save;
pub mod session;
pub mod shell;
pub mod source;

pub use catalog::standard_types;
pub use config::{ADDED_RECORDS_MARKER, LoadConfig};
pub use defaults::DefaultRegistry;
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use loader::{LoadSummary, ModelLoader};
pub use log::LogSink;
pub use session::{LoadContext, Mode, SessionState};
pub use shell::{Reply, Shell};
pub use source::{FileSystem, Location, MemoryArchive, SourceProvider};
