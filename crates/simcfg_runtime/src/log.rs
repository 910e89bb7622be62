//! The load's error/warning sink.
//!
//! Every logged error or warning increments a counter, is written to the
//! trace (a `.log` file beside the root configuration or an in-memory
//! buffer), and is mirrored to `tracing`.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use simcfg_foundation::{Error, Result};

enum Trace {
    File { path: PathBuf, writer: BufWriter<File> },
    Memory(String),
}

/// Counts and records errors and warnings for one load.
pub struct LogSink {
    trace: Trace,
    errors: usize,
    warnings: usize,
    first_error: Option<String>,
}

impl LogSink {
    /// Creates a sink that keeps the trace in memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            trace: Trace::Memory(String::new()),
            errors: 0,
            warnings: 0,
            first_error: None,
        }
    }

    /// Creates a sink that writes the trace to a file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created.
    pub fn to_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::create(&path).map_err(|e| {
            Error::io(format!("failed to create log file '{}': {e}", path.display()))
        })?;
        Ok(Self {
            trace: Trace::File {
                path,
                writer: BufWriter::new(file),
            },
            errors: 0,
            warnings: 0,
            first_error: None,
        })
    }

    /// Returns the trace file path, if writing to a file.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match &self.trace {
            Trace::File { path, .. } => Some(path),
            Trace::Memory(_) => None,
        }
    }

    /// Returns the in-memory trace, if not writing to a file.
    #[must_use]
    pub fn contents(&self) -> Option<&str> {
        match &self.trace {
            Trace::Memory(text) => Some(text),
            Trace::File { .. } => None,
        }
    }

    /// Writes a plain line to the trace.
    pub fn line(&mut self, text: &str) {
        match &mut self.trace {
            Trace::Memory(buffer) => {
                buffer.push_str(text);
                buffer.push('\n');
            }
            Trace::File { writer, .. } => {
                // A failing trace write must not abort the load.
                let _ = writeln!(writer, "{text}");
            }
        }
    }

    /// Records an error.
    pub fn error(&mut self, err: &Error) {
        self.errors += 1;
        let context = err.context.as_ref().map(ToString::to_string).unwrap_or_default();
        tracing::error!(%context, "{err}");
        if self.first_error.is_none() {
            self.first_error = Some(if context.is_empty() {
                err.to_string()
            } else {
                format!("{err} {context}")
            });
        }
        self.block("ERROR", &err.to_string(), &context);
    }

    /// Records a warning.
    pub fn warning(&mut self, message: &str, context: &str) {
        self.warnings += 1;
        tracing::warn!(%context, "{message}");
        self.block("WARNING", message, context);
    }

    fn block(&mut self, label: &str, message: &str, context: &str) {
        self.line(&format!("*** {label} *** {message}"));
        if !context.is_empty() {
            self.line(context);
        }
    }

    /// Returns the number of errors logged.
    #[must_use]
    pub const fn errors(&self) -> usize {
        self.errors
    }

    /// Returns the first error logged, with its location.
    #[must_use]
    pub fn first_error(&self) -> Option<&str> {
        self.first_error.as_deref()
    }

    /// Returns the number of warnings logged.
    #[must_use]
    pub const fn warnings(&self) -> usize {
        self.warnings
    }

    /// Returns true if nothing was logged as an error or warning.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.errors == 0 && self.warnings == 0
    }

    /// Flushes the trace.
    pub fn flush(&mut self) {
        if let Trace::File { writer, .. } = &mut self.trace {
            let _ = writer.flush();
        }
    }

    /// Closes the sink, deleting the trace file if the load was clean.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the clean trace file cannot be removed.
    pub fn close(mut self) -> Result<()> {
        self.flush();
        let clean = self.is_clean();
        if let Trace::File { path, writer } = self.trace {
            drop(writer);
            if clean {
                fs::remove_file(&path).map_err(|e| {
                    Error::io(format!("failed to remove log file '{}': {e}", path.display()))
                })?;
            }
        }
        Ok(())
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::in_memory()
    }
}
