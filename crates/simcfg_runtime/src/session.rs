//! Per-load session state and the context threaded through file inclusion.

use crate::defaults::DefaultRegistry;
use crate::log::LogSink;
use crate::source::Location;

/// Whether records are plain file content or session edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    /// Records describe the originally loaded model.
    #[default]
    Normal,
    /// Records are treated as live edits (after the added-records marker,
    /// or when typed interactively).
    AddedRecords,
}

impl Mode {
    /// Returns true in added-records mode.
    #[must_use]
    pub const fn is_added(self) -> bool {
        matches!(self, Self::AddedRecords)
    }
}

/// Where and how the current file is being read.
#[derive(Clone, Debug)]
pub struct LoadContext {
    /// The file being read; includes resolve against its directory.
    pub location: Location,
    /// Number of `Include`s between the root file and this one.
    pub include_depth: usize,
    /// Current mode.
    pub mode: Mode,
}

impl LoadContext {
    /// Context for a root file.
    #[must_use]
    pub fn root(location: Location) -> Self {
        Self {
            location,
            include_depth: 0,
            mode: Mode::Normal,
        }
    }

    /// Context for a file included from this one. The mode carries over.
    #[must_use]
    pub fn include(&self, location: Location) -> Self {
        Self {
            location,
            include_depth: self.include_depth + 1,
            mode: self.mode,
        }
    }
}

/// State shared by every record of one load.
pub struct SessionState {
    /// Error and warning sink.
    pub log: LogSink,
    /// Registered `Default` records.
    pub defaults: DefaultRegistry,
    /// False once the first `Define` has been processed.
    pub defaults_settable: bool,
    /// True once the added-records marker has been read.
    pub added_records_seen: bool,
}

impl SessionState {
    /// Creates the state for a fresh load.
    #[must_use]
    pub fn new(log: LogSink) -> Self {
        Self {
            log,
            defaults: DefaultRegistry::new(),
            defaults_settable: true,
            added_records_seen: false,
        }
    }

    /// Resets every field for a new load.
    pub fn clear(&mut self, log: LogSink) {
        *self = Self::new(log);
    }

    /// Returns the number of errors logged.
    #[must_use]
    pub const fn errors(&self) -> usize {
        self.log.errors()
    }

    /// Returns the number of warnings logged.
    #[must_use]
    pub const fn warnings(&self) -> usize {
        self.log.warnings()
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(LogSink::in_memory())
    }
}
