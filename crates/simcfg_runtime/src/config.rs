//! Configuration for loading a model.

use simcfg_language::DEFAULT_MAX_BRACE_DEPTH;

/// The comment line that switches a load into added-records mode.
pub const ADDED_RECORDS_MARKER: &str = "\" *** Added Records ***";

/// Configuration for a load.
#[derive(Clone, Debug)]
pub struct LoadConfig {
    /// Maximum brace nesting inside one record.
    pub max_brace_depth: usize,

    /// Maximum `Include` nesting below the root file.
    pub max_include_depth: usize,

    /// Whether to write a `.log` trace file beside the root file.
    pub write_log_file: bool,

    /// The exact line that turns on added-records mode.
    pub added_records_marker: String,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            max_brace_depth: DEFAULT_MAX_BRACE_DEPTH,
            max_include_depth: 32,
            write_log_file: true,
            added_records_marker: ADDED_RECORDS_MARKER.to_string(),
        }
    }
}

impl LoadConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for loads that keep the trace in memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            write_log_file: false,
            ..Self::default()
        }
    }

    /// Builder method to set the maximum brace depth.
    #[must_use]
    pub fn with_max_brace_depth(mut self, depth: usize) -> Self {
        self.max_brace_depth = depth;
        self
    }

    /// Builder method to set the maximum include depth.
    #[must_use]
    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }

    /// Builder method to enable/disable the `.log` file.
    #[must_use]
    pub fn with_log_file(mut self, enabled: bool) -> Self {
        self.write_log_file = enabled;
        self
    }

    /// Builder method to change the added-records marker line.
    #[must_use]
    pub fn with_added_records_marker(mut self, marker: impl Into<String>) -> Self {
        self.added_records_marker = marker.into();
        self
    }

    /// Returns true if `line` is the added-records marker.
    #[must_use]
    pub fn is_added_records_marker(&self, line: &str) -> bool {
        line.trim().eq_ignore_ascii_case(self.added_records_marker.trim())
    }
}
