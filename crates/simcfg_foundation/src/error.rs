//! Error types for the simcfg system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Every kind except [`ErrorKind::MissingRootFile`] is recoverable at record
//! granularity: the loader logs it, discards the record, and moves on.

use std::fmt;

use thiserror::Error;

/// Result alias used throughout simcfg.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for simcfg operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error, replacing any existing context.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Pushes a frame onto this error's context, creating one if needed.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(context.with_frame(frame));
        self
    }

    /// Sets the source location unless one is already recorded.
    #[must_use]
    pub fn at_source(mut self, source: impl Into<String>, line: usize) -> Self {
        let context = self.context.take().unwrap_or_default();
        self.context = Some(if context.source.is_some() {
            context
        } else {
            context.with_source(source).with_line(line)
        });
        self
    }

    /// Creates a malformed-input error (unbalanced or over-deep braces).
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenizeMalformed(message.into()))
    }

    /// Creates a malformed-directive error.
    #[must_use]
    pub fn directive(directive: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DirectiveMalformed {
            directive: directive.into(),
            message: message.into(),
        })
    }

    /// Creates a name collision error.
    #[must_use]
    pub fn name_collision(name: impl Into<String>, existing_type: impl Into<String>) -> Self {
        Self::new(ErrorKind::NameCollision {
            name: name.into(),
            existing_type: existing_type.into(),
        })
    }

    /// Creates a resolution failure error.
    #[must_use]
    pub fn not_found(what: &'static str, name: impl Into<String>) -> Self {
        Self::new(ErrorKind::ResolutionFailure {
            what,
            name: name.into(),
        })
    }

    /// Creates an unknown keyword error.
    #[must_use]
    pub fn keyword_unknown(entity: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self::new(ErrorKind::KeywordUnknown {
            entity: entity.into(),
            keyword: keyword.into(),
        })
    }

    /// Creates a locked entity error.
    #[must_use]
    pub fn locked(entity: impl Into<String>) -> Self {
        Self::new(ErrorKind::EntityLocked(entity.into()))
    }

    /// Creates a value validation error.
    #[must_use]
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValueValidation(message.into()))
    }

    /// Creates an I/O error.
    #[must_use]
    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io(message.into()))
    }

    /// Returns true if this error must abort the whole load.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self.kind, ErrorKind::MissingRootFile(_))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Unbalanced or over-deep braces, or a record that never closed.
    #[error("malformed input: {0}")]
    TokenizeMalformed(String),

    /// A `Define`, `Include` or `Default` record has the wrong shape.
    #[error("{directive}: {message}")]
    DirectiveMalformed {
        /// The directive keyword as written.
        directive: String,
        /// What was wrong with it.
        message: String,
    },

    /// A name was defined twice.
    #[error("name {name} already used and is a {existing_type}")]
    NameCollision {
        /// The name being defined.
        name: String,
        /// Type of the entity that already holds the name.
        existing_type: String,
    },

    /// An entity, region or type name could not be resolved.
    #[error("{what} not found: {name}")]
    ResolutionFailure {
        /// What kind of thing was being resolved.
        what: &'static str,
        /// The name that failed to resolve.
        name: String,
    },

    /// The entity has no input bound to the keyword.
    #[error("keyword {keyword} could not be found for {entity}")]
    KeywordUnknown {
        /// Entity name.
        entity: String,
        /// The unknown keyword.
        keyword: String,
    },

    /// The entity is marked immutable.
    #[error("entity {0} is locked and cannot be edited")]
    EntityLocked(String),

    /// The keyword's own value parser rejected the value.
    #[error("invalid value: {0}")]
    ValueValidation(String),

    /// Include nesting exceeded the configured limit.
    #[error("include depth limit ({limit}) exceeded at {path}")]
    IncludeDepthExceeded {
        /// The configured limit.
        limit: usize,
        /// The include that was refused.
        path: String,
    },

    /// The root configuration file does not exist.
    #[error("configuration file not found: {0}")]
    MissingRootFile(String),

    /// Reading or writing a file failed.
    #[error("i/o error: {0}")]
    Io(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source file.
    pub source: Option<String>,
    /// Line number in source (1-based, first line of the record).
    pub line: Option<usize>,
    /// `entity.keyword` frames, innermost first.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source file.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line number.
    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Adds a frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
            if let Some(line) = self.line {
                write!(f, ":{line}")?;
            }
        }
        for frame in &self.stack {
            write!(f, "\n  in {frame}")?;
        }
        Ok(())
    }
}
