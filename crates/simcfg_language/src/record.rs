//! Record assembly.
//!
//! A record is one brace-balanced unit of input, possibly spanning several
//! physical lines. The assembler feeds each line to the tokenizer and tracks
//! brace depth until it returns to zero.

use std::fmt;

use simcfg_foundation::{Error, ErrorContext, Result};

use crate::tokenizer::{Tokenizer, remove_comments};

/// Default maximum brace nesting.
pub const DEFAULT_MAX_BRACE_DEPTH: usize = 2;

/// One complete, comment-free record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// The record's tokens.
    pub tokens: Vec<String>,
    /// Line on which the record started (1-based).
    pub line: usize,
}

impl Record {
    /// Creates a record from tokens.
    #[must_use]
    pub fn new(tokens: Vec<String>, line: usize) -> Self {
        Self { tokens, line }
    }

    /// Builds a record from a single line, as the assembler would.
    ///
    /// Returns `Ok(None)` for a blank or comment-only line.
    ///
    /// # Errors
    ///
    /// Returns a malformed-input error if the line is not brace-balanced.
    pub fn from_line(line: &str, max_depth: usize) -> Result<Option<Self>> {
        let mut assembler = RecordAssembler::new(max_depth);
        match assembler.push_line(line, 1)? {
            Some(record) => Ok(Some(record)),
            None => {
                assembler.finish()?;
                Ok(None)
            }
        }
    }

    /// Returns the first token.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    /// Returns the number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if the record has no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

/// Accumulates tokens across lines until braces balance.
#[derive(Debug)]
pub struct RecordAssembler {
    tokens: Vec<String>,
    depth: usize,
    max_depth: usize,
    start_line: usize,
}

impl RecordAssembler {
    /// Creates an assembler with the given maximum brace depth.
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            tokens: Vec::new(),
            depth: 0,
            max_depth,
            start_line: 0,
        }
    }

    /// Returns true if no record is in progress.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.tokens.is_empty() && self.depth == 0
    }

    /// Returns the current brace depth.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Feeds one physical line.
    ///
    /// Returns the completed record once depth is back to zero, or `None`
    /// while a record is still open (or the line held only comments).
    ///
    /// # Errors
    ///
    /// Returns a malformed-input error if depth goes negative or exceeds the
    /// maximum. The in-progress record is discarded and depth reset, so the
    /// caller can log the error and keep reading.
    pub fn push_line(&mut self, line: &str, line_no: usize) -> Result<Option<Record>> {
        let before = self.tokens.len();
        if before == 0 {
            self.start_line = line_no;
        }
        Tokenizer::tokenize_into(line, &mut self.tokens);

        let mut depth = self.depth;
        let mut failure = None;
        for token in &self.tokens[before..] {
            match token.as_str() {
                "{" => {
                    depth += 1;
                    if depth > self.max_depth {
                        failure = Some(format!("maximum brace depth ({}) exceeded", self.max_depth));
                        break;
                    }
                }
                "}" => {
                    if depth == 0 {
                        failure = Some("extra closing braces found".to_string());
                        break;
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
        if let Some(message) = failure {
            return Err(self.discard(message));
        }
        self.depth = depth;

        if depth > 0 {
            return Ok(None);
        }

        let mut tokens = std::mem::take(&mut self.tokens);
        remove_comments(&mut tokens);
        if tokens.is_empty() {
            return Ok(None);
        }
        Ok(Some(Record::new(tokens, self.start_line)))
    }

    /// Signals end of input.
    ///
    /// # Errors
    ///
    /// Returns a malformed-input error if a record was left open.
    pub fn finish(&mut self) -> Result<()> {
        if self.depth == 0 {
            self.tokens.clear();
            return Ok(());
        }
        let mut leftover = std::mem::take(&mut self.tokens);
        remove_comments(&mut leftover);
        let message = format!("leftover input at end of file: {}", leftover.join(" "));
        Err(self.discard(message))
    }

    fn discard(&mut self, message: String) -> Error {
        self.tokens.clear();
        self.depth = 0;
        Error::malformed(message).with_context(ErrorContext::new().with_line(self.start_line))
    }
}
