//! Directive classification and shape checking.
//!
//! The first token of a record (case-insensitive) decides how it is handled:
//!
//! ```text
//! Define  <Type> { <name> ... }
//! Default <Type> <keyword> { <args> } ...
//! Include <path>
//! Stop
//! <EntityName> <keyword> { <args> } ...      (anything else)
//! ```

use simcfg_foundation::literal::unquote;
use simcfg_foundation::{EntityRef, Error, Result};

use crate::record::Record;

/// How a record is dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    /// `Define <Type> { names }`.
    Define,
    /// `Default <Type> <keyword> { args }`.
    Default,
    /// `Include <path>`.
    Include,
    /// `Stop`, explicitly ignored.
    Stop,
    /// Everything else.
    Keyword,
}

impl RecordKind {
    /// Classifies a record by its first token.
    #[must_use]
    pub fn classify(first: &str) -> Self {
        if first.eq_ignore_ascii_case("define") {
            Self::Define
        } else if first.eq_ignore_ascii_case("default") {
            Self::Default
        } else if first.eq_ignore_ascii_case("include") {
            Self::Include
        } else if first.eq_ignore_ascii_case("stop") {
            Self::Stop
        } else {
            Self::Keyword
        }
    }

    /// Classifies a whole record.
    #[must_use]
    pub fn of(record: &Record) -> Self {
        record.first().map_or(Self::Stop, Self::classify)
    }

    /// Returns true for the reserved leading tokens.
    #[must_use]
    pub fn is_directive(token: &str) -> bool {
        Self::classify(token) != Self::Keyword
    }
}

/// A parsed `Define` record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefineDirective {
    /// Type name as written.
    pub type_name: String,
    /// Names to define, in order.
    pub names: Vec<EntityRef>,
}

impl DefineDirective {
    /// Checks the shape `Define <Type> { <name> ... }`.
    ///
    /// # Errors
    ///
    /// Returns a malformed-directive error for any other shape.
    pub fn parse(tokens: &[String]) -> Result<Self> {
        let shape = || Error::directive(&tokens[0], "expected Define <Type> { <name> ... }");
        if tokens.len() < 4 || tokens[2] != "{" || tokens[tokens.len() - 1] != "}" {
            return Err(shape());
        }
        let inner = &tokens[3..tokens.len() - 1];
        if inner.iter().any(|t| t == "{" || t == "}") {
            return Err(shape());
        }
        Ok(Self {
            type_name: tokens[1].clone(),
            names: inner.iter().map(|t| EntityRef::parse(unquote(t))).collect(),
        })
    }
}

/// A parsed `Default` record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DefaultDirective {
    /// Type name the defaults apply to.
    pub type_name: String,
    /// The record minus the directive keyword: `<Type> <keyword> { args } ...`.
    pub entry: Vec<String>,
}

impl DefaultDirective {
    /// Checks the shape `Default <Type> <keyword> ...`.
    ///
    /// # Errors
    ///
    /// Returns a malformed-directive error if the type or keyword is missing.
    pub fn parse(tokens: &[String]) -> Result<Self> {
        if tokens.len() < 3 || tokens[1] == "{" || tokens[1] == "}" {
            return Err(Error::directive(
                &tokens[0],
                "expected Default <Type> <keyword> { <args> }",
            ));
        }
        Ok(Self {
            type_name: tokens[1].clone(),
            entry: tokens[1..].to_vec(),
        })
    }
}

/// A parsed `Include` record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncludeDirective {
    /// Path as written, literal quotes removed.
    pub path: String,
}

impl IncludeDirective {
    /// Checks the shape `Include <path>`.
    ///
    /// # Errors
    ///
    /// Returns a malformed-directive error unless exactly one path follows.
    pub fn parse(tokens: &[String]) -> Result<Self> {
        if tokens.len() != 2 || tokens[1] == "{" || tokens[1] == "}" {
            return Err(Error::directive(&tokens[0], "expected Include <path>"));
        }
        Ok(Self {
            path: unquote(&tokens[1]).to_string(),
        })
    }
}
