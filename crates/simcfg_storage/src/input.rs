//! Keyword inputs: declared value kinds and the per-entity input records.
//!
//! Values are stored as normalized strings (argument tokens joined by single
//! spaces). Literal tokens keep their `'…'` quotes in the stored string so a
//! saved value re-tokenizes to the same tokens; validation sees the text
//! without the quotes.

use simcfg_foundation::literal::unquote;
use simcfg_foundation::{Error, Result};

/// How a keyword validates its argument tokens.
#[derive(Clone, Debug, PartialEq)]
pub enum ValueKind {
    /// Exactly one token of any text.
    Text,
    /// Between `min` and `max` tokens of any text.
    List {
        /// Minimum token count.
        min: usize,
        /// Maximum token count.
        max: usize,
    },
    /// One integer within `min..=max`.
    Integer {
        /// Smallest accepted value.
        min: i64,
        /// Largest accepted value.
        max: i64,
    },
    /// One number within `min..=max`, optionally followed by a unit token.
    Number {
        /// Smallest accepted value.
        min: f64,
        /// Largest accepted value.
        max: f64,
    },
    /// `TRUE` or `FALSE` (case-insensitive).
    Boolean,
    /// One token naming an existing entity.
    Entity,
}

impl ValueKind {
    /// An unbounded list.
    #[must_use]
    pub const fn list() -> Self {
        Self::List {
            min: 0,
            max: usize::MAX,
        }
    }

    /// Any integer.
    #[must_use]
    pub const fn integer() -> Self {
        Self::Integer {
            min: i64::MIN,
            max: i64::MAX,
        }
    }

    /// Any finite number.
    #[must_use]
    pub const fn number() -> Self {
        Self::Number {
            min: f64::MIN,
            max: f64::MAX,
        }
    }

    /// A non-negative number.
    #[must_use]
    pub const fn non_negative() -> Self {
        Self::Number {
            min: 0.0,
            max: f64::MAX,
        }
    }

    /// Validates a list of argument tokens.
    ///
    /// `exists` answers whether a name resolves to an entity in the model.
    ///
    /// # Errors
    ///
    /// Returns a [`simcfg_foundation::ErrorKind::ValueValidation`] error
    /// describing why the tokens were rejected.
    pub fn validate(&self, args: &[String], exists: &dyn Fn(&str) -> bool) -> Result<()> {
        match self {
            Self::Text => {
                expect_count(args, 1, 1)?;
            }
            Self::List { min, max } => {
                expect_count(args, *min, *max)?;
            }
            Self::Integer { min, max } => {
                expect_count(args, 1, 1)?;
                let text = unquote(&args[0]);
                let value: i64 = text
                    .parse()
                    .map_err(|_| Error::invalid_value(format!("expected an integer, found {text}")))?;
                if value < *min || value > *max {
                    return Err(Error::invalid_value(format!(
                        "{value} is outside the range {min} to {max}"
                    )));
                }
            }
            Self::Number { min, max } => {
                expect_count(args, 1, 2)?;
                let text = unquote(&args[0]);
                let value: f64 = text
                    .parse()
                    .map_err(|_| Error::invalid_value(format!("expected a number, found {text}")))?;
                if !value.is_finite() || value < *min || value > *max {
                    return Err(Error::invalid_value(format!(
                        "{value} is outside the range {min} to {max}"
                    )));
                }
            }
            Self::Boolean => {
                expect_count(args, 1, 1)?;
                let text = unquote(&args[0]);
                if !text.eq_ignore_ascii_case("true") && !text.eq_ignore_ascii_case("false") {
                    return Err(Error::invalid_value(format!(
                        "expected TRUE or FALSE, found {text}"
                    )));
                }
            }
            Self::Entity => {
                expect_count(args, 1, 1)?;
                let text = unquote(&args[0]);
                if !exists(text) {
                    return Err(Error::invalid_value(format!("entity {text} does not exist")));
                }
            }
        }
        Ok(())
    }
}

fn expect_count(args: &[String], min: usize, max: usize) -> Result<()> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            min.to_string()
        } else if max == usize::MAX {
            format!("at least {min}")
        } else {
            format!("{min} to {max}")
        };
        return Err(Error::invalid_value(format!(
            "expected {expected} value(s), found {}",
            args.len()
        )));
    }
    Ok(())
}

/// Splits appendable arguments into brace-delimited groups.
///
/// `{ a b } { c }` yields `[a b]` and `[c]`. Arguments that do not start
/// with `{` form a single group.
///
/// # Errors
///
/// Returns a validation error if the groups are not properly delimited.
pub fn split_groups(args: &[String]) -> Result<Vec<&[String]>> {
    if args.first().is_none_or(|t| t != "{") {
        return Ok(vec![args]);
    }

    let mut groups = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if args[i] != "{" {
            return Err(Error::invalid_value(format!(
                "expected '{{' to start a group, found {}",
                args[i]
            )));
        }
        let mut depth = 0usize;
        let mut close = None;
        for (j, token) in args.iter().enumerate().skip(i) {
            match token.as_str() {
                "{" => depth += 1,
                "}" => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(j);
                        break;
                    }
                }
                _ => {}
            }
        }
        let close = close.ok_or_else(|| Error::invalid_value("unterminated group"))?;
        groups.push(&args[i + 1..close]);
        i = close + 1;
    }
    Ok(groups)
}

/// Joins tokens into a value string.
#[must_use]
pub fn join_tokens(tokens: &[String]) -> String {
    tokens.join(" ")
}

fn render_group(group: &[String]) -> String {
    if group.is_empty() {
        "{ }".to_string()
    } else {
        format!("{{ {} }}", join_tokens(group))
    }
}

/// Declaration of a keyword on an entity type.
#[derive(Clone, Debug, PartialEq)]
pub struct InputSpec {
    /// Keyword name.
    pub keyword: String,
    /// Value validation.
    pub kind: ValueKind,
    /// Default value string.
    pub default: String,
    /// Whether repeated application accumulates.
    pub appendable: bool,
}

impl InputSpec {
    /// Creates a spec with an empty default.
    #[must_use]
    pub fn new(keyword: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            keyword: keyword.into(),
            kind,
            default: String::new(),
            appendable: false,
        }
    }

    /// Builder method to set the default value string.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = default.into();
        self
    }

    /// Builder method to make the keyword appendable.
    #[must_use]
    pub fn appendable(mut self) -> Self {
        self.appendable = true;
        self
    }
}

/// The live state of one keyword on one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct InputRecord {
    spec: InputSpec,
    value: String,
    edited: bool,
    pending: bool,
}

impl InputRecord {
    /// Creates a record holding the spec's default value.
    #[must_use]
    pub fn new(spec: InputSpec) -> Self {
        let value = spec.default.clone();
        Self {
            spec,
            value,
            edited: false,
            pending: false,
        }
    }

    /// Returns the keyword name.
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.spec.keyword
    }

    /// Returns the value kind.
    #[must_use]
    pub fn kind(&self) -> &ValueKind {
        &self.spec.kind
    }

    /// Returns the current value string.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns the default value string.
    #[must_use]
    pub fn default_value(&self) -> &str {
        &self.spec.default
    }

    /// Returns true if the current value is the default.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.value == self.spec.default
    }

    /// Returns true if the value was changed as a session edit.
    #[must_use]
    pub const fn is_edited(&self) -> bool {
        self.edited
    }

    /// Returns true if the value was edited since the model was last marked
    /// as loaded. Only these values belong in a saved delta.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    pub(crate) fn clear_pending(&mut self) {
        self.pending = false;
    }

    /// Returns true if repeated application accumulates.
    #[must_use]
    pub const fn is_appendable(&self) -> bool {
        self.spec.appendable
    }

    /// Validates `args` and computes the value string they would produce.
    ///
    /// Empty arguments restore the default. Appendable inputs add each group
    /// to the current value, or replace it while it still holds the default.
    pub(crate) fn next_value(&self, args: &[String], exists: &dyn Fn(&str) -> bool) -> Result<String> {
        if args.is_empty() {
            return Ok(self.spec.default.clone());
        }

        if !self.spec.appendable {
            self.spec.kind.validate(args, exists)?;
            return Ok(join_tokens(args));
        }

        let mut rendered = Vec::new();
        for group in split_groups(args)? {
            self.spec.kind.validate(group, exists)?;
            rendered.push(render_group(group));
        }
        let added = rendered.join(" ");
        if self.is_default() || self.value.is_empty() {
            Ok(added)
        } else {
            Ok(format!("{} {added}", self.value))
        }
    }

    /// Stores a new value. Returns true if it differed from the old one.
    pub(crate) fn set_value(&mut self, value: String, edit: bool) -> bool {
        if value == self.value {
            return false;
        }
        self.value = value;
        if edit {
            self.edited = true;
            self.pending = true;
        }
        true
    }
}
