//! Keyword command splitting.
//!
//! A keyword record names an entity followed by any number of
//! `<keyword> { args }` groups (or `<keyword> <singleArg>`). Each group
//! becomes an independent [`KeywordCommand`].

use simcfg_foundation::literal::unquote;
use simcfg_foundation::{EntityRef, Error, Result};

use crate::record::Record;

/// One `(entity, keyword, args)` triple.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeywordCommand {
    /// The target entity.
    pub entity: EntityRef,
    /// The keyword name.
    pub keyword: String,
    /// Argument tokens, exclusive of the enclosing braces.
    pub args: Vec<String>,
}

impl KeywordCommand {
    /// Creates a command.
    #[must_use]
    pub fn new(entity: EntityRef, keyword: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            entity,
            keyword: keyword.into(),
            args,
        }
    }
}

/// Splits a keyword record (`<entity> <keyword> ...`) into commands.
///
/// # Errors
///
/// See [`split_commands`]. A record with no keyword at all is malformed.
pub fn split_record(record: &Record) -> Result<Vec<KeywordCommand>> {
    let Some((entity, rest)) = record.tokens.split_first() else {
        return Err(Error::malformed("empty keyword record"));
    };
    if rest.is_empty() {
        return Err(Error::malformed(format!("no keyword given for {entity}")));
    }
    split_commands(&EntityRef::parse(unquote(entity)), rest)
}

/// Splits the tokens following the entity name into commands.
///
/// A keyword followed by `{` takes everything up to the matching `}`; any
/// other following token is the keyword's single argument. A keyword that
/// ends the record is the shorthand form and gets empty arguments.
///
/// # Errors
///
/// Returns a malformed-input error if a brace group is not closed or a
/// brace appears where a keyword is expected. Nothing is returned for the
/// record in that case.
pub fn split_commands(entity: &EntityRef, tokens: &[String]) -> Result<Vec<KeywordCommand>> {
    let mut commands = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let keyword = &tokens[i];
        if keyword == "{" || keyword == "}" {
            return Err(Error::malformed(format!(
                "expected a keyword for {entity}, found '{keyword}'"
            )));
        }
        i += 1;

        let Some(next) = tokens.get(i) else {
            commands.push(KeywordCommand::new(entity.clone(), keyword.clone(), Vec::new()));
            break;
        };

        if next != "{" {
            commands.push(KeywordCommand::new(
                entity.clone(),
                keyword.clone(),
                vec![next.clone()],
            ));
            i += 1;
            continue;
        }

        let close = matching_brace(tokens, i).ok_or_else(|| {
            Error::malformed(format!("missing closing brace for {entity} {keyword}"))
        })?;
        commands.push(KeywordCommand::new(
            entity.clone(),
            keyword.clone(),
            tokens[i + 1..close].to_vec(),
        ));
        i = close + 1;
    }

    Ok(commands)
}

/// Finds the index of the `}` matching the `{` at `open`.
fn matching_brace(tokens: &[String], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token.as_str() {
            "{" => depth += 1,
            "}" => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
