//! Helpers for `'…'` literal tokens.

/// Returns true if the token is a `'…'` literal.
#[must_use]
pub fn is_literal(token: &str) -> bool {
    token.len() >= 2 && token.starts_with('\'') && token.ends_with('\'')
}

/// Strips the `'…'` quotes from a literal token; other tokens are returned as is.
#[must_use]
pub fn unquote(token: &str) -> &str {
    if is_literal(token) {
        &token[1..token.len() - 1]
    } else {
        token
    }
}

/// Wraps text in `'…'` quotes if it would not survive tokenization as one token.
#[must_use]
pub fn quote_if_needed(text: &str) -> String {
    let needs_quotes = text.is_empty()
        || text
            .chars()
            .any(|c| matches!(c, ' ' | ',' | '\t' | '{' | '}' | '"'));
    if needs_quotes && !is_literal(text) {
        format!("'{text}'")
    } else {
        text.to_string()
    }
}
