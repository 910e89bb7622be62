//! Line tokenization.
//!
//! Converts one physical line into a flat token sequence:
//!
//! - `"` starts a comment that runs to the end of the line; the comment is
//!   kept as a single token beginning with `"` so it can be dropped later
//! - `'…'` is an opaque literal, emitted as one token with its quotes
//! - `{` and `}` are always tokens of their own
//! - spaces, commas and tabs separate tokens
//!
//! Joining the tokens with single spaces (minus comments) gives a
//! whitespace-normalized copy of the line, not a byte-identical one.

/// Tokenizes configuration lines.
pub struct Tokenizer;

impl Tokenizer {
    /// Tokenizes a line into a new vector.
    #[must_use]
    pub fn tokenize(line: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        Self::tokenize_into(line, &mut tokens);
        tokens
    }

    /// Tokenizes a line, appending to an accumulator that may already hold
    /// tokens from earlier lines of the same record.
    pub fn tokenize_into(line: &str, tokens: &mut Vec<String>) {
        let (content, comment) = split_comment(line);

        for (i, segment) in content.split('\'').enumerate() {
            if i % 2 == 1 {
                tokens.push(format!("'{segment}'"));
                continue;
            }

            let mut word = String::new();
            for c in segment.chars() {
                match c {
                    '{' | '}' => {
                        flush(&mut word, tokens);
                        tokens.push(c.to_string());
                    }
                    ' ' | ',' | '\t' => flush(&mut word, tokens),
                    _ => word.push(c),
                }
            }
            flush(&mut word, tokens);
        }

        if let Some(comment) = comment {
            tokens.push(comment.to_string());
        }
    }
}

fn flush(word: &mut String, tokens: &mut Vec<String>) {
    if !word.is_empty() {
        tokens.push(std::mem::take(word));
    }
}

/// Splits a line at the first `"` outside a literal.
fn split_comment(line: &str) -> (&str, Option<&str>) {
    let mut in_literal = false;
    for (i, c) in line.char_indices() {
        match c {
            '\'' => in_literal = !in_literal,
            '"' if !in_literal => return (&line[..i], Some(&line[i..])),
            _ => {}
        }
    }
    (line, None)
}

/// Returns true if the token is a trailing comment.
#[must_use]
pub fn is_comment(token: &str) -> bool {
    token.starts_with('"')
}

/// Drops comment tokens.
pub fn remove_comments(tokens: &mut Vec<String>) {
    tokens.retain(|t| !is_comment(t));
}
