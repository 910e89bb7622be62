//! Rewriting of deprecated record shapes.
//!
//! Rules run once per record, in table order, before dispatch. Each rule is
//! a pure function of the tokens that either leaves the record alone or
//! returns the rewritten record plus the warning to report.

use std::collections::HashMap;

use crate::directive::RecordKind;

/// Deprecated type name to current type name.
pub type Aliases = HashMap<String, String>;

type RewriteFn = fn(&[String], &Aliases) -> Option<(Vec<String>, String)>;

/// One backward-compatibility rule.
pub struct CompatRule {
    /// Short rule name.
    pub name: &'static str,
    rewrite: RewriteFn,
}

impl CompatRule {
    /// Applies this rule; `None` if its pattern does not match.
    #[must_use]
    pub fn apply(&self, tokens: &[String], aliases: &Aliases) -> Option<(Vec<String>, String)> {
        (self.rewrite)(tokens, aliases)
    }
}

/// The rules, in the order they run.
pub const RULES: &[CompatRule] = &[
    CompatRule {
        name: "misplaced-directive",
        rewrite: misplaced_directive,
    },
    CompatRule {
        name: "deprecated-type",
        rewrite: deprecated_type,
    },
    CompatRule {
        name: "keyword-record",
        rewrite: keyword_record,
    },
    CompatRule {
        name: "flat-define",
        rewrite: flat_define,
    },
];

/// Runs every rule over a record. Returns the final tokens and one warning
/// per rule that fired.
#[must_use]
pub fn rewrite(mut tokens: Vec<String>, aliases: &Aliases) -> (Vec<String>, Vec<String>) {
    let mut warnings = Vec::new();
    for rule in RULES {
        if let Some((rewritten, warning)) = rule.apply(&tokens, aliases) {
            tokens = rewritten;
            warnings.push(warning);
        }
    }
    (tokens, warnings)
}

fn is_define_or_default(token: &str) -> bool {
    matches!(RecordKind::classify(token), RecordKind::Define | RecordKind::Default)
}

/// `Server Define { A }` becomes `Define Server { A }`.
fn misplaced_directive(tokens: &[String], _: &Aliases) -> Option<(Vec<String>, String)> {
    if tokens.len() < 2 || RecordKind::is_directive(&tokens[0]) || !is_define_or_default(&tokens[1]) {
        return None;
    }
    let mut out = tokens.to_vec();
    out.swap(0, 1);
    let warning = format!(
        "{} must be the first token of a record: `{} {}` read as `{} {}`",
        tokens[1], tokens[0], tokens[1], tokens[1], tokens[0]
    );
    Some((out, warning))
}

/// `Define ObjectType { A }` becomes `Define <CurrentType> { A }`.
fn deprecated_type(tokens: &[String], aliases: &Aliases) -> Option<(Vec<String>, String)> {
    if tokens.len() < 2 || !is_define_or_default(&tokens[0]) {
        return None;
    }
    let current = aliases.get(&tokens[1])?;
    let mut out = tokens.to_vec();
    out[1].clone_from(current);
    let warning = format!("type {} is deprecated, use {current} instead", tokens[1]);
    Some((out, warning))
}

/// `Keyword <Name> <kw> <data...>` becomes `<Name> <kw> { <data...> }`.
fn keyword_record(tokens: &[String], _: &Aliases) -> Option<(Vec<String>, String)> {
    if tokens.len() < 3 || !tokens[0].eq_ignore_ascii_case("keyword") {
        return None;
    }
    let data = &tokens[3..];
    let mut out = vec![tokens[1].clone(), tokens[2].clone()];
    if is_single_group(data) {
        out.extend_from_slice(data);
    } else {
        out.push("{".to_string());
        out.extend_from_slice(data);
        out.push("}".to_string());
    }
    let warning = format!(
        "the `{} <name> <keyword> <data>` form is deprecated, write `{} {} {{ ... }}`",
        tokens[0], tokens[1], tokens[2]
    );
    Some((out, warning))
}

/// `Define Server A B` becomes `Define Server { A B }`.
fn flat_define(tokens: &[String], _: &Aliases) -> Option<(Vec<String>, String)> {
    if tokens.len() < 3
        || RecordKind::classify(&tokens[0]) != RecordKind::Define
        || tokens[2..].iter().any(|t| t == "{" || t == "}")
    {
        return None;
    }
    let mut out = tokens[..2].to_vec();
    out.push("{".to_string());
    out.extend_from_slice(&tokens[2..]);
    out.push("}".to_string());
    let warning = format!(
        "names must be enclosed in braces: `{} {} {{ {} }}`",
        tokens[0],
        tokens[1],
        tokens[2..].join(" ")
    );
    Some((out, warning))
}

/// True if `data` is exactly one `{ ... }` group.
fn is_single_group(data: &[String]) -> bool {
    if data.first().is_none_or(|t| t != "{") {
        return false;
    }
    let mut depth = 0usize;
    for (i, token) in data.iter().enumerate() {
        match token.as_str() {
            "{" => depth += 1,
            "}" => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i == data.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}
