//! Integration tests for tokenizing and assembling records

use proptest::prelude::*;
use simcfg_language::{
    DEFAULT_MAX_BRACE_DEPTH, KeywordCommand, Record, RecordAssembler, RecordKind, Tokenizer,
    split_record,
};

/// Feeds lines through an assembler, returning records and the error count.
fn assemble(text: &str, max_depth: usize) -> (Vec<Record>, usize) {
    let mut assembler = RecordAssembler::new(max_depth);
    let mut records = Vec::new();
    let mut errors = 0;
    for (i, line) in text.lines().enumerate() {
        match assembler.push_line(line, i + 1) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(_) => errors += 1,
        }
    }
    if assembler.finish().is_err() {
        errors += 1;
    }
    (records, errors)
}

// =============================================================================
// Tokenizer
// =============================================================================

#[test]
fn braces_are_isolated() {
    assert_eq!(
        Tokenizer::tokenize("A Speed{5}Direction,{ 10 }"),
        vec!["A", "Speed", "{", "5", "}", "Direction", "{", "10", "}"]
    );
}

#[test]
fn literal_keeps_quotes_and_content() {
    assert_eq!(
        Tokenizer::tokenize("L Text { 'a, b { c }' } \" note"),
        vec!["L", "Text", "{", "'a, b { c }'", "}", "\" note"]
    );
}

#[test]
fn quote_inside_literal_is_not_a_comment() {
    assert_eq!(
        Tokenizer::tokenize("L Text { 'say \"hi\"' }"),
        vec!["L", "Text", "{", "'say \"hi\"'", "}"]
    );
}

#[test]
fn empty_literal_is_a_token() {
    assert_eq!(Tokenizer::tokenize("L Text ''"), vec!["L", "Text", "''"]);
}

// =============================================================================
// Record Assembly
// =============================================================================

#[test]
fn record_spans_lines() {
    let (records, errors) = assemble("Define Server {\n  S1 \" first\n  S2\n}\n", 2);
    assert_eq!(errors, 0);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].to_string(), "Define Server { S1 S2 }");
    assert_eq!(records[0].line, 1);
}

#[test]
fn depth_three_is_rejected_by_default() {
    let (records, errors) = assemble("A B { { { x } } }\nA C { 1 }\n", DEFAULT_MAX_BRACE_DEPTH);
    assert_eq!(errors, 1);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].first(), Some("A"));
}

#[test]
fn depth_limit_is_configurable() {
    let (records, errors) = assemble("A B { { { x } } }\n", 3);
    assert_eq!(errors, 0);
    assert_eq!(records.len(), 1);
}

#[test]
fn extra_closing_brace_resets() {
    let (records, errors) = assemble("A Speed { 5 } }\nA Speed { 6 }\n", 2);
    assert_eq!(errors, 1);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].to_string(), "A Speed { 6 }");
}

#[test]
fn unmatched_brace_at_end_of_file() {
    let (records, errors) = assemble("A Speed { 5\n", 2);
    assert_eq!(errors, 1);
    let commands: Vec<KeywordCommand> = records
        .iter()
        .flat_map(|r| split_record(r).unwrap_or_default())
        .collect();
    assert!(commands.is_empty());
}

#[test]
fn directive_classification() {
    let (records, _) = assemble("DEFINE Server { S1 }\ninclude 'x.cfg'\nStop\nS1 Speed 1\n", 2);
    let kinds: Vec<RecordKind> = records.iter().map(RecordKind::of).collect();
    assert_eq!(
        kinds,
        vec![RecordKind::Define, RecordKind::Include, RecordKind::Stop, RecordKind::Keyword]
    );
}

#[test]
fn record_split_into_commands() {
    let record = Record::from_line("A Speed { 5 } Direction { 10 }", 2)
        .unwrap()
        .unwrap();
    let commands = split_record(&record).unwrap();
    assert_eq!(commands.len(), 2);
    assert_eq!(commands[0].keyword, "Speed");
    assert_eq!(commands[0].args, vec!["5"]);
    assert_eq!(commands[1].keyword, "Direction");
    assert_eq!(commands[1].args, vec!["10"]);
}

// =============================================================================
// Properties
// =============================================================================

fn record_line() -> impl Strategy<Value = String> {
    (
        "[A-Z][a-z0-9]{0,6}",
        prop::collection::vec(("[A-Z][a-z]{0,6}", "[a-z0-9 ]{0,10}"), 1..4),
    )
        .prop_map(|(entity, groups)| {
            let mut line = entity;
            for (keyword, args) in groups {
                line.push_str(&format!(" {keyword} {{ {args} }}"));
            }
            line
        })
}

proptest! {
    #[test]
    fn well_formed_lines_give_one_record(line in record_line()) {
        let (records, errors) = assemble(&line, DEFAULT_MAX_BRACE_DEPTH);
        prop_assert_eq!(errors, 0);
        prop_assert_eq!(records.len(), 1);
        let tokens = Tokenizer::tokenize(&line);
        prop_assert_eq!(records[0].first(), tokens.first().map(String::as_str));
        prop_assert_eq!(records[0].tokens.last().map(String::as_str), Some("}"));
    }

    #[test]
    fn each_rejected_record_counts_once(extra in 1usize..4) {
        let line = format!("A B {}{}", "{ ".repeat(DEFAULT_MAX_BRACE_DEPTH + extra), "} ".repeat(DEFAULT_MAX_BRACE_DEPTH + extra));
        let (records, errors) = assemble(&line, DEFAULT_MAX_BRACE_DEPTH);
        prop_assert_eq!(errors, 1);
        prop_assert!(records.is_empty());
    }
}
