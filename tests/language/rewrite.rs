//! Integration tests for backward-compatibility rewriting

use simcfg_language::compat::{Aliases, RULES, rewrite};
use simcfg_language::{DefineDirective, RecordKind, Tokenizer};

fn aliases() -> Aliases {
    let mut aliases = Aliases::new();
    aliases.insert("Processor".to_string(), "Server".to_string());
    aliases
}

fn run(line: &str) -> (Vec<String>, usize) {
    let (tokens, warnings) = rewrite(Tokenizer::tokenize(line), &aliases());
    (tokens, warnings.len())
}

#[test]
fn current_shapes_are_untouched() {
    for line in [
        "Define Server { S1 S2 }",
        "Default Server Speed { 1 }",
        "S1 Speed { 5 } Direction { 10 }",
        "Include 'other.cfg'",
        "Stop",
    ] {
        let (tokens, warnings) = run(line);
        assert_eq!(tokens.join(" "), line);
        assert_eq!(warnings, 0, "{line}");
    }
}

#[test]
fn legacy_define_becomes_a_valid_directive() {
    let (tokens, warnings) = run("Processor Define P1 P2");
    assert_eq!(warnings, 3);
    assert_eq!(RecordKind::classify(&tokens[0]), RecordKind::Define);
    let define = DefineDirective::parse(&tokens).unwrap();
    assert_eq!(define.type_name, "Server");
    assert_eq!(define.names.len(), 2);
}

#[test]
fn rewriting_is_idempotent() {
    for line in ["Processor Define P1", "Keyword S1 Speed 5", "Define Processor { P1 }"] {
        let (once, _) = run(line);
        let (twice, warnings) = rewrite(once.clone(), &aliases());
        assert_eq!(twice, once);
        assert!(warnings.is_empty(), "{line}");
    }
}

#[test]
fn rule_table_order() {
    let names: Vec<&str> = RULES.iter().map(|r| r.name).collect();
    assert_eq!(
        names,
        vec!["misplaced-directive", "deprecated-type", "keyword-record", "flat-define"]
    );
}
