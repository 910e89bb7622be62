//! Integration tests for keyword inputs and the type registry

use simcfg_storage::{InputSpec, TypeRegistry, ValueKind};

fn toks(s: &str) -> Vec<String> {
    s.split_whitespace().map(String::from).collect()
}

fn nothing_exists(_: &str) -> bool {
    false
}

// =============================================================================
// Value Kinds
// =============================================================================

#[test]
fn boolean_is_case_insensitive() {
    let kind = ValueKind::Boolean;
    assert!(kind.validate(&toks("true"), &nothing_exists).is_ok());
    assert!(kind.validate(&toks("FALSE"), &nothing_exists).is_ok());
    assert!(kind.validate(&toks("yes"), &nothing_exists).is_err());
}

#[test]
fn integer_bounds() {
    let kind = ValueKind::Integer { min: 0, max: 10 };
    assert!(kind.validate(&toks("10"), &nothing_exists).is_ok());
    assert!(kind.validate(&toks("11"), &nothing_exists).is_err());
    assert!(kind.validate(&toks("2.5"), &nothing_exists).is_err());
}

#[test]
fn entity_kind_asks_the_model() {
    let kind = ValueKind::Entity;
    let only_q1 = |name: &str| name == "Q1";
    assert!(kind.validate(&toks("Q1"), &only_q1).is_ok());
    assert!(kind.validate(&toks("'Q1'"), &only_q1).is_ok());
    assert!(kind.validate(&toks("Q2"), &only_q1).is_err());
}

#[test]
fn text_takes_one_literal() {
    let kind = ValueKind::Text;
    assert!(kind.validate(&["'two words'".to_string()], &nothing_exists).is_ok());
    assert!(kind.validate(&toks("two words"), &nothing_exists).is_err());
}

// =============================================================================
// Registry
// =============================================================================

#[test]
fn factory_runs_per_instance() {
    let mut registry = TypeRegistry::new();
    let id = registry.register("Server", || {
        vec![InputSpec::new("Speed", ValueKind::number()).with_default("1")]
    });
    let a = registry.instantiate(id);
    let b = registry.instantiate(id);
    assert_eq!(a, b);
    assert_eq!(a[0].value(), "1");
    assert!(a[0].is_default());
}

#[test]
fn aliases_follow_to_current_type() {
    let mut registry = TypeRegistry::new();
    let id = registry.register("Server", Vec::new);
    registry.register_alias("Processor", "Server");
    assert_eq!(registry.resolve("Processor"), Some(id));
    assert_eq!(registry.name(id), "Server");
    assert_eq!(registry.aliases().get("Processor").map(String::as_str), Some("Server"));
}

#[test]
fn iteration_is_in_registration_order() {
    let mut registry = TypeRegistry::new();
    registry.register("B", Vec::new);
    registry.register("A", Vec::new);
    let names: Vec<&str> = registry.iter().map(|(_, t)| t.name()).collect();
    assert_eq!(names, vec!["B", "A"]);
}
