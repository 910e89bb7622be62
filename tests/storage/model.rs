//! Integration tests for the model: namespaces, keyword application, and edit flags

use simcfg_foundation::{EntityRef, ErrorKind, TypeId};
use simcfg_storage::{InputSpec, Model, TypeRegistry, ValueKind};

fn toks(s: &str) -> Vec<String> {
    s.split_whitespace().map(String::from).collect()
}

fn model() -> (Model, TypeId, TypeId) {
    let mut registry = TypeRegistry::new();
    let region = registry.register("Region", Vec::new);
    let server = registry.register("Server", || {
        vec![
            InputSpec::new("Speed", ValueKind::non_negative()).with_default("0"),
            InputSpec::new("Next", ValueKind::Entity),
            InputSpec::new("States", ValueKind::list()).appendable(),
        ]
    });
    (Model::new(registry), region, server)
}

// =============================================================================
// Namespaces
// =============================================================================

#[test]
fn region_scoped_names() {
    let (mut model, region, server) = model();
    model.define(region, &EntityRef::global("North")).unwrap();
    let global = model.define(server, &EntityRef::global("S1")).unwrap();
    let scoped = model.define(server, &EntityRef::parse("North/S1")).unwrap();

    assert_ne!(global, scoped);
    assert_eq!(model.resolve("S1").unwrap(), global);
    assert_eq!(model.resolve("North/S1").unwrap(), scoped);
    assert_eq!(model.entity(scoped).unwrap().qualified_name(), "North/S1");
}

#[test]
fn unknown_region_is_a_resolution_failure() {
    let (mut model, _, server) = model();
    let err = model.define(server, &EntityRef::parse("South/S1")).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ResolutionFailure { what: "region", .. }));
    let err = model.resolve("South/S1").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ResolutionFailure { .. }));
}

#[test]
fn redefinition_across_types_collides() {
    let (mut model, region, server) = model();
    model.define(server, &EntityRef::global("X")).unwrap();
    let err = model.define(region, &EntityRef::global("X")).unwrap_err();
    assert_eq!(format!("{err}"), "name X already used and is a Server");
    assert_eq!(model.len(), 1);
    assert_eq!(model.type_name(model.resolve("X").unwrap()), "Server");
}

// =============================================================================
// Keyword Application
// =============================================================================

#[test]
fn identical_value_is_a_no_op_for_edit_flags() {
    let (mut model, _, server) = model();
    let id = model.define(server, &EntityRef::global("S1")).unwrap();
    assert!(model.apply_keyword(id, "Speed", &toks("5"), false).unwrap());

    assert!(!model.apply_keyword(id, "Speed", &toks("5"), true).unwrap());
    assert!(!model.entity(id).unwrap().is_edited());
    assert!(!model.is_session_edited());

    // Still validated even when unchanged.
    assert!(model.apply_keyword(id, "Speed", &toks("-5"), true).is_err());
}

#[test]
fn edits_are_tracked_per_input() {
    let (mut model, _, server) = model();
    let id = model.define(server, &EntityRef::global("S1")).unwrap();
    model.apply_keyword(id, "Speed", &toks("2"), true).unwrap();

    let entity = model.entity(id).unwrap();
    assert!(entity.is_edited());
    let edited: Vec<&str> = entity.edited_inputs().map(|i| i.keyword()).collect();
    assert_eq!(edited, vec!["Speed"]);
    assert!(model.is_session_edited());

    model.clear_session_edited();
    assert!(!model.is_session_edited());
}

#[test]
fn appendable_accumulates_and_resets() {
    let (mut model, _, server) = model();
    let id = model.define(server, &EntityRef::global("S1")).unwrap();
    model.apply_keyword(id, "States", &toks("{ Idle }"), false).unwrap();
    model.apply_keyword(id, "States", &toks("{ Busy } { Down }"), false).unwrap();
    let value = model.entity(id).unwrap().input("States").unwrap().value().to_string();
    assert_eq!(value, "{ Idle } { Busy } { Down }");

    model.apply_keyword(id, "States", &[], false).unwrap();
    assert!(model.entity(id).unwrap().input("States").unwrap().is_default());
}

#[test]
fn entity_values_must_exist() {
    let (mut model, _, server) = model();
    let s1 = model.define(server, &EntityRef::global("S1")).unwrap();
    assert!(model.apply_keyword(s1, "Next", &toks("S2"), false).is_err());
    model.define(server, &EntityRef::global("S2")).unwrap();
    assert!(model.apply_keyword(s1, "Next", &toks("S2"), false).is_ok());
}

#[test]
fn locked_entities_reject_keywords() {
    let (mut model, _, server) = model();
    let id = model.define(server, &EntityRef::global("S1")).unwrap();
    model.set_locked(id, true).unwrap();
    let err = model.apply_keyword(id, "Speed", &toks("1"), true).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::EntityLocked(_)));
}

#[test]
fn unknown_keyword() {
    let (mut model, _, server) = model();
    let id = model.define(server, &EntityRef::global("S1")).unwrap();
    let err = model.apply_keyword(id, "Colour", &toks("red"), false).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::KeywordUnknown { .. }));
}

#[test]
fn validation_errors_carry_entity_keyword_frame() {
    let (mut model, _, server) = model();
    let id = model.define(server, &EntityRef::global("S1")).unwrap();
    let err = model.apply_keyword(id, "Speed", &toks("fast"), false).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ValueValidation(_)));
    assert_eq!(err.context.unwrap().stack, vec!["S1.Speed".to_string()]);
}
