//! Integration tests for loading configuration text

use simcfg_foundation::ErrorKind;
use simcfg_runtime::{LoadConfig, Location, ModelLoader, standard_types};

fn load(text: &str) -> ModelLoader {
    let mut loader = ModelLoader::new(standard_types()).with_config(LoadConfig::in_memory());
    loader.load_text(Location::file("model.cfg"), text);
    loader
}

// =============================================================================
// Defaults
// =============================================================================

#[test]
fn default_applies_to_later_defines() {
    let loader = load("Default Server ServiceTime { 1 }\nDefine Server { B }\n");
    assert_eq!(loader.errors(), 0);
    assert_eq!(loader.value("B", "ServiceTime"), Some("1"));
}

#[test]
fn explicit_keyword_overrides_default() {
    let loader = load(concat!(
        "Default Server ServiceTime { 1 }\n",
        "Define Server { B }\n",
        "B ServiceTime { 2 min }\n",
    ));
    assert_eq!(loader.value("B", "ServiceTime"), Some("2 min"));
}

#[test]
fn default_after_define_is_rejected() {
    let loader = load(concat!(
        "Define Queue { Q1 }\n",
        "Default Server ServiceTime { 1 }\n",
        "Define Server { B }\n",
    ));
    assert_eq!(loader.errors(), 1);
    assert!(loader.session().defaults.is_empty());
    assert_eq!(loader.value("B", "ServiceTime"), Some("0 s"));
}

#[test]
fn default_for_deprecated_type_name() {
    let loader = load("Default Processor Active { FALSE }\nDefine Server { S1 }\n");
    assert_eq!(loader.errors(), 0);
    assert_eq!(loader.warnings(), 1);
    assert_eq!(loader.value("S1", "Active"), Some("FALSE"));
}

// =============================================================================
// Names and Regions
// =============================================================================

#[test]
fn regions_scope_names() {
    let loader = load(concat!(
        "Define Region { North South }\n",
        "Define Server { North/S1 South/S1 }\n",
        "North/S1 ServiceTime { 3 }\n",
        "South/S1 ServiceTime { 4 }\n",
    ));
    assert_eq!(loader.errors(), 0);
    assert_eq!(loader.value("North/S1", "ServiceTime"), Some("3"));
    assert_eq!(loader.value("South/S1", "ServiceTime"), Some("4"));
    assert!(loader.entity("S1").is_none());
}

#[test]
fn redefinition_keeps_the_original() {
    let loader = load(concat!(
        "Define Server { X }\n",
        "X ServiceTime { 9 }\n",
        "Define Queue { X Q1 }\n",
    ));
    assert_eq!(loader.errors(), 1);
    assert_eq!(loader.model().type_name(loader.model().resolve("X").unwrap()), "Server");
    assert_eq!(loader.value("X", "ServiceTime"), Some("9"));
    assert!(loader.entity("Q1").is_some());
}

#[test]
fn quoted_names() {
    let loader = load("Define Queue { 'Loading Dock' }\n'Loading Dock' Capacity { 4 }\n");
    assert_eq!(loader.errors(), 0);
    assert_eq!(loader.value("Loading Dock", "Capacity"), Some("4"));
}

// =============================================================================
// Error Recovery
// =============================================================================

#[test]
fn every_error_kind_is_recovered() {
    let loader = load(concat!(
        "Define Queue { Q1 }\n",
        "Define Server { S1 }\n",
        "S1 ServiceTime { 1 } }\n",          // extra closing brace
        "S1 StateList { { { a } } }\n",     // too deep
        "Define Server\n",                  // malformed Define
        "Define Conveyor { C1 }\n",         // unknown type
        "S9 ServiceTime { 1 }\n",           // unknown entity
        "S1 Colour { red }\n",              // unknown keyword
        "S1 ServiceTime { -1 }\n",          // validation
        "S1 WaitQueue { Q9 }\n",            // validation (missing entity)
        "Include 'missing.cfg'\n",          // unresolvable include
        "S1 WaitQueue { Q1 }\n",
    ));
    assert_eq!(loader.errors(), 9);
    assert_eq!(loader.value("S1", "WaitQueue"), Some("Q1"));
    assert_eq!(loader.value("S1", "ServiceTime"), Some("0 s"));
}

#[test]
fn reset_to_default() {
    let loader = load(concat!(
        "Define Server { S1 S2 }\n",
        "S1 ServiceTime { 5 }\n",
        "S2 ServiceTime { 5 }\n",
        "S1 ServiceTime { }\n",
    ));
    assert_eq!(loader.errors(), 0);
    assert_eq!(loader.value("S1", "ServiceTime"), Some("0 s"));
    assert_eq!(loader.value("S2", "ServiceTime"), Some("5"));
}

#[test]
fn shorthand_keyword_restores_default() {
    let loader = load("Define Server { S1 }\nS1 Active { FALSE }\nS1 Active\n");
    assert_eq!(loader.errors(), 0);
    assert_eq!(loader.value("S1", "Active"), Some("TRUE"));
}

#[test]
fn brace_depth_is_configurable() {
    let mut loader = ModelLoader::new(standard_types())
        .with_config(LoadConfig::in_memory().with_max_brace_depth(1));
    loader.load_text(
        Location::file("model.cfg"),
        "Define Server { S1 }\nS1 StateList { { Idle } }\n",
    );
    assert_eq!(loader.errors(), 1);
}

// =============================================================================
// Live Edits
// =============================================================================

#[test]
fn live_edit_flags() {
    let mut loader = load("Define Server { S1 }\nS1 ServiceTime { 5 }\n");
    assert!(!loader.model().is_session_edited());

    // Re-applying the current value is not an edit.
    loader.apply_edit("S1 ServiceTime { 5 }").unwrap();
    assert!(!loader.entity("S1").unwrap().is_edited());
    assert!(!loader.model().is_session_edited());

    loader.apply_edit("S1 ServiceTime { 6 }").unwrap();
    assert!(loader.entity("S1").unwrap().is_edited());
    assert!(loader.model().is_session_edited());
}

#[test]
fn live_edit_errors_are_returned_and_counted() {
    let mut loader = load("Define Server { S1 }\n");
    let err = loader.apply_edit("S1 ServiceTime { slow }").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ValueValidation(_)));
    assert_eq!(loader.errors(), 1);

    let err = loader.apply_edit("S1 ServiceTime { { { 1 } } }").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TokenizeMalformed(_)));
    assert_eq!(loader.errors(), 2);
    let first = loader.first_error().unwrap();
    assert!(first.starts_with("invalid value"));
    assert!(first.contains("<edit>:1"));
}
