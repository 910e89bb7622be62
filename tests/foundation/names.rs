//! Integration tests for entity names and literal quoting

use proptest::prelude::*;
use simcfg_foundation::EntityRef;
use simcfg_foundation::literal::{is_literal, quote_if_needed, unquote};

// =============================================================================
// EntityRef
// =============================================================================

#[test]
fn region_split_on_first_slash() {
    let r = EntityRef::parse("North/S1/extra");
    assert_eq!(r.region.as_deref(), Some("North"));
    assert_eq!(r.name, "S1/extra");
}

#[test]
fn bare_name_is_global() {
    let r = EntityRef::parse("S1");
    assert_eq!(r, EntityRef::global("S1"));
    assert_eq!(r.to_string(), "S1");
}

#[test]
fn display_round_trips() {
    let r = EntityRef::in_region("North", "S1");
    assert_eq!(EntityRef::parse(&r.to_string()), r);
}

// =============================================================================
// Literals
// =============================================================================

#[test]
fn quoting_only_when_needed() {
    assert_eq!(quote_if_needed("S1"), "S1");
    assert_eq!(quote_if_needed("Big Box"), "'Big Box'");
    assert_eq!(quote_if_needed(""), "''");
    assert!(is_literal("'x'"));
    assert_eq!(unquote("'Big Box'"), "Big Box");
    assert_eq!(unquote("plain"), "plain");
}

proptest! {
    #[test]
    fn quote_then_unquote(text in "[A-Za-z0-9 ,{}]{0,20}") {
        let quoted = quote_if_needed(&text);
        prop_assert_eq!(unquote(&quoted), text.as_str());
    }
}
