//! Redeclaration rules across the value and type namespaces.

use quarry_core::text::Position;
use quarry_diagnostics::messages::VAR_REDECLARATION;
use quarry_scope::{BindingFlags, ScopeFlags, ScopeHandler};

fn at(index: u32) -> Position {
    Position::new(1, index, index)
}

fn module_scope() -> ScopeHandler {
    let mut scopes = ScopeHandler::new(true);
    scopes.enter(ScopeFlags::PROGRAM);
    scopes
}

fn block_in_function() -> ScopeHandler {
    let mut scopes = ScopeHandler::new(false);
    scopes.enter(ScopeFlags::PROGRAM);
    scopes.enter(ScopeFlags::FUNCTION);
    scopes.enter(ScopeFlags::OTHER);
    scopes
}

/// Declares `first` then `second` under the same name in a fresh block and
/// reports whether the second declaration was rejected.
fn conflicts(first: BindingFlags, second: BindingFlags) -> bool {
    let mut scopes = block_in_function();
    assert!(scopes.declare_name("x", first, at(0)).is_empty());
    let errors = scopes.declare_name("x", second, at(10));
    errors.iter().any(|e| e.is(&VAR_REDECLARATION))
}

// ============================================================================
// Value namespace
// ============================================================================

#[test]
fn test_value_redeclaration_matrix() {
    use BindingFlags as B;
    let cases = [
        (B::VAR, B::VAR, false),
        (B::VAR, B::LEXICAL, true),
        (B::LEXICAL, B::VAR, true),
        (B::LEXICAL, B::LEXICAL, true),
        (B::FUNCTION, B::FUNCTION, false),
        (B::FUNCTION, B::LEXICAL, true),
        (B::LEXICAL, B::FUNCTION, true),
        (B::CLASS, B::LEXICAL, true),
        (B::VAR, B::FUNCTION, true),
        (B::FUNCTION, B::VAR, true),
    ];
    for (first, second, expected) in cases {
        assert_eq!(
            conflicts(first, second),
            expected,
            "{first:?} then {second:?}"
        );
    }
}

#[test]
fn test_function_body_treats_functions_as_var() {
    let mut scopes = ScopeHandler::new(false);
    scopes.enter(ScopeFlags::PROGRAM);
    scopes.enter(ScopeFlags::FUNCTION);
    assert!(scopes.declare_name("f", BindingFlags::VAR, at(0)).is_empty());
    assert!(scopes.declare_name("f", BindingFlags::FUNCTION, at(5)).is_empty());
}

#[test]
fn test_var_conflicts_with_lexical_in_enclosing_block() {
    let mut scopes = block_in_function();
    scopes.declare_name("x", BindingFlags::LEXICAL, at(0));
    scopes.enter(ScopeFlags::OTHER);
    assert_eq!(scopes.declare_name("x", BindingFlags::VAR, at(20)).len(), 1);
}

// ============================================================================
// Type namespace
// ============================================================================

#[test]
fn test_interface_and_class_merge() {
    assert!(!conflicts(BindingFlags::CLASS, BindingFlags::TS_INTERFACE));
    assert!(!conflicts(BindingFlags::TS_INTERFACE, BindingFlags::CLASS));
    assert!(!conflicts(BindingFlags::TS_INTERFACE, BindingFlags::TS_INTERFACE));
}

#[test]
fn test_type_alias_conflicts() {
    assert!(conflicts(BindingFlags::TS_TYPE, BindingFlags::CLASS));
    assert!(conflicts(BindingFlags::TS_TYPE, BindingFlags::TS_TYPE));
    assert!(!conflicts(BindingFlags::TS_TYPE, BindingFlags::LEXICAL));
}

#[test]
fn test_enum_merging() {
    assert!(!conflicts(BindingFlags::TS_ENUM, BindingFlags::TS_ENUM));
    assert!(!conflicts(BindingFlags::TS_CONST_ENUM, BindingFlags::TS_CONST_ENUM));
    assert!(conflicts(BindingFlags::TS_ENUM, BindingFlags::TS_CONST_ENUM));
    assert!(conflicts(BindingFlags::TS_CONST_ENUM, BindingFlags::TS_ENUM));
    assert!(conflicts(BindingFlags::TS_ENUM, BindingFlags::VAR));
}

#[test]
fn test_import_equals_duplicates() {
    let mut scopes = module_scope();
    assert!(scopes.declare_name("a", BindingFlags::TS_TYPE_IMPORT, at(0)).is_empty());
    assert_eq!(scopes.declare_name("a", BindingFlags::TS_TYPE_IMPORT, at(9)).len(), 1);

    // A namespace body may shadow an outer import.
    scopes.enter(ScopeFlags::TS_MODULE);
    assert!(scopes.declare_name("a", BindingFlags::TS_TYPE_IMPORT, at(20)).is_empty());
    assert!(scopes.has_import("a", true));
    scopes.exit();
    assert!(scopes.has_import("a", false));
}

// ============================================================================
// Exports
// ============================================================================

#[test]
fn test_export_of_type_and_import_is_defined() {
    let mut scopes = module_scope();
    scopes.declare_name("T", BindingFlags::TS_INTERFACE, at(0));
    scopes.declare_name("ns", BindingFlags::TS_TYPE_IMPORT, at(5));
    scopes.declare_name("Ambient", BindingFlags::TS_AMBIENT, at(8));
    scopes.check_identifier_reference("T", at(10));
    scopes.check_identifier_reference("ns", at(12));
    scopes.check_identifier_reference("Ambient", at(14));
    assert!(scopes.undefined_export_errors().is_empty());
}

#[test]
fn test_undefined_exports_in_source_order() {
    let mut scopes = module_scope();
    scopes.check_identifier_reference("b", at(3));
    scopes.check_identifier_reference("a", at(7));
    let errors = scopes.undefined_export_errors();
    let positions: Vec<u32> = errors.iter().map(|e| e.pos()).collect();
    assert_eq!(positions, vec![3, 7]);
}

#[test]
fn test_var_in_nested_block_defines_export() {
    let mut scopes = module_scope();
    scopes.check_identifier_reference("v", at(0));
    scopes.enter(ScopeFlags::OTHER);
    scopes.declare_name("v", BindingFlags::VAR, at(20));
    scopes.exit();
    assert!(scopes.undefined_export_errors().is_empty());
}

#[test]
fn test_snapshot_is_independent() {
    let mut scopes = module_scope();
    scopes.declare_name("kept", BindingFlags::LEXICAL, at(0));
    let saved = scopes.clone();
    scopes.declare_name("dropped", BindingFlags::LEXICAL, at(5));
    scopes = saved;
    assert!(scopes.is_value_in_scope("kept"));
    assert!(!scopes.is_value_in_scope("dropped"));
}
