//! Tests for cyclic type dependency detection

use super::{check_ok, validation_errors};
use crate::ValidationError;
use pretty_assertions::assert_eq;

fn cycles(source: &str) -> Vec<(String, String)> {
    validation_errors(source)
        .into_iter()
        .map(|error| match error {
            ValidationError::CyclicTypeDependency { entry_point, chain, .. } => (entry_point, chain),
            other => panic!("expected a cyclic dependency, got {other:?}"),
        })
        .collect()
}

#[test]
fn test_mutually_recursive_structs_are_reported_once() {
    let found = cycles(
        r#"
        package main;
        struct A { b: B; }
        struct B { a: A; }
        "#,
    );
    assert_eq!(found, vec![("A".to_string(), "A -> B -> A".to_string())]);
}

#[test]
fn test_pointers_and_slices_break_cycles() {
    check_ok(
        r#"
        package main;
        struct A { b: B; }
        struct B { a: #A; }
        struct Node { value: Int; next: #Node; children: $Node; }
        "#,
    );
}

#[test]
fn test_self_containment_through_arrays() {
    let found = cycles("package main; struct Grid { cells: [4]Grid; }");
    assert_eq!(found, vec![("Grid".to_string(), "Grid -> Grid".to_string())]);
}

#[test]
fn test_cycles_through_unions_and_aliases() {
    let found = cycles(
        r#"
        package main;
        union Tree = Int | Branch;
        struct Branch { left: Subtree; right: Int; }
        alias Subtree = Tree;
        "#,
    );
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].1, "Tree -> Branch -> Subtree -> Tree");
}

#[test]
fn test_cycles_through_generic_instantiations() {
    let found = cycles(
        r#"
        package main;
        struct Box<T> { value: T; }
        struct Loop { inner: Box<Loop>; }
        struct Fine { inner: Box<#Fine>; }
        "#,
    );
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].0, "Loop");
}

#[test]
fn test_pointer_targets_must_exist() {
    let errors = validation_errors("package main; struct S { p: #Missing; q: $Int; }");
    assert!(matches!(
        errors.as_slice(),
        [ValidationError::UnresolvedType { type_name, .. }] if type_name == "Missing"
    ));
}

#[test]
fn test_ever_growing_generic_instantiations_are_cut_off() {
    let errors = validation_errors(
        r#"
        package main;
        struct Grow<T> { inner: Grow<[1]T>; }
        struct Root { grow: Grow<Int>; }
        "#,
    );
    match errors.as_slice() {
        [ValidationError::TypeInstantiationDepthExceeded { type_name, limit, .. }] => {
            assert_eq!(type_name, "Grow");
            assert_eq!(*limit, crate::registry::MAX_TYPE_NESTING_DEPTH);
        }
        other => panic!("expected the nesting limit to trigger, got {other:?}"),
    }
}

#[test]
fn test_nested_generic_arguments_within_the_limit() {
    check_ok(
        r#"
        package main;
        struct Box<T> { value: T; }
        struct Shelf { boxes: Box<Box<Box<[4]Box<Int>>>>; }
        "#,
    );
}
