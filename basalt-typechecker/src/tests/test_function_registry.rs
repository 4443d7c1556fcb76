//! Tests for the function overloads register

use super::index;
use crate::functions::registry::overload_set_id;
use crate::functions::FunctionId;
use crate::{CompilationError, IndexingError};
use basalt_parser::parse_expression;
use basalt_parser::{DebugInfo, Expression};
use pretty_assertions::assert_eq;

const OVERLOADS: &str = r#"
package main;
func show(x: Int) { }
func show(x: Float) { }
func show<T>(x: T) { }
func show(x: Int, y: Int) { }
func main() { }
"#;

#[test]
fn test_functions_are_stored_in_arena_order() {
    let program = index(&[("main.bs", OVERLOADS)]);
    let names: Vec<String> = program
        .functions()
        .records()
        .map(|(id, record)| format!("{id} {}", record.definition.signature()))
        .collect();
    assert_eq!(program.functions().len(), 5);
    assert!(names[0].starts_with("fn#0 show(Int)"));
    assert!(names[2].starts_with("fn#2 show<T>(T)"));
    assert!(program.functions().records().all(|(_, record)| !record.is_instantiation()));
}

#[test]
fn test_overload_sets_group_by_generics_and_arity() {
    let program = index(&[("main.bs", OVERLOADS)]);
    let functions = program.functions();

    let plain = functions
        .retrieve_specific_overload_set(&overload_set_id("main", "show", 0, 1))
        .unwrap();
    // Generic overloads are reachable from calls without explicit generics
    assert_eq!(plain, &[FunctionId(0), FunctionId(1), FunctionId(2)]);

    let generic = functions
        .retrieve_specific_overload_set(&overload_set_id("main", "show", 1, 1))
        .unwrap();
    assert_eq!(generic, &[FunctionId(2)]);

    let binary = functions
        .retrieve_specific_overload_set(&overload_set_id("main", "show", 0, 2))
        .unwrap();
    assert_eq!(binary, &[FunctionId(3)]);
}

#[test]
fn test_call_sites_find_their_overload_sets() {
    let program = index(&[("main.bs", OVERLOADS)]);
    let Expression::FunctionCall(mut call) = parse_expression("show<Int>(1)").unwrap() else {
        panic!("expected a call");
    };
    call.debug_info = DebugInfo::in_file("main.bs");

    let ids = program
        .functions()
        .retrieve_overload_sets_ids(&call, program.files())
        .unwrap();
    assert_eq!(ids, vec!["main::show<1>(1)", "main::show<0>(1)"]);

    call.function_name = "missing".to_string();
    let ids = program
        .functions()
        .retrieve_overload_sets_ids(&call, program.files())
        .unwrap();
    assert!(ids.is_empty());
}

#[test]
fn test_main_functions_are_tracked_per_package() {
    let program = index(&[
        ("main.bs", OVERLOADS),
        ("tools.bs", "package tools; func main() { }"),
    ]);
    let mains = program.functions().main_functions();
    assert_eq!(mains.get("main"), Some(&vec![FunctionId(4)]));
    assert_eq!(mains.get("tools"), Some(&vec![FunctionId(5)]));
}

#[test]
fn test_missing_entries_are_indexing_errors() {
    let program = index(&[("main.bs", OVERLOADS)]);
    assert!(matches!(
        program.function(FunctionId(42)),
        Err(CompilationError::Indexing(IndexingError::MissingFunction { function_id: 42 }))
    ));
    assert!(matches!(
        program.functions().retrieve_specific_overload_set("main::nope<0>(0)"),
        Err(CompilationError::Indexing(IndexingError::MissingOverloadSet { .. }))
    ));
}
