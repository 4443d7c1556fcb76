//! Tests for overload resolution and specificity

use super::{check_ok, validation_errors};
use crate::functions::specificity::{complexity_score, FunctionSpecificityDescriptor};
use crate::functions::FunctionId;
use crate::{check_sources, CallResolution, CheckedProgram, CheckerConfig, SpecificityComparison, ValidationError};
use basalt_parser::parse_type_signature;
use pretty_assertions::assert_eq;

/// Functions the call sites inside `caller` were bound to
fn direct_targets(checked: &CheckedProgram, caller: &str) -> Vec<FunctionId> {
    let caller = checked.find_functions(caller)[0];
    checked
        .call_resolutions()
        .iter()
        .filter(|((function, _), _)| *function == caller)
        .filter_map(|(_, resolution)| match resolution {
            CallResolution::Direct(id) => Some(*id),
            CallResolution::Adoption(_) => None,
        })
        .collect()
}

#[test]
fn test_non_generic_overload_beats_generic_one() {
    // `g` only type checks when the `Int` overload is picked
    let checked = check_ok(
        r#"
        package main;
        func f<T>(x: T) -> Bool { return true; }
        func f(x: Int) -> Int { return x; }
        func g() -> Int { return f(1); }
        "#,
    );
    assert_eq!(direct_targets(&checked, "g"), vec![FunctionId(1)]);
    assert!(checked.find_functions("f<Int>").is_empty());
}

#[test]
fn test_preference_does_not_depend_on_declaration_order() {
    let checked = check_ok(
        r#"
        package main;
        func f(x: Int) -> Int { return x; }
        func f<T>(x: T) -> Bool { return true; }
        func g() -> Int { return f(1); }
        "#,
    );
    assert_eq!(direct_targets(&checked, "g"), vec![FunctionId(0)]);
}

#[test]
fn test_exact_match_beats_union_parameter() {
    check_ok(
        r#"
        package main;
        union Number = Int | Float;
        func f(x: Number) -> Bool { return true; }
        func f(x: Int) -> Int { return x; }
        func exact() -> Int { return f(1); }
        func widened() -> Bool { return f(2.5); }
        "#,
    );
}

#[test]
fn test_equally_specific_candidates_are_ambiguous() {
    let errors = validation_errors(
        r#"
        package main;
        func f<T>(x: T, y: Int) { }
        func f<U>(x: Int, y: U) { }
        func g() { f(1, 2); }
        "#,
    );
    match errors.as_slice() {
        [ValidationError::AmbiguousOverload {
            function_name,
            candidates,
            ..
        }] => {
            assert_eq!(function_name, "f");
            assert_eq!(candidates, &vec!["f<T>(T, Int)".to_string(), "f<U>(Int, U)".to_string()]);
        }
        other => panic!("expected an ambiguity, got {other:?}"),
    }
}

#[test]
fn test_unmatched_call_lists_argument_types() {
    let errors = validation_errors(
        r#"
        package main;
        func f(x: Int) { }
        func g() { f(true, 'c'); f(false); }
        "#,
    );
    let reported: Vec<String> = errors
        .iter()
        .map(|error| match error {
            ValidationError::NoMatchingOverload { argument_types, .. } => argument_types.clone(),
            other => panic!("unexpected error {other:?}"),
        })
        .collect();
    assert_eq!(reported, vec!["Bool, Char", "Bool"]);
}

#[test]
fn test_explicit_generics_are_not_rebound() {
    check_ok(
        r#"
        package main;
        func wrap<T>(x: T) -> $T { var items: $T; return items; }
        func g() -> $Int { return wrap<Int>(1); }
        "#,
    );

    let errors = validation_errors(
        r#"
        package main;
        func wrap<T>(x: T) -> $T { var items: $T; return items; }
        func g() { wrap<Float>(1); }
        "#,
    );
    assert!(matches!(errors.as_slice(), [ValidationError::NoMatchingOverload { .. }]));
}

#[test]
fn test_instantiations_are_shared_between_call_sites() {
    let checked = check_ok(
        r#"
        package main;
        func id<T>(x: T) -> T { return x; }
        func g() {
            var a: Int = id(1);
            var b: Int = id(a);
            var c: Float = id(2.5);
        }
        "#,
    );
    let int_instances = checked.find_functions("id<Int>");
    assert_eq!(int_instances.len(), 1);
    assert_eq!(checked.find_functions("id<Float>").len(), 1);
    assert!(checked.find_functions("id").is_empty());

    let targets = direct_targets(&checked, "g");
    assert_eq!(targets.len(), 3);
    assert_eq!(targets[0], int_instances[0]);
    assert_eq!(targets[1], int_instances[0]);

    let record = checked.program().function(int_instances[0]).unwrap();
    assert_eq!(record.instantiated_from, Some(FunctionId(0)));
    assert_eq!(record.instantiation_depth, 1);
    checked.assert_no_generics_leaked().unwrap();
}

#[test]
fn test_imported_and_qualified_calls_resolve() {
    let checked = check_sources(
        &[
            ("main.bs", "package main; import geo; func g() -> Int { return scale(1) + geo::scale(2); }"),
            ("geo.bs", "package geo; func scale(x: Int) -> Int { return x * 2; }"),
        ],
        CheckerConfig::default(),
    )
    .unwrap();
    let scale = checked.find_functions("scale");
    assert_eq!(direct_targets(&checked, "g"), vec![scale[0], scale[0]]);
}

#[test]
fn test_unbounded_instantiation_is_cut_off() {
    let errors = validation_errors(
        r#"
        package main;
        func grow<T>(x: T) -> Int { return grow<#T>(&x); }
        func main() { var n: Int = grow(1); }
        "#,
    );
    assert!(
        errors
            .iter()
            .any(|error| matches!(error, ValidationError::InstantiationDepthExceeded { limit: 64, .. })),
        "expected the depth guard to trigger, got {errors:?}"
    );
}

#[test]
fn test_specificity_criteria_order() {
    let generic = FunctionSpecificityDescriptor {
        is_generic: true,
        arguments_types_complexity_score: 1,
        ..FunctionSpecificityDescriptor::default()
    };
    let concrete = FunctionSpecificityDescriptor {
        arguments_types_complexity_score: 1,
        ..FunctionSpecificityDescriptor::default()
    };
    assert_eq!(concrete.compare_with(&generic), SpecificityComparison::MoreSpecific);
    assert_eq!(generic.compare_with(&concrete), SpecificityComparison::LessSpecific);

    // A conversion outweighs genericity
    let converting = FunctionSpecificityDescriptor {
        number_of_possible_type_conversions: 1,
        ..concrete.clone()
    };
    assert_eq!(generic.compare_with(&converting), SpecificityComparison::MoreSpecific);

    let reusing = FunctionSpecificityDescriptor {
        generic_parameter_reuses: 1,
        ..generic.clone()
    };
    assert_eq!(reusing.compare_with(&generic), SpecificityComparison::MoreSpecific);
    assert_eq!(generic.compare_with(&generic), SpecificityComparison::EquallySpecific);
}

#[test]
fn test_complexity_score_counts_structure() {
    let score = |source: &str| complexity_score(&parse_type_signature(source).unwrap());
    assert_eq!(score("Int"), 1);
    assert_eq!(score("#Int"), 2);
    assert_eq!(score("[4]$Char"), 3);
    assert_eq!(score("Pair<Int, #Int>"), 1 + 2 + 1 + 2);
    assert_eq!(score("Int | Float"), 3);
}
