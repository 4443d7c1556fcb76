//! Tests for the type definitions register

use super::{check, index};
use crate::registry::{strip_package_prefixes, TypeKey};
use crate::{CompilationError, ValidationError};
use basalt_parser::{parse_type_signature, DebugInfo, TypeDefinition, TypeSignature};
use pretty_assertions::assert_eq;

const SHAPES: &str = r#"
package main;
struct Point { x: Int; y: Int; }
struct Pair<A, B> { first: A; second: B; }
union Number = Int | Float;
alias Coordinate = Point;
alias Position = Coordinate;
alias Numbers = $Number;
"#;

/// A signature as if written in `main.bs`
fn sig(source: &str) -> TypeSignature {
    parse_type_signature(source)
        .expect("signature should parse")
        .with_debug_info(&DebugInfo::in_file("main.bs"))
}

#[test]
fn test_declared_definitions_are_stored_by_structural_key() {
    let program = index(&[("main.bs", SHAPES)]);
    let keys: Vec<String> = program
        .types()
        .declared_keys()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        keys,
        vec![
            "main::Point",
            "main::Pair<2>",
            "main::Number",
            "main::Coordinate",
            "main::Position",
            "main::Numbers",
        ]
    );
    assert!(program.types().get(&TypeKey::pattern("main", "Pair", 2)).is_some());
    assert!(program.types().get(&TypeKey::pattern("main", "Pair", 1)).is_none());
}

#[test]
fn test_retrieve_instantiates_generic_definitions_once() {
    let mut program = index(&[("main.bs", SHAPES)]);
    let TypeSignature::Custom(pair) = sig("Pair<Int, Point>") else {
        panic!("expected a custom type");
    };

    let definition = program.retrieve_type_definition(&pair).unwrap();
    let TypeDefinition::Struct(struct_def) = &definition else {
        panic!("expected a struct definition");
    };
    assert_eq!(struct_def.def_name, "Pair<Int,Point>");
    assert!(struct_def.template_generics.is_empty());
    assert_eq!(struct_def.fields[0].field_type, TypeSignature::int());
    assert_eq!(struct_def.fields[1].field_type, TypeSignature::custom("Point", vec![]));

    let instance = TypeKey::instance("main", "Pair", vec!["Int".to_string(), "main::Point".to_string()]);
    assert!(program.types().get(&instance).is_some());

    let count = program.types().len();
    let again = program.retrieve_type_definition(&pair).unwrap();
    assert_eq!(again, definition);
    assert_eq!(program.types().len(), count);
}

#[test]
fn test_references_from_generic_code_are_not_memoized() {
    let mut program = index(&[("main.bs", SHAPES)]);
    let count = program.types().len();
    let pair = TypeSignature::custom("Pair", vec![TypeSignature::template("T"), TypeSignature::int()])
        .with_debug_info(&DebugInfo::in_file("main.bs"));
    let TypeSignature::Custom(pair) = pair else {
        unreachable!()
    };

    let definition = program.retrieve_type_definition(&pair).unwrap();
    assert!(definition.template_generics().is_empty());
    assert_eq!(program.types().len(), count);
}

#[test]
fn test_unknown_type_is_unresolved() {
    let mut program = index(&[("main.bs", SHAPES)]);
    let error = program.verify_that_the_type_exists(&sig("#[4]Missing")).unwrap_err();
    match error {
        CompilationError::Validation(ValidationError::UnresolvedType { type_name, .. }) => {
            assert_eq!(type_name, "Missing")
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_wrong_arity_is_unresolved() {
    let mut program = index(&[("main.bs", SHAPES)]);
    assert!(program.verify_that_the_type_exists(&sig("Pair<Int>")).is_err());
    assert!(program.verify_that_the_type_exists(&sig("Pair<Int, Float>")).is_ok());
}

#[test]
fn test_unaliasing_follows_chains_and_is_idempotent() {
    let mut program = index(&[("main.bs", SHAPES)]);
    for source in ["Position", "Coordinate", "Point", "Numbers", "Int", "#Position", "Number"] {
        let once = program.unalias_type(&sig(source)).unwrap();
        let twice = program.unalias_type(&once).unwrap();
        assert_eq!(once, twice, "unaliasing `{source}` is not idempotent");
    }
    assert_eq!(
        program.unalias_type(&sig("Position")).unwrap(),
        TypeSignature::custom("Point", vec![])
    );
    // Only the outermost alias is resolved
    assert_eq!(program.unalias_type(&sig("#Position")).unwrap(), sig("#Position"));
}

#[test]
fn test_unaliasing_stops_on_alias_cycles() {
    let mut program = index(&[("main.bs", "package main; alias Left = Right; alias Right = Left;")]);
    match program.unalias_type(&sig("Left")) {
        Err(CompilationError::Validation(ValidationError::CyclicTypeDependency { chain, .. })) => {
            assert_eq!(chain, "Left -> Right -> Left");
        }
        other => panic!("expected a cycle, got {other:?}"),
    }
}

#[test]
fn test_qualified_signatures_are_canonical() {
    let mut program = index(&[("main.bs", SHAPES)]);
    assert_eq!(program.qualified_signature(&sig("Point")).unwrap(), "main::Point");
    assert_eq!(
        program.qualified_signature(&sig("Pair<Int, #Point>")).unwrap(),
        "main::Pair<Int,#main::Point>"
    );
    assert_eq!(
        program.qualified_signature(&sig("Float | Point | Int")).unwrap(),
        program.qualified_signature(&sig("Int | Float | Point")).unwrap()
    );
    assert_eq!(program.qualified_signature(&sig("$(Int | Bool)")).unwrap(), "$(Bool | Int)");
}

#[test]
fn test_union_alternatives_are_flattened_for_assignment() {
    let mut program = index(&[(
        "main.bs",
        r#"
        package main;
        union Number = Int | Float;
        union Scalar = Number | Bool | Int;
        "#,
    )]);
    let compatible = program
        .types
        .fetch_non_union_compatible_types_for_union_assignment(&sig("Scalar"), &program.files)
        .unwrap();
    assert_eq!(compatible, vec![TypeSignature::int(), TypeSignature::float(), TypeSignature::bool()]);
    assert!(program.types.is_union(&sig("Scalar"), &program.files).unwrap());
    assert!(!program.types.is_union(&sig("Int"), &program.files).unwrap());
}

#[test]
fn test_strip_package_prefixes() {
    assert_eq!(strip_package_prefixes("main::Pair<Int,#geo::Point>"), "Pair<Int,#Point>");
    assert_eq!(strip_package_prefixes("$(Bool | main::Point)"), "$(Bool | Point)");
}

#[test]
fn test_duplicate_definitions_are_all_reported() {
    let errors = match check(
        r#"
        package main;
        struct Point { x: Int; }
        union Point = Int | Float;
        alias Pair<A> = A;
        alias Pair<B> = $B;
        struct Pair { x: Int; }
        "#,
    ) {
        Ok(_) => panic!("duplicates should be rejected"),
        Err(errors) => errors,
    };
    let duplicated: Vec<String> = errors
        .iter()
        .filter_map(|error| match error {
            CompilationError::Validation(ValidationError::DuplicateTypeDefinition { type_name, .. }) => {
                Some(type_name.clone())
            }
            _ => None,
        })
        .collect();
    assert_eq!(duplicated, vec!["Point", "Pair<?>"]);
}

#[test]
fn test_builtin_names_are_reserved() {
    let errors = match check("package main; struct Int { value: Float; }") {
        Ok(_) => panic!("redefining Int should be rejected"),
        Err(errors) => errors,
    };
    assert!(matches!(
        errors.as_slice(),
        [CompilationError::Validation(ValidationError::ReservedTypeName { .. })]
    ));
}
