//! Tests for assignment compatibility between type signatures

use super::{check_ok, index};
use crate::assignment::AssignmentTypeChecker;
use crate::generics::GenericSubstitutionRules;
use crate::ProgramRepresentation;
use basalt_parser::{parse_type_signature, DebugInfo, TypeSignature};
use pretty_assertions::assert_eq;

const TYPES: &str = r#"
package main;
struct Point { x: Int; y: Int; }
struct Pair<A, B> { first: A; second: B; }
union Number = Int | Float;
alias Coordinate = Point;
alias Text = String;
"#;

fn sig(source: &str) -> TypeSignature {
    parse_type_signature(source)
        .expect("signature should parse")
        .with_debug_info(&DebugInfo::in_file("main.bs"))
}

fn assignable(program: &mut ProgramRepresentation, dest: &str, source: &str) -> bool {
    AssignmentTypeChecker::new(&mut program.types, &program.files)
        .validate_assignment(&sig(dest), &sig(source))
        .unwrap()
}

#[test]
fn test_identical_and_aliased_types_are_assignable() {
    let mut program = index(&[("main.bs", TYPES)]);
    let accepted = [
        ("Int", "Int"),
        ("Point", "Point"),
        ("Point", "Coordinate"),
        ("Coordinate", "Point"),
        ("Pair<Int, Point>", "Pair<Int, Coordinate>"),
        ("[3]Int", "[3]Int"),
        ("Text", "String"),
    ];
    for (dest, source) in accepted {
        assert!(assignable(&mut program, dest, source), "`{source}` should be assignable to `{dest}`");
    }
}

#[test]
fn test_mismatched_types_are_rejected() {
    let mut program = index(&[("main.bs", TYPES)]);
    let rejected = [
        ("Int", "Float"),
        ("Point", "Int"),
        ("[3]Int", "[4]Int"),
        ("Pair<Int, Int>", "Pair<Int, Float>"),
        ("#Int", "Int"),
        ("Int", "#Int"),
    ];
    for (dest, source) in rejected {
        assert!(!assignable(&mut program, dest, source), "`{source}` should not be assignable to `{dest}`");
    }
}

#[test]
fn test_unions_accept_their_alternatives() {
    let mut program = index(&[("main.bs", TYPES)]);
    assert!(assignable(&mut program, "Number", "Int"));
    assert!(assignable(&mut program, "Number", "Float"));
    assert!(!assignable(&mut program, "Number", "Bool"));
    assert!(assignable(&mut program, "Int | Point", "Coordinate"));
    // A narrower union fits when every alternative does
    assert!(assignable(&mut program, "Int | Float | Bool", "Number"));
    assert!(!assignable(&mut program, "Int | Bool", "Number"));
    assert!(!assignable(&mut program, "Int", "Number"));
}

#[test]
fn test_type_parameters_must_match_exactly() {
    let mut program = index(&[("main.bs", TYPES)]);
    // `Int` fits `Number`, but `Pair<Int, Int>` is not a `Pair<Number, Int>`
    assert!(!assignable(&mut program, "Pair<Number, Int>", "Pair<Int, Int>"));
    assert!(assignable(&mut program, "Pair<Number, Int>", "Pair<Number, Int>"));
}

#[test]
fn test_pointers_are_strict() {
    let mut program = index(&[("main.bs", TYPES)]);
    assert!(assignable(&mut program, "#Point", "#Coordinate"));
    assert!(!assignable(&mut program, "#Number", "#Int"));
    assert!(!assignable(&mut program, "#Int", "#Number"));
}

#[test]
fn test_deeply_nested_pointers_are_compared_level_by_level() {
    let mut program = index(&[("main.bs", TYPES)]);
    let deep = |leaf: &str| format!("{}{leaf}", "#".repeat(48));
    assert!(assignable(&mut program, &deep("Int"), &deep("Int")));
    assert!(assignable(&mut program, &deep("Point"), &deep("Coordinate")));
    assert!(!assignable(&mut program, &deep("Int"), &deep("Float")));
    assert!(!assignable(&mut program, &deep("Number"), &deep("Int")));

    let pointer = "#".repeat(40);
    check_ok(&format!(
        "package main; func f(a: {pointer}Int) {{ var b: {pointer}Int = a; }}"
    ));
}

#[test]
fn test_slices_accept_pointers_to_arrays() {
    let mut program = index(&[("main.bs", TYPES)]);
    assert!(assignable(&mut program, "$Int", "$Int"));
    assert!(assignable(&mut program, "$Int", "#[8]Int"));
    assert!(!assignable(&mut program, "$Int", "[8]Int"));
    assert!(!assignable(&mut program, "$Number", "#[8]Int"));
    assert!(!assignable(&mut program, "$Int", "#Int"));
}

#[test]
fn test_strings_accept_character_buffers_and_raw_strings() {
    let mut program = index(&[("main.bs", TYPES)]);
    assert!(assignable(&mut program, "String", "RawString"));
    assert!(assignable(&mut program, "String", "$Char"));
    assert!(assignable(&mut program, "String", "#[16]Char"));
    assert!(!assignable(&mut program, "String", "[16]Char"));
    assert!(!assignable(&mut program, "RawString", "String"));
    assert!(assignable(&mut program, "RawString", "RawString"));
}

#[test]
fn test_template_destinations_bind_then_widen() {
    let mut program = index(&[("main.bs", TYPES)]);
    let mut checker = AssignmentTypeChecker::new(&mut program.types, &program.files);
    let template = TypeSignature::template("T");

    assert!(checker.validate_assignment(&template, &sig("Int")).unwrap());
    assert_eq!(checker.rules().get("T"), Some(&TypeSignature::int()));

    // Already covered by the binding
    assert!(checker.validate_assignment(&template, &sig("Int")).unwrap());
    assert_eq!(checker.rules().get("T"), Some(&TypeSignature::int()));

    assert!(checker.validate_assignment(&template, &sig("Float")).unwrap());
    assert_eq!(
        checker.rules().get("T"),
        Some(&TypeSignature::inline_union(vec![TypeSignature::float(), TypeSignature::int()]))
    );
}

#[test]
fn test_template_bindings_flow_through_compound_signatures() {
    let mut program = index(&[("main.bs", TYPES)]);
    let mut checker = AssignmentTypeChecker::new(&mut program.types, &program.files);
    let dest = TypeSignature::pointer(TypeSignature::template("T"));

    assert!(checker.validate_assignment(&dest, &sig("#Point")).unwrap());
    assert_eq!(checker.rules().get("T"), Some(&TypeSignature::custom("Point", vec![])));
    // Pointers never widen their binding
    assert!(!checker.validate_assignment(&dest, &sig("#Int")).unwrap());

    let rules = checker.into_rules();
    assert_eq!(rules.len(), 1);
}

#[test]
fn test_explicit_type_arguments_are_locked() {
    let mut program = index(&[("main.bs", TYPES)]);
    let mut fixed = GenericSubstitutionRules::new();
    fixed.set("T", TypeSignature::int());
    let mut checker = AssignmentTypeChecker::with_fixed_rules(&mut program.types, &program.files, fixed);
    let template = TypeSignature::template("T");

    assert!(checker.validate_assignment(&template, &sig("Int")).unwrap());
    assert!(!checker.validate_assignment(&template, &sig("Float")).unwrap());
    assert_eq!(checker.rules().get("T"), Some(&TypeSignature::int()));
}
