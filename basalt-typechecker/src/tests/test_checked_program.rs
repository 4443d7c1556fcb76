//! Tests for the checked program handed to later stages

use super::check_ok;
use crate::{CallResolution, TypeKey};
use basalt_parser::{Statement, TypeDefinition, TypeSignature};
use pretty_assertions::assert_eq;

const PROGRAM: &str = r#"
package main;
struct Pair<A, B> { first: A; second: B; }
union Number = Int | Float;

func swap<A, B>(p: Pair<A, B>) -> Pair<B, A> {
    var swapped: Pair<B, A>;
    swapped.first = p.second;
    swapped.second = p.first;
    return swapped;
}

func main() -> Int {
    var p: Pair<Int, Float>;
    p.first = 1;
    var q: Pair<Float, Int> = swap(p);
    const total: Int = q.second + 1;
    return total;
}
"#;

#[test]
fn test_concrete_functions_include_instantiations() {
    let checked = check_ok(PROGRAM);
    let names: Vec<String> = checked
        .concrete_functions()
        .map(|(_, record)| record.definition.function_name.clone())
        .collect();
    assert_eq!(names, vec!["main", "swap<Int,Float>"]);

    let swap = checked.find_functions("swap<Int,Float>")[0];
    let record = checked.program().function(swap).unwrap();
    assert_eq!(
        record.definition.return_type,
        Some(TypeSignature::custom("Pair", vec![TypeSignature::float(), TypeSignature::int()]))
    );
    checked.assert_no_generics_leaked().unwrap();
}

#[test]
fn test_generic_types_are_instantiated_on_use() {
    let checked = check_ok(PROGRAM);
    let keys: Vec<String> = checked
        .concrete_type_definitions()
        .map(|(key, _)| key.to_string())
        .collect();
    assert!(keys.contains(&"main::Pair<Int,Float>".to_string()), "{keys:?}");
    assert!(keys.contains(&"main::Pair<Float,Int>".to_string()), "{keys:?}");
    assert!(keys.contains(&"main::Number".to_string()), "{keys:?}");
    assert!(!keys.iter().any(|key| key == "main::Pair<2>"));

    let instance = TypeKey::instance("main", "Pair", vec!["Float".to_string(), "Int".to_string()]);
    let definition = checked.program().types().get(&instance).unwrap();
    let TypeDefinition::Struct(pair) = definition else {
        panic!("expected a struct");
    };
    assert_eq!(pair.fields[0].field_type, TypeSignature::float());
}

#[test]
fn test_call_sites_and_expression_types_are_recorded() {
    let checked = check_ok(PROGRAM);
    let main = checked.find_functions("main")[0];
    let swap = checked.find_functions("swap<Int,Float>")[0];
    let definition = &checked.program().function(main).unwrap().definition;

    let Statement::VariableDeclaration(declaration) = &definition.code[2] else {
        panic!("expected the declaration of `q`");
    };
    let call = declaration.initial_value.as_ref().unwrap();
    assert_eq!(
        checked.call_resolution(main, call.debug_info()),
        Some(&CallResolution::Direct(swap))
    );
    assert_eq!(
        checked.expression_type(main, call.debug_info()),
        Some(&TypeSignature::custom("Pair", vec![TypeSignature::float(), TypeSignature::int()]))
    );

    let Statement::ConstDeclaration(total) = &definition.code[3] else {
        panic!("expected the declaration of `total`");
    };
    assert_eq!(checked.expression_type(main, total.value.debug_info()), Some(&TypeSignature::int()));

    // Bodies of instantiations are recorded under their own id
    assert!(checked.expression_types().keys().any(|(function, _)| *function == swap));
    assert!(checked.call_resolutions().keys().all(|(function, _)| *function == main));
}

#[test]
fn test_into_program_keeps_the_registers() {
    let checked = check_ok(PROGRAM);
    let functions = checked.program().functions().len();
    let program = checked.into_program();
    assert_eq!(program.functions().len(), functions);
    assert_eq!(program.config().main_package, "main");
}
