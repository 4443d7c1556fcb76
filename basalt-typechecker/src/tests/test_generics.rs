//! Tests for generic substitution rules and the instantiation engine

use super::index;
use crate::functions::FunctionId;
use crate::generics::{GenericSubstitutionRules, GenericsInstantiationEngine};
use basalt_parser::{Expression, Statement, TypeDefinition, TypeSignature};
use pretty_assertions::assert_eq;

const GENERIC_CODE: &str = r#"
package main;
struct Pair<A, B> { first: A; second: #B; }
union Maybe<T> = T | Bool;
alias Many<T> = $T;

func swap<A, B>(pair: Pair<A, B>, extra: [2]A) -> Pair<B, A> {
    var copy: Pair<A, B> = pair;
    const items: $A = extra as $A;
    if (true) {
        var inner: #B = copy.second;
    }
    return make<B, A>(#copy.second, extra[0]);
}
"#;

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

fn rules(values: &[(&str, TypeSignature)]) -> GenericSubstitutionRules {
    let mut rules = GenericSubstitutionRules::new();
    for (name, replacement) in values {
        rules.set(name, replacement.clone());
    }
    rules
}

fn statement_types(code: &[Statement], found: &mut Vec<TypeSignature>) {
    for statement in code {
        match statement {
            Statement::VariableDeclaration(declaration) => found.push(declaration.typesignature.clone()),
            Statement::ConstDeclaration(declaration) => {
                found.push(declaration.typesignature.clone());
                if let Expression::TypeOperator(operator) = &declaration.value {
                    found.push(operator.typesignature.clone());
                }
            }
            Statement::Conditional(conditional) => {
                statement_types(&conditional.then_branch, found);
                statement_types(&conditional.else_branch, found);
            }
            Statement::Return(return_statement) => {
                if let Some(Expression::FunctionCall(call)) = &return_statement.return_value {
                    found.extend(call.instantiated_generics.iter().cloned());
                }
            }
            _ => {}
        }
    }
}

#[test]
fn test_rules_zip_names_with_replacements() {
    let zipped = GenericSubstitutionRules::zip_components_vectors(
        &names(&["A", "B"]),
        &[TypeSignature::int(), TypeSignature::bool()],
    )
    .unwrap();
    assert_eq!(zipped.get("A"), Some(&TypeSignature::int()));
    assert_eq!(zipped.get("B"), Some(&TypeSignature::bool()));
    assert!(zipped.covers(&names(&["B", "A"])));
    assert!(!zipped.covers(&names(&["A", "C"])));
    assert_eq!(
        zipped.replacements_for(&names(&["B", "A"])),
        Some(vec![TypeSignature::bool(), TypeSignature::int()])
    );
}

#[test]
#[cfg_attr(debug_assertions, should_panic(expected = "internal error"))]
fn test_zipping_vectors_of_different_lengths_is_an_internal_error() {
    let zipped = GenericSubstitutionRules::zip_components_vectors(&names(&["A", "B"]), &[TypeSignature::int()]);
    assert!(zipped.is_err());
}

#[test]
fn test_merging_rules_rejects_conflicts() {
    let mut merged = rules(&[("A", TypeSignature::int())]);
    assert!(merged.merge(&rules(&[("A", TypeSignature::int()), ("B", TypeSignature::char())])));
    assert_eq!(merged.len(), 2);
    assert!(!merged.merge(&rules(&[("B", TypeSignature::float())])));
}

#[test]
fn test_function_instantiation_leaves_no_templates() {
    let program = index(&[("main.bs", GENERIC_CODE)]);
    let generic = program.function(FunctionId(0)).unwrap().definition.clone();
    assert!(generic.is_generic());

    let rules = rules(&[
        ("A", TypeSignature::int()),
        ("B", TypeSignature::custom("Point", vec![])),
    ]);
    let instantiated = GenericsInstantiationEngine::new(&rules).instantiate_generic_function(&generic, "swap<Int,Point>");

    assert_eq!(instantiated.function_name, "swap<Int,Point>");
    assert!(!instantiated.is_generic());
    assert!(instantiated.arguments.iter().all(|argument| !argument.arg_type.is_generic()));
    assert_eq!(
        instantiated.return_type,
        Some(TypeSignature::custom(
            "Pair",
            vec![TypeSignature::custom("Point", vec![]), TypeSignature::int()]
        ))
    );

    let mut found = Vec::new();
    statement_types(&instantiated.code, &mut found);
    assert_eq!(found.len(), 6);
    for type_signature in found {
        assert!(!type_signature.is_generic(), "`{type_signature}` still mentions generics");
    }
    // The generic original is left untouched
    assert!(generic.arguments[1].arg_type.is_generic());
}

#[test]
fn test_type_definition_instantiation_renames_and_substitutes() {
    let program = index(&[("main.bs", GENERIC_CODE)]);
    let engine_rules = rules(&[("A", TypeSignature::char()), ("B", TypeSignature::int()), ("T", TypeSignature::float())]);
    let engine = GenericsInstantiationEngine::new(&engine_rules);

    let definitions: Vec<TypeDefinition> = program
        .types()
        .definitions()
        .map(|(_, definition)| engine.instantiate_generic_typedefinition(definition, &format!("{}'", definition.name())))
        .collect();

    for definition in &definitions {
        assert!(!definition.is_generic());
        assert!(definition.name().ends_with('\''));
    }
    let TypeDefinition::Struct(pair) = &definitions[0] else {
        panic!("expected a struct");
    };
    assert_eq!(pair.fields[1].field_type, TypeSignature::pointer(TypeSignature::int()));
    let TypeDefinition::Union(maybe) = &definitions[1] else {
        panic!("expected a union");
    };
    assert_eq!(maybe.types, vec![TypeSignature::float(), TypeSignature::bool()]);
    let TypeDefinition::Alias(many) = &definitions[2] else {
        panic!("expected an alias");
    };
    assert_eq!(many.aliased_type, TypeSignature::slice(TypeSignature::float()));
}
