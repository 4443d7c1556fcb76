// Definition reading
// Covers packages, imports, structs, unions, aliases and function signatures

use basalt_parser::ast::*;
use basalt_parser::parse_file;
use pretty_assertions::assert_eq;

#[test]
fn test_package_and_imports() {
    let input = r#"
        package geometry;
        import math;
        import collections;
    "#;

    let file = parse_file("geometry.basalt", input).unwrap();
    assert_eq!(file.filename, "geometry.basalt");
    assert_eq!(file.package_name, "geometry");
    assert_eq!(file.imports, vec!["math".to_string(), "collections".to_string()]);
    assert!(file.type_defs.is_empty());
    assert!(file.func_defs.is_empty());
}

#[test]
fn test_missing_package_is_an_error() {
    assert!(parse_file("test.basalt", "struct A { x: Int; }").is_err());
}

#[test]
fn test_generic_struct_definition() {
    let input = r#"
        package main;
        struct Pair<T, U> {
            first: T;
            second: #U;
            count: Int;
        }
    "#;

    let file = parse_file("test.basalt", input).unwrap();
    assert_eq!(file.type_defs.len(), 1);

    match &file.type_defs[0] {
        TypeDefinition::Struct(def) => {
            assert_eq!(def.def_name, "Pair");
            assert_eq!(def.template_generics, vec!["T".to_string(), "U".to_string()]);
            assert_eq!(def.fields.len(), 3);
            assert_eq!(def.fields[0].field_name, "first");
            assert_eq!(def.fields[0].field_type, TypeSignature::template("T"));
            assert_eq!(
                def.fields[1].field_type,
                TypeSignature::pointer(TypeSignature::template("U"))
            );
            assert_eq!(def.fields[2].field_type, TypeSignature::int());
            assert_eq!(def.debug_info.line_number, 3);
        }
        other => panic!("Expected struct definition, got {other:?}"),
    }

    assert_eq!(file.type_defs[0].match_pattern(), "Pair<?,?>");
    assert!(file.type_defs[0].is_generic());
}

#[test]
fn test_union_and_alias_definitions() {
    let input = r#"
        package main;
        union Either<T, U> = T | U;
        union Number = Int | Float;
        alias Text = String;
        alias Maybe<T> = T | Nothing;
    "#;

    let file = parse_file("test.basalt", input).unwrap();
    assert_eq!(file.type_defs.len(), 4);

    match &file.type_defs[0] {
        TypeDefinition::Union(def) => {
            assert_eq!(def.def_name, "Either");
            assert_eq!(
                def.types,
                vec![TypeSignature::template("T"), TypeSignature::template("U")]
            );
        }
        other => panic!("Expected union definition, got {other:?}"),
    }

    match &file.type_defs[1] {
        TypeDefinition::Union(def) => {
            assert!(def.template_generics.is_empty());
            assert_eq!(def.types, vec![TypeSignature::int(), TypeSignature::float()]);
        }
        other => panic!("Expected union definition, got {other:?}"),
    }

    match &file.type_defs[2] {
        TypeDefinition::Alias(def) => {
            assert_eq!(def.alias_name, "Text");
            assert_eq!(def.aliased_type, TypeSignature::string());
        }
        other => panic!("Expected alias definition, got {other:?}"),
    }

    match &file.type_defs[3] {
        TypeDefinition::Alias(def) => {
            assert_eq!(
                def.aliased_type,
                TypeSignature::inline_union(vec![
                    TypeSignature::template("T"),
                    TypeSignature::custom("Nothing", vec![])
                ])
            );
        }
        other => panic!("Expected alias definition, got {other:?}"),
    }
}

#[test]
fn test_function_definition_signature() {
    let input = r#"
        package main;
        func swap<T>(a: #T, b: #T) {
            var tmp: T = #a;
            #a = #b;
            #b = tmp;
        }

        func add(a: Int, b: Int) -> Int {
            return a + b;
        }
    "#;

    let file = parse_file("test.basalt", input).unwrap();
    assert_eq!(file.func_defs.len(), 2);

    let swap = &file.func_defs[0];
    assert_eq!(swap.function_name, "swap");
    assert!(swap.is_generic());
    assert_eq!(swap.arguments.len(), 2);
    assert_eq!(
        swap.arguments[0].arg_type,
        TypeSignature::pointer(TypeSignature::template("T"))
    );
    assert_eq!(swap.return_type, None);
    assert_eq!(swap.code.len(), 3);
    match &swap.code[0] {
        Statement::VariableDeclaration(declaration) => {
            assert_eq!(declaration.typesignature, TypeSignature::template("T"));
        }
        other => panic!("Expected variable declaration, got {other:?}"),
    }

    let add = &file.func_defs[1];
    assert!(!add.is_generic());
    assert_eq!(add.return_type, Some(TypeSignature::int()));
    assert_eq!(add.signature(), "add(Int, Int) -> Int");
}

#[test]
fn test_comments_are_ignored() {
    let input = r#"
        // leading comment
        package main;
        /* block /* nested */ comment */
        struct Point {
            x: Int; // trailing
            y: Int;
        }
    "#;

    let file = parse_file("test.basalt", input).unwrap();
    assert_eq!(file.type_defs.len(), 1);
    assert_eq!(file.type_defs[0].name(), "Point");
}

#[test]
fn test_unique_ids_differ_by_location() {
    let input = r#"
        package main;
        struct A { x: Int; }
        struct B { x: Int; }
    "#;

    let file = parse_file("ids.basalt", input).unwrap();
    let first = file.type_defs[0].unique_id();
    let second = file.type_defs[1].unique_id();
    assert_ne!(first, second);
    assert!(first.starts_with("ids.basalt:3:"));
    assert!(first.ends_with(":A"));
}
