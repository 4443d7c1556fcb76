// Type signature reading and display
// Covers primitives, wrappers, custom types, unions and template detection

use basalt_parser::ast::*;
use basalt_parser::{parse_type_signature, parse_type_signature_with_generics};
use pretty_assertions::assert_eq;

#[test]
fn test_primitive_types() {
    for kind in PrimitiveKind::ALL {
        let parsed = parse_type_signature(kind.name()).unwrap();
        assert_eq!(parsed, TypeSignature::primitive(kind));
    }
}

#[test]
fn test_primitive_prefix_is_a_custom_type() {
    let parsed = parse_type_signature("Integer").unwrap();
    assert_eq!(parsed, TypeSignature::custom("Integer", vec![]));
}

#[test]
fn test_wrappers() {
    assert_eq!(
        parse_type_signature("#Int").unwrap(),
        TypeSignature::pointer(TypeSignature::int())
    );
    assert_eq!(
        parse_type_signature("$Char").unwrap(),
        TypeSignature::slice(TypeSignature::char())
    );
    assert_eq!(
        parse_type_signature("[16]Float").unwrap(),
        TypeSignature::array(16, TypeSignature::float())
    );
    assert_eq!(
        parse_type_signature("#[4]$Bool").unwrap(),
        TypeSignature::pointer(TypeSignature::array(
            4,
            TypeSignature::slice(TypeSignature::bool())
        ))
    );
}

#[test]
fn test_package_prefixed_generic_custom_type() {
    let parsed = parse_type_signature("collections::List<Int>").unwrap();
    match &parsed {
        TypeSignature::Custom(custom) => {
            assert_eq!(custom.package_prefix.as_deref(), Some("collections"));
            assert_eq!(custom.type_name, "List");
            assert_eq!(custom.type_parameters, vec![TypeSignature::int()]);
            assert_eq!(custom.match_pattern(), "List<?>");
        }
        other => panic!("Expected custom type, got {other:?}"),
    }
}

#[test]
fn test_inline_union_equality_ignores_order() {
    let left = parse_type_signature("Int | String | Float").unwrap();
    let right = parse_type_signature("Float | Int | String").unwrap();
    assert_eq!(left, right);
    assert_ne!(left, parse_type_signature("Int | String").unwrap());
}

#[test]
fn test_union_under_wrapper_needs_parentheses() {
    let parsed = parse_type_signature("#(Int | Float)").unwrap();
    assert_eq!(
        parsed,
        TypeSignature::pointer(TypeSignature::inline_union(vec![
            TypeSignature::int(),
            TypeSignature::float()
        ]))
    );
    assert_eq!(parsed.to_string(), "#(Int | Float)");

    let unparenthesized = parse_type_signature("#Int | Float").unwrap();
    assert!(matches!(unparenthesized, TypeSignature::InlineUnion(_)));
}

#[test]
fn test_generic_names_become_templates() {
    let generics = vec!["T".to_string(), "U".to_string()];
    let parsed = parse_type_signature_with_generics("Pair<T, #U>", &generics).unwrap();
    assert!(parsed.is_generic());
    assert_eq!(parsed.count_template_leaves(), 2);
    assert_eq!(
        parsed,
        TypeSignature::custom(
            "Pair",
            vec![
                TypeSignature::template("T"),
                TypeSignature::pointer(TypeSignature::template("U"))
            ]
        )
    );

    let not_generic = parse_type_signature("Pair<T, #U>").unwrap();
    assert!(!not_generic.is_generic());
}

#[test]
fn test_display_round_trip() {
    let sources = [
        "Int",
        "RawString",
        "#Int",
        "$Char",
        "[3]Float",
        "#[4]$Bool",
        "Pair<Int, String>",
        "geometry::Point",
        "collections::Map<String, #(Int | Float)>",
        "Int | Float | Bool",
        "[2](Int | Char)",
        "List<List<$Int>>",
    ];

    for source in sources {
        let parsed = parse_type_signature(source).unwrap();
        let reparsed = parse_type_signature(&parsed.to_string()).unwrap();
        assert_eq!(parsed, reparsed, "round trip failed for {source}");
    }
}

#[test]
fn test_debug_info_points_at_the_type() {
    let parsed = parse_type_signature("  #Int").unwrap();
    let info = parsed.debug_info();
    assert_eq!(info.line_number, 1);
    assert_eq!(info.tok_number, 3);
    assert_eq!(info.char_pos, 2);
}

#[test]
fn test_invalid_type_signature_is_an_error() {
    assert!(parse_type_signature("#").is_err());
    assert!(parse_type_signature("[x]Int").is_err());
    assert!(parse_type_signature("lowercase").is_err());
}
