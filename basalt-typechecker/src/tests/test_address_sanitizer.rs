//! Tests for the address sanitizer

use super::validation_errors;
use crate::preprocessor::address_sanitizer::is_addressable;
use crate::preprocessor::AddressSanitizer;
use crate::{CompilationError, ValidationError};
use basalt_parser::{parse_expression, parse_file};

fn sanitize(body: &str) -> Vec<CompilationError> {
    let source = format!(
        "package main; struct Point {{ x: Int; }} func f(x: Int, a: [2]Int, s: Point, p: #Int) {{ {body} }}"
    );
    let file = parse_file("main.bs", &source).expect("fixture should parse");
    AddressSanitizer::new(&file.func_defs[0]).visit_function()
}

#[test]
fn test_storage_locations_are_addressable() {
    for source in ["x", "a[0]", "s.x", "#p", "#p as Int", "v is Int", "s.x.y[1]"] {
        let expression = parse_expression(source).unwrap();
        assert!(is_addressable(&expression), "`{source}` should be addressable");
    }
}

#[test]
fn test_temporaries_are_not_addressable() {
    for source in ["1", "x + 1", "f()", "&x", "-x", "[1]Int { 1 }", "f() is Int", "\"text\""] {
        let expression = parse_expression(source).unwrap();
        assert!(!is_addressable(&expression), "`{source}` should not be addressable");
    }
}

#[test]
fn test_every_statement_kind_is_visited() {
    assert!(sanitize("var q: #Int = &x; const r: #Int = &a[0]; p = &s.x; f(&x, a, s, &#p);").is_empty());

    let errors = sanitize(
        r#"
        var q: #Int = &(x + 1);
        if (true) { p = &f(x, a, s, p); }
        while (true) { var r: ##Int = &&x; }
        return;
        "#,
    );
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().all(|error| matches!(
        error,
        CompilationError::Validation(ValidationError::AddressOfTemporary { .. })
    )));
}

#[test]
fn test_address_of_temporaries_fails_the_program() {
    let errors = validation_errors(
        r#"
        package main;
        func seven() -> Int { return 7; }
        func f() { const p: #Int = &seven(); }
        "#,
    );
    assert!(matches!(errors.as_slice(), [ValidationError::AddressOfTemporary { .. }]));
}
