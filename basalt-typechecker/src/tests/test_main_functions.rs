//! Tests for `main` function validation

use super::{check_ok, validation_errors};
use crate::{check_sources, CheckerConfig, CompilationError, ValidationError};
use pretty_assertions::assert_eq;

fn reasons(errors: &[ValidationError]) -> Vec<&str> {
    errors
        .iter()
        .map(|error| match error {
            ValidationError::InvalidMainFunction { reason, .. } => reason.as_str(),
            other => panic!("unexpected error {other:?}"),
        })
        .collect()
}

fn errors_with(config: CheckerConfig, sources: &[(&str, &str)]) -> Vec<CompilationError> {
    match check_sources(sources, config) {
        Ok(_) => panic!("expected the program to be rejected"),
        Err(errors) => errors,
    }
}

#[test]
fn test_valid_main_signatures() {
    check_ok("package main; func main() { }");
    check_ok("package main; func main() -> Int { return 0; }");
    check_ok("package main; alias Status = Int; func main() -> Status { return 0; }");
}

#[test]
fn test_main_is_optional_by_default() {
    check_ok("package main; func helper() { }");
}

#[test]
fn test_invalid_main_signatures() {
    let errors = validation_errors("package main; func main<T>(x: T) -> Bool { return true; }");
    assert_eq!(
        reasons(&errors),
        vec![
            "`main` cannot be generic",
            "`main` takes no arguments",
            "`main` must return `Int` or nothing, not `Bool`",
        ]
    );
}

#[test]
fn test_main_outside_the_main_package() {
    let sources = [
        ("main.bs", "package main; import tools; func main() { }"),
        ("tools.bs", "package tools; func main() { }"),
    ];
    let errors = errors_with(CheckerConfig::default(), &sources);
    assert_eq!(errors.len(), 2);
    assert!(matches!(
        &errors[0],
        CompilationError::Validation(ValidationError::InvalidMainFunction { reason, .. })
            if reason == "`main` must be defined in package `main`, not `tools`"
    ));
    assert!(matches!(
        &errors[1],
        CompilationError::Validation(ValidationError::MultipleMainFunctions { .. })
    ));

    // Only `tools` defines a `main` once the entry package is changed
    let errors = errors_with(
        CheckerConfig::default().with_main_package("tools"),
        &[("main.bs", "package main; func main() { }"), ("tools.bs", "package tools; func run() { }")],
    );
    assert_eq!(errors.len(), 1);
}

#[test]
fn test_several_mains_are_rejected() {
    let errors = validation_errors(
        r#"
        package main;
        func main() { }
        func main() -> Int { return 1; }
        "#,
    );
    match errors.as_slice() {
        [ValidationError::MultipleMainFunctions { previous, debug_info, .. }] => {
            assert!(previous.line_number < debug_info.line_number);
        }
        other => panic!("unexpected errors {other:?}"),
    }
}

#[test]
fn test_required_main_must_exist() {
    let errors = errors_with(
        CheckerConfig::default().with_require_main(true),
        &[("lib.bs", "package main; func helper() { }")],
    );
    match errors.as_slice() {
        [CompilationError::Validation(ValidationError::MissingMainFunction { package, debug_info })] => {
            assert_eq!(package, "main");
            assert_eq!(debug_info.filename, "lib.bs");
        }
        other => panic!("unexpected errors {other:?}"),
    }
}
