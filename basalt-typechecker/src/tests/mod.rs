//! Tests for the Basalt typechecker
//!
//! Fixtures are written as Basalt source and go through the parser, so the
//! tests exercise the same trees real programs produce.

#![allow(clippy::assertions_on_constants)]

use crate::{check_sources, CheckedProgram, CheckerConfig, CompilationError, ProgramRepresentation, ValidationError};

// Registries
mod test_registry;
mod test_function_registry;

// Generics
mod test_generics;

mod test_assignment;

// Overloads and adoption
mod test_overload_resolution;


// Preprocessor passes
mod test_type_dependencies;
mod test_address_sanitizer;
mod test_main_functions;

mod test_checked_program;

/// Check a single `main.bs` file with the default configuration
pub(crate) fn check(source: &str) -> Result<CheckedProgram, Vec<CompilationError>> {
    check_sources(&[("main.bs", source)], CheckerConfig::default())
}

/// Validation errors of a program expected to fail
pub(crate) fn validation_errors(source: &str) -> Vec<ValidationError> {
    match check(source) {
        Ok(_) => panic!("expected the program to be rejected"),
        Err(errors) => errors
            .into_iter()
            .map(|error| match error {
                CompilationError::Validation(error) => error,
                other => panic!("expected a validation error, got {other:?}"),
            })
            .collect(),
    }
}

/// Check a program expected to pass, printing the errors otherwise
pub(crate) fn check_ok(source: &str) -> CheckedProgram {
    match check(source) {
        Ok(checked) => checked,
        Err(errors) => {
            for error in &errors {
                eprintln!("{error}");
            }
            panic!("expected the program to be accepted, got {} errors", errors.len());
        }
    }
}

/// Index a program without running any validation pass
pub(crate) fn index(sources: &[(&str, &str)]) -> ProgramRepresentation {
    let files = sources
        .iter()
        .map(|(filename, source)| basalt_parser::parse_file(filename, source).expect("fixture should parse"))
        .collect();
    ProgramRepresentation::new(files, CheckerConfig::default()).expect("fixture should index")
}
