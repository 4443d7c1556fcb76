//! Whole program validation
//!
//! The preprocessor runs the validation passes in order:
//!
//! 1. type name conflicts across packages
//! 2. type dependency cycles
//! 3. function bodies: exit paths, address sanitizing, types and
//!    immutability constraints
//! 4. the `main` function
//!
//! Every pass reports all the errors it finds. A failing pass stops the
//! pipeline, since later passes rely on the guarantees of earlier ones.
//!
//! Function bodies are visited by index while the arena grows: type checking
//! a call may instantiate a generic function, and the instantiation is
//! appended to the arena to be checked in turn.

pub mod address_sanitizer;
pub mod exit_paths;
pub mod main_functions;
pub mod package_conflicts;
pub mod typechecker;

pub use address_sanitizer::AddressSanitizer;
pub use exit_paths::{ExitPathKind, FunctionExitPathNavigator};
pub use main_functions::MainFunctionsPreprocessor;
pub use package_conflicts::PackageTypeConflictNavigator;
pub use typechecker::FunctionDefinitionsTypeChecker;

use crate::dependency_graph::TypeDependencyNavigator;
use crate::error::CompilationError;
use crate::functions::FunctionId;
use crate::mutability::ImmutabilityConstraintValidator;
use crate::program::ProgramRepresentation;

pub struct Preprocessor {
    program: ProgramRepresentation,
}

impl Preprocessor {
    pub fn new(program: ProgramRepresentation) -> Self {
        Self { program }
    }

    /// Run every pass, returning the validated program
    pub fn preprocess(mut self) -> Result<ProgramRepresentation, Vec<CompilationError>> {
        self.run_pass("package_conflicts", |program| {
            PackageTypeConflictNavigator::new(program).visit_all_packages()
        })?;
        self.run_pass("type_dependencies", |program| {
            TypeDependencyNavigator::new(program).visit_all_type_definitions()
        })?;
        self.run_pass("function_bodies", validate_function_bodies)?;
        self.run_pass("main_functions", |program| {
            MainFunctionsPreprocessor::new(program).visit_main_functions()
        })?;
        Ok(self.program)
    }

    fn run_pass(
        &mut self,
        name: &'static str,
        pass: impl FnOnce(&mut ProgramRepresentation) -> Vec<CompilationError>,
    ) -> Result<(), Vec<CompilationError>> {
        let errors = pass(&mut self.program);
        tracing::debug!(target: "preprocessor", pass = name, errors = errors.len(), "pass finished");
        if errors.is_empty() {
            Ok(())
        } else {
            Err(self.limit_diagnostics(errors))
        }
    }

    fn limit_diagnostics(&self, mut errors: Vec<CompilationError>) -> Vec<CompilationError> {
        let config = self.program.config();
        let limit = if config.fail_fast { Some(1) } else { config.max_diagnostics };
        if let Some(limit) = limit {
            if errors.len() > limit {
                tracing::warn!(
                    target: "preprocessor",
                    reported = limit,
                    dropped = errors.len() - limit,
                    "diagnostics truncated"
                );
                errors.truncate(limit);
            }
        }
        errors
    }
}

/// Generic templates only get the checks that need no concrete types; their
/// bodies are type checked through their instantiations.
fn validate_function_bodies(program: &mut ProgramRepresentation) -> Vec<CompilationError> {
    let mut errors = Vec::new();
    let mut index = 0;
    while index < program.functions.len() {
        let id = FunctionId(index);
        index += 1;

        let record = match program.function(id) {
            Ok(record) => record.clone(),
            Err(error) => {
                errors.push(error);
                continue;
            }
        };

        if !record.is_instantiation() {
            errors.extend(FunctionExitPathNavigator::new(&record.definition).visit_function());
            errors.extend(AddressSanitizer::new(&record.definition).visit_function());
        }
        if !record.definition.is_generic() {
            program.current_function = Some(id);
            let typecheck_errors = FunctionDefinitionsTypeChecker::new(program).check_function(id);
            if typecheck_errors.is_empty() {
                errors.extend(ImmutabilityConstraintValidator::new(program).validate_function(id));
            } else {
                errors.extend(typecheck_errors);
            }
            program.current_function = None;
        }

        if program.config.fail_fast && !errors.is_empty() {
            break;
        }
    }
    tracing::debug!(target: "preprocessor", functions = program.functions.len(), "function bodies visited");
    errors
}
