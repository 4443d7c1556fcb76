//! Basalt Typechecker
//!
//! Semantic core of the Basalt compiler: type and function registries,
//! generics, overload resolution, common feature adoption over union
//! arguments, and the validation passes that run over a parsed program.

// Allow clippy lints for development
#![allow(clippy::result_large_err)]
#![allow(clippy::uninlined_format_args)]
//!
//! ## Architecture
//!
//! - **Registries**: types keyed by package, name and arity, functions kept
//!   in an arena addressed by `FunctionId` and grouped in overload sets
//! - **Generics**: unification of templates against concrete types, and
//!   instantiation of generic definitions on demand
//! - **Resolution**: specificity ordering of the overloads a call can bind
//!   to, with common feature adoption when arguments are unions
//! - **Preprocessor**: the validation passes, from package conflicts to the
//!   `main` function
//!
//! ## Usage
//!
//! ```ignore
//! let checked = basalt_typechecker::check_sources(
//!     &[("main.bs", "package main; func main() { }")],
//!     CheckerConfig::default(),
//! )?;
//! ```

pub mod assignment;
pub mod config;
pub mod dependency_graph;
pub mod error;
pub mod functions;
pub mod generics;
pub mod inference;
pub mod mutability;
pub mod preprocessor;
pub mod program;
pub mod registry;
pub mod scope;
pub mod unification;

// Re-export public API
pub use assignment::AssignmentTypeChecker;
pub use config::CheckerConfig;
pub use dependency_graph::TypeDependencyNavigator;
pub use error::{CheckResult, CompilationError, IndexingError, InternalError, ValidationError};
pub use functions::{
    CommonFeatureAdoptionPlan, CommonFeatureAdoptionPlanDescriptor, FunctionId, FunctionOverloadsRegister,
    FunctionRecord, OverloadingResolutionEngine, SpecificityComparison,
};
pub use generics::{GenericSubstitutionRules, GenericsInstantiationEngine};
pub use inference::ExpressionTypeDeducer;
pub use preprocessor::Preprocessor;
pub use program::{CallResolution, ProgramRepresentation, ProjectFileStructure, SiteKey};
pub use registry::{TypeDefinitionsRegister, TypeKey};
pub use scope::ScopeContext;

use basalt_parser::{DebugInfo, FileRepresentation, Statement, TypeDefinition, TypeSignature};
use indexmap::IndexMap;

/// A program that passed every validation pass
#[derive(Debug)]
pub struct CheckedProgram {
    program: ProgramRepresentation,
}

impl CheckedProgram {
    pub fn program(&self) -> &ProgramRepresentation {
        &self.program
    }

    /// Non-generic functions, instantiations of generic ones included
    pub fn concrete_functions(&self) -> impl Iterator<Item = (FunctionId, &FunctionRecord)> {
        self.program
            .functions
            .records()
            .filter(|(_, record)| !record.definition.is_generic())
    }

    /// Concrete functions named `function_name`, in arena order
    pub fn find_functions(&self, function_name: &str) -> Vec<FunctionId> {
        self.concrete_functions()
            .filter(|(_, record)| record.definition.function_name == function_name)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn concrete_type_definitions(&self) -> impl Iterator<Item = (&TypeKey, &TypeDefinition)> {
        self.program.types.concrete_definitions()
    }

    pub fn call_resolutions(&self) -> &IndexMap<SiteKey, CallResolution> {
        &self.program.call_resolutions
    }

    pub fn call_resolution(&self, function: FunctionId, debug_info: &DebugInfo) -> Option<&CallResolution> {
        self.program.call_resolutions.get(&(function, debug_info.clone()))
    }

    pub fn expression_types(&self) -> &IndexMap<SiteKey, TypeSignature> {
        &self.program.expression_types
    }

    pub fn expression_type(&self, function: FunctionId, debug_info: &DebugInfo) -> Option<&TypeSignature> {
        self.program.expression_types.get(&(function, debug_info.clone()))
    }

    /// Every concrete function and type is free of template parameters
    pub fn assert_no_generics_leaked(&self) -> CheckResult<()> {
        for (id, record) in self.concrete_functions() {
            let definition = &record.definition;
            let signature_types = definition
                .arguments
                .iter()
                .map(|argument| &argument.arg_type)
                .chain(definition.return_type.iter());
            for type_signature in signature_types {
                assert_internal!(
                    !type_signature.is_generic(),
                    "{} `{}` has a generic signature type `{}`",
                    id,
                    definition.function_name,
                    type_signature
                );
            }
            check_declared_types(&definition.code)?;
        }

        for (key, definition) in self.concrete_type_definitions() {
            let leaked = match definition {
                TypeDefinition::Struct(struct_def) => {
                    struct_def.fields.iter().any(|field| field.field_type.is_generic())
                }
                TypeDefinition::Union(union_def) => union_def.types.iter().any(TypeSignature::is_generic),
                TypeDefinition::Alias(alias) => alias.aliased_type.is_generic(),
            };
            assert_internal!(!leaked, "type `{}` still mentions template parameters", key);
        }
        Ok(())
    }

    pub fn into_program(self) -> ProgramRepresentation {
        self.program
    }
}

fn check_declared_types(code: &[Statement]) -> CheckResult<()> {
    for statement in code {
        match statement {
            Statement::VariableDeclaration(declaration) => {
                assert_internal!(
                    !declaration.typesignature.is_generic(),
                    "declaration of `{}` has generic type `{}`",
                    declaration.identifier_name,
                    declaration.typesignature
                );
            }
            Statement::ConstDeclaration(declaration) => {
                assert_internal!(
                    !declaration.typesignature.is_generic(),
                    "declaration of `{}` has generic type `{}`",
                    declaration.identifier_name,
                    declaration.typesignature
                );
            }
            Statement::Conditional(conditional) => {
                check_declared_types(&conditional.then_branch)?;
                check_declared_types(&conditional.else_branch)?;
            }
            Statement::WhileLoop(while_loop) => check_declared_types(&while_loop.loop_body)?,
            Statement::UntilLoop(until_loop) => check_declared_types(&until_loop.loop_body)?,
            _ => {}
        }
    }
    Ok(())
}

/// Validate a parsed program
pub fn check_program(
    files: Vec<FileRepresentation>,
    config: CheckerConfig,
) -> Result<CheckedProgram, Vec<CompilationError>> {
    let file_count = files.len();
    let program = ProgramRepresentation::new(files, config)?;
    let program = Preprocessor::new(program).preprocess()?;
    tracing::info!(
        target: "typechecker",
        files = file_count,
        functions = program.functions.len(),
        "program checked"
    );
    Ok(CheckedProgram { program })
}

/// Parse `(filename, source)` pairs and validate them as one program
pub fn check_sources(
    sources: &[(&str, &str)],
    config: CheckerConfig,
) -> Result<CheckedProgram, Vec<CompilationError>> {
    let mut files = Vec::with_capacity(sources.len());
    let mut errors = Vec::new();
    for (filename, source) in sources {
        match basalt_parser::parse_file(filename, source) {
            Ok(file) => files.push(file),
            Err(error) => errors.push(CompilationError::from(error)),
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }
    check_program(files, config)
}

#[cfg(test)]
mod tests;
