use crate::error::{to_source_span, CompilationError, ValidationError};
use crate::program::ProgramRepresentation;
use basalt_parser::{DebugInfo, PrimitiveKind};

/// Validates the program entry point
pub struct MainFunctionsPreprocessor<'p> {
    program: &'p mut ProgramRepresentation,
}

impl<'p> MainFunctionsPreprocessor<'p> {
    pub fn new(program: &'p mut ProgramRepresentation) -> Self {
        Self { program }
    }

    pub fn visit_main_functions(self) -> Vec<CompilationError> {
        let mut errors = Vec::new();
        let main_package = self.program.config.main_package.clone();
        let mains: Vec<(String, Vec<_>)> = self
            .program
            .functions
            .main_functions()
            .iter()
            .map(|(package, ids)| (package.clone(), ids.clone()))
            .collect();

        let mut first: Option<DebugInfo> = None;
        for (package, ids) in mains {
            for id in ids {
                let func_def = match self.program.function(id) {
                    Ok(record) => record.definition.clone(),
                    Err(error) => {
                        errors.push(error);
                        continue;
                    }
                };
                let debug_info = &func_def.debug_info;

                if package != main_package {
                    errors.push(
                        ValidationError::invalid_main_function(
                            format!("`main` must be defined in package `{main_package}`, not `{package}`"),
                            debug_info,
                        )
                        .into(),
                    );
                }
                if func_def.is_generic() {
                    errors.push(ValidationError::invalid_main_function("`main` cannot be generic", debug_info).into());
                }
                if !func_def.arguments.is_empty() {
                    errors.push(ValidationError::invalid_main_function("`main` takes no arguments", debug_info).into());
                }
                if let Some(return_type) = &func_def.return_type {
                    let returns_int = match self.program.unalias_type(return_type) {
                        Ok(unaliased) => unaliased.is_primitive(PrimitiveKind::Int),
                        Err(error) => {
                            errors.push(error);
                            true
                        }
                    };
                    if !returns_int {
                        errors.push(
                            ValidationError::invalid_main_function(
                                format!("`main` must return `Int` or nothing, not `{return_type}`"),
                                debug_info,
                            )
                            .into(),
                        );
                    }
                }

                match &first {
                    Some(previous) => errors.push(
                        ValidationError::MultipleMainFunctions {
                            previous: previous.clone(),
                            debug_info: debug_info.clone(),
                            span: to_source_span(debug_info),
                        }
                        .into(),
                    ),
                    None => first = Some(debug_info.clone()),
                }
            }
        }

        if first.is_none() && self.program.config.require_main {
            let location = self
                .program
                .files
                .files_of_package(&main_package)
                .ok()
                .and_then(|files| files.first())
                .map(DebugInfo::in_file)
                .unwrap_or_default();
            errors.push(
                ValidationError::MissingMainFunction {
                    package: main_package,
                    debug_info: location,
                }
                .into(),
            );
        }

        tracing::debug!(target: "preprocessor", errors = errors.len(), "main functions checked");
        errors
    }
}
