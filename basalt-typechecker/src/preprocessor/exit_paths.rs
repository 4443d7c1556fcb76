//! Control flow exits of function bodies

use crate::error::{to_source_span, CompilationError, ValidationError};
use basalt_parser::{FunctionDefinition, Statement};

/// How control leaves a statement or a block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitPathKind {
    /// Control falls through to the next statement
    NoExit,
    /// `break` or `continue`: control leaves the enclosing loop iteration
    LocalControlFlowAlteration,
    /// Every path returns from the function
    DefinitiveExit,
}

pub struct FunctionExitPathNavigator<'f> {
    func_def: &'f FunctionDefinition,
    errors: Vec<CompilationError>,
}

impl<'f> FunctionExitPathNavigator<'f> {
    pub fn new(func_def: &'f FunctionDefinition) -> Self {
        Self {
            func_def,
            errors: Vec::new(),
        }
    }

    pub fn visit_function(mut self) -> Vec<CompilationError> {
        let body = self.visit_code(&self.func_def.code, false);
        if self.func_def.return_type.is_some() && body != ExitPathKind::DefinitiveExit {
            self.errors.push(
                ValidationError::MissingReturn {
                    function_name: self.func_def.function_name.clone(),
                    debug_info: self.func_def.debug_info.clone(),
                    span: to_source_span(&self.func_def.debug_info),
                }
                .into(),
            );
        }
        self.errors
    }

    fn visit_code(&mut self, code: &[Statement], inside_loop: bool) -> ExitPathKind {
        let mut kind = ExitPathKind::NoExit;
        for statement in code {
            if kind != ExitPathKind::NoExit {
                self.errors.push(
                    ValidationError::UnreachableCode {
                        debug_info: statement.debug_info().clone(),
                        span: to_source_span(statement.debug_info()),
                    }
                    .into(),
                );
                break;
            }
            kind = self.visit_statement(statement, inside_loop);
        }
        kind
    }

    fn visit_statement(&mut self, statement: &Statement, inside_loop: bool) -> ExitPathKind {
        match statement {
            Statement::Return(_) => ExitPathKind::DefinitiveExit,
            Statement::Break(_) | Statement::Continue(_) => {
                if !inside_loop {
                    let keyword = if matches!(statement, Statement::Break(_)) { "break" } else { "continue" };
                    self.errors.push(
                        ValidationError::JumpOutsideLoop {
                            keyword: keyword.to_string(),
                            debug_info: statement.debug_info().clone(),
                            span: to_source_span(statement.debug_info()),
                        }
                        .into(),
                    );
                }
                ExitPathKind::LocalControlFlowAlteration
            }
            Statement::Conditional(conditional) => {
                let then_branch = self.visit_code(&conditional.then_branch, inside_loop);
                let else_branch = self.visit_code(&conditional.else_branch, inside_loop);
                match (then_branch, else_branch) {
                    (ExitPathKind::DefinitiveExit, ExitPathKind::DefinitiveExit) => ExitPathKind::DefinitiveExit,
                    (ExitPathKind::NoExit, _) | (_, ExitPathKind::NoExit) => ExitPathKind::NoExit,
                    _ => ExitPathKind::LocalControlFlowAlteration,
                }
            }
            Statement::WhileLoop(while_loop) => {
                self.visit_code(&while_loop.loop_body, true);
                ExitPathKind::NoExit
            }
            // The body of an until loop runs at least once
            Statement::UntilLoop(until_loop) => match self.visit_code(&until_loop.loop_body, true) {
                ExitPathKind::DefinitiveExit => ExitPathKind::DefinitiveExit,
                _ => ExitPathKind::NoExit,
            },
            Statement::FunctionCall(_)
            | Statement::VariableDeclaration(_)
            | Statement::ConstDeclaration(_)
            | Statement::Assignment(_) => ExitPathKind::NoExit,
        }
    }
}
