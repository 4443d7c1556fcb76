//! Type checking of concrete function bodies
//!
//! Statements are checked one by one. A failing statement reports its error
//! and checking resumes with the next one, so one function can report several
//! independent mistakes. Declarations are entered in scope even when their
//! initializer fails to check, which keeps later uses of the name quiet.

use crate::assignment::AssignmentTypeChecker;
use crate::error::{to_source_span, CheckResult, CompilationError, ValidationError};
use crate::functions::FunctionId;
use crate::inference::ExpressionTypeDeducer;
use crate::program::ProgramRepresentation;
use crate::scope::ScopeContext;
use basalt_parser::{
    DebugInfo, Expression, FunctionDefinition, PrimitiveKind, Return, Statement, TypeSignature,
};

pub struct FunctionDefinitionsTypeChecker<'p> {
    program: &'p mut ProgramRepresentation,
    errors: Vec<CompilationError>,
}

impl<'p> FunctionDefinitionsTypeChecker<'p> {
    pub fn new(program: &'p mut ProgramRepresentation) -> Self {
        Self {
            program,
            errors: Vec::new(),
        }
    }

    pub fn check_function(mut self, id: FunctionId) -> Vec<CompilationError> {
        let func_def = match self.program.function(id) {
            Ok(record) => record.definition.clone(),
            Err(error) => return vec![error],
        };

        for argument in &func_def.arguments {
            if let Err(error) = self.program.verify_that_the_type_exists(&argument.arg_type) {
                self.errors.push(error);
            }
        }
        if let Some(return_type) = &func_def.return_type {
            if let Err(error) = self.program.verify_that_the_type_exists(return_type) {
                self.errors.push(error);
            }
        }
        if !self.errors.is_empty() {
            return self.errors;
        }

        let mut scope = match ScopeContext::from_function(&func_def) {
            Ok(scope) => scope,
            Err(error) => return vec![error],
        };
        self.check_code(&func_def, &func_def.code, &mut scope);

        tracing::trace!(
            target: "typechecker",
            function = %func_def.function_name,
            id = %id,
            errors = self.errors.len(),
            "function body checked"
        );
        self.errors
    }

    fn check_code(&mut self, func_def: &FunctionDefinition, code: &[Statement], scope: &mut ScopeContext) {
        for statement in code {
            if let Err(error) = self.check_statement(func_def, statement, scope) {
                self.errors.push(error);
            }
        }
    }

    fn check_nested_code(&mut self, func_def: &FunctionDefinition, code: &[Statement], scope: &mut ScopeContext) {
        scope.nested(|scope| self.check_code(func_def, code, scope));
    }

    fn check_statement(
        &mut self,
        func_def: &FunctionDefinition,
        statement: &Statement,
        scope: &mut ScopeContext,
    ) -> CheckResult<()> {
        match statement {
            Statement::FunctionCall(call) => {
                ExpressionTypeDeducer::new(&mut *self.program, scope).deduce_function_call_type(call)?;
                Ok(())
            }
            Statement::VariableDeclaration(declaration) => {
                let initialization = self.check_initialization(
                    &declaration.identifier_name,
                    &declaration.typesignature,
                    declaration.initial_value.as_ref(),
                    scope,
                );
                scope.store_local_variable(
                    &declaration.identifier_name,
                    declaration.typesignature.clone(),
                    &declaration.debug_info,
                )?;
                initialization
            }
            Statement::ConstDeclaration(declaration) => {
                let initialization = self.check_initialization(
                    &declaration.identifier_name,
                    &declaration.typesignature,
                    Some(&declaration.value),
                    scope,
                );
                scope.store_local_constant(
                    &declaration.identifier_name,
                    declaration.typesignature.clone(),
                    &declaration.debug_info,
                )?;
                initialization
            }
            Statement::Assignment(assignment) => {
                let target_type = self.deduce(&assignment.assignment_target, scope)?;
                let value_type = self.deduce(&assignment.assigned_value, scope)?;
                if let Some(root) = root_identifier(&assignment.assignment_target) {
                    scope.mark_written(root);
                }
                self.expect_assignable(&target_type, &value_type, "assignment", assignment.assigned_value.debug_info())
            }
            Statement::Conditional(conditional) => {
                if let Err(error) = self.check_condition(&conditional.condition, scope) {
                    self.errors.push(error);
                }
                self.check_nested_code(func_def, &conditional.then_branch, scope);
                self.check_nested_code(func_def, &conditional.else_branch, scope);
                Ok(())
            }
            Statement::WhileLoop(while_loop) => {
                if let Err(error) = self.check_condition(&while_loop.condition, scope) {
                    self.errors.push(error);
                }
                self.check_nested_code(func_def, &while_loop.loop_body, scope);
                Ok(())
            }
            Statement::UntilLoop(until_loop) => {
                if let Err(error) = self.check_condition(&until_loop.condition, scope) {
                    self.errors.push(error);
                }
                self.check_nested_code(func_def, &until_loop.loop_body, scope);
                Ok(())
            }
            Statement::Return(return_statement) => self.check_return(func_def, return_statement, scope),
            Statement::Break(_) | Statement::Continue(_) => Ok(()),
        }
    }

    fn check_initialization(
        &mut self,
        identifier: &str,
        declared: &TypeSignature,
        value: Option<&Expression>,
        scope: &mut ScopeContext,
    ) -> CheckResult<()> {
        self.program.verify_that_the_type_exists(declared)?;
        let Some(value) = value else {
            return Ok(());
        };
        let value_type = self.deduce(value, scope)?;
        self.expect_assignable(
            declared,
            &value_type,
            &format!("initialization of `{identifier}`"),
            value.debug_info(),
        )
    }

    fn check_condition(&mut self, condition: &Expression, scope: &mut ScopeContext) -> CheckResult<()> {
        let condition_type = self.deduce(condition, scope)?;
        if !condition_type.is_primitive(PrimitiveKind::Bool) {
            return Err(ValidationError::type_mismatch(
                PrimitiveKind::Bool.name(),
                &condition_type,
                "condition",
                condition.debug_info(),
            )
            .into());
        }
        Ok(())
    }

    fn check_return(
        &mut self,
        func_def: &FunctionDefinition,
        return_statement: &Return,
        scope: &mut ScopeContext,
    ) -> CheckResult<()> {
        match (&func_def.return_type, &return_statement.return_value) {
            (None, None) => Ok(()),
            (Some(expected), None) => Err(ValidationError::MissingReturnValue {
                function_name: func_def.function_name.clone(),
                expected: expected.to_string(),
                debug_info: return_statement.debug_info.clone(),
                span: to_source_span(&return_statement.debug_info),
            }
            .into()),
            (None, Some(value)) => {
                // Still deduce the value so its own mistakes are reported
                self.deduce(value, scope)?;
                Err(ValidationError::UnexpectedReturnValue {
                    function_name: func_def.function_name.clone(),
                    debug_info: return_statement.debug_info.clone(),
                    span: to_source_span(&return_statement.debug_info),
                }
                .into())
            }
            (Some(expected), Some(value)) => {
                let value_type = self.deduce(value, scope)?;
                self.expect_assignable(
                    expected,
                    &value_type,
                    &format!("return value of `{}`", func_def.function_name),
                    value.debug_info(),
                )
            }
        }
    }

    fn deduce(&mut self, expression: &Expression, scope: &mut ScopeContext) -> CheckResult<TypeSignature> {
        ExpressionTypeDeducer::new(&mut *self.program, scope).deduce_expression_type(expression)
    }

    fn expect_assignable(
        &mut self,
        dest: &TypeSignature,
        source: &TypeSignature,
        context: &str,
        debug_info: &DebugInfo,
    ) -> CheckResult<()> {
        let program = &mut *self.program;
        if AssignmentTypeChecker::new(&mut program.types, &program.files).validate_assignment(dest, source)? {
            return Ok(());
        }
        Err(ValidationError::type_mismatch(dest, source, context, debug_info).into())
    }
}

/// Variable an assignment target ultimately writes through
fn root_identifier(expression: &Expression) -> Option<&str> {
    match expression {
        Expression::Identifier(identifier) => Some(&identifier.name),
        Expression::DotMemberAccess(access) => root_identifier(&access.struct_value),
        Expression::SquareBracketsAccess(access) => root_identifier(&access.storage),
        Expression::UnaryOperator(operator) => root_identifier(&operator.operand),
        Expression::TypeOperator(operator) => root_identifier(&operator.expression),
        _ => None,
    }
}
