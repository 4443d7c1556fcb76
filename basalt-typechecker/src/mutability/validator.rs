use super::assignment::AssignmentImmutabilityChecker;
use crate::error::{to_source_span, CheckResult, CompilationError, ValidationError};
use crate::functions::FunctionId;
use crate::program::ProgramRepresentation;
use crate::scope::ScopeContext;
use basalt_parser::{DebugInfo, Expression, FunctionCall, FunctionDefinition, Statement};

/// Checks that no statement of a function body lets immutable storage be
/// written, directly or through a bond
pub struct ImmutabilityConstraintValidator<'p> {
    program: &'p mut ProgramRepresentation,
    errors: Vec<CompilationError>,
}

impl<'p> ImmutabilityConstraintValidator<'p> {
    pub fn new(program: &'p mut ProgramRepresentation) -> Self {
        Self {
            program,
            errors: Vec::new(),
        }
    }

    pub fn validate_function(mut self, id: FunctionId) -> Vec<CompilationError> {
        let func_def = match self.program.function(id) {
            Ok(record) => record.definition.clone(),
            Err(error) => return vec![error],
        };
        let mut scope = match ScopeContext::from_function(&func_def) {
            Ok(scope) => scope,
            Err(error) => return vec![error],
        };
        self.validate_code(&func_def, &func_def.code, &mut scope);
        self.errors
    }

    fn validate_code(&mut self, func_def: &FunctionDefinition, code: &[Statement], scope: &mut ScopeContext) {
        for statement in code {
            if let Err(error) = self.validate_statement(func_def, statement, scope) {
                self.errors.push(error);
            }
        }
    }

    fn validate_statement(
        &mut self,
        func_def: &FunctionDefinition,
        statement: &Statement,
        scope: &mut ScopeContext,
    ) -> CheckResult<()> {
        match statement {
            Statement::FunctionCall(call) => self.validate_call(call, scope),
            Statement::VariableDeclaration(declaration) => {
                let initialization = match &declaration.initial_value {
                    Some(initial_value) => self.validate_initial_value(
                        &declaration.identifier_name,
                        initial_value,
                        &declaration.debug_info,
                        scope,
                    ),
                    None => Ok(()),
                };
                // Declared even when the initializer is rejected
                scope.store_local_variable(
                    &declaration.identifier_name,
                    declaration.typesignature.clone(),
                    &declaration.debug_info,
                )?;
                initialization
            }
            Statement::ConstDeclaration(declaration) => {
                self.validate_calls_in_expression(&declaration.value, scope)?;
                scope.store_local_constant(
                    &declaration.identifier_name,
                    declaration.typesignature.clone(),
                    &declaration.debug_info,
                )
            }
            Statement::Assignment(assignment) => {
                self.validate_calls_in_expression(&assignment.assignment_target, scope)?;
                self.validate_calls_in_expression(&assignment.assigned_value, scope)?;
                if AssignmentImmutabilityChecker::new(&mut *self.program, scope)
                    .does_assignment_discard_qualifiers(assignment)?
                {
                    return Err(ValidationError::DiscardedQualifiers {
                        debug_info: assignment.debug_info.clone(),
                        span: to_source_span(&assignment.debug_info),
                    }
                    .into());
                }
                Ok(())
            }
            Statement::Conditional(conditional) => {
                self.validate_calls_in_expression(&conditional.condition, scope)?;
                scope.nested(|scope| self.validate_code(func_def, &conditional.then_branch, scope));
                scope.nested(|scope| self.validate_code(func_def, &conditional.else_branch, scope));
                Ok(())
            }
            Statement::WhileLoop(while_loop) => {
                self.validate_calls_in_expression(&while_loop.condition, scope)?;
                scope.nested(|scope| self.validate_code(func_def, &while_loop.loop_body, scope));
                Ok(())
            }
            Statement::UntilLoop(until_loop) => {
                self.validate_calls_in_expression(&until_loop.condition, scope)?;
                scope.nested(|scope| self.validate_code(func_def, &until_loop.loop_body, scope));
                Ok(())
            }
            Statement::Return(return_statement) => match &return_statement.return_value {
                Some(value) => self.validate_calls_in_expression(value, scope),
                None => Ok(()),
            },
            Statement::Break(_) | Statement::Continue(_) => Ok(()),
        }
    }

    /// Every argument must be assignable to the (mutable) parameter
    fn validate_initial_value(
        &mut self,
        identifier_name: &str,
        initial_value: &Expression,
        debug_info: &DebugInfo,
        scope: &mut ScopeContext,
    ) -> CheckResult<()> {
        self.validate_calls_in_expression(initial_value, scope)?;
        if !AssignmentImmutabilityChecker::new(&mut *self.program, scope)
            .is_expression_assignable_to_var(initial_value)?
        {
            return Err(
                ValidationError::immutable_bond(format!("initialization of `{identifier_name}`"), debug_info).into(),
            );
        }
        Ok(())
    }

    fn validate_call(&mut self, call: &FunctionCall, scope: &mut ScopeContext) -> CheckResult<()> {
        for (index, argument) in call.arguments.iter().enumerate() {
            self.validate_calls_in_expression(argument, scope)?;
            if !AssignmentImmutabilityChecker::new(&mut *self.program, scope).is_expression_assignable_to_var(argument)? {
                return Err(ValidationError::immutable_bond(
                    format!("argument {} of `{}`", index + 1, call.function_name),
                    argument.debug_info(),
                )
                .into());
            }
        }
        Ok(())
    }

    fn validate_calls_in_expression(&mut self, expression: &Expression, scope: &mut ScopeContext) -> CheckResult<()> {
        match expression {
            Expression::FunctionCall(call) => self.validate_call(call, scope),
            Expression::BinaryOperator(operator) => {
                self.validate_calls_in_expression(&operator.left_operand, scope)?;
                self.validate_calls_in_expression(&operator.right_operand, scope)
            }
            Expression::UnaryOperator(operator) => self.validate_calls_in_expression(&operator.operand, scope),
            Expression::TypeOperator(operator) => self.validate_calls_in_expression(&operator.expression, scope),
            Expression::DotMemberAccess(access) => self.validate_calls_in_expression(&access.struct_value, scope),
            Expression::SquareBracketsAccess(access) => {
                self.validate_calls_in_expression(&access.storage, scope)?;
                self.validate_calls_in_expression(&access.index, scope)
            }
            Expression::ArrayLiteral(literal) => literal
                .elements
                .iter()
                .try_for_each(|element| self.validate_calls_in_expression(element, scope)),
            Expression::Identifier(_)
            | Expression::IntLiteral(_)
            | Expression::FloatLiteral(_)
            | Expression::BoolLiteral(_)
            | Expression::CharLiteral(_)
            | Expression::StringLiteral(_) => Ok(()),
        }
    }
}
