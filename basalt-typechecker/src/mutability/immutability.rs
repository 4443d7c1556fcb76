use crate::error::CheckResult;
use crate::inference::ExpressionTypeDeducer;
use crate::program::ProgramRepresentation;
use crate::scope::ScopeContext;
use basalt_parser::{Expression, TypeOperatorKind, UnaryOperatorKind};

/// Strict immutability of the location an expression denotes
///
/// Unknown identifiers count as immutable. Calls are never immutable in
/// strict mode.
pub struct ImmutabilityDeducer<'s> {
    scope: &'s ScopeContext,
}

impl<'s> ImmutabilityDeducer<'s> {
    pub fn new(scope: &'s ScopeContext) -> Self {
        Self { scope }
    }

    pub fn is_expression_immutable(&self, expression: &Expression) -> bool {
        match expression {
            Expression::Identifier(identifier) => self
                .scope
                .is_identifier_immutable(&identifier.name)
                .unwrap_or(true),
            Expression::DotMemberAccess(access) => self.is_expression_immutable(&access.struct_value),
            Expression::SquareBracketsAccess(access) => self.is_expression_immutable(&access.storage),
            Expression::UnaryOperator(operator) => match operator.operator {
                UnaryOperatorKind::AddressOf | UnaryOperatorKind::Dereference => {
                    self.is_expression_immutable(&operator.operand)
                }
                _ => true,
            },
            Expression::TypeOperator(operator) => match operator.operator {
                TypeOperatorKind::As => self.is_expression_immutable(&operator.expression),
                TypeOperatorKind::Is => false,
            },
            Expression::FunctionCall(_) => false,
            Expression::ArrayLiteral(_)
            | Expression::BinaryOperator(_)
            | Expression::IntLiteral(_)
            | Expression::FloatLiteral(_)
            | Expression::BoolLiteral(_)
            | Expression::CharLiteral(_)
            | Expression::StringLiteral(_) => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImmutabilityMode {
    Strict,
    /// Calls returning neither pointers nor slices yield fresh values
    Weak,
}

pub struct ImmutabilityChecker<'p, 's> {
    program: &'p mut ProgramRepresentation,
    scope: &'s mut ScopeContext,
    mode: ImmutabilityMode,
}

impl<'p, 's> ImmutabilityChecker<'p, 's> {
    pub fn new(program: &'p mut ProgramRepresentation, scope: &'s mut ScopeContext, mode: ImmutabilityMode) -> Self {
        Self { program, scope, mode }
    }

    pub fn is_expression_immutable(&mut self, expression: &Expression) -> CheckResult<bool> {
        if self.mode == ImmutabilityMode::Strict {
            return Ok(ImmutabilityDeducer::new(&*self.scope).is_expression_immutable(expression));
        }

        match expression {
            Expression::FunctionCall(call) => {
                let return_type = ExpressionTypeDeducer::new(&mut *self.program, &mut *self.scope)
                    .deduce_function_call_type(call)?;
                let Some(return_type) = return_type else {
                    return Ok(true);
                };
                let return_type = self.program.unalias_type(&return_type)?;
                Ok(!(return_type.is_pointer() || return_type.is_slice()))
            }
            Expression::DotMemberAccess(access) => self.is_expression_immutable(&access.struct_value),
            Expression::SquareBracketsAccess(access) => self.is_expression_immutable(&access.storage),
            Expression::UnaryOperator(operator)
                if matches!(
                    operator.operator,
                    UnaryOperatorKind::AddressOf | UnaryOperatorKind::Dereference
                ) =>
            {
                self.is_expression_immutable(&operator.operand)
            }
            Expression::TypeOperator(operator) if operator.operator == TypeOperatorKind::As => {
                self.is_expression_immutable(&operator.expression)
            }
            _ => Ok(ImmutabilityDeducer::new(&*self.scope).is_expression_immutable(expression)),
        }
    }
}
