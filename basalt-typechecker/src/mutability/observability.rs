use crate::error::CheckResult;
use crate::inference::ExpressionTypeDeducer;
use crate::program::ProgramRepresentation;
use crate::scope::ScopeContext;
use basalt_parser::{Expression, TypeOperatorKind, TypeSignature, UnaryOperatorKind};

/// Decides whether a write to an expression is visible after the statement
///
/// Writing to a temporary (a literal, an operator result, a call returning
/// a value) has no observable effect.
pub struct ObservabilityDeducer<'p, 's> {
    program: &'p mut ProgramRepresentation,
    scope: &'s mut ScopeContext,
}

impl<'p, 's> ObservabilityDeducer<'p, 's> {
    pub fn new(program: &'p mut ProgramRepresentation, scope: &'s mut ScopeContext) -> Self {
        Self { program, scope }
    }

    pub fn is_expression_observable(&mut self, expression: &Expression) -> CheckResult<bool> {
        match expression {
            Expression::Identifier(_) => Ok(true),
            Expression::UnaryOperator(operator) => Ok(matches!(
                operator.operator,
                UnaryOperatorKind::AddressOf | UnaryOperatorKind::Dereference
            )),
            Expression::DotMemberAccess(access) => self.is_access_observable(&access.struct_value),
            Expression::SquareBracketsAccess(access) => self.is_access_observable(&access.storage),
            Expression::TypeOperator(operator) => Ok(operator.operator == TypeOperatorKind::As
                && self.is_expression_observable(&operator.expression)?),
            Expression::FunctionCall(call) => {
                let return_type = ExpressionTypeDeducer::new(&mut *self.program, &mut *self.scope)
                    .deduce_function_call_type(call)?;
                match return_type {
                    Some(return_type) => self.is_reference_type(&return_type),
                    None => Ok(false),
                }
            }
            Expression::ArrayLiteral(_)
            | Expression::BinaryOperator(_)
            | Expression::IntLiteral(_)
            | Expression::FloatLiteral(_)
            | Expression::BoolLiteral(_)
            | Expression::CharLiteral(_)
            | Expression::StringLiteral(_) => Ok(false),
        }
    }

    fn is_access_observable(&mut self, inner: &Expression) -> CheckResult<bool> {
        if self.is_expression_observable(inner)? {
            return Ok(true);
        }
        // Unresolved inner types count as observable
        match ExpressionTypeDeducer::new(&mut *self.program, &mut *self.scope).deduce_expression_type(inner) {
            Ok(inner_type) => self.is_reference_type(&inner_type),
            Err(_) => Ok(true),
        }
    }

    fn is_reference_type(&mut self, type_signature: &TypeSignature) -> CheckResult<bool> {
        let unaliased = self.program.unalias_type(type_signature)?;
        Ok(unaliased.is_pointer() || unaliased.is_slice())
    }
}
