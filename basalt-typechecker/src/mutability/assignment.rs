use super::bond::BondInspector;
use super::immutability::{ImmutabilityChecker, ImmutabilityDeducer, ImmutabilityMode};
use super::observability::ObservabilityDeducer;
use crate::error::CheckResult;
use crate::inference::ExpressionTypeDeducer;
use crate::program::ProgramRepresentation;
use crate::scope::ScopeContext;
use basalt_parser::{Assignment, Expression, UnaryOperatorKind};

pub struct AssignmentImmutabilityChecker<'p, 's> {
    program: &'p mut ProgramRepresentation,
    scope: &'s mut ScopeContext,
}

impl<'p, 's> AssignmentImmutabilityChecker<'p, 's> {
    pub fn new(program: &'p mut ProgramRepresentation, scope: &'s mut ScopeContext) -> Self {
        Self { program, scope }
    }

    /// Whether a mutable variable may be initialized from `expression`
    ///
    /// Storing an immutable value whose type implies a bond would make it
    /// writable through the new variable.
    pub fn is_expression_assignable_to_var(&mut self, expression: &Expression) -> CheckResult<bool> {
        match expression {
            Expression::Identifier(_)
            | Expression::DotMemberAccess(_)
            | Expression::SquareBracketsAccess(_)
            | Expression::UnaryOperator(_)
            | Expression::ArrayLiteral(_)
            | Expression::TypeOperator(_) => {
                let immutable = ImmutabilityChecker::new(&mut *self.program, &mut *self.scope, ImmutabilityMode::Weak)
                    .is_expression_immutable(expression)?;
                if !immutable {
                    return Ok(true);
                }
                let expression_type = ExpressionTypeDeducer::new(&mut *self.program, &mut *self.scope)
                    .deduce_expression_type(expression)?;
                let program = &mut *self.program;
                let bond = BondInspector::new(&mut program.types, &program.files)
                    .does_the_type_of_this_expr_imply_a_bond(&expression_type)?;
                Ok(!bond)
            }
            Expression::FunctionCall(_)
            | Expression::BinaryOperator(_)
            | Expression::IntLiteral(_)
            | Expression::FloatLiteral(_)
            | Expression::BoolLiteral(_)
            | Expression::CharLiteral(_)
            | Expression::StringLiteral(_) => Ok(true),
        }
    }

    pub fn does_assignment_discard_qualifiers(&mut self, assignment: &Assignment) -> CheckResult<bool> {
        let target = &assignment.assignment_target;
        if let Expression::UnaryOperator(operator) = target {
            if operator.operator == UnaryOperatorKind::AddressOf {
                return Ok(true);
            }
        }
        if ImmutabilityDeducer::new(&*self.scope).is_expression_immutable(target) {
            return Ok(true);
        }
        if !ObservabilityDeducer::new(&mut *self.program, &mut *self.scope).is_expression_observable(target)? {
            return Ok(true);
        }
        Ok(!self.is_expression_assignable_to_var(&assignment.assigned_value)?)
    }
}
