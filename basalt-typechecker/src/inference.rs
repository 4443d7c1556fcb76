//! Expression type deduction
//!
//! Every expression of a concrete function body gets a type. Call sites are
//! bound along the way, directly to an overload or through a common feature
//! adoption plan, and both the types and the bindings are recorded on the
//! program for the function being validated.

use crate::assignment::AssignmentTypeChecker;
use crate::error::{to_source_span, CheckResult, ValidationError};
use crate::functions::{CommonFeatureAdoptionPlanGenerationEngine, OverloadingResolutionEngine};
use crate::program::{CallResolution, ProgramRepresentation};
use crate::scope::ScopeContext;
use basalt_parser::{
    ArrayLiteral, BinaryOperator, DotMemberAccess, Expression, FunctionCall,
    PrimitiveKind, SquareBracketsAccess, TypeDefinition, TypeOperator, TypeOperatorKind,
    TypeSignature, UnaryOperator, UnaryOperatorKind,
};

pub struct ExpressionTypeDeducer<'p, 's> {
    program: &'p mut ProgramRepresentation,
    scope: &'s mut ScopeContext,
}

impl<'p, 's> ExpressionTypeDeducer<'p, 's> {
    pub fn new(program: &'p mut ProgramRepresentation, scope: &'s mut ScopeContext) -> Self {
        Self { program, scope }
    }

    pub fn deduce_expression_type(&mut self, expression: &Expression) -> CheckResult<TypeSignature> {
        let deduced = match expression {
            Expression::IntLiteral(_) => primitive(PrimitiveKind::Int, expression),
            Expression::FloatLiteral(_) => primitive(PrimitiveKind::Float, expression),
            Expression::BoolLiteral(_) => primitive(PrimitiveKind::Bool, expression),
            Expression::CharLiteral(_) => primitive(PrimitiveKind::Char, expression),
            Expression::StringLiteral(_) => primitive(PrimitiveKind::String, expression),
            Expression::Identifier(identifier) => {
                let Some(declared) = self.scope.get_local_object_type(&identifier.name).cloned() else {
                    return Err(ValidationError::undeclared_identifier(&identifier.name, &identifier.debug_info).into());
                };
                self.scope.mark_read(&identifier.name);
                self.program.unalias_type(&declared)?
            }
            Expression::FunctionCall(call) => match self.deduce_function_call_type(call)? {
                Some(return_type) => return_type,
                None => {
                    return Err(ValidationError::VoidValue {
                        function_name: call.function_name.clone(),
                        debug_info: call.debug_info.clone(),
                        span: to_source_span(&call.debug_info),
                    }
                    .into())
                }
            },
            Expression::BinaryOperator(operator) => self.deduce_binary_operator_type(operator)?,
            Expression::UnaryOperator(operator) => self.deduce_unary_operator_type(operator)?,
            Expression::TypeOperator(operator) => self.deduce_type_operator_type(operator)?,
            Expression::ArrayLiteral(literal) => self.deduce_array_literal_type(literal)?,
            Expression::SquareBracketsAccess(access) => self.deduce_square_brackets_access_type(access)?,
            Expression::DotMemberAccess(access) => self.deduce_dot_member_access_type(access)?,
        };

        self.program.record_expression_type(expression.debug_info(), &deduced);
        Ok(deduced)
    }

    /// Return type of the function a call binds to; `None` for void calls
    pub fn deduce_function_call_type(&mut self, call: &FunctionCall) -> CheckResult<Option<TypeSignature>> {
        let argument_types = call
            .arguments
            .iter()
            .map(|argument| self.deduce_expression_type(argument))
            .collect::<CheckResult<Vec<_>>>()?;

        if let Some(id) = OverloadingResolutionEngine::new(&mut *self.program).resolve(call, &argument_types)? {
            self.program
                .record_call_resolution(&call.debug_info, CallResolution::Direct(id));
            return Ok(self.program.function(id)?.definition.return_type.clone());
        }

        let mut has_union_argument = false;
        for argument_type in &argument_types {
            if self.program.types.is_union(argument_type, &self.program.files)? {
                has_union_argument = true;
                break;
            }
        }
        if !has_union_argument {
            return Err(ValidationError::NoMatchingOverload {
                function_name: call.function_name.clone(),
                argument_types: argument_types
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
                debug_info: call.debug_info.clone(),
                span: to_source_span(&call.debug_info),
            }
            .into());
        }

        let descriptor = CommonFeatureAdoptionPlanGenerationEngine::new(&mut *self.program)
            .generate_common_feature_adoption_plan_descriptor(call, &argument_types)?;
        self.program
            .record_call_resolution(&call.debug_info, CallResolution::Adoption(descriptor.plan));
        Ok(descriptor.return_type)
    }

    fn is_assignable(&mut self, dest: &TypeSignature, source: &TypeSignature) -> CheckResult<bool> {
        let program = &mut *self.program;
        AssignmentTypeChecker::new(&mut program.types, &program.files).validate_assignment(dest, source)
    }

    fn deduce_binary_operator_type(&mut self, operator: &BinaryOperator) -> CheckResult<TypeSignature> {
        let left = self.deduce_expression_type(&operator.left_operand)?;
        let right = self.deduce_expression_type(&operator.right_operand)?;
        let kind = operator.operator;
        let invalid = || {
            ValidationError::invalid_operands(
                kind.symbol(),
                format!("`{left}` and `{right}`"),
                &operator.debug_info,
            )
        };
        let bool_type = TypeSignature::bool().with_debug_info(&operator.debug_info);

        if kind.is_logical() {
            if left.is_primitive(PrimitiveKind::Bool) && right.is_primitive(PrimitiveKind::Bool) {
                return Ok(bool_type);
            }
            return Err(invalid().into());
        }

        if kind.is_equality() {
            if self.is_assignable(&left, &right)? || self.is_assignable(&right, &left)? {
                return Ok(bool_type);
            }
            return Err(invalid().into());
        }

        let (Some(left_kind), Some(right_kind)) = (left.primitive_kind(), right.primitive_kind()) else {
            return Err(invalid().into());
        };
        if left_kind != right_kind {
            return Err(invalid().into());
        }

        if kind.is_ordering() {
            if left_kind.is_numeric() || left_kind == PrimitiveKind::Char {
                return Ok(bool_type);
            }
            return Err(invalid().into());
        }

        // Arithmetic
        if left_kind.is_numeric() {
            return Ok(TypeSignature::primitive(left_kind).with_debug_info(&operator.debug_info));
        }
        Err(invalid().into())
    }

    fn deduce_unary_operator_type(&mut self, operator: &UnaryOperator) -> CheckResult<TypeSignature> {
        let operand = self.deduce_expression_type(&operator.operand)?;
        let invalid = || {
            ValidationError::invalid_operands(
                operator.operator.symbol(),
                format!("`{operand}`"),
                &operator.debug_info,
            )
        };

        match operator.operator {
            UnaryOperatorKind::AddressOf => Ok(TypeSignature::pointer(operand.clone())),
            UnaryOperatorKind::Dereference => match self.program.unalias_type(&operand)? {
                TypeSignature::Pointer(pointer) => self.program.unalias_type(&pointer.pointed_type),
                _ => Err(invalid().into()),
            },
            UnaryOperatorKind::Not => {
                if operand.is_primitive(PrimitiveKind::Bool) {
                    Ok(operand.clone())
                } else {
                    Err(invalid().into())
                }
            }
            UnaryOperatorKind::Plus | UnaryOperatorKind::Minus => match operand.primitive_kind() {
                Some(kind) if kind.is_numeric() => Ok(operand.clone()),
                _ => Err(invalid().into()),
            },
        }
    }

    fn deduce_type_operator_type(&mut self, operator: &TypeOperator) -> CheckResult<TypeSignature> {
        let operand = self.deduce_expression_type(&operator.expression)?;
        self.program.verify_that_the_type_exists(&operator.typesignature)?;

        if !self.program.types.is_union(&operand, &self.program.files)? {
            return Err(ValidationError::TypeOperatorOnNonUnion {
                operator: operator.operator.keyword().to_string(),
                found: operand.to_string(),
                debug_info: operator.debug_info.clone(),
                span: to_source_span(&operator.debug_info),
            }
            .into());
        }
        if !self.is_assignable(&operand, &operator.typesignature)? {
            return Err(ValidationError::IncompatibleTypeQuery {
                union_type: operand.to_string(),
                queried: operator.typesignature.to_string(),
                debug_info: operator.debug_info.clone(),
                span: to_source_span(&operator.debug_info),
            }
            .into());
        }

        match operator.operator {
            TypeOperatorKind::Is => Ok(TypeSignature::bool().with_debug_info(&operator.debug_info)),
            TypeOperatorKind::As => Ok(operator.typesignature.clone()),
        }
    }

    fn deduce_array_literal_type(&mut self, literal: &ArrayLiteral) -> CheckResult<TypeSignature> {
        self.program.verify_that_the_type_exists(&literal.stored_type)?;
        if literal.elements.len() != literal.array_length {
            return Err(ValidationError::ArrayLengthMismatch {
                expected: literal.array_length,
                found: literal.elements.len(),
                debug_info: literal.debug_info.clone(),
                span: to_source_span(&literal.debug_info),
            }
            .into());
        }
        for element in &literal.elements {
            let element_type = self.deduce_expression_type(element)?;
            if !self.is_assignable(&literal.stored_type, &element_type)? {
                return Err(ValidationError::type_mismatch(
                    &literal.stored_type,
                    &element_type,
                    "array literal element",
                    element.debug_info(),
                )
                .into());
            }
        }
        Ok(TypeSignature::array(literal.array_length, literal.stored_type.clone()))
    }

    fn deduce_square_brackets_access_type(&mut self, access: &SquareBracketsAccess) -> CheckResult<TypeSignature> {
        let storage = self.deduce_expression_type(&access.storage)?;
        let index = self.deduce_expression_type(&access.index)?;

        let element = match self.program.unalias_type(&storage)? {
            TypeSignature::Array(array) => *array.stored_type,
            TypeSignature::Slice(slice) => *slice.stored_type,
            TypeSignature::Primitive(primitive) if primitive.kind.is_string_like() => {
                TypeSignature::char().with_debug_info(&access.debug_info)
            }
            _ => {
                return Err(ValidationError::InvalidSquareBracketsAccess {
                    found: storage.to_string(),
                    debug_info: access.debug_info.clone(),
                    span: to_source_span(&access.debug_info),
                }
                .into())
            }
        };

        if !index.is_primitive(PrimitiveKind::Int) {
            return Err(ValidationError::type_mismatch("Int", &index, "index", access.index.debug_info()).into());
        }
        self.program.unalias_type(&element)
    }

    fn deduce_dot_member_access_type(&mut self, access: &DotMemberAccess) -> CheckResult<TypeSignature> {
        let storage = self.deduce_expression_type(&access.struct_value)?;
        let target = match self.program.unalias_type(&storage)? {
            TypeSignature::Pointer(pointer) => self.program.unalias_type(&pointer.pointed_type)?,
            other => other,
        };

        if let TypeSignature::Custom(custom_type) = &target {
            if let TypeDefinition::Struct(struct_def) = self.program.retrieve_type_definition(custom_type)? {
                if let Some(field) = struct_def
                    .fields
                    .iter()
                    .find(|field| field.field_name == access.member_name)
                {
                    return self.program.unalias_type(&field.field_type);
                }
            }
        }

        let has_length = match &target {
            TypeSignature::Array(_) | TypeSignature::Slice(_) => true,
            TypeSignature::Primitive(primitive) => primitive.kind.is_string_like(),
            _ => false,
        };
        if has_length && access.member_name == "len" {
            return Ok(TypeSignature::int().with_debug_info(&access.debug_info));
        }

        Err(ValidationError::NoSuchMember {
            type_name: storage.to_string(),
            member_name: access.member_name.clone(),
            debug_info: access.debug_info.clone(),
            span: to_source_span(&access.debug_info),
        }
        .into())
    }
}

fn primitive(kind: PrimitiveKind, expression: &Expression) -> TypeSignature {
    TypeSignature::primitive(kind).with_debug_info(expression.debug_info())
}
