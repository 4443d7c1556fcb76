//! Generic substitution
//!
//! Rules map generic parameter names to concrete signatures. The
//! instantiation engine deep-copies trees and swaps every template leaf for
//! its replacement, producing brand new definitions with an empty generic
//! parameter list.

use crate::assert_internal;
use crate::error::CheckResult;
use basalt_parser::{
    ArrayLiteral, ArrayType, Assignment, BinaryOperator, Conditional, ConstDeclaration,
    DotMemberAccess, Expression, FunctionArgument, FunctionCall, FunctionDefinition, InlineUnion,
    PointerType, Return, SliceType, SquareBracketsAccess, Statement, StructDefinition,
    StructField, TypeAlias, TypeDefinition, TypeOperator, TypeSignature, UnaryOperator,
    UnionDefinition, UntilLoop, VariableDeclaration, WhileLoop,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericSubstitutionRule {
    pub to_be_replaced: String,
    pub replacement: TypeSignature,
}

/// Ordered generic name to replacement bindings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenericSubstitutionRules {
    rules: Vec<GenericSubstitutionRule>,
}

impl GenericSubstitutionRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pair generic names with their replacements, position by position
    pub fn zip_components_vectors(
        names: &[String],
        replacements: &[TypeSignature],
    ) -> CheckResult<Self> {
        assert_internal!(
            names.len() == replacements.len(),
            "cannot zip {} generic names with {} replacements",
            names.len(),
            replacements.len()
        );
        let rules = names
            .iter()
            .zip(replacements)
            .map(|(name, replacement)| GenericSubstitutionRule {
                to_be_replaced: name.clone(),
                replacement: replacement.clone(),
            })
            .collect();
        Ok(Self { rules })
    }

    /// Bind `name`, overwriting a previous binding
    pub fn set(&mut self, name: &str, replacement: TypeSignature) {
        match self.rules.iter_mut().find(|rule| rule.to_be_replaced == name) {
            Some(rule) => rule.replacement = replacement,
            None => self.rules.push(GenericSubstitutionRule {
                to_be_replaced: name.to_string(),
                replacement,
            }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&TypeSignature> {
        self.rules
            .iter()
            .find(|rule| rule.to_be_replaced == name)
            .map(|rule| &rule.replacement)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GenericSubstitutionRule> {
        self.rules.iter()
    }

    /// True when every name has a binding
    pub fn covers(&self, names: &[String]) -> bool {
        names.iter().all(|name| self.get(name).is_some())
    }

    /// Replacements of `names`, in the order of `names`
    pub fn replacements_for(&self, names: &[String]) -> Option<Vec<TypeSignature>> {
        names.iter().map(|name| self.get(name).cloned()).collect()
    }

    /// Add the bindings of `other`; false on a conflicting re-bind
    pub fn merge(&mut self, other: &GenericSubstitutionRules) -> bool {
        for rule in other.iter() {
            match self.get(&rule.to_be_replaced) {
                Some(existing) if *existing != rule.replacement => return false,
                Some(_) => {}
                None => self.rules.push(rule.clone()),
            }
        }
        true
    }
}

/// Applies substitution rules to AST trees
#[derive(Debug, Clone, Copy)]
pub struct GenericsInstantiationEngine<'r> {
    rules: &'r GenericSubstitutionRules,
}

impl<'r> GenericsInstantiationEngine<'r> {
    pub fn new(rules: &'r GenericSubstitutionRules) -> Self {
        Self { rules }
    }

    pub fn instantiate_generic_typesignature(&self, type_signature: &TypeSignature) -> TypeSignature {
        match type_signature {
            TypeSignature::Template(template) => self
                .rules
                .get(&template.type_name)
                .cloned()
                .unwrap_or_else(|| type_signature.clone()),
            TypeSignature::Custom(custom_type) => {
                // A bare generic name may reach us spelled as a custom type
                if custom_type.package_prefix.is_none() && custom_type.type_parameters.is_empty() {
                    if let Some(replacement) = self.rules.get(&custom_type.type_name) {
                        return replacement.clone();
                    }
                }
                let mut instantiated = custom_type.clone();
                instantiated.type_parameters = self.instantiate_signatures(&custom_type.type_parameters);
                TypeSignature::Custom(instantiated)
            }
            TypeSignature::InlineUnion(inline_union) => TypeSignature::InlineUnion(InlineUnion {
                alternatives: self.instantiate_signatures(&inline_union.alternatives),
                debug_info: inline_union.debug_info.clone(),
            }),
            TypeSignature::Pointer(pointer) => TypeSignature::Pointer(PointerType {
                pointed_type: Box::new(self.instantiate_generic_typesignature(&pointer.pointed_type)),
                debug_info: pointer.debug_info.clone(),
            }),
            TypeSignature::Array(array) => TypeSignature::Array(ArrayType {
                array_length: array.array_length,
                stored_type: Box::new(self.instantiate_generic_typesignature(&array.stored_type)),
                debug_info: array.debug_info.clone(),
            }),
            TypeSignature::Slice(slice) => TypeSignature::Slice(SliceType {
                stored_type: Box::new(self.instantiate_generic_typesignature(&slice.stored_type)),
                debug_info: slice.debug_info.clone(),
            }),
            TypeSignature::Primitive(_) => type_signature.clone(),
        }
    }

    fn instantiate_signatures(&self, signatures: &[TypeSignature]) -> Vec<TypeSignature> {
        signatures
            .iter()
            .map(|signature| self.instantiate_generic_typesignature(signature))
            .collect()
    }

    fn instantiate_function_call(&self, call: &FunctionCall) -> FunctionCall {
        FunctionCall {
            function_name: call.function_name.clone(),
            package_prefix: call.package_prefix.clone(),
            instantiated_generics: self.instantiate_signatures(&call.instantiated_generics),
            arguments: call
                .arguments
                .iter()
                .map(|argument| self.instantiate_generic_expression(argument))
                .collect(),
            debug_info: call.debug_info.clone(),
        }
    }

    pub fn instantiate_generic_expression(&self, expression: &Expression) -> Expression {
        let boxed = |inner: &Expression| Box::new(self.instantiate_generic_expression(inner));
        match expression {
            Expression::FunctionCall(call) => Expression::FunctionCall(self.instantiate_function_call(call)),
            Expression::BinaryOperator(operator) => Expression::BinaryOperator(BinaryOperator {
                operator: operator.operator,
                left_operand: boxed(&operator.left_operand),
                right_operand: boxed(&operator.right_operand),
                debug_info: operator.debug_info.clone(),
            }),
            Expression::UnaryOperator(operator) => Expression::UnaryOperator(UnaryOperator {
                operator: operator.operator,
                operand: boxed(&operator.operand),
                debug_info: operator.debug_info.clone(),
            }),
            Expression::TypeOperator(operator) => Expression::TypeOperator(TypeOperator {
                operator: operator.operator,
                expression: boxed(&operator.expression),
                typesignature: self.instantiate_generic_typesignature(&operator.typesignature),
                debug_info: operator.debug_info.clone(),
            }),
            Expression::DotMemberAccess(access) => Expression::DotMemberAccess(DotMemberAccess {
                struct_value: boxed(&access.struct_value),
                member_name: access.member_name.clone(),
                debug_info: access.debug_info.clone(),
            }),
            Expression::SquareBracketsAccess(access) => {
                Expression::SquareBracketsAccess(SquareBracketsAccess {
                    storage: boxed(&access.storage),
                    index: boxed(&access.index),
                    debug_info: access.debug_info.clone(),
                })
            }
            Expression::ArrayLiteral(literal) => Expression::ArrayLiteral(ArrayLiteral {
                array_length: literal.array_length,
                stored_type: self.instantiate_generic_typesignature(&literal.stored_type),
                elements: literal
                    .elements
                    .iter()
                    .map(|element| self.instantiate_generic_expression(element))
                    .collect(),
                debug_info: literal.debug_info.clone(),
            }),
            Expression::Identifier(_)
            | Expression::IntLiteral(_)
            | Expression::FloatLiteral(_)
            | Expression::BoolLiteral(_)
            | Expression::CharLiteral(_)
            | Expression::StringLiteral(_) => expression.clone(),
        }
    }

    pub fn instantiate_generic_statement(&self, statement: &Statement) -> Statement {
        match statement {
            Statement::FunctionCall(call) => Statement::FunctionCall(self.instantiate_function_call(call)),
            Statement::VariableDeclaration(declaration) => {
                Statement::VariableDeclaration(VariableDeclaration {
                    identifier_name: declaration.identifier_name.clone(),
                    typesignature: self.instantiate_generic_typesignature(&declaration.typesignature),
                    initial_value: declaration
                        .initial_value
                        .as_ref()
                        .map(|value| self.instantiate_generic_expression(value)),
                    debug_info: declaration.debug_info.clone(),
                })
            }
            Statement::ConstDeclaration(declaration) => Statement::ConstDeclaration(ConstDeclaration {
                identifier_name: declaration.identifier_name.clone(),
                typesignature: self.instantiate_generic_typesignature(&declaration.typesignature),
                value: self.instantiate_generic_expression(&declaration.value),
                debug_info: declaration.debug_info.clone(),
            }),
            Statement::Assignment(assignment) => Statement::Assignment(Assignment {
                assignment_target: self.instantiate_generic_expression(&assignment.assignment_target),
                assigned_value: self.instantiate_generic_expression(&assignment.assigned_value),
                debug_info: assignment.debug_info.clone(),
            }),
            Statement::Conditional(conditional) => Statement::Conditional(Conditional {
                condition: self.instantiate_generic_expression(&conditional.condition),
                then_branch: self.instantiate_generic_code(&conditional.then_branch),
                else_branch: self.instantiate_generic_code(&conditional.else_branch),
                debug_info: conditional.debug_info.clone(),
            }),
            Statement::WhileLoop(while_loop) => Statement::WhileLoop(WhileLoop {
                condition: self.instantiate_generic_expression(&while_loop.condition),
                loop_body: self.instantiate_generic_code(&while_loop.loop_body),
                debug_info: while_loop.debug_info.clone(),
            }),
            Statement::UntilLoop(until_loop) => Statement::UntilLoop(UntilLoop {
                condition: self.instantiate_generic_expression(&until_loop.condition),
                loop_body: self.instantiate_generic_code(&until_loop.loop_body),
                debug_info: until_loop.debug_info.clone(),
            }),
            Statement::Return(return_statement) => Statement::Return(Return {
                return_value: return_statement
                    .return_value
                    .as_ref()
                    .map(|value| self.instantiate_generic_expression(value)),
                debug_info: return_statement.debug_info.clone(),
            }),
            Statement::Break(_) | Statement::Continue(_) => statement.clone(),
        }
    }

    pub fn instantiate_generic_code(&self, code: &[Statement]) -> Vec<Statement> {
        code.iter()
            .map(|statement| self.instantiate_generic_statement(statement))
            .collect()
    }

    pub fn instantiate_generic_struct_definition(
        &self,
        struct_def: &StructDefinition,
        new_name: &str,
    ) -> StructDefinition {
        StructDefinition {
            def_name: new_name.to_string(),
            template_generics: Vec::new(),
            fields: struct_def
                .fields
                .iter()
                .map(|field| StructField {
                    field_name: field.field_name.clone(),
                    field_type: self.instantiate_generic_typesignature(&field.field_type),
                })
                .collect(),
            debug_info: struct_def.debug_info.clone(),
        }
    }

    pub fn instantiate_generic_union_definition(
        &self,
        union_def: &UnionDefinition,
        new_name: &str,
    ) -> UnionDefinition {
        UnionDefinition {
            def_name: new_name.to_string(),
            template_generics: Vec::new(),
            types: self.instantiate_signatures(&union_def.types),
            debug_info: union_def.debug_info.clone(),
        }
    }

    pub fn instantiate_generic_alias_definition(&self, alias: &TypeAlias, new_name: &str) -> TypeAlias {
        TypeAlias {
            alias_name: new_name.to_string(),
            template_generics: Vec::new(),
            aliased_type: self.instantiate_generic_typesignature(&alias.aliased_type),
            debug_info: alias.debug_info.clone(),
        }
    }

    pub fn instantiate_generic_typedefinition(
        &self,
        type_def: &TypeDefinition,
        new_name: &str,
    ) -> TypeDefinition {
        match type_def {
            TypeDefinition::Struct(def) => {
                TypeDefinition::Struct(self.instantiate_generic_struct_definition(def, new_name))
            }
            TypeDefinition::Union(def) => {
                TypeDefinition::Union(self.instantiate_generic_union_definition(def, new_name))
            }
            TypeDefinition::Alias(def) => {
                TypeDefinition::Alias(self.instantiate_generic_alias_definition(def, new_name))
            }
        }
    }

    pub fn instantiate_generic_function(
        &self,
        func_def: &FunctionDefinition,
        new_name: &str,
    ) -> FunctionDefinition {
        FunctionDefinition {
            function_name: new_name.to_string(),
            template_generics: Vec::new(),
            arguments: func_def
                .arguments
                .iter()
                .map(|argument| FunctionArgument {
                    arg_name: argument.arg_name.clone(),
                    arg_type: self.instantiate_generic_typesignature(&argument.arg_type),
                })
                .collect(),
            return_type: func_def
                .return_type
                .as_ref()
                .map(|return_type| self.instantiate_generic_typesignature(return_type)),
            code: self.instantiate_generic_code(&func_def.code),
            debug_info: func_def.debug_info.clone(),
        }
    }
}
