use crate::error::{to_source_span, CompilationError, ValidationError};
use basalt_parser::{Expression, FunctionDefinition, Statement, UnaryOperatorKind};

/// Rejects `&` applied to values that have no storage of their own
pub struct AddressSanitizer<'f> {
    func_def: &'f FunctionDefinition,
    errors: Vec<CompilationError>,
}

impl<'f> AddressSanitizer<'f> {
    pub fn new(func_def: &'f FunctionDefinition) -> Self {
        Self {
            func_def,
            errors: Vec::new(),
        }
    }

    pub fn visit_function(mut self) -> Vec<CompilationError> {
        self.visit_code(&self.func_def.code);
        self.errors
    }

    fn visit_code(&mut self, code: &[Statement]) {
        for statement in code {
            self.visit_statement(statement);
        }
    }

    fn visit_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::FunctionCall(call) => call.arguments.iter().for_each(|argument| self.visit_expression(argument)),
            Statement::VariableDeclaration(declaration) => {
                if let Some(value) = &declaration.initial_value {
                    self.visit_expression(value);
                }
            }
            Statement::ConstDeclaration(declaration) => self.visit_expression(&declaration.value),
            Statement::Assignment(assignment) => {
                self.visit_expression(&assignment.assignment_target);
                self.visit_expression(&assignment.assigned_value);
            }
            Statement::Conditional(conditional) => {
                self.visit_expression(&conditional.condition);
                self.visit_code(&conditional.then_branch);
                self.visit_code(&conditional.else_branch);
            }
            Statement::WhileLoop(while_loop) => {
                self.visit_expression(&while_loop.condition);
                self.visit_code(&while_loop.loop_body);
            }
            Statement::UntilLoop(until_loop) => {
                self.visit_expression(&until_loop.condition);
                self.visit_code(&until_loop.loop_body);
            }
            Statement::Return(return_statement) => {
                if let Some(value) = &return_statement.return_value {
                    self.visit_expression(value);
                }
            }
            Statement::Break(_) | Statement::Continue(_) => {}
        }
    }

    fn visit_expression(&mut self, expression: &Expression) {
        match expression {
            Expression::UnaryOperator(operator) => {
                if operator.operator == UnaryOperatorKind::AddressOf && !is_addressable(&operator.operand) {
                    self.errors.push(
                        ValidationError::AddressOfTemporary {
                            debug_info: operator.debug_info.clone(),
                            span: to_source_span(&operator.debug_info),
                        }
                        .into(),
                    );
                }
                self.visit_expression(&operator.operand);
            }
            Expression::FunctionCall(call) => call.arguments.iter().for_each(|argument| self.visit_expression(argument)),
            Expression::BinaryOperator(operator) => {
                self.visit_expression(&operator.left_operand);
                self.visit_expression(&operator.right_operand);
            }
            Expression::TypeOperator(operator) => self.visit_expression(&operator.expression),
            Expression::DotMemberAccess(access) => self.visit_expression(&access.struct_value),
            Expression::SquareBracketsAccess(access) => {
                self.visit_expression(&access.storage);
                self.visit_expression(&access.index);
            }
            Expression::ArrayLiteral(literal) => literal.elements.iter().for_each(|element| self.visit_expression(element)),
            Expression::Identifier(_)
            | Expression::IntLiteral(_)
            | Expression::FloatLiteral(_)
            | Expression::BoolLiteral(_)
            | Expression::CharLiteral(_)
            | Expression::StringLiteral(_) => {}
        }
    }
}

pub fn is_addressable(expression: &Expression) -> bool {
    match expression {
        Expression::Identifier(_) | Expression::DotMemberAccess(_) | Expression::SquareBracketsAccess(_) => true,
        Expression::UnaryOperator(operator) => operator.operator == UnaryOperatorKind::Dereference,
        Expression::TypeOperator(operator) => is_addressable(&operator.expression),
        _ => false,
    }
}
