// Expression reading
// Covers operator precedence, prefix and postfix operators, calls and literals

use basalt_parser::ast::*;
use basalt_parser::parse_expression;
use pretty_assertions::assert_eq;

fn binary(expression: &Expression) -> &BinaryOperator {
    match expression {
        Expression::BinaryOperator(binary) => binary,
        other => panic!("Expected binary operator, got {other:?}"),
    }
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let expression = parse_expression("1 + 2 * 3").unwrap();
    let sum = binary(&expression);
    assert_eq!(sum.operator, BinaryOperatorKind::Sum);
    assert!(matches!(*sum.left_operand, Expression::IntLiteral(IntLiteral { value: 1, .. })));
    assert_eq!(binary(&sum.right_operand).operator, BinaryOperatorKind::Mul);
}

#[test]
fn test_logical_precedence() {
    let expression = parse_expression("a || b && c == d").unwrap();
    let or = binary(&expression);
    assert_eq!(or.operator, BinaryOperatorKind::Or);
    let and = binary(&or.right_operand);
    assert_eq!(and.operator, BinaryOperatorKind::And);
    assert_eq!(binary(&and.right_operand).operator, BinaryOperatorKind::Equal);
}

#[test]
fn test_left_associativity() {
    let expression = parse_expression("10 - 4 - 3").unwrap();
    let outer = binary(&expression);
    assert_eq!(outer.operator, BinaryOperatorKind::Sub);
    assert_eq!(binary(&outer.left_operand).operator, BinaryOperatorKind::Sub);
}

#[test]
fn test_parentheses_override_precedence() {
    let expression = parse_expression("(1 + 2) * 3").unwrap();
    let mul = binary(&expression);
    assert_eq!(mul.operator, BinaryOperatorKind::Mul);
    assert_eq!(binary(&mul.left_operand).operator, BinaryOperatorKind::Sum);
}

#[test]
fn test_prefix_operators() {
    let expression = parse_expression("-x + !y").unwrap();
    let sum = binary(&expression);
    assert!(matches!(
        &*sum.left_operand,
        Expression::UnaryOperator(UnaryOperator { operator: UnaryOperatorKind::Minus, .. })
    ));
    assert!(matches!(
        &*sum.right_operand,
        Expression::UnaryOperator(UnaryOperator { operator: UnaryOperatorKind::Not, .. })
    ));
}

#[test]
fn test_member_access_binds_tighter_than_dereference() {
    let expression = parse_expression("#node.next").unwrap();
    match expression {
        Expression::UnaryOperator(unary) => {
            assert_eq!(unary.operator, UnaryOperatorKind::Dereference);
            assert!(matches!(*unary.operand, Expression::DotMemberAccess(_)));
        }
        other => panic!("Expected dereference, got {other:?}"),
    }
}

#[test]
fn test_address_of_indexed_element() {
    let expression = parse_expression("&items[i + 1]").unwrap();
    match expression {
        Expression::UnaryOperator(unary) => {
            assert_eq!(unary.operator, UnaryOperatorKind::AddressOf);
            match *unary.operand {
                Expression::SquareBracketsAccess(access) => {
                    assert_eq!(binary(&access.index).operator, BinaryOperatorKind::Sum);
                }
                other => panic!("Expected square brackets access, got {other:?}"),
            }
        }
        other => panic!("Expected address-of, got {other:?}"),
    }
}

#[test]
fn test_type_operators() {
    let expression = parse_expression("value is Int && other as Float == 1.5").unwrap();
    let and = binary(&expression);
    assert_eq!(and.operator, BinaryOperatorKind::And);

    match &*and.left_operand {
        Expression::TypeOperator(type_operator) => {
            assert_eq!(type_operator.operator, TypeOperatorKind::Is);
            assert_eq!(type_operator.typesignature, TypeSignature::int());
        }
        other => panic!("Expected type operator, got {other:?}"),
    }

    let equal = binary(&and.right_operand);
    match &*equal.left_operand {
        Expression::TypeOperator(type_operator) => {
            assert_eq!(type_operator.operator, TypeOperatorKind::As);
            assert_eq!(type_operator.typesignature, TypeSignature::float());
        }
        other => panic!("Expected type operator, got {other:?}"),
    }
}

#[test]
fn test_generic_call_with_prefix() {
    let expression = parse_expression("collections::push<Int>(list, 3)").unwrap();
    match expression {
        Expression::FunctionCall(call) => {
            assert_eq!(call.package_prefix.as_deref(), Some("collections"));
            assert_eq!(call.function_name, "push");
            assert_eq!(call.instantiated_generics, vec![TypeSignature::int()]);
            assert_eq!(call.arguments.len(), 2);
        }
        other => panic!("Expected function call, got {other:?}"),
    }
}

#[test]
fn test_less_than_is_not_a_generic_call() {
    let expression = parse_expression("a < b").unwrap();
    assert_eq!(binary(&expression).operator, BinaryOperatorKind::Less);
}

#[test]
fn test_array_literal() {
    let expression = parse_expression("[3] Int {1, 2, 3}").unwrap();
    match expression {
        Expression::ArrayLiteral(literal) => {
            assert_eq!(literal.array_length, 3);
            assert_eq!(literal.stored_type, TypeSignature::int());
            assert_eq!(literal.elements.len(), 3);
        }
        other => panic!("Expected array literal, got {other:?}"),
    }
}

#[test]
fn test_literals() {
    assert!(matches!(
        parse_expression("true").unwrap(),
        Expression::BoolLiteral(BoolLiteral { value: true, .. })
    ));
    assert!(matches!(
        parse_expression("'\\n'").unwrap(),
        Expression::CharLiteral(CharLiteral { value: '\n', .. })
    ));
    match parse_expression("\"tab\\there\"").unwrap() {
        Expression::StringLiteral(literal) => assert_eq!(literal.value, "tab\there"),
        other => panic!("Expected string literal, got {other:?}"),
    }
    match parse_expression("2.25").unwrap() {
        Expression::FloatLiteral(literal) => assert_eq!(literal.value, 2.25),
        other => panic!("Expected float literal, got {other:?}"),
    }
}

#[test]
fn test_invalid_literals_are_errors() {
    assert!(parse_expression("'ab'").is_err());
    assert!(parse_expression("\"bad \\q escape\"").is_err());
    assert!(parse_expression("99999999999999999999").is_err());
}
