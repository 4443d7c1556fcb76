// Expression parsing module
// Handles operator precedence, postfix accesses, calls, array literals and literals

use pest::pratt_parser::{Assoc, Op, PrattParser};

use crate::ast::*;
use crate::error::*;
use crate::parser::{BasaltParser, Pair, ReaderContext, Rule};

impl BasaltParser {
    /// Operator precedence table, from loosest to tightest binding
    pub(crate) fn pratt_parser() -> PrattParser<Rule> {
        PrattParser::new()
            .op(Op::infix(Rule::op_or, Assoc::Left))
            .op(Op::infix(Rule::op_xor, Assoc::Left))
            .op(Op::infix(Rule::op_and, Assoc::Left))
            .op(Op::infix(Rule::op_equal, Assoc::Left) | Op::infix(Rule::op_not_equal, Assoc::Left))
            .op(Op::infix(Rule::op_less, Assoc::Left)
                | Op::infix(Rule::op_less_equal, Assoc::Left)
                | Op::infix(Rule::op_greater, Assoc::Left)
                | Op::infix(Rule::op_greater_equal, Assoc::Left))
            .op(Op::infix(Rule::op_sum, Assoc::Left) | Op::infix(Rule::op_sub, Assoc::Left))
            .op(Op::infix(Rule::op_mul, Assoc::Left)
                | Op::infix(Rule::op_div, Assoc::Left)
                | Op::infix(Rule::op_mod, Assoc::Left))
            .op(Op::postfix(Rule::type_operation))
            .op(Op::prefix(Rule::op_address_of)
                | Op::prefix(Rule::op_dereference)
                | Op::prefix(Rule::op_not)
                | Op::prefix(Rule::op_plus)
                | Op::prefix(Rule::op_minus))
            .op(Op::postfix(Rule::member_access) | Op::postfix(Rule::index_access))
    }

    /// Parse an `expression` pair with full precedence support
    pub(crate) fn parse_expression_pair(ctx: &ReaderContext, pair: Pair) -> ParseResult<Expression> {
        if pair.as_rule() != Rule::expression {
            return Self::parse_primary(ctx, pair);
        }

        Self::pratt_parser()
            .map_primary(|primary| Self::parse_primary(ctx, primary))
            .map_prefix(|op, operand: ParseResult<Expression>| {
                let operator = match UnaryOperatorKind::from_symbol(op.as_str()) {
                    Some(operator) => operator,
                    None => return Err(Self::unexpected(ctx, &op, "a prefix operator")),
                };
                Ok(Expression::UnaryOperator(UnaryOperator {
                    operator,
                    operand: Box::new(operand?),
                    debug_info: Self::debug_info(ctx, &op),
                }))
            })
            .map_postfix(|operand: ParseResult<Expression>, op| {
                Self::parse_postfix_operation(ctx, operand?, op)
            })
            .map_infix(
                |left: ParseResult<Expression>, op, right: ParseResult<Expression>| {
                    let operator = match BinaryOperatorKind::from_symbol(op.as_str()) {
                        Some(operator) => operator,
                        None => return Err(Self::unexpected(ctx, &op, "a binary operator")),
                    };
                    Ok(Expression::BinaryOperator(BinaryOperator {
                        operator,
                        left_operand: Box::new(left?),
                        right_operand: Box::new(right?),
                        debug_info: Self::debug_info(ctx, &op),
                    }))
                },
            )
            .parse(pair.into_inner())
    }

    fn parse_postfix_operation(
        ctx: &ReaderContext,
        operand: Expression,
        op: Pair,
    ) -> ParseResult<Expression> {
        let debug_info = Self::debug_info(ctx, &op);
        let start = op.as_span().start();

        match op.as_rule() {
            Rule::member_access => {
                let member = Self::expect_next(ctx, &mut op.into_inner(), start, "a member name")?;
                Ok(Expression::DotMemberAccess(DotMemberAccess {
                    struct_value: Box::new(operand),
                    member_name: member.as_str().to_string(),
                    debug_info,
                }))
            }
            Rule::index_access => {
                let index = Self::expect_next(ctx, &mut op.into_inner(), start, "an index")?;
                Ok(Expression::SquareBracketsAccess(SquareBracketsAccess {
                    storage: Box::new(operand),
                    index: Box::new(Self::parse_expression_pair(ctx, index)?),
                    debug_info,
                }))
            }
            Rule::type_operation => {
                let mut inner_pairs = op.into_inner();
                let keyword = Self::expect_next(ctx, &mut inner_pairs, start, "`is` or `as`")?;
                let operator = match keyword.as_rule() {
                    Rule::kw_is => TypeOperatorKind::Is,
                    _ => TypeOperatorKind::As,
                };
                let type_pair = Self::expect_next(ctx, &mut inner_pairs, start, "a type")?;
                Ok(Expression::TypeOperator(TypeOperator {
                    operator,
                    expression: Box::new(operand),
                    typesignature: Self::parse_type_signature_pair(ctx, type_pair)?,
                    debug_info,
                }))
            }
            _ => Err(Self::unexpected(ctx, &op, "a postfix operator")),
        }
    }

    fn parse_primary(ctx: &ReaderContext, pair: Pair) -> ParseResult<Expression> {
        let debug_info = Self::debug_info(ctx, &pair);

        match pair.as_rule() {
            Rule::expression => Self::parse_expression_pair(ctx, pair),
            Rule::function_call => Ok(Expression::FunctionCall(Self::parse_function_call(ctx, pair)?)),
            Rule::array_literal => Self::parse_array_literal(ctx, pair),
            Rule::identifier => Ok(Expression::Identifier(Identifier {
                name: pair.as_str().to_string(),
                debug_info,
            })),
            Rule::integer => {
                let value = pair.as_str().parse::<i64>().map_err(|_| {
                    ParseError::invalid_integer(
                        ctx.src.to_string(),
                        Self::source_span(&pair),
                        pair.as_str().to_string(),
                    )
                })?;
                Ok(Expression::IntLiteral(IntLiteral { value, debug_info }))
            }
            Rule::float => {
                let value = pair.as_str().parse::<f64>().map_err(|_| {
                    ParseError::invalid_float(
                        ctx.src.to_string(),
                        Self::source_span(&pair),
                        pair.as_str().to_string(),
                    )
                })?;
                Ok(Expression::FloatLiteral(FloatLiteral { value, debug_info }))
            }
            Rule::boolean => Ok(Expression::BoolLiteral(BoolLiteral {
                value: pair.as_str() == "true",
                debug_info,
            })),
            Rule::string => {
                let value = Self::unescape(ctx, &pair)?;
                Ok(Expression::StringLiteral(StringLiteral { value, debug_info }))
            }
            Rule::character => {
                let content = Self::unescape(ctx, &pair)?;
                let mut chars = content.chars();
                match (chars.next(), chars.next()) {
                    (Some(value), None) => Ok(Expression::CharLiteral(CharLiteral { value, debug_info })),
                    _ => Err(ParseError::invalid_char(
                        ctx.src.to_string(),
                        Self::source_span(&pair),
                        pair.as_str().to_string(),
                    )),
                }
            }
            _ => Err(Self::unexpected(ctx, &pair, "an expression")),
        }
    }

    /// Parse `pkg::name<Generics>(arguments)`
    pub(crate) fn parse_function_call(ctx: &ReaderContext, pair: Pair) -> ParseResult<FunctionCall> {
        let debug_info = Self::debug_info(ctx, &pair);
        let mut package_prefix = None;
        let mut function_name = None;
        let mut instantiated_generics = Vec::new();
        let mut arguments = Vec::new();

        for inner in pair.clone().into_inner() {
            match inner.as_rule() {
                Rule::package_name => package_prefix = Some(inner.as_str().to_string()),
                Rule::identifier => function_name = Some(inner.as_str().to_string()),
                Rule::call_generics => {
                    for generic in inner.into_inner() {
                        instantiated_generics.push(Self::parse_type_signature_pair(ctx, generic)?);
                    }
                }
                Rule::call_arguments => {
                    for argument in inner.into_inner() {
                        arguments.push(Self::parse_expression_pair(ctx, argument)?);
                    }
                }
                _ => {}
            }
        }

        Ok(FunctionCall {
            function_name: function_name
                .ok_or_else(|| Self::unexpected(ctx, &pair, "a function name"))?,
            package_prefix,
            instantiated_generics,
            arguments,
            debug_info,
        })
    }

    /// Parse `[N] Type { elements }`
    fn parse_array_literal(ctx: &ReaderContext, pair: Pair) -> ParseResult<Expression> {
        let debug_info = Self::debug_info(ctx, &pair);
        let start = pair.as_span().start();
        let mut inner_pairs = pair.into_inner();

        let length_pair = Self::expect_next(ctx, &mut inner_pairs, start, "an array length")?;
        let array_length = Self::parse_usize(ctx, &length_pair)?;
        let type_pair = Self::expect_next(ctx, &mut inner_pairs, start, "an element type")?;
        let stored_type = Self::parse_type_signature_pair(ctx, type_pair)?;
        let elements = inner_pairs
            .map(|element| Self::parse_expression_pair(ctx, element))
            .collect::<ParseResult<Vec<_>>>()?;

        Ok(Expression::ArrayLiteral(ArrayLiteral {
            array_length,
            stored_type,
            elements,
            debug_info,
        }))
    }

    /// Strip the quotes of a string or character literal and resolve escapes
    fn unescape(ctx: &ReaderContext, pair: &Pair) -> ParseResult<String> {
        let text = pair.as_str();
        let body = &text[1..text.len() - 1];
        let mut result = String::with_capacity(body.len());
        let mut chars = body.chars();

        while let Some(ch) = chars.next() {
            if ch != '\\' {
                result.push(ch);
                continue;
            }
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('t') => result.push('\t'),
                Some('r') => result.push('\r'),
                Some('0') => result.push('\0'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some('\'') => result.push('\''),
                other => {
                    let found = other.map(|c| format!("\\{c}")).unwrap_or_else(|| "\\".to_string());
                    return Err(ParseError::invalid_escape(
                        ctx.src.to_string(),
                        Self::source_span(pair),
                        found,
                    ));
                }
            }
        }

        Ok(result)
    }
}
