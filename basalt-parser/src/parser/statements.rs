// Statement parsing module
// Handles blocks, declarations, assignments, conditionals, loops and jumps

use crate::ast::*;
use crate::error::*;
use crate::parser::{BasaltParser, Pair, ReaderContext, Rule};

impl BasaltParser {
    /// Parse a `{ ... }` block into its statements
    pub(crate) fn parse_block(ctx: &ReaderContext, pair: Pair) -> ParseResult<Vec<Statement>> {
        pair.into_inner()
            .filter(|inner| inner.as_rule() == Rule::statement)
            .map(|inner| Self::parse_statement(ctx, inner))
            .collect()
    }

    pub(crate) fn parse_statement(ctx: &ReaderContext, pair: Pair) -> ParseResult<Statement> {
        let start = pair.as_span().start();
        let inner = Self::expect_next(ctx, &mut pair.into_inner(), start, "a statement")?;
        let debug_info = Self::debug_info(ctx, &inner);

        match inner.as_rule() {
            Rule::variable_declaration => {
                let (identifier_name, typesignature, value) = Self::parse_declaration(ctx, inner)?;
                Ok(Statement::VariableDeclaration(VariableDeclaration {
                    identifier_name,
                    typesignature,
                    initial_value: value,
                    debug_info,
                }))
            }
            Rule::const_declaration => {
                let declaration = inner.clone();
                let (identifier_name, typesignature, value) = Self::parse_declaration(ctx, inner)?;
                let value = value.ok_or_else(|| Self::unexpected(ctx, &declaration, "a constant value"))?;
                Ok(Statement::ConstDeclaration(ConstDeclaration {
                    identifier_name,
                    typesignature,
                    value,
                    debug_info,
                }))
            }
            Rule::conditional => Ok(Statement::Conditional(Self::parse_conditional(ctx, inner)?)),
            Rule::while_loop => {
                let (condition, loop_body) = Self::parse_loop(ctx, inner)?;
                Ok(Statement::WhileLoop(WhileLoop {
                    condition,
                    loop_body,
                    debug_info,
                }))
            }
            Rule::until_loop => {
                let (condition, loop_body) = Self::parse_loop(ctx, inner)?;
                Ok(Statement::UntilLoop(UntilLoop {
                    condition,
                    loop_body,
                    debug_info,
                }))
            }
            Rule::return_statement => {
                let return_value = match Self::find_inner(&inner, Rule::expression) {
                    Some(expression) => Some(Self::parse_expression_pair(ctx, expression)?),
                    None => None,
                };
                Ok(Statement::Return(Return {
                    return_value,
                    debug_info,
                }))
            }
            Rule::break_statement => Ok(Statement::Break(Break { debug_info })),
            Rule::continue_statement => Ok(Statement::Continue(Continue { debug_info })),
            Rule::assignment => {
                let start = inner.as_span().start();
                let mut inner_pairs = inner.into_inner();
                let target = Self::expect_next(ctx, &mut inner_pairs, start, "an assignment target")?;
                let value = Self::expect_next(ctx, &mut inner_pairs, start, "an assigned value")?;
                Ok(Statement::Assignment(Assignment {
                    assignment_target: Self::parse_expression_pair(ctx, target)?,
                    assigned_value: Self::parse_expression_pair(ctx, value)?,
                    debug_info,
                }))
            }
            Rule::call_statement => {
                let start = inner.as_span().start();
                let call = Self::expect_next(ctx, &mut inner.into_inner(), start, "a function call")?;
                Ok(Statement::FunctionCall(Self::parse_function_call(ctx, call)?))
            }
            _ => Err(Self::unexpected(ctx, &inner, "a statement")),
        }
    }

    /// Shared shape of `var` and `const`: name, type and optional value
    fn parse_declaration(
        ctx: &ReaderContext,
        pair: Pair,
    ) -> ParseResult<(String, TypeSignature, Option<Expression>)> {
        let mut identifier_name = None;
        let mut typesignature = None;
        let mut value = None;

        for inner in pair.clone().into_inner() {
            match inner.as_rule() {
                Rule::identifier => identifier_name = Some(inner.as_str().to_string()),
                Rule::type_signature => {
                    typesignature = Some(Self::parse_type_signature_pair(ctx, inner)?)
                }
                Rule::expression => value = Some(Self::parse_expression_pair(ctx, inner)?),
                _ => {}
            }
        }

        let identifier_name =
            identifier_name.ok_or_else(|| Self::unexpected(ctx, &pair, "an identifier"))?;
        let typesignature = typesignature.ok_or_else(|| Self::unexpected(ctx, &pair, "a type"))?;
        Ok((identifier_name, typesignature, value))
    }

    fn parse_conditional(ctx: &ReaderContext, pair: Pair) -> ParseResult<Conditional> {
        let debug_info = Self::debug_info(ctx, &pair);
        let mut condition = None;
        let mut then_branch = None;
        let mut else_branch = Vec::new();

        for inner in pair.clone().into_inner() {
            match inner.as_rule() {
                Rule::expression => condition = Some(Self::parse_expression_pair(ctx, inner)?),
                Rule::block if then_branch.is_none() => {
                    then_branch = Some(Self::parse_block(ctx, inner)?)
                }
                Rule::block => else_branch = Self::parse_block(ctx, inner)?,
                Rule::conditional => {
                    else_branch = vec![Statement::Conditional(Self::parse_conditional(ctx, inner)?)]
                }
                _ => {}
            }
        }

        Ok(Conditional {
            condition: condition.ok_or_else(|| Self::unexpected(ctx, &pair, "a condition"))?,
            then_branch: then_branch.unwrap_or_default(),
            else_branch,
            debug_info,
        })
    }

    fn parse_loop(ctx: &ReaderContext, pair: Pair) -> ParseResult<(Expression, Vec<Statement>)> {
        let condition_pair = Self::find_inner(&pair, Rule::expression)
            .ok_or_else(|| Self::unexpected(ctx, &pair, "a loop condition"))?;
        let body_pair = Self::find_inner(&pair, Rule::block)
            .ok_or_else(|| Self::unexpected(ctx, &pair, "a loop body"))?;
        Ok((
            Self::parse_expression_pair(ctx, condition_pair)?,
            Self::parse_block(ctx, body_pair)?,
        ))
    }
}
