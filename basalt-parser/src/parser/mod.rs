// Basalt Parser
// Pest-based reader turning Basalt source text into AST values

use miette::SourceSpan;
use pest::Parser;
use pest_derive::Parser;

use crate::ast::*;
use crate::error::*;

mod definitions;
mod expressions;
mod statements;
mod types;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct BasaltParser;

pub(crate) type Pair<'i> = pest::iterators::Pair<'i, Rule>;

/// Per-file state threaded through every builder
///
/// `generics` holds the generic parameter names of the enclosing
/// definition; unprefixed, parameterless type names found in that list are
/// read as template types.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ReaderContext<'a> {
    pub filename: &'a str,
    pub src: &'a str,
    pub generics: &'a [String],
}

impl<'a> ReaderContext<'a> {
    pub fn new(filename: &'a str, src: &'a str) -> Self {
        Self {
            filename,
            src,
            generics: &[],
        }
    }

    pub fn with_generics(self, generics: &'a [String]) -> Self {
        Self { generics, ..self }
    }

    pub fn is_generic_name(&self, name: &str) -> bool {
        self.generics.iter().any(|generic| generic == name)
    }
}

impl BasaltParser {
    /// Read a whole source file
    pub fn parse_file(filename: &str, src: &str) -> ParseResult<FileRepresentation> {
        let ctx = ReaderContext::new(filename, src);
        let file_pair = Self::parse_single(&ctx, Rule::file)?;

        let mut package_name = None;
        let mut imports = Vec::new();
        let mut type_defs = Vec::new();
        let mut func_defs = Vec::new();

        for pair in file_pair.into_inner() {
            match pair.as_rule() {
                Rule::package_declaration => {
                    package_name = Some(Self::parse_package_name(&ctx, pair)?);
                }
                Rule::import_declaration => {
                    imports.push(Self::parse_package_name(&ctx, pair)?);
                }
                Rule::definition => {
                    let start = pair.as_span().start();
                    let inner = Self::expect_next(&ctx, &mut pair.into_inner(), start, "a definition")?;
                    match inner.as_rule() {
                        Rule::struct_definition => {
                            type_defs.push(TypeDefinition::Struct(Self::parse_struct_definition(&ctx, inner)?));
                        }
                        Rule::union_definition => {
                            type_defs.push(TypeDefinition::Union(Self::parse_union_definition(&ctx, inner)?));
                        }
                        Rule::alias_definition => {
                            type_defs.push(TypeDefinition::Alias(Self::parse_alias_definition(&ctx, inner)?));
                        }
                        Rule::function_definition => {
                            func_defs.push(Self::parse_function_definition(&ctx, inner)?);
                        }
                        _ => return Err(Self::unexpected(&ctx, &inner, "a definition")),
                    }
                }
                _ => {}
            }
        }

        let package_name = package_name.ok_or_else(|| {
            ParseError::unexpected_token(
                src.to_string(),
                SourceSpan::new(0.into(), 0),
                "`package <name>;`".to_string(),
            )
        })?;

        Ok(FileRepresentation {
            filename: filename.to_string(),
            package_name,
            imports,
            type_defs,
            func_defs,
        })
    }

    /// Read a standalone type signature such as `#[4]Pair<Int, String>`
    pub fn parse_type_signature(src: &str) -> ParseResult<TypeSignature> {
        Self::parse_type_signature_with_generics(src, &[])
    }

    /// Read a standalone type signature, turning the listed names into
    /// template types
    pub fn parse_type_signature_with_generics(
        src: &str,
        generics: &[String],
    ) -> ParseResult<TypeSignature> {
        let ctx = ReaderContext::new("<typesignature>", src).with_generics(generics);
        let pair = Self::parse_single(&ctx, Rule::type_signature_only)?;
        let start = pair.as_span().start();
        let inner = Self::expect_next(&ctx, &mut pair.into_inner(), start, "a type")?;
        Self::parse_type_signature_pair(&ctx, inner)
    }

    /// Read a standalone expression
    pub fn parse_expression(src: &str) -> ParseResult<Expression> {
        let ctx = ReaderContext::new("<expression>", src);
        let pair = Self::parse_single(&ctx, Rule::expression_only)?;
        let start = pair.as_span().start();
        let inner = Self::expect_next(&ctx, &mut pair.into_inner(), start, "an expression")?;
        Self::parse_expression_pair(&ctx, inner)
    }

    fn parse_single<'i>(ctx: &ReaderContext<'i>, rule: Rule) -> ParseResult<Pair<'i>> {
        let mut pairs = <Self as Parser<Rule>>::parse(rule, ctx.src)
            .map_err(|error| ParseError::from_pest_error(error, ctx.src.to_string()))?;
        Self::expect_next(ctx, &mut pairs, 0, "input")
    }

    fn parse_package_name(ctx: &ReaderContext, pair: Pair) -> ParseResult<String> {
        pair.clone()
            .into_inner()
            .find(|inner| inner.as_rule() == Rule::package_name)
            .map(|inner| inner.as_str().to_string())
            .ok_or_else(|| Self::unexpected(ctx, &pair, "a package name"))
    }

    /// Location of a pair inside the current file
    pub(crate) fn debug_info(ctx: &ReaderContext, pair: &Pair) -> DebugInfo {
        let span = pair.as_span();
        let (line_number, tok_number) = span.start_pos().line_col();
        DebugInfo::new(ctx.filename, line_number, tok_number, span.start())
    }

    pub(crate) fn source_span(pair: &Pair) -> SourceSpan {
        let span = pair.as_span();
        SourceSpan::new(span.start().into(), span.end() - span.start())
    }

    /// Pull the next pair out of an iterator, failing with a located error
    pub(crate) fn expect_next<'i>(
        ctx: &ReaderContext,
        pairs: &mut impl Iterator<Item = Pair<'i>>,
        position: usize,
        expected: &str,
    ) -> ParseResult<Pair<'i>> {
        pairs.next().ok_or_else(|| {
            ParseError::unexpected_token(
                ctx.src.to_string(),
                SourceSpan::new(position.into(), 0),
                expected.to_string(),
            )
        })
    }

    /// First inner pair matching `rule`
    pub(crate) fn find_inner<'i>(pair: &Pair<'i>, rule: Rule) -> Option<Pair<'i>> {
        pair.clone().into_inner().find(|inner| inner.as_rule() == rule)
    }

    pub(crate) fn unexpected(ctx: &ReaderContext, pair: &Pair, expected: &str) -> ParseError {
        ParseError::unexpected_token(
            ctx.src.to_string(),
            Self::source_span(pair),
            expected.to_string(),
        )
    }

    pub(crate) fn parse_usize(ctx: &ReaderContext, pair: &Pair) -> ParseResult<usize> {
        pair.as_str().parse::<usize>().map_err(|_| {
            ParseError::invalid_integer(
                ctx.src.to_string(),
                Self::source_span(pair),
                pair.as_str().to_string(),
            )
        })
    }
}
