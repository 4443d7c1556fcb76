// Definition parsing module
// Handles struct, union, alias and function definitions

use crate::ast::*;
use crate::error::*;
use crate::parser::{BasaltParser, Pair, ReaderContext, Rule};

impl BasaltParser {
    pub(crate) fn parse_struct_definition(
        ctx: &ReaderContext,
        pair: Pair,
    ) -> ParseResult<StructDefinition> {
        let debug_info = Self::debug_info(ctx, &pair);
        let def_name = Self::definition_name(ctx, &pair)?;
        let template_generics = Self::definition_generics(&pair);
        let inner_ctx = ctx.with_generics(&template_generics);

        let mut fields = Vec::new();
        for field_pair in pair.into_inner().filter(|p| p.as_rule() == Rule::struct_field) {
            let start = field_pair.as_span().start();
            let mut inner_pairs = field_pair.into_inner();
            let name_pair = Self::expect_next(ctx, &mut inner_pairs, start, "a field name")?;
            let type_pair = Self::expect_next(ctx, &mut inner_pairs, start, "a field type")?;
            fields.push(StructField {
                field_name: name_pair.as_str().to_string(),
                field_type: Self::parse_type_signature_pair(&inner_ctx, type_pair)?,
            });
        }

        Ok(StructDefinition {
            def_name,
            template_generics: template_generics.clone(),
            fields,
            debug_info,
        })
    }

    pub(crate) fn parse_union_definition(
        ctx: &ReaderContext,
        pair: Pair,
    ) -> ParseResult<UnionDefinition> {
        let debug_info = Self::debug_info(ctx, &pair);
        let def_name = Self::definition_name(ctx, &pair)?;
        let template_generics = Self::definition_generics(&pair);
        let inner_ctx = ctx.with_generics(&template_generics);

        let types_pair = Self::find_inner(&pair, Rule::type_signature)
            .ok_or_else(|| Self::unexpected(ctx, &pair, "the union alternatives"))?;
        let types = match Self::parse_type_signature_pair(&inner_ctx, types_pair)? {
            TypeSignature::InlineUnion(union) => union.alternatives,
            single => vec![single],
        };

        Ok(UnionDefinition {
            def_name,
            template_generics: template_generics.clone(),
            types,
            debug_info,
        })
    }

    pub(crate) fn parse_alias_definition(
        ctx: &ReaderContext,
        pair: Pair,
    ) -> ParseResult<TypeAlias> {
        let debug_info = Self::debug_info(ctx, &pair);
        let alias_name = Self::definition_name(ctx, &pair)?;
        let template_generics = Self::definition_generics(&pair);
        let inner_ctx = ctx.with_generics(&template_generics);

        let aliased_pair = Self::find_inner(&pair, Rule::type_signature)
            .ok_or_else(|| Self::unexpected(ctx, &pair, "the aliased type"))?;
        let aliased_type = Self::parse_type_signature_pair(&inner_ctx, aliased_pair)?;

        Ok(TypeAlias {
            alias_name,
            template_generics: template_generics.clone(),
            aliased_type,
            debug_info,
        })
    }

    pub(crate) fn parse_function_definition(
        ctx: &ReaderContext,
        pair: Pair,
    ) -> ParseResult<FunctionDefinition> {
        let debug_info = Self::debug_info(ctx, &pair);
        let function_name = Self::find_inner(&pair, Rule::identifier)
            .map(|name| name.as_str().to_string())
            .ok_or_else(|| Self::unexpected(ctx, &pair, "a function name"))?;
        let template_generics = Self::definition_generics(&pair);
        let inner_ctx = ctx.with_generics(&template_generics);

        let mut arguments = Vec::new();
        let mut return_type = None;
        let mut code = Vec::new();

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::function_arguments => {
                    for argument_pair in inner.into_inner() {
                        let start = argument_pair.as_span().start();
                        let mut argument_parts = argument_pair.into_inner();
                        let name_pair =
                            Self::expect_next(ctx, &mut argument_parts, start, "an argument name")?;
                        let type_pair =
                            Self::expect_next(ctx, &mut argument_parts, start, "an argument type")?;
                        arguments.push(FunctionArgument {
                            arg_name: name_pair.as_str().to_string(),
                            arg_type: Self::parse_type_signature_pair(&inner_ctx, type_pair)?,
                        });
                    }
                }
                Rule::return_type => {
                    let start = inner.as_span().start();
                    let type_pair =
                        Self::expect_next(ctx, &mut inner.into_inner(), start, "a return type")?;
                    return_type = Some(Self::parse_type_signature_pair(&inner_ctx, type_pair)?);
                }
                Rule::block => code = Self::parse_block(&inner_ctx, inner)?,
                _ => {}
            }
        }

        Ok(FunctionDefinition {
            function_name,
            template_generics: template_generics.clone(),
            arguments,
            return_type,
            code,
            debug_info,
        })
    }

    fn definition_name(ctx: &ReaderContext, pair: &Pair) -> ParseResult<String> {
        Self::find_inner(pair, Rule::type_name)
            .map(|name| name.as_str().to_string())
            .ok_or_else(|| Self::unexpected(ctx, pair, "a type name"))
    }

    fn definition_generics(pair: &Pair) -> Vec<String> {
        Self::find_inner(pair, Rule::generic_parameters)
            .map(Self::parse_generic_parameters)
            .unwrap_or_default()
    }
}
