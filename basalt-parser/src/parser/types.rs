// Type signature parsing module
// Handles primitives, custom types, wrappers (pointer, slice, array) and inline unions

use crate::ast::*;
use crate::error::*;
use crate::parser::{BasaltParser, Pair, ReaderContext, Rule};

impl BasaltParser {
    /// Parse any type-signature pair
    pub(crate) fn parse_type_signature_pair(
        ctx: &ReaderContext,
        pair: Pair,
    ) -> ParseResult<TypeSignature> {
        let debug_info = Self::debug_info(ctx, &pair);
        let start = pair.as_span().start();

        match pair.as_rule() {
            Rule::type_signature => {
                let mut alternatives = pair
                    .into_inner()
                    .map(|inner| Self::parse_type_signature_pair(ctx, inner))
                    .collect::<ParseResult<Vec<_>>>()?;
                if alternatives.len() == 1 {
                    return Self::expect_single(ctx, &mut alternatives, start);
                }
                Ok(TypeSignature::InlineUnion(InlineUnion {
                    alternatives,
                    debug_info,
                }))
            }
            Rule::parenthesized_type => {
                let inner = Self::expect_next(ctx, &mut pair.into_inner(), start, "a type")?;
                Self::parse_type_signature_pair(ctx, inner)
            }
            Rule::pointer_type => {
                let inner = Self::expect_next(ctx, &mut pair.into_inner(), start, "a type")?;
                Ok(TypeSignature::Pointer(PointerType {
                    pointed_type: Box::new(Self::parse_type_signature_pair(ctx, inner)?),
                    debug_info,
                }))
            }
            Rule::slice_type => {
                let inner = Self::expect_next(ctx, &mut pair.into_inner(), start, "a type")?;
                Ok(TypeSignature::Slice(SliceType {
                    stored_type: Box::new(Self::parse_type_signature_pair(ctx, inner)?),
                    debug_info,
                }))
            }
            Rule::array_type => {
                let mut inner_pairs = pair.into_inner();
                let length_pair = Self::expect_next(ctx, &mut inner_pairs, start, "an array length")?;
                let array_length = Self::parse_usize(ctx, &length_pair)?;
                let stored_pair = Self::expect_next(ctx, &mut inner_pairs, start, "a type")?;
                Ok(TypeSignature::Array(ArrayType {
                    array_length,
                    stored_type: Box::new(Self::parse_type_signature_pair(ctx, stored_pair)?),
                    debug_info,
                }))
            }
            Rule::primitive_type => match PrimitiveKind::from_name(pair.as_str()) {
                Some(kind) => Ok(TypeSignature::Primitive(PrimitiveType { kind, debug_info })),
                None => Err(Self::unexpected(ctx, &pair, "a primitive type")),
            },
            Rule::custom_type => Self::parse_custom_type(ctx, pair),
            _ => Err(Self::unexpected(ctx, &pair, "a type")),
        }
    }

    /// Parse `pkg::Name<Params>`; a bare generic name becomes a template type
    fn parse_custom_type(ctx: &ReaderContext, pair: Pair) -> ParseResult<TypeSignature> {
        let debug_info = Self::debug_info(ctx, &pair);
        let mut package_prefix = None;
        let mut type_name = None;
        let mut type_parameters = Vec::new();

        for inner in pair.clone().into_inner() {
            match inner.as_rule() {
                Rule::package_name => package_prefix = Some(inner.as_str().to_string()),
                Rule::type_name => type_name = Some(inner.as_str().to_string()),
                Rule::type_parameters => {
                    for parameter in inner.into_inner() {
                        type_parameters.push(Self::parse_type_signature_pair(ctx, parameter)?);
                    }
                }
                _ => {}
            }
        }

        let type_name = type_name.ok_or_else(|| Self::unexpected(ctx, &pair, "a type name"))?;

        if package_prefix.is_none() && type_parameters.is_empty() && ctx.is_generic_name(&type_name) {
            return Ok(TypeSignature::Template(TemplateType {
                type_name,
                debug_info,
            }));
        }

        Ok(TypeSignature::Custom(CustomType {
            package_prefix,
            type_name,
            type_parameters,
            debug_info,
        }))
    }

    fn expect_single(
        ctx: &ReaderContext,
        alternatives: &mut Vec<TypeSignature>,
        position: usize,
    ) -> ParseResult<TypeSignature> {
        alternatives.pop().ok_or_else(|| {
            ParseError::unexpected_token(
                ctx.src.to_string(),
                miette::SourceSpan::new(position.into(), 0),
                "a type".to_string(),
            )
        })
    }

    /// Parse `<T, U>` into the list of generic parameter names
    pub(crate) fn parse_generic_parameters(pair: Pair) -> Vec<String> {
        pair.into_inner()
            .filter(|inner| inner.as_rule() == Rule::type_name)
            .map(|inner| inner.as_str().to_string())
            .collect()
    }
}
