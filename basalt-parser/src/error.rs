// Basalt Parser Error Handling
// Source-aware error reporting with miette integration

use crate::parser::Rule;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Main parse error type with miette integration
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("Parse error: {message}")]
    #[diagnostic(
        code(basalt::parse::pest_error),
        help("Check the syntax near the highlighted location")
    )]
    PestError {
        #[source_code]
        src: String,
        #[label("error occurred here")]
        span: SourceSpan,
        message: String,
    },

    #[error("Unexpected token")]
    #[diagnostic(
        code(basalt::parse::unexpected_token),
        help("Expected one of: {expected}")
    )]
    UnexpectedToken {
        #[source_code]
        src: String,
        #[label("found this")]
        span: SourceSpan,
        expected: String,
    },

    #[error("Invalid integer literal `{found}`")]
    #[diagnostic(
        code(basalt::parse::invalid_integer),
        help("Integer literals must be decimal numbers that fit in 64 bits")
    )]
    InvalidInteger {
        #[source_code]
        src: String,
        #[label("invalid integer")]
        span: SourceSpan,
        found: String,
    },

    #[error("Invalid float literal `{found}`")]
    #[diagnostic(
        code(basalt::parse::invalid_float),
        help("Float literals must be decimal numbers with a decimal point (e.g., 3.14)")
    )]
    InvalidFloat {
        #[source_code]
        src: String,
        #[label("invalid float")]
        span: SourceSpan,
        found: String,
    },

    #[error("Invalid escape sequence `{found}`")]
    #[diagnostic(
        code(basalt::parse::invalid_escape),
        help("Valid escape sequences: \\n, \\t, \\r, \\0, \\\\, \\\", \\'")
    )]
    InvalidEscape {
        #[source_code]
        src: String,
        #[label("invalid escape sequence")]
        span: SourceSpan,
        found: String,
    },

    #[error("Character literal `{found}` must contain exactly one character")]
    #[diagnostic(code(basalt::parse::invalid_char))]
    InvalidChar {
        #[source_code]
        src: String,
        #[label("invalid character literal")]
        span: SourceSpan,
        found: String,
    },
}

impl ParseError {
    /// Create a parse error from a Pest parsing error
    pub fn from_pest_error(error: pest::error::Error<Rule>, src: String) -> Self {
        let span = match error.location {
            pest::error::InputLocation::Pos(pos) => SourceSpan::new(pos.into(), 1),
            pest::error::InputLocation::Span((start, end)) => {
                SourceSpan::new(start.into(), end - start)
            }
        };

        let message = match &error.variant {
            pest::error::ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => {
                let expected: Vec<&str> = positives.iter().map(rule_description).collect();
                format!("expected {}", expected.join(", "))
            }
            pest::error::ErrorVariant::CustomError { message } => message.clone(),
            _ => error.variant.message().to_string(),
        };

        ParseError::PestError { src, span, message }
    }

    pub fn unexpected_token(src: String, span: SourceSpan, expected: String) -> Self {
        ParseError::UnexpectedToken {
            src,
            span,
            expected,
        }
    }

    pub fn invalid_integer(src: String, span: SourceSpan, found: String) -> Self {
        ParseError::InvalidInteger { src, span, found }
    }

    pub fn invalid_float(src: String, span: SourceSpan, found: String) -> Self {
        ParseError::InvalidFloat { src, span, found }
    }

    pub fn invalid_escape(src: String, span: SourceSpan, found: String) -> Self {
        ParseError::InvalidEscape { src, span, found }
    }

    pub fn invalid_char(src: String, span: SourceSpan, found: String) -> Self {
        ParseError::InvalidChar { src, span, found }
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Convert a grammar rule to a user-friendly description
fn rule_description(rule: &Rule) -> &'static str {
    match rule {
        Rule::identifier => "an identifier",
        Rule::type_name => "a type name",
        Rule::type_signature => "a type",
        Rule::integer => "an integer literal",
        Rule::float => "a float literal",
        Rule::string => "a string literal",
        Rule::character => "a character literal",
        Rule::expression => "an expression",
        Rule::statement => "a statement",
        Rule::block => "a `{ ... }` block",
        Rule::package_declaration => "`package <name>;`",
        Rule::definition => "a definition",
        Rule::EOI => "end of input",
        _ => "a token",
    }
}
