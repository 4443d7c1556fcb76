// Basalt Parser Library
// AST value model and pest-based reader for the Basalt programming language

pub mod ast;
pub mod error;
pub mod parser;

pub use ast::*;
pub use error::*;
pub use parser::BasaltParser;

// Re-export parser rule for manual testing
pub use parser::Rule;

// Main parsing functions
pub fn parse_file(filename: &str, input: &str) -> Result<FileRepresentation, ParseError> {
    parser::BasaltParser::parse_file(filename, input)
}

pub fn parse_type_signature(input: &str) -> Result<TypeSignature, ParseError> {
    parser::BasaltParser::parse_type_signature(input)
}

pub fn parse_type_signature_with_generics(
    input: &str,
    generics: &[String],
) -> Result<TypeSignature, ParseError> {
    parser::BasaltParser::parse_type_signature_with_generics(input, generics)
}

pub fn parse_expression(input: &str) -> Result<Expression, ParseError> {
    parser::BasaltParser::parse_expression(input)
}

// Version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
