//! Error types for the Basalt typechecker
//!
//! Following the parser's miette patterns for consistent error reporting. Every
//! user-facing error carries the `DebugInfo` of the node it was raised for, and
//! a label span derived from it so embedders that attach the source text get
//! highlighted output.

use basalt_parser::{DebugInfo, ParseError};
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Top-level error type returned by every fallible operation of the crate
#[derive(Error, Diagnostic, Debug)]
#[allow(clippy::result_large_err)]
#[allow(clippy::large_enum_variant)]
pub enum CompilationError {
    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(basalt::command_line))]
    CommandLine { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Tokenization(ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parsing(ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Indexing(#[from] IndexingError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Internal(#[from] InternalError),
}

impl From<ParseError> for CompilationError {
    /// Character-level failures are tokenization errors, everything else is
    /// a parsing error
    fn from(error: ParseError) -> Self {
        match error {
            ParseError::InvalidInteger { .. }
            | ParseError::InvalidFloat { .. }
            | ParseError::InvalidEscape { .. }
            | ParseError::InvalidChar { .. } => CompilationError::Tokenization(error),
            _ => CompilationError::Parsing(error),
        }
    }
}

impl CompilationError {
    pub fn debug_info(&self) -> Option<&DebugInfo> {
        match self {
            CompilationError::Validation(error) => Some(error.debug_info()),
            CompilationError::Internal(error) => error.debug_info(),
            _ => None,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, CompilationError::Validation(_))
    }

    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            CompilationError::Validation(error) => Some(error),
            _ => None,
        }
    }
}

/// Lookups of program structure that failed
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum IndexingError {
    #[error("No file named `{filename}` is part of the program")]
    #[diagnostic(code(basalt::typecheck::indexing::missing_file))]
    MissingFile { filename: String },

    #[error("No package named `{package}` is part of the program")]
    #[diagnostic(
        code(basalt::typecheck::indexing::missing_package),
        help("Check the `import` declarations of the file")
    )]
    MissingPackage { package: String },

    #[error("No overload set with id `{overload_set_id}`")]
    #[diagnostic(code(basalt::typecheck::indexing::missing_overload_set))]
    MissingOverloadSet { overload_set_id: String },

    #[error("No function with id {function_id}")]
    #[diagnostic(code(basalt::typecheck::indexing::missing_function))]
    MissingFunction { function_id: usize },
}

/// Violations of internal invariants; these are compiler bugs, not user errors
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum InternalError {
    #[error("Internal error: {message}")]
    #[diagnostic(
        code(basalt::typecheck::internal::invariant_violation),
        help("This is a bug in the Basalt compiler")
    )]
    InvariantViolation {
        message: String,
        debug_info: Option<DebugInfo>,
    },
}

impl InternalError {
    pub fn new(message: impl Into<String>) -> Self {
        InternalError::InvariantViolation {
            message: message.into(),
            debug_info: None,
        }
    }

    pub fn at(message: impl Into<String>, debug_info: &DebugInfo) -> Self {
        InternalError::InvariantViolation {
            message: message.into(),
            debug_info: Some(debug_info.clone()),
        }
    }

    pub fn debug_info(&self) -> Option<&DebugInfo> {
        match self {
            InternalError::InvariantViolation { debug_info, .. } => debug_info.as_ref(),
        }
    }
}

/// Check an internal invariant
///
/// Debug builds panic with the message. Release builds return an
/// `InternalError` from the enclosing function instead.
#[macro_export]
macro_rules! assert_internal {
    ($condition:expr, $($message:tt)+) => {
        if !($condition) {
            let message = format!($($message)+);
            if cfg!(debug_assertions) {
                panic!("internal error: {}", message);
            }
            return Err($crate::error::InternalError::new(message).into());
        }
    };
}

/// Errors in the user's program
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{debug_info}: type `{type_name}` is already defined in package `{package}`")]
    #[diagnostic(
        code(basalt::typecheck::registry::duplicate_type_definition),
        help("A package may define a type name only once per number of generic parameters; the first definition is at {previous}")
    )]
    DuplicateTypeDefinition {
        type_name: String,
        package: String,
        previous: DebugInfo,
        debug_info: DebugInfo,
        #[label("duplicate definition")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: `{type_name}` is a builtin type and cannot be redefined")]
    #[diagnostic(code(basalt::typecheck::registry::reserved_type_name))]
    ReservedTypeName {
        type_name: String,
        debug_info: DebugInfo,
        #[label("reserved name")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: unresolved type `{type_name}`")]
    #[diagnostic(
        code(basalt::typecheck::registry::unresolved_type),
        help("Define the type, or import the package that defines it")
    )]
    UnresolvedType {
        type_name: String,
        debug_info: DebugInfo,
        #[label("unknown type")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: `{type_name}` conflicts with another definition visible from package `{package}` at {other}")]
    #[diagnostic(
        code(basalt::typecheck::packages::conflicting_type_definitions),
        help("Rename one of the definitions")
    )]
    ConflictingTypeDefinitions {
        type_name: String,
        package: String,
        other: DebugInfo,
        debug_info: DebugInfo,
        #[label("conflicting definition")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: type `{entry_point}` depends on itself through {chain}")]
    #[diagnostic(
        code(basalt::typecheck::dependencies::cyclic_type_dependency),
        help("Break the cycle with a pointer (`#T`) or a slice (`$T`)")
    )]
    CyclicTypeDependency {
        entry_point: String,
        chain: String,
        debug_info: DebugInfo,
        #[label("cycle starts here")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: instantiating `{type_name}` nests generic type arguments deeper than {limit}")]
    #[diagnostic(
        code(basalt::typecheck::types::instantiation_depth_exceeded),
        help("A generic type probably refers to itself with ever growing type arguments")
    )]
    TypeInstantiationDepthExceeded {
        type_name: String,
        limit: usize,
        debug_info: DebugInfo,
        #[label("instantiated here")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: identifier `{identifier}` is already declared")]
    #[diagnostic(code(basalt::typecheck::scope::identifier_already_declared))]
    IdentifierAlreadyDeclared {
        identifier: String,
        debug_info: DebugInfo,
        #[label("redeclared here")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: use of undeclared identifier `{identifier}`")]
    #[diagnostic(code(basalt::typecheck::scope::undeclared_identifier))]
    UndeclaredIdentifier {
        identifier: String,
        debug_info: DebugInfo,
        #[label("not found in this scope")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: no overload of `{function_name}` accepts ({argument_types})")]
    #[diagnostic(code(basalt::typecheck::functions::no_matching_overload))]
    NoMatchingOverload {
        function_name: String,
        argument_types: String,
        debug_info: DebugInfo,
        #[label("no matching function")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: call to `{function_name}` is ambiguous between {}", .candidates.join(", "))]
    #[diagnostic(
        code(basalt::typecheck::functions::ambiguous_overload),
        help("Add explicit generics or make the argument types more specific")
    )]
    AmbiguousOverload {
        function_name: String,
        candidates: Vec<String>,
        debug_info: DebugInfo,
        #[label("ambiguous call")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: `{function_name}` cannot adopt its union arguments: {reason}")]
    #[diagnostic(code(basalt::typecheck::functions::failed_adoption))]
    FailedAdoption {
        function_name: String,
        reason: String,
        debug_info: DebugInfo,
        #[label("no common feature")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: instantiating `{function_name}` nests generic instantiations deeper than {limit}")]
    #[diagnostic(
        code(basalt::typecheck::functions::instantiation_depth_exceeded),
        help("A generic function probably calls itself with ever growing type arguments")
    )]
    InstantiationDepthExceeded {
        function_name: String,
        limit: usize,
        debug_info: DebugInfo,
        #[label("instantiated here")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: `{function_name}` returns nothing and cannot be used as a value")]
    #[diagnostic(code(basalt::typecheck::functions::void_value))]
    VoidValue {
        function_name: String,
        debug_info: DebugInfo,
        #[label("no value")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: expected `{expected}`, found `{found}` in {context}")]
    #[diagnostic(code(basalt::typecheck::assignment::type_mismatch))]
    TypeMismatch {
        expected: String,
        found: String,
        context: String,
        debug_info: DebugInfo,
        #[label("expected {expected}")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: operator `{operator}` cannot be applied to {operands}")]
    #[diagnostic(code(basalt::typecheck::expressions::invalid_operands))]
    InvalidOperands {
        operator: String,
        operands: String,
        debug_info: DebugInfo,
        #[label("invalid operands")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: type `{type_name}` has no member `{member_name}`")]
    #[diagnostic(code(basalt::typecheck::expressions::no_such_member))]
    NoSuchMember {
        type_name: String,
        member_name: String,
        debug_info: DebugInfo,
        #[label("unknown member")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: values of type `{found}` cannot be indexed with `[]`")]
    #[diagnostic(
        code(basalt::typecheck::expressions::invalid_square_brackets_access),
        help("Only arrays, slices and strings can be indexed, with an `Int` index")
    )]
    InvalidSquareBracketsAccess {
        found: String,
        debug_info: DebugInfo,
        #[label("not indexable")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: array literal declares {expected} elements but has {found}")]
    #[diagnostic(code(basalt::typecheck::expressions::array_length_mismatch))]
    ArrayLengthMismatch {
        expected: usize,
        found: usize,
        debug_info: DebugInfo,
        #[label("wrong number of elements")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: `{operator}` needs a union operand, found `{found}`")]
    #[diagnostic(code(basalt::typecheck::expressions::type_operator_on_non_union))]
    TypeOperatorOnNonUnion {
        operator: String,
        found: String,
        debug_info: DebugInfo,
        #[label("not a union")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: `{queried}` is not one of the alternatives of `{union_type}`")]
    #[diagnostic(code(basalt::typecheck::expressions::incompatible_type_query))]
    IncompatibleTypeQuery {
        union_type: String,
        queried: String,
        debug_info: DebugInfo,
        #[label("incompatible type")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: function `{function_name}` must return a `{expected}` value")]
    #[diagnostic(code(basalt::typecheck::returns::missing_return_value))]
    MissingReturnValue {
        function_name: String,
        expected: String,
        debug_info: DebugInfo,
        #[label("empty return")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: function `{function_name}` has no return type but returns a value")]
    #[diagnostic(code(basalt::typecheck::returns::unexpected_return_value))]
    UnexpectedReturnValue {
        function_name: String,
        debug_info: DebugInfo,
        #[label("unexpected value")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: not all paths of `{function_name}` return a value")]
    #[diagnostic(
        code(basalt::typecheck::exit_paths::missing_return),
        help("Add a `return` at the end of the function")
    )]
    MissingReturn {
        function_name: String,
        debug_info: DebugInfo,
        #[label("function defined here")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: unreachable code")]
    #[diagnostic(code(basalt::typecheck::exit_paths::unreachable_code))]
    UnreachableCode {
        debug_info: DebugInfo,
        #[label("this statement can never run")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: `{keyword}` outside of a loop")]
    #[diagnostic(code(basalt::typecheck::exit_paths::jump_outside_loop))]
    JumpOutsideLoop {
        keyword: String,
        debug_info: DebugInfo,
        #[label("not inside a loop")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: cannot take the address of a temporary value")]
    #[diagnostic(
        code(basalt::typecheck::address::address_of_temporary),
        help("Store the value in a variable first")
    )]
    AddressOfTemporary {
        debug_info: DebugInfo,
        #[label("temporary value")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: {context} would bond an immutable value to a mutable one")]
    #[diagnostic(
        code(basalt::typecheck::mutability::immutable_bond),
        help("Values reachable through a const cannot be shared by pointer or slice with a var")
    )]
    ImmutableBond {
        context: String,
        debug_info: DebugInfo,
        #[label("discards immutability")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: assignment discards qualifiers")]
    #[diagnostic(
        code(basalt::typecheck::mutability::discarded_qualifiers),
        help("The target must be a mutable, observable location")
    )]
    DiscardedQualifiers {
        debug_info: DebugInfo,
        #[label("invalid assignment")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: invalid `main` function: {reason}")]
    #[diagnostic(
        code(basalt::typecheck::main::invalid_main_function),
        help("`main` takes no arguments, has no generics and returns `Int` or nothing")
    )]
    InvalidMainFunction {
        reason: String,
        debug_info: DebugInfo,
        #[label("invalid main")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: `main` is already defined at {previous}")]
    #[diagnostic(code(basalt::typecheck::main::multiple_main_functions))]
    MultipleMainFunctions {
        previous: DebugInfo,
        debug_info: DebugInfo,
        #[label("second main")]
        span: Option<SourceSpan>,
    },

    #[error("{debug_info}: the program has no `main` function in package `{package}`")]
    #[diagnostic(code(basalt::typecheck::main::missing_main_function))]
    MissingMainFunction {
        package: String,
        debug_info: DebugInfo,
    },
}

impl ValidationError {
    pub fn debug_info(&self) -> &DebugInfo {
        match self {
            ValidationError::DuplicateTypeDefinition { debug_info, .. }
            | ValidationError::ReservedTypeName { debug_info, .. }
            | ValidationError::UnresolvedType { debug_info, .. }
            | ValidationError::ConflictingTypeDefinitions { debug_info, .. }
            | ValidationError::CyclicTypeDependency { debug_info, .. }
            | ValidationError::TypeInstantiationDepthExceeded { debug_info, .. }
            | ValidationError::IdentifierAlreadyDeclared { debug_info, .. }
            | ValidationError::UndeclaredIdentifier { debug_info, .. }
            | ValidationError::NoMatchingOverload { debug_info, .. }
            | ValidationError::AmbiguousOverload { debug_info, .. }
            | ValidationError::FailedAdoption { debug_info, .. }
            | ValidationError::InstantiationDepthExceeded { debug_info, .. }
            | ValidationError::VoidValue { debug_info, .. }
            | ValidationError::TypeMismatch { debug_info, .. }
            | ValidationError::InvalidOperands { debug_info, .. }
            | ValidationError::NoSuchMember { debug_info, .. }
            | ValidationError::InvalidSquareBracketsAccess { debug_info, .. }
            | ValidationError::ArrayLengthMismatch { debug_info, .. }
            | ValidationError::TypeOperatorOnNonUnion { debug_info, .. }
            | ValidationError::IncompatibleTypeQuery { debug_info, .. }
            | ValidationError::MissingReturnValue { debug_info, .. }
            | ValidationError::UnexpectedReturnValue { debug_info, .. }
            | ValidationError::MissingReturn { debug_info, .. }
            | ValidationError::UnreachableCode { debug_info, .. }
            | ValidationError::JumpOutsideLoop { debug_info, .. }
            | ValidationError::AddressOfTemporary { debug_info, .. }
            | ValidationError::ImmutableBond { debug_info, .. }
            | ValidationError::DiscardedQualifiers { debug_info, .. }
            | ValidationError::InvalidMainFunction { debug_info, .. }
            | ValidationError::MultipleMainFunctions { debug_info, .. }
            | ValidationError::MissingMainFunction { debug_info, .. } => debug_info,
        }
    }

    pub fn unresolved_type(type_name: impl Into<String>, debug_info: &DebugInfo) -> Self {
        ValidationError::UnresolvedType {
            type_name: type_name.into(),
            debug_info: debug_info.clone(),
            span: to_source_span(debug_info),
        }
    }

    pub fn type_mismatch(
        expected: impl ToString,
        found: impl ToString,
        context: impl Into<String>,
        debug_info: &DebugInfo,
    ) -> Self {
        ValidationError::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
            context: context.into(),
            debug_info: debug_info.clone(),
            span: to_source_span(debug_info),
        }
    }

    pub fn invalid_operands(
        operator: impl Into<String>,
        operands: impl Into<String>,
        debug_info: &DebugInfo,
    ) -> Self {
        ValidationError::InvalidOperands {
            operator: operator.into(),
            operands: operands.into(),
            debug_info: debug_info.clone(),
            span: to_source_span(debug_info),
        }
    }

    pub fn identifier_already_declared(identifier: impl Into<String>, debug_info: &DebugInfo) -> Self {
        ValidationError::IdentifierAlreadyDeclared {
            identifier: identifier.into(),
            debug_info: debug_info.clone(),
            span: to_source_span(debug_info),
        }
    }

    pub fn undeclared_identifier(identifier: impl Into<String>, debug_info: &DebugInfo) -> Self {
        ValidationError::UndeclaredIdentifier {
            identifier: identifier.into(),
            debug_info: debug_info.clone(),
            span: to_source_span(debug_info),
        }
    }

    pub fn immutable_bond(context: impl Into<String>, debug_info: &DebugInfo) -> Self {
        ValidationError::ImmutableBond {
            context: context.into(),
            debug_info: debug_info.clone(),
            span: to_source_span(debug_info),
        }
    }

    pub fn invalid_main_function(reason: impl Into<String>, debug_info: &DebugInfo) -> Self {
        ValidationError::InvalidMainFunction {
            reason: reason.into(),
            debug_info: debug_info.clone(),
            span: to_source_span(debug_info),
        }
    }
}

/// Result type for typechecker operations
pub type CheckResult<T> = Result<T, CompilationError>;

/// Helper for creating source spans from debug info
pub fn to_source_span(debug_info: &DebugInfo) -> Option<SourceSpan> {
    if debug_info.line_number == 0 {
        return None;
    }
    Some(SourceSpan::new(debug_info.char_pos.into(), 1))
}
