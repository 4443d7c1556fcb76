// Basalt AST Definitions
// Immutable value trees for types, expressions, statements and definitions

use std::fmt;

/// Source location attached to every AST node
///
/// `tok_number` is the 1-based column of the node's first character and
/// `char_pos` is its byte offset inside the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DebugInfo {
    pub filename: String,
    pub line_number: usize,
    pub tok_number: usize,
    pub char_pos: usize,
}

impl DebugInfo {
    pub fn new(
        filename: impl Into<String>,
        line_number: usize,
        tok_number: usize,
        char_pos: usize,
    ) -> Self {
        Self {
            filename: filename.into(),
            line_number,
            tok_number,
            char_pos,
        }
    }

    /// Location pointing at the start of a file, used for synthesized nodes
    pub fn in_file(filename: impl Into<String>) -> Self {
        Self::new(filename, 0, 0, 0)
    }
}

impl fmt::Display for DebugInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.filename, self.line_number, self.tok_number
        )
    }
}

/// The closed set of builtin types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrimitiveKind {
    Int,
    Float,
    Bool,
    Char,
    String,
    RawString,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 6] = [
        PrimitiveKind::Int,
        PrimitiveKind::Float,
        PrimitiveKind::Bool,
        PrimitiveKind::Char,
        PrimitiveKind::String,
        PrimitiveKind::RawString,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Int => "Int",
            PrimitiveKind::Float => "Float",
            PrimitiveKind::Bool => "Bool",
            PrimitiveKind::Char => "Char",
            PrimitiveKind::String => "String",
            PrimitiveKind::RawString => "RawString",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, PrimitiveKind::Int | PrimitiveKind::Float)
    }

    pub fn is_string_like(self) -> bool {
        matches!(self, PrimitiveKind::String | PrimitiveKind::RawString)
    }
}

/// A (possibly package-prefixed) named type with its type parameters
#[derive(Debug, Clone)]
pub struct CustomType {
    pub package_prefix: Option<String>,
    pub type_name: String,
    pub type_parameters: Vec<TypeSignature>,
    pub debug_info: DebugInfo,
}

impl CustomType {
    /// Wildcard pattern used to find a generic definition, e.g. `Pair<?,?>`
    pub fn match_pattern(&self) -> String {
        wildcard_pattern(&self.type_name, self.type_parameters.len())
    }
}

#[derive(Debug, Clone)]
pub struct InlineUnion {
    pub alternatives: Vec<TypeSignature>,
    pub debug_info: DebugInfo,
}

/// A bare generic parameter name, valid only inside a generic definition
#[derive(Debug, Clone)]
pub struct TemplateType {
    pub type_name: String,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone)]
pub struct PrimitiveType {
    pub kind: PrimitiveKind,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone)]
pub struct PointerType {
    pub pointed_type: Box<TypeSignature>,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone)]
pub struct ArrayType {
    pub array_length: usize,
    pub stored_type: Box<TypeSignature>,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone)]
pub struct SliceType {
    pub stored_type: Box<TypeSignature>,
    pub debug_info: DebugInfo,
}

/// Type signatures as written in source
///
/// Equality ignores debug information and treats the alternatives of an
/// inline union as an unordered set.
#[derive(Debug, Clone)]
pub enum TypeSignature {
    Custom(CustomType),
    InlineUnion(InlineUnion),
    Template(TemplateType),
    Primitive(PrimitiveType),
    Pointer(PointerType),
    Array(ArrayType),
    Slice(SliceType),
}

impl TypeSignature {
    pub fn primitive(kind: PrimitiveKind) -> Self {
        TypeSignature::Primitive(PrimitiveType {
            kind,
            debug_info: DebugInfo::default(),
        })
    }

    pub fn int() -> Self {
        Self::primitive(PrimitiveKind::Int)
    }

    pub fn float() -> Self {
        Self::primitive(PrimitiveKind::Float)
    }

    pub fn bool() -> Self {
        Self::primitive(PrimitiveKind::Bool)
    }

    pub fn char() -> Self {
        Self::primitive(PrimitiveKind::Char)
    }

    pub fn string() -> Self {
        Self::primitive(PrimitiveKind::String)
    }

    pub fn raw_string() -> Self {
        Self::primitive(PrimitiveKind::RawString)
    }

    pub fn custom(type_name: impl Into<String>, type_parameters: Vec<TypeSignature>) -> Self {
        TypeSignature::Custom(CustomType {
            package_prefix: None,
            type_name: type_name.into(),
            type_parameters,
            debug_info: DebugInfo::default(),
        })
    }

    pub fn prefixed_custom(
        package_prefix: impl Into<String>,
        type_name: impl Into<String>,
        type_parameters: Vec<TypeSignature>,
    ) -> Self {
        TypeSignature::Custom(CustomType {
            package_prefix: Some(package_prefix.into()),
            type_name: type_name.into(),
            type_parameters,
            debug_info: DebugInfo::default(),
        })
    }

    pub fn template(type_name: impl Into<String>) -> Self {
        TypeSignature::Template(TemplateType {
            type_name: type_name.into(),
            debug_info: DebugInfo::default(),
        })
    }

    pub fn pointer(pointed_type: TypeSignature) -> Self {
        let debug_info = pointed_type.debug_info().clone();
        TypeSignature::Pointer(PointerType {
            pointed_type: Box::new(pointed_type),
            debug_info,
        })
    }

    pub fn array(array_length: usize, stored_type: TypeSignature) -> Self {
        let debug_info = stored_type.debug_info().clone();
        TypeSignature::Array(ArrayType {
            array_length,
            stored_type: Box::new(stored_type),
            debug_info,
        })
    }

    pub fn slice(stored_type: TypeSignature) -> Self {
        let debug_info = stored_type.debug_info().clone();
        TypeSignature::Slice(SliceType {
            stored_type: Box::new(stored_type),
            debug_info,
        })
    }

    pub fn inline_union(alternatives: Vec<TypeSignature>) -> Self {
        let debug_info = alternatives
            .first()
            .map(|alternative| alternative.debug_info().clone())
            .unwrap_or_default();
        TypeSignature::InlineUnion(InlineUnion {
            alternatives,
            debug_info,
        })
    }

    pub fn debug_info(&self) -> &DebugInfo {
        match self {
            TypeSignature::Custom(t) => &t.debug_info,
            TypeSignature::InlineUnion(t) => &t.debug_info,
            TypeSignature::Template(t) => &t.debug_info,
            TypeSignature::Primitive(t) => &t.debug_info,
            TypeSignature::Pointer(t) => &t.debug_info,
            TypeSignature::Array(t) => &t.debug_info,
            TypeSignature::Slice(t) => &t.debug_info,
        }
    }

    /// Replace the location of this node and of every nested node
    pub fn with_debug_info(mut self, debug_info: &DebugInfo) -> Self {
        self.relocate(debug_info);
        self
    }

    fn relocate(&mut self, debug_info: &DebugInfo) {
        match self {
            TypeSignature::Custom(t) => {
                t.debug_info = debug_info.clone();
                for parameter in &mut t.type_parameters {
                    parameter.relocate(debug_info);
                }
            }
            TypeSignature::InlineUnion(t) => {
                t.debug_info = debug_info.clone();
                for alternative in &mut t.alternatives {
                    alternative.relocate(debug_info);
                }
            }
            TypeSignature::Template(t) => t.debug_info = debug_info.clone(),
            TypeSignature::Primitive(t) => t.debug_info = debug_info.clone(),
            TypeSignature::Pointer(t) => {
                t.debug_info = debug_info.clone();
                t.pointed_type.relocate(debug_info);
            }
            TypeSignature::Array(t) => {
                t.debug_info = debug_info.clone();
                t.stored_type.relocate(debug_info);
            }
            TypeSignature::Slice(t) => {
                t.debug_info = debug_info.clone();
                t.stored_type.relocate(debug_info);
            }
        }
    }

    pub fn is_primitive(&self, kind: PrimitiveKind) -> bool {
        matches!(self, TypeSignature::Primitive(p) if p.kind == kind)
    }

    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self {
            TypeSignature::Primitive(p) => Some(p.kind),
            _ => None,
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, TypeSignature::Pointer(_))
    }

    pub fn is_slice(&self) -> bool {
        matches!(self, TypeSignature::Slice(_))
    }

    pub fn is_template(&self) -> bool {
        matches!(self, TypeSignature::Template(_))
    }

    /// True while any template leaf remains anywhere inside the signature
    pub fn is_generic(&self) -> bool {
        match self {
            TypeSignature::Template(_) => true,
            TypeSignature::Primitive(_) => false,
            TypeSignature::Custom(t) => t.type_parameters.iter().any(TypeSignature::is_generic),
            TypeSignature::InlineUnion(t) => t.alternatives.iter().any(TypeSignature::is_generic),
            TypeSignature::Pointer(t) => t.pointed_type.is_generic(),
            TypeSignature::Array(t) => t.stored_type.is_generic(),
            TypeSignature::Slice(t) => t.stored_type.is_generic(),
        }
    }

    /// Number of template leaves, counting repeated occurrences
    pub fn count_template_leaves(&self) -> usize {
        match self {
            TypeSignature::Template(_) => 1,
            TypeSignature::Primitive(_) => 0,
            TypeSignature::Custom(t) => t
                .type_parameters
                .iter()
                .map(TypeSignature::count_template_leaves)
                .sum(),
            TypeSignature::InlineUnion(t) => t
                .alternatives
                .iter()
                .map(TypeSignature::count_template_leaves)
                .sum(),
            TypeSignature::Pointer(t) => t.pointed_type.count_template_leaves(),
            TypeSignature::Array(t) => t.stored_type.count_template_leaves(),
            TypeSignature::Slice(t) => t.stored_type.count_template_leaves(),
        }
    }
}

impl PartialEq for TypeSignature {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypeSignature::Custom(a), TypeSignature::Custom(b)) => {
                a.package_prefix == b.package_prefix
                    && a.type_name == b.type_name
                    && a.type_parameters == b.type_parameters
            }
            (TypeSignature::InlineUnion(a), TypeSignature::InlineUnion(b)) => {
                same_alternatives(&a.alternatives, &b.alternatives)
            }
            (TypeSignature::Template(a), TypeSignature::Template(b)) => a.type_name == b.type_name,
            (TypeSignature::Primitive(a), TypeSignature::Primitive(b)) => a.kind == b.kind,
            (TypeSignature::Pointer(a), TypeSignature::Pointer(b)) => {
                a.pointed_type == b.pointed_type
            }
            (TypeSignature::Array(a), TypeSignature::Array(b)) => {
                a.array_length == b.array_length && a.stored_type == b.stored_type
            }
            (TypeSignature::Slice(a), TypeSignature::Slice(b)) => a.stored_type == b.stored_type,
            _ => false,
        }
    }
}

impl Eq for TypeSignature {}

fn same_alternatives(left: &[TypeSignature], right: &[TypeSignature]) -> bool {
    left.iter().all(|alternative| right.contains(alternative))
        && right.iter().all(|alternative| left.contains(alternative))
}

fn wildcard_pattern(name: &str, arity: usize) -> String {
    if arity == 0 {
        return name.to_string();
    }
    format!("{}<{}>", name, vec!["?"; arity].join(","))
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSignature::Custom(t) => {
                if let Some(prefix) = &t.package_prefix {
                    write!(f, "{prefix}::")?;
                }
                write!(f, "{}", t.type_name)?;
                if !t.type_parameters.is_empty() {
                    let parameters: Vec<String> =
                        t.type_parameters.iter().map(|p| p.to_string()).collect();
                    write!(f, "<{}>", parameters.join(", "))?;
                }
                Ok(())
            }
            TypeSignature::InlineUnion(t) => {
                let alternatives: Vec<String> = t
                    .alternatives
                    .iter()
                    .map(|alternative| nested_display(alternative))
                    .collect();
                write!(f, "{}", alternatives.join(" | "))
            }
            TypeSignature::Template(t) => write!(f, "{}", t.type_name),
            TypeSignature::Primitive(t) => write!(f, "{}", t.kind.name()),
            TypeSignature::Pointer(t) => write!(f, "#{}", nested_display(&t.pointed_type)),
            TypeSignature::Array(t) => {
                write!(f, "[{}]{}", t.array_length, nested_display(&t.stored_type))
            }
            TypeSignature::Slice(t) => write!(f, "${}", nested_display(&t.stored_type)),
        }
    }
}

fn nested_display(type_signature: &TypeSignature) -> String {
    match type_signature {
        TypeSignature::InlineUnion(_) => format!("({type_signature})"),
        _ => type_signature.to_string(),
    }
}

/// A named field of a struct definition
#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub field_name: String,
    pub field_type: TypeSignature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDefinition {
    pub def_name: String,
    pub template_generics: Vec<String>,
    pub fields: Vec<StructField>,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionDefinition {
    pub def_name: String,
    pub template_generics: Vec<String>,
    pub types: Vec<TypeSignature>,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    pub alias_name: String,
    pub template_generics: Vec<String>,
    pub aliased_type: TypeSignature,
    pub debug_info: DebugInfo,
}

/// Top-level type definitions
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefinition {
    Struct(StructDefinition),
    Union(UnionDefinition),
    Alias(TypeAlias),
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        match self {
            TypeDefinition::Struct(def) => &def.def_name,
            TypeDefinition::Union(def) => &def.def_name,
            TypeDefinition::Alias(def) => &def.alias_name,
        }
    }

    pub fn template_generics(&self) -> &[String] {
        match self {
            TypeDefinition::Struct(def) => &def.template_generics,
            TypeDefinition::Union(def) => &def.template_generics,
            TypeDefinition::Alias(def) => &def.template_generics,
        }
    }

    pub fn debug_info(&self) -> &DebugInfo {
        match self {
            TypeDefinition::Struct(def) => &def.debug_info,
            TypeDefinition::Union(def) => &def.debug_info,
            TypeDefinition::Alias(def) => &def.debug_info,
        }
    }

    pub fn is_generic(&self) -> bool {
        !self.template_generics().is_empty()
    }

    /// Wildcard pattern of the definition, e.g. `Pair<?,?>`
    pub fn match_pattern(&self) -> String {
        wildcard_pattern(self.name(), self.template_generics().len())
    }

    /// Context-independent identity: location plus name
    ///
    /// Two textually distinct definitions never share an id, and every
    /// instantiation of a generic definition gets its own id because the
    /// instantiated name differs.
    pub fn unique_id(&self) -> String {
        let info = self.debug_info();
        format!(
            "{}:{}:{}:{}",
            info.filename,
            info.line_number,
            info.tok_number,
            self.name()
        )
    }
}

/// Function-call operands
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub function_name: String,
    pub package_prefix: Option<String>,
    pub instantiated_generics: Vec<TypeSignature>,
    pub arguments: Vec<Expression>,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperatorKind {
    And,
    Or,
    Xor,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Sum,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOperatorKind {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperatorKind::And => "&&",
            BinaryOperatorKind::Or => "||",
            BinaryOperatorKind::Xor => "^^",
            BinaryOperatorKind::Equal => "==",
            BinaryOperatorKind::NotEqual => "!=",
            BinaryOperatorKind::Less => "<",
            BinaryOperatorKind::LessEqual => "<=",
            BinaryOperatorKind::Greater => ">",
            BinaryOperatorKind::GreaterEqual => ">=",
            BinaryOperatorKind::Sum => "+",
            BinaryOperatorKind::Sub => "-",
            BinaryOperatorKind::Mul => "*",
            BinaryOperatorKind::Div => "/",
            BinaryOperatorKind::Mod => "%",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let kind = match symbol {
            "&&" => BinaryOperatorKind::And,
            "||" => BinaryOperatorKind::Or,
            "^^" => BinaryOperatorKind::Xor,
            "==" => BinaryOperatorKind::Equal,
            "!=" => BinaryOperatorKind::NotEqual,
            "<" => BinaryOperatorKind::Less,
            "<=" => BinaryOperatorKind::LessEqual,
            ">" => BinaryOperatorKind::Greater,
            ">=" => BinaryOperatorKind::GreaterEqual,
            "+" => BinaryOperatorKind::Sum,
            "-" => BinaryOperatorKind::Sub,
            "*" => BinaryOperatorKind::Mul,
            "/" => BinaryOperatorKind::Div,
            "%" => BinaryOperatorKind::Mod,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_logical(self) -> bool {
        matches!(
            self,
            BinaryOperatorKind::And | BinaryOperatorKind::Or | BinaryOperatorKind::Xor
        )
    }

    pub fn is_equality(self) -> bool {
        matches!(self, BinaryOperatorKind::Equal | BinaryOperatorKind::NotEqual)
    }

    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            BinaryOperatorKind::Less
                | BinaryOperatorKind::LessEqual
                | BinaryOperatorKind::Greater
                | BinaryOperatorKind::GreaterEqual
        )
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOperatorKind::Sum
                | BinaryOperatorKind::Sub
                | BinaryOperatorKind::Mul
                | BinaryOperatorKind::Div
                | BinaryOperatorKind::Mod
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOperator {
    pub operator: BinaryOperatorKind,
    pub left_operand: Box<Expression>,
    pub right_operand: Box<Expression>,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperatorKind {
    /// `&x`
    AddressOf,
    /// `#p`
    Dereference,
    /// `!b`
    Not,
    Plus,
    Minus,
}

impl UnaryOperatorKind {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperatorKind::AddressOf => "&",
            UnaryOperatorKind::Dereference => "#",
            UnaryOperatorKind::Not => "!",
            UnaryOperatorKind::Plus => "+",
            UnaryOperatorKind::Minus => "-",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let kind = match symbol {
            "&" => UnaryOperatorKind::AddressOf,
            "#" => UnaryOperatorKind::Dereference,
            "!" => UnaryOperatorKind::Not,
            "+" => UnaryOperatorKind::Plus,
            "-" => UnaryOperatorKind::Minus,
            _ => return None,
        };
        Some(kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOperator {
    pub operator: UnaryOperatorKind,
    pub operand: Box<Expression>,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeOperatorKind {
    Is,
    As,
}

impl TypeOperatorKind {
    pub fn keyword(self) -> &'static str {
        match self {
            TypeOperatorKind::Is => "is",
            TypeOperatorKind::As => "as",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeOperator {
    pub operator: TypeOperatorKind,
    pub expression: Box<Expression>,
    pub typesignature: TypeSignature,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DotMemberAccess {
    pub struct_value: Box<Expression>,
    pub member_name: String,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SquareBracketsAccess {
    pub storage: Box<Expression>,
    pub index: Box<Expression>,
    pub debug_info: DebugInfo,
}

/// `[N] Type { elements... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub array_length: usize,
    pub stored_type: TypeSignature,
    pub elements: Vec<Expression>,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntLiteral {
    pub value: i64,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatLiteral {
    pub value: f64,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoolLiteral {
    pub value: bool,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CharLiteral {
    pub value: char,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: String,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    FunctionCall(FunctionCall),
    BinaryOperator(BinaryOperator),
    UnaryOperator(UnaryOperator),
    TypeOperator(TypeOperator),
    DotMemberAccess(DotMemberAccess),
    SquareBracketsAccess(SquareBracketsAccess),
    ArrayLiteral(ArrayLiteral),
    Identifier(Identifier),
    IntLiteral(IntLiteral),
    FloatLiteral(FloatLiteral),
    BoolLiteral(BoolLiteral),
    CharLiteral(CharLiteral),
    StringLiteral(StringLiteral),
}

impl Expression {
    pub fn debug_info(&self) -> &DebugInfo {
        match self {
            Expression::FunctionCall(e) => &e.debug_info,
            Expression::BinaryOperator(e) => &e.debug_info,
            Expression::UnaryOperator(e) => &e.debug_info,
            Expression::TypeOperator(e) => &e.debug_info,
            Expression::DotMemberAccess(e) => &e.debug_info,
            Expression::SquareBracketsAccess(e) => &e.debug_info,
            Expression::ArrayLiteral(e) => &e.debug_info,
            Expression::Identifier(e) => &e.debug_info,
            Expression::IntLiteral(e) => &e.debug_info,
            Expression::FloatLiteral(e) => &e.debug_info,
            Expression::BoolLiteral(e) => &e.debug_info,
            Expression::CharLiteral(e) => &e.debug_info,
            Expression::StringLiteral(e) => &e.debug_info,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Expression::IntLiteral(_)
                | Expression::FloatLiteral(_)
                | Expression::BoolLiteral(_)
                | Expression::CharLiteral(_)
                | Expression::StringLiteral(_)
        )
    }

    /// Short human readable description used in diagnostics
    pub fn describe(&self) -> String {
        match self {
            Expression::FunctionCall(e) => format!("call to `{}`", e.function_name),
            Expression::BinaryOperator(e) => format!("`{}` expression", e.operator.symbol()),
            Expression::UnaryOperator(e) => format!("`{}` expression", e.operator.symbol()),
            Expression::TypeOperator(e) => format!("`{}` expression", e.operator.keyword()),
            Expression::DotMemberAccess(e) => format!("member access `.{}`", e.member_name),
            Expression::SquareBracketsAccess(_) => "square brackets access".to_string(),
            Expression::ArrayLiteral(_) => "array literal".to_string(),
            Expression::Identifier(e) => format!("`{}`", e.name),
            Expression::IntLiteral(e) => format!("literal `{}`", e.value),
            Expression::FloatLiteral(e) => format!("literal `{}`", e.value),
            Expression::BoolLiteral(e) => format!("literal `{}`", e.value),
            Expression::CharLiteral(e) => format!("literal '{}'", e.value),
            Expression::StringLiteral(e) => format!("literal \"{}\"", e.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    pub identifier_name: String,
    pub typesignature: TypeSignature,
    pub initial_value: Option<Expression>,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstDeclaration {
    pub identifier_name: String,
    pub typesignature: TypeSignature,
    pub value: Expression,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub assignment_target: Expression,
    pub assigned_value: Expression,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub condition: Expression,
    pub then_branch: Vec<Statement>,
    pub else_branch: Vec<Statement>,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileLoop {
    pub condition: Expression,
    pub loop_body: Vec<Statement>,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UntilLoop {
    pub condition: Expression,
    pub loop_body: Vec<Statement>,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub return_value: Option<Expression>,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Break {
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Continue {
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    FunctionCall(FunctionCall),
    VariableDeclaration(VariableDeclaration),
    ConstDeclaration(ConstDeclaration),
    Assignment(Assignment),
    Conditional(Conditional),
    WhileLoop(WhileLoop),
    UntilLoop(UntilLoop),
    Return(Return),
    Break(Break),
    Continue(Continue),
}

impl Statement {
    pub fn debug_info(&self) -> &DebugInfo {
        match self {
            Statement::FunctionCall(s) => &s.debug_info,
            Statement::VariableDeclaration(s) => &s.debug_info,
            Statement::ConstDeclaration(s) => &s.debug_info,
            Statement::Assignment(s) => &s.debug_info,
            Statement::Conditional(s) => &s.debug_info,
            Statement::WhileLoop(s) => &s.debug_info,
            Statement::UntilLoop(s) => &s.debug_info,
            Statement::Return(s) => &s.debug_info,
            Statement::Break(s) => &s.debug_info,
            Statement::Continue(s) => &s.debug_info,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionArgument {
    pub arg_name: String,
    pub arg_type: TypeSignature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub function_name: String,
    pub template_generics: Vec<String>,
    pub arguments: Vec<FunctionArgument>,
    pub return_type: Option<TypeSignature>,
    pub code: Vec<Statement>,
    pub debug_info: DebugInfo,
}

impl FunctionDefinition {
    pub fn is_generic(&self) -> bool {
        !self.template_generics.is_empty()
    }

    /// `name(ArgType, ArgType) -> Ret`, used in diagnostics
    pub fn signature(&self) -> String {
        let mut signature = self.function_name.clone();
        if !self.template_generics.is_empty() {
            signature.push_str(&format!("<{}>", self.template_generics.join(", ")));
        }
        let arguments: Vec<String> = self
            .arguments
            .iter()
            .map(|argument| argument.arg_type.to_string())
            .collect();
        signature.push_str(&format!("({})", arguments.join(", ")));
        if let Some(return_type) = &self.return_type {
            signature.push_str(&format!(" -> {return_type}"));
        }
        signature
    }
}

/// Everything the reader extracted from a single source file
#[derive(Debug, Clone, PartialEq)]
pub struct FileRepresentation {
    pub filename: String,
    pub package_name: String,
    pub imports: Vec<String>,
    pub type_defs: Vec<TypeDefinition>,
    pub func_defs: Vec<FunctionDefinition>,
}
