//! Type definitions register
//!
//! Every struct, union and alias is stored under a structural key made of its
//! package, its name and the number of its generic parameters. Concrete uses
//! of a generic definition are instantiated on first retrieval and memoized
//! under a key that also carries the (package qualified) type arguments, so
//! later lookups return the very same clone.

use crate::error::{to_source_span, CheckResult, ValidationError};
use crate::generics::{GenericSubstitutionRules, GenericsInstantiationEngine};
use crate::program::ProjectFileStructure;
use basalt_parser::{CustomType, PrimitiveKind, TypeDefinition, TypeSignature};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use std::collections::HashSet;
use std::fmt;

lazy_static! {
    /// Builtin type names that user definitions may not shadow
    static ref RESERVED_TYPE_NAMES: HashSet<&'static str> =
        PrimitiveKind::ALL.iter().map(|kind| kind.name()).collect();
}

pub fn is_reserved_type_name(name: &str) -> bool {
    RESERVED_TYPE_NAMES.contains(name)
}

/// Deepest nesting of type arguments a generic type may be instantiated with
pub const MAX_TYPE_NESTING_DEPTH: usize = 64;

/// Number of signature levels from the outermost one down to its deepest leaf
fn nesting_depth(type_signature: &TypeSignature) -> usize {
    let inner = match type_signature {
        TypeSignature::Custom(custom_type) => {
            custom_type.type_parameters.iter().map(nesting_depth).max().unwrap_or(0)
        }
        TypeSignature::Pointer(pointer) => nesting_depth(&pointer.pointed_type),
        TypeSignature::Slice(slice) => nesting_depth(&slice.stored_type),
        TypeSignature::Array(array) => nesting_depth(&array.stored_type),
        TypeSignature::InlineUnion(inline_union) => {
            inline_union.alternatives.iter().map(nesting_depth).max().unwrap_or(0)
        }
        TypeSignature::Primitive(_) | TypeSignature::Template(_) => 0,
    };
    inner + 1
}

/// Registry key of a type definition
///
/// A pattern key (`arguments` empty) addresses a definition as written in
/// source; an instance key addresses the memoized instantiation of a generic
/// definition for the given qualified type arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey {
    pub package: String,
    pub name: String,
    pub arity: usize,
    pub arguments: Vec<String>,
}

impl TypeKey {
    pub fn pattern(package: &str, name: &str, arity: usize) -> Self {
        Self {
            package: package.to_string(),
            name: name.to_string(),
            arity,
            arguments: Vec::new(),
        }
    }

    pub fn instance(package: &str, name: &str, arguments: Vec<String>) -> Self {
        Self {
            package: package.to_string(),
            name: name.to_string(),
            arity: arguments.len(),
            arguments,
        }
    }

    pub fn is_instance(&self) -> bool {
        self.arity > 0 && self.arguments.len() == self.arity
    }

    /// Name of an instantiated definition, e.g. `Pair<Int,Point>`
    pub fn instantiated_name(&self) -> String {
        if self.arguments.is_empty() {
            return self.name.clone();
        }
        let arguments: Vec<String> = self
            .arguments
            .iter()
            .map(|argument| strip_package_prefixes(argument))
            .collect();
        format!("{}<{}>", self.name, arguments.join(","))
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.package, self.name)?;
        if !self.arguments.is_empty() {
            write!(f, "<{}>", self.arguments.join(","))
        } else if self.arity > 0 {
            write!(f, "<{}>", self.arity)
        } else {
            Ok(())
        }
    }
}

/// Remove every `package::` qualifier from a qualified signature
pub fn strip_package_prefixes(qualified: &str) -> String {
    let mut stripped = String::with_capacity(qualified.len());
    let mut word = String::new();
    let mut chars = qualified.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_alphanumeric() || c == '_' {
            word.push(c);
            continue;
        }
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            word.clear();
            continue;
        }
        stripped.push_str(&word);
        word.clear();
        stripped.push(c);
    }
    stripped.push_str(&word);
    stripped
}

#[derive(Debug, Clone, Default)]
pub struct TypeDefinitionsRegister {
    definitions: IndexMap<TypeKey, TypeDefinition>,
    /// Keys of the definitions written in source, in storage order
    declared: Vec<TypeKey>,
}

impl TypeDefinitionsRegister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn get(&self, key: &TypeKey) -> Option<&TypeDefinition> {
        self.definitions.get(key)
    }

    pub fn declared_keys(&self) -> &[TypeKey] {
        &self.declared
    }

    pub fn definitions(&self) -> impl Iterator<Item = (&TypeKey, &TypeDefinition)> {
        self.definitions.iter()
    }

    /// Definitions without generic parameters, instantiations included
    pub fn concrete_definitions(&self) -> impl Iterator<Item = (&TypeKey, &TypeDefinition)> {
        self.definitions
            .iter()
            .filter(|(_, definition)| !definition.is_generic())
    }

    pub fn store_type_definition(&mut self, type_def: TypeDefinition, package: &str) -> CheckResult<()> {
        if is_reserved_type_name(type_def.name()) {
            return Err(ValidationError::ReservedTypeName {
                type_name: type_def.name().to_string(),
                debug_info: type_def.debug_info().clone(),
                span: to_source_span(type_def.debug_info()),
            }
            .into());
        }

        let key = TypeKey::pattern(package, type_def.name(), type_def.template_generics().len());
        if let Some(previous) = self.definitions.get(&key) {
            return Err(ValidationError::DuplicateTypeDefinition {
                type_name: type_def.match_pattern(),
                package: package.to_string(),
                previous: previous.debug_info().clone(),
                debug_info: type_def.debug_info().clone(),
                span: to_source_span(type_def.debug_info()),
            }
            .into());
        }

        tracing::trace!(target: "registry", key = %key, "stored type definition");
        self.declared.push(key.clone());
        self.definitions.insert(key, type_def);
        Ok(())
    }

    /// Definition a custom type refers to, instantiating generics on demand
    pub fn retrieve_type_definition(
        &mut self,
        custom_type: &CustomType,
        files: &ProjectFileStructure,
    ) -> CheckResult<TypeDefinition> {
        self.lookup(custom_type, files).map(|(_, definition)| definition)
    }

    /// Registry key a custom type resolves to
    pub fn fully_qualified_name(
        &mut self,
        custom_type: &CustomType,
        files: &ProjectFileStructure,
    ) -> CheckResult<TypeKey> {
        self.lookup(custom_type, files).map(|(key, _)| key)
    }

    fn lookup(
        &mut self,
        custom_type: &CustomType,
        files: &ProjectFileStructure,
    ) -> CheckResult<(TypeKey, TypeDefinition)> {
        let packages = match &custom_type.package_prefix {
            Some(prefix) => vec![prefix.clone()],
            None => files.lookup_packages(&custom_type.debug_info.filename)?,
        };

        for package in &packages {
            if let Some(found) = self.search_in_package(custom_type, package, files)? {
                return Ok(found);
            }
        }

        tracing::trace!(
            target: "registry",
            type_name = %custom_type.type_name,
            searched = ?packages,
            "type lookup missed"
        );
        Err(ValidationError::unresolved_type(
            TypeSignature::Custom(custom_type.clone()).to_string(),
            &custom_type.debug_info,
        )
        .into())
    }

    fn search_in_package(
        &mut self,
        custom_type: &CustomType,
        package: &str,
        files: &ProjectFileStructure,
    ) -> CheckResult<Option<(TypeKey, TypeDefinition)>> {
        let arity = custom_type.type_parameters.len();
        let pattern = TypeKey::pattern(package, &custom_type.type_name, arity);
        let Some(generic_definition) = self.definitions.get(&pattern).cloned() else {
            return Ok(None);
        };
        if arity == 0 {
            return Ok(Some((pattern, generic_definition)));
        }

        let depth = custom_type.type_parameters.iter().map(nesting_depth).max().unwrap_or(0);
        if depth > MAX_TYPE_NESTING_DEPTH {
            return Err(ValidationError::TypeInstantiationDepthExceeded {
                type_name: custom_type.type_name.clone(),
                limit: MAX_TYPE_NESTING_DEPTH,
                debug_info: custom_type.debug_info.clone(),
                span: to_source_span(&custom_type.debug_info),
            }
            .into());
        }

        let arguments = custom_type
            .type_parameters
            .iter()
            .map(|parameter| self.qualified_signature(parameter, files))
            .collect::<CheckResult<Vec<_>>>()?;
        let instance = TypeKey::instance(package, &custom_type.type_name, arguments);
        if let Some(instantiated) = self.definitions.get(&instance) {
            tracing::trace!(target: "registry", key = %instance, "instantiation cache hit");
            return Ok(Some((instance, instantiated.clone())));
        }

        let rules = GenericSubstitutionRules::zip_components_vectors(
            generic_definition.template_generics(),
            &custom_type.type_parameters,
        )?;
        let instantiated = GenericsInstantiationEngine::new(&rules)
            .instantiate_generic_typedefinition(&generic_definition, &instance.instantiated_name());

        // References made from inside generic code are not concrete yet
        if custom_type.type_parameters.iter().any(TypeSignature::is_generic) {
            return Ok(Some((instance, instantiated)));
        }

        tracing::trace!(target: "registry", key = %instance, "instantiated generic type definition");
        self.definitions.insert(instance.clone(), instantiated.clone());
        Ok(Some((instance, instantiated)))
    }

    /// Canonical, package qualified spelling of a signature
    ///
    /// Union alternatives are sorted so that equal unions spell the same.
    pub fn qualified_signature(
        &mut self,
        type_signature: &TypeSignature,
        files: &ProjectFileStructure,
    ) -> CheckResult<String> {
        let qualified = match type_signature {
            TypeSignature::Custom(custom_type) => self.fully_qualified_name(custom_type, files)?.to_string(),
            TypeSignature::Template(template) => template.type_name.clone(),
            TypeSignature::Primitive(primitive) => primitive.kind.name().to_string(),
            TypeSignature::Pointer(pointer) => {
                format!("#{}", self.nested_qualified_signature(&pointer.pointed_type, files)?)
            }
            TypeSignature::Slice(slice) => {
                format!("${}", self.nested_qualified_signature(&slice.stored_type, files)?)
            }
            TypeSignature::Array(array) => format!(
                "[{}]{}",
                array.array_length,
                self.nested_qualified_signature(&array.stored_type, files)?
            ),
            TypeSignature::InlineUnion(inline_union) => {
                let mut alternatives = inline_union
                    .alternatives
                    .iter()
                    .map(|alternative| self.nested_qualified_signature(alternative, files))
                    .collect::<CheckResult<Vec<_>>>()?;
                alternatives.sort();
                alternatives.dedup();
                alternatives.join(" | ")
            }
        };
        Ok(qualified)
    }

    fn nested_qualified_signature(
        &mut self,
        type_signature: &TypeSignature,
        files: &ProjectFileStructure,
    ) -> CheckResult<String> {
        let qualified = self.qualified_signature(type_signature, files)?;
        Ok(match type_signature {
            TypeSignature::InlineUnion(_) => format!("({qualified})"),
            _ => qualified,
        })
    }

    /// Follow alias chains until a non-alias signature is reached
    pub fn unalias_type(
        &mut self,
        type_signature: &TypeSignature,
        files: &ProjectFileStructure,
    ) -> CheckResult<TypeSignature> {
        let mut current = type_signature.clone();
        let mut chain: Vec<String> = Vec::new();
        loop {
            let TypeSignature::Custom(custom_type) = &current else {
                return Ok(current);
            };
            let name = current.to_string();
            if chain.contains(&name) {
                chain.push(name);
                return Err(ValidationError::CyclicTypeDependency {
                    entry_point: chain[0].clone(),
                    chain: chain.join(" -> "),
                    debug_info: custom_type.debug_info.clone(),
                    span: to_source_span(&custom_type.debug_info),
                }
                .into());
            }
            chain.push(name);
            match self.retrieve_type_definition(custom_type, files)? {
                TypeDefinition::Alias(alias) => current = alias.aliased_type,
                _ => return Ok(current),
            }
        }
    }

    pub fn is_union(
        &mut self,
        type_signature: &TypeSignature,
        files: &ProjectFileStructure,
    ) -> CheckResult<bool> {
        match self.unalias_type(type_signature, files)? {
            TypeSignature::InlineUnion(_) => Ok(true),
            TypeSignature::Custom(custom_type) => Ok(matches!(
                self.retrieve_type_definition(&custom_type, files)?,
                TypeDefinition::Union(_)
            )),
            _ => Ok(false),
        }
    }

    /// Direct alternatives of a union, or nothing when the type is not one
    pub fn fetch_union_alternatives(
        &mut self,
        type_signature: &TypeSignature,
        files: &ProjectFileStructure,
    ) -> CheckResult<Vec<TypeSignature>> {
        match self.unalias_type(type_signature, files)? {
            TypeSignature::InlineUnion(inline_union) => Ok(inline_union.alternatives),
            TypeSignature::Custom(custom_type) => match self.retrieve_type_definition(&custom_type, files)? {
                TypeDefinition::Union(union_def) => Ok(union_def.types),
                _ => Ok(Vec::new()),
            },
            _ => Ok(Vec::new()),
        }
    }

    /// Every non-union type a value of this union may hold, nested unions flattened
    pub fn fetch_non_union_compatible_types_for_union_assignment(
        &mut self,
        type_signature: &TypeSignature,
        files: &ProjectFileStructure,
    ) -> CheckResult<Vec<TypeSignature>> {
        let mut compatible = Vec::new();
        for alternative in self.fetch_union_alternatives(type_signature, files)? {
            let nested = if self.is_union(&alternative, files)? {
                self.fetch_non_union_compatible_types_for_union_assignment(&alternative, files)?
            } else {
                vec![alternative]
            };
            for candidate in nested {
                if !compatible.contains(&candidate) {
                    compatible.push(candidate);
                }
            }
        }
        Ok(compatible)
    }

    pub fn verify_that_the_type_exists(
        &mut self,
        type_signature: &TypeSignature,
        files: &ProjectFileStructure,
    ) -> CheckResult<()> {
        match type_signature {
            TypeSignature::Pointer(pointer) => self.verify_that_the_type_exists(&pointer.pointed_type, files),
            TypeSignature::Array(array) => self.verify_that_the_type_exists(&array.stored_type, files),
            TypeSignature::Slice(slice) => self.verify_that_the_type_exists(&slice.stored_type, files),
            TypeSignature::Custom(custom_type) => {
                for parameter in &custom_type.type_parameters {
                    self.verify_that_the_type_exists(parameter, files)?;
                }
                self.retrieve_type_definition(custom_type, files).map(|_| ())
            }
            TypeSignature::InlineUnion(inline_union) => {
                for alternative in &inline_union.alternatives {
                    self.verify_that_the_type_exists(alternative, files)?;
                }
                Ok(())
            }
            TypeSignature::Template(_) | TypeSignature::Primitive(_) => Ok(()),
        }
    }

    pub fn is_generic(&self, type_signature: &TypeSignature) -> bool {
        type_signature.is_generic()
    }
}
