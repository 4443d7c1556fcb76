//! Structural assignability
//!
//! `AssignmentTypeChecker` answers "can a value of type `source` be stored
//! in a location of type `dest`", inferring generic bindings along the way
//! when the destination mentions template types.

use crate::error::CheckResult;
use crate::generics::{GenericSubstitutionRules, GenericsInstantiationEngine};
use crate::program::ProjectFileStructure;
use crate::registry::TypeDefinitionsRegister;
use crate::unification::apply_generics_to_typesignature;
use basalt_parser::{CustomType, PrimitiveKind, TypeSignature};
use indexmap::IndexSet;

pub struct AssignmentTypeChecker<'a> {
    types: &'a mut TypeDefinitionsRegister,
    files: &'a ProjectFileStructure,
    rules: GenericSubstitutionRules,
    /// Generics fixed by explicit type arguments; they never rebind
    locked_generics: IndexSet<String>,
}

impl<'a> AssignmentTypeChecker<'a> {
    pub fn new(types: &'a mut TypeDefinitionsRegister, files: &'a ProjectFileStructure) -> Self {
        Self {
            types,
            files,
            rules: GenericSubstitutionRules::new(),
            locked_generics: IndexSet::new(),
        }
    }

    /// Checker whose generic bindings start from explicit type arguments
    pub fn with_fixed_rules(
        types: &'a mut TypeDefinitionsRegister,
        files: &'a ProjectFileStructure,
        rules: GenericSubstitutionRules,
    ) -> Self {
        let locked_generics = rules.iter().map(|rule| rule.to_be_replaced.clone()).collect();
        Self {
            types,
            files,
            rules,
            locked_generics,
        }
    }

    pub fn rules(&self) -> &GenericSubstitutionRules {
        &self.rules
    }

    pub fn into_rules(self) -> GenericSubstitutionRules {
        self.rules
    }

    pub fn validate_assignment(&mut self, dest: &TypeSignature, source: &TypeSignature) -> CheckResult<bool> {
        let dest = self.types.unalias_type(dest, self.files)?;
        let source = self.substitute(source);
        let source = self.types.unalias_type(&source, self.files)?;

        match &dest {
            TypeSignature::Template(template) => self.validate_assignment_to_template(&template.type_name, &source),
            TypeSignature::Custom(custom_type) => self.validate_assignment_to_custom_type(custom_type, &dest, &source),
            TypeSignature::InlineUnion(_) => self.validate_assignment_to_union(&dest, &source),
            TypeSignature::Pointer(pointer) => match &source {
                TypeSignature::Pointer(source_pointer) => {
                    self.validate_strict_assignment(&pointer.pointed_type, &source_pointer.pointed_type)
                }
                _ => Ok(false),
            },
            TypeSignature::Array(array) => match &source {
                TypeSignature::Array(source_array) if source_array.array_length == array.array_length => {
                    self.validate_assignment(&array.stored_type, &source_array.stored_type)
                }
                _ => Ok(false),
            },
            TypeSignature::Slice(slice) => self.validate_assignment_to_slice(&slice.stored_type, &source),
            TypeSignature::Primitive(primitive) => self.validate_assignment_to_primitive(primitive.kind, &source),
        }
    }

    /// Mutual assignability; generic destinations are matched by unification
    pub fn validate_strict_assignment(
        &mut self,
        dest: &TypeSignature,
        source: &TypeSignature,
    ) -> CheckResult<bool> {
        let dest = self.types.unalias_type(dest, self.files)?;
        let source = self.substitute(source);
        let source = self.types.unalias_type(&source, self.files)?;

        if dest.is_generic() {
            let Some(inferred) = apply_generics_to_typesignature(&dest, &source, &[]) else {
                return Ok(false);
            };
            let mut merged = self.rules.clone();
            if !merged.merge(&inferred) {
                return Ok(false);
            }
            self.rules = merged;
            return Ok(true);
        }

        // Unions compare as sets, everything else is matched level by level
        if !self.types.is_union(&dest, self.files)? && !self.types.is_union(&source, self.files)? {
            match (&dest, &source) {
                (TypeSignature::Pointer(dest_pointer), TypeSignature::Pointer(source_pointer)) => {
                    return self.validate_strict_assignment(&dest_pointer.pointed_type, &source_pointer.pointed_type);
                }
                (TypeSignature::Array(dest_array), TypeSignature::Array(source_array)) => {
                    if dest_array.array_length != source_array.array_length {
                        return Ok(false);
                    }
                    return self.validate_strict_assignment(&dest_array.stored_type, &source_array.stored_type);
                }
                (TypeSignature::Slice(dest_slice), TypeSignature::Slice(source_slice)) => {
                    return self.validate_strict_assignment(&dest_slice.stored_type, &source_slice.stored_type);
                }
                (TypeSignature::Primitive(dest_primitive), TypeSignature::Primitive(source_primitive)) => {
                    return Ok(dest_primitive.kind == source_primitive.kind);
                }
                (TypeSignature::Custom(dest_type), TypeSignature::Custom(source_type)) => {
                    return self.is_name_equivalent(dest_type, source_type);
                }
                _ => {}
            }
        }

        Ok(self.validate_assignment(&dest, &source)? && self.validate_assignment(&source, &dest)?)
    }

    fn substitute(&self, type_signature: &TypeSignature) -> TypeSignature {
        if self.rules.is_empty() || !type_signature.is_generic() {
            return type_signature.clone();
        }
        GenericsInstantiationEngine::new(&self.rules).instantiate_generic_typesignature(type_signature)
    }

    fn validate_assignment_to_template(&mut self, name: &str, source: &TypeSignature) -> CheckResult<bool> {
        let Some(bound) = self.rules.get(name).cloned() else {
            self.rules.set(name, source.clone());
            return Ok(true);
        };
        if self.locked_generics.contains(name) {
            return self.validate_strict_assignment(&bound, source);
        }
        if self.validate_assignment(&bound, source)? {
            return Ok(true);
        }
        if self.validate_assignment(source, &bound)? {
            self.rules.set(name, source.clone());
            return Ok(true);
        }

        let widened = match bound {
            TypeSignature::InlineUnion(mut inline_union) => {
                inline_union.alternatives.push(source.clone());
                TypeSignature::InlineUnion(inline_union)
            }
            other => TypeSignature::inline_union(vec![other, source.clone()]),
        };
        self.rules.set(name, widened);
        Ok(true)
    }

    fn validate_assignment_to_custom_type(
        &mut self,
        dest_type: &CustomType,
        dest: &TypeSignature,
        source: &TypeSignature,
    ) -> CheckResult<bool> {
        if let TypeSignature::Custom(source_type) = source {
            if self.is_name_equivalent(dest_type, source_type)? {
                return Ok(true);
            }
        }
        if self.types.is_union(dest, self.files)? {
            return self.validate_assignment_to_union(dest, source);
        }
        Ok(false)
    }

    fn is_name_equivalent(&mut self, dest: &CustomType, source: &CustomType) -> CheckResult<bool> {
        if dest.type_name != source.type_name || dest.type_parameters.len() != source.type_parameters.len() {
            return Ok(false);
        }
        let dest_key = self.types.fully_qualified_name(dest, self.files)?;
        let source_key = self.types.fully_qualified_name(source, self.files)?;
        if dest_key.package != source_key.package {
            return Ok(false);
        }
        for (dest_parameter, source_parameter) in dest.type_parameters.iter().zip(&source.type_parameters) {
            if !self.validate_strict_assignment(dest_parameter, source_parameter)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn validate_assignment_to_union(&mut self, dest: &TypeSignature, source: &TypeSignature) -> CheckResult<bool> {
        for alternative in self.types.fetch_union_alternatives(dest, self.files)? {
            let snapshot = self.rules.clone();
            if self.validate_assignment(&alternative, source)? {
                return Ok(true);
            }
            self.rules = snapshot;
        }

        let source_alternatives = self.types.fetch_union_alternatives(source, self.files)?;
        if source_alternatives.is_empty() {
            return Ok(false);
        }
        let snapshot = self.rules.clone();
        for alternative in &source_alternatives {
            if !self.validate_assignment(dest, alternative)? {
                self.rules = snapshot;
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn validate_assignment_to_slice(&mut self, stored_type: &TypeSignature, source: &TypeSignature) -> CheckResult<bool> {
        match source {
            TypeSignature::Slice(source_slice) => self.validate_strict_assignment(stored_type, &source_slice.stored_type),
            TypeSignature::Pointer(source_pointer) => {
                match self.types.unalias_type(&source_pointer.pointed_type, self.files)? {
                    TypeSignature::Array(array) => self.validate_strict_assignment(stored_type, &array.stored_type),
                    _ => Ok(false),
                }
            }
            _ => Ok(false),
        }
    }

    fn validate_assignment_to_primitive(&mut self, kind: PrimitiveKind, source: &TypeSignature) -> CheckResult<bool> {
        match (kind, source) {
            (_, TypeSignature::Primitive(source_primitive)) => Ok(source_primitive.kind == kind
                || (kind == PrimitiveKind::String && source_primitive.kind == PrimitiveKind::RawString)),
            (PrimitiveKind::String, TypeSignature::Slice(slice)) => self.is_char(&slice.stored_type),
            (PrimitiveKind::String, TypeSignature::Pointer(pointer)) => {
                match self.types.unalias_type(&pointer.pointed_type, self.files)? {
                    TypeSignature::Array(array) => self.is_char(&array.stored_type),
                    _ => Ok(false),
                }
            }
            _ => Ok(false),
        }
    }

    fn is_char(&mut self, type_signature: &TypeSignature) -> CheckResult<bool> {
        Ok(self
            .types
            .unalias_type(type_signature, self.files)?
            .is_primitive(PrimitiveKind::Char))
    }
}
