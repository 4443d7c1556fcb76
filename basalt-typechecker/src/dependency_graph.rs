//! Type dependency navigation
//!
//! A struct, union or alias that contains itself by value has no finite
//! size. The navigator runs a depth-first search from every stored
//! definition and reports each cycle once. Pointers and slices break cycles,
//! so their targets only need to exist.

use crate::error::{to_source_span, CheckResult, CompilationError, ValidationError};
use crate::program::ProgramRepresentation;
use crate::unification::mentions_generics;
use basalt_parser::{TypeDefinition, TypeSignature};
use std::collections::{BTreeSet, HashSet};

pub struct TypeDependencyNavigator<'p> {
    program: &'p mut ProgramRepresentation,
    /// Definitions on the current DFS path: unique id and name
    path: Vec<(String, String)>,
    /// Definitions whose subtree has been fully explored
    completed: HashSet<String>,
    reported_cycles: HashSet<BTreeSet<String>>,
    errors: Vec<CompilationError>,
}

impl<'p> TypeDependencyNavigator<'p> {
    pub fn new(program: &'p mut ProgramRepresentation) -> Self {
        Self {
            program,
            path: Vec::new(),
            completed: HashSet::new(),
            reported_cycles: HashSet::new(),
            errors: Vec::new(),
        }
    }

    pub fn visit_all_type_definitions(mut self) -> Vec<CompilationError> {
        let keys = self.program.types.declared_keys().to_vec();
        for key in keys {
            let Some(type_def) = self.program.types.get(&key).cloned() else {
                continue;
            };
            if let Err(error) = self.visit_type_definition(&type_def) {
                self.errors.push(error);
            }
            self.path.clear();
        }

        tracing::debug!(
            target: "dependencies",
            definitions = self.completed.len(),
            errors = self.errors.len(),
            "type dependencies visited"
        );
        self.errors
    }

    fn visit_type_definition(&mut self, type_def: &TypeDefinition) -> CheckResult<()> {
        let id = type_def.unique_id();
        if let Some(position) = self.path.iter().position(|(on_path, _)| *on_path == id) {
            self.report_cycle(type_def, position);
            return Ok(());
        }
        if self.completed.contains(&id) {
            return Ok(());
        }

        self.path.push((id.clone(), type_def.name().to_string()));
        let generics = type_def.template_generics();
        let result = match type_def {
            TypeDefinition::Struct(struct_def) => struct_def
                .fields
                .iter()
                .try_for_each(|field| self.visit_type_signature(&field.field_type, generics)),
            TypeDefinition::Union(union_def) => union_def
                .types
                .iter()
                .try_for_each(|alternative| self.visit_type_signature(alternative, generics)),
            TypeDefinition::Alias(alias) => self.visit_type_signature(&alias.aliased_type, generics),
        };
        self.path.pop();
        self.completed.insert(id);
        result
    }

    fn visit_type_signature(&mut self, type_signature: &TypeSignature, generics: &[String]) -> CheckResult<()> {
        if type_signature.is_generic() || mentions_generics(type_signature, generics) {
            return Ok(());
        }
        match type_signature {
            TypeSignature::Pointer(_) | TypeSignature::Slice(_) => {
                self.program.verify_that_the_type_exists(type_signature)
            }
            TypeSignature::Array(array) => self.visit_type_signature(&array.stored_type, generics),
            TypeSignature::InlineUnion(inline_union) => inline_union
                .alternatives
                .iter()
                .try_for_each(|alternative| self.visit_type_signature(alternative, generics)),
            TypeSignature::Custom(custom_type) => {
                let type_def = self.program.retrieve_type_definition(custom_type)?;
                self.visit_type_definition(&type_def)
            }
            TypeSignature::Primitive(_) | TypeSignature::Template(_) => Ok(()),
        }
    }

    fn report_cycle(&mut self, type_def: &TypeDefinition, position: usize) {
        let members: BTreeSet<String> = self.path[position..].iter().map(|(id, _)| id.clone()).collect();
        if !self.reported_cycles.insert(members) {
            return;
        }

        let mut chain: Vec<&str> = self.path[position..].iter().map(|(_, name)| name.as_str()).collect();
        chain.push(type_def.name());
        let entry_point = self.path[0].1.clone();

        tracing::trace!(target: "dependencies", cycle = %chain.join(" -> "), "cyclic type dependency");
        self.errors.push(
            ValidationError::CyclicTypeDependency {
                entry_point,
                chain: chain.join(" -> "),
                debug_info: type_def.debug_info().clone(),
                span: to_source_span(type_def.debug_info()),
            }
            .into(),
        );
    }
}
