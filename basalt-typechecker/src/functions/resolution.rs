//! Overload resolution
//!
//! Gathers the candidates of every overload set a call may refer to, keeps
//! the ones its argument types can be assigned to, and picks the unique most
//! specific one. Generic winners are monomorphized once and published in the
//! function arena.

use super::specificity::{FunctionSpecificityDescriptor, SpecificityComparison};
use super::FunctionId;
use crate::assignment::AssignmentTypeChecker;
use crate::error::{to_source_span, CheckResult, InternalError, ValidationError};
use crate::generics::{GenericSubstitutionRules, GenericsInstantiationEngine};
use crate::program::ProgramRepresentation;
use basalt_parser::{FunctionCall, FunctionDefinition, TypeSignature};

/// Deepest chain of instantiations triggered from generic bodies
pub const MAX_INSTANTIATION_DEPTH: usize = 64;

struct CompatibleCandidate {
    id: FunctionId,
    definition: FunctionDefinition,
    rules: GenericSubstitutionRules,
    descriptor: FunctionSpecificityDescriptor,
}

pub struct OverloadingResolutionEngine<'p> {
    program: &'p mut ProgramRepresentation,
}

impl<'p> OverloadingResolutionEngine<'p> {
    pub fn new(program: &'p mut ProgramRepresentation) -> Self {
        Self { program }
    }

    /// Most specific overload accepting `argument_types`, or `None`
    pub fn resolve(
        &mut self,
        call: &FunctionCall,
        argument_types: &[TypeSignature],
    ) -> CheckResult<Option<FunctionId>> {
        let cache_key = self.cache_key(call, argument_types)?;
        if let Some(cached) = self.program.resolution_cache.get(&cache_key) {
            tracing::trace!(target: "resolution", key = %cache_key, "overload cache hit");
            return Ok(*cached);
        }

        let resolved = self.resolve_uncached(call, argument_types)?;
        tracing::trace!(
            target: "resolution",
            key = %cache_key,
            resolved = ?resolved,
            "overload resolved"
        );
        self.program.resolution_cache.insert(cache_key, resolved);
        Ok(resolved)
    }

    fn cache_key(&mut self, call: &FunctionCall, argument_types: &[TypeSignature]) -> CheckResult<String> {
        let program = &mut *self.program;
        let generics = call
            .instantiated_generics
            .iter()
            .map(|generic| program.types.qualified_signature(generic, &program.files))
            .collect::<CheckResult<Vec<_>>>()?;
        let arguments = argument_types
            .iter()
            .map(|argument| program.types.qualified_signature(argument, &program.files))
            .collect::<CheckResult<Vec<_>>>()?;
        Ok(format!(
            "{}|{}|{}<{}>({})",
            call.debug_info.filename,
            call.package_prefix.as_deref().unwrap_or(""),
            call.function_name,
            generics.join(","),
            arguments.join(",")
        ))
    }

    fn resolve_uncached(
        &mut self,
        call: &FunctionCall,
        argument_types: &[TypeSignature],
    ) -> CheckResult<Option<FunctionId>> {
        let mut candidate_ids = Vec::new();
        for set_id in self.program.functions.retrieve_overload_sets_ids(call, &self.program.files)? {
            for id in self.program.functions.retrieve_specific_overload_set(&set_id)? {
                if !candidate_ids.contains(id) {
                    candidate_ids.push(*id);
                }
            }
        }
        candidate_ids.sort();

        let mut compatible = Vec::new();
        for id in candidate_ids {
            let definition = self.program.functions.get_function(id)?.definition.clone();
            if definition.arguments.len() != argument_types.len() {
                continue;
            }
            let Some(rules) = self.check_compatibility(&definition, call, argument_types)? else {
                continue;
            };
            let program = &mut *self.program;
            let descriptor = FunctionSpecificityDescriptor::from_function(
                &definition,
                argument_types,
                &rules,
                &mut program.types,
                &program.files,
            )?;
            compatible.push(CompatibleCandidate {
                id,
                definition,
                rules,
                descriptor,
            });
        }

        if compatible.is_empty() {
            return Ok(None);
        }

        let best: Vec<&CompatibleCandidate> = compatible
            .iter()
            .filter(|candidate| {
                compatible.iter().all(|other| {
                    candidate.descriptor.compare_with(&other.descriptor) != SpecificityComparison::LessSpecific
                })
            })
            .collect();

        if best.len() > 1 {
            return Err(ValidationError::AmbiguousOverload {
                function_name: call.function_name.clone(),
                candidates: best.iter().map(|candidate| candidate.definition.signature()).collect(),
                debug_info: call.debug_info.clone(),
                span: to_source_span(&call.debug_info),
            }
            .into());
        }

        let Some(winner) = best.first() else {
            return Err(InternalError::at(
                format!("no most specific overload of `{}` among compatible candidates", call.function_name),
                &call.debug_info,
            )
            .into());
        };

        if !winner.definition.is_generic() {
            return Ok(Some(winner.id));
        }
        self.instantiate(winner.id, &winner.definition, &winner.rules, call)
            .map(Some)
    }

    /// Generic bindings under which the arguments fit the candidate
    fn check_compatibility(
        &mut self,
        definition: &FunctionDefinition,
        call: &FunctionCall,
        argument_types: &[TypeSignature],
    ) -> CheckResult<Option<GenericSubstitutionRules>> {
        let program = &mut *self.program;
        let explicit = &call.instantiated_generics;
        let mut checker = if explicit.is_empty() {
            AssignmentTypeChecker::new(&mut program.types, &program.files)
        } else {
            if explicit.len() != definition.template_generics.len() {
                return Ok(None);
            }
            let rules = GenericSubstitutionRules::zip_components_vectors(&definition.template_generics, explicit)?;
            AssignmentTypeChecker::with_fixed_rules(&mut program.types, &program.files, rules)
        };

        for (argument, argument_type) in definition.arguments.iter().zip(argument_types) {
            if !checker.validate_assignment(&argument.arg_type, argument_type)? {
                return Ok(None);
            }
        }

        let rules = checker.into_rules();
        if !rules.covers(&definition.template_generics) {
            return Ok(None);
        }
        Ok(Some(rules))
    }

    fn instantiate(
        &mut self,
        generic_id: FunctionId,
        definition: &FunctionDefinition,
        rules: &GenericSubstitutionRules,
        call: &FunctionCall,
    ) -> CheckResult<FunctionId> {
        let Some(replacements) = rules.replacements_for(&definition.template_generics) else {
            return Err(InternalError::at(
                format!("incomplete generic bindings for `{}`", definition.function_name),
                &call.debug_info,
            )
            .into());
        };

        let program = &mut *self.program;
        let qualified = replacements
            .iter()
            .map(|replacement| program.types.qualified_signature(replacement, &program.files))
            .collect::<CheckResult<Vec<_>>>()?;
        let key = format!(
            "{}:{}:{}:{}<{}>",
            definition.debug_info.filename,
            definition.debug_info.line_number,
            definition.debug_info.tok_number,
            definition.function_name,
            qualified.join(",")
        );
        if let Some(existing) = program.functions.lookup_instantiation(&key) {
            tracing::trace!(target: "resolution", key = %key, "instantiation cache hit");
            return Ok(existing);
        }

        let depth = match program.current_function {
            Some(current) => program.functions.get_function(current)?.instantiation_depth + 1,
            None => 1,
        };
        if depth > MAX_INSTANTIATION_DEPTH {
            return Err(ValidationError::InstantiationDepthExceeded {
                function_name: definition.function_name.clone(),
                limit: MAX_INSTANTIATION_DEPTH,
                debug_info: call.debug_info.clone(),
                span: to_source_span(&call.debug_info),
            }
            .into());
        }

        let new_name = format!(
            "{}<{}>",
            definition.function_name,
            replacements
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",")
        );
        let instantiated = GenericsInstantiationEngine::new(rules).instantiate_generic_function(definition, &new_name);
        let package = program.functions.get_function(generic_id)?.package.clone();
        let id = program
            .functions
            .store_instantiation(instantiated, &package, generic_id, depth, key);

        tracing::trace!(
            target: "resolution",
            function = %new_name,
            id = %id,
            depth,
            "instantiated generic function"
        );
        Ok(id)
    }
}
