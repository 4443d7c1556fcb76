//! Overload specificity ranking

use crate::error::CheckResult;
use crate::generics::{GenericSubstitutionRules, GenericsInstantiationEngine};
use crate::program::ProjectFileStructure;
use crate::registry::TypeDefinitionsRegister;
use basalt_parser::{FunctionDefinition, TypeSignature};
use std::cmp::Ordering;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecificityComparison {
    LessSpecific,
    EquallySpecific,
    MoreSpecific,
}

/// Metrics of a candidate overload for one particular call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionSpecificityDescriptor {
    pub is_generic: bool,
    pub generic_parameter_reuses: usize,
    pub arguments_types_complexity_score: usize,
    pub number_of_unions_in_arguments_types: usize,
    pub number_of_cases_covered_by_unions_in_arguments_types: usize,
    pub number_of_possible_type_conversions: usize,
}

impl FunctionSpecificityDescriptor {
    /// Fold the declared parameter types of `func_def` against the argument
    /// types of a call; `rules` are the generic bindings the call inferred
    pub fn from_function(
        func_def: &FunctionDefinition,
        argument_types: &[TypeSignature],
        rules: &GenericSubstitutionRules,
        types: &mut TypeDefinitionsRegister,
        files: &ProjectFileStructure,
    ) -> CheckResult<Self> {
        let mut descriptor = Self {
            is_generic: func_def.is_generic(),
            ..Self::default()
        };

        let mut template_occurrences = 0;
        let mut template_names = HashSet::new();
        let engine = GenericsInstantiationEngine::new(rules);

        for (argument, argument_type) in func_def.arguments.iter().zip(argument_types) {
            let parameter = &argument.arg_type;
            template_occurrences += parameter.count_template_leaves();
            collect_template_names(parameter, &mut template_names);
            descriptor.arguments_types_complexity_score += complexity_score(parameter);
            descriptor.update_union_metrics(parameter, types, files)?;

            let instantiated = types.unalias_type(&engine.instantiate_generic_typesignature(parameter), files)?;
            let argument_type = types.unalias_type(argument_type, files)?;
            if instantiated != argument_type {
                descriptor.number_of_possible_type_conversions += 1;
            }
        }

        descriptor.generic_parameter_reuses = template_occurrences.saturating_sub(template_names.len());
        Ok(descriptor)
    }

    fn update_union_metrics(
        &mut self,
        parameter: &TypeSignature,
        types: &mut TypeDefinitionsRegister,
        files: &ProjectFileStructure,
    ) -> CheckResult<()> {
        match parameter {
            TypeSignature::Template(_) | TypeSignature::Primitive(_) => Ok(()),
            TypeSignature::Pointer(pointer) => self.update_union_metrics(&pointer.pointed_type, types, files),
            TypeSignature::Array(array) => self.update_union_metrics(&array.stored_type, types, files),
            TypeSignature::Slice(slice) => self.update_union_metrics(&slice.stored_type, types, files),
            TypeSignature::InlineUnion(_) | TypeSignature::Custom(_) => {
                if types.is_union(parameter, files)? {
                    self.number_of_unions_in_arguments_types += 1;
                    self.number_of_cases_covered_by_unions_in_arguments_types += types
                        .fetch_non_union_compatible_types_for_union_assignment(parameter, files)?
                        .len();
                }
                if let TypeSignature::Custom(custom_type) = parameter {
                    for type_parameter in &custom_type.type_parameters {
                        self.update_union_metrics(type_parameter, types, files)?;
                    }
                }
                Ok(())
            }
        }
    }

    /// Rank `self` against `other`
    ///
    /// Criteria, first difference wins: fewer conversions, fewer union
    /// cases, lower complexity, non-generic over generic, then more reuse
    /// of generic parameters.
    pub fn compare_with(&self, other: &Self) -> SpecificityComparison {
        let ordering = other
            .number_of_possible_type_conversions
            .cmp(&self.number_of_possible_type_conversions)
            .then_with(|| {
                other
                    .number_of_cases_covered_by_unions_in_arguments_types
                    .cmp(&self.number_of_cases_covered_by_unions_in_arguments_types)
            })
            .then_with(|| {
                other
                    .arguments_types_complexity_score
                    .cmp(&self.arguments_types_complexity_score)
            })
            .then_with(|| other.is_generic.cmp(&self.is_generic))
            .then_with(|| {
                if self.is_generic && other.is_generic {
                    self.generic_parameter_reuses.cmp(&other.generic_parameter_reuses)
                } else {
                    Ordering::Equal
                }
            });

        match ordering {
            Ordering::Less => SpecificityComparison::LessSpecific,
            Ordering::Equal => SpecificityComparison::EquallySpecific,
            Ordering::Greater => SpecificityComparison::MoreSpecific,
        }
    }
}

fn collect_template_names(type_signature: &TypeSignature, names: &mut HashSet<String>) {
    match type_signature {
        TypeSignature::Template(template) => {
            names.insert(template.type_name.clone());
        }
        TypeSignature::Primitive(_) => {}
        TypeSignature::Custom(custom_type) => {
            for parameter in &custom_type.type_parameters {
                collect_template_names(parameter, names);
            }
        }
        TypeSignature::InlineUnion(inline_union) => {
            for alternative in &inline_union.alternatives {
                collect_template_names(alternative, names);
            }
        }
        TypeSignature::Pointer(pointer) => collect_template_names(&pointer.pointed_type, names),
        TypeSignature::Array(array) => collect_template_names(&array.stored_type, names),
        TypeSignature::Slice(slice) => collect_template_names(&slice.stored_type, names),
    }
}

/// Structural size of a declared parameter type
pub fn complexity_score(type_signature: &TypeSignature) -> usize {
    match type_signature {
        TypeSignature::Template(_) | TypeSignature::Primitive(_) => 1,
        TypeSignature::Pointer(pointer) => 1 + complexity_score(&pointer.pointed_type),
        TypeSignature::Array(array) => 1 + complexity_score(&array.stored_type),
        TypeSignature::Slice(slice) => 1 + complexity_score(&slice.stored_type),
        TypeSignature::Custom(custom_type) => {
            1 + custom_type.type_parameters.len()
                + custom_type
                    .type_parameters
                    .iter()
                    .map(complexity_score)
                    .sum::<usize>()
        }
        TypeSignature::InlineUnion(inline_union) => {
            1 + inline_union.alternatives.iter().map(complexity_score).sum::<usize>()
        }
    }
}
