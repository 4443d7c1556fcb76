//! Structural unification of a generic signature against a concrete one
//!
//! Unification infers the rules that turn `template` into `concrete`.
//! Instantiating the template with the inferred rules reproduces the
//! concrete signature.

use crate::generics::GenericSubstitutionRules;
use basalt_parser::TypeSignature;

/// Infer the substitution rules that make `template` equal to `concrete`
///
/// Besides `TemplateType` leaves, a bare custom name listed in
/// `generic_names` binds too.
pub fn apply_generics_to_typesignature(
    template: &TypeSignature,
    concrete: &TypeSignature,
    generic_names: &[String],
) -> Option<GenericSubstitutionRules> {
    let mut rules = GenericSubstitutionRules::new();
    unify(template, concrete, generic_names, &mut rules).then_some(rules)
}

fn template_leaf_name<'t>(type_signature: &'t TypeSignature, generic_names: &[String]) -> Option<&'t str> {
    match type_signature {
        TypeSignature::Template(template) => Some(&template.type_name),
        TypeSignature::Custom(custom_type)
            if custom_type.package_prefix.is_none()
                && custom_type.type_parameters.is_empty()
                && generic_names.contains(&custom_type.type_name) =>
        {
            Some(&custom_type.type_name)
        }
        _ => None,
    }
}

/// True if unification may bind anything inside the signature
pub fn mentions_generics(type_signature: &TypeSignature, generic_names: &[String]) -> bool {
    if template_leaf_name(type_signature, generic_names).is_some() {
        return true;
    }
    match type_signature {
        TypeSignature::Custom(custom_type) => custom_type
            .type_parameters
            .iter()
            .any(|parameter| mentions_generics(parameter, generic_names)),
        TypeSignature::InlineUnion(inline_union) => inline_union
            .alternatives
            .iter()
            .any(|alternative| mentions_generics(alternative, generic_names)),
        TypeSignature::Pointer(pointer) => mentions_generics(&pointer.pointed_type, generic_names),
        TypeSignature::Array(array) => mentions_generics(&array.stored_type, generic_names),
        TypeSignature::Slice(slice) => mentions_generics(&slice.stored_type, generic_names),
        TypeSignature::Template(_) | TypeSignature::Primitive(_) => false,
    }
}

fn unify(
    template: &TypeSignature,
    concrete: &TypeSignature,
    generic_names: &[String],
    rules: &mut GenericSubstitutionRules,
) -> bool {
    if let Some(name) = template_leaf_name(template, generic_names) {
        return match rules.get(name) {
            Some(bound) => bound == concrete,
            None => {
                rules.set(name, concrete.clone());
                true
            }
        };
    }

    match (template, concrete) {
        (TypeSignature::Primitive(left), TypeSignature::Primitive(right)) => left.kind == right.kind,
        (TypeSignature::Pointer(left), TypeSignature::Pointer(right)) => {
            unify(&left.pointed_type, &right.pointed_type, generic_names, rules)
        }
        (TypeSignature::Slice(left), TypeSignature::Slice(right)) => {
            unify(&left.stored_type, &right.stored_type, generic_names, rules)
        }
        (TypeSignature::Array(left), TypeSignature::Array(right)) => {
            left.array_length == right.array_length
                && unify(&left.stored_type, &right.stored_type, generic_names, rules)
        }
        (TypeSignature::Custom(left), TypeSignature::Custom(right)) => {
            let same_package = match (&left.package_prefix, &right.package_prefix) {
                (Some(left), Some(right)) => left == right,
                _ => true,
            };
            same_package
                && left.type_name == right.type_name
                && left.type_parameters.len() == right.type_parameters.len()
                && left
                    .type_parameters
                    .iter()
                    .zip(&right.type_parameters)
                    .all(|(left, right)| unify(left, right, generic_names, rules))
        }
        (TypeSignature::InlineUnion(left), TypeSignature::InlineUnion(right)) => {
            let (generic, fixed): (Vec<&TypeSignature>, Vec<&TypeSignature>) = left
                .alternatives
                .iter()
                .partition(|alternative| mentions_generics(alternative, generic_names));
            if !fixed.iter().all(|alternative| right.alternatives.contains(*alternative)) {
                return false;
            }
            let remaining: Vec<&TypeSignature> = right
                .alternatives
                .iter()
                .filter(|alternative| !fixed.contains(alternative))
                .collect();
            generic.len() == remaining.len()
                && generic
                    .iter()
                    .zip(remaining)
                    .all(|(left, right)| unify(left, right, generic_names, rules))
        }
        _ => false,
    }
}
