use crate::error::CheckResult;
use crate::program::ProjectFileStructure;
use crate::registry::TypeDefinitionsRegister;
use basalt_parser::{TypeDefinition, TypeSignature};
use std::collections::HashSet;

/// Decides whether values of a type share storage with their source
///
/// Copying a pointer or a slice, or anything containing one, bonds the copy
/// to the original: writes through one are visible through the other.
pub struct BondInspector<'a> {
    types: &'a mut TypeDefinitionsRegister,
    files: &'a ProjectFileStructure,
    /// Custom types currently being inspected
    in_progress: HashSet<String>,
}

impl<'a> BondInspector<'a> {
    pub fn new(types: &'a mut TypeDefinitionsRegister, files: &'a ProjectFileStructure) -> Self {
        Self {
            types,
            files,
            in_progress: HashSet::new(),
        }
    }

    pub fn does_the_type_of_this_expr_imply_a_bond(&mut self, type_signature: &TypeSignature) -> CheckResult<bool> {
        match type_signature {
            TypeSignature::Pointer(_) | TypeSignature::Slice(_) | TypeSignature::Template(_) => Ok(true),
            TypeSignature::Array(_) | TypeSignature::Primitive(_) => Ok(false),
            TypeSignature::InlineUnion(inline_union) => self.any_implies_a_bond(&inline_union.alternatives),
            TypeSignature::Custom(custom_type) => {
                let key = self.types.qualified_signature(type_signature, self.files)?;
                if !self.in_progress.insert(key.clone()) {
                    return Ok(false);
                }
                let result = match self.types.retrieve_type_definition(custom_type, self.files) {
                    Ok(TypeDefinition::Struct(struct_def)) => {
                        let field_types: Vec<TypeSignature> =
                            struct_def.fields.into_iter().map(|field| field.field_type).collect();
                        self.any_implies_a_bond(&field_types)
                    }
                    Ok(TypeDefinition::Union(union_def)) => self.any_implies_a_bond(&union_def.types),
                    Ok(TypeDefinition::Alias(alias)) => self.does_the_type_of_this_expr_imply_a_bond(&alias.aliased_type),
                    Err(error) => Err(error),
                };
                self.in_progress.remove(&key);
                result
            }
        }
    }

    fn any_implies_a_bond(&mut self, type_signatures: &[TypeSignature]) -> CheckResult<bool> {
        for type_signature in type_signatures {
            if self.does_the_type_of_this_expr_imply_a_bond(type_signature)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
