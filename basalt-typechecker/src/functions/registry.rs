use super::FunctionId;
use crate::error::{CheckResult, IndexingError};
use crate::program::ProjectFileStructure;
use basalt_parser::{FunctionCall, FunctionDefinition};
use indexmap::IndexMap;

/// A published function; never mutated after it is stored
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionRecord {
    pub definition: FunctionDefinition,
    pub package: String,
    /// Generic function this one was instantiated from
    pub instantiated_from: Option<FunctionId>,
    /// Number of nested instantiations that led to this function
    pub instantiation_depth: usize,
}

impl FunctionRecord {
    pub fn is_instantiation(&self) -> bool {
        self.instantiated_from.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FunctionOverloadsRegister {
    arena: Vec<FunctionRecord>,
    overload_sets: IndexMap<String, Vec<FunctionId>>,
    instantiations: IndexMap<String, FunctionId>,
    main_functions: IndexMap<String, Vec<FunctionId>>,
}

/// Overload set id: `package::name<generics>(arguments)`
pub fn overload_set_id(package: &str, function_name: &str, generics: usize, arguments: usize) -> String {
    format!("{package}::{function_name}<{generics}>({arguments})")
}

impl FunctionOverloadsRegister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn store_function_definition(&mut self, func_def: FunctionDefinition, package: &str) -> FunctionId {
        let id = FunctionId(self.arena.len());
        let arity = func_def.arguments.len();
        let generics = func_def.template_generics.len();

        let mut set_ids = vec![overload_set_id(package, &func_def.function_name, generics, arity)];
        if generics > 0 {
            set_ids.push(overload_set_id(package, &func_def.function_name, 0, arity));
        }
        for set_id in set_ids {
            tracing::trace!(target: "functions", overload_set = %set_id, function = %id, "stored overload");
            self.overload_sets.entry(set_id).or_default().push(id);
        }
        if func_def.function_name == "main" {
            self.main_functions.entry(package.to_string()).or_default().push(id);
        }

        self.arena.push(FunctionRecord {
            definition: func_def,
            package: package.to_string(),
            instantiated_from: None,
            instantiation_depth: 0,
        });
        id
    }

    /// Publish a concrete instantiation under its memoization key
    pub fn store_instantiation(
        &mut self,
        func_def: FunctionDefinition,
        package: &str,
        instantiated_from: FunctionId,
        instantiation_depth: usize,
        key: String,
    ) -> FunctionId {
        let id = FunctionId(self.arena.len());
        self.arena.push(FunctionRecord {
            definition: func_def,
            package: package.to_string(),
            instantiated_from: Some(instantiated_from),
            instantiation_depth,
        });
        self.instantiations.insert(key, id);
        id
    }

    pub fn lookup_instantiation(&self, key: &str) -> Option<FunctionId> {
        self.instantiations.get(key).copied()
    }

    /// Ids of the overload sets a call may refer to, in lookup order
    pub fn retrieve_overload_sets_ids(
        &self,
        call: &FunctionCall,
        files: &ProjectFileStructure,
    ) -> CheckResult<Vec<String>> {
        let packages = match &call.package_prefix {
            Some(prefix) => vec![prefix.clone()],
            None => files.lookup_packages(&call.debug_info.filename)?,
        };
        let arity = call.arguments.len();
        let mut generic_counts = vec![call.instantiated_generics.len()];
        if !generic_counts.contains(&0) {
            generic_counts.push(0);
        }

        let mut ids = Vec::new();
        for package in &packages {
            for generics in &generic_counts {
                let id = overload_set_id(package, &call.function_name, *generics, arity);
                if self.overload_sets.contains_key(&id) && !ids.contains(&id) {
                    ids.push(id);
                }
            }
        }
        Ok(ids)
    }

    pub fn retrieve_specific_overload_set(&self, overload_set_id: &str) -> CheckResult<&[FunctionId]> {
        self.overload_sets
            .get(overload_set_id)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                IndexingError::MissingOverloadSet {
                    overload_set_id: overload_set_id.to_string(),
                }
                .into()
            })
    }

    pub fn get_function(&self, id: FunctionId) -> CheckResult<&FunctionRecord> {
        self.arena.get(id.0).ok_or_else(|| {
            IndexingError::MissingFunction {
                function_id: id.0,
            }
            .into()
        })
    }

    pub fn ids(&self) -> impl Iterator<Item = FunctionId> {
        (0..self.arena.len()).map(FunctionId)
    }

    pub fn records(&self) -> impl Iterator<Item = (FunctionId, &FunctionRecord)> {
        self.arena
            .iter()
            .enumerate()
            .map(|(index, record)| (FunctionId(index), record))
    }

    /// `main` functions grouped by the package defining them
    pub fn main_functions(&self) -> &IndexMap<String, Vec<FunctionId>> {
        &self.main_functions
    }
}
