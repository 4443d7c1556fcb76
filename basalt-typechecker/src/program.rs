//! Program representation
//!
//! `ProjectFileStructure` indexes the parsed files by package, and
//! `ProgramRepresentation` owns every register the validation passes share.

use crate::assert_internal;
use crate::config::CheckerConfig;
use crate::error::{CheckResult, CompilationError, IndexingError};
use crate::functions::{
    CommonFeatureAdoptionPlan, CommonFeatureAdoptionPlanDescriptor, FunctionId,
    FunctionOverloadsRegister, FunctionRecord,
};
use crate::registry::TypeDefinitionsRegister;
use basalt_parser::{CustomType, DebugInfo, FileRepresentation, TypeDefinition, TypeSignature};
use indexmap::IndexMap;

/// Parsed files grouped by package
#[derive(Debug, Clone, Default)]
pub struct ProjectFileStructure {
    files: IndexMap<String, FileRepresentation>,
    files_by_package: IndexMap<String, Vec<String>>,
    package_by_file: IndexMap<String, String>,
    imports_by_file: IndexMap<String, Vec<String>>,
}

impl ProjectFileStructure {
    /// Index the files; every filename must be unique
    pub fn new(files: Vec<FileRepresentation>) -> CheckResult<Self> {
        let mut structure = Self::default();
        for file in files {
            assert_internal!(
                !structure.files.contains_key(&file.filename),
                "file `{}` was handed over twice",
                file.filename
            );
            structure
                .files_by_package
                .entry(file.package_name.clone())
                .or_default()
                .push(file.filename.clone());
            structure
                .package_by_file
                .insert(file.filename.clone(), file.package_name.clone());
            structure
                .imports_by_file
                .insert(file.filename.clone(), file.imports.clone());
            structure.files.insert(file.filename.clone(), file);
        }
        Ok(structure)
    }

    pub fn get_file(&self, filename: &str) -> CheckResult<&FileRepresentation> {
        self.files.get(filename).ok_or_else(|| missing_file(filename))
    }

    pub fn package_of(&self, filename: &str) -> CheckResult<&str> {
        self.package_by_file
            .get(filename)
            .map(String::as_str)
            .ok_or_else(|| missing_file(filename))
    }

    pub fn imports_of(&self, filename: &str) -> CheckResult<&[String]> {
        self.imports_by_file
            .get(filename)
            .map(Vec::as_slice)
            .ok_or_else(|| missing_file(filename))
    }

    pub fn files_of_package(&self, package: &str) -> CheckResult<&[String]> {
        self.files_by_package
            .get(package)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                IndexingError::MissingPackage {
                    package: package.to_string(),
                }
                .into()
            })
    }

    pub fn has_package(&self, package: &str) -> bool {
        self.files_by_package.contains_key(package)
    }

    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.files_by_package.keys().map(String::as_str)
    }

    pub fn files(&self) -> impl Iterator<Item = &FileRepresentation> {
        self.files.values()
    }

    /// Packages searched for an unqualified name used in `filename`: its own
    /// package first, then its imports in declaration order
    pub fn lookup_packages(&self, filename: &str) -> CheckResult<Vec<String>> {
        let mut packages = vec![self.package_of(filename)?.to_string()];
        for import in self.imports_of(filename)? {
            if !packages.contains(import) {
                packages.push(import.clone());
            }
        }
        Ok(packages)
    }
}

fn missing_file(filename: &str) -> CompilationError {
    IndexingError::MissingFile {
        filename: filename.to_string(),
    }
    .into()
}

/// How a call site was bound
#[derive(Debug, Clone, PartialEq)]
pub enum CallResolution {
    /// A single concrete overload
    Direct(FunctionId),
    /// Dispatch over the alternatives of union arguments
    Adoption(CommonFeatureAdoptionPlan),
}

/// A node inside a concrete function body
pub type SiteKey = (FunctionId, DebugInfo);

/// Everything the validation passes share
#[derive(Debug)]
pub struct ProgramRepresentation {
    pub(crate) files: ProjectFileStructure,
    pub(crate) types: TypeDefinitionsRegister,
    pub(crate) functions: FunctionOverloadsRegister,
    pub(crate) config: CheckerConfig,
    pub(crate) resolution_cache: IndexMap<String, Option<FunctionId>>,
    pub(crate) adoption_cache: IndexMap<String, CommonFeatureAdoptionPlanDescriptor>,
    pub(crate) call_resolutions: IndexMap<SiteKey, CallResolution>,
    pub(crate) expression_types: IndexMap<SiteKey, TypeSignature>,
    /// Function whose body is being validated
    pub(crate) current_function: Option<FunctionId>,
}

impl ProgramRepresentation {
    /// Index the files and store every type and function definition
    ///
    /// Duplicate type definitions are collected and returned together.
    pub fn new(
        files: Vec<FileRepresentation>,
        config: CheckerConfig,
    ) -> Result<Self, Vec<CompilationError>> {
        let files = ProjectFileStructure::new(files).map_err(|error| vec![error])?;
        let mut types = TypeDefinitionsRegister::new();
        let mut functions = FunctionOverloadsRegister::new();
        let mut errors = Vec::new();

        for file in files.files() {
            for type_def in &file.type_defs {
                if let Err(error) = types.store_type_definition(type_def.clone(), &file.package_name) {
                    errors.push(error);
                }
            }
            for func_def in &file.func_defs {
                functions.store_function_definition(func_def.clone(), &file.package_name);
            }
        }

        tracing::debug!(
            target: "program",
            files = files.files().count(),
            type_definitions = types.len(),
            functions = functions.len(),
            "program indexed"
        );

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            files,
            types,
            functions,
            config,
            resolution_cache: IndexMap::new(),
            adoption_cache: IndexMap::new(),
            call_resolutions: IndexMap::new(),
            expression_types: IndexMap::new(),
            current_function: None,
        })
    }

    pub fn files(&self) -> &ProjectFileStructure {
        &self.files
    }

    pub fn types(&self) -> &TypeDefinitionsRegister {
        &self.types
    }

    pub fn functions(&self) -> &FunctionOverloadsRegister {
        &self.functions
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    pub fn function(&self, id: FunctionId) -> CheckResult<&FunctionRecord> {
        self.functions.get_function(id)
    }

    pub fn retrieve_type_definition(&mut self, custom_type: &CustomType) -> CheckResult<TypeDefinition> {
        self.types.retrieve_type_definition(custom_type, &self.files)
    }

    pub fn unalias_type(&mut self, type_signature: &TypeSignature) -> CheckResult<TypeSignature> {
        self.types.unalias_type(type_signature, &self.files)
    }

    pub fn verify_that_the_type_exists(&mut self, type_signature: &TypeSignature) -> CheckResult<()> {
        self.types.verify_that_the_type_exists(type_signature, &self.files)
    }

    pub fn qualified_signature(&mut self, type_signature: &TypeSignature) -> CheckResult<String> {
        self.types.qualified_signature(type_signature, &self.files)
    }

    /// Bind a call site of the function being validated
    pub(crate) fn record_call_resolution(&mut self, debug_info: &DebugInfo, resolution: CallResolution) {
        if let Some(function) = self.current_function {
            self.call_resolutions
                .insert((function, debug_info.clone()), resolution);
        }
    }

    pub(crate) fn record_expression_type(&mut self, debug_info: &DebugInfo, type_signature: &TypeSignature) {
        if let Some(function) = self.current_function {
            self.expression_types
                .insert((function, debug_info.clone()), type_signature.clone());
        }
    }
}
