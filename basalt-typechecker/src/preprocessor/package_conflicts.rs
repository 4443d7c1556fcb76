//! Type name conflicts across packages
//!
//! A type name (at a given arity) must be unambiguous from every package:
//! no two definitions reachable through the package itself and its
//! transitive imports may share it.

use crate::error::{to_source_span, CompilationError, IndexingError, ValidationError};
use crate::program::ProgramRepresentation;
use basalt_parser::DebugInfo;
use indexmap::{IndexMap, IndexSet};
use petgraph::graph::NodeIndex;
use petgraph::visit::Dfs;
use petgraph::{algo, Graph as PetGraph};

pub struct PackageTypeConflictNavigator<'p> {
    program: &'p ProgramRepresentation,
    /// Package import graph, edges point from importer to imported
    graph: PetGraph<String, ()>,
    package_to_node: IndexMap<String, NodeIndex>,
}

impl<'p> PackageTypeConflictNavigator<'p> {
    pub fn new(program: &'p ProgramRepresentation) -> Self {
        let mut graph = PetGraph::new();
        let mut package_to_node = IndexMap::new();
        for package in program.files().packages() {
            let node = graph.add_node(package.to_string());
            package_to_node.insert(package.to_string(), node);
        }
        Self {
            program,
            graph,
            package_to_node,
        }
    }

    pub fn visit_all_packages(mut self) -> Vec<CompilationError> {
        let mut errors = self.link_imports();

        if algo::is_cyclic_directed(&self.graph) {
            tracing::debug!(target: "packages", "package import graph contains cycles");
        }

        let mut reported: IndexSet<(DebugInfo, DebugInfo)> = IndexSet::new();
        let packages: Vec<(String, NodeIndex)> = self
            .package_to_node
            .iter()
            .map(|(package, node)| (package.clone(), *node))
            .collect();
        for (package, node) in packages {
            for (type_name, other, debug_info) in self.conflicts_visible_from(node) {
                let mirrored = (debug_info.clone(), other.clone());
                if reported.contains(&mirrored) || !reported.insert((other.clone(), debug_info.clone())) {
                    continue;
                }
                errors.push(
                    ValidationError::ConflictingTypeDefinitions {
                        type_name,
                        package: package.clone(),
                        other,
                        span: to_source_span(&debug_info),
                        debug_info,
                    }
                    .into(),
                );
            }
        }

        tracing::debug!(
            target: "packages",
            packages = self.package_to_node.len(),
            errors = errors.len(),
            "package type conflicts checked"
        );
        errors
    }

    fn link_imports(&mut self) -> Vec<CompilationError> {
        let mut errors = Vec::new();
        for file in self.program.files().files() {
            let Some(importer) = self.package_to_node.get(&file.package_name).copied() else {
                continue;
            };
            for import in &file.imports {
                match self.package_to_node.get(import) {
                    Some(imported) => {
                        if self.graph.find_edge(importer, *imported).is_none() {
                            self.graph.add_edge(importer, *imported, ());
                        }
                    }
                    None => errors.push(
                        IndexingError::MissingPackage {
                            package: import.clone(),
                        }
                        .into(),
                    ),
                }
            }
        }
        errors
    }

    /// `(type pattern, first definition, conflicting definition)` triples
    fn conflicts_visible_from(&self, node: NodeIndex) -> Vec<(String, DebugInfo, DebugInfo)> {
        let files = self.program.files();
        let mut visited_files = IndexSet::new();
        let mut seen: IndexMap<String, DebugInfo> = IndexMap::new();
        let mut conflicts = Vec::new();

        let mut dfs = Dfs::new(&self.graph, node);
        while let Some(reachable) = dfs.next(&self.graph) {
            let Ok(filenames) = files.files_of_package(&self.graph[reachable]) else {
                continue;
            };
            for filename in filenames {
                if !visited_files.insert(filename.clone()) {
                    continue;
                }
                let Ok(file) = files.get_file(filename) else {
                    continue;
                };
                for type_def in &file.type_defs {
                    let pattern = type_def.match_pattern();
                    match seen.get(&pattern) {
                        Some(first) if first != type_def.debug_info() => {
                            conflicts.push((pattern, first.clone(), type_def.debug_info().clone()));
                        }
                        Some(_) => {}
                        None => {
                            seen.insert(pattern, type_def.debug_info().clone());
                        }
                    }
                }
            }
        }
        conflicts
    }
}
