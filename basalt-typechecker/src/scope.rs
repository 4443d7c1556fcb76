//! Lexical scopes of a function body
//!
//! An explicit stack of frames. Lookups fall through to outer frames, and a
//! name visible in any frame cannot be declared again.

use crate::error::{CheckResult, ValidationError};
use basalt_parser::{DebugInfo, FunctionDefinition, TypeSignature};
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ScopeEntry {
    pub unique_id: usize,
    pub identifier: String,
    pub typesignature: TypeSignature,
    pub is_const: bool,
    pub is_arg: bool,
    pub was_read: bool,
    pub was_written: bool,
    pub debug_info: DebugInfo,
}

#[derive(Debug, Clone)]
pub struct ScopeContext {
    frames: Vec<IndexMap<String, ScopeEntry>>,
    /// Entries of frames that were already popped
    retired: Vec<ScopeEntry>,
    next_id: usize,
}

impl Default for ScopeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeContext {
    pub fn new() -> Self {
        Self {
            frames: vec![IndexMap::new()],
            retired: Vec::new(),
            next_id: 0,
        }
    }

    /// Scope seeded with the arguments of a function
    pub fn from_function(func_def: &FunctionDefinition) -> CheckResult<Self> {
        let mut scope = Self::new();
        for argument in &func_def.arguments {
            scope.store_argument(&argument.arg_name, argument.arg_type.clone(), &func_def.debug_info)?;
        }
        Ok(scope)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn push_frame(&mut self) {
        self.frames.push(IndexMap::new());
    }

    pub fn pop_frame(&mut self) -> CheckResult<()> {
        crate::assert_internal!(self.frames.len() > 1, "attempted to pop the outermost scope frame");
        if let Some(frame) = self.frames.pop() {
            self.retired.extend(frame.into_values());
        }
        Ok(())
    }

    /// Run `body` inside a fresh frame
    pub fn nested<T>(&mut self, body: impl FnOnce(&mut Self) -> T) -> T {
        self.push_frame();
        let result = body(self);
        if let Some(frame) = self.frames.pop() {
            self.retired.extend(frame.into_values());
        }
        result
    }

    pub fn store_local_variable(
        &mut self,
        identifier: &str,
        typesignature: TypeSignature,
        debug_info: &DebugInfo,
    ) -> CheckResult<()> {
        self.store(identifier, typesignature, false, false, debug_info)
    }

    pub fn store_local_constant(
        &mut self,
        identifier: &str,
        typesignature: TypeSignature,
        debug_info: &DebugInfo,
    ) -> CheckResult<()> {
        self.store(identifier, typesignature, true, false, debug_info)
    }

    pub fn store_argument(
        &mut self,
        identifier: &str,
        typesignature: TypeSignature,
        debug_info: &DebugInfo,
    ) -> CheckResult<()> {
        self.store(identifier, typesignature, false, true, debug_info)
    }

    fn store(
        &mut self,
        identifier: &str,
        typesignature: TypeSignature,
        is_const: bool,
        is_arg: bool,
        debug_info: &DebugInfo,
    ) -> CheckResult<()> {
        if self.resolve_object(identifier).is_some() {
            return Err(ValidationError::identifier_already_declared(identifier, debug_info).into());
        }
        let entry = ScopeEntry {
            unique_id: self.next_id,
            identifier: identifier.to_string(),
            typesignature,
            is_const,
            is_arg,
            was_read: false,
            was_written: false,
            debug_info: debug_info.clone(),
        };
        self.next_id += 1;
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(identifier.to_string(), entry);
        }
        Ok(())
    }

    pub fn resolve_object(&self, identifier: &str) -> Option<&ScopeEntry> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(identifier))
    }

    fn resolve_object_mut(&mut self, identifier: &str) -> Option<&mut ScopeEntry> {
        self.frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.get_mut(identifier))
    }

    pub fn get_local_object_type(&self, identifier: &str) -> Option<&TypeSignature> {
        self.resolve_object(identifier).map(|entry| &entry.typesignature)
    }

    /// `None` when the identifier is not in scope
    pub fn is_identifier_immutable(&self, identifier: &str) -> Option<bool> {
        self.resolve_object(identifier).map(|entry| entry.is_const)
    }

    pub fn mark_read(&mut self, identifier: &str) -> bool {
        match self.resolve_object_mut(identifier) {
            Some(entry) => {
                entry.was_read = true;
                true
            }
            None => false,
        }
    }

    pub fn mark_written(&mut self, identifier: &str) -> bool {
        match self.resolve_object_mut(identifier) {
            Some(entry) => {
                entry.was_written = true;
                true
            }
            None => false,
        }
    }

    /// Every entry ever stored, popped frames included, in declaration order
    pub fn entries(&self) -> Vec<&ScopeEntry> {
        let mut entries: Vec<&ScopeEntry> = self
            .retired
            .iter()
            .chain(self.frames.iter().flat_map(|frame| frame.values()))
            .collect();
        entries.sort_by_key(|entry| entry.unique_id);
        entries
    }
}
