//! Common feature adoption
//!
//! A call with union-typed arguments that no overload accepts directly can
//! still be valid when every alternative of the union has a matching
//! overload. The plan records which argument is expanded and, per
//! alternative, either the overload to call or a deeper expansion.

use super::resolution::OverloadingResolutionEngine;
use super::FunctionId;
use crate::error::{to_source_span, CheckResult, CompilationError, ValidationError};
use crate::program::ProgramRepresentation;
use basalt_parser::{DebugInfo, FunctionCall, TypeSignature};

#[derive(Debug, Clone, PartialEq)]
pub enum CommonFeatureAdoptionPlan {
    DirectAdoption(FunctionId),
    RecursiveAdoption(RecursiveAdoptionPlan),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecursiveAdoptionPlan {
    pub argument_index: usize,
    pub alternatives: Vec<TypeSignature>,
    /// One plan per alternative, in the same order
    pub nested_plans: Vec<CommonFeatureAdoptionPlan>,
}

impl CommonFeatureAdoptionPlan {
    /// Every function the plan may dispatch to, in plan order
    pub fn leaves(&self) -> Vec<FunctionId> {
        match self {
            CommonFeatureAdoptionPlan::DirectAdoption(id) => vec![*id],
            CommonFeatureAdoptionPlan::RecursiveAdoption(plan) => plan
                .nested_plans
                .iter()
                .flat_map(CommonFeatureAdoptionPlan::leaves)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommonFeatureAdoptionPlanDescriptor {
    pub function_name: String,
    pub arg_types: Vec<TypeSignature>,
    pub return_type: Option<TypeSignature>,
    pub debug_info: DebugInfo,
    pub plan: CommonFeatureAdoptionPlan,
}

pub struct CommonFeatureAdoptionPlanGenerationEngine<'p> {
    program: &'p mut ProgramRepresentation,
}

impl<'p> CommonFeatureAdoptionPlanGenerationEngine<'p> {
    pub fn new(program: &'p mut ProgramRepresentation) -> Self {
        Self { program }
    }

    pub fn generate_common_feature_adoption_plan_descriptor(
        &mut self,
        call: &FunctionCall,
        argument_types: &[TypeSignature],
    ) -> CheckResult<CommonFeatureAdoptionPlanDescriptor> {
        let cache_key = self.cache_key(call, argument_types)?;
        if let Some(cached) = self.program.adoption_cache.get(&cache_key) {
            tracing::trace!(target: "adoption", key = %cache_key, "adoption plan cache hit");
            return Ok(cached.clone());
        }

        let plan = self.generate_plan(call, argument_types, 0)?;
        let return_type = self.deduce_return_type(&plan, call)?;
        let descriptor = CommonFeatureAdoptionPlanDescriptor {
            function_name: call.function_name.clone(),
            arg_types: argument_types.to_vec(),
            return_type,
            debug_info: call.debug_info.clone(),
            plan,
        };

        tracing::debug!(
            target: "adoption",
            function = %call.function_name,
            leaves = descriptor.plan.leaves().len(),
            "generated adoption plan"
        );
        self.program.adoption_cache.insert(cache_key, descriptor.clone());
        Ok(descriptor)
    }

    fn cache_key(&mut self, call: &FunctionCall, argument_types: &[TypeSignature]) -> CheckResult<String> {
        let program = &mut *self.program;
        let arguments = argument_types
            .iter()
            .map(|argument| program.types.qualified_signature(argument, &program.files))
            .collect::<CheckResult<Vec<_>>>()?;
        Ok(format!(
            "{}|{}|{}({})",
            call.debug_info.filename,
            call.package_prefix.as_deref().unwrap_or(""),
            call.function_name,
            arguments.join(",")
        ))
    }

    /// Expand the first union argument at or after `start`
    fn generate_plan(
        &mut self,
        call: &FunctionCall,
        argument_types: &[TypeSignature],
        start: usize,
    ) -> CheckResult<CommonFeatureAdoptionPlan> {
        for argument_index in start..argument_types.len() {
            let program = &mut *self.program;
            let alternatives = program
                .types
                .fetch_union_alternatives(&argument_types[argument_index], &program.files)?;
            if alternatives.is_empty() {
                continue;
            }

            let mut nested_plans = Vec::with_capacity(alternatives.len());
            for alternative in &alternatives {
                let mut expanded = argument_types.to_vec();
                expanded[argument_index] = alternative.clone();
                nested_plans.push(self.adopt(call, &expanded, argument_index)?);
            }
            return Ok(CommonFeatureAdoptionPlan::RecursiveAdoption(RecursiveAdoptionPlan {
                argument_index,
                alternatives,
                nested_plans,
            }));
        }

        Err(failed_adoption(
            call,
            format!("no overload accepts ({})", display_types(argument_types)),
        ))
    }

    fn adopt(
        &mut self,
        call: &FunctionCall,
        argument_types: &[TypeSignature],
        argument_index: usize,
    ) -> CheckResult<CommonFeatureAdoptionPlan> {
        if let Some(id) = OverloadingResolutionEngine::new(&mut *self.program).resolve(call, argument_types)? {
            return Ok(CommonFeatureAdoptionPlan::DirectAdoption(id));
        }
        self.generate_plan(call, argument_types, argument_index)
    }

    /// Union of the leaves' return types; all or none must return a value
    fn deduce_return_type(
        &self,
        plan: &CommonFeatureAdoptionPlan,
        call: &FunctionCall,
    ) -> CheckResult<Option<TypeSignature>> {
        let mut returned = Vec::new();
        let mut void_leaves = 0;
        for id in plan.leaves() {
            match &self.program.functions.get_function(id)?.definition.return_type {
                Some(return_type) => {
                    if !returned.contains(return_type) {
                        returned.push(return_type.clone());
                    }
                }
                None => void_leaves += 1,
            }
        }

        match (returned.len(), void_leaves) {
            (0, _) => Ok(None),
            (_, 0) if returned.len() == 1 => Ok(returned.pop()),
            (_, 0) => Ok(Some(TypeSignature::inline_union(returned))),
            _ => Err(failed_adoption(
                call,
                "the adopted overloads mix functions with and without a return value".to_string(),
            )),
        }
    }
}

fn failed_adoption(call: &FunctionCall, reason: String) -> CompilationError {
    ValidationError::FailedAdoption {
        function_name: call.function_name.clone(),
        reason,
        debug_info: call.debug_info.clone(),
        span: to_source_span(&call.debug_info),
    }
    .into()
}

fn display_types(types: &[TypeSignature]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
