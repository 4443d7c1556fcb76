//! Function overloads
//!
//! Definitions live in an append-only arena addressed by `FunctionId`.
//! Overload sets group them by package, name, explicit generic count and
//! arity; resolution picks the most specific compatible member, and common
//! feature adoption dispatches over union arguments when no member fits.

pub mod adoption;
pub mod registry;
pub mod resolution;
pub mod specificity;

use std::fmt;

pub use adoption::{
    CommonFeatureAdoptionPlan, CommonFeatureAdoptionPlanDescriptor,
    CommonFeatureAdoptionPlanGenerationEngine, RecursiveAdoptionPlan,
};
pub use registry::{FunctionOverloadsRegister, FunctionRecord};
pub use resolution::{OverloadingResolutionEngine, MAX_INSTANTIATION_DEPTH};
pub use specificity::{FunctionSpecificityDescriptor, SpecificityComparison};

/// Handle of a function stored in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(pub usize);

impl FunctionId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn#{}", self.0)
    }
}
