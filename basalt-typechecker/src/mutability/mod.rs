//! Immutability and bond analysis
//!
//! A `const` must never become writable. Writes can reach it directly, or
//! through a bond: a pointer or slice copied out of immutable storage into a
//! mutable variable or a (mutable) function argument.

pub mod assignment;
pub mod bond;
pub mod immutability;
pub mod observability;
pub mod validator;

pub use assignment::AssignmentImmutabilityChecker;
pub use bond::BondInspector;
pub use immutability::{ImmutabilityChecker, ImmutabilityDeducer, ImmutabilityMode};
pub use observability::ObservabilityDeducer;
pub use validator::ImmutabilityConstraintValidator;
