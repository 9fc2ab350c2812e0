//! Staged builder source generation for Java types.
//!
//! The engine turns a target type (its qualified name, parameter list and
//! construction strategy) into the source of a fluent builder class, and for
//! interface targets also into an implementation class.
//!
//! # Module Organization
//!
//! - [`TypeNode`] - syntactic parsing of generic type text
//! - [`ImportRegistry`] / [`CodeWriter`] - per-file imports and indentation
//! - [`Vocabulary`] - primitives, wrappers, container shapes and runtime class names
//! - [`Parameter`] - per-parameter absence policy
//! - [`generate_builder`] - the staged builder synthesizer
//! - [`generate_implementation`] - implementation classes for interfaces
//! - [`lower`] - manifest declarations to [`GenerationPlan`]s
//! - [`testing`] - Test utilities (feature-gated)

mod builder;
mod construction;
mod containers;
mod error;
mod implementation;
mod imports;
mod lower;
mod model;
mod type_expr;
mod vocabulary;
mod writer;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use builder::{
    BuilderOptions, BuilderRequest, BuilderShape, generate_builder, stage_name,
};
pub use construction::Construction;
pub use error::{Error, Result};
pub use implementation::{ImplementationRequest, generate_implementation};
pub use imports::ImportRegistry;
pub use lower::{
    ClaimedClasses, GenerationPlan, PlanSummary, lower, lower_type, select_constructor,
};
pub use model::{Absence, Parameter};
pub use type_expr::TypeNode;
pub use vocabulary::{ContainerKind, ContainerShape, RuntimeNames, Vocabulary};
pub use writer::CodeWriter;
