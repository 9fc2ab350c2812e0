//! Core utilities for the chained builder generator.
//!
//! This crate provides the naming helpers, the builder name template and
//! source file persistence shared by the other chained crates.

mod file;
mod names;
mod template;

pub use file::{SourceFile, WriteResult};
pub use names::{package_of, simple_name, source_path, upper_first};
pub use template::NameTemplate;
