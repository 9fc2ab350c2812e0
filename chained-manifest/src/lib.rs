// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

//! Manifest (`chained.toml`) parsing and validation.
//!
//! The manifest describes the Java types a builder should be generated for:
//! their parameters, constructors, visibility and per-type options.

mod error;
mod manifest;

pub use error::{Error, Result};
pub use manifest::{
    ConstructorDecl, Defaults, Manifest, ParamDecl, ParseContext, RuntimeConfig, TypeDecl,
    TypeKind, Visibility, is_java_keyword,
};
