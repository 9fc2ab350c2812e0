//! Manifest types and parsing for chained.toml files.

mod parse;
mod validate;

use chained_core::{NameTemplate, package_of};
use indexmap::IndexMap;
use serde::Deserialize;
pub use validate::{ParseContext, is_java_keyword};

/// Root manifest for chained.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Options applied to every type unless overridden
    #[serde(default)]
    pub defaults: Defaults,

    /// Overrides for the runtime support classes referenced by generated code
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Target types keyed by qualified name, in manifest order
    #[serde(default)]
    pub types: IndexMap<String, TypeDecl>,
}

/// Workspace-wide generation defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    /// Builder class name template
    #[serde(default = "default_builder")]
    pub builder: String,

    /// Implementation class name template (interface targets)
    #[serde(default = "default_implementation")]
    pub implementation: String,

    /// Keep a separate `build()` after the last mandatory setter
    #[serde(default)]
    pub always_include_build_method: bool,

    /// Emit a `copy(instance)` builder
    #[serde(default = "default_true")]
    pub copy: bool,
}

fn default_builder() -> String {
    NameTemplate::DEFAULT_BUILDER.to_string()
}

fn default_implementation() -> String {
    NameTemplate::DEFAULT_IMPLEMENTATION.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            builder: default_builder(),
            implementation: default_implementation(),
            always_include_build_method: false,
            copy: true,
        }
    }
}

/// Qualified names of the runtime classes generated code depends on.
///
/// Unset entries fall back to the chained runtime library.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    pub preconditions: Option<String>,
    pub helpers: Option<String>,
    pub list_builder: Option<String>,
    pub set_builder: Option<String>,
    pub map_builder: Option<String>,
    pub generated: Option<String>,
    pub nonnull: Option<String>,
    pub nullable: Option<String>,
    /// Value written into the `@Generated` annotation
    pub generator: Option<String>,
}

/// Shape of the target type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Record,
    Interface,
}

impl TypeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Record => "record",
            Self::Interface => "interface",
        }
    }
}

/// Java access level of a constructor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Package => "package",
            Self::Private => "private",
        }
    }
}

/// One target type
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDecl {
    #[serde(default)]
    pub kind: TypeKind,

    /// Visibility of the canonical constructor (records)
    #[serde(default)]
    pub visibility: Visibility,

    /// Explicit package, required for member types
    pub package: Option<String>,

    /// Builder class name template, overriding the default
    pub builder: Option<String>,

    /// Implementation class name template, overriding the default
    pub implementation: Option<String>,

    pub always_include_build_method: Option<bool>,

    pub copy: Option<bool>,

    /// Zero-argument check method run after implementation construction
    pub check: Option<String>,

    /// Record components or interface accessors
    #[serde(default)]
    pub params: Vec<ParamDecl>,

    /// Class constructors
    #[serde(default)]
    pub constructors: Vec<ConstructorDecl>,
}

impl TypeDecl {
    /// Package of the type named `name`
    pub fn package<'a>(&'a self, name: &'a str) -> &'a str {
        self.package.as_deref().unwrap_or_else(|| package_of(name))
    }
}

/// A class constructor
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstructorDecl {
    #[serde(default)]
    pub visibility: Visibility,

    /// Explicitly designated for builder generation
    #[serde(default)]
    pub designated: bool,

    #[serde(default)]
    pub params: Vec<ParamDecl>,
}

/// A constructor parameter, record component or interface accessor
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamDecl {
    pub name: String,

    /// Declared type, e.g. `java.util.Optional<java.lang.Integer>`
    #[serde(rename = "type")]
    pub ty: String,

    #[serde(default)]
    pub nullable: bool,

    pub doc: Option<String>,

    /// Type text is emitted verbatim instead of being imported
    #[serde(default)]
    pub prerendered: bool,

    /// Accessor read by the copy builder (defaults to the parameter name)
    pub accessor: Option<String>,
}

impl ParamDecl {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            ..Self::default()
        }
    }
}
