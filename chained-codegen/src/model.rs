//! Per-parameter metadata consumed by the synthesizers.

use chained_manifest::ParamDecl;
use serde::Serialize;

use crate::{Error, Result, TypeNode, Vocabulary};

/// Identifiers used by generated code that parameters may not shadow.
const RESERVED_NAMES: [&str; 3] = ["_b", "_c", "_o"];

/// How a parameter expresses an absent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Absence {
    /// Must be supplied; gets its own builder stage.
    Required,
    /// A plain type that accepts `null`.
    Nullable,
    /// An `Optional<T>`-shaped type that defaults to empty.
    Wrapped,
}

impl Absence {
    pub fn is_mandatory(&self) -> bool {
        matches!(self, Self::Required)
    }
}

/// One constructor parameter, record component or interface accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    ty: TypeNode,
    absence: Absence,
    primitive: bool,
    prerendered: bool,
    doc: Option<String>,
    accessor: Option<String>,
}

impl Parameter {
    /// Parse `ty` and classify the parameter as required or wrapped.
    ///
    /// Bare `java.util` names such as `Optional` are qualified first.
    pub fn new(name: impl Into<String>, ty: &str, vocab: &Vocabulary) -> Result<Self> {
        let ty = vocab.qualify(&TypeNode::parse(ty)?);
        let absence = if vocab.is_optional(&ty) {
            Absence::Wrapped
        } else {
            Absence::Required
        };
        Ok(Self {
            name: name.into(),
            primitive: ty.is_leaf() && vocab.is_primitive(ty.base()),
            ty,
            absence,
            prerendered: false,
            doc: None,
            accessor: None,
        })
    }

    /// A parameter whose type text is emitted verbatim.
    ///
    /// Prerendered types are never imported and never treated as wrapped or
    /// as containers.
    pub fn prerendered(name: impl Into<String>, ty: &str, vocab: &Vocabulary) -> Self {
        let ty = ty.trim();
        Self {
            name: name.into(),
            primitive: vocab.is_primitive(ty),
            ty: TypeNode::leaf(ty),
            absence: Absence::Required,
            prerendered: true,
            doc: None,
            accessor: None,
        }
    }

    /// Build a parameter from its manifest declaration.
    pub fn from_decl(decl: &ParamDecl, vocab: &Vocabulary) -> Result<Self> {
        let param = if decl.prerendered {
            Self::prerendered(&decl.name, &decl.ty, vocab)
        } else {
            Self::new(&decl.name, &decl.ty, vocab)?
        };
        let param = param.nullable(decl.nullable);
        let param = match &decl.doc {
            Some(doc) => param.with_doc(doc),
            None => param,
        };
        Ok(match &decl.accessor {
            Some(accessor) => param.with_accessor(accessor),
            None => param,
        })
    }

    /// Mark the parameter as accepting `null`.
    ///
    /// Wrapped parameters stay wrapped: the wrapper already encodes absence.
    pub fn nullable(mut self, nullable: bool) -> Self {
        if nullable && self.absence == Absence::Required {
            self.absence = Absence::Nullable;
        }
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_accessor(mut self, accessor: impl Into<String>) -> Self {
        self.accessor = Some(accessor.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeNode {
        &self.ty
    }

    pub fn absence(&self) -> Absence {
        self.absence
    }

    pub fn is_mandatory(&self) -> bool {
        self.absence.is_mandatory()
    }

    pub fn is_wrapped(&self) -> bool {
        self.absence == Absence::Wrapped
    }

    pub fn is_nullable(&self) -> bool {
        self.absence == Absence::Nullable
    }

    pub fn is_primitive(&self) -> bool {
        self.primitive
    }

    pub fn is_prerendered(&self) -> bool {
        self.prerendered
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    /// Accessor read by the copy builder.
    pub fn accessor(&self) -> &str {
        self.accessor.as_deref().unwrap_or(&self.name)
    }

    /// Type carried inside the wrapper of a wrapped parameter.
    pub fn wrapped_inner(&self) -> Option<&TypeNode> {
        if self.is_wrapped() {
            self.ty.args().first()
        } else {
            None
        }
    }

    /// Whether setters must reject `null`.
    pub fn needs_null_check(&self) -> bool {
        !self.primitive && !self.is_nullable()
    }
}

/// Reject parameter lists the generated code could not compile.
pub(crate) fn check_parameters(params: &[Parameter]) -> Result<()> {
    for (i, p) in params.iter().enumerate() {
        if RESERVED_NAMES.contains(&p.name()) {
            return Err(Error::InvalidParameter {
                name: p.name().to_string(),
                reason: "the name is reserved for generated code".into(),
            });
        }
        if params[..i].iter().any(|q| q.name() == p.name()) {
            return Err(Error::InvalidParameter {
                name: p.name().to_string(),
                reason: "declared more than once".into(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::java()
    }

    #[test]
    fn test_required_by_default() {
        let p = Parameter::new("name", "java.lang.String", &vocab()).unwrap();
        assert_eq!(p.absence(), Absence::Required);
        assert!(p.needs_null_check());
    }

    #[test]
    fn test_optional_is_wrapped() {
        let p = Parameter::new("age", "java.util.Optional<java.lang.Integer>", &vocab()).unwrap();
        assert!(p.is_wrapped());
        assert_eq!(p.wrapped_inner().unwrap().base(), "java.lang.Integer");
    }

    #[test]
    fn test_bare_optional_is_qualified() {
        let p = Parameter::new("age", "Optional<Integer>", &vocab()).unwrap();
        assert!(p.is_wrapped());
        assert_eq!(p.ty().base(), "java.util.Optional");
    }

    #[test]
    fn test_wrapped_wins_over_nullable() {
        let p = Parameter::new("age", "java.util.Optional<java.lang.Integer>", &vocab())
            .unwrap()
            .nullable(true);
        assert!(p.is_wrapped());
        assert!(p.needs_null_check());
    }

    #[test]
    fn test_nullable_skips_null_check() {
        let p = Parameter::new("nick", "java.lang.String", &vocab())
            .unwrap()
            .nullable(true);
        assert_eq!(p.absence(), Absence::Nullable);
        assert!(!p.needs_null_check());
    }

    #[test]
    fn test_primitive_skips_null_check() {
        let p = Parameter::new("count", "int", &vocab()).unwrap();
        assert!(p.is_primitive());
        assert!(!p.needs_null_check());
    }

    #[test]
    fn test_malformed_type_propagates() {
        assert!(matches!(
            Parameter::new("x", "java.util.List<String", &vocab()),
            Err(Error::MalformedType { .. })
        ));
    }

    #[test]
    fn test_prerendered_is_never_wrapped() {
        let p = Parameter::prerendered("x", "Optional<Foo>", &vocab());
        assert!(p.is_mandatory());
        assert!(p.is_prerendered());
        assert_eq!(p.ty().base(), "Optional<Foo>");
    }

    #[test]
    fn test_from_decl() {
        let mut decl = ParamDecl::new("tags", "java.util.List<java.lang.String>");
        decl.nullable = true;
        decl.doc = Some("the tags".into());
        decl.accessor = Some("getTags".into());
        let p = Parameter::from_decl(&decl, &vocab()).unwrap();
        assert!(p.is_nullable());
        assert_eq!(p.doc(), Some("the tags"));
        assert_eq!(p.accessor(), "getTags");
    }

    #[test]
    fn test_accessor_defaults_to_name() {
        let p = Parameter::new("name", "java.lang.String", &vocab()).unwrap();
        assert_eq!(p.accessor(), "name");
    }

    #[test]
    fn test_check_parameters() {
        let v = vocab();
        let ok = [
            Parameter::new("a", "int", &v).unwrap(),
            Parameter::new("b", "int", &v).unwrap(),
        ];
        assert!(check_parameters(&ok).is_ok());

        let reserved = [Parameter::new("_b", "int", &v).unwrap()];
        assert!(check_parameters(&reserved).is_err());

        let duplicate = [
            Parameter::new("a", "int", &v).unwrap(),
            Parameter::new("a", "long", &v).unwrap(),
        ];
        assert!(check_parameters(&duplicate).is_err());
    }
}
