//! Validation context and utilities for manifest parsing.

use std::{collections::HashSet, sync::Arc};

use miette::SourceSpan;

use super::{ParamDecl, TypeDecl, TypeKind};
use crate::{Result, error::SourceContext};

/// Parsing and validation context that carries source information.
///
/// Carries the source content, filename, and current path through the
/// manifest so nested validation can report where a problem lives.
///
/// # Example
///
/// ```ignore
/// let ctx = ParseContext::new(src, "chained.toml");
/// ctx.validate_qualified_name("com.example.Person", "type")?;
///
/// let nested = ctx.push("com.example.Person");
/// nested.validate_name("age", "parameter")?;
/// ```
#[derive(Debug, Clone)]
pub struct ParseContext<'a> {
    /// Source context for error reporting (shared across nested contexts)
    source: Arc<SourceContext>,
    /// Path segments for nested validation
    path: Vec<&'a str>,
}

impl<'a> ParseContext<'a> {
    /// Create a new parse context with the given source and filename.
    pub fn new(src: &str, filename: &str) -> Self {
        Self {
            source: Arc::new(SourceContext::new(src, filename)),
            path: Vec::new(),
        }
    }

    /// Push a path segment and return a new context.
    pub fn push(&self, segment: &'a str) -> Self {
        let mut new_path = self.path.clone();
        new_path.push(segment);
        Self {
            source: Arc::clone(&self.source),
            path: new_path,
        }
    }

    /// Get a context description for error messages.
    ///
    /// For example: "parameter in 'com.example.Person'" or just "type" if no path.
    pub fn context_for(&self, kind: &str) -> String {
        if self.path.is_empty() {
            kind.to_string()
        } else {
            format!("{} in '{}'", kind, self.path.join("."))
        }
    }

    /// Find the span of a name in the source.
    pub fn find_span(&self, name: &str) -> Option<SourceSpan> {
        find_name_span(self.source.src(), name)
    }

    /// Validate that a name is a Java identifier and not a keyword.
    pub fn validate_name(&self, name: &str, kind: &str) -> Result<()> {
        if is_java_keyword(name) {
            return Err(self.source.reserved_keyword_error(
                name,
                self.context_for(kind),
                self.find_span(name),
            ));
        }

        if let Some(reason) = validate_identifier(name) {
            return Err(self.source.invalid_identifier_error(
                name,
                self.context_for(kind),
                reason,
                self.find_span(name),
            ));
        }

        Ok(())
    }

    /// Validate a dotted name such as `com.example.Person`.
    pub fn validate_qualified_name(&self, name: &str, kind: &str) -> Result<()> {
        if name.is_empty() {
            return Err(self.source.invalid_identifier_error(
                name,
                self.context_for(kind),
                "name cannot be empty",
                None,
            ));
        }
        for segment in name.split('.') {
            if let Some(reason) = validate_identifier(segment) {
                return Err(self.source.invalid_identifier_error(
                    name,
                    self.context_for(kind),
                    reason,
                    self.find_span(name),
                ));
            }
            if is_java_keyword(segment) {
                return Err(self.source.reserved_keyword_error(
                    segment,
                    self.context_for(kind),
                    self.find_span(name),
                ));
            }
        }
        Ok(())
    }

    /// Validate a class name template by resolving it with sample values.
    pub fn validate_template(&self, template: &str, kind: &str) -> Result<()> {
        let resolved = chained_core::NameTemplate::new(template).resolve("pkg", "Simple");
        if resolved.split('.').any(|s| validate_identifier(s).is_some()) {
            return Err(self.source.validation_error(
                format!(
                    "{} '{}' does not resolve to a qualified class name",
                    self.context_for(kind),
                    template
                ),
                self.find_span(template),
            ));
        }
        Ok(())
    }

    /// Validate one type declaration.
    pub fn validate_type(&self, name: &str, decl: &TypeDecl) -> Result<()> {
        if let Some(pkg) = &decl.package {
            if !pkg.is_empty() {
                self.validate_qualified_name(pkg, "package")?;
            }
            let prefix_ok = pkg.is_empty() || name.starts_with(&format!("{pkg}."));
            if !prefix_ok {
                return Err(self.source.validation_error(
                    format!("package '{pkg}' is not a prefix of type '{name}'"),
                    self.find_span(pkg),
                ));
            }
        }
        if let Some(builder) = &decl.builder {
            self.validate_template(builder, "builder")?;
        }
        if let Some(implementation) = &decl.implementation {
            self.validate_template(implementation, "implementation")?;
        }

        match decl.kind {
            TypeKind::Class => {
                if !decl.params.is_empty() {
                    return Err(self.source.validation_error(
                        format!("class '{name}' declares parameters through 'constructors', not 'params'"),
                        self.find_span(name),
                    ));
                }
            }
            TypeKind::Record | TypeKind::Interface => {
                if !decl.constructors.is_empty() {
                    return Err(self.source.validation_error(
                        format!(
                            "{} '{name}' declares its components through 'params', not 'constructors'",
                            decl.kind.as_str()
                        ),
                        self.find_span(name),
                    ));
                }
            }
        }

        if let Some(check) = &decl.check {
            if decl.kind != TypeKind::Interface {
                return Err(self.source.validation_error(
                    format!("'check' is only supported on interfaces, '{name}' is a {}", decl.kind.as_str()),
                    self.find_span(check),
                ));
            }
            self.validate_name(check, "check method")?;
        }

        self.validate_params(name, &decl.params)?;
        for constructor in &decl.constructors {
            self.validate_params(name, &constructor.params)?;
        }
        Ok(())
    }

    fn validate_params(&self, type_name: &str, params: &[ParamDecl]) -> Result<()> {
        let mut seen = HashSet::new();
        for param in params {
            self.validate_name(&param.name, "parameter")?;
            if let Some(accessor) = &param.accessor {
                self.validate_name(accessor, "accessor")?;
            }
            if param.ty.trim().is_empty() {
                return Err(self.source.validation_error(
                    format!("parameter '{}' of '{type_name}' has an empty type", param.name),
                    self.find_span(&param.name),
                ));
            }
            if !seen.insert(param.name.as_str()) {
                return Err(self.source.duplicate_parameter_error(
                    &param.name,
                    type_name,
                    self.find_span(&param.name),
                ));
            }
        }
        Ok(())
    }
}

/// Java reserved words and literals that cannot be used as identifiers
pub(crate) const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while", "_",
    // Literals
    "true", "false", "null",
];

/// Check if a name is a Java reserved keyword
pub fn is_java_keyword(name: &str) -> bool {
    JAVA_KEYWORDS.contains(&name)
}

/// Find the span of a name in the TOML source
///
/// Searches for `name = "value"` inline-table entries first, then any quoted
/// occurrence such as a `[types."com.example.Person"]` key.
pub(crate) fn find_name_span(src: &str, name: &str) -> Option<SourceSpan> {
    let patterns = [
        (format!("name = \"{}\"", name), 8usize),
        (format!("name=\"{}\"", name), 6usize),
        (format!("\"{}\"", name), 1usize),
        (format!("'{}'", name), 1usize),
    ];

    for (pattern, skip) in &patterns {
        if let Some(pos) = src.find(pattern.as_str()) {
            return Some(SourceSpan::from((pos + skip, name.len())));
        }
    }

    // No fallback - better to have no span than point to wrong location
    None
}

/// Validate that a name is a Java identifier
/// Returns None if valid, Some(reason) if invalid
pub(crate) fn validate_identifier(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();

    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        Some(_) => return Some("name must start with a letter, '_' or '$'"),
        None => return Some("name cannot be empty"),
    }

    if chars.any(|c| !(c.is_alphanumeric() || c == '_' || c == '$')) {
        return Some("name must contain only letters, digits, '_' and '$'");
    }

    None
}
