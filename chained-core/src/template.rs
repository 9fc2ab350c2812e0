//! Builder name templates.

/// Placeholder replaced by the owning type's package.
const PKG: &str = "${pkg}";
/// Placeholder replaced by the owning type's simple name.
const SIMPLE_NAME: &str = "${simpleName}";

/// A qualified class name template such as `${pkg}.builder.${simpleName}Builder`.
///
/// Only the two placeholders `${pkg}` and `${simpleName}` are recognised, both
/// as literal substring replacements. Anything else is copied verbatim.
///
/// # Example
///
/// ```
/// use chained_core::NameTemplate;
///
/// let template = NameTemplate::new("${pkg}.builder.${simpleName}Builder");
/// assert_eq!(template.resolve("me", "Thing"), "me.builder.ThingBuilder");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTemplate(String);

impl NameTemplate {
    /// Default template for builder classes.
    pub const DEFAULT_BUILDER: &'static str = "${pkg}.builder.${simpleName}Builder";

    /// Default template for generated interface implementations.
    pub const DEFAULT_IMPLEMENTATION: &'static str = "${pkg}.builder.${simpleName}Impl";

    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitute the placeholders.
    ///
    /// When `pkg` is empty, a `${pkg}.` prefix collapses so that types in the
    /// default package do not produce a leading dot.
    pub fn resolve(&self, pkg: &str, simple_name: &str) -> String {
        let template = if pkg.is_empty() {
            self.0.replace("${pkg}.", "")
        } else {
            self.0.clone()
        };
        template.replace(PKG, pkg).replace(SIMPLE_NAME, simple_name)
    }
}

impl Default for NameTemplate {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BUILDER)
    }
}

impl From<&str> for NameTemplate {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_default() {
        let t = NameTemplate::default();
        assert_eq!(
            t.resolve("com.example", "Person"),
            "com.example.builder.PersonBuilder"
        );
    }

    #[test]
    fn test_resolve_literal() {
        let t = NameTemplate::new("me.builder.ThingBuilder");
        assert_eq!(t.resolve("me", "Thing"), "me.builder.ThingBuilder");
    }

    #[test]
    fn test_unknown_placeholder_is_literal() {
        let t = NameTemplate::new("${pkg}.${other}${simpleName}");
        assert_eq!(t.resolve("a", "B"), "a.${other}B");
    }

    #[test]
    fn test_repeated_placeholders() {
        let t = NameTemplate::new("${pkg}.${simpleName}.${simpleName}Builder");
        assert_eq!(t.resolve("a", "B"), "a.B.BBuilder");
    }

    #[test]
    fn test_default_package() {
        let t = NameTemplate::default();
        assert_eq!(t.resolve("", "Thing"), "builder.ThingBuilder");
    }
}
