//! Import registry for one generated compilation unit.

use std::collections::{BTreeMap, HashSet};

use chained_core::{package_of, simple_name};

use crate::TypeNode;

const WILDCARD_PREFIXES: [&str; 2] = ["? extends ", "? super "];

/// Assigns display names to qualified class names for a single file.
///
/// The first qualified name to claim a simple name gets the short form and an
/// import; later names with the same simple name stay fully qualified. Once
/// assigned, a display name never changes for the lifetime of the registry.
///
/// # Example
///
/// ```
/// use chained_codegen::ImportRegistry;
///
/// let mut imports = ImportRegistry::new("me.builder.ThingBuilder");
/// assert_eq!(imports.register("java.util.List"), "List");
/// assert_eq!(imports.register("java.awt.List"), "java.awt.List");
/// assert_eq!(imports.to_code(), "import java.util.List;\n");
/// ```
#[derive(Debug, Clone)]
pub struct ImportRegistry {
    package: String,
    /// Qualified name -> display name, ordered for deterministic output
    entries: BTreeMap<String, String>,
    claimed: HashSet<String>,
}

impl ImportRegistry {
    /// Create a registry owned by the class `owner`.
    ///
    /// The owner's simple name is claimed up front.
    pub fn new(owner: &str) -> Self {
        let mut registry = Self {
            package: package_of(owner).to_string(),
            entries: BTreeMap::new(),
            claimed: HashSet::new(),
        };
        registry.reserve(simple_name(owner));
        registry
    }

    /// Claim a simple name declared by the file itself, such as a nested class.
    pub fn reserve(&mut self, simple: &str) {
        self.claimed.insert(simple.to_string());
    }

    /// Register a class reference and return the text to emit for it.
    ///
    /// Wildcard bounds (`? extends X`) and array suffixes (`X[]`, `X...`) are
    /// preserved around the registered name.
    pub fn register(&mut self, reference: &str) -> String {
        let (prefix, rest) = split_wildcard(reference.trim());
        let (core, suffix) = split_array_suffix(rest);
        format!("{prefix}{}{suffix}", self.register_class(core))
    }

    /// Render a type expression, registering every class it references.
    pub fn render(&mut self, node: &TypeNode) -> String {
        node.render_with(&mut |base| self.register(base))
    }

    fn register_class(&mut self, qualified: &str) -> String {
        if let Some(display) = self.entries.get(qualified) {
            return display.clone();
        }
        if !qualified.contains('.') {
            // Primitives, type variables and unqualified names are emitted as written.
            self.claimed.insert(qualified.to_string());
            return qualified.to_string();
        }

        let simple = simple_name(qualified);
        let display = if self.claimed.contains(simple) {
            tracing::debug!(
                class = qualified,
                simple,
                "simple name already claimed, keeping qualified name"
            );
            qualified.to_string()
        } else {
            self.claimed.insert(simple.to_string());
            simple.to_string()
        };
        self.entries.insert(qualified.to_string(), display.clone());
        display
    }

    /// Import statements for every short-named class outside the owning
    /// package and `java.lang`, sorted by qualified name.
    pub fn to_code(&self) -> String {
        let mut code = String::new();
        for (qualified, display) in &self.entries {
            if qualified == display || !self.needs_import(qualified) {
                continue;
            }
            code.push_str("import ");
            code.push_str(qualified);
            code.push_str(";\n");
        }
        code
    }

    fn needs_import(&self, qualified: &str) -> bool {
        let package = package_of(qualified);
        package != self.package && package != "java.lang"
    }
}

fn split_wildcard(s: &str) -> (&str, &str) {
    for prefix in WILDCARD_PREFIXES {
        if let Some(rest) = s.strip_prefix(prefix) {
            return (prefix, rest.trim_start());
        }
    }
    ("", s)
}

fn split_array_suffix(s: &str) -> (&str, &str) {
    let mut core = s;
    while let Some(rest) = core.strip_suffix("[]").or_else(|| core.strip_suffix("...")) {
        core = rest;
    }
    (core, &s[core.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent() {
        let mut imports = ImportRegistry::new("a.Owner");
        assert_eq!(imports.register("java.util.List"), "List");
        assert_eq!(imports.register("java.util.List"), "List");
        assert_eq!(imports.to_code(), "import java.util.List;\n");
    }

    #[test]
    fn test_collision_keeps_qualified_name() {
        let mut imports = ImportRegistry::new("a.Owner");
        assert_eq!(imports.register("java.util.List"), "List");
        assert_eq!(imports.register("java.awt.List"), "java.awt.List");
        assert_eq!(imports.register("java.awt.List"), "java.awt.List");
        assert_eq!(imports.to_code(), "import java.util.List;\n");
    }

    #[test]
    fn test_owner_name_is_reserved() {
        let mut imports = ImportRegistry::new("me.builder.Thing");
        assert_eq!(imports.register("other.Thing"), "other.Thing");
        assert_eq!(imports.to_code(), "");
    }

    #[test]
    fn test_reserved_nested_names() {
        let mut imports = ImportRegistry::new("me.builder.ThingBuilder");
        imports.reserve("CopyBuilder");
        assert_eq!(imports.register("x.CopyBuilder"), "x.CopyBuilder");
    }

    #[test]
    fn test_same_package_and_java_lang_are_not_imported() {
        let mut imports = ImportRegistry::new("me.builder.ThingBuilder");
        assert_eq!(imports.register("me.builder.Other"), "Other");
        assert_eq!(imports.register("java.lang.String"), "String");
        assert_eq!(imports.register("me.Thing"), "Thing");
        assert_eq!(imports.to_code(), "import me.Thing;\n");
    }

    #[test]
    fn test_imports_sorted_by_qualified_name() {
        let mut imports = ImportRegistry::new("a.Owner");
        imports.register("z.Zed");
        imports.register("b.Bee");
        imports.register("m.Em");
        assert_eq!(imports.to_code(), "import b.Bee;\nimport m.Em;\nimport z.Zed;\n");
    }

    #[test]
    fn test_unqualified_names_pass_through() {
        let mut imports = ImportRegistry::new("a.Owner");
        assert_eq!(imports.register("int"), "int");
        assert_eq!(imports.register("T"), "T");
        assert_eq!(imports.register("?"), "?");
        assert_eq!(imports.to_code(), "");
    }

    #[test]
    fn test_wildcards_and_arrays() {
        let mut imports = ImportRegistry::new("a.Owner");
        assert_eq!(
            imports.register("? extends java.lang.Number"),
            "? extends Number"
        );
        assert_eq!(imports.register("? super x.Y"), "? super Y");
        assert_eq!(imports.register("x.Z[]"), "Z[]");
        assert_eq!(imports.register("x.W..."), "W...");
        assert_eq!(imports.register("byte[]"), "byte[]");
        assert_eq!(imports.to_code(), "import x.W;\nimport x.Y;\nimport x.Z;\n");
    }

    #[test]
    fn test_render_routes_every_base() {
        let mut imports = ImportRegistry::new("a.Owner");
        let node = TypeNode::parse("java.util.Map<java.lang.String, java.util.List<b.C>>").unwrap();
        assert_eq!(imports.render(&node), "Map<String, List<C>>");
        assert_eq!(
            imports.to_code(),
            "import b.C;\nimport java.util.List;\nimport java.util.Map;\n"
        );
    }

    #[test]
    fn test_collisions_depend_only_on_simple_names() {
        let mut a = ImportRegistry::new("o.Owner");
        a.register("p.q.Item");
        let mut b = ImportRegistry::new("o.Owner");
        b.register("r.s.t.Item");
        assert_eq!(a.register("x.Item"), "x.Item");
        assert_eq!(b.register("x.Item"), "x.Item");
    }
}
