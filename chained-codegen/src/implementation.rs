//! Implementation classes for interface-shaped targets.

use chained_core::{package_of, simple_name};

use crate::{CodeWriter, Parameter, Result, Vocabulary, construction::write_call, model::check_parameters};

/// An immutable value class implementing `interface` with one field per accessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplementationRequest {
    /// Qualified name of the implemented interface
    pub interface: String,
    /// Qualified name of the generated class
    pub implementation: String,
    pub params: Vec<Parameter>,
    /// Zero-argument method invoked at the end of construction
    pub check: Option<String>,
}

/// Synthesize the implementation class source.
pub fn generate_implementation(vocab: &Vocabulary, req: &ImplementationRequest) -> Result<String> {
    check_parameters(&req.params)?;
    tracing::debug!(
        interface = %req.interface,
        implementation = %req.implementation,
        "synthesizing implementation class"
    );

    let simple = simple_name(&req.implementation).to_string();
    let runtime = vocab.runtime();
    let mut w = CodeWriter::new(&req.implementation);

    w.push_line("// GENERATED FILE - DO NOT EDIT");
    let package = package_of(&req.implementation);
    if !package.is_empty() {
        w.push_line(&format!("package {package};"));
    }
    w.imports_here();
    w.push_blank();
    let generated = w.class(&runtime.generated);
    w.push_line(&format!("@{generated}(\"{}\")", runtime.generator));
    let interface = w.class(&req.interface);
    w.push_line(&format!("public final class {simple} implements {interface} {{"));
    w.push_blank();

    let types: Vec<String> = req.params.iter().map(|p| type_text(&mut w, p)).collect();
    for (p, ty) in req.params.iter().zip(&types) {
        w.push_line(&format!("private final {ty} {};", p.name()));
    }
    let declarations: Vec<String> = req
        .params
        .iter()
        .zip(&types)
        .map(|(p, ty)| format!("{ty} {}", p.name()))
        .collect();
    let names: Vec<String> = req.params.iter().map(|p| p.name().to_string()).collect();

    // Constructor
    w.push_blank();
    write_call(&mut w, &format!("private {simple}("), &declarations, ") {");
    let preconditions = w.class(&runtime.preconditions);
    for p in req.params.iter().filter(|p| p.needs_null_check()) {
        w.push_line(&format!(
            "{preconditions}.checkNotNull({name}, \"{name}\");",
            name = p.name()
        ));
    }
    for p in &req.params {
        w.push_line(&format!("this.{name} = {name};", name = p.name()));
    }
    if let Some(check) = &req.check {
        w.push_line(&format!("{check}();"));
    }
    w.close();

    // Factory
    w.push_blank();
    write_call(&mut w, &format!("public static {simple} create("), &declarations, ") {");
    write_call(&mut w, &format!("return new {simple}("), &names, ");");
    w.close();

    // Accessors
    let override_ = w.class("java.lang.Override");
    for (p, ty) in req.params.iter().zip(&types) {
        w.push_blank();
        w.push_line(&format!("@{override_}"));
        if !p.is_primitive() {
            let annotation = if p.is_nullable() {
                w.class(&runtime.nullable)
            } else {
                w.class(&runtime.nonnull)
            };
            w.push_line(&format!("@{annotation}"));
        }
        w.push_line(&format!("public {ty} {}() {{", p.name()));
        w.push_line(&format!("return {};", p.name()));
        w.close();
    }

    write_to_string(&mut w, &simple, &req.params, &override_);
    write_equals(&mut w, &simple, &req.params, &override_);
    write_hash_code(&mut w, &names, &override_);
    w.close();
    Ok(w.finish())
}

fn type_text(w: &mut CodeWriter, p: &Parameter) -> String {
    if p.is_prerendered() {
        p.ty().base().to_string()
    } else {
        w.ty(p.ty())
    }
}

fn write_to_string(w: &mut CodeWriter, simple: &str, params: &[Parameter], override_: &str) {
    let string = w.class("java.lang.String");
    let string_builder = w.class("java.lang.StringBuilder");
    w.push_blank();
    w.push_line(&format!("@{override_}"));
    w.push_line(&format!("public {string} toString() {{"));
    w.push_line(&format!("{string_builder} b = new {string_builder}();"));
    w.push_line(&format!("b.append(\"{simple}[\");"));
    for (i, p) in params.iter().enumerate() {
        let separator = if i == 0 { "" } else { ", " };
        w.push_line(&format!("b.append(\"{separator}{}=\");", p.name()));
        w.push_line(&format!("b.append({string}.valueOf(this.{}));", p.name()));
    }
    w.push_line("b.append(\"]\");");
    w.push_line("return b.toString();");
    w.close();
}

fn write_equals(w: &mut CodeWriter, simple: &str, params: &[Parameter], override_: &str) {
    let object = w.class("java.lang.Object");
    let objects = w.class("java.util.Objects");
    w.push_blank();
    w.push_line(&format!("@{override_}"));
    w.push_line(&format!("public boolean equals({object} o) {{"));
    w.push_line("if (this == o) {");
    w.push_line("return true;");
    w.close();
    w.push_line("if (o == null || getClass() != o.getClass()) {");
    w.push_line("return false;");
    w.close();
    if params.is_empty() {
        w.push_line("return true;");
        w.close();
        return;
    }
    w.push_line(&format!("{simple} other = ({simple}) o;"));
    let comparisons: Vec<String> = params
        .iter()
        .map(|p| format!("{objects}.equals(this.{name}, other.{name})", name = p.name()))
        .collect();
    if let [only] = comparisons.as_slice() {
        w.push_line(&format!("return {only};"));
    } else {
        w.push_line("return");
        w.push_indent().push_indent();
        for (i, comparison) in comparisons.iter().enumerate() {
            let prefix = if i == 0 { "" } else { "&& " };
            let suffix = if i + 1 == comparisons.len() { ";" } else { "" };
            w.push_line(&format!("{prefix}{comparison}{suffix}"));
        }
        w.push_dedent().push_dedent();
    }
    w.close();
}

fn write_hash_code(w: &mut CodeWriter, names: &[String], override_: &str) {
    let objects = w.class("java.util.Objects");
    w.push_blank();
    w.push_line(&format!("@{override_}"));
    w.push_line("public int hashCode() {");
    w.push_line(&format!("return {objects}.hash({});", names.join(", ")));
    w.close();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(params: Vec<Parameter>, check: Option<&str>) -> ImplementationRequest {
        ImplementationRequest {
            interface: "me.Shape".into(),
            implementation: "me.builder.ShapeImpl".into(),
            params,
            check: check.map(String::from),
        }
    }

    fn param(name: &str, ty: &str) -> Parameter {
        Parameter::new(name, ty, &Vocabulary::java()).unwrap()
    }

    #[test]
    fn test_small_implementation() {
        let out = generate_implementation(
            &Vocabulary::java(),
            &request(vec![param("name", "java.lang.String")], None),
        )
        .unwrap();
        insta::assert_snapshot!(out, @r#"
        // GENERATED FILE - DO NOT EDIT
        package me.builder;

        import com.github.davidmoten.chained.api.Preconditions;
        import jakarta.annotation.Generated;
        import jakarta.annotation.Nonnull;
        import java.util.Objects;
        import me.Shape;

        @Generated("com.github.davidmoten:chained-processor")
        public final class ShapeImpl implements Shape {

            private final String name;

            private ShapeImpl(String name) {
                Preconditions.checkNotNull(name, "name");
                this.name = name;
            }

            public static ShapeImpl create(String name) {
                return new ShapeImpl(name);
            }

            @Override
            @Nonnull
            public String name() {
                return name;
            }

            @Override
            public String toString() {
                StringBuilder b = new StringBuilder();
                b.append("ShapeImpl[");
                b.append("name=");
                b.append(String.valueOf(this.name));
                b.append("]");
                return b.toString();
            }

            @Override
            public boolean equals(Object o) {
                if (this == o) {
                    return true;
                }
                if (o == null || getClass() != o.getClass()) {
                    return false;
                }
                ShapeImpl other = (ShapeImpl) o;
                return Objects.equals(this.name, other.name);
            }

            @Override
            public int hashCode() {
                return Objects.hash(name);
            }
        }
        "#);
    }

    #[test]
    fn test_check_method_runs_in_constructor() {
        let out = generate_implementation(
            &Vocabulary::java(),
            &request(vec![param("width", "double"), param("height", "double")], Some("check")),
        )
        .unwrap();
        assert!(out.contains("        this.height = height;\n        check();\n    }"));
        assert!(!out.contains("checkNotNull"));
        assert!(out.contains("&& Objects.equals(this.height, other.height);"));
    }

    #[test]
    fn test_many_parameters_break_lines() {
        let out = generate_implementation(
            &Vocabulary::java(),
            &request(
                vec![
                    param("a", "int"),
                    param("b", "int"),
                    param("c", "int"),
                    param("d", "int"),
                ],
                None,
            ),
        )
        .unwrap();
        assert!(out.contains(
            "    private ShapeImpl(\n            int a,\n            int b,\n            int c,\n            int d) {\n        this.a = a;"
        ));
    }

    #[test]
    fn test_nullable_accessor_is_not_checked() {
        let out = generate_implementation(
            &Vocabulary::java(),
            &request(
                vec![param("label", "java.lang.String").nullable(true)],
                None,
            ),
        )
        .unwrap();
        assert!(!out.contains("checkNotNull"));
        assert!(out.contains("    @Nullable\n    public String label() {"));
    }
}
