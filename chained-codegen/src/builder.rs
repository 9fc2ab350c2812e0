//! Staged builder synthesis.
//!
//! Parameters are partitioned into mandatory ones (neither wrapped nor
//! nullable) and the rest, preserving declaration order in both groups. The
//! partition picks one of three shapes:
//!
//! - **flat**: no mandatory parameters; one builder class with a fluent
//!   setter per parameter and a `build()`.
//! - **factory**: exactly one mandatory parameter and nothing else; a static
//!   `of(value)` builds the target directly.
//! - **staged**: everything else; the outer builder takes the first
//!   mandatory parameter, then one `BuilderWith<Name>` class per mandatory
//!   parameter exposes only the next setter, so mandatory values cannot be
//!   skipped or reordered.

use chained_core::{package_of, simple_name, upper_first};
use serde::Serialize;

use crate::{
    CodeWriter, Construction, Parameter, Result, TypeNode, Vocabulary,
    construction::write_construction,
    containers::{Continuation, write_sub_builder},
    model::check_parameters,
};

const COPY_BUILDER: &str = "CopyBuilder";
const JAVADOC_WIDTH: usize = 80;

/// Name of the stage class reached after setting `param`.
pub fn stage_name(param: &str) -> String {
    format!("BuilderWith{}", upper_first(param))
}

/// Feature flags for one builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuilderOptions {
    /// Keep a separate `build()` after the last mandatory setter instead of
    /// building directly from it.
    pub always_include_build_method: bool,
    /// Emit `copy(instance)` returning a pre-populated builder.
    pub copy: bool,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            always_include_build_method: false,
            copy: true,
        }
    }
}

/// Which of the three builder layouts a parameter list produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuilderShape {
    Flat,
    Factory,
    Staged,
}

/// Everything needed to synthesize one builder file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderRequest {
    /// Qualified name of the type being built
    pub target: String,
    /// Qualified name of the generated builder class
    pub builder: String,
    pub params: Vec<Parameter>,
    pub construction: Construction,
    pub options: BuilderOptions,
}

impl BuilderRequest {
    pub fn new(
        target: impl Into<String>,
        builder: impl Into<String>,
        params: Vec<Parameter>,
        construction: Construction,
    ) -> Self {
        Self {
            target: target.into(),
            builder: builder.into(),
            params,
            construction,
            options: BuilderOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BuilderOptions) -> Self {
        self.options = options;
        self
    }

    /// Parameters that must be supplied, in declaration order.
    pub fn mandatory(&self) -> Vec<&Parameter> {
        self.params.iter().filter(|p| p.is_mandatory()).collect()
    }

    /// Wrapped and nullable parameters, in declaration order.
    pub fn optional_or_nullable(&self) -> Vec<&Parameter> {
        self.params.iter().filter(|p| !p.is_mandatory()).collect()
    }

    pub fn shape(&self) -> BuilderShape {
        let mandatory = self.params.iter().filter(|p| p.is_mandatory()).count();
        match (mandatory, self.params.len() - mandatory) {
            (0, _) => BuilderShape::Flat,
            (1, 0) => BuilderShape::Factory,
            _ => BuilderShape::Staged,
        }
    }

    /// Names of the nested stage classes, in chain order.
    pub fn stage_names(&self) -> Vec<String> {
        if self.shape() != BuilderShape::Staged {
            return Vec::new();
        }
        let mandatory = self.mandatory();
        let staged = if self.optional_or_nullable().is_empty() {
            mandatory.len() - 1
        } else {
            mandatory.len()
        };
        mandatory[..staged]
            .iter()
            .map(|p| stage_name(p.name()))
            .collect()
    }

    pub fn emits_copy_builder(&self) -> bool {
        self.options.copy && !self.construction.is_delegate()
    }
}

/// Synthesize the builder source for `request`.
///
/// Returns the complete compilation unit; nothing is produced on error.
pub fn generate_builder(vocab: &Vocabulary, request: &BuilderRequest) -> Result<String> {
    check_parameters(&request.params)?;
    tracing::debug!(
        target_type = %request.target,
        builder = %request.builder,
        shape = ?request.shape(),
        strategy = request.construction.label(),
        mandatory = request.mandatory().len(),
        "synthesizing builder"
    );

    let mut emitter = BuilderEmitter::new(vocab, request);
    emitter.emit();
    Ok(emitter.w.finish())
}

/// Javadoc notice describing how a setter treats absence.
#[derive(Debug, Clone, Copy)]
enum Notice {
    Mandatory,
    Nullable,
    /// Raw-value overload of a wrapped parameter
    OptionalValue,
    /// Wrapper overload of a wrapped parameter
    OptionalWrapper,
}

impl Notice {
    fn for_param(p: &Parameter) -> Self {
        if p.is_wrapped() {
            Self::OptionalWrapper
        } else if p.is_nullable() {
            Self::Nullable
        } else {
            Self::Mandatory
        }
    }

    fn text(&self) -> &'static str {
        match self {
            Self::Mandatory => "This parameter is <b>MANDATORY</b>.",
            Self::Nullable => {
                "This parameter is <b>NULLABLE</b>, the call can be omitted or this method can be called with {@code null}."
            }
            Self::OptionalValue => {
                "This parameter is <b>OPTIONAL</b>, the call can be omitted or an overload can be called with {@code Optional.empty()}."
            }
            Self::OptionalWrapper => {
                "This parameter is <b>OPTIONAL</b>, the call can be omitted or this method can be called with {@code Optional.empty()}."
            }
        }
    }
}

struct BuilderEmitter<'a> {
    vocab: &'a Vocabulary,
    req: &'a BuilderRequest,
    w: CodeWriter,
    /// Simple name of the builder class
    simple: String,
}

impl<'a> BuilderEmitter<'a> {
    fn new(vocab: &'a Vocabulary, req: &'a BuilderRequest) -> Self {
        let mut w = CodeWriter::new(&req.builder);
        for stage in req.stage_names() {
            w.reserve(&stage);
        }
        if req.emits_copy_builder() {
            w.reserve(COPY_BUILDER);
        }
        Self {
            vocab,
            req,
            w,
            simple: simple_name(&req.builder).to_string(),
        }
    }

    fn emit(&mut self) {
        self.w.push_line("// GENERATED FILE - DO NOT EDIT");
        let package = package_of(&self.req.builder);
        if !package.is_empty() {
            self.w.push_line(&format!("package {package};"));
        }
        self.w.imports_here();
        self.w.push_blank();
        self.generated_annotation();
        self.w
            .push_line(&format!("public final class {} {{", self.simple));

        match self.req.shape() {
            BuilderShape::Flat => self.flat(),
            BuilderShape::Factory => self.factory(),
            BuilderShape::Staged => self.staged(),
        }
        self.copy_builder();
        self.w.close();
    }

    fn generated_annotation(&mut self) {
        let runtime = self.vocab.runtime();
        let generated = self.w.class(&runtime.generated);
        self.w
            .push_line(&format!("@{generated}(\"{}\")", runtime.generator));
    }

    fn target(&mut self) -> String {
        self.w.class(&self.req.target)
    }

    fn flat(&mut self) {
        let req = self.req;
        let simple = self.simple.clone();
        self.w.push_blank();
        for p in &req.params {
            self.field(p, true);
        }
        self.private_constructor();
        self.static_creators();
        for p in &req.params {
            self.self_returning_setters(p, &simple, "this");
        }
        self.w.push_blank();
        let target = self.target();
        self.w.push_line(&format!("public {target} build() {{"));
        self.construct();
        self.w.close();
    }

    fn factory(&mut self) {
        let req = self.req;
        let p = &req.params[0];
        self.private_constructor();
        self.w.push_blank();
        let target = self.target();
        let param = self.param_decl(p);
        self.w
            .push_line(&format!("public static {target} of({param}) {{"));
        self.null_check(p);
        self.construct();
        self.w.close();
    }

    fn staged(&mut self) {
        let req = self.req;
        let mandatory = req.mandatory();
        let optional = req.optional_or_nullable();
        let target = self.target();

        self.w.push_blank();
        for p in &req.params {
            self.field(p, true);
        }
        self.private_constructor();
        self.static_creators();

        // The outer builder takes the first mandatory parameter.
        let first = mandatory[0];
        let first_stage = stage_name(first.name());
        let enter = format!("new {first_stage}(this)");
        self.sub_builder(first, "this", &first_stage, &enter);
        self.mandatory_setter(first, "this", &first_stage, &enter, "the next builder stage");

        self.w.push_blank();
        self.w.push_line(&format!("private {target} build() {{"));
        self.construct();
        self.w.close();

        for (i, pair) in mandatory.windows(2).enumerate() {
            let (current, next) = (pair[0], pair[1]);
            let stage = stage_name(current.name());
            self.stage_header(&stage);

            let last = i + 2 == mandatory.len() && optional.is_empty();
            if last && !req.options.always_include_build_method {
                // The last mandatory setter builds the target directly.
                self.sub_builder(next, "_b", &target, "_b.build()");
                let returns = format!("the built {{@code {}}}", simple_name(&req.target));
                self.mandatory_setter(next, "_b", &target, "_b.build()", &returns);
            } else if last {
                self.sub_builder(next, "_b", &stage, "this");
                self.mandatory_setter(next, "_b", &stage, "this", "this builder");
                self.build_delegate(&target);
            } else {
                let next_stage = stage_name(next.name());
                let advance = format!("new {next_stage}(_b)");
                self.sub_builder(next, "_b", &next_stage, &advance);
                self.mandatory_setter(next, "_b", &next_stage, &advance, "the next builder stage");
            }
            self.w.close();
        }

        if !optional.is_empty() {
            let Some(last) = mandatory.last() else {
                return;
            };
            let stage = stage_name(last.name());
            self.stage_header(&stage);
            for p in optional {
                self.self_returning_setters(p, &stage, "_b");
            }
            self.build_delegate(&target);
            self.w.close();
        }
    }

    fn copy_builder(&mut self) {
        let req = self.req;
        if !req.emits_copy_builder() {
            return;
        }
        let target = self.target();
        let nonnull = self.w.class(&self.vocab.runtime().nonnull);

        self.w.push_blank();
        self.w.push_line(&format!(
            "public static {COPY_BUILDER} copy(@{nonnull} {target} value) {{"
        ));
        self.raw_null_check("value");
        self.w
            .push_line(&format!("return new {COPY_BUILDER}(value);"));
        self.w.close();

        self.w.push_blank();
        self.w
            .push_line(&format!("public static final class {COPY_BUILDER} {{"));
        self.w.push_blank();
        for p in &req.params {
            self.field(p, false);
        }
        self.w.push_blank();
        self.w
            .push_line(&format!("private {COPY_BUILDER}({target} value) {{"));
        for p in &req.params {
            self.w
                .push_line(&format!("this.{} = value.{}();", p.name(), p.accessor()));
        }
        self.w.close();
        for p in &req.params {
            self.self_returning_setters(p, COPY_BUILDER, "this");
        }
        self.w.push_blank();
        self.w.push_line(&format!("public {target} build() {{"));
        self.construct();
        self.w.close();
        self.w.close();
    }

    fn construct(&mut self) {
        write_construction(
            &mut self.w,
            self.vocab,
            &self.req.target,
            &self.req.params,
            &self.req.construction,
        );
    }

    fn field(&mut self, p: &Parameter, with_default: bool) {
        let ty = self.type_text(p);
        if with_default && p.is_wrapped() {
            let wrapper = self.w.class(p.ty().base());
            self.w.push_line(&format!(
                "private {ty} {} = {wrapper}.empty();",
                p.name()
            ));
        } else {
            self.w.push_line(&format!("private {ty} {};", p.name()));
        }
    }

    fn private_constructor(&mut self) {
        self.w.push_blank();
        self.w.push_line(&format!("private {}() {{", self.simple));
        self.w.push_line("// prevent instantiation");
        self.w.close();
    }

    fn static_creators(&mut self) {
        let simple = self.simple.clone();
        self.w.push_blank();
        self.w
            .push_line(&format!("public static {simple} builder() {{"));
        self.w.push_line(&format!("return new {simple}();"));
        self.w.close();
        if !self.req.construction.is_delegate() {
            self.w.push_blank();
            self.w
                .push_line(&format!("public static {simple} create() {{"));
            self.w.push_line("return builder();");
            self.w.close();
        }
    }

    fn stage_header(&mut self, stage: &str) {
        let simple = self.simple.clone();
        self.w.push_blank();
        self.w
            .push_line(&format!("public static final class {stage} {{"));
        self.w.push_blank();
        self.w.push_line(&format!("private final {simple} _b;"));
        self.w.push_blank();
        self.w
            .push_line(&format!("private {stage}({simple} _b) {{"));
        self.w.push_line("this._b = _b;");
        self.w.close();
    }

    fn build_delegate(&mut self, target: &str) {
        self.w.push_blank();
        self.w.push_line(&format!("public {target} build() {{"));
        self.w.push_line("return _b.build();");
        self.w.close();
    }

    fn sub_builder(&mut self, p: &Parameter, owner: &str, ty: &str, expr: &str) {
        write_sub_builder(&mut self.w, self.vocab, p, owner, Continuation { ty, expr });
    }

    /// Setter for a mandatory parameter that assigns, then returns `returns`.
    fn mandatory_setter(
        &mut self,
        p: &Parameter,
        owner: &str,
        return_type: &str,
        returns: &str,
        return_doc: &str,
    ) {
        self.w.push_blank();
        self.javadoc(p, Notice::Mandatory, return_doc);
        let param = self.param_decl(p);
        self.w.push_line(&format!(
            "public {return_type} {}({param}) {{",
            p.name()
        ));
        self.null_check(p);
        self.w
            .push_line(&format!("{owner}.{name} = {name};", name = p.name()));
        self.w.push_line(&format!("return {returns};"));
        self.w.close();
    }

    /// Fluent setters returning `class` itself: the raw-value overload for
    /// wrapped parameters, the sub-builder accessor and the plain setter.
    fn self_returning_setters(&mut self, p: &Parameter, class: &str, owner: &str) {
        let name = p.name();
        if let Some(inner) = p.wrapped_inner() {
            let (inner_text, primitive) = self.unboxed(inner);
            let annotation = if primitive {
                String::new()
            } else {
                format!("@{} ", self.w.class(&self.vocab.runtime().nonnull))
            };
            self.w.push_blank();
            self.javadoc(p, Notice::OptionalValue, "this builder");
            self.w.push_line(&format!(
                "public {class} {name}({annotation}{inner_text} {name}) {{"
            ));
            if !primitive {
                self.raw_null_check(name);
            }
            let wrapper = self.w.class(p.ty().base());
            self.w
                .push_line(&format!("{owner}.{name} = {wrapper}.of({name});"));
            self.w.push_line("return this;");
            self.w.close();
        }

        self.sub_builder(p, owner, class, "this");

        self.w.push_blank();
        self.javadoc(p, Notice::for_param(p), "this builder");
        let param = self.param_decl(p);
        self.w
            .push_line(&format!("public {class} {name}({param}) {{"));
        self.null_check(p);
        self.w.push_line(&format!("{owner}.{name} = {name};"));
        self.w.push_line("return this;");
        self.w.close();
    }

    /// Display text of a wrapped parameter's inner type, unboxed when possible.
    fn unboxed(&mut self, inner: &TypeNode) -> (String, bool) {
        if inner.is_leaf() {
            let unboxed = self.vocab.unbox(inner.base());
            if self.vocab.is_primitive(unboxed) {
                return (unboxed.to_string(), true);
            }
        }
        (self.w.ty(inner), false)
    }

    fn type_text(&mut self, p: &Parameter) -> String {
        if p.is_prerendered() {
            p.ty().base().to_string()
        } else {
            self.w.ty(p.ty())
        }
    }

    /// `@Nonnull Type name`, without an annotation for primitives.
    fn param_decl(&mut self, p: &Parameter) -> String {
        let ty = self.type_text(p);
        if p.is_primitive() {
            return format!("{ty} {}", p.name());
        }
        let runtime = self.vocab.runtime();
        let annotation = if p.is_nullable() {
            self.w.class(&runtime.nullable)
        } else {
            self.w.class(&runtime.nonnull)
        };
        format!("@{annotation} {ty} {}", p.name())
    }

    fn null_check(&mut self, p: &Parameter) {
        if p.needs_null_check() {
            self.raw_null_check(p.name());
        }
    }

    fn raw_null_check(&mut self, name: &str) {
        let preconditions = self.w.class(&self.vocab.runtime().preconditions);
        self.w.push_line(&format!(
            "{preconditions}.checkNotNull({name}, \"{name}\");"
        ));
    }

    fn javadoc(&mut self, p: &Parameter, notice: Notice, returns: &str) {
        let mut text = format!("Sets {{@code {}}}.", p.name());
        if let Some(doc) = p.doc() {
            text.push(' ');
            text.push_str(&doc.trim().replace("*/", "*&#47;"));
        }
        text.push(' ');
        text.push_str(notice.text());

        self.w.push_line("/**");
        for line in wrap(&text, JAVADOC_WIDTH) {
            self.w.push_line(&format!(" * {line}"));
        }
        self.w.push_line(" *");
        self.w
            .push_line(&format!(" * @param {} the value to set", p.name()));
        self.w.push_line(&format!(" * @return {returns}"));
        self.w.push_line(" */");
    }
}

/// Greedy word wrap; words longer than `width` get a line of their own.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, ty: &str) -> Parameter {
        Parameter::new(name, ty, &Vocabulary::java()).unwrap()
    }

    fn request(params: Vec<Parameter>) -> BuilderRequest {
        BuilderRequest::new("me.Thing", "me.builder.ThingBuilder", params, Construction::Direct)
    }

    #[test]
    fn test_stage_name() {
        assert_eq!(stage_name("name"), "BuilderWithName");
        assert_eq!(stage_name("yearOfBirth"), "BuilderWithYearOfBirth");
    }

    #[test]
    fn test_shapes() {
        let opt = || param("age", "java.util.Optional<java.lang.Integer>");
        let req = || param("name", "java.lang.String");

        assert_eq!(request(vec![]).shape(), BuilderShape::Flat);
        assert_eq!(request(vec![opt()]).shape(), BuilderShape::Flat);
        assert_eq!(request(vec![req()]).shape(), BuilderShape::Factory);
        assert_eq!(request(vec![req(), opt()]).shape(), BuilderShape::Staged);
        assert_eq!(
            request(vec![req(), param("b", "int")]).shape(),
            BuilderShape::Staged
        );
    }

    #[test]
    fn test_stage_names() {
        let r = request(vec![
            param("a", "int"),
            param("b", "int"),
            param("c", "int"),
        ]);
        assert_eq!(r.stage_names(), ["BuilderWithA", "BuilderWithB"]);

        let r = request(vec![
            param("a", "int"),
            param("opt", "java.util.Optional<java.lang.String>"),
            param("b", "int"),
        ]);
        assert_eq!(r.stage_names(), ["BuilderWithA", "BuilderWithB"]);
    }

    #[test]
    fn test_partition_preserves_order() {
        let r = request(vec![
            param("x", "java.util.Optional<java.lang.String>"),
            param("a", "int"),
            param("n", "java.lang.String").nullable(true),
            param("b", "int"),
        ]);
        let mandatory: Vec<_> = r.mandatory().into_iter().map(|p| p.name()).collect();
        let rest: Vec<_> = r
            .optional_or_nullable()
            .into_iter()
            .map(|p| p.name())
            .collect();
        assert_eq!(mandatory, ["a", "b"]);
        assert_eq!(rest, ["x", "n"]);
    }

    #[test]
    fn test_copy_builder_not_for_delegates() {
        let mut r = request(vec![]);
        assert!(r.emits_copy_builder());
        r.construction = Construction::ImplementationDelegate {
            implementation: "me.builder.ThingImpl".into(),
        };
        assert!(!r.emits_copy_builder());
    }

    #[test]
    fn test_wrap() {
        let text = "Sets {@code age}. This parameter is <b>OPTIONAL</b>, the call can be omitted or an overload can be called with {@code Optional.empty()}.";
        let lines = wrap(text, 80);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.len() <= 80));
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_long_word() {
        let word = "x".repeat(100);
        assert_eq!(wrap(&format!("a {word} b"), 80), ["a", word.as_str(), "b"]);
    }

    #[test]
    fn test_factory_output() {
        let out = generate_builder(
            &Vocabulary::java(),
            &request(vec![param("name", "java.lang.String")])
                .with_options(BuilderOptions {
                    always_include_build_method: false,
                    copy: false,
                }),
        )
        .unwrap();
        insta::assert_snapshot!(out, @r#"
        // GENERATED FILE - DO NOT EDIT
        package me.builder;

        import com.github.davidmoten.chained.api.Preconditions;
        import jakarta.annotation.Generated;
        import jakarta.annotation.Nonnull;
        import me.Thing;

        @Generated("com.github.davidmoten:chained-processor")
        public final class ThingBuilder {

            private ThingBuilder() {
                // prevent instantiation
            }

            public static Thing of(@Nonnull String name) {
                Preconditions.checkNotNull(name, "name");
                return new Thing(name);
            }
        }
        "#);
    }

    #[test]
    fn test_reserved_parameter_name_fails() {
        let r = request(vec![param("_b", "int")]);
        assert!(generate_builder(&Vocabulary::java(), &r).is_err());
    }
}
