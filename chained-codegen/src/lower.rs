//! Lowering of manifest type declarations into generation plans.

use std::collections::HashMap;

use chained_core::{NameTemplate, SourceFile, simple_name};
use chained_manifest::{ConstructorDecl, Manifest, TypeDecl, TypeKind, Visibility};
use serde::Serialize;

use crate::{
    BuilderOptions, BuilderRequest, BuilderShape, Construction, Error, ImplementationRequest,
    Parameter, Result, Vocabulary, generate_builder, generate_implementation,
};

/// Everything generated for one manifest type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    /// Qualified name of the target type
    pub type_name: String,
    pub kind: TypeKind,
    pub builder: BuilderRequest,
    /// Present for interface targets only
    pub implementation: Option<ImplementationRequest>,
}

impl GenerationPlan {
    /// Qualified names of the classes this plan generates, builder first.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.builder.builder.as_str())
            .chain(self.implementation.iter().map(|i| i.implementation.as_str()))
    }

    /// Synthesize every file of the plan, builder first.
    pub fn generate(&self, vocab: &Vocabulary) -> Result<Vec<SourceFile>> {
        let mut files = vec![SourceFile::new(
            &self.builder.builder,
            generate_builder(vocab, &self.builder)?,
        )];
        if let Some(implementation) = &self.implementation {
            files.push(SourceFile::new(
                &implementation.implementation,
                generate_implementation(vocab, implementation)?,
            ));
        }
        Ok(files)
    }

    /// Serializable description of the decisions taken for this type.
    pub fn summary(&self, vocab: &Vocabulary) -> PlanSummary {
        let req = &self.builder;
        let names = |params: Vec<&Parameter>| -> Vec<String> {
            params.into_iter().map(|p| p.name().to_string()).collect()
        };
        PlanSummary {
            type_name: self.type_name.clone(),
            kind: self.kind.as_str(),
            builder: req.builder.clone(),
            implementation: self
                .implementation
                .as_ref()
                .map(|i| i.implementation.clone()),
            strategy: req.construction.label(),
            shape: req.shape(),
            mandatory: names(req.mandatory()),
            optional: names(req.optional_or_nullable()),
            stages: req.stage_names(),
            sub_builders: req
                .params
                .iter()
                .filter(|p| !p.is_prerendered() && vocab.container(p.ty()).is_some())
                .map(|p| p.name().to_string())
                .collect(),
            copy: req.emits_copy_builder(),
            always_include_build_method: req.options.always_include_build_method,
        }
    }
}

/// Flattened view of a [`GenerationPlan`] for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    #[serde(rename = "type")]
    pub type_name: String,
    pub kind: &'static str,
    pub builder: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implementation: Option<String>,
    pub strategy: &'static str,
    pub shape: BuilderShape,
    pub mandatory: Vec<String>,
    pub optional: Vec<String>,
    pub stages: Vec<String>,
    pub sub_builders: Vec<String>,
    pub copy: bool,
    pub always_include_build_method: bool,
}

/// Generated class names seen so far, each mapped to the type that claimed it.
#[derive(Debug, Default)]
pub struct ClaimedClasses {
    owners: HashMap<String, String>,
}

impl ClaimedClasses {
    /// Record every class `plan` generates, failing if one is already taken.
    pub fn claim(&mut self, plan: &GenerationPlan) -> Result<()> {
        for class_name in plan.class_names() {
            if let Some(first) = self.owners.get(class_name) {
                return Err(Error::DuplicateClass {
                    class_name: class_name.to_string(),
                    first: first.clone(),
                    second: plan.type_name.clone(),
                });
            }
            self.owners
                .insert(class_name.to_string(), plan.type_name.clone());
        }
        Ok(())
    }
}

/// Lower every type of the manifest, in manifest order.
///
/// Two types resolving to the same generated class is an error.
pub fn lower(manifest: &Manifest, vocab: &Vocabulary) -> Result<Vec<GenerationPlan>> {
    let mut claimed = ClaimedClasses::default();
    manifest
        .types
        .iter()
        .map(|(name, decl)| {
            let plan = lower_type(manifest, vocab, name, decl)?;
            claimed.claim(&plan)?;
            Ok(plan)
        })
        .collect()
}

/// Lower one type declaration.
pub fn lower_type(
    manifest: &Manifest,
    vocab: &Vocabulary,
    name: &str,
    decl: &TypeDecl,
) -> Result<GenerationPlan> {
    let package = decl.package(name);
    let simple = simple_name(name);
    let builder = NameTemplate::new(
        decl.builder
            .as_deref()
            .unwrap_or(&manifest.defaults.builder),
    )
    .resolve(package, simple);

    let (params, visibility) = match decl.kind {
        TypeKind::Class => {
            let constructor = select_constructor(name, &decl.constructors)?;
            (&constructor.params, constructor.visibility)
        }
        TypeKind::Record | TypeKind::Interface => (&decl.params, decl.visibility),
    };
    let params = params
        .iter()
        .map(|p| Parameter::from_decl(p, vocab))
        .collect::<Result<Vec<_>>>()?;

    let mut implementation = None;
    let construction = if decl.kind == TypeKind::Interface {
        let implementation_name = NameTemplate::new(
            decl.implementation
                .as_deref()
                .unwrap_or(&manifest.defaults.implementation),
        )
        .resolve(package, simple);
        implementation = Some(ImplementationRequest {
            interface: name.to_string(),
            implementation: implementation_name.clone(),
            params: params.clone(),
            check: decl.check.clone(),
        });
        Construction::ImplementationDelegate {
            implementation: implementation_name,
        }
    } else {
        select_construction(visibility, package, chained_core::package_of(&builder))
    };
    tracing::debug!(
        type_name = name,
        kind = decl.kind.as_str(),
        visibility = visibility.as_str(),
        strategy = construction.label(),
        "selected construction strategy"
    );

    let options = BuilderOptions {
        always_include_build_method: decl
            .always_include_build_method
            .unwrap_or(manifest.defaults.always_include_build_method),
        copy: decl.copy.unwrap_or(manifest.defaults.copy),
    };
    Ok(GenerationPlan {
        type_name: name.to_string(),
        kind: decl.kind,
        builder: BuilderRequest::new(name, builder, params, construction).with_options(options),
        implementation,
    })
}

/// Pick the constructor a class builder targets.
///
/// A unique designated constructor wins; otherwise the unique constructor
/// with the most parameters.
pub fn select_constructor<'a>(
    type_name: &str,
    constructors: &'a [ConstructorDecl],
) -> Result<&'a ConstructorDecl> {
    let designated: Vec<_> = constructors.iter().filter(|c| c.designated).collect();
    match designated.as_slice() {
        [only] => return Ok(*only),
        [] => {}
        _ => {
            return Err(Error::AmbiguousConstructor {
                type_name: type_name.to_string(),
                reason: format!("{} constructors are designated", designated.len()),
            });
        }
    }

    let Some(arity) = constructors.iter().map(|c| c.params.len()).max() else {
        return Err(Error::MissingConstructor {
            type_name: type_name.to_string(),
        });
    };
    let mut widest = constructors.iter().filter(|c| c.params.len() == arity);
    match (widest.next(), widest.next()) {
        (Some(only), None) => Ok(only),
        _ => Err(Error::AmbiguousConstructor {
            type_name: type_name.to_string(),
            reason: format!("more than one constructor has {arity} parameters"),
        }),
    }
}

/// Direct construction when the builder can see the constructor.
fn select_construction(
    visibility: Visibility,
    target_package: &str,
    builder_package: &str,
) -> Construction {
    match visibility {
        Visibility::Public => Construction::Direct,
        Visibility::Protected | Visibility::Package if target_package == builder_package => {
            Construction::Direct
        }
        _ => Construction::Reflective,
    }
}

#[cfg(test)]
mod tests {
    use chained_manifest::ParamDecl;

    use super::*;

    fn constructor(arity: usize, designated: bool) -> ConstructorDecl {
        ConstructorDecl {
            visibility: Visibility::Public,
            designated,
            params: (0..arity)
                .map(|i| ParamDecl::new(format!("p{i}"), "int"))
                .collect(),
        }
    }

    fn manifest(src: &str) -> Manifest {
        src.parse().unwrap()
    }

    #[test]
    fn test_designated_constructor_wins() {
        let cs = [constructor(3, false), constructor(1, true)];
        assert_eq!(select_constructor("a.B", &cs).unwrap().params.len(), 1);
    }

    #[test]
    fn test_widest_constructor_wins() {
        let cs = [constructor(1, false), constructor(2, false)];
        assert_eq!(select_constructor("a.B", &cs).unwrap().params.len(), 2);
    }

    #[test]
    fn test_tied_constructors_are_ambiguous() {
        let cs = [constructor(2, false), constructor(2, false)];
        assert!(matches!(
            select_constructor("a.B", &cs),
            Err(Error::AmbiguousConstructor { .. })
        ));

        let cs = [constructor(1, true), constructor(2, true)];
        assert!(matches!(
            select_constructor("a.B", &cs),
            Err(Error::AmbiguousConstructor { .. })
        ));
    }

    #[test]
    fn test_no_constructor() {
        assert!(matches!(
            select_constructor("a.B", &[]),
            Err(Error::MissingConstructor { type_name }) if type_name == "a.B"
        ));
    }

    #[test]
    fn test_construction_by_visibility() {
        use crate::Construction::{Direct, Reflective};

        assert_eq!(select_construction(Visibility::Public, "a", "a.builder"), Direct);
        assert_eq!(select_construction(Visibility::Package, "a", "a"), Direct);
        assert_eq!(select_construction(Visibility::Protected, "a", "a"), Direct);
        assert_eq!(select_construction(Visibility::Package, "a", "a.builder"), Reflective);
        assert_eq!(select_construction(Visibility::Private, "a", "a"), Reflective);
    }

    #[test]
    fn test_lower_record() {
        let m = manifest(
            r#"
            [types."me.Thing"]
            kind = "record"
            params = [
                { name = "name", type = "java.lang.String" },
                { name = "age", type = "java.util.Optional<java.lang.Integer>" },
            ]
            "#,
        );
        let plans = lower(&m, &Vocabulary::java()).unwrap();
        assert_eq!(plans.len(), 1);
        let plan = &plans[0];
        assert_eq!(plan.builder.builder, "me.builder.ThingBuilder");
        assert_eq!(plan.builder.construction, Construction::Direct);
        assert!(plan.implementation.is_none());
        assert!(plan.builder.options.copy);
    }

    #[test]
    fn test_lower_interface_delegates() {
        let m = manifest(
            r#"
            [types."me.Shape"]
            kind = "interface"
            check = "check"
            params = [{ name = "width", type = "double" }]
            "#,
        );
        let plan = &lower(&m, &Vocabulary::java()).unwrap()[0];
        assert_eq!(
            plan.builder.construction,
            Construction::ImplementationDelegate {
                implementation: "me.builder.ShapeImpl".into()
            }
        );
        let implementation = plan.implementation.as_ref().unwrap();
        assert_eq!(implementation.check.as_deref(), Some("check"));

        let files = plan.generate(&Vocabulary::java()).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.class_name()).collect();
        assert_eq!(names, ["me.builder.ShapeBuilder", "me.builder.ShapeImpl"]);
    }

    #[test]
    fn test_lower_private_class_is_reflective() {
        let m = manifest(
            r#"
            [defaults]
            copy = false

            [[types."me.Account".constructors]]
            visibility = "private"
            params = [{ name = "id", type = "long" }]
            "#,
        );
        let plan = &lower(&m, &Vocabulary::java()).unwrap()[0];
        assert_eq!(plan.builder.construction, Construction::Reflective);
        assert!(!plan.builder.options.copy);
    }

    #[test]
    fn test_per_type_template_and_package() {
        let m = manifest(
            r#"
            [types."me.Outer.Inner"]
            kind = "record"
            package = "me"
            builder = "${pkg}.${simpleName}Maker"
            always_include_build_method = true
            params = [{ name = "a", type = "int" }]
            "#,
        );
        let plan = &lower(&m, &Vocabulary::java()).unwrap()[0];
        assert_eq!(plan.builder.builder, "me.InnerMaker");
        assert!(plan.builder.options.always_include_build_method);
    }

    #[test]
    fn test_summary() {
        let m = manifest(
            r#"
            [types."me.Thing"]
            kind = "record"
            params = [
                { name = "name", type = "java.lang.String" },
                { name = "tags", type = "java.util.List<java.lang.String>" },
                { name = "nick", type = "java.lang.String", nullable = true },
            ]
            "#,
        );
        let vocab = Vocabulary::java();
        let summary = lower(&m, &vocab).unwrap()[0].summary(&vocab);
        assert_eq!(summary.shape, BuilderShape::Staged);
        assert_eq!(summary.mandatory, ["name", "tags"]);
        assert_eq!(summary.optional, ["nick"]);
        assert_eq!(summary.stages, ["BuilderWithName", "BuilderWithTags"]);
        assert_eq!(summary.sub_builders, ["tags"]);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["type"], "me.Thing");
        assert_eq!(json["strategy"], "direct");
        assert_eq!(json["shape"], "staged");
        assert!(json.get("implementation").is_none());
    }

    #[test]
    fn test_shared_builder_name_is_rejected() {
        let m = manifest(
            r#"
            [defaults]
            builder = "me.builder.ThingBuilder"

            [types."me.Thing"]
            kind = "record"
            params = [{ name = "a", type = "int" }]

            [types."me.Other"]
            kind = "record"
            params = [{ name = "b", type = "int" }]
            "#,
        );
        assert_eq!(
            lower(&m, &Vocabulary::java()),
            Err(Error::DuplicateClass {
                class_name: "me.builder.ThingBuilder".into(),
                first: "me.Thing".into(),
                second: "me.Other".into(),
            })
        );
    }

    #[test]
    fn test_implementation_clashing_with_builder_is_rejected() {
        let m = manifest(
            r#"
            [types."me.Shape"]
            kind = "interface"
            implementation = "${pkg}.builder.ThingBuilder"
            params = [{ name = "width", type = "double" }]

            [types."me.Thing"]
            kind = "record"
            params = [{ name = "a", type = "int" }]
            "#,
        );
        assert!(matches!(
            lower(&m, &Vocabulary::java()),
            Err(Error::DuplicateClass { class_name, .. }) if class_name == "me.builder.ThingBuilder"
        ));
    }

    #[test]
    fn test_malformed_parameter_type_fails_lowering() {
        let m = manifest(
            r#"
            [types."me.Thing"]
            kind = "record"
            params = [{ name = "tags", type = "java.util.List<String" }]
            "#,
        );
        assert!(matches!(
            lower(&m, &Vocabulary::java()),
            Err(Error::MalformedType { .. })
        ));
    }
}
