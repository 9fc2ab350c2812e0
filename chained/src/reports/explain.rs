//! Explain command report data structures.

use std::path::PathBuf;

use chained_codegen::PlanSummary;

use super::output::{Output, Report};

/// Generation plans, one per selected type.
#[derive(Debug)]
pub struct ExplainReport {
    /// Path to the manifest file.
    pub config_path: PathBuf,
    pub plans: Vec<PlanSummary>,
}

impl Report for ExplainReport {
    fn render(&self, out: &mut dyn Output) {
        out.key_value("Input", &self.config_path.display().to_string());

        for plan in &self.plans {
            out.newline();
            out.divider(&plan.type_name);
            out.key_value_indented("kind", plan.kind);
            out.key_value_indented("builder", &plan.builder);
            if let Some(implementation) = &plan.implementation {
                out.key_value_indented("implementation", implementation);
            }
            out.key_value_indented("construction", plan.strategy);
            out.key_value_indented("shape", shape_name(plan));
            out.key_value_indented("mandatory", &list(&plan.mandatory));
            out.key_value_indented("optional or nullable", &list(&plan.optional));
            if !plan.sub_builders.is_empty() {
                out.key_value_indented("sub-builders", &list(&plan.sub_builders));
            }
            out.key_value_indented("copy builder", yes_no(plan.copy));
            out.key_value_indented(
                "separate build()",
                yes_no(plan.always_include_build_method),
            );

            if !plan.stages.is_empty() {
                out.section("  Stages");
                for (i, stage) in plan.stages.iter().enumerate() {
                    out.numbered_item(i + 1, stage);
                }
            }
        }
    }
}

fn shape_name(plan: &PlanSummary) -> &'static str {
    match plan.shape {
        chained_codegen::BuilderShape::Flat => "flat",
        chained_codegen::BuilderShape::Factory => "factory",
        chained_codegen::BuilderShape::Staged => "staged",
    }
}

fn list(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}
