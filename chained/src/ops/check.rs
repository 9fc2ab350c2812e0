//! Check operation - manifest validation.

use std::path::Path;

use chained_codegen::{ClaimedClasses, Vocabulary, lower_type};
use chained_manifest::Manifest;

use crate::reports::{CheckReport, CheckedType};

/// Lower and synthesize every type without writing anything.
///
/// Failures are collected per type instead of stopping at the first one.
pub fn check(manifest: &Manifest, vocab: &Vocabulary, config_path: &Path) -> CheckReport {
    let mut types = Vec::new();
    let mut errors = Vec::new();
    let mut claimed = ClaimedClasses::default();

    for (name, decl) in &manifest.types {
        let checked = lower_type(manifest, vocab, name, decl).and_then(|plan| {
            claimed.claim(&plan)?;
            plan.generate(vocab)?;
            Ok(plan)
        });
        match checked {
            Ok(plan) => types.push(CheckedType {
                name: name.clone(),
                kind: plan.kind.as_str(),
                strategy: plan.builder.construction.label(),
            }),
            Err(e) => {
                tracing::debug!(type_name = %name, error = %e, "type failed to lower");
                errors.push(format!("{name}: {e}"));
            }
        }
    }

    CheckReport {
        config_path: config_path.to_path_buf(),
        types,
        errors,
    }
}
