//! Explain operation - generation plan summaries.

use std::path::Path;

use chained_codegen::{GenerationPlan, Vocabulary};
use eyre::{Result, eyre};

use crate::reports::ExplainReport;

/// Summarize the plans, optionally restricted to one type.
pub fn explain(
    plans: &[GenerationPlan],
    vocab: &Vocabulary,
    config_path: &Path,
    only: Option<&str>,
) -> Result<ExplainReport> {
    let selected: Vec<_> = plans
        .iter()
        .filter(|plan| only.is_none_or(|name| plan.type_name == name))
        .map(|plan| plan.summary(vocab))
        .collect();

    if let Some(name) = only
        && selected.is_empty()
    {
        return Err(eyre!("type '{}' is not declared in {}", name, config_path.display()));
    }

    Ok(ExplainReport {
        config_path: config_path.to_path_buf(),
        plans: selected,
    })
}
