//! Generate operation - builder sources from lowered plans.

use std::path::Path;

use chained_codegen::{GenerationPlan, Vocabulary};
use eyre::{Context, Result};

use crate::reports::{GenerateReport, GenerationResult, PreviewFile, WrittenFile, WrittenResult};

/// Options for the generate operation.
pub struct GenerateOptions<'a> {
    /// Source root for generated files.
    pub output_dir: &'a Path,
    /// Whether to preview without writing files.
    pub dry_run: bool,
}

/// Execute the generate operation.
///
/// Every file is synthesized before anything is written, so a failing type
/// leaves the output directory untouched.
pub fn generate(
    plans: &[GenerationPlan],
    vocab: &Vocabulary,
    opts: GenerateOptions,
) -> Result<GenerateReport> {
    let mut files = Vec::new();
    for plan in plans {
        let generated = plan
            .generate(vocab)
            .wrap_err_with(|| format!("Failed to generate builder for {}", plan.type_name))?;
        files.extend(generated);
    }
    tracing::info!(types = plans.len(), files = files.len(), "generated sources");

    let result = if opts.dry_run {
        GenerationResult::Preview(
            files
                .into_iter()
                .map(|f| PreviewFile {
                    path: f.relative_path().display().to_string(),
                    content: f.content().to_string(),
                })
                .collect(),
        )
    } else {
        let mut written = Vec::with_capacity(files.len());
        for file in &files {
            let result = file
                .write(opts.output_dir)
                .wrap_err_with(|| format!("Failed to write {}", file.relative_path().display()))?;
            tracing::debug!(class = file.class_name(), ?result, "wrote source file");
            written.push(WrittenFile {
                path: file.relative_path(),
                result,
            });
        }
        GenerationResult::Written(WrittenResult {
            output_dir: opts.output_dir.to_path_buf(),
            files: written,
        })
    };

    Ok(GenerateReport {
        type_count: plans.len(),
        result,
    })
}
