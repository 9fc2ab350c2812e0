//! Generate command report data structures.

use std::path::PathBuf;

use chained_core::WriteResult;

use super::output::{Output, Report};

/// Report data from code generation.
#[derive(Debug)]
pub struct GenerateReport {
    /// Number of manifest types generated.
    pub type_count: usize,

    /// Generation result (files written or preview).
    pub result: GenerationResult,
}

/// Result of code generation.
#[derive(Debug)]
pub enum GenerationResult {
    /// Files were written to disk.
    Written(WrittenResult),
    /// Dry-run preview.
    Preview(Vec<PreviewFile>),
}

/// Result when files were written to disk.
#[derive(Debug)]
pub struct WrittenResult {
    /// Source root.
    pub output_dir: PathBuf,
    pub files: Vec<WrittenFile>,
}

#[derive(Debug)]
pub struct WrittenFile {
    /// Path relative to the source root.
    pub path: PathBuf,
    pub result: WriteResult,
}

/// A file in preview mode.
#[derive(Debug)]
pub struct PreviewFile {
    /// File path.
    pub path: String,
    /// File content.
    pub content: String,
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        match &self.result {
            GenerationResult::Written(written) => self.render_written(out, written),
            GenerationResult::Preview(files) => Self::render_preview(out, files),
        }
    }
}

impl GenerateReport {
    fn render_written(&self, out: &mut dyn Output, written: &WrittenResult) {
        let changed: Vec<_> = written
            .files
            .iter()
            .filter(|f| f.result == WriteResult::Written)
            .collect();
        let unchanged = written.files.len() - changed.len();

        out.key_value(
            "Generated",
            &format!(
                "{} file{} for {} type{} in {}",
                written.files.len(),
                plural(written.files.len()),
                self.type_count,
                plural(self.type_count),
                written.output_dir.display()
            ),
        );

        if !changed.is_empty() {
            out.newline();
            out.section("Updated");
            for file in changed {
                out.added_item(&file.path.display().to_string());
            }
        }

        if unchanged > 0 {
            out.newline();
            out.preformatted(&format!("{} file{} unchanged", unchanged, plural(unchanged)));
        }
    }

    fn render_preview(out: &mut dyn Output, files: &[PreviewFile]) {
        for file in files {
            out.divider(&file.path);
            out.preformatted(&file.content);
        }

        out.divider("Summary");
        out.preformatted(&format!("{} files would be generated", files.len()));
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}
