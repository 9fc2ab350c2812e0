//! Check command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from manifest validation.
#[derive(Debug)]
pub struct CheckReport {
    /// Path to the config file.
    pub config_path: PathBuf,
    /// Types that lowered and synthesized successfully.
    pub types: Vec<CheckedType>,
    /// Error messages, one per failing type.
    pub errors: Vec<String>,
}

#[derive(Debug)]
pub struct CheckedType {
    pub name: String,
    pub kind: &'static str,
    pub strategy: &'static str,
}

impl CheckReport {
    /// Whether the check passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for error in &self.errors {
            out.error(error);
        }

        if !self.is_valid() {
            return;
        }

        out.preformatted(&format!("✓ {} is valid", self.config_path.display()));
        out.newline();
        let count = self.types.len();
        out.section(&format!(
            "  {} type{}",
            count,
            if count == 1 { "" } else { "s" }
        ));
        for ty in &self.types {
            out.list_item(&format!("{} ({}, {})", ty.name, ty.kind, ty.strategy));
        }
    }
}
