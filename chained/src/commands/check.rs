use std::path::PathBuf;

use chained_codegen::Vocabulary;
use chained_manifest::Manifest;
use clap::Args;
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct CheckCommand {
    /// Path to chained.toml (defaults to ./chained.toml)
    #[arg(short, long, default_value = "chained.toml")]
    pub config: PathBuf,
}

impl CheckCommand {
    /// Run the check command
    pub fn run(&self) -> Result<()> {
        let manifest = Manifest::from_file(&self.config).unwrap_or_exit();
        let vocab = Vocabulary::java().with_overrides(&manifest.runtime);

        let report = ops::check(&manifest, &vocab, &self.config);
        report.render(&mut TerminalOutput::new());

        if !report.is_valid() {
            std::process::exit(1);
        }
        Ok(())
    }
}
