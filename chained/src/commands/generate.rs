use std::path::PathBuf;

use chained_codegen::{Vocabulary, lower};
use chained_manifest::Manifest;
use clap::Args;
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    ops::{self, GenerateOptions},
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct GenerateCommand {
    /// Path to chained.toml (defaults to ./chained.toml)
    #[arg(short, long, default_value = "chained.toml")]
    pub config: PathBuf,

    /// Source root the builders are written under (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Preview generated code without writing to disk
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    /// Run the generate command
    pub fn run(&self) -> Result<()> {
        let manifest = Manifest::from_file(&self.config).unwrap_or_exit();
        let vocab = Vocabulary::java().with_overrides(&manifest.runtime);
        let plans = lower(&manifest, &vocab).unwrap_or_exit();

        let report = ops::generate(
            &plans,
            &vocab,
            GenerateOptions {
                output_dir: &self.output,
                dry_run: self.dry_run,
            },
        )?;
        report.render(&mut TerminalOutput::new());
        Ok(())
    }
}
