use std::path::PathBuf;

use chained_codegen::{Vocabulary, lower};
use chained_manifest::Manifest;
use clap::Args;
use eyre::Result;

use super::UnwrapOrExit;
use crate::{
    ops,
    reports::{Report, TerminalOutput},
};

#[derive(Args)]
pub struct ExplainCommand {
    /// Path to chained.toml (defaults to ./chained.toml)
    #[arg(short, long, default_value = "chained.toml")]
    pub config: PathBuf,

    /// Only explain this type (qualified name)
    #[arg(short, long = "type", value_name = "NAME")]
    pub type_name: Option<String>,

    /// Print the plans as JSON
    #[arg(long)]
    pub json: bool,
}

impl ExplainCommand {
    pub fn run(&self) -> Result<()> {
        let manifest = Manifest::from_file(&self.config).unwrap_or_exit();
        let vocab = Vocabulary::java().with_overrides(&manifest.runtime);
        let plans = lower(&manifest, &vocab).unwrap_or_exit();

        let report = ops::explain(&plans, &vocab, &self.config, self.type_name.as_deref())?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&report.plans)?);
        } else {
            report.render(&mut TerminalOutput::new());
        }
        Ok(())
    }
}
