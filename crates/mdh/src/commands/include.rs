//! `mdh include` command implementation.

use std::path::PathBuf;

use clap::Args;

use super::{CommonArgs, build_helper};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the include command.
#[derive(Args)]
pub(crate) struct IncludeArgs {
    /// Template containing include directives.
    template: PathBuf,

    /// File to write the expanded markdown to.
    output: PathBuf,

    /// Set a helper option (repeatable), e.g. `-o pristine=true`.
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
    options: Vec<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl IncludeArgs {
    /// Execute the include command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, an option is invalid, or
    /// expansion fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = self.common.load_config()?;
        let helper = build_helper(&config, &self.options)?;

        helper.include(&self.template, &self.output)?;

        Output::new().generated(&self.output);
        Ok(())
    }
}
