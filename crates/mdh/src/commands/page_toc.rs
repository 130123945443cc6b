//! `mdh create-page-toc` command implementation.

use std::path::PathBuf;

use clap::Args;

use super::{CommonArgs, build_helper};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the create-page-toc command.
#[derive(Args)]
pub(crate) struct PageTocArgs {
    /// Markdown file to scan for headings.
    markdown: PathBuf,

    /// File to write the table of contents to.
    toc: PathBuf,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl PageTocArgs {
    /// Execute the create-page-toc command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the TOC cannot be generated.
    #[allow(deprecated)]
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let config = self.common.load_config()?;
        let helper = build_helper(&config, &[])?;

        helper.create_page_toc(&self.markdown, &self.toc)?;

        Output::new().generated(&self.toc);
        Ok(())
    }
}
