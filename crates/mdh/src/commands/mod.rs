//! CLI command implementations.

pub(crate) mod include;
pub(crate) mod page_toc;

pub(crate) use include::IncludeArgs;
pub(crate) use page_toc::PageTocArgs;

use std::path::PathBuf;

use clap::Args;
use mdh_config::{CliSettings, Config};
use mdh_include::{MarkdownHelper, Options, Project, discover_root};

use crate::error::CliError;

/// Arguments shared by every generating command.
#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Path to configuration file (default: auto-discover mdh.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Omit the BEGIN/END comments around generated and included content.
    #[arg(long)]
    pristine: bool,

    /// Project root for paths in comments and backtraces (overrides config).
    #[arg(long)]
    root: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    /// Load config with CLI overrides applied.
    fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            pristine: self.pristine.then_some(true),
            root: self.root.clone(),
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }
}

/// Build a helper from the loaded config, applying `key=value` overrides last.
fn build_helper(config: &Config, overrides: &[String]) -> Result<MarkdownHelper, CliError> {
    let mut options = Options {
        pristine: config.include.pristine,
    };
    for entry in overrides {
        let (key, value) = parse_option(entry)?;
        options.set(key, value)?;
    }

    let root = match &config.project_resolved.root {
        Some(root) => std::path::absolute(root)?,
        None => locate_root()?,
    };
    Ok(MarkdownHelper::new(Project::new(root)).with_options(options))
}

/// Find the project root from the current directory, falling back to it.
fn locate_root() -> Result<PathBuf, CliError> {
    let cwd = std::env::current_dir()?;
    Ok(discover_root(&cwd).unwrap_or_else(|| {
        tracing::warn!(
            cwd = %cwd.display(),
            "Project root not found, using current directory"
        );
        cwd
    }))
}

/// Split a `key=value` option, parsing the value as a boolean.
fn parse_option(entry: &str) -> Result<(&str, bool), CliError> {
    let (key, value) = entry
        .split_once('=')
        .ok_or_else(|| CliError::Validation(format!("Option must be key=value, not {entry}")))?;
    let value = value.trim().parse::<bool>().map_err(|_| {
        CliError::Validation(format!("Option {key} must be true or false, not {value}"))
    })?;
    Ok((key.trim(), value))
}
