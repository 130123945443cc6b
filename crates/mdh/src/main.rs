//! `mdh` - generate markdown files from templates with include directives.

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{IncludeArgs, PageTocArgs};
use output::Output;

#[derive(Parser)]
#[command(name = "mdh", version, about = "Markdown helper")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand include directives in a template and write the result.
    Include(IncludeArgs),
    /// Write a table of contents for the headings in a markdown file (deprecated).
    CreatePageToc(PageTocArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Include(args) => args.common.verbose,
            Self::CreatePageToc(args) => args.common.verbose,
        }
    }

    fn run(self) -> Result<(), error::CliError> {
        match self {
            Self::Include(args) => args.execute(),
            Self::CreatePageToc(args) => args.execute(),
        }
    }
}

/// Log filter: `--verbose` forces info, then `RUST_LOG`, then warnings only.
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("info");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.command.verbose()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.command.run() {
        Output::new().failed(&err);
        std::process::exit(1);
    }
}
