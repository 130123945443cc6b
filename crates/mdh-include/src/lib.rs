//! Recursive include expansion for markdown documents.
//!
//! A line of the form `@[treatment](path)` is replaced by the content of
//! `path`, rendered according to `treatment`:
//!
//! - `:markdown` inlines the file and expands its own directives
//!   (`:verbatim` is a deprecated alias)
//! - `:code_block` and any other token (taken as a language) produce a
//!   labeled fenced code block
//! - `:comment` wraps the file in an HTML comment
//! - `:pre` wraps the file in `<pre>`
//!
//! Two control directives act on the outermost document: `:page_toc`
//! inserts a table of contents for the headings after it, and `:page_nav`
//! writes prev/next tables into the pages linked from matching lines.
//!
//! Circular markdown inclusion is detected by canonical path and reported
//! with a backtrace of the inclusion chain.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use mdh_include::{MarkdownHelper, Project, discover_root};
//!
//! let root = discover_root(Path::new(".")).unwrap_or_else(|| ".".into());
//! let helper = MarkdownHelper::new(Project::new(root));
//! helper.include(Path::new("template.md"), Path::new("README.md"))?;
//! # Ok::<(), mdh_include::IncludeError>(())
//! ```

mod error;
mod heading;
mod helper;
mod inclusion;
mod nav;
pub mod project;
mod resolver;
mod stack;
mod toc;
mod treatment;

pub use error::{ErrorKind, IncludeError};
pub use heading::{Heading, slugify};
pub use helper::{MarkdownHelper, Options};
pub use inclusion::{Directive, InclusionRecord, Treatment};
pub use nav::{PageInfo, PageNavGenerator, Sibling, nav_table, relative_link};
pub use project::{Project, discover_root};
pub use resolver::IncludeResolver;
pub use stack::{InclusionStack, InclusionTrace, TraceLevel};
pub use toc::{TocBuilder, build_toc};
pub use treatment::dispatch;
