//! Error types for include expansion.

use std::io;
use std::path::PathBuf;

use crate::stack::InclusionTrace;

/// Semantic error categories.
///
/// Several [`IncludeError`] variants can share a kind: an unreadable template
/// and a missing includee are both [`ErrorKind::UnreadableInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A markdown inclusion would include one of its own ancestors.
    CircularInclude,
    /// The template or an included file cannot be read.
    UnreadableInput,
    /// The output file or a navigated page cannot be written.
    UnwritableOutput,
    /// The `:page_toc` argument is not a markdown heading line.
    InvalidTocTitle,
    /// `:page_toc` appears inside an included file.
    MisplacedPageToc,
    /// `:page_toc` appears more than once.
    MultiplePageToc,
    /// The `:page_nav` argument is not a valid regular expression.
    InvalidNavPattern,
    /// Unrecognized option key.
    InvalidOption,
}

/// Error returned when expanding a document fails.
///
/// Every error aborts the whole generation; nothing is written for a
/// template whose expansion fails.
#[derive(Debug, thiserror::Error)]
pub enum IncludeError {
    /// Circular markdown inclusion.
    #[error("Includes are circular:\n{0}")]
    CircularInclude(InclusionTrace),

    /// The top-level input file cannot be read.
    #[error("Could not read input file.\n{}", .path.display())]
    UnreadableInput {
        /// Path as given by the caller.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An included file cannot be read.
    #[error("Could not read include file,\n{chain}")]
    UnreadableIncludee {
        /// Inclusion chain down to the failing directive.
        chain: InclusionTrace,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// An output file cannot be written.
    #[error("Could not write output file.\n{}", .path.display())]
    UnwritableOutput {
        /// Path of the file being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Page TOC title is not a heading line.
    #[error("TOC title must be a valid markdown header, not {0}")]
    InvalidTocTitle(String),

    /// Page TOC directive inside an included file.
    #[error("Page TOC must be in outermost markdown file.")]
    MisplacedPageToc,

    /// More than one page TOC directive.
    #[error("Only one page TOC allowed.")]
    MultiplePageToc,

    /// Page navigation pattern does not compile.
    #[error("Invalid page navigation pattern {pattern:?}")]
    InvalidNavPattern {
        /// Pattern as written in the directive.
        pattern: String,
        /// Regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// Unknown option key.
    #[error("Unknown option: {0}")]
    InvalidOption(String),
}

impl IncludeError {
    /// Semantic category of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CircularInclude(_) => ErrorKind::CircularInclude,
            Self::UnreadableInput { .. } | Self::UnreadableIncludee { .. } => {
                ErrorKind::UnreadableInput
            }
            Self::UnwritableOutput { .. } => ErrorKind::UnwritableOutput,
            Self::InvalidTocTitle(_) => ErrorKind::InvalidTocTitle,
            Self::MisplacedPageToc => ErrorKind::MisplacedPageToc,
            Self::MultiplePageToc => ErrorKind::MultiplePageToc,
            Self::InvalidNavPattern { .. } => ErrorKind::InvalidNavPattern,
            Self::InvalidOption(_) => ErrorKind::InvalidOption,
        }
    }

    /// Inclusion backtrace, for errors raised during recursion.
    #[must_use]
    pub fn backtrace(&self) -> Option<&InclusionTrace> {
        match self {
            Self::CircularInclude(chain) | Self::UnreadableIncludee { chain, .. } => {
                Some(chain)
            }
            _ => None,
        }
    }
}
