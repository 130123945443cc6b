//! Recursive include expansion.
//!
//! Expansion runs in two phases:
//!
//! 1. **Scan** ([`IncludeResolver::resolve`]): each directive line is
//!    classified. Markdown inclusions recurse depth-first through a shared
//!    [`InclusionStack`]; other content treatments are rendered immediately;
//!    control directives leave markers in the assembled line list.
//! 2. **Post-passes**: the page TOC replaces its placeholder, then the page
//!    navigation pattern (if any) drives [`PageNavGenerator`].
//!
//! Rendered content (code blocks, comments, `<pre>`, bracketing comments) is
//! kept apart from markdown lines so the post-passes never look inside it.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::IncludeError;
use crate::inclusion::{Directive, InclusionRecord, Treatment, absolute_path};
use crate::nav::PageNavGenerator;
use crate::project::Project;
use crate::stack::InclusionStack;
use crate::toc::build_toc;
use crate::treatment::{Marker, dispatch};

static TOC_TITLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#{1,6}\s").unwrap());

/// One line of the assembled document.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    /// Markdown text, visible to the TOC and navigation passes.
    Markdown(String),
    /// Generated or verbatim-included text, emitted as is.
    Rendered(String),
    /// Where the page TOC goes; holds the title line.
    TocPlaceholder(String),
    /// Page navigation pattern; emits nothing.
    PageNav(String),
}

impl Line {
    fn markdown(&self) -> Option<&str> {
        match self {
            Self::Markdown(text) => Some(text),
            _ => None,
        }
    }

    fn into_text(self) -> Option<String> {
        match self {
            Self::Markdown(text) | Self::Rendered(text) | Self::TocPlaceholder(text) => Some(text),
            Self::PageNav(_) => None,
        }
    }
}

/// Expands include directives in a document.
pub struct IncludeResolver<'a> {
    project: &'a Project,
    pristine: bool,
}

impl<'a> IncludeResolver<'a> {
    /// Create a resolver. Paths in comments and backtraces are shown relative
    /// to `project`; `pristine` suppresses the BEGIN/END comments.
    #[must_use]
    pub fn new(project: &'a Project, pristine: bool) -> Self {
        Self { project, pristine }
    }

    /// Expand the `lines` of `document`, including every directive recursively.
    ///
    /// Lines keep their terminators. When the document has a `:page_nav`
    /// directive, the linked page files are rewritten with navigation tables;
    /// their paths resolve against the document's directory.
    ///
    /// # Errors
    ///
    /// Fails on circular or unreadable inclusions, misused `:page_toc`
    /// directives, bad navigation patterns, or unreadable/unwritable pages.
    pub fn resolve(&self, document: &Path, lines: &[String]) -> Result<Vec<String>, IncludeError> {
        let document = absolute_path(document);
        let mut stack = InclusionStack::new();
        let mut assembled = self.expand(&document, lines, &mut stack)?;

        insert_page_toc(&mut assembled);

        let nav_pattern = assembled
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, line)| match line {
                Line::PageNav(pattern) => Some((i, pattern.as_str())),
                _ => None,
            });
        if let Some((pos, pattern)) = nav_pattern {
            let base_dir = document.parent().unwrap_or(Path::new(""));
            let generator = PageNavGenerator::new(pattern, base_dir)?;
            generator.generate(assembled[pos + 1..].iter().filter_map(Line::markdown))?;
        }

        Ok(assembled.into_iter().filter_map(Line::into_text).collect())
    }

    fn expand(
        &self,
        includer: &Path,
        lines: &[String],
        stack: &mut InclusionStack,
    ) -> Result<Vec<Line>, IncludeError> {
        let mut output = Vec::with_capacity(lines.len());
        let mut has_page_toc = false;

        for (idx, line) in lines.iter().enumerate() {
            let Some(directive) = Directive::parse(line) else {
                output.push(Line::Markdown(line.clone()));
                continue;
            };
            let record = InclusionRecord::new(includer, idx + 1, &directive);
            tracing::debug!(
                includer = %includer.display(),
                line = idx + 1,
                treatment = directive.token,
                "Dispatching directive"
            );

            match record.treatment() {
                Treatment::PageToc => {
                    if !stack.is_empty() {
                        return Err(IncludeError::MisplacedPageToc);
                    }
                    if has_page_toc {
                        return Err(IncludeError::MultiplePageToc);
                    }
                    if !TOC_TITLE_PATTERN.is_match(directive.argument) {
                        return Err(IncludeError::InvalidTocTitle(
                            directive.argument.to_owned(),
                        ));
                    }
                    has_page_toc = true;
                    output.push(Line::TocPlaceholder(format!("{}\n", directive.argument)));
                }
                Treatment::PageNav => output.push(Line::PageNav(directive.argument.to_owned())),
                _ => self.include(record, stack, &mut output)?,
            }
        }

        Ok(output)
    }

    fn include(
        &self,
        record: InclusionRecord,
        stack: &mut InclusionStack,
        output: &mut Vec<Line>,
    ) -> Result<(), IncludeError> {
        let treatment = record.treatment().clone();
        if matches!(treatment, Treatment::Markdown { deprecated_alias: true }) {
            tracing::warn!(
                "Treatment ':verbatim' is deprecated; please use treatment ':markdown'."
            );
        }
        if treatment.is_markdown() {
            stack.check_cycle(&record, self.project)?;
        }

        let lines = match read_lines(record.includee()) {
            Ok(lines) => lines,
            Err(source) => {
                return Err(IncludeError::UnreadableIncludee {
                    chain: stack.backtrace(&record, self.project),
                    source,
                });
            }
        };
        if lines.last().is_some_and(|line| !line.ends_with('\n')) {
            tracing::warn!(
                path = record.cited(),
                "Included file has no trailing newline"
            );
        }

        let source = self.project.path_in_project(record.includee());
        if !self.pristine {
            output.push(Line::Rendered(
                Marker::Included.begin(treatment.name(), &source),
            ));
        }

        let rendered = dispatch(&record, lines);
        if treatment.is_markdown() {
            let includee = record.includee().to_path_buf();
            stack.push(record);
            let expanded = self.expand(&includee, &rendered, stack);
            stack.pop();
            output.extend(expanded?);
        } else {
            output.extend(rendered.into_iter().map(Line::Rendered));
        }

        if !self.pristine {
            output.push(Line::Rendered(Marker::Included.end(treatment.name(), &source)));
        }
        Ok(())
    }
}

/// Replace the TOC placeholder with its title and the TOC of the lines after it.
fn insert_page_toc(assembled: &mut Vec<Line>) {
    let Some((pos, title)) = assembled.iter().enumerate().find_map(|(i, line)| match line {
        Line::TocPlaceholder(title) => Some((i, title.clone())),
        _ => None,
    }) else {
        return;
    };
    let toc = build_toc(assembled[pos + 1..].iter().filter_map(Line::markdown));
    let replacement: Vec<Line> = std::iter::once(title)
        .chain(toc)
        .map(Line::Rendered)
        .collect();
    assembled.splice(pos..=pos, replacement);
}

/// Read a file as lines that keep their terminators.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD rather than failing.
pub(crate) fn read_lines(path: &Path) -> std::io::Result<Vec<String>> {
    let bytes = std::fs::read(path)?;
    Ok(split_lines(&String::from_utf8_lossy(&bytes)))
}

/// Split text into lines that keep their terminators.
pub(crate) fn split_lines(content: &str) -> Vec<String> {
    content.split_inclusive('\n').map(str::to_owned).collect()
}
