//! Table of contents generation from heading lines.

use crate::heading::Heading;

/// Builds a nested markdown list of heading links.
///
/// The first heading seen sets the baseline level. Each later heading is
/// indented two spaces per level below the baseline; headings shallower
/// than the baseline are not indented.
#[derive(Debug, Default)]
pub struct TocBuilder {
    baseline: Option<u8>,
    lines: Vec<String>,
}

impl TocBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan one line, adding an entry if it is a heading.
    pub fn push_line(&mut self, line: &str) {
        let Some(heading) = Heading::parse(line) else {
            return;
        };
        let baseline = *self.baseline.get_or_insert(heading.level);
        let indent = "  ".repeat(heading.level.saturating_sub(baseline).into());
        self.lines.push(format!("{indent}- {}\n", heading.link()));
    }

    /// Finish and return the list lines, each ending in a newline.
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

/// Build TOC lines for every heading in `lines`.
///
/// # Example
///
/// ```
/// use mdh_include::build_toc;
///
/// let toc = build_toc(["## A\n", "text\n", "### B\n"]);
/// assert_eq!(toc, vec!["- [A](#a)\n", "  - [B](#b)\n"]);
/// ```
pub fn build_toc<'a, I>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut builder = TocBuilder::new();
    for line in lines {
        builder.push_line(line);
    }
    builder.into_lines()
}
