//! Rendering of included file content per treatment.

use std::path::Path;

use crate::inclusion::{InclusionRecord, Treatment};

/// Render the lines of `record`'s target according to its treatment.
///
/// Markdown content passes through unchanged; the resolver expands its
/// nested directives separately. Control treatments never reach here with
/// content and also pass through.
#[must_use]
pub fn dispatch(record: &InclusionRecord, lines: Vec<String>) -> Vec<String> {
    match record.treatment() {
        Treatment::Markdown { .. } | Treatment::PageToc | Treatment::PageNav => lines,
        Treatment::Comment => vec![comment(&lines.concat())],
        Treatment::Pre => {
            let mut output = Vec::with_capacity(3);
            output.push("<pre>\n".to_owned());
            output.push(lines.concat());
            output.push("</pre>\n".to_owned());
            output
        }
        Treatment::CodeBlock => code_block(record.cited(), "", lines),
        Treatment::Language(language) => code_block(record.cited(), language, lines),
    }
}

/// File-name label, then the lines inside a fence.
fn code_block(cited: &str, language: &str, lines: Vec<String>) -> Vec<String> {
    let file_name = Path::new(cited)
        .file_name()
        .map_or_else(|| cited.to_owned(), |name| name.to_string_lossy().into_owned());
    let mut output = Vec::with_capacity(lines.len() + 3);
    output.push(format!("```{file_name}```:\n"));
    output.push(format!("```{language}\n"));
    output.extend(lines);
    output.push("```\n".to_owned());
    output
}

/// Wrap text in an HTML comment line.
#[must_use]
pub(crate) fn comment(text: &str) -> String {
    format!("<!--{text}-->\n")
}

/// Machine-readable comments bracketing generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Marker {
    /// Whole output file, named by the generating operation.
    Generated,
    /// One included file, named by its treatment.
    Included,
}

impl Marker {
    fn label(self) -> &'static str {
        match self {
            Self::Generated => "GENERATED FILE",
            Self::Included => "INCLUDED FILE",
        }
    }

    pub(crate) fn begin(self, name: &str, source: &str) -> String {
        comment(&format!(
            " >>>>>> BEGIN {} ({name}): SOURCE {source} ",
            self.label()
        ))
    }

    pub(crate) fn end(self, name: &str, source: &str) -> String {
        comment(&format!(
            " <<<<<< END {} ({name}): SOURCE {source} ",
            self.label()
        ))
    }
}
