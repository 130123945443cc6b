//! File-level operations: read a template, expand it, write the result.

use std::path::Path;

use crate::error::IncludeError;
use crate::project::Project;
use crate::resolver::{IncludeResolver, read_lines};
use crate::toc::build_toc;
use crate::treatment::Marker;

/// Options controlling generated output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Omit the BEGIN/END bracketing comments.
    pub pristine: bool,
}

impl Options {
    /// Recognized option keys.
    pub const KEYS: &'static [&'static str] = &["pristine"];

    /// Set an option by name.
    ///
    /// # Errors
    ///
    /// Returns [`IncludeError::InvalidOption`] for an unrecognized key.
    pub fn set(&mut self, key: &str, value: bool) -> Result<(), IncludeError> {
        match key {
            "pristine" => self.pristine = value,
            _ => return Err(IncludeError::InvalidOption(key.to_owned())),
        }
        Ok(())
    }
}

/// Generates markdown files from templates.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use mdh_include::{MarkdownHelper, Options, Project};
///
/// let helper = MarkdownHelper::new(Project::new("/work/site"))
///     .with_options(Options { pristine: true });
/// helper.include(Path::new("docs/template.md"), Path::new("README.md"))?;
/// # Ok::<(), mdh_include::IncludeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MarkdownHelper {
    project: Project,
    options: Options,
}

impl MarkdownHelper {
    /// Create a helper with default options.
    #[must_use]
    pub fn new(project: Project) -> Self {
        Self {
            project,
            options: Options::default(),
        }
    }

    /// Replace the options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Project whose root paths are shown relative to.
    #[must_use]
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Expand every include directive in `template` and write the result to `output`.
    ///
    /// # Errors
    ///
    /// Fails if the template cannot be read, expansion fails, or the output
    /// cannot be written. Nothing is written on failure.
    pub fn include(&self, template: &Path, output: &Path) -> Result<(), IncludeError> {
        self.generate_file(template, output, "include", |lines| {
            IncludeResolver::new(&self.project, self.options.pristine).resolve(template, lines)
        })
    }

    /// Write a table of contents for the headings in `markdown` to `toc`.
    ///
    /// # Errors
    ///
    /// Fails if `markdown` cannot be read or `toc` cannot be written.
    #[deprecated(note = "use `include` with an embedded `:page_toc` directive")]
    pub fn create_page_toc(&self, markdown: &Path, toc: &Path) -> Result<(), IncludeError> {
        tracing::warn!(
            "Method create_page_toc is deprecated. Please use method include with embedded :page_toc treatment."
        );
        self.generate_file(markdown, toc, "create_page_toc", |lines| {
            Ok(build_toc(lines.iter().map(String::as_str)))
        })
    }

    fn generate_file<F>(
        &self,
        input: &Path,
        output: &Path,
        operation: &str,
        body: F,
    ) -> Result<(), IncludeError>
    where
        F: FnOnce(&[String]) -> Result<Vec<String>, IncludeError>,
    {
        let lines = read_lines(input).map_err(|source| IncludeError::UnreadableInput {
            path: input.to_path_buf(),
            source,
        })?;
        let source = self
            .project
            .path_in_project(&crate::inclusion::absolute_path(input));

        let mut generated = Vec::with_capacity(lines.len() + 2);
        if !self.options.pristine {
            generated.push(Marker::Generated.begin(operation, &source));
        }
        generated.extend(body(&lines)?);
        if !self.options.pristine {
            generated.push(Marker::Generated.end(operation, &source));
        }

        std::fs::write(output, generated.concat()).map_err(|source| {
            IncludeError::UnwritableOutput {
                path: output.to_path_buf(),
                source,
            }
        })?;
        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            operation,
            "Generated file"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_options_set() {
        let mut options = Options::default();
        options.set("pristine", true).unwrap();
        assert!(options.pristine);
    }

    #[test]
    fn test_options_unknown_key() {
        let mut options = Options::default();
        let err = options.set("verbose", true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOption);
        assert_eq!(err.to_string(), "Unknown option: verbose");
    }

    #[test]
    fn test_include_writes_bracketed_output() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().canonicalize().unwrap();
        std::fs::create_dir(dir.join("docs")).unwrap();
        std::fs::write(dir.join("docs/template.md"), "# T\n@[:pre](out.txt)\n").unwrap();
        std::fs::write(dir.join("docs/out.txt"), "x\n").unwrap();

        let helper = MarkdownHelper::new(Project::new(&dir));
        helper
            .include(&dir.join("docs/template.md"), &dir.join("README.md"))
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.join("README.md")).unwrap(),
            "<!-- >>>>>> BEGIN GENERATED FILE (include): SOURCE docs/template.md -->\n\
             # T\n\
             <!-- >>>>>> BEGIN INCLUDED FILE (pre): SOURCE docs/out.txt -->\n\
             <pre>\n\
             x\n\
             </pre>\n\
             <!-- <<<<<< END INCLUDED FILE (pre): SOURCE docs/out.txt -->\n\
             <!-- <<<<<< END GENERATED FILE (include): SOURCE docs/template.md -->\n"
        );
    }

    #[test]
    fn test_include_pristine() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();
        std::fs::write(dir.join("template.md"), "@[:markdown](part.md)\n").unwrap();
        std::fs::write(dir.join("part.md"), "Part\n").unwrap();

        let helper =
            MarkdownHelper::new(Project::new(dir)).with_options(Options { pristine: true });
        helper
            .include(&dir.join("template.md"), &dir.join("out.md"))
            .unwrap();

        assert_eq!(std::fs::read_to_string(dir.join("out.md")).unwrap(), "Part\n");
    }

    #[test]
    fn test_include_unreadable_template() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();

        let helper = MarkdownHelper::new(Project::new(dir));
        let err = helper
            .include(&dir.join("missing.md"), &dir.join("out.md"))
            .unwrap_err();

        assert!(matches!(err, IncludeError::UnreadableInput { .. }));
        assert!(!dir.join("out.md").exists());
    }

    #[test]
    fn test_include_failure_writes_nothing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();
        std::fs::write(dir.join("template.md"), "@[:markdown](template.md)\n").unwrap();

        let helper = MarkdownHelper::new(Project::new(dir));
        let err = helper
            .include(&dir.join("template.md"), &dir.join("out.md"))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::CircularInclude);
        assert!(!dir.join("out.md").exists());
    }

    #[test]
    #[allow(deprecated)]
    fn test_create_page_toc() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();
        std::fs::write(dir.join("page.md"), "## A\ntext\n### B\n## C\n").unwrap();

        let helper =
            MarkdownHelper::new(Project::new(dir)).with_options(Options { pristine: true });
        helper
            .create_page_toc(&dir.join("page.md"), &dir.join("toc.md"))
            .unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.join("toc.md")).unwrap(),
            "- [A](#a)\n  - [B](#b)\n- [C](#c)\n"
        );
    }
}
