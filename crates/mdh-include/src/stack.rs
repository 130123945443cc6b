//! Active markdown inclusion chain, cycle detection and backtraces.

use std::fmt;
use std::path::PathBuf;

use crate::error::IncludeError;
use crate::inclusion::InclusionRecord;
use crate::project::Project;

/// One level of an inclusion backtrace, with project-relative paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceLevel {
    /// File containing the directive.
    pub includer: String,
    /// 1-based line number of the directive.
    pub line_number: usize,
    /// Raw directive text.
    pub description: String,
    /// File the directive includes.
    pub includee: String,
}

/// Snapshot of the inclusion chain at the point of failure, innermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InclusionTrace {
    levels: Vec<TraceLevel>,
}

impl InclusionTrace {
    /// Levels, innermost first.
    #[must_use]
    pub fn levels(&self) -> &[TraceLevel] {
        &self.levels
    }
}

impl fmt::Display for InclusionTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  Backtrace (innermost include first):")?;
        for (i, level) in self.levels.iter().enumerate() {
            write!(
                f,
                "\n    Level {i}:\
                 \n      Includer:\
                 \n        Location: {}:{}\
                 \n        Include description: {}\
                 \n      Includee:\
                 \n        File path: {}",
                level.includer, level.line_number, level.description, level.includee
            )?;
        }
        Ok(())
    }
}

struct StackEntry {
    record: InclusionRecord,
    canonical: Option<PathBuf>,
}

/// Chain of markdown inclusions currently being expanded, outermost first.
///
/// Only markdown-treatment inclusions are pushed. No two entries resolve to
/// the same canonical file; [`check_cycle`](Self::check_cycle) enforces this
/// before each push.
#[derive(Default)]
pub struct InclusionStack {
    entries: Vec<StackEntry>,
}

impl InclusionStack {
    /// Create an empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of active inclusions.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Whether expansion is at the outermost document.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fail with [`IncludeError::CircularInclude`] if `record` targets a file
    /// already on the stack.
    pub fn check_cycle(
        &self,
        record: &InclusionRecord,
        project: &Project,
    ) -> Result<(), IncludeError> {
        let Some(canonical) = record.canonical_includee() else {
            return Ok(());
        };
        let circular = self
            .entries
            .iter()
            .any(|entry| entry.canonical.as_ref() == Some(&canonical));
        if circular {
            return Err(IncludeError::CircularInclude(
                self.backtrace(record, project),
            ));
        }
        Ok(())
    }

    /// Enter `record`'s target.
    pub fn push(&mut self, record: InclusionRecord) {
        let canonical = record.canonical_includee();
        self.entries.push(StackEntry { record, canonical });
    }

    /// Leave the innermost inclusion.
    pub fn pop(&mut self) -> Option<InclusionRecord> {
        self.entries.pop().map(|entry| entry.record)
    }

    /// Trace of the current chain extended by `pending`, innermost first.
    #[must_use]
    pub fn backtrace(&self, pending: &InclusionRecord, project: &Project) -> InclusionTrace {
        let levels = std::iter::once(pending)
            .chain(self.entries.iter().rev().map(|entry| &entry.record))
            .map(|record| TraceLevel {
                includer: project.path_in_project(record.includer()),
                line_number: record.line_number(),
                description: record.description().to_owned(),
                includee: project.path_in_project(record.includee()),
            })
            .collect();
        InclusionTrace { levels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inclusion::Directive;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn record(includer: &Path, line: usize, text: &str) -> InclusionRecord {
        InclusionRecord::new(includer, line, &Directive::parse(text).unwrap())
    }

    #[test]
    fn test_push_pop() {
        let mut stack = InclusionStack::new();
        assert!(stack.is_empty());

        stack.push(record(Path::new("/p/a.md"), 1, "@[:markdown](b.md)"));
        assert_eq!(stack.depth(), 1);

        let popped = stack.pop().unwrap();
        assert_eq!(popped.cited(), "b.md");
        assert!(stack.is_empty());
    }

    #[test]
    fn test_backtrace_innermost_first() {
        let project = Project::new("/p");
        let mut stack = InclusionStack::new();
        stack.push(record(Path::new("/p/a.md"), 3, "@[:markdown](b.md)"));
        let pending = record(Path::new("/p/b.md"), 5, "@[:markdown](c.md)");

        let backtrace = stack.backtrace(&pending, &project);

        assert_eq!(
            backtrace.to_string(),
            "  Backtrace (innermost include first):\n\
             \x20   Level 0:\n\
             \x20     Includer:\n\
             \x20       Location: b.md:5\n\
             \x20       Include description: @[:markdown](c.md)\n\
             \x20     Includee:\n\
             \x20       File path: c.md\n\
             \x20   Level 1:\n\
             \x20     Includer:\n\
             \x20       Location: a.md:3\n\
             \x20       Include description: @[:markdown](b.md)\n\
             \x20     Includee:\n\
             \x20       File path: b.md"
        );
    }

    #[test]
    fn test_check_cycle_detects_repeat() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path();
        std::fs::write(dir.join("a.md"), "@[:markdown](b.md)\n").unwrap();
        std::fs::write(dir.join("b.md"), "@[:markdown](a.md)\n").unwrap();
        let project = Project::new(dir);

        let mut stack = InclusionStack::new();
        let first = record(&dir.join("a.md"), 1, "@[:markdown](b.md)");
        stack.check_cycle(&first, &project).unwrap();
        stack.push(first);

        let second = record(&dir.join("b.md"), 1, "@[:markdown](a.md)");
        stack.check_cycle(&second, &project).unwrap();
        stack.push(second);

        let third = record(&dir.join("a.md"), 1, "@[:markdown](b.md)");
        let err = stack.check_cycle(&third, &project).unwrap_err();

        assert_eq!(err.kind(), crate::ErrorKind::CircularInclude);
        assert_eq!(err.backtrace().unwrap().levels().len(), 3);
    }

    #[test]
    fn test_check_cycle_ignores_missing_target() {
        let temp_dir = tempfile::tempdir().unwrap();
        let project = Project::new(temp_dir.path());
        let stack = InclusionStack::new();

        let missing = record(&temp_dir.path().join("a.md"), 1, "@[:markdown](gone.md)");

        assert!(stack.check_cycle(&missing, &project).is_ok());
    }
}
