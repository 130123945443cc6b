//! Status lines printed to stderr.

use std::path::Path;

use console::{Style, Term};

/// Writes coloured status lines for the CLI.
pub(crate) struct Output {
    term: Term,
    ok: Style,
    failure: Style,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            ok: Style::new().green(),
            failure: Style::new().red(),
        }
    }

    /// Report a file written by a command.
    pub(crate) fn generated(&self, path: &Path) {
        let line = format!("Generated {}", path.display());
        let _ = self.term.write_line(&self.ok.apply_to(line).to_string());
    }

    /// Report a failed command.
    pub(crate) fn failed(&self, err: &dyn std::fmt::Display) {
        let line = format!("Error: {err}");
        let _ = self.term.write_line(&self.failure.apply_to(line).to_string());
    }
}
