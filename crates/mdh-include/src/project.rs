//! Project root lookup and project-relative path display.

use std::path::{Path, PathBuf};

/// Marker entry identifying the root of a git checkout.
const ROOT_MARKER: &str = ".git";

/// Search `start` and its parents for a directory containing `.git`.
///
/// Returns `None` when no ancestor is a git checkout.
#[must_use]
pub fn discover_root(start: &Path) -> Option<PathBuf> {
    let mut current = std::path::absolute(start).ok()?;
    loop {
        if current.join(ROOT_MARKER).exists() {
            return Some(current);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Project root used to shorten paths in generated comments and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Create a project rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Project root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Render `path` relative to the project root.
    ///
    /// Paths outside the root are rendered unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use std::path::Path;
    /// use mdh_include::Project;
    ///
    /// let project = Project::new("/work/site");
    /// assert_eq!(project.path_in_project(Path::new("/work/site/docs/a.md")), "docs/a.md");
    /// assert_eq!(project.path_in_project(Path::new("/tmp/b.md")), "/tmp/b.md");
    /// ```
    #[must_use]
    pub fn path_in_project(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_root_from_nested_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        std::fs::create_dir(root.join(".git")).unwrap();
        std::fs::create_dir_all(root.join("docs/guide")).unwrap();

        let found = discover_root(&root.join("docs/guide")).unwrap();

        assert_eq!(found, root);
    }

    #[test]
    fn test_path_in_project_strips_root() {
        let project = Project::new("/work/site");

        assert_eq!(
            project.path_in_project(Path::new("/work/site/docs/guide.md")),
            "docs/guide.md"
        );
    }

    #[test]
    fn test_path_in_project_keeps_outside_paths() {
        let project = Project::new("/work/site");

        assert_eq!(
            project.path_in_project(Path::new("/work/other/guide.md")),
            "/work/other/guide.md"
        );
    }

    #[test]
    fn test_path_in_project_requires_component_boundary() {
        let project = Project::new("/work/site");

        assert_eq!(
            project.path_in_project(Path::new("/work/site2/guide.md")),
            "/work/site2/guide.md"
        );
    }
}
