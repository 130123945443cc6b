//! Configuration management for mdh.
//!
//! Parses `mdh.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [include]
//! pristine = false
//!
//! [project]
//! root = "${DOCS_ROOT:-.}"
//! ```
//!
//! Unknown sections and keys are rejected.
//!
//! ## Environment Variable Expansion
//!
//! `project.root` supports `${VAR}` (errors if unset) and `${VAR:-default}`.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override pristine mode.
    pub pristine: Option<bool>,
    /// Override the project root.
    pub root: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdh.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Include expansion settings.
    pub include: IncludeConfig,
    /// Project settings (paths are relative strings from TOML).
    project: ProjectConfigRaw,

    /// Resolved project configuration (set after loading).
    #[serde(skip)]
    pub project_resolved: ProjectConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Include expansion settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IncludeConfig {
    /// Omit the BEGIN/END comments around generated and included content.
    pub pristine: bool,
}

/// Raw project configuration as parsed from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ProjectConfigRaw {
    root: Option<String>,
}

/// Resolved project configuration with absolute paths.
#[derive(Debug, Default)]
pub struct ProjectConfig {
    /// Explicit project root. `None` means discover it from the git checkout.
    pub root: Option<PathBuf>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error, including unknown keys.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`project.root`").
        field: String,
        /// Error message (e.g., "${`DOCS_ROOT`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdh.toml` in current directory and parents,
    /// falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(pristine) = settings.pristine {
            self.include.pristine = pristine;
        }
        if let Some(root) = &settings.root {
            self.project_resolved.root = Some(root.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.validate()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(root) = &self.project.root
            && root.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "project.root cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref root) = self.project.root {
            self.project.root = Some(expand::expand_env(root, "project.root")?);
        }
        Ok(())
    }

    /// Resolve relative paths against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.project_resolved = ProjectConfig {
            root: self.project.root.as_deref().map(|root| config_dir.join(root)),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.include.pristine);
        assert!(config.project_resolved.root.is_none());
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(!config.include.pristine);
    }

    #[test]
    fn test_parse_include_config() {
        let toml = r"
[include]
pristine = true
";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.include.pristine);
    }

    #[test]
    fn test_unknown_include_key_rejected() {
        let toml = r"
[include]
pristine = true
colour = true
";
        let err = toml::from_str::<Config>(toml).unwrap_err();
        assert!(err.to_string().contains("colour"));
    }

    #[test]
    fn test_unknown_section_rejected() {
        let toml = r#"
[server]
host = "0.0.0.0"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[project]
root = "site"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/work"));

        assert_eq!(config.project_resolved.root, Some(PathBuf::from("/work/site")));
    }

    #[test]
    fn test_empty_root_rejected() {
        let toml = r#"
[project]
root = "  "
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let err = config.validate().unwrap_err();

        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(err.to_string().contains("project.root"));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[include]\npristine = true\n\n[project]\nroot = \"${MDH_LOAD_TEST_ROOT:-docs}\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert!(config.include.pristine);
        assert_eq!(
            config.project_resolved.root,
            Some(temp_dir.path().join("docs"))
        );
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/mdh.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        let overrides = CliSettings {
            pristine: Some(true),
            root: Some(PathBuf::from("/custom/root")),
        };

        config.apply_cli_settings(&overrides);

        assert!(config.include.pristine);
        assert_eq!(
            config.project_resolved.root,
            Some(PathBuf::from("/custom/root"))
        );
    }

    #[test]
    fn test_apply_empty_cli_settings_keeps_values() {
        let toml = r"
[include]
pristine = true
";
        let mut config: Config = toml::from_str(toml).unwrap();

        config.apply_cli_settings(&CliSettings::default());

        assert!(config.include.pristine);
    }
}
