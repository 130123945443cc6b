//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use std::convert::Infallible;
use std::sync::LazyLock;

use regex::Regex;

use crate::ConfigError;

/// `${VAR}` references without a default.
static REQUIRED_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

/// Expand environment variable references in a string.
///
/// Returns the input unchanged if no `${}` patterns are present, so a bare
/// `$VAR` on its own is left alone. Once the string contains `${`, bare
/// `$VAR` references are expanded too, and unset ones are kept as written.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    if let Some(missing) = REQUIRED_VAR
        .captures_iter(value)
        .map(|caps| caps[1].to_owned())
        .find(|var| std::env::var(var).is_err())
    {
        return Err(ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{missing}}} not set"),
        });
    }

    let expanded = shellexpand::env_with_context(value, |var| -> Result<Option<String>, Infallible> {
        Ok(std::env::var(var).ok())
    })
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("cannot expand ${{{}}}", e.var_name),
    })?;
    Ok(expanded.into_owned())
}
