//! Generator configuration
//!
//! Defaults cover the common case; `Config::from_env` lets the driver and the
//! binary pick up overrides from `TESTABLE_*` environment variables.

use crate::consts::{DEFAULT_CLASS_SUFFIX, DEFAULT_INDENT_WIDTH, DEFAULT_PERMISSIVE_EXCEPTION};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Indentation unit used by the writer
    pub indent: String,
    /// Exception type declared on rewritten private methods
    pub permissive_exception: String,
    /// Appended to the original simple name when the driver names a synthetic class
    pub class_suffix: String,
    /// Emit per-member debug logging
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent: " ".repeat(DEFAULT_INDENT_WIDTH),
            permissive_exception: DEFAULT_PERMISSIVE_EXCEPTION.to_string(),
            class_suffix: DEFAULT_CLASS_SUFFIX.to_string(),
            debug: false,
        }
    }
}

impl Config {
    /// Build a configuration from `TESTABLE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(width) = lookup("TESTABLE_INDENT") {
            let width: usize = width.trim().parse().map_err(|_| {
                Error::config_error(format!("TESTABLE_INDENT must be a number of spaces, got '{}'", width))
            })?;
            if width == 0 || width > 16 {
                return Err(Error::config_error(format!("TESTABLE_INDENT out of range: {}", width)));
            }
            config.indent = " ".repeat(width);
        }

        if let Some(exception) = lookup("TESTABLE_PERMISSIVE_EXCEPTION") {
            let exception = exception.trim();
            if !is_qualified_identifier(exception) {
                return Err(Error::config_error(format!(
                    "TESTABLE_PERMISSIVE_EXCEPTION is not a type name: '{}'",
                    exception
                )));
            }
            config.permissive_exception = exception.to_string();
        }

        if let Some(suffix) = lookup("TESTABLE_CLASS_SUFFIX") {
            let suffix = suffix.trim();
            if suffix.is_empty() || !suffix.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
                return Err(Error::config_error(format!("TESTABLE_CLASS_SUFFIX is not an identifier part: '{}'", suffix)));
            }
            config.class_suffix = suffix.to_string();
        }

        config.debug = lookup("TESTABLE_DEBUG").is_some();
        Ok(config)
    }
}

fn is_qualified_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '$')
                && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = Config::from_lookup(lookup(&[])).expect("config");
        assert_eq!(config, Config::default());
        assert_eq!(config.indent, "    ");
        assert_eq!(config.permissive_exception, "Exception");
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("TESTABLE_INDENT", "2"),
            ("TESTABLE_PERMISSIVE_EXCEPTION", "java.lang.Throwable"),
            ("TESTABLE_CLASS_SUFFIX", "Mockable"),
            ("TESTABLE_DEBUG", "1"),
        ]))
        .expect("config");
        assert_eq!(config.indent, "  ");
        assert_eq!(config.permissive_exception, "java.lang.Throwable");
        assert_eq!(config.class_suffix, "Mockable");
        assert!(config.debug);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Config::from_lookup(lookup(&[("TESTABLE_INDENT", "wide")])).unwrap_err();
        assert!(err.to_string().contains("TESTABLE_INDENT"));

        let err = Config::from_lookup(lookup(&[("TESTABLE_PERMISSIVE_EXCEPTION", "not a type")])).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        let err = Config::from_lookup(lookup(&[("TESTABLE_CLASS_SUFFIX", "a.b")])).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
