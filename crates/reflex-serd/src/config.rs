// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Serializer configuration.
//!
//! Supports both programmatic and file-based configuration:
//!
//! ```toml
//! number_mode = "exact"
//! enum_mode = "name"
//! missing_field = "error"
//! max_depth = 64
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// How numbers are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberMode {
    /// Integers as TOML integers, floats as TOML floats.
    #[default]
    Exact,
    /// Every number as a TOML float. Integers above 2^53 lose precision.
    Double,
}

/// How enumerators are written. Reading accepts both forms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumMode {
    /// Registered integer value.
    #[default]
    Value,
    /// Registered item name.
    Name,
}

/// What happens when a document lacks a property of a class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFieldPolicy {
    /// Log and keep the current value.
    #[default]
    Ignore,
    /// Fail with [`SerdError::MissingField`](crate::SerdError::MissingField).
    Error,
}

/// Serializer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerdConfig {
    #[serde(default)]
    pub number_mode: NumberMode,

    #[serde(default)]
    pub enum_mode: EnumMode,

    #[serde(default)]
    pub missing_field: MissingFieldPolicy,

    /// Maximum nesting of classes and containers.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    128
}

impl Default for SerdConfig {
    fn default() -> Self {
        Self {
            number_mode: NumberMode::default(),
            enum_mode: EnumMode::default(),
            missing_field: MissingFieldPolicy::default(),
            max_depth: default_max_depth(),
        }
    }
}

impl SerdConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".into()));
        }
        if self.max_depth > 4096 {
            return Err(ConfigError::Invalid(format!(
                "max_depth {} exceeds 4096",
                self.max_depth
            )));
        }
        Ok(())
    }

    pub fn with_number_mode(mut self, mode: NumberMode) -> Self {
        self.number_mode = mode;
        self
    }

    pub fn with_enum_mode(mut self, mode: EnumMode) -> Self {
        self.enum_mode = mode;
        self
    }

    pub fn with_missing_field(mut self, policy: MissingFieldPolicy) -> Self {
        self.missing_field = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SerdConfig::default();
        assert_eq!(config.number_mode, NumberMode::Exact);
        assert_eq!(config.enum_mode, EnumMode::Value);
        assert_eq!(config.missing_field, MissingFieldPolicy::Ignore);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = SerdConfig::from_toml_str("enum_mode = \"name\"\n").expect("parse");
        assert_eq!(config.enum_mode, EnumMode::Name);
        assert_eq!(config.max_depth, 128);
    }

    #[test]
    fn test_rejects_zero_depth() {
        let err = SerdConfig::from_toml_str("max_depth = 0\n").expect_err("invalid");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_unknown_mode() {
        let err = SerdConfig::from_toml_str("number_mode = \"decimal\"\n").expect_err("invalid");
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "number_mode = \"double\"").expect("write");
        writeln!(file, "missing_field = \"error\"").expect("write");
        let config = SerdConfig::from_file(file.path()).expect("load");
        assert_eq!(config.number_mode, NumberMode::Double);
        assert_eq!(config.missing_field, MissingFieldPolicy::Error);
    }

    #[test]
    fn test_missing_file() {
        let err = SerdConfig::from_file("/nonexistent/reflex-serd.toml").expect_err("missing");
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
