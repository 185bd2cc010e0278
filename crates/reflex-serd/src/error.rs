// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Serialization errors.

use reflex::{BadAnyAccess, ReflError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SerdError>;

#[derive(Debug, Error)]
pub enum SerdError {
    #[error(transparent)]
    Reflect(#[from] ReflError),

    #[error(transparent)]
    Access(#[from] BadAnyAccess),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML format error: {0}")]
    Format(#[from] toml::ser::Error),

    #[error("Can't serialize a null value")]
    Null,

    #[error("{type_name}: expected a TOML {expected}, found {found}")]
    Mismatch {
        type_name: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{type_name}: {op} is not supported")]
    Unsupported { op: &'static str, type_name: String },

    #[error("Missing field '{field}' in {class}")]
    MissingField { class: String, field: String },

    #[error("Enum {type_name} has no item {item}")]
    UnknownItem { type_name: String, item: String },

    #[error("{type_name}: {value} does not fit a TOML integer")]
    OutOfRange { type_name: String, value: u64 },

    #[error("Nesting deeper than {0} levels")]
    TooDeep(usize),
}

impl SerdError {
    pub(crate) fn mismatch(
        type_name: impl Into<String>,
        expected: &'static str,
        found: &toml::Value,
    ) -> Self {
        Self::Mismatch {
            type_name: type_name.into(),
            expected,
            found: found.type_str(),
        }
    }

    pub(crate) fn unsupported(op: &'static str, type_name: impl Into<String>) -> Self {
        Self::Unsupported {
            op,
            type_name: type_name.into(),
        }
    }
}
