// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for reflection operations.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ReflError>;

/// A mutable access was requested through a const-reference [`Any`](crate::Any).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("bad any access: can't obtain mutable access from a const reference")]
pub struct BadAnyAccess;

/// Errors raised by invocation and value manipulation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReflError {
    #[error(transparent)]
    BadAccess(#[from] BadAnyAccess),

    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("Argument {index} mismatch: expected {expected}, got {got}")]
    ArgumentMismatch {
        index: usize,
        expected: String,
        got: String,
    },

    #[error("Arity mismatch: expected {expected} arguments, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("`{0}` does not return a reference")]
    NotAReference(String),

    #[error("Operation `{op}` is not supported by {type_name}")]
    Unsupported { op: &'static str, type_name: String },

    #[error("Null any")]
    Null,
}

impl ReflError {
    pub(crate) fn unsupported(op: &'static str, type_name: impl Into<String>) -> Self {
        Self::Unsupported {
            op,
            type_name: type_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_access_converts() {
        let err: ReflError = BadAnyAccess.into();
        assert_eq!(err, ReflError::BadAccess(BadAnyAccess));
        assert!(err.to_string().contains("const reference"));
    }

    #[test]
    fn test_display_arity() {
        let err = ReflError::ArityMismatch {
            expected: 2,
            got: 1,
        };
        assert_eq!(err.to_string(), "Arity mismatch: expected 2 arguments, got 1");
    }
}
