// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error taxonomy for schema lookup, canonicalization and record building.
//!
//! Every variant describes a programming or schema-mismatch error. None of
//! them are transient, so nothing in this crate retries: callers propagate
//! them and abandon the current build / compare operation.

use thiserror::Error;

/// Errors produced by the type system, canonicalizer, builder and records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// A named record type could not be resolved.
    #[error("unknown type: {name}")]
    UnknownType { name: String },

    /// Positional access beyond the field count.
    #[error("index out of range: {index} >= {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Access by a field name the record type does not declare.
    #[error("record {record} has no field named {field}")]
    UnknownField { record: String, field: String },

    /// The value's runtime shape does not match the declared type.
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },

    /// No union branch accepts the value.
    #[error("no branch of union {branches} at {path} accepts {found}")]
    UnionResolution {
        path: String,
        found: String,
        branches: String,
    },

    /// `build()` with an unset, default-less, non-optional field.
    #[error("missing required field {record}.{field}")]
    MissingRequiredField { record: String, field: String },

    /// A builder was used again after a successful `build()`.
    #[error("builder for {record} was already consumed by build()")]
    BuilderConsumed { record: String },

    /// The schema itself violates a structural rule.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}

impl RecordError {
    pub(crate) fn type_mismatch(
        path: impl ToString,
        expected: impl ToString,
        found: impl ToString,
    ) -> Self {
        Self::TypeMismatch {
            path: path.to_string(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RecordError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_path() {
        let err = RecordError::type_mismatch("Pair.x", "int", "string");
        assert_eq!(
            err.to_string(),
            "type mismatch at Pair.x: expected int, found string"
        );
    }

    #[test]
    fn test_missing_field_display() {
        let err = RecordError::MissingRequiredField {
            record: "Pair".into(),
            field: "x".into(),
        };
        assert_eq!(err.to_string(), "missing required field Pair.x");
    }
}
