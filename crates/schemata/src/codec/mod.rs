// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Compact binary encoding for records.
//!
//! # Wire format
//!
//! - `boolean`: one byte, `0` or `1`
//! - `int` / `long`: zig-zag varint
//! - `float` / `double`: little-endian IEEE 754
//! - `bytes` / `string`: varint length, then raw bytes (UTF-8 for strings)
//! - `array` / `map`: blocks of `count` items ending with a zero count; a
//!   negative count is followed by the block's byte size (map items are
//!   key string then value; keys are unique within a map)
//! - `union`: varint branch index, then the branch value
//! - `enum`: varint symbol ordinal
//! - `fixed`: raw bytes, length from the schema
//! - `record`: fields in declaration order

mod decoder;
mod encoder;

pub use decoder::decode;
pub use encoder::encode;

use crate::error::RecordError;
use thiserror::Error;

/// Errors produced while encoding or decoding.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Input ended in the middle of a value.
    #[error("truncated input: need {need} bytes at offset {offset}, have {have}")]
    Truncated {
        offset: usize,
        need: usize,
        have: usize,
    },

    /// Varint longer than 10 bytes or overflowing 64 bits.
    #[error("invalid varint at offset {offset}")]
    InvalidVarint { offset: usize },

    /// Negative or oversized length prefix.
    #[error("invalid length {len} at offset {offset}")]
    InvalidLength { offset: usize, len: i64 },

    /// String payload is not UTF-8.
    #[error("invalid UTF-8 at offset {offset}")]
    InvalidUtf8 { offset: usize },

    /// Boolean byte other than 0 / 1.
    #[error("invalid boolean byte {byte:#04x} at offset {offset}")]
    InvalidBoolean { offset: usize, byte: u8 },

    /// Union branch index out of range.
    #[error("union branch {index} out of range ({branches} branches) at offset {offset}")]
    InvalidUnionIndex {
        offset: usize,
        index: i64,
        branches: usize,
    },

    /// Enum ordinal out of range.
    #[error("enum {name} has no symbol {index} (offset {offset})")]
    InvalidEnumIndex {
        offset: usize,
        name: String,
        index: i64,
    },

    /// Too many zero-width collection elements in one input.
    #[error("more than {max} zero-width collection elements (offset {offset})")]
    ElementBudgetExceeded { offset: usize, max: usize },

    /// Map key repeated within one map.
    #[error("duplicate map key {key:?} at offset {offset}")]
    DuplicateKey { offset: usize, key: String },

    /// Nesting exceeded [`MAX_DECODE_DEPTH`](crate::config::MAX_DECODE_DEPTH).
    #[error("nesting deeper than {max} levels")]
    DepthExceeded { max: usize },

    /// Input left over after the top-level record.
    #[error("{remaining} trailing bytes after record")]
    TrailingBytes { remaining: usize },

    /// Record value failed a schema check.
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// Result alias for codec operations.
pub type CodecResult<T> = std::result::Result<T, CodecError>;
