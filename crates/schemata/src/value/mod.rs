// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value representations.
//!
//! - [`Value`]: what callers hand in (external strings, borrowed-then-copied
//!   collections, shared records).
//! - [`Datum`]: what records store after canonicalization.
//! - [`Utf8`]: the one canonical string representation.

mod datum;
mod external;
mod utf8;

pub use datum::Datum;
pub use external::Value;
pub use utf8::Utf8;

use std::fmt;
use std::sync::Arc;

/// Instance of a fixed-size named type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fixed {
    name: Arc<str>,
    bytes: Box<[u8]>,
}

impl Fixed {
    /// Create a fixed value of type `name`.
    pub fn new(name: impl Into<Arc<str>>, bytes: impl Into<Box<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Content bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Symbol of a named enum type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumSymbol {
    type_name: Arc<str>,
    symbol: Arc<str>,
}

impl EnumSymbol {
    /// Create symbol `symbol` of enum type `type_name`.
    pub fn new(type_name: impl Into<Arc<str>>, symbol: impl Into<Arc<str>>) -> Self {
        Self {
            type_name: type_name.into(),
            symbol: symbol.into(),
        }
    }

    /// Enum type name.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl fmt::Display for EnumSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

/// Write `s` as a JSON string literal.
pub(crate) fn write_json_str(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if (c as u32) < 0x20 => write!(f, "\\u{:04x}", c as u32)?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

/// Write raw bytes as a JSON string of code points 0-255.
pub(crate) fn write_json_bytes(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    let text: String = bytes.iter().map(|&b| b as char).collect();
    write_json_str(f, &text)
}
