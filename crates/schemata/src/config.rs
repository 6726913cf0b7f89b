// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Global limits and runtime options.
//!
//! - **Static**: decode limits and generator defaults. Never hardcode these
//!   elsewhere.
//! - **Runtime**: [`CanonicalOptions`], carried by builders and records.

/// Maximum nesting depth accepted by the decoder (records, collections and
/// unions each count as one level).
pub const MAX_DECODE_DEPTH: usize = 64;

/// Maximum element count of a single decoded array or map.
///
/// Guards against allocation bombs from corrupt length prefixes.
pub const MAX_COLLECTION_LEN: usize = 1 << 24;

/// Maximum number of zero-width collection elements (`null`, empty
/// `fixed`, records without encoded content) in one decode, summed over
/// every nested collection. Other elements are bounded by the input size.
pub const MAX_ZERO_WIDTH_ELEMENTS: usize = 1 << 20;

/// Maximum decoded length of a single `bytes` / `string` value.
pub const MAX_BLOB_LEN: usize = 1 << 28;

/// Default upper bound on generated collection lengths.
pub const DEFAULT_GEN_COLLECTION_LEN: usize = 4;

/// Default generator recursion depth before falling back to null branches.
pub const DEFAULT_GEN_MAX_DEPTH: usize = 8;

/// Options applied by the canonicalizer on every assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanonicalOptions {
    /// When set, an empty array or map assigned to a union that has a
    /// `null` branch is stored as that null branch instead of an empty
    /// collection.
    pub collapse_empty_collections: bool,
}

impl CanonicalOptions {
    /// Options with empty-collection collapsing enabled.
    pub fn collapsing() -> Self {
        Self {
            collapse_empty_collections: true,
        }
    }
}
