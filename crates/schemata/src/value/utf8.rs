// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Canonical string representation.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Canonical internal string.
///
/// Every stored string is a `Utf8`: an immutable, shared UTF-8 buffer.
/// Cloning shares the buffer, so an already-canonical string can be reused
/// by reference. Callers get a `String` back through [`Utf8::to_string`] or
/// `String::from`, never the internal buffer itself.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Utf8(Arc<str>);

impl Utf8 {
    /// Copy `s` into a fresh canonical buffer.
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// View as `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw UTF-8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if both values share the same buffer.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl Deref for Utf8 {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Utf8 {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Utf8 {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Utf8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Utf8({:?})", &*self.0)
    }
}

impl fmt::Display for Utf8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Utf8 {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Utf8 {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl From<&String> for Utf8 {
    fn from(s: &String) -> Self {
        Self::new(s)
    }
}

impl From<Utf8> for String {
    fn from(u: Utf8) -> Self {
        u.0.to_string()
    }
}

impl PartialEq<str> for Utf8 {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Utf8 {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}
