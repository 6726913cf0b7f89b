// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Field type variants.

use crate::error::{RecordError, Result};
use std::fmt;
use std::sync::Arc;

/// Closed set of field types.
///
/// Records are referenced by name and resolved through the
/// [`TypeRegistry`](crate::schema::TypeRegistry), which allows recursive
/// types. Map keys are always strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Null,
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    Bytes,
    Str,
    /// Reference to a named record type.
    Record(Arc<str>),
    /// Ordered sequence.
    Array(Box<FieldType>),
    /// String-keyed mapping.
    Map(Box<FieldType>),
    /// Ordered alternatives, resolved in declaration order.
    Union(Vec<FieldType>),
    /// Fixed-size named blob.
    Fixed(FixedSchema),
    /// Named symbol set.
    Enum(EnumSchema),
}

/// How the canonicalizer treats a value assigned to a field type.
///
/// Copy-vs-reference is decided once per type here instead of by runtime
/// checks scattered through the canonicalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyPolicy {
    /// Scalar: kind check, value moves through untouched.
    PassThrough,
    /// External string converted into the canonical [`Utf8`](crate::Utf8).
    Convert,
    /// Collection: a fresh owned container is allocated.
    DeepCopy,
    /// Shared immutable value: the reference itself is kept.
    Retain,
    /// Union: resolve the branch, then apply that branch's policy.
    Resolve,
}

impl FieldType {
    /// Array of `elem`.
    pub fn array(elem: FieldType) -> Self {
        Self::Array(Box::new(elem))
    }

    /// Map with values of type `value`.
    pub fn map(value: FieldType) -> Self {
        Self::Map(Box::new(value))
    }

    /// Reference to the record type called `name`.
    pub fn record(name: impl Into<Arc<str>>) -> Self {
        Self::Record(name.into())
    }

    /// Union of `branches`.
    pub fn union(branches: Vec<FieldType>) -> Self {
        Self::Union(branches)
    }

    /// `[null, inner]`, the usual optional field shape.
    pub fn optional(inner: FieldType) -> Self {
        Self::Union(vec![Self::Null, inner])
    }

    /// Fixed type of `size` bytes.
    pub fn fixed(name: impl Into<Arc<str>>, size: usize) -> Self {
        Self::Fixed(FixedSchema::new(name, size))
    }

    /// Enum type with the given symbols.
    pub fn enumeration<I, S>(name: impl Into<Arc<str>>, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        Self::Enum(EnumSchema::new(name, symbols))
    }

    /// Copy policy applied when a value is assigned to this type.
    pub fn copy_policy(&self) -> CopyPolicy {
        match self {
            Self::Null
            | Self::Boolean
            | Self::Int32
            | Self::Int64
            | Self::Float32
            | Self::Float64
            | Self::Bytes
            | Self::Enum(_) => CopyPolicy::PassThrough,
            Self::Str => CopyPolicy::Convert,
            Self::Array(_) | Self::Map(_) => CopyPolicy::DeepCopy,
            Self::Record(_) | Self::Fixed(_) => CopyPolicy::Retain,
            Self::Union(_) => CopyPolicy::Resolve,
        }
    }

    /// Short kind name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Int32 => "int",
            Self::Int64 => "long",
            Self::Float32 => "float",
            Self::Float64 => "double",
            Self::Bytes => "bytes",
            Self::Str => "string",
            Self::Record(_) => "record",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
            Self::Union(_) => "union",
            Self::Fixed(_) => "fixed",
            Self::Enum(_) => "enum",
        }
    }

    /// Name of a named type (record, fixed, enum).
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Record(name) => Some(&**name),
            Self::Fixed(f) => Some(&*f.name),
            Self::Enum(e) => Some(&*e.name),
            _ => None,
        }
    }

    /// Index of the `null` branch if this is a union that has one.
    pub fn null_branch(&self) -> Option<usize> {
        match self {
            Self::Union(branches) => branches.iter().position(|b| *b == Self::Null),
            _ => None,
        }
    }

    /// Check if absence of a value can be represented (`null` or a union
    /// with a `null` branch).
    pub fn is_nullable(&self) -> bool {
        *self == Self::Null || self.null_branch().is_some()
    }

    /// Visit every record name referenced by this type.
    pub fn for_each_record_ref<'a>(&'a self, f: &mut dyn FnMut(&'a str)) {
        match self {
            Self::Record(name) => f(&**name),
            Self::Array(elem) | Self::Map(elem) => elem.for_each_record_ref(f),
            Self::Union(branches) => {
                for branch in branches {
                    branch.for_each_record_ref(f);
                }
            }
            _ => {}
        }
    }

    /// Validate structural rules: union branches pairwise distinct, no
    /// directly nested unions, no duplicate named branches, sane fixed and
    /// enum declarations.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Array(elem) | Self::Map(elem) => elem.validate(),
            Self::Union(branches) => {
                if branches.is_empty() {
                    return Err(RecordError::InvalidSchema("union has no branches".into()));
                }
                for (i, branch) in branches.iter().enumerate() {
                    if matches!(branch, Self::Union(_)) {
                        return Err(RecordError::InvalidSchema(format!(
                            "union {} directly contains another union",
                            self
                        )));
                    }
                    for other in &branches[..i] {
                        if other == branch || named_clash(other, branch) {
                            return Err(RecordError::InvalidSchema(format!(
                                "union {} has ambiguous branches {} and {}",
                                self, other, branch
                            )));
                        }
                    }
                    branch.validate()?;
                }
                Ok(())
            }
            Self::Fixed(f) if f.name.is_empty() => {
                Err(RecordError::InvalidSchema("fixed type without a name".into()))
            }
            Self::Enum(e) => e.validate(),
            _ => Ok(()),
        }
    }
}

// Two named branches of the same kind and name accept the same values.
fn named_clash(a: &FieldType, b: &FieldType) -> bool {
    match (a, b) {
        (FieldType::Record(x), FieldType::Record(y)) => x == y,
        (FieldType::Fixed(x), FieldType::Fixed(y)) => x.name == y.name,
        (FieldType::Enum(x), FieldType::Enum(y)) => x.name == y.name,
        _ => false,
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record(name) => write!(f, "{}", name),
            Self::Array(elem) => write!(f, "array<{}>", elem),
            Self::Map(value) => write!(f, "map<{}>", value),
            Self::Union(branches) => {
                write!(f, "[")?;
                for (i, branch) in branches.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", branch)?;
                }
                write!(f, "]")
            }
            Self::Fixed(fixed) => write!(f, "fixed {}({})", fixed.name, fixed.size),
            Self::Enum(e) => write!(f, "enum {}", e.name),
            other => f.write_str(other.kind_name()),
        }
    }
}

/// Fixed-size blob declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixedSchema {
    /// Type name.
    pub name: Arc<str>,
    /// Exact length in bytes.
    pub size: usize,
}

impl FixedSchema {
    /// Create fixed declaration.
    pub fn new(name: impl Into<Arc<str>>, size: usize) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Enumeration declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumSchema {
    /// Type name.
    pub name: Arc<str>,
    /// Symbols in ordinal order.
    pub symbols: Vec<Arc<str>>,
}

impl EnumSchema {
    /// Create enum declaration.
    pub fn new<I, S>(name: impl Into<Arc<str>>, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        Self {
            name: name.into(),
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    /// Ordinal of `symbol`.
    pub fn ordinal(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| &**s == symbol)
    }

    /// Symbol at `ordinal`.
    pub fn symbol(&self, ordinal: usize) -> Option<&Arc<str>> {
        self.symbols.get(ordinal)
    }

    fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(RecordError::InvalidSchema("enum type without a name".into()));
        }
        if self.symbols.is_empty() {
            return Err(RecordError::InvalidSchema(format!(
                "enum {} has no symbols",
                self.name
            )));
        }
        for (i, symbol) in self.symbols.iter().enumerate() {
            if self.symbols[..i].contains(symbol) {
                return Err(RecordError::InvalidSchema(format!(
                    "enum {} repeats symbol {}",
                    self.name, symbol
                )));
            }
        }
        Ok(())
    }
}
