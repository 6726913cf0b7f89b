// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Caller-facing value type.

use crate::record::Record;
use crate::value::{EnumSymbol, Fixed, Utf8};
use std::collections::HashMap;
use std::sync::Arc;

/// A value supplied by (or returned to) a caller.
///
/// Strings are plain `String`s; canonicalization turns them into [`Utf8`].
/// A `Utf8` handed back in is accepted as already canonical. Collections
/// are always copied on assignment; records and fixed values are shared.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Bytes(Arc<[u8]>),
    /// External string.
    Str(String),
    /// Already-canonical string.
    Utf8(Utf8),
    Array(Vec<Value>),
    Map(HashMap<String, Value>),
    Record(Arc<Record>),
    Fixed(Arc<Fixed>),
    Enum(EnumSymbol),
}

impl Value {
    /// Build an array value from anything convertible.
    pub fn array<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self::Array(items.into_iter().map(Into::into).collect())
    }

    /// Build a map value from `(key, value)` pairs.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build a bytes value.
    pub fn bytes(data: impl Into<Arc<[u8]>>) -> Self {
        Self::Bytes(data.into())
    }

    /// Check if value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Short kind name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Int32(_) => "int",
            Self::Int64(_) => "long",
            Self::Float32(_) => "float",
            Self::Float64(_) => "double",
            Self::Bytes(_) => "bytes",
            Self::Str(_) | Self::Utf8(_) => "string",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
            Self::Record(_) => "record",
            Self::Fixed(_) => "fixed",
            Self::Enum(_) => "enum",
        }
    }

    /// Kind name plus the type name for named values.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Record(r) => format!("record {}", r.schema().name()),
            Self::Fixed(f) => format!("fixed {}({})", f.name(), f.len()),
            Self::Enum(e) => format!("enum {}", e.type_name()),
            other => other.kind_name().to_string(),
        }
    }

    /// Try to get as string slice (external or canonical).
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Utf8(u) => Some(u.as_str()),
            _ => None,
        }
    }

    /// Try to get as array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Try to get as map.
    pub fn as_map(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Try to get as record.
    pub fn as_record(&self) -> Option<&Arc<Record>> {
        match self {
            Self::Record(r) => Some(r),
            _ => None,
        }
    }
}

macro_rules! impl_from_scalar {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Self::$variant(v)
            }
        }
    };
}

impl_from_scalar!(bool, Boolean);
impl_from_scalar!(i32, Int32);
impl_from_scalar!(i64, Int64);
impl_from_scalar!(f32, Float32);
impl_from_scalar!(f64, Float64);
impl_from_scalar!(String, Str);
impl_from_scalar!(Utf8, Utf8);
impl_from_scalar!(Vec<Value>, Array);
impl_from_scalar!(HashMap<String, Value>, Map);
impl_from_scalar!(Arc<Record>, Record);
impl_from_scalar!(Arc<Fixed>, Fixed);
impl_from_scalar!(EnumSymbol, Enum);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Self::Str(v.clone())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v.into())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.into())
    }
}

impl From<Record> for Value {
    fn from(v: Record) -> Self {
        Self::Record(Arc::new(v))
    }
}

impl From<Fixed> for Value {
    fn from(v: Fixed) -> Self {
        Self::Fixed(Arc::new(v))
    }
}

impl From<&Value> for Value {
    fn from(v: &Value) -> Self {
        v.clone()
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
