// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Canonical stored values.

use crate::record::Record;
use crate::schema::FieldType;
use crate::value::{write_json_bytes, write_json_str, EnumSymbol, Fixed, Utf8, Value};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A canonicalized value as stored in builders and records.
///
/// Union values keep the branch they were resolved to at assignment time.
/// Equality is structural and type-directed; see
/// [`equivalent`](crate::equivalence::equivalent).
#[derive(Debug, Clone)]
pub enum Datum {
    Null,
    Boolean(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Bytes(Arc<[u8]>),
    Str(Utf8),
    Array(Vec<Datum>),
    Map(HashMap<Utf8, Datum>),
    Record(Arc<Record>),
    Fixed(Arc<Fixed>),
    Enum(EnumSymbol),
    /// Value resolved to union branch `branch`.
    Union { branch: usize, value: Box<Datum> },
}

impl Datum {
    /// Wrap `value` as union branch `branch`.
    pub fn union(branch: usize, value: Datum) -> Self {
        Self::Union {
            branch,
            value: Box::new(value),
        }
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
            Self::Str(_) => "string",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
            Self::Record(_) => "record",
            Self::Fixed(_) => "fixed",
            Self::Enum(_) => "enum",
            Self::Union { .. } => "union",
        }
    }

    /// Branch index if this is a union value.
    pub fn union_branch(&self) -> Option<usize> {
        match self {
            Self::Union { branch, .. } => Some(*branch),
            _ => None,
        }
    }

    /// The value with any union wrapping removed.
    pub fn resolved(&self) -> &Datum {
        match self {
            Self::Union { value, .. } => value.resolved(),
            other => other,
        }
    }

    /// Check if the (resolved) value is null.
    pub fn is_null(&self) -> bool {
        matches!(self.resolved(), Self::Null)
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self.resolved() {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i32.
    pub fn as_i32(&self) -> Option<i32> {
        match self.resolved() {
            Self::Int32(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self.resolved() {
            Self::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f32.
    pub fn as_f32(&self) -> Option<f32> {
        match self.resolved() {
            Self::Float32(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self.resolved() {
            Self::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as bytes.
    pub fn as_bytes(&self) -> Option<&Arc<[u8]>> {
        match self.resolved() {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as canonical string.
    pub fn as_utf8(&self) -> Option<&Utf8> {
        match self.resolved() {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as array.
    pub fn as_array(&self) -> Option<&[Datum]> {
        match self.resolved() {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as map.
    pub fn as_map(&self) -> Option<&HashMap<Utf8, Datum>> {
        match self.resolved() {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as nested record.
    pub fn as_record(&self) -> Option<&Arc<Record>> {
        match self.resolved() {
            Self::Record(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as fixed.
    pub fn as_fixed(&self) -> Option<&Arc<Fixed>> {
        match self.resolved() {
            Self::Fixed(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as enum symbol.
    pub fn as_enum(&self) -> Option<&EnumSymbol> {
        match self.resolved() {
            Self::Enum(v) => Some(v),
            _ => None,
        }
    }

    /// Convert to the external representation.
    ///
    /// Canonical strings become `String`s (including map keys and nested
    /// collection elements); union tags are dropped; records and fixed
    /// values stay shared.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Boolean(v) => Value::Boolean(*v),
            Self::Int32(v) => Value::Int32(*v),
            Self::Int64(v) => Value::Int64(*v),
            Self::Float32(v) => Value::Float32(*v),
            Self::Float64(v) => Value::Float64(*v),
            Self::Bytes(v) => Value::Bytes(v.clone()),
            Self::Str(v) => Value::Str(v.to_string()),
            Self::Array(items) => Value::Array(items.iter().map(Datum::to_value).collect()),
            Self::Map(entries) => Value::Map(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_value()))
                    .collect(),
            ),
            Self::Record(r) => Value::Record(r.clone()),
            Self::Fixed(f) => Value::Fixed(f.clone()),
            Self::Enum(e) => Value::Enum(e.clone()),
            Self::Union { value, .. } => value.to_value(),
        }
    }

    /// Check if this value has the shape `ty` declares.
    ///
    /// Shallow for nested records (their own fields were checked when they
    /// were built).
    pub fn conforms(&self, ty: &FieldType) -> bool {
        match (ty, self) {
            (FieldType::Null, Self::Null)
            | (FieldType::Boolean, Self::Boolean(_))
            | (FieldType::Int32, Self::Int32(_))
            | (FieldType::Int64, Self::Int64(_))
            | (FieldType::Float32, Self::Float32(_))
            | (FieldType::Float64, Self::Float64(_))
            | (FieldType::Bytes, Self::Bytes(_))
            | (FieldType::Str, Self::Str(_)) => true,
            (FieldType::Array(elem), Self::Array(items)) => {
                items.iter().all(|item| item.conforms(elem))
            }
            (FieldType::Map(value), Self::Map(entries)) => {
                entries.values().all(|v| v.conforms(value))
            }
            (FieldType::Record(name), Self::Record(r)) => r.schema().name() == &**name,
            (FieldType::Fixed(f), Self::Fixed(v)) => v.name() == &*f.name && v.len() == f.size,
            (FieldType::Enum(e), Self::Enum(v)) => {
                v.type_name() == &*e.name && e.ordinal(v.symbol()).is_some()
            }
            (FieldType::Union(branches), Self::Union { branch, value }) => branches
                .get(*branch)
                .is_some_and(|b| value.conforms(b)),
            _ => false,
        }
    }
}

impl From<Utf8> for Datum {
    fn from(v: Utf8) -> Self {
        Self::Str(v)
    }
}

impl From<i32> for Datum {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<i64> for Datum {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<bool> for Datum {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean(v) => write!(f, "{}", v),
            Self::Int32(v) => write!(f, "{}", v),
            Self::Int64(v) => write!(f, "{}", v),
            Self::Float32(v) => write!(f, "{}", v),
            Self::Float64(v) => write!(f, "{}", v),
            Self::Bytes(v) => write_json_bytes(f, v),
            Self::Str(v) => write_json_str(f, v),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Self::Map(entries) => {
                // Sorted so the rendering is deterministic.
                let mut keys: Vec<&Utf8> = entries.keys().collect();
                keys.sort();
                f.write_str("{")?;
                for (i, key) in keys.into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_json_str(f, key)?;
                    write!(f, ": {}", entries[key])?;
                }
                f.write_str("}")
            }
            Self::Record(r) => write!(f, "{}", r),
            Self::Fixed(v) => write_json_bytes(f, v.bytes()),
            Self::Enum(v) => write_json_str(f, v.symbol()),
            Self::Union { value, .. } => write!(f, "{}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_look_through_unions() {
        let d = Datum::union(1, Datum::Int32(7));
        assert_eq!(d.union_branch(), Some(1));
        assert_eq!(d.as_i32(), Some(7));
        assert_eq!(d.as_i64(), None);
        assert!(!d.is_null());
        assert!(Datum::union(0, Datum::Null).is_null());
    }

    #[test]
    fn test_to_value_converts_strings() {
        let d = Datum::Array(vec![Datum::Str(Utf8::new("a")), Datum::Str(Utf8::new("b"))]);
        match d.to_value() {
            Value::Array(items) => {
                assert!(items.iter().all(|v| matches!(v, Value::Str(_))));
            }
            other => panic!("expected array, got {:?}", other),
        }
    }

    #[test]
    fn test_conforms() {
        let ty = FieldType::optional(FieldType::array(FieldType::Str));
        let ok = Datum::union(1, Datum::Array(vec![Datum::Str(Utf8::new("x"))]));
        let wrong_branch = Datum::union(0, Datum::Array(vec![]));
        let bad_elem = Datum::union(1, Datum::Array(vec![Datum::Int32(1)]));
        assert!(ok.conforms(&ty));
        assert!(!wrong_branch.conforms(&ty));
        assert!(!bad_elem.conforms(&ty));
        assert!(!Datum::Int32(1).conforms(&ty));
    }

    #[test]
    fn test_display_sorted_map() {
        let mut map = HashMap::new();
        map.insert(Utf8::new("b"), Datum::Int32(2));
        map.insert(Utf8::new("a"), Datum::Int32(1));
        assert_eq!(Datum::Map(map).to_string(), r#"{"a": 1, "b": 2}"#);
    }

    #[test]
    fn test_display_escapes() {
        let d = Datum::Str(Utf8::new("say \"hi\"\n"));
        assert_eq!(d.to_string(), r#""say \"hi\"\n""#);
    }
}
