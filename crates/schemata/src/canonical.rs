// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Canonicalization of external values into stored [`Datum`]s.
//!
//! Every assignment (builder setter, `Record::put`, declared defaults) runs
//! through here. The field type's [`CopyPolicy`] decides what happens:
//!
//! - **PassThrough**: kind check only.
//! - **Convert**: strings become [`Utf8`]; an existing `Utf8` is shared.
//! - **DeepCopy**: a fresh owned array / map, elements canonicalized.
//! - **Retain**: records and fixed values are kept by reference.
//! - **Resolve**: pick a union branch, then apply that branch's policy.

use crate::config::CanonicalOptions;
use crate::error::{RecordError, Result};
use crate::schema::{CopyPolicy, FieldType};
use crate::value::{Datum, Utf8, Value};
use std::collections::HashMap;

/// Converts external [`Value`]s into canonical [`Datum`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct Canonicalizer {
    options: CanonicalOptions,
}

impl Canonicalizer {
    /// Canonicalizer with explicit options.
    pub fn with_options(options: CanonicalOptions) -> Self {
        Self { options }
    }

    /// Active options.
    pub fn options(&self) -> CanonicalOptions {
        self.options
    }

    /// Canonicalize `value` against `ty`.
    pub fn canonicalize(&self, ty: &FieldType, value: &Value) -> Result<Datum> {
        self.canonicalize_at(ty, value, "$")
    }

    /// Canonicalize `value` against `ty`, reporting errors at `path`.
    pub fn canonicalize_at(&self, ty: &FieldType, value: &Value, path: &str) -> Result<Datum> {
        match ty.copy_policy() {
            CopyPolicy::PassThrough => pass_through(ty, value, path),
            CopyPolicy::Convert => convert(ty, value, path),
            CopyPolicy::DeepCopy => self.deep_copy(ty, value, path),
            CopyPolicy::Retain => retain(ty, value, path),
            CopyPolicy::Resolve => self.resolve(ty, value, path),
        }
    }

    fn deep_copy(&self, ty: &FieldType, value: &Value, path: &str) -> Result<Datum> {
        match (ty, value) {
            (FieldType::Array(elem), Value::Array(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{}[{}]", path, i);
                    out.push(self.canonicalize_at(elem, item, &item_path)?);
                }
                Ok(Datum::Array(out))
            }
            (FieldType::Map(value_ty), Value::Map(entries)) => {
                let mut out = HashMap::with_capacity(entries.len());
                for (key, item) in entries {
                    let item_path = format!("{}[{:?}]", path, key);
                    out.insert(
                        Utf8::new(key),
                        self.canonicalize_at(value_ty, item, &item_path)?,
                    );
                }
                Ok(Datum::Map(out))
            }
            _ => Err(mismatch(ty, value, path)),
        }
    }

    fn resolve(&self, ty: &FieldType, value: &Value, path: &str) -> Result<Datum> {
        let FieldType::Union(branches) = ty else {
            return Err(mismatch(ty, value, path));
        };

        if self.options.collapse_empty_collections && is_empty_collection(value) {
            if let Some(null) = ty.null_branch() {
                log::trace!("[canonical] {} empty collection collapsed to null", path);
                return Ok(Datum::union(null, Datum::Null));
            }
        }

        let branch = resolve_branch(branches, value).ok_or_else(|| {
            log::debug!("[canonical] {} no branch of {} accepts {}", path, ty, value.describe());
            RecordError::UnionResolution {
                path: path.to_string(),
                found: value.describe(),
                branches: ty.to_string(),
            }
        })?;
        log::trace!("[canonical] {} resolved to branch {} of {}", path, branch, ty);

        let inner = self.canonicalize_at(&branches[branch], value, path)?;
        Ok(Datum::union(branch, inner))
    }
}

/// Canonicalize with default options.
pub fn canonicalize(ty: &FieldType, value: &Value) -> Result<Datum> {
    Canonicalizer::default().canonicalize(ty, value)
}

/// Pick the union branch for `value`.
///
/// Branches are tried in declaration order. Scalars need an exact kind
/// match (an `Int32` never selects `Int64`). Arrays and maps select the
/// first branch of the same shape whose element type accepts every
/// element, so an empty collection lands on the first collection branch of
/// its shape. Records, fixed values and enums select by type name.
pub fn resolve_branch(branches: &[FieldType], value: &Value) -> Option<usize> {
    branches.iter().position(|branch| accepts(branch, value))
}

/// Check if `value` canonicalizes against `ty` without error.
pub fn accepts(ty: &FieldType, value: &Value) -> bool {
    match (ty, value) {
        (FieldType::Null, Value::Null)
        | (FieldType::Boolean, Value::Boolean(_))
        | (FieldType::Int32, Value::Int32(_))
        | (FieldType::Int64, Value::Int64(_))
        | (FieldType::Float32, Value::Float32(_))
        | (FieldType::Float64, Value::Float64(_))
        | (FieldType::Bytes, Value::Bytes(_))
        | (FieldType::Str, Value::Str(_) | Value::Utf8(_)) => true,
        (FieldType::Array(elem), Value::Array(items)) => {
            items.iter().all(|item| accepts(elem, item))
        }
        (FieldType::Map(value_ty), Value::Map(entries)) => {
            entries.values().all(|item| accepts(value_ty, item))
        }
        (FieldType::Record(name), Value::Record(r)) => r.schema().name() == &**name,
        (FieldType::Fixed(f), Value::Fixed(v)) => v.name() == &*f.name && v.len() == f.size,
        (FieldType::Enum(e), Value::Enum(v)) => {
            v.type_name() == &*e.name && e.ordinal(v.symbol()).is_some()
        }
        (FieldType::Union(branches), _) => resolve_branch(branches, value).is_some(),
        _ => false,
    }
}

fn pass_through(ty: &FieldType, value: &Value, path: &str) -> Result<Datum> {
    match (ty, value) {
        (FieldType::Null, Value::Null) => Ok(Datum::Null),
        (FieldType::Boolean, Value::Boolean(v)) => Ok(Datum::Boolean(*v)),
        (FieldType::Int32, Value::Int32(v)) => Ok(Datum::Int32(*v)),
        (FieldType::Int64, Value::Int64(v)) => Ok(Datum::Int64(*v)),
        (FieldType::Float32, Value::Float32(v)) => Ok(Datum::Float32(*v)),
        (FieldType::Float64, Value::Float64(v)) => Ok(Datum::Float64(*v)),
        (FieldType::Bytes, Value::Bytes(v)) => Ok(Datum::Bytes(v.clone())),
        (FieldType::Enum(e), Value::Enum(v)) if v.type_name() == &*e.name => {
            if e.ordinal(v.symbol()).is_some() {
                Ok(Datum::Enum(v.clone()))
            } else {
                Err(RecordError::type_mismatch(
                    path,
                    ty,
                    format!("unknown symbol {}", v.symbol()),
                ))
            }
        }
        _ => Err(mismatch(ty, value, path)),
    }
}

fn convert(ty: &FieldType, value: &Value, path: &str) -> Result<Datum> {
    match value {
        Value::Utf8(u) => Ok(Datum::Str(u.clone())),
        Value::Str(s) => Ok(Datum::Str(Utf8::new(s))),
        _ => Err(mismatch(ty, value, path)),
    }
}

fn retain(ty: &FieldType, value: &Value, path: &str) -> Result<Datum> {
    match (ty, value) {
        (FieldType::Record(name), Value::Record(r)) if r.schema().name() == &**name => {
            Ok(Datum::Record(r.clone()))
        }
        (FieldType::Fixed(f), Value::Fixed(v)) if v.name() == &*f.name && v.len() == f.size => {
            Ok(Datum::Fixed(v.clone()))
        }
        _ => Err(mismatch(ty, value, path)),
    }
}

fn is_empty_collection(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.is_empty(),
        Value::Map(entries) => entries.is_empty(),
        _ => false,
    }
}

fn mismatch(ty: &FieldType, value: &Value, path: &str) -> RecordError {
    RecordError::type_mismatch(path, ty, value.describe())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::schema::{RecordType, RecordTypeBuilder};
    use crate::value::{EnumSymbol, Fixed};
    use std::sync::Arc;

    fn point() -> Arc<RecordType> {
        Arc::new(
            RecordTypeBuilder::new("Point")
                .field("x", FieldType::Int32)
                .build()
                .unwrap(),
        )
    }

    fn point_value(x: i32) -> Arc<Record> {
        let mut r = Record::new(&point());
        r.put(0, x).unwrap();
        Arc::new(r)
    }

    #[test]
    fn test_scalars_pass_through() {
        let c = Canonicalizer::default();
        assert!(matches!(
            c.canonicalize(&FieldType::Int32, &Value::Int32(5)),
            Ok(Datum::Int32(5))
        ));
        assert!(matches!(
            c.canonicalize(&FieldType::Boolean, &Value::Boolean(true)),
            Ok(Datum::Boolean(true))
        ));
    }

    #[test]
    fn test_no_numeric_widening() {
        let err = canonicalize(&FieldType::Int64, &Value::Int32(5)).unwrap_err();
        assert_eq!(err, RecordError::type_mismatch("$", "long", "int"));
    }

    #[test]
    fn test_string_converted() {
        let d = canonicalize(&FieldType::Str, &Value::from("hello")).unwrap();
        assert_eq!(d.as_utf8().map(Utf8::as_str), Some("hello"));
    }

    #[test]
    fn test_utf8_reused() {
        let u = Utf8::new("shared");
        let d = canonicalize(&FieldType::Str, &Value::Utf8(u.clone())).unwrap();
        assert!(d.as_utf8().is_some_and(|s| Utf8::ptr_eq(s, &u)));
    }

    #[test]
    fn test_array_fresh_copy() {
        let mut source = vec![Value::from("a"), Value::from("b")];
        let d = canonicalize(&FieldType::array(FieldType::Str), &Value::Array(source.clone()))
            .unwrap();
        source.push(Value::from("c"));
        assert_eq!(d.as_array().map(<[Datum]>::len), Some(2));
        assert!(d.as_array().unwrap().iter().all(|e| e.as_utf8().is_some()));
    }

    #[test]
    fn test_map_keys_canonical() {
        let d = canonicalize(
            &FieldType::map(FieldType::Int64),
            &Value::map([("a", 1i64), ("b", 2i64)]),
        )
        .unwrap();
        let map = d.as_map().unwrap();
        assert_eq!(map.get("a").and_then(Datum::as_i64), Some(1));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_error_path_into_collections() {
        let err = Canonicalizer::default()
            .canonicalize_at(
                &FieldType::array(FieldType::map(FieldType::Int32)),
                &Value::array([Value::map([("k", 1i32)]), Value::map([("bad", "x")])]),
                "Holder.items",
            )
            .unwrap_err();
        assert_eq!(
            err,
            RecordError::type_mismatch("Holder.items[1][\"bad\"]", "int", "string")
        );
    }

    #[test]
    fn test_record_retained() {
        let p = point_value(3);
        let d = canonicalize(&FieldType::record("Point"), &Value::Record(p.clone())).unwrap();
        assert!(Arc::ptr_eq(d.as_record().unwrap(), &p));

        let err = canonicalize(&FieldType::record("Other"), &Value::Record(p)).unwrap_err();
        assert!(matches!(err, RecordError::TypeMismatch { .. }));
    }

    #[test]
    fn test_fixed_and_enum_checked() {
        let ty = FieldType::fixed("Md5", 16);
        let good = Arc::new(Fixed::new("Md5", vec![0u8; 16]));
        let d = canonicalize(&ty, &Value::Fixed(good.clone())).unwrap();
        assert!(Arc::ptr_eq(d.as_fixed().unwrap(), &good));
        assert!(canonicalize(&ty, &Value::from(Fixed::new("Md5", vec![0u8; 4]))).is_err());

        let suit = FieldType::enumeration("Suit", ["HEARTS", "SPADES"]);
        assert!(canonicalize(&suit, &Value::Enum(EnumSymbol::new("Suit", "SPADES"))).is_ok());
        assert!(canonicalize(&suit, &Value::Enum(EnumSymbol::new("Suit", "CLUBS"))).is_err());
    }

    #[test]
    fn test_union_declaration_order() {
        let ty = FieldType::union(vec![FieldType::Null, FieldType::Int32, FieldType::Int64]);
        let d = canonicalize(&ty, &Value::Int64(7)).unwrap();
        assert_eq!(d.union_branch(), Some(2));
        let d = canonicalize(&ty, &Value::Int32(7)).unwrap();
        assert_eq!(d.union_branch(), Some(1));
        let d = canonicalize(&ty, &Value::Null).unwrap();
        assert_eq!(d.union_branch(), Some(0));
    }

    #[test]
    fn test_union_deterministic() {
        let ty = FieldType::union(vec![
            FieldType::array(FieldType::Int32),
            FieldType::array(FieldType::Str),
        ]);
        let value = Value::array(["x", "y"]);
        let first = canonicalize(&ty, &value).unwrap().union_branch();
        for _ in 0..10 {
            assert_eq!(canonicalize(&ty, &value).unwrap().union_branch(), first);
        }
        assert_eq!(first, Some(1));
    }

    #[test]
    fn test_empty_collection_first_branch_of_shape() {
        let ty = FieldType::union(vec![
            FieldType::Null,
            FieldType::map(FieldType::Int32),
            FieldType::array(FieldType::Int32),
            FieldType::array(FieldType::Str),
        ]);
        let d = canonicalize(&ty, &Value::Array(Vec::new())).unwrap();
        assert_eq!(d.union_branch(), Some(2));
        let d = canonicalize(&ty, &Value::Map(HashMap::new())).unwrap();
        assert_eq!(d.union_branch(), Some(1));
    }

    #[test]
    fn test_collapse_empty_collections() {
        let ty = FieldType::optional(FieldType::array(FieldType::Str));
        let c = Canonicalizer::with_options(CanonicalOptions::collapsing());
        let d = c.canonicalize(&ty, &Value::Array(Vec::new())).unwrap();
        assert_eq!(d.union_branch(), Some(0));
        assert!(d.is_null());

        let d = c.canonicalize(&ty, &Value::array(["a"])).unwrap();
        assert_eq!(d.union_branch(), Some(1));
    }

    #[test]
    fn test_union_without_match() {
        let ty = FieldType::optional(FieldType::Int32);
        let err = canonicalize(&ty, &Value::from("nope")).unwrap_err();
        assert_eq!(
            err,
            RecordError::UnionResolution {
                path: "$".into(),
                found: "string".into(),
                branches: "[null, int]".into(),
            }
        );
    }

    #[test]
    fn test_union_selects_record_by_name() {
        let ty = FieldType::union(vec![FieldType::Null, FieldType::record("Point")]);
        let d = canonicalize(&ty, &Value::Record(point_value(1))).unwrap();
        assert_eq!(d.union_branch(), Some(1));
    }
}
