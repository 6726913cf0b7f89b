// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structural equivalence of canonical values.
//!
//! Comparison is directed by the declared field type, so maps compare by
//! key set and per-key value regardless of iteration order, and union
//! values compare only when both sides sit on the same branch.
//!
//! Floats compare by their total order: `NaN` equals itself and `0.0`
//! differs from `-0.0`.

use crate::error::{RecordError, Result};
use crate::record::Record;
use crate::schema::FieldType;
use crate::value::Datum;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Check if `a` and `b` are equivalent as values of `ty`.
///
/// Fails with `TypeMismatch` only if an operand does not have the shape
/// `ty` declares; every well-typed pair yields `Ok(true)` or `Ok(false)`.
pub fn equivalent(a: &Datum, b: &Datum, ty: &FieldType) -> Result<bool> {
    equivalent_at(a, b, ty, "$")
}

/// Check if two records are equivalent field by field.
///
/// Records of different types are never equivalent.
pub fn records_equivalent(a: &Record, b: &Record) -> Result<bool> {
    if std::ptr::eq(a, b) {
        return Ok(true);
    }
    records_equivalent_at(a, b, a.type_name())
}

fn records_equivalent_at(a: &Record, b: &Record, path: &str) -> Result<bool> {
    if !Arc::ptr_eq(a.schema(), b.schema()) && !a.schema().same_shape(b.schema()) {
        return Ok(false);
    }
    let pairs = a.values().iter().zip(b.values());
    for (i, (field, (x, y))) in a.schema().fields().iter().zip(pairs).enumerate() {
        // Unpopulated slots hold placeholders, not values of the field type.
        match (a.is_populated(i), b.is_populated(i)) {
            (true, true) => {}
            (false, false) => continue,
            _ => return Ok(false),
        }
        let field_path = format!("{}.{}", path, field.name());
        if !equivalent_at(x, y, field.field_type(), &field_path)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn equivalent_at(a: &Datum, b: &Datum, ty: &FieldType, path: &str) -> Result<bool> {
    match ty {
        FieldType::Null => {
            expect(a, ty, path, |d| matches!(d, Datum::Null))?;
            expect(b, ty, path, |d| matches!(d, Datum::Null))?;
            Ok(true)
        }
        FieldType::Boolean => match (a, b) {
            (Datum::Boolean(x), Datum::Boolean(y)) => Ok(x == y),
            _ => Err(operand_mismatch(a, b, ty, path)),
        },
        FieldType::Int32 => match (a, b) {
            (Datum::Int32(x), Datum::Int32(y)) => Ok(x == y),
            _ => Err(operand_mismatch(a, b, ty, path)),
        },
        FieldType::Int64 => match (a, b) {
            (Datum::Int64(x), Datum::Int64(y)) => Ok(x == y),
            _ => Err(operand_mismatch(a, b, ty, path)),
        },
        FieldType::Float32 => match (a, b) {
            (Datum::Float32(x), Datum::Float32(y)) => Ok(x.total_cmp(y).is_eq()),
            _ => Err(operand_mismatch(a, b, ty, path)),
        },
        FieldType::Float64 => match (a, b) {
            (Datum::Float64(x), Datum::Float64(y)) => Ok(x.total_cmp(y).is_eq()),
            _ => Err(operand_mismatch(a, b, ty, path)),
        },
        FieldType::Bytes => match (a, b) {
            (Datum::Bytes(x), Datum::Bytes(y)) => Ok(x == y),
            _ => Err(operand_mismatch(a, b, ty, path)),
        },
        FieldType::Str => match (a, b) {
            (Datum::Str(x), Datum::Str(y)) => Ok(x.as_str() == y.as_str()),
            _ => Err(operand_mismatch(a, b, ty, path)),
        },
        FieldType::Array(elem) => match (a, b) {
            (Datum::Array(xs), Datum::Array(ys)) => {
                if xs.len() != ys.len() {
                    // Still reject ill-typed elements on either side.
                    check_all(xs, elem, path)?;
                    check_all(ys, elem, path)?;
                    return Ok(false);
                }
                for (i, (x, y)) in xs.iter().zip(ys).enumerate() {
                    if !equivalent_at(x, y, elem, &format!("{}[{}]", path, i))? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            _ => Err(operand_mismatch(a, b, ty, path)),
        },
        FieldType::Map(value_ty) => match (a, b) {
            (Datum::Map(xs), Datum::Map(ys)) => {
                if xs.len() != ys.len() {
                    for v in xs.values().chain(ys.values()) {
                        expect(v, value_ty, path, |d| d.conforms(value_ty))?;
                    }
                    return Ok(false);
                }
                for (key, x) in xs {
                    let Some(y) = ys.get(key) else {
                        return Ok(false);
                    };
                    if !equivalent_at(x, y, value_ty, &format!("{}[{:?}]", path, key.as_str()))? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            _ => Err(operand_mismatch(a, b, ty, path)),
        },
        FieldType::Record(name) => match (a, b) {
            (Datum::Record(x), Datum::Record(y))
                if x.type_name() == &**name && y.type_name() == &**name =>
            {
                if Arc::ptr_eq(x, y) {
                    return Ok(true);
                }
                records_equivalent_at(x, y, path)
            }
            _ => Err(operand_mismatch(a, b, ty, path)),
        },
        FieldType::Fixed(_) => {
            expect(a, ty, path, |d| d.conforms(ty))?;
            expect(b, ty, path, |d| d.conforms(ty))?;
            Ok(a.as_fixed().map(|f| f.bytes()) == b.as_fixed().map(|f| f.bytes()))
        }
        FieldType::Enum(_) => {
            expect(a, ty, path, |d| d.conforms(ty))?;
            expect(b, ty, path, |d| d.conforms(ty))?;
            Ok(a.as_enum().map(|e| e.symbol()) == b.as_enum().map(|e| e.symbol()))
        }
        FieldType::Union(branches) => match (a, b) {
            (
                Datum::Union {
                    branch: ba,
                    value: va,
                },
                Datum::Union {
                    branch: bb,
                    value: vb,
                },
            ) => {
                let (Some(ta), Some(tb)) = (branches.get(*ba), branches.get(*bb)) else {
                    return Err(operand_mismatch(a, b, ty, path));
                };
                if ba != bb {
                    expect(va, ta, path, |d| d.conforms(ta))?;
                    expect(vb, tb, path, |d| d.conforms(tb))?;
                    return Ok(false);
                }
                equivalent_at(va, vb, ta, path)
            }
            _ => Err(operand_mismatch(a, b, ty, path)),
        },
    }
}

fn check_all(items: &[Datum], elem: &FieldType, path: &str) -> Result<()> {
    for (i, item) in items.iter().enumerate() {
        expect(item, elem, &format!("{}[{}]", path, i), |d| d.conforms(elem))?;
    }
    Ok(())
}

fn expect(d: &Datum, ty: &FieldType, path: &str, ok: impl Fn(&Datum) -> bool) -> Result<()> {
    if ok(d) {
        Ok(())
    } else {
        Err(RecordError::type_mismatch(path, ty, d.kind_name()))
    }
}

fn operand_mismatch(a: &Datum, b: &Datum, ty: &FieldType, path: &str) -> RecordError {
    let offending = if a.conforms(ty) { b } else { a };
    RecordError::type_mismatch(path, ty, offending.kind_name())
}

// ---------------------------------------------------------------------------
// Hashing
// ---------------------------------------------------------------------------

/// Feed `datum` into `state` consistently with [`equivalent`].
///
/// Map entries are hashed independently and combined with a commutative
/// sum, so iteration order does not affect the result.
pub fn hash_datum<H: Hasher>(datum: &Datum, state: &mut H) {
    std::mem::discriminant(datum).hash(state);
    match datum {
        Datum::Null => {}
        Datum::Boolean(v) => v.hash(state),
        Datum::Int32(v) => v.hash(state),
        Datum::Int64(v) => v.hash(state),
        Datum::Float32(v) => v.to_bits().hash(state),
        Datum::Float64(v) => v.to_bits().hash(state),
        Datum::Bytes(v) => v.hash(state),
        Datum::Str(v) => v.as_str().hash(state),
        Datum::Array(items) => {
            items.len().hash(state);
            for item in items {
                hash_datum(item, state);
            }
        }
        Datum::Map(entries) => {
            entries.len().hash(state);
            let combined = entries.iter().fold(0u64, |acc, (key, value)| {
                let mut entry = DefaultHasher::new();
                key.as_str().hash(&mut entry);
                hash_datum(value, &mut entry);
                acc.wrapping_add(entry.finish())
            });
            combined.hash(state);
        }
        Datum::Record(r) => hash_record(r, state),
        Datum::Fixed(v) => v.bytes().hash(state),
        Datum::Enum(v) => v.symbol().hash(state),
        Datum::Union { branch, value } => {
            branch.hash(state);
            hash_datum(value, state);
        }
    }
}

/// Feed a whole record into `state`.
pub fn hash_record<H: Hasher>(record: &Record, state: &mut H) {
    record.type_name().hash(state);
    for (i, value) in record.values().iter().enumerate() {
        let populated = record.is_populated(i);
        populated.hash(state);
        if populated {
            hash_datum(value, state);
        }
    }
}
