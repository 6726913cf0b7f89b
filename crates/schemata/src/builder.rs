// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Staged record construction.

use crate::canonical::Canonicalizer;
use crate::config::CanonicalOptions;
use crate::error::{RecordError, Result};
use crate::record::Record;
use crate::schema::RecordType;
use crate::value::{Datum, Value};
use std::sync::Arc;

/// Accumulates field assignments for one record type.
///
/// Each slot is unset until a setter stores a canonicalized value.
/// [`build`](Self::build) fills unset slots from defaults (or the union null
/// branch) and produces a [`Record`] whose storage is disjoint from the
/// slots; the slots stay readable afterwards but the builder cannot be
/// reused.
///
/// # Example
///
/// ```rust
/// use schemata::schema::{FieldType, RecordTypeBuilder};
/// use schemata::{RecordBuilder, Value};
/// use std::sync::Arc;
///
/// let pair = Arc::new(
///     RecordTypeBuilder::new("Pair")
///         .field("x", FieldType::Int32)
///         .array_field("y", FieldType::Str)
///         .build()
///         .unwrap(),
/// );
///
/// let mut builder = RecordBuilder::new(&pair);
/// builder.set("x", 10).unwrap().set("y", Value::array(["a", "b"])).unwrap();
/// let record = builder.build().unwrap();
/// assert_eq!(record.get(0).unwrap().as_i32(), Some(10));
/// ```
#[derive(Debug)]
pub struct RecordBuilder {
    schema: Arc<RecordType>,
    slots: Vec<Option<Datum>>,
    canonicalizer: Canonicalizer,
    consumed: bool,
}

impl RecordBuilder {
    /// Create a builder with every slot unset.
    pub fn new(schema: &Arc<RecordType>) -> Self {
        Self {
            schema: schema.clone(),
            slots: vec![None; schema.len()],
            canonicalizer: Canonicalizer::default(),
            consumed: false,
        }
    }

    /// Create a builder seeded from an existing record.
    ///
    /// Every populated field starts set; required fields `record` never
    /// populated stay unset. Collections are copied, nested records and
    /// fixed values stay shared.
    pub fn from_record(record: &Record) -> Self {
        let slots = record
            .values()
            .iter()
            .enumerate()
            .map(|(i, value)| record.is_populated(i).then(|| value.clone()))
            .collect();
        Self {
            schema: record.schema().clone(),
            slots,
            canonicalizer: Canonicalizer::with_options(record.options()),
            consumed: false,
        }
    }

    /// Use `options` for every subsequent assignment.
    pub fn with_options(mut self, options: CanonicalOptions) -> Self {
        self.canonicalizer = Canonicalizer::with_options(options);
        self
    }

    /// Record type being built.
    pub fn schema(&self) -> &Arc<RecordType> {
        &self.schema
    }

    /// Assign field `name`.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self> {
        let index = self.schema.field_by_name(name)?.index();
        self.set_at(index, value)
    }

    /// Assign the field at positional `index`.
    pub fn set_at(&mut self, index: usize, value: impl Into<Value>) -> Result<&mut Self> {
        self.ensure_live()?;
        let field = self.schema.field_at(index)?;
        let path = format!("{}.{}", self.schema.name(), field.name());
        let datum = self
            .canonicalizer
            .canonicalize_at(field.field_type(), &value.into(), &path)?;
        self.slots[index] = Some(datum);
        Ok(self)
    }

    /// Reset field `name` to unset.
    pub fn clear(&mut self, name: &str) -> Result<&mut Self> {
        self.ensure_live()?;
        let index = self.schema.field_by_name(name)?.index();
        self.slots[index] = None;
        Ok(self)
    }

    /// Stored value at `index`, `None` while unset.
    pub fn get(&self, index: usize) -> Result<Option<&Datum>> {
        self.schema.field_at(index)?;
        Ok(self.slots[index].as_ref())
    }

    /// Stored value of field `name`, `None` while unset.
    pub fn get_by_name(&self, name: &str) -> Result<Option<&Datum>> {
        let index = self.schema.field_by_name(name)?.index();
        Ok(self.slots[index].as_ref())
    }

    /// Check if field `name` was assigned.
    pub fn is_set(&self, name: &str) -> Result<bool> {
        Ok(self.get_by_name(name)?.is_some())
    }

    /// Check if [`build`](Self::build) already succeeded.
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Produce the record.
    ///
    /// Unset fields take their default, else the union null branch; a
    /// required field left unset fails with `MissingRequiredField` and
    /// leaves the builder usable.
    pub fn build(&mut self) -> Result<Record> {
        self.ensure_live()?;

        let mut values = Vec::with_capacity(self.slots.len());
        for (slot, field) in self.slots.iter().zip(self.schema.fields()) {
            let value = match slot {
                Some(datum) => datum.clone(),
                None => field.absent_value().ok_or_else(|| {
                    log::debug!(
                        "[builder] {}.{} unset and required",
                        self.schema.name(),
                        field.name()
                    );
                    RecordError::MissingRequiredField {
                        record: self.schema.name().to_string(),
                        field: field.name().to_string(),
                    }
                })?,
            };
            values.push(value);
        }

        self.consumed = true;
        Ok(Record::from_parts(
            self.schema.clone(),
            values,
            self.canonicalizer.options(),
        ))
    }

    fn ensure_live(&self) -> Result<()> {
        if self.consumed {
            return Err(RecordError::BuilderConsumed {
                record: self.schema.name().to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldType, RecordTypeBuilder};

    fn pair() -> Arc<RecordType> {
        Arc::new(
            RecordTypeBuilder::new("Pair")
                .field("x", FieldType::Int32)
                .array_field("y", FieldType::Str)
                .build()
                .unwrap(),
        )
    }

    fn defaults() -> Arc<RecordType> {
        Arc::new(
            RecordTypeBuilder::new("Defaults")
                .field_with_default("count", FieldType::Int64, 3i64)
                .optional_field("note", FieldType::Str)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_set_and_build() {
        let mut b = RecordBuilder::new(&pair());
        b.set("x", 10)
            .unwrap()
            .set("y", Value::array(["a", "b"]))
            .unwrap();
        let r = b.build().unwrap();
        assert_eq!(r.get(0).unwrap().as_i32(), Some(10));
        assert_eq!(r.get(1).unwrap().as_array().map(<[Datum]>::len), Some(2));
    }

    #[test]
    fn test_missing_required_field() {
        let mut b = RecordBuilder::new(&pair());
        b.set("y", Value::array(["a"])).unwrap();
        assert_eq!(
            b.build().unwrap_err(),
            RecordError::MissingRequiredField {
                record: "Pair".into(),
                field: "x".into(),
            }
        );
        // Failed build leaves the builder usable.
        b.set("x", 1).unwrap();
        assert!(b.build().is_ok());
    }

    #[test]
    fn test_defaults_and_null_branch() {
        let mut b = RecordBuilder::new(&defaults());
        let r = b.build().unwrap();
        assert_eq!(r.get(0).unwrap().as_i64(), Some(3));
        assert!(r.get(1).unwrap().is_null());
        assert_eq!(r.get(1).unwrap().union_branch(), Some(0));
    }

    #[test]
    fn test_type_mismatch_has_path() {
        let mut b = RecordBuilder::new(&pair());
        let err = b.set("x", "ten").unwrap_err();
        assert_eq!(err, RecordError::type_mismatch("Pair.x", "int", "string"));
        assert!(!b.is_set("x").unwrap());
    }

    #[test]
    fn test_bad_addressing() {
        let mut b = RecordBuilder::new(&pair());
        assert!(matches!(
            b.set("z", 1),
            Err(RecordError::UnknownField { .. })
        ));
        assert!(matches!(
            b.set_at(2, 1),
            Err(RecordError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(b.get(9).is_err());
    }

    #[test]
    fn test_consumed_after_build() {
        let mut b = RecordBuilder::new(&defaults());
        b.build().unwrap();
        assert!(b.is_consumed());
        assert!(matches!(
            b.set("count", 1i64),
            Err(RecordError::BuilderConsumed { .. })
        ));
        assert!(matches!(b.build(), Err(RecordError::BuilderConsumed { .. })));
    }

    #[test]
    fn test_slots_readable_after_build() {
        let mut b = RecordBuilder::new(&pair());
        b.set("x", 1).unwrap().set("y", Value::array(["a"])).unwrap();
        let mut r = b.build().unwrap();
        r.put(1, Value::array(["changed", "again"])).unwrap();

        let slot = b.get(1).unwrap().unwrap();
        assert_eq!(slot.as_array().map(<[Datum]>::len), Some(1));
    }

    #[test]
    fn test_clear_resets_slot() {
        let mut b = RecordBuilder::new(&defaults());
        b.set("count", 9i64).unwrap();
        assert!(b.is_set("count").unwrap());
        b.clear("count").unwrap();
        assert!(!b.is_set("count").unwrap());
        assert_eq!(b.build().unwrap().get(0).unwrap().as_i64(), Some(3));
    }

    #[test]
    fn test_from_record() {
        let mut b = RecordBuilder::new(&pair());
        b.set("x", 4).unwrap().set("y", Value::array(["a"])).unwrap();
        let original = b.build().unwrap();

        let mut copy = RecordBuilder::from_record(&original);
        copy.set("x", 5).unwrap();
        let modified = copy.build().unwrap();

        assert_eq!(original.get(0).unwrap().as_i32(), Some(4));
        assert_eq!(modified.get(0).unwrap().as_i32(), Some(5));
        assert_eq!(modified.get(1).unwrap().as_array().map(<[Datum]>::len), Some(1));
    }

    #[test]
    fn test_from_incomplete_record() {
        let mut partial = Record::new(&pair());
        partial.put(1, Value::array(["a"])).unwrap();

        let mut b = RecordBuilder::from_record(&partial);
        assert!(!b.is_set("x").unwrap());
        assert!(b.is_set("y").unwrap());
        assert_eq!(
            b.build().unwrap_err(),
            RecordError::MissingRequiredField {
                record: "Pair".into(),
                field: "x".into(),
            }
        );

        b.set("x", 2).unwrap();
        let r = b.build().unwrap();
        assert!(r.validate().is_ok());
        assert_eq!(r.get(0).unwrap().as_i32(), Some(2));
    }
}
