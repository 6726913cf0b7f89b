// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record instances.

use crate::canonical::Canonicalizer;
use crate::config::CanonicalOptions;
use crate::equivalence::{hash_record, records_equivalent};
use crate::error::{RecordError, Result};
use crate::schema::{FieldDescriptor, RecordType};
use crate::value::{write_json_str, Datum, Value};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A frozen, type-checked record.
///
/// Produced by [`RecordBuilder::build`](crate::RecordBuilder::build), by the
/// decoder, or field by field through [`Record::new`] + [`Record::put`].
/// `put` is the only mutation path and canonicalizes exactly like a builder
/// setter.
///
/// Equality and hashing follow the structural equivalence oracle, so two
/// records with the same map contents compare equal regardless of map
/// iteration order.
#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<RecordType>,
    values: Vec<Datum>,
    populated: Vec<bool>,
    options: CanonicalOptions,
}

impl Record {
    /// Create a record for put-only population.
    ///
    /// Fields start at their default or union null branch; required fields
    /// without one stay unpopulated until `put`, which
    /// [`validate`](Self::validate) reports.
    pub fn new(schema: &Arc<RecordType>) -> Self {
        let mut values = Vec::with_capacity(schema.len());
        let mut populated = Vec::with_capacity(schema.len());
        for field in schema.fields() {
            match field.absent_value() {
                Some(value) => {
                    values.push(value);
                    populated.push(true);
                }
                None => {
                    values.push(Datum::Null);
                    populated.push(false);
                }
            }
        }
        Self {
            schema: schema.clone(),
            values,
            populated,
            options: CanonicalOptions::default(),
        }
    }

    pub(crate) fn from_parts(
        schema: Arc<RecordType>,
        values: Vec<Datum>,
        options: CanonicalOptions,
    ) -> Self {
        let populated = vec![true; values.len()];
        Self {
            schema,
            values,
            populated,
            options,
        }
    }

    /// Use `options` for subsequent `put` calls.
    pub fn with_options(mut self, options: CanonicalOptions) -> Self {
        self.options = options;
        self
    }

    /// Record type.
    pub fn schema(&self) -> &Arc<RecordType> {
        &self.schema
    }

    /// Type name.
    pub fn type_name(&self) -> &str {
        self.schema.name()
    }

    /// Canonicalization options used by `put`.
    pub fn options(&self) -> CanonicalOptions {
        self.options
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the record type has no fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All stored values in field order.
    pub fn values(&self) -> &[Datum] {
        &self.values
    }

    /// Check if the field at `index` holds an assigned value rather than
    /// the placeholder of an unpopulated required field.
    pub(crate) fn is_populated(&self, index: usize) -> bool {
        self.populated.get(index).copied().unwrap_or(false)
    }

    /// Iterate `(field, value)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldDescriptor, &Datum)> {
        self.schema.fields().iter().zip(&self.values)
    }

    /// Value at positional `index`.
    pub fn get(&self, index: usize) -> Result<&Datum> {
        self.values.get(index).ok_or(RecordError::IndexOutOfRange {
            index,
            len: self.values.len(),
        })
    }

    /// Value of field `name`.
    pub fn get_by_name(&self, name: &str) -> Result<&Datum> {
        let index = self.schema.field_by_name(name)?.index();
        self.get(index)
    }

    /// String field at `index` as an external `String`, `None` if the
    /// stored value is not a string (e.g. a union on its null branch).
    pub fn get_string(&self, index: usize) -> Result<Option<String>> {
        Ok(self.get(index)?.as_utf8().map(|s| s.to_string()))
    }

    /// Value at `index` in external form.
    pub fn get_value(&self, index: usize) -> Result<Value> {
        Ok(self.get(index)?.to_value())
    }

    /// Replace the value at `index`, canonicalizing it like a builder setter.
    pub fn put(&mut self, index: usize, value: impl Into<Value>) -> Result<()> {
        let field = self.schema.field_at(index)?;
        let path = format!("{}.{}", self.schema.name(), field.name());
        let datum = Canonicalizer::with_options(self.options).canonicalize_at(
            field.field_type(),
            &value.into(),
            &path,
        )?;
        self.values[index] = datum;
        self.populated[index] = true;
        Ok(())
    }

    /// Replace the value of field `name`.
    pub fn put_by_name(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let index = self.schema.field_by_name(name)?.index();
        self.put(index, value)
    }

    /// Store an already-canonical value after a shape check.
    pub(crate) fn put_datum(&mut self, index: usize, datum: Datum) -> Result<()> {
        let field = self.schema.field_at(index)?;
        if !datum.conforms(field.field_type()) {
            return Err(RecordError::type_mismatch(
                format!("{}.{}", self.schema.name(), field.name()),
                field.field_type(),
                datum.kind_name(),
            ));
        }
        self.values[index] = datum;
        self.populated[index] = true;
        Ok(())
    }

    /// Check that every required field was populated.
    pub fn validate(&self) -> Result<()> {
        match self.populated.iter().position(|set| !set) {
            Some(index) => Err(RecordError::MissingRequiredField {
                record: self.schema.name().to_string(),
                field: self.schema.fields()[index].name().to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        records_equivalent(self, other).unwrap_or(false)
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        hash_record(self, state);
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (field, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write_json_str(f, field.name())?;
            write!(f, ": {}", value)?;
        }
        f.write_str("}")
    }
}
