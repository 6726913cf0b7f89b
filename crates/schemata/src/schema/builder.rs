// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for RecordType.

use crate::canonical::Canonicalizer;
use crate::error::Result;
use crate::schema::{FieldDescriptor, FieldType, RecordType};
use crate::value::Value;
use std::sync::Arc;

/// Builder for creating RecordType instances.
#[derive(Debug)]
pub struct RecordTypeBuilder {
    name: Arc<str>,
    fields: Vec<(FieldDescriptor, Option<Value>)>,
}

impl RecordTypeBuilder {
    /// Create a new builder for a record type.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field.
    pub fn field(mut self, name: impl Into<Arc<str>>, field_type: FieldType) -> Self {
        self.fields
            .push((FieldDescriptor::new(name, field_type), None));
        self
    }

    /// Add a field with a default, canonicalized against `field_type` on
    /// [`build`](Self::build).
    pub fn field_with_default(
        mut self,
        name: impl Into<Arc<str>>,
        field_type: FieldType,
        default: impl Into<Value>,
    ) -> Self {
        self.fields
            .push((FieldDescriptor::new(name, field_type), Some(default.into())));
        self
    }

    /// Add a `[null, inner]` field.
    pub fn optional_field(self, name: impl Into<Arc<str>>, inner: FieldType) -> Self {
        self.field(name, FieldType::optional(inner))
    }

    /// Add a string field.
    pub fn string_field(self, name: impl Into<Arc<str>>) -> Self {
        self.field(name, FieldType::Str)
    }

    /// Add an array field.
    pub fn array_field(self, name: impl Into<Arc<str>>, elem: FieldType) -> Self {
        self.field(name, FieldType::array(elem))
    }

    /// Add a map field.
    pub fn map_field(self, name: impl Into<Arc<str>>, value: FieldType) -> Self {
        self.field(name, FieldType::map(value))
    }

    /// Add a nested record field referencing `record` by name.
    pub fn record_field(self, name: impl Into<Arc<str>>, record: impl Into<Arc<str>>) -> Self {
        self.field(name, FieldType::record(record))
    }

    /// Build the RecordType.
    pub fn build(self) -> Result<RecordType> {
        let canonicalizer = Canonicalizer::default();
        let mut fields = Vec::with_capacity(self.fields.len());
        for (field, default) in self.fields {
            let field = match default {
                Some(value) => {
                    let path = format!("{}.{}", self.name, field.name());
                    let datum = canonicalizer.canonicalize_at(field.field_type(), &value, &path)?;
                    field.with_default(datum)
                }
                None => field,
            };
            fields.push(field);
        }
        RecordType::new(self.name, fields)
    }
}
