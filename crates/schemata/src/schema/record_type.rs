// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Record types and field descriptors.

use crate::error::{RecordError, Result};
use crate::schema::FieldType;
use crate::value::Datum;
use std::collections::HashMap;
use std::sync::Arc;

/// Field descriptor for record members.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: Arc<str>,
    index: usize,
    field_type: FieldType,
    default: Option<Datum>,
}

impl FieldDescriptor {
    /// Create a field descriptor. The index is assigned by [`RecordType::new`].
    pub fn new(name: impl Into<Arc<str>>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            index: 0,
            field_type,
            default: None,
        }
    }

    /// Set an already-canonical default value.
    pub fn with_default(mut self, default: Datum) -> Self {
        self.default = Some(default);
        self
    }

    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Positional index within the record.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Declared type.
    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Default value, if declared.
    pub fn default(&self) -> Option<&Datum> {
        self.default.as_ref()
    }

    /// Check if `build()` fails when this field is left unset.
    pub fn is_required(&self) -> bool {
        self.default.is_none() && !self.field_type.is_nullable()
    }

    /// Value stored when the field is never assigned: the default, else the
    /// representation of absence for nullable types.
    pub fn absent_value(&self) -> Option<Datum> {
        if let Some(default) = &self.default {
            return Some(default.clone());
        }
        match self.field_type {
            FieldType::Null => Some(Datum::Null),
            _ => self
                .field_type
                .null_branch()
                .map(|branch| Datum::union(branch, Datum::Null)),
        }
    }
}

/// A named, ordered sequence of fields.
///
/// Immutable once constructed; shared as `Arc<RecordType>` by the registry,
/// builders and records.
#[derive(Debug)]
pub struct RecordType {
    name: Arc<str>,
    fields: Vec<FieldDescriptor>,
    by_name: HashMap<Arc<str>, usize>,
}

impl RecordType {
    /// Create a record type, assigning positional indices in order.
    ///
    /// Fails with `InvalidSchema` on duplicate field names, invalid field
    /// types, or defaults that do not conform to their field type.
    pub fn new(name: impl Into<Arc<str>>, fields: Vec<FieldDescriptor>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(RecordError::InvalidSchema("record type without a name".into()));
        }

        let mut by_name = HashMap::with_capacity(fields.len());
        let mut indexed = Vec::with_capacity(fields.len());
        for (index, mut field) in fields.into_iter().enumerate() {
            if by_name.insert(field.name.clone(), index).is_some() {
                return Err(RecordError::InvalidSchema(format!(
                    "record {} declares field {} twice",
                    name, field.name
                )));
            }
            field.field_type.validate()?;
            if let Some(default) = &field.default {
                if !default.conforms(&field.field_type) {
                    return Err(RecordError::InvalidSchema(format!(
                        "default of {}.{} does not match {}",
                        name, field.name, field.field_type
                    )));
                }
            }
            field.index = index;
            indexed.push(field);
        }

        Ok(Self {
            name,
            fields: indexed,
            by_name,
        })
    }

    /// Type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in positional order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field at positional `index`.
    pub fn field_at(&self, index: usize) -> Result<&FieldDescriptor> {
        self.fields.get(index).ok_or(RecordError::IndexOutOfRange {
            index,
            len: self.fields.len(),
        })
    }

    /// Field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    /// Field index by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Field by name, failing with `UnknownField`.
    pub fn field_by_name(&self, name: &str) -> Result<&FieldDescriptor> {
        self.field(name).ok_or_else(|| RecordError::UnknownField {
            record: self.name.to_string(),
            field: name.to_string(),
        })
    }

    /// Check if `other` declares the same name and field list.
    pub fn same_shape(&self, other: &RecordType) -> bool {
        self.name == other.name
            && self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .zip(&other.fields)
                .all(|(a, b)| a.name == b.name && a.field_type == b.field_type)
    }
}
