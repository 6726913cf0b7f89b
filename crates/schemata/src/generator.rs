// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Random record synthesis for fixtures and round-trip tests.
//!
//! Records are populated field by field through [`Record::new`] and
//! [`Record::put`], so every generated value goes through the same
//! canonicalization as caller-supplied data.

use crate::config::{DEFAULT_GEN_COLLECTION_LEN, DEFAULT_GEN_MAX_DEPTH};
use crate::error::{RecordError, Result};
use crate::record::Record;
use crate::schema::{FieldType, RecordType, TypeRegistry};
use crate::value::{EnumSymbol, Fixed, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Generator settings.
///
/// Deserializable from JSON with camelCase keys, e.g.
/// `{"avoidNulls": true, "maxCollectionLen": 3}`; missing keys take their
/// defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationConfig {
    /// Never pick a `null` union branch or an empty collection when
    /// another choice exists.
    pub avoid_nulls: bool,
    /// Upper bound on generated array / map lengths.
    pub max_collection_len: usize,
    /// Nested record depth after which unions fall back to `null` and
    /// collections stay empty.
    pub max_depth: usize,
    /// Fixed seed for reproducible output.
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            avoid_nulls: false,
            max_collection_len: DEFAULT_GEN_COLLECTION_LEN,
            max_depth: DEFAULT_GEN_MAX_DEPTH,
            seed: None,
        }
    }
}

impl GenerationConfig {
    /// Default settings with `avoid_nulls` enabled.
    pub fn avoiding_nulls() -> Self {
        Self {
            avoid_nulls: true,
            ..Self::default()
        }
    }

    /// Same settings with a fixed seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Produces random, schema-conforming records.
pub struct RecordGenerator<'a> {
    registry: &'a TypeRegistry,
    config: GenerationConfig,
    rng: fastrand::Rng,
}

impl<'a> RecordGenerator<'a> {
    /// Create a generator over the types in `registry`.
    pub fn new(registry: &'a TypeRegistry, config: GenerationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self {
            registry,
            config,
            rng,
        }
    }

    /// Generate one record of type `name` with a throwaway generator.
    pub fn generate(
        registry: &TypeRegistry,
        name: &str,
        config: &GenerationConfig,
    ) -> Result<Record> {
        RecordGenerator::new(registry, config.clone()).next_record(name)
    }

    /// Generate the next record of type `name`.
    pub fn next_record(&mut self, name: &str) -> Result<Record> {
        let schema = self.registry.resolve(name)?;
        self.record(&schema, 0)
    }

    /// Generate `count` records of type `name`.
    pub fn take(&mut self, name: &str, count: usize) -> Result<Vec<Record>> {
        (0..count).map(|_| self.next_record(name)).collect()
    }

    fn record(&mut self, schema: &Arc<RecordType>, depth: usize) -> Result<Record> {
        let mut record = Record::new(schema);
        for field in schema.fields() {
            let value = self.value(field.field_type(), depth)?;
            record.put(field.index(), value)?;
        }
        Ok(record)
    }

    fn value(&mut self, ty: &FieldType, depth: usize) -> Result<Value> {
        let value = match ty {
            FieldType::Null => Value::Null,
            FieldType::Boolean => Value::Boolean(self.rng.bool()),
            FieldType::Int32 => Value::Int32(self.rng.i32(..)),
            FieldType::Int64 => Value::Int64(self.rng.i64(..)),
            FieldType::Float32 => Value::Float32(self.rng.f32() * 2000.0 - 1000.0),
            FieldType::Float64 => Value::Float64(self.rng.f64() * 2.0e6 - 1.0e6),
            FieldType::Bytes => {
                let len = self.collection_len(depth);
                Value::bytes(self.bytes(len))
            }
            FieldType::Str => {
                let len = self.collection_len(depth);
                Value::Str(self.text(len))
            }
            FieldType::Array(elem) => {
                let len = self.collection_len(depth);
                let mut items = Vec::with_capacity(len);
                for _ in 0..len {
                    items.push(self.value(elem, depth)?);
                }
                Value::Array(items)
            }
            FieldType::Map(value_ty) => {
                let len = self.collection_len(depth);
                let mut entries = HashMap::with_capacity(len);
                while entries.len() < len {
                    let key_len = self.rng.usize(1..=8);
                    let key = self.text(key_len);
                    entries.insert(key, self.value(value_ty, depth)?);
                }
                Value::Map(entries)
            }
            FieldType::Record(name) => {
                if depth >= self.config.max_depth {
                    return Err(RecordError::InvalidSchema(format!(
                        "record {} nests deeper than {} levels without a null branch",
                        name, self.config.max_depth
                    )));
                }
                let schema = self.registry.resolve(name)?;
                Value::from(self.record(&schema, depth + 1)?)
            }
            FieldType::Fixed(f) => Value::from(Fixed::new(f.name.clone(), self.bytes(f.size))),
            FieldType::Enum(e) => {
                let ordinal = self.rng.usize(..e.symbols.len());
                Value::Enum(EnumSymbol::new(e.name.clone(), e.symbols[ordinal].clone()))
            }
            FieldType::Union(branches) => {
                let branch = self.pick_branch(branches, depth);
                self.value(&branches[branch], depth)?
            }
        };
        Ok(value)
    }

    fn pick_branch(&mut self, branches: &[FieldType], depth: usize) -> usize {
        let null = branches.iter().position(|b| *b == FieldType::Null);
        if depth >= self.config.max_depth {
            if let Some(null) = null {
                return null;
            }
            if let Some(flat) = branches
                .iter()
                .position(|b| !matches!(b, FieldType::Record(_)))
            {
                return flat;
            }
        }
        if self.config.avoid_nulls && branches.len() > 1 {
            if let Some(null) = null {
                let pick = self.rng.usize(..branches.len() - 1);
                return if pick >= null { pick + 1 } else { pick };
            }
        }
        self.rng.usize(..branches.len())
    }

    fn collection_len(&mut self, depth: usize) -> usize {
        let max = self.config.max_collection_len;
        if depth >= self.config.max_depth {
            0
        } else if self.config.avoid_nulls {
            self.rng.usize(1..=max.max(1))
        } else {
            self.rng.usize(..=max)
        }
    }

    fn bytes(&mut self, len: usize) -> Vec<u8> {
        (0..len).map(|_| self.rng.u8(..)).collect()
    }

    fn text(&mut self, len: usize) -> String {
        (0..len).map(|_| self.rng.alphanumeric()).collect()
    }
}
