// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use crate::builder::RecordBuilder;
use crate::error::{RecordError, Result};
use crate::schema::{FieldDescriptor, RecordType};

static GLOBAL_REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();

// ---------------------------------------------------------------------------
// TypeRegistry
// ---------------------------------------------------------------------------

/// Record types keyed by name.
///
/// Populated once at schema-load time, then only queried. Types are handed
/// out as `Arc<RecordType>` so builders and records share them read-only.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<Arc<str>, Arc<RecordType>>,
}

impl TypeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record type.
    ///
    /// Fails with `InvalidSchema` if a different type with the same name is
    /// already registered. Re-registering an identical shape returns the
    /// existing entry.
    pub fn register(&mut self, record_type: RecordType) -> Result<Arc<RecordType>> {
        if let Some(existing) = self.types.get(record_type.name()) {
            if existing.same_shape(&record_type) {
                return Ok(existing.clone());
            }
            return Err(RecordError::InvalidSchema(format!(
                "type {} registered twice with different fields",
                record_type.name()
            )));
        }

        let name: Arc<str> = Arc::from(record_type.name());
        let entry = Arc::new(record_type);
        log::debug!(
            "[registry] registered {} ({} fields)",
            name,
            entry.len()
        );
        self.types.insert(name, entry.clone());
        Ok(entry)
    }

    /// Resolve a record type by name.
    pub fn resolve(&self, name: &str) -> Result<Arc<RecordType>> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| RecordError::UnknownType {
                name: name.to_string(),
            })
    }

    /// Field `index` of the type called `name`.
    pub fn field_at(&self, name: &str, index: usize) -> Result<&FieldDescriptor> {
        self.types
            .get(name)
            .ok_or_else(|| RecordError::UnknownType {
                name: name.to_string(),
            })?
            .field_at(index)
    }

    /// Check if a type is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// All registered type names (sorted for determinism).
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.types.keys().map(|k| k.to_string()).collect();
        names.sort();
        names
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Check that every record reference in every field resolves.
    pub fn validate(&self) -> Result<()> {
        let mut names: Vec<&Arc<str>> = self.types.keys().collect();
        names.sort();
        for name in names {
            let record_type = &self.types[name];
            for field in record_type.fields() {
                let mut missing = None;
                field.field_type().for_each_record_ref(&mut |target| {
                    if missing.is_none() && !self.types.contains_key(target) {
                        missing = Some(target.to_string());
                    }
                });
                if let Some(target) = missing {
                    log::debug!(
                        "[registry] {}.{} references unknown type {}",
                        name,
                        field.name(),
                        target
                    );
                    return Err(RecordError::UnknownType { name: target });
                }
            }
        }
        Ok(())
    }

    /// Start a builder for the type called `name`.
    pub fn builder(&self, name: &str) -> Result<RecordBuilder> {
        Ok(RecordBuilder::new(&self.resolve(name)?))
    }

    /// Validate and install this registry as the process-wide registry.
    ///
    /// Installation happens at most once; later calls fail with
    /// `InvalidSchema` and leave the installed registry untouched.
    pub fn install_global(self) -> Result<&'static TypeRegistry> {
        self.validate()?;
        GLOBAL_REGISTRY
            .set(self)
            .map_err(|_| RecordError::InvalidSchema("global registry already installed".into()))?;
        global().ok_or_else(|| RecordError::InvalidSchema("global registry unavailable".into()))
    }
}

/// The process-wide registry, if one was installed.
pub fn global() -> Option<&'static TypeRegistry> {
    GLOBAL_REGISTRY.get()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
