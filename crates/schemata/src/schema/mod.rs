// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type system: field types, record types, and the name-keyed registry.
//!
//! # Example
//!
//! ```rust
//! use schemata::schema::{FieldType, RecordTypeBuilder, TypeRegistry};
//!
//! let mut registry = TypeRegistry::new();
//! registry
//!     .register(
//!         RecordTypeBuilder::new("Pair")
//!             .field("x", FieldType::Int32)
//!             .array_field("y", FieldType::Str)
//!             .build()
//!             .unwrap(),
//!     )
//!     .unwrap();
//!
//! let pair = registry.resolve("Pair").unwrap();
//! assert_eq!(pair.field_at(1).unwrap().name(), "y");
//! ```

mod builder;
mod field_type;
#[cfg(feature = "json-schema")]
pub mod loader;
mod record_type;
mod registry;

pub use builder::RecordTypeBuilder;
pub use field_type::{CopyPolicy, EnumSchema, FieldType, FixedSchema};
pub use record_type::{FieldDescriptor, RecordType};
pub use registry::{global, TypeRegistry};
