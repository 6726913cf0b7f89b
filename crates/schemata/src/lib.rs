// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema-driven record construction and structural equivalence.
//!
//! Builds immutable, type-checked records for a compact binary data format,
//! copies collection-typed fields on assignment, stores every string in one
//! canonical representation, and compares records structurally (maps by
//! content, not iteration order).
//!
//! # Features
//!
//! - **Type system**: record types, closed field-type variants, name-keyed
//!   registry ([`schema`])
//! - **Canonicalizer**: external values to canonical stored values, union
//!   branch resolution, explicit copy policy ([`canonical`])
//! - **Builder / Record**: staged construction with defaults and validation,
//!   frozen records with a `put` escape hatch
//! - **Equivalence oracle**: type-directed structural comparison and
//!   consistent hashing ([`equivalence`])
//! - **Codec**: compact binary encode / decode ([`codec`])
//! - **Schema documents** (`json-schema` feature): JSON schema loader
//! - **Generator** (`generator` feature): random conforming records
//!
//! # Architecture
//!
//! ```text
//! TypeRegistry --> RecordBuilder --(set: Canonicalizer)--> build() --> Record
//!                                                                       |
//!                                  codec::encode / codec::decode <------+
//!                                                                       |
//!                                                equivalence oracle <---+
//! ```
//!
//! # Example
//!
//! ```rust
//! use schemata::schema::{FieldType, RecordTypeBuilder};
//! use schemata::{codec, RecordBuilder, TypeRegistry, Value};
//!
//! let mut registry = TypeRegistry::new();
//! let pair = registry
//!     .register(
//!         RecordTypeBuilder::new("Pair")
//!             .field("x", FieldType::Int32)
//!             .array_field("y", FieldType::Str)
//!             .build()
//!             .unwrap(),
//!     )
//!     .unwrap();
//!
//! let mut builder = RecordBuilder::new(&pair);
//! builder.set("x", 10).unwrap();
//! builder.set("y", Value::array(["a", "b"])).unwrap();
//! let record = builder.build().unwrap();
//!
//! let bytes = codec::encode(&record).unwrap();
//! let decoded = codec::decode(&bytes, &pair, &registry).unwrap();
//! assert_eq!(decoded, record);
//! assert_eq!(decoded.get(0).unwrap().as_i32(), Some(10));
//! ```

pub mod builder;
pub mod canonical;
pub mod codec;
pub mod config;
pub mod equivalence;
pub mod error;
#[cfg(feature = "generator")]
pub mod generator;
pub mod record;
pub mod schema;
pub mod value;

pub use builder::RecordBuilder;
pub use canonical::Canonicalizer;
pub use config::CanonicalOptions;
pub use equivalence::{equivalent, records_equivalent};
pub use error::{RecordError, Result};
#[cfg(feature = "generator")]
pub use generator::{GenerationConfig, RecordGenerator};
pub use record::Record;
pub use schema::{FieldType, RecordType, TypeRegistry};
pub use value::{Datum, EnumSymbol, Fixed, Utf8, Value};

#[cfg(test)]
mod tests;
