// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! JSON schema documents.
//!
//! A document is one named type definition or an array of them:
//!
//! ```json
//! {"type": "record", "name": "Pair", "fields": [
//!     {"name": "x", "type": "int"},
//!     {"name": "y", "type": {"type": "array", "items": "string"}, "default": []}
//! ]}
//! ```
//!
//! Types are primitive names (`null boolean int long float double bytes
//! string`), names of types defined earlier (or the record being defined),
//! inline `record` / `array` / `map` / `fixed` / `enum` objects, or JSON
//! arrays for unions. Field defaults are converted against the field type;
//! a union default applies to the first branch, and `bytes` / `fixed`
//! defaults are strings of code points 0-255.

use crate::builder::RecordBuilder;
use crate::error::RecordError;
use crate::schema::{FieldType, RecordTypeBuilder, TypeRegistry};
use crate::value::{EnumSymbol, Fixed, Value};
use serde::{Deserialize, Deserializer};
use serde_json::Value as Json;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors from loading a schema document.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading the document failed.
    #[error("failed to read schema: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON, or a declaration is malformed.
    #[error("invalid schema JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is JSON but not a valid schema.
    #[error("schema grammar: {0}")]
    Grammar(String),

    /// A declared type was rejected by the type system.
    #[error(transparent)]
    Record(#[from] RecordError),
}

type LoadResult<T> = std::result::Result<T, LoadError>;

/// Parse a schema document into a validated registry.
pub fn load_json(text: &str) -> LoadResult<TypeRegistry> {
    let doc: Json = serde_json::from_str(text)?;
    load_value(&doc)
}

/// Read and parse a schema document file.
pub fn load_file(path: impl AsRef<Path>) -> LoadResult<TypeRegistry> {
    let path = path.as_ref();
    log::debug!("[loader] loading {}", path.display());
    let text = std::fs::read_to_string(path)?;
    load_json(&text)
}

/// Build a registry from an already-parsed document.
pub fn load_value(doc: &Json) -> LoadResult<TypeRegistry> {
    let mut loader = Loader::default();
    match doc {
        Json::Array(items) => {
            for item in items {
                loader.parse_type(item)?;
            }
        }
        other => {
            loader.parse_type(other)?;
        }
    }
    loader.registry.validate()?;
    log::debug!("[loader] loaded {} record types", loader.registry.len());
    Ok(loader.registry)
}

#[derive(Deserialize)]
struct RecordDecl {
    name: String,
    #[serde(default)]
    fields: Vec<FieldDecl>,
}

#[derive(Deserialize)]
struct FieldDecl {
    name: String,
    #[serde(rename = "type")]
    ty: Json,
    // Present-but-null must stay distinct from absent.
    #[serde(default, deserialize_with = "present")]
    default: Option<Json>,
}

fn present<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Json>, D::Error> {
    Json::deserialize(d).map(Some)
}

#[derive(Deserialize)]
struct FixedDecl {
    name: String,
    size: usize,
}

#[derive(Deserialize)]
struct EnumDecl {
    name: String,
    symbols: Vec<String>,
}

#[derive(Default)]
struct Loader {
    registry: TypeRegistry,
    // Fixed and enum declarations by name.
    named: HashMap<String, FieldType>,
    // Records that are defined or currently being defined.
    records: Vec<String>,
}

impl Loader {
    fn parse_type(&mut self, json: &Json) -> LoadResult<FieldType> {
        match json {
            Json::String(name) => self.named_type(name),
            Json::Array(branches) => {
                let branches = branches
                    .iter()
                    .map(|b| self.parse_type(b))
                    .collect::<LoadResult<Vec<_>>>()?;
                Ok(FieldType::union(branches))
            }
            Json::Object(obj) => {
                let kind = obj
                    .get("type")
                    .and_then(Json::as_str)
                    .ok_or_else(|| grammar("type object without a \"type\" string"))?;
                match kind {
                    "record" | "error" => self.define_record(json),
                    "array" => {
                        let items = obj
                            .get("items")
                            .ok_or_else(|| grammar("array without \"items\""))?;
                        Ok(FieldType::array(self.parse_type(items)?))
                    }
                    "map" => {
                        let values = obj
                            .get("values")
                            .ok_or_else(|| grammar("map without \"values\""))?;
                        Ok(FieldType::map(self.parse_type(values)?))
                    }
                    "fixed" => {
                        let decl = FixedDecl::deserialize(json)?;
                        let ty = FieldType::fixed(decl.name.as_str(), decl.size);
                        self.declare(decl.name, ty)
                    }
                    "enum" => {
                        let decl = EnumDecl::deserialize(json)?;
                        let ty = FieldType::enumeration(decl.name.as_str(), decl.symbols);
                        ty.validate()?;
                        self.declare(decl.name, ty)
                    }
                    other => self.named_type(other),
                }
            }
            other => Err(grammar(format!("unexpected type declaration {}", other))),
        }
    }

    fn named_type(&self, name: &str) -> LoadResult<FieldType> {
        let ty = match name {
            "null" => FieldType::Null,
            "boolean" => FieldType::Boolean,
            "int" => FieldType::Int32,
            "long" => FieldType::Int64,
            "float" => FieldType::Float32,
            "double" => FieldType::Float64,
            "bytes" => FieldType::Bytes,
            "string" => FieldType::Str,
            other if self.records.iter().any(|r| r == other) => FieldType::record(other),
            other => self
                .named
                .get(other)
                .cloned()
                .ok_or_else(|| grammar(format!("unknown type {}", other)))?,
        };
        Ok(ty)
    }

    fn declare(&mut self, name: String, ty: FieldType) -> LoadResult<FieldType> {
        if self.named.contains_key(&name) || self.records.contains(&name) {
            return Err(grammar(format!("type {} defined twice", name)));
        }
        self.named.insert(name, ty.clone());
        Ok(ty)
    }

    fn define_record(&mut self, json: &Json) -> LoadResult<FieldType> {
        let decl = RecordDecl::deserialize(json)?;
        if self.named.contains_key(&decl.name) || self.records.contains(&decl.name) {
            return Err(grammar(format!("type {} defined twice", decl.name)));
        }
        self.records.push(decl.name.clone());

        let mut builder = RecordTypeBuilder::new(decl.name.as_str());
        for field in &decl.fields {
            let ty = self.parse_type(&field.ty)?;
            builder = match &field.default {
                Some(default) => {
                    let value = self.default_value(&ty, default).map_err(|e| {
                        grammar(format!("default of {}.{}: {}", decl.name, field.name, e))
                    })?;
                    builder.field_with_default(field.name.as_str(), ty, value)
                }
                None => builder.field(field.name.as_str(), ty),
            };
        }
        self.registry.register(builder.build()?)?;
        Ok(FieldType::record(decl.name))
    }

    fn default_value(&self, ty: &FieldType, json: &Json) -> LoadResult<Value> {
        let mismatch = || grammar(format!("{} is not a valid {}", json, ty));
        let value = match ty {
            FieldType::Null => match json {
                Json::Null => Value::Null,
                _ => return Err(mismatch()),
            },
            FieldType::Boolean => Value::Boolean(json.as_bool().ok_or_else(mismatch)?),
            FieldType::Int32 => json
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(Value::Int32)
                .ok_or_else(mismatch)?,
            FieldType::Int64 => Value::Int64(json.as_i64().ok_or_else(mismatch)?),
            FieldType::Float32 => Value::Float32(json.as_f64().ok_or_else(mismatch)? as f32),
            FieldType::Float64 => Value::Float64(json.as_f64().ok_or_else(mismatch)?),
            FieldType::Bytes => {
                Value::bytes(code_points(json.as_str().ok_or_else(mismatch)?).ok_or_else(mismatch)?)
            }
            FieldType::Str => Value::from(json.as_str().ok_or_else(mismatch)?),
            FieldType::Array(elem) => {
                let items = json.as_array().ok_or_else(mismatch)?;
                Value::Array(
                    items
                        .iter()
                        .map(|item| self.default_value(elem, item))
                        .collect::<LoadResult<_>>()?,
                )
            }
            FieldType::Map(value_ty) => {
                let entries = json.as_object().ok_or_else(mismatch)?;
                Value::Map(
                    entries
                        .iter()
                        .map(|(k, v)| Ok((k.clone(), self.default_value(value_ty, v)?)))
                        .collect::<LoadResult<_>>()?,
                )
            }
            FieldType::Fixed(f) => {
                let bytes = code_points(json.as_str().ok_or_else(mismatch)?).ok_or_else(mismatch)?;
                Value::from(Fixed::new(f.name.clone(), bytes))
            }
            FieldType::Enum(e) => {
                Value::Enum(EnumSymbol::new(e.name.clone(), json.as_str().ok_or_else(mismatch)?))
            }
            FieldType::Union(branches) => {
                let first = branches.first().ok_or_else(mismatch)?;
                self.default_value(first, json)?
            }
            FieldType::Record(name) => {
                let entries = json.as_object().ok_or_else(mismatch)?;
                let schema = self.registry.resolve(name)?;
                let mut builder = RecordBuilder::new(&schema);
                for field in schema.fields() {
                    if let Some(v) = entries.get(field.name()) {
                        builder.set_at(field.index(), self.default_value(field.field_type(), v)?)?;
                    }
                }
                Value::from(builder.build()?)
            }
        };
        Ok(value)
    }
}

// Each char must be a code point in 0..=255.
fn code_points(s: &str) -> Option<Vec<u8>> {
    s.chars().map(|c| u8::try_from(u32::from(c)).ok()).collect()
}

fn grammar(msg: impl Into<String>) -> LoadError {
    LoadError::Grammar(msg.into())
}
