// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cross-component workflow tests.

use super::*;
use crate::schema::RecordTypeBuilder;
use std::sync::Arc;

fn registry() -> TypeRegistry {
    let mut reg = TypeRegistry::new();
    reg.register(
        RecordTypeBuilder::new("Pair")
            .field("x", FieldType::Int32)
            .array_field("y", FieldType::Str)
            .build()
            .unwrap(),
    )
    .unwrap();
    reg.register(
        RecordTypeBuilder::new("Envelope")
            .string_field("id")
            .record_field("pair", "Pair")
            .map_field("headers", FieldType::Str)
            .build()
            .unwrap(),
    )
    .unwrap();
    reg.validate().unwrap();
    reg
}

#[test]
fn test_full_workflow() {
    let reg = registry();

    // 1. Build a record
    let mut builder = reg.builder("Pair").unwrap();
    builder
        .set("x", 10)
        .unwrap()
        .set("y", Value::array(["a", "b"]))
        .unwrap();
    let pair = builder.build().unwrap();

    // 2. Read it back
    assert_eq!(pair.get(0).unwrap().as_i32(), Some(10));
    let y = pair.get(1).unwrap().as_array().unwrap();
    assert_eq!(y.len(), 2);
    assert!(y.iter().all(|e| e.as_utf8().is_some()));

    // 3. Encode / decode
    let bytes = codec::encode(&pair).unwrap();
    let decoded = codec::decode(&bytes, pair.schema(), &reg).unwrap();

    // 4. Equivalent but distinct
    assert!(records_equivalent(&pair, &decoded).unwrap());
    assert!(!std::ptr::eq(&pair, &decoded));
}

#[test]
fn test_defensive_copy_on_set() {
    let reg = registry();
    let mut tags = vec![Value::from("a")];
    let mut headers = std::collections::HashMap::new();
    headers.insert("k".to_string(), Value::from("v"));

    let mut pair = reg.builder("Pair").unwrap();
    pair.set("x", 1).unwrap().set("y", &Value::Array(tags.clone())).unwrap();
    tags.push(Value::from("b"));
    let pair = pair.build().unwrap();

    let mut env = reg.builder("Envelope").unwrap();
    env.set("id", "e1")
        .unwrap()
        .set("pair", pair)
        .unwrap()
        .set("headers", &Value::Map(headers.clone()))
        .unwrap();
    headers.insert("other".to_string(), Value::from("w"));
    let env = env.build().unwrap();

    let stored_pair = env.get(1).unwrap().as_record().unwrap();
    assert_eq!(stored_pair.get(1).unwrap().as_array().map(<[Datum]>::len), Some(1));
    assert_eq!(env.get(2).unwrap().as_map().map(|m| m.len()), Some(1));
}

#[test]
fn test_identity_retention() {
    let reg = registry();
    let mut pair = reg.builder("Pair").unwrap();
    pair.set("x", 1).unwrap().set("y", Value::array(["a"])).unwrap();
    let pair = Arc::new(pair.build().unwrap());

    let mut env = reg.builder("Envelope").unwrap();
    env.set("id", "e1")
        .unwrap()
        .set("pair", pair.clone())
        .unwrap()
        .set("headers", Value::map([("k", "v")]))
        .unwrap();

    let from_slot = env.get(1).unwrap().unwrap().as_record().unwrap().clone();
    let env = env.build().unwrap();
    assert!(Arc::ptr_eq(env.get(1).unwrap().as_record().unwrap(), &pair));
    assert!(Arc::ptr_eq(&from_slot, &pair));
}

#[test]
fn test_strings_canonical_in_nested_collections() {
    let reg = registry();
    let mut env = Record::new(&reg.resolve("Envelope").unwrap());
    env.put(0, String::from("id")).unwrap();
    env.put(2, Value::map([("k", "v")])).unwrap();

    let headers = env.get(2).unwrap().as_map().unwrap();
    assert!(headers.get("k").and_then(Datum::as_utf8).is_some());
    assert_eq!(env.get_string(0).unwrap(), Some("id".to_string()));

    // Still missing the nested pair.
    assert!(matches!(
        env.validate(),
        Err(RecordError::MissingRequiredField { .. })
    ));
}
