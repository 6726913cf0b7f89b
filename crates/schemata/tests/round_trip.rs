// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Encode / decode round trips checked through the equivalence oracle.

use schemata::schema::{FieldType, RecordTypeBuilder};
use schemata::{codec, records_equivalent, Record, RecordBuilder, RecordError, TypeRegistry, Value};
use std::sync::Arc;

fn pair_registry() -> TypeRegistry {
    let mut reg = TypeRegistry::new();
    reg.register(
        RecordTypeBuilder::new("Pair")
            .field("x", FieldType::Int32)
            .array_field("y", FieldType::Str)
            .build()
            .unwrap(),
    )
    .unwrap();
    reg
}

#[test]
fn pair_round_trip() {
    let reg = pair_registry();
    let pair = reg.resolve("Pair").unwrap();

    let mut builder = RecordBuilder::new(&pair);
    builder
        .set("x", 10)
        .unwrap()
        .set("y", Value::array(["a", "b"]))
        .unwrap();
    let original = builder.build().unwrap();

    let bytes = codec::encode(&original).unwrap();
    let decoded = codec::decode(&bytes, &pair, &reg).unwrap();

    assert!(records_equivalent(&original, &decoded).unwrap());
    assert!(!std::ptr::eq(&original, &decoded));
    assert_eq!(decoded.get(0).unwrap().as_i32(), Some(10));
    let y = decoded.get(1).unwrap().as_array().unwrap();
    assert_eq!(
        y.iter()
            .map(|s| s.as_utf8().map(|u| u.to_string()))
            .collect::<Vec<_>>(),
        vec![Some("a".to_string()), Some("b".to_string())]
    );
}

#[test]
fn missing_required_field() {
    let reg = pair_registry();
    let mut builder = reg.builder("Pair").unwrap();
    builder.set("y", Value::array(["a"])).unwrap();
    assert_eq!(
        builder.build().unwrap_err(),
        RecordError::MissingRequiredField {
            record: "Pair".into(),
            field: "x".into(),
        }
    );
}

#[test]
fn map_order_does_not_matter() {
    let mut reg = TypeRegistry::new();
    let ty = reg
        .register(
            RecordTypeBuilder::new("Scores")
                .map_field("by_name", FieldType::Int64)
                .build()
                .unwrap(),
        )
        .unwrap();

    let build = |entries: Vec<(&str, i64)>| {
        let mut b = RecordBuilder::new(&ty);
        b.set("by_name", Value::map(entries)).unwrap();
        b.build().unwrap()
    };
    let a = build(vec![("a", 1), ("b", 2), ("c", 3)]);
    let b = build(vec![("c", 3), ("b", 2), ("a", 1)]);
    assert!(records_equivalent(&a, &b).unwrap());

    let decoded = codec::decode(&codec::encode(&b).unwrap(), &ty, &reg).unwrap();
    assert_eq!(decoded, a);
}

#[test]
fn nested_records_round_trip() {
    let mut reg = TypeRegistry::new();
    reg.register(
        RecordTypeBuilder::new("Leaf")
            .string_field("name")
            .map_field("attrs", FieldType::Str)
            .build()
            .unwrap(),
    )
    .unwrap();
    let tree = reg
        .register(
            RecordTypeBuilder::new("Tree")
                .record_field("root", "Leaf")
                .array_field("children", FieldType::record("Leaf"))
                .build()
                .unwrap(),
        )
        .unwrap();
    reg.validate().unwrap();

    let leaf = |name: &str| -> Arc<Record> {
        let mut b = reg.builder("Leaf").unwrap();
        b.set("name", name)
            .unwrap()
            .set("attrs", Value::map([("k", name)]))
            .unwrap();
        Arc::new(b.build().unwrap())
    };

    let mut b = RecordBuilder::new(&tree);
    b.set("root", leaf("root"))
        .unwrap()
        .set(
            "children",
            Value::array([leaf("a"), leaf("b")].into_iter().map(Value::Record)),
        )
        .unwrap();
    let original = b.build().unwrap();

    let decoded = codec::decode(&codec::encode(&original).unwrap(), &tree, &reg).unwrap();
    assert_eq!(decoded, original);
    assert_eq!(decoded.to_string(), original.to_string());
}

#[cfg(feature = "generator")]
mod generated {
    use super::*;
    use schemata::{GenerationConfig, RecordGenerator};

    fn registry() -> TypeRegistry {
        let mut reg = TypeRegistry::new();
        reg.register(
            RecordTypeBuilder::new("Amount")
                .string_field("currency")
                .field("amount", FieldType::Int64)
                .build()
                .unwrap(),
        )
        .unwrap();
        reg.register(
            RecordTypeBuilder::new("Ledger")
                .field("ratio", FieldType::Float32)
                .field("total", FieldType::Float64)
                .field("flag", FieldType::Boolean)
                .field("blob", FieldType::Bytes)
                .field("hash", FieldType::fixed("Hash", 8))
                .field("kind", FieldType::enumeration("Kind", ["DEBIT", "CREDIT"]))
                .array_field("entries", FieldType::record("Amount"))
                .map_field("by_currency", FieldType::record("Amount"))
                .optional_field("note", FieldType::Str)
                .field(
                    "mixed",
                    FieldType::union(vec![
                        FieldType::Null,
                        FieldType::Int32,
                        FieldType::Str,
                        FieldType::record("Amount"),
                    ]),
                )
                .build()
                .unwrap(),
        )
        .unwrap();
        reg
    }

    #[test]
    fn generated_records_round_trip() {
        let reg = registry();
        let ledger = reg.resolve("Ledger").unwrap();
        for config in [
            GenerationConfig::default().with_seed(1),
            GenerationConfig::avoiding_nulls().with_seed(2),
        ] {
            let mut generator = RecordGenerator::new(&reg, config);
            for record in generator.take("Ledger", 25).unwrap() {
                let bytes = codec::encode(&record).unwrap();
                let decoded = codec::decode(&bytes, &ledger, &reg).unwrap();
                assert!(records_equivalent(&record, &decoded).unwrap());
            }
        }
    }

    #[test]
    fn avoid_nulls_populates_everything() {
        let reg = registry();
        let config = GenerationConfig::avoiding_nulls().with_seed(3);
        let mut generator = RecordGenerator::new(&reg, config);
        for record in generator.take("Ledger", 10).unwrap() {
            assert!(!record.get_by_name("note").unwrap().is_null());
            assert!(!record.get_by_name("mixed").unwrap().is_null());
            assert!(!record
                .get_by_name("entries")
                .unwrap()
                .as_array()
                .unwrap()
                .is_empty());
        }
    }

    #[test]
    fn rebuild_from_record_is_equivalent() {
        let reg = registry();
        let config = GenerationConfig::avoiding_nulls().with_seed(4);
        let original = RecordGenerator::generate(&reg, "Ledger", &config).unwrap();
        let copy = RecordBuilder::from_record(&original).build().unwrap();
        assert_eq!(copy, original);
    }
}
