// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{CodecError, CodecResult};
use crate::error::RecordError;
use crate::record::Record;
use crate::schema::FieldType;
use crate::value::Datum;

/// Encode a record.
///
/// Fails if the record has unpopulated required fields or a stored value
/// does not match its declared type.
pub fn encode(record: &Record) -> CodecResult<Vec<u8>> {
    let mut encoder = Encoder::new();
    encoder.encode_record(record, record.type_name()).map_err(|e| {
        log::debug!("[codec] encode {} failed: {}", record.type_name(), e);
        e
    })?;
    Ok(encoder.into_bytes())
}

struct Encoder {
    buffer: Vec<u8>,
}

impl Encoder {
    fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(64),
        }
    }

    fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    fn encode_record(&mut self, record: &Record, path: &str) -> CodecResult<()> {
        record.validate()?;
        for (field, value) in record.iter() {
            let field_path = format!("{}.{}", path, field.name());
            self.encode_value(value, field.field_type(), &field_path)?;
        }
        Ok(())
    }

    fn encode_value(&mut self, value: &Datum, ty: &FieldType, path: &str) -> CodecResult<()> {
        match (ty, value) {
            (FieldType::Null, Datum::Null) => {}
            (FieldType::Boolean, Datum::Boolean(v)) => self.buffer.push(u8::from(*v)),
            (FieldType::Int32, Datum::Int32(v)) => self.write_long(i64::from(*v)),
            (FieldType::Int64, Datum::Int64(v)) => self.write_long(*v),
            (FieldType::Float32, Datum::Float32(v)) => self.buffer.extend(&v.to_le_bytes()),
            (FieldType::Float64, Datum::Float64(v)) => self.buffer.extend(&v.to_le_bytes()),
            (FieldType::Bytes, Datum::Bytes(v)) => self.write_blob(v),
            (FieldType::Str, Datum::Str(v)) => self.write_blob(v.as_bytes()),
            (FieldType::Array(elem), Datum::Array(items)) => {
                if !items.is_empty() {
                    self.write_long(items.len() as i64);
                    for (i, item) in items.iter().enumerate() {
                        self.encode_value(item, elem, &format!("{}[{}]", path, i))?;
                    }
                }
                self.write_long(0);
            }
            (FieldType::Map(value_ty), Datum::Map(entries)) => {
                if !entries.is_empty() {
                    self.write_long(entries.len() as i64);
                    for (key, item) in entries {
                        self.write_blob(key.as_bytes());
                        self.encode_value(
                            item,
                            value_ty,
                            &format!("{}[{:?}]", path, key.as_str()),
                        )?;
                    }
                }
                self.write_long(0);
            }
            (FieldType::Record(name), Datum::Record(r)) if r.type_name() == &**name => {
                self.encode_record(r, path)?;
            }
            (FieldType::Fixed(f), Datum::Fixed(v)) if v.name() == &*f.name && v.len() == f.size => {
                self.buffer.extend_from_slice(v.bytes());
            }
            (FieldType::Enum(e), Datum::Enum(v)) if v.type_name() == &*e.name => {
                let ordinal = e.ordinal(v.symbol()).ok_or_else(|| {
                    RecordError::type_mismatch(path, ty, format!("unknown symbol {}", v.symbol()))
                })?;
                self.write_long(ordinal as i64);
            }
            (FieldType::Union(branches), Datum::Union { branch, value }) => {
                let branch_ty = branches
                    .get(*branch)
                    .ok_or_else(|| RecordError::type_mismatch(path, ty, format!("branch {}", branch)))?;
                self.write_long(*branch as i64);
                self.encode_value(value, branch_ty, path)?;
            }
            _ => {
                return Err(CodecError::Record(RecordError::type_mismatch(
                    path,
                    ty,
                    value.kind_name(),
                )))
            }
        }
        Ok(())
    }

    fn write_long(&mut self, v: i64) {
        let mut n = ((v << 1) ^ (v >> 63)) as u64;
        while n >= 0x80 {
            self.buffer.push((n as u8 & 0x7f) | 0x80);
            n >>= 7;
        }
        self.buffer.push(n as u8);
    }

    fn write_blob(&mut self, bytes: &[u8]) {
        self.write_long(bytes.len() as i64);
        self.buffer.extend_from_slice(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_bytes(v: i64) -> Vec<u8> {
        let mut e = Encoder::new();
        e.write_long(v);
        e.into_bytes()
    }

    #[test]
    fn test_zigzag_varints() {
        assert_eq!(long_bytes(0), vec![0x00]);
        assert_eq!(long_bytes(-1), vec![0x01]);
        assert_eq!(long_bytes(1), vec![0x02]);
        assert_eq!(long_bytes(-64), vec![0x7f]);
        assert_eq!(long_bytes(64), vec![0x80, 0x01]);
        assert_eq!(long_bytes(i64::MIN).len(), 10);
    }

    #[test]
    fn test_blob_prefix() {
        let mut e = Encoder::new();
        e.write_blob(b"abc");
        assert_eq!(e.into_bytes(), vec![6, b'a', b'b', b'c']);
    }
}
