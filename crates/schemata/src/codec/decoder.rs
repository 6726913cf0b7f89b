// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use super::{CodecError, CodecResult};
use crate::config::{
    MAX_BLOB_LEN, MAX_COLLECTION_LEN, MAX_DECODE_DEPTH, MAX_ZERO_WIDTH_ELEMENTS,
};
use crate::record::Record;
use crate::schema::{FieldType, RecordType, TypeRegistry};
use crate::value::{Datum, EnumSymbol, Fixed, Utf8};
use std::collections::HashMap;
use std::sync::Arc;

// Upper bound on speculative pre-allocation from untrusted counts.
const PREALLOC_LIMIT: usize = 1024;

/// Decode a record of type `schema`.
///
/// Nested record types are resolved through `registry`. The whole input
/// must be consumed, and a map key may appear only once per map.
pub fn decode(
    bytes: &[u8],
    schema: &Arc<RecordType>,
    registry: &TypeRegistry,
) -> CodecResult<Record> {
    let mut decoder = Decoder::new(bytes, registry);
    let result = decoder.read_record(schema).and_then(|record| {
        let remaining = decoder.remaining();
        if remaining > 0 {
            return Err(CodecError::TrailingBytes { remaining });
        }
        Ok(record)
    });
    if let Err(e) = &result {
        log::debug!("[codec] decode {} failed: {}", schema.name(), e);
    }
    result
}

struct Decoder<'a> {
    input: &'a [u8],
    pos: usize,
    depth: usize,
    // Zero-width collection elements decoded so far.
    zero_width: usize,
    registry: &'a TypeRegistry,
}

impl<'a> Decoder<'a> {
    fn new(input: &'a [u8], registry: &'a TypeRegistry) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
            zero_width: 0,
            registry,
        }
    }

    fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    fn enter(&mut self) -> CodecResult<()> {
        self.depth += 1;
        if self.depth > MAX_DECODE_DEPTH {
            return Err(CodecError::DepthExceeded {
                max: MAX_DECODE_DEPTH,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn read_record(&mut self, schema: &Arc<RecordType>) -> CodecResult<Record> {
        self.enter()?;
        let mut record = Record::new(schema);
        for field in schema.fields() {
            let value = self.read_value(field.field_type())?;
            record.put_datum(field.index(), value)?;
        }
        self.leave();
        Ok(record)
    }

    fn read_value(&mut self, ty: &FieldType) -> CodecResult<Datum> {
        match ty {
            FieldType::Null => Ok(Datum::Null),
            FieldType::Boolean => {
                let offset = self.pos;
                match self.read_bytes(1)?[0] {
                    0 => Ok(Datum::Boolean(false)),
                    1 => Ok(Datum::Boolean(true)),
                    byte => Err(CodecError::InvalidBoolean { offset, byte }),
                }
            }
            FieldType::Int32 => {
                let offset = self.pos;
                let v = self.read_long()?;
                i32::try_from(v)
                    .map(Datum::Int32)
                    .map_err(|_| CodecError::InvalidVarint { offset })
            }
            FieldType::Int64 => Ok(Datum::Int64(self.read_long()?)),
            FieldType::Float32 => {
                let b = self.read_bytes(4)?;
                Ok(Datum::Float32(f32::from_le_bytes([b[0], b[1], b[2], b[3]])))
            }
            FieldType::Float64 => {
                let b = self.read_bytes(8)?;
                Ok(Datum::Float64(f64::from_le_bytes([
                    b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
                ])))
            }
            FieldType::Bytes => Ok(Datum::Bytes(self.read_blob()?.into())),
            FieldType::Str => Ok(Datum::Str(self.read_string()?)),
            FieldType::Array(elem) => {
                self.enter()?;
                let mut items = Vec::new();
                let occupies_input = self.occupies_input(elem);
                self.read_blocks(occupies_input, |d, count| {
                    items.reserve(count.min(PREALLOC_LIMIT));
                    for _ in 0..count {
                        items.push(d.read_value(elem)?);
                    }
                    Ok(())
                })?;
                self.leave();
                Ok(Datum::Array(items))
            }
            FieldType::Map(value_ty) => {
                self.enter()?;
                let mut entries = HashMap::new();
                self.read_blocks(true, |d, count| {
                    entries.reserve(count.min(PREALLOC_LIMIT));
                    for _ in 0..count {
                        let offset = d.pos;
                        let key = d.read_string()?;
                        if entries.contains_key(&key) {
                            return Err(CodecError::DuplicateKey {
                                offset,
                                key: key.to_string(),
                            });
                        }
                        let value = d.read_value(value_ty)?;
                        entries.insert(key, value);
                    }
                    Ok(())
                })?;
                self.leave();
                Ok(Datum::Map(entries))
            }
            FieldType::Record(name) => {
                let schema = self.registry.resolve(name)?;
                Ok(Datum::Record(Arc::new(self.read_record(&schema)?)))
            }
            FieldType::Fixed(f) => {
                let bytes = self.read_bytes(f.size)?;
                Ok(Datum::Fixed(Arc::new(Fixed::new(f.name.clone(), bytes))))
            }
            FieldType::Enum(e) => {
                let offset = self.pos;
                let index = self.read_long()?;
                let symbol = usize::try_from(index)
                    .ok()
                    .and_then(|i| e.symbol(i))
                    .ok_or_else(|| CodecError::InvalidEnumIndex {
                        offset,
                        name: e.name.to_string(),
                        index,
                    })?;
                Ok(Datum::Enum(EnumSymbol::new(e.name.clone(), symbol.clone())))
            }
            FieldType::Union(branches) => {
                let offset = self.pos;
                let index = self.read_long()?;
                let (branch, branch_ty) = usize::try_from(index)
                    .ok()
                    .and_then(|i| branches.get(i).map(|b| (i, b)))
                    .ok_or(CodecError::InvalidUnionIndex {
                        offset,
                        index,
                        branches: branches.len(),
                    })?;
                self.enter()?;
                let value = self.read_value(branch_ty)?;
                self.leave();
                Ok(Datum::union(branch, value))
            }
        }
    }

    // Check if every value of `ty` takes at least one input byte.
    fn occupies_input(&self, ty: &FieldType) -> bool {
        fn has_width(ty: &FieldType) -> bool {
            match ty {
                FieldType::Null | FieldType::Record(_) => false,
                FieldType::Fixed(f) => f.size > 0,
                _ => true,
            }
        }
        match ty {
            FieldType::Record(name) => self
                .registry
                .resolve(name)
                .map(|schema| schema.fields().iter().any(|f| has_width(f.field_type())))
                .unwrap_or(false),
            _ => has_width(ty),
        }
    }

    // Blocked collection framing: count, items, ..., zero. A negative
    // count is followed by the block's byte size.
    //
    // Elements that occupy input cannot outnumber the remaining bytes; the
    // rest draw on one budget shared by the whole decode.
    fn read_blocks(
        &mut self,
        occupies_input: bool,
        mut read_items: impl FnMut(&mut Self, usize) -> CodecResult<()>,
    ) -> CodecResult<()> {
        let mut total = 0usize;
        loop {
            let offset = self.pos;
            let mut count = self.read_long()?;
            if count == 0 {
                return Ok(());
            }
            if count < 0 {
                count = count
                    .checked_neg()
                    .ok_or(CodecError::InvalidLength { offset, len: count })?;
                self.read_long()?;
            }
            let count = usize::try_from(count)
                .map_err(|_| CodecError::InvalidLength { offset, len: count })?;
            total = total.saturating_add(count);
            if total > MAX_COLLECTION_LEN {
                return Err(CodecError::InvalidLength {
                    offset,
                    len: total as i64,
                });
            }
            if occupies_input {
                let have = self.remaining();
                if count > have {
                    return Err(CodecError::Truncated {
                        offset: self.pos,
                        need: count,
                        have,
                    });
                }
            } else {
                self.zero_width = self.zero_width.saturating_add(count);
                if self.zero_width > MAX_ZERO_WIDTH_ELEMENTS {
                    log::debug!(
                        "[codec] zero-width element budget exceeded at offset {}",
                        offset
                    );
                    return Err(CodecError::ElementBudgetExceeded {
                        offset,
                        max: MAX_ZERO_WIDTH_ELEMENTS,
                    });
                }
            }
            read_items(self, count)?;
        }
    }

    fn read_long(&mut self) -> CodecResult<i64> {
        let offset = self.pos;
        let mut n: u64 = 0;
        let mut shift = 0u32;
        loop {
            let byte = *self
                .input
                .get(self.pos)
                .ok_or(CodecError::Truncated {
                    offset: self.pos,
                    need: 1,
                    have: 0,
                })?;
            self.pos += 1;
            if shift == 63 && byte > 1 {
                return Err(CodecError::InvalidVarint { offset });
            }
            n |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
            if shift > 63 {
                return Err(CodecError::InvalidVarint { offset });
            }
        }
        Ok((n >> 1) as i64 ^ -((n & 1) as i64))
    }

    fn read_bytes(&mut self, len: usize) -> CodecResult<&'a [u8]> {
        let have = self.remaining();
        if len > have {
            return Err(CodecError::Truncated {
                offset: self.pos,
                need: len,
                have,
            });
        }
        let input: &'a [u8] = self.input;
        let slice = &input[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn read_blob(&mut self) -> CodecResult<&'a [u8]> {
        let offset = self.pos;
        let len = self.read_long()?;
        let len = usize::try_from(len)
            .ok()
            .filter(|&l| l <= MAX_BLOB_LEN)
            .ok_or(CodecError::InvalidLength { offset, len })?;
        self.read_bytes(len)
    }

    fn read_string(&mut self) -> CodecResult<Utf8> {
        let offset = self.pos;
        let bytes = self.read_blob()?;
        std::str::from_utf8(bytes)
            .map(Utf8::new)
            .map_err(|_| CodecError::InvalidUtf8 { offset })
    }
}
