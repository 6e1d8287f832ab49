// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! General CBOR (RFC 8949) decoding into `CborValue`, and definite-length encoding.
//!
//! Decoding is strict about structure: truncation, reserved initial bytes,
//! stray breaks, invalid UTF-8, non int/text map keys and duplicate map keys
//! are all errors. Container nesting is bounded so hostile input cannot
//! exhaust the stack.

use std::collections::HashSet;

use minicbor::data::{Int, Tag, Type};
use minicbor::{Decoder, Encoder};

use dcc_abstractions::{CborKey, CborValue};

/// Default bound on container nesting (arrays, maps, tags).
/// A DCC payload nests about six levels deep.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;

const BREAK: u8 = 0xFF;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CborError {
    #[error("malformed CBOR: {0}")]
    Malformed(String),

    #[error("CBOR nesting exceeds the limit of {limit} levels")]
    NestingTooDeep { limit: usize },

    #[error("CBOR encoding failed: {0}")]
    Encode(String),
}

impl From<minicbor::decode::Error> for CborError {
    fn from(e: minicbor::decode::Error) -> Self {
        CborError::Malformed(e.to_string())
    }
}

/// Decode one CBOR item from the front of `input`.
///
/// Returns the value and the number of bytes it occupied; trailing bytes are
/// left to the caller.
pub fn decode(input: &[u8], max_depth: usize) -> Result<(CborValue, usize), CborError> {
    if input.is_empty() {
        return Err(CborError::Malformed("empty input".to_string()));
    }

    let mut dec = Decoder::new(input);
    let value = decode_value(&mut dec, 0, max_depth)?;
    Ok((value, dec.position()))
}

/// Decode exactly one CBOR item spanning all of `input`.
pub fn decode_exact(input: &[u8], max_depth: usize) -> Result<CborValue, CborError> {
    let (value, consumed) = decode(input, max_depth)?;
    if consumed != input.len() {
        return Err(CborError::Malformed(format!(
            "{} trailing bytes after CBOR item",
            input.len() - consumed
        )));
    }
    Ok(value)
}

fn decode_value(dec: &mut Decoder<'_>, depth: usize, max_depth: usize) -> Result<CborValue, CborError> {
    if depth > max_depth {
        return Err(CborError::NestingTooDeep { limit: max_depth });
    }

    match dec.datatype()? {
        Type::Bool => Ok(CborValue::Bool(dec.bool()?)),
        Type::Null => {
            dec.null()?;
            Ok(CborValue::Null)
        }
        Type::Undefined => {
            dec.undefined()?;
            Ok(CborValue::Undefined)
        }
        Type::U8
        | Type::U16
        | Type::U32
        | Type::U64
        | Type::I8
        | Type::I16
        | Type::I32
        | Type::I64
        | Type::Int => Ok(CborValue::Integer(i128::from(dec.int()?))),
        Type::F16 => Ok(CborValue::Float(f64::from(dec.f16()?))),
        Type::F32 => Ok(CborValue::Float(f64::from(dec.f32()?))),
        Type::F64 => Ok(CborValue::Float(dec.f64()?)),
        Type::Simple => Ok(CborValue::Simple(dec.simple()?)),
        Type::Bytes | Type::BytesIndef => {
            let mut out = Vec::new();
            for chunk in dec.bytes_iter()? {
                out.extend_from_slice(chunk?);
            }
            Ok(CborValue::Bytes(out))
        }
        Type::String | Type::StringIndef => {
            let mut out = String::new();
            for chunk in dec.str_iter()? {
                out.push_str(chunk?);
            }
            Ok(CborValue::Text(out))
        }
        Type::Array | Type::ArrayIndef => {
            let len = dec.array()?;
            let mut items = Vec::with_capacity(bounded_capacity(dec, len));
            match len {
                Some(n) => {
                    for _ in 0..n {
                        items.push(decode_value(dec, depth + 1, max_depth)?);
                    }
                }
                None => {
                    while !take_break(dec)? {
                        items.push(decode_value(dec, depth + 1, max_depth)?);
                    }
                }
            }
            Ok(CborValue::Array(items))
        }
        Type::Map | Type::MapIndef => {
            let len = dec.map()?;
            let mut entries = Vec::with_capacity(bounded_capacity(dec, len));
            let mut seen = HashSet::new();
            match len {
                Some(n) => {
                    for _ in 0..n {
                        decode_map_entry(dec, depth, max_depth, &mut seen, &mut entries)?;
                    }
                }
                None => {
                    while !take_break(dec)? {
                        decode_map_entry(dec, depth, max_depth, &mut seen, &mut entries)?;
                    }
                }
            }
            Ok(CborValue::Map(entries))
        }
        Type::Tag => {
            let tag = dec.tag()?;
            let inner = decode_value(dec, depth + 1, max_depth)?;
            Ok(CborValue::Tagged(tag.as_u64(), Box::new(inner)))
        }
        Type::Break => Err(CborError::Malformed(format!(
            "unexpected break at offset {}",
            dec.position()
        ))),
        other => Err(CborError::Malformed(format!(
            "unsupported initial byte at offset {}: {other:?}",
            dec.position()
        ))),
    }
}

fn decode_map_entry(
    dec: &mut Decoder<'_>,
    depth: usize,
    max_depth: usize,
    seen: &mut HashSet<CborKey>,
    entries: &mut Vec<(CborKey, CborValue)>,
) -> Result<(), CborError> {
    let key = decode_key(dec, depth + 1, max_depth)?;
    if !seen.insert(key.clone()) {
        return Err(CborError::Malformed(format!("duplicate map key {key}")));
    }
    let value = decode_value(dec, depth + 1, max_depth)?;
    entries.push((key, value));
    Ok(())
}

fn decode_key(dec: &mut Decoder<'_>, depth: usize, max_depth: usize) -> Result<CborKey, CborError> {
    match decode_value(dec, depth, max_depth)? {
        CborValue::Integer(i) => Ok(CborKey::Int(i)),
        CborValue::Text(s) => Ok(CborKey::Text(s)),
        other => Err(CborError::Malformed(format!(
            "unsupported map key type: {}",
            other.kind()
        ))),
    }
}

/// Consume the break byte of an indefinite-length container, if it is next.
fn take_break(dec: &mut Decoder<'_>) -> Result<bool, CborError> {
    match dec.input().get(dec.position()) {
        Some(&BREAK) => {
            dec.set_position(dec.position() + 1);
            Ok(true)
        }
        Some(_) => Ok(false),
        None => Err(CborError::Malformed(
            "end of input inside indefinite-length container".to_string(),
        )),
    }
}

/// Every item takes at least one byte, so the remaining input bounds any
/// honest length prefix. This keeps a forged length from pre-allocating.
fn bounded_capacity(dec: &Decoder<'_>, len: Option<u64>) -> usize {
    let remaining = dec.input().len().saturating_sub(dec.position());
    len.map_or(0, |n| usize::try_from(n).unwrap_or(usize::MAX).min(remaining))
}

/// Encode a value using definite lengths and shortest-form integer heads.
pub fn encode(value: &CborValue) -> Result<Vec<u8>, CborError> {
    let mut out = Vec::new();
    let mut enc = Encoder::new(&mut out);
    encode_value(&mut enc, value)?;
    Ok(out)
}

fn encode_value(enc: &mut Encoder<&mut Vec<u8>>, value: &CborValue) -> Result<(), CborError> {
    let err = |e: minicbor::encode::Error<std::convert::Infallible>| CborError::Encode(e.to_string());
    match value {
        CborValue::Integer(i) => {
            enc.int(to_int(*i)?).map_err(err)?;
        }
        CborValue::Bytes(b) => {
            enc.bytes(b).map_err(err)?;
        }
        CborValue::Text(s) => {
            enc.str(s).map_err(err)?;
        }
        CborValue::Array(items) => {
            enc.array(items.len() as u64).map_err(err)?;
            for item in items {
                encode_value(enc, item)?;
            }
        }
        CborValue::Map(entries) => {
            enc.map(entries.len() as u64).map_err(err)?;
            for (key, item) in entries {
                match key {
                    CborKey::Int(i) => enc.int(to_int(*i)?).map_err(err)?,
                    CborKey::Text(s) => enc.str(s).map_err(err)?,
                };
                encode_value(enc, item)?;
            }
        }
        CborValue::Tagged(tag, inner) => {
            enc.tag(Tag::new(*tag)).map_err(err)?;
            encode_value(enc, inner)?;
        }
        CborValue::Float(f) => {
            enc.f64(*f).map_err(err)?;
        }
        CborValue::Bool(b) => {
            enc.bool(*b).map_err(err)?;
        }
        CborValue::Null => {
            enc.null().map_err(err)?;
        }
        CborValue::Undefined => {
            enc.undefined().map_err(err)?;
        }
        CborValue::Simple(n) => {
            enc.simple(*n).map_err(err)?;
        }
    }
    Ok(())
}

fn to_int(i: i128) -> Result<Int, CborError> {
    Int::try_from(i).map_err(|_| CborError::Encode(format!("integer {i} is outside the CBOR range")))
}
