// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use dcc_abstractions::{CborKey, CborValue};

use crate::cbor;

/// Decode the protected-header bstr content into map entries.
///
/// An empty bstr, or one holding CBOR `null`, stands for an empty map.
pub(crate) fn decode_header_map_from_cbor(
    bytes: &[u8],
    max_depth: usize,
) -> Result<Vec<(CborKey, CborValue)>, String> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }

    match cbor::decode_exact(bytes, max_depth).map_err(|e| e.to_string())? {
        CborValue::Map(entries) => Ok(entries),
        CborValue::Null => Ok(Vec::new()),
        other => Err(format!("header map is a {}, expected a map", other.kind())),
    }
}

pub(crate) fn header_map_from_value(value: CborValue) -> Result<Vec<(CborKey, CborValue)>, String> {
    match value {
        CborValue::Map(entries) => Ok(entries),
        other => Err(format!("header map is a {}, expected a map", other.kind())),
    }
}
