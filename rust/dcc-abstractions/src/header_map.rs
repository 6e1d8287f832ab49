// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! COSE header map types.

use crate::cbor_value::{CborKey, CborValue};

/// COSE header label for `alg`.
pub const HEADER_ALG: i64 = 1;
/// COSE header label for `kid`.
pub const HEADER_KID: i64 = 4;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CoseHeaderMap {
    /// For protected headers, COSE requires the original CBOR bytes (bstr content)
    /// to be included in Sig_structure. We retain those bytes to avoid re-encoding.
    encoded_map_cbor: Vec<u8>,

    /// Decoded entries used for lookups.
    map: Vec<(CborKey, CborValue)>,
}

impl CoseHeaderMap {
    /// Construct a protected header map from its original CBOR bytes + decoded entries.
    pub fn new_protected(encoded_map_cbor: Vec<u8>, map: Vec<(CborKey, CborValue)>) -> Self {
        Self { encoded_map_cbor, map }
    }

    /// Construct an unprotected header map from decoded entries.
    ///
    /// Unprotected headers are not part of Sig_structure, so `encoded_map_cbor` is empty.
    pub fn new_unprotected(map: Vec<(CborKey, CborValue)>) -> Self {
        Self {
            encoded_map_cbor: Vec::new(),
            map,
        }
    }

    pub fn encoded_map_cbor(&self) -> &[u8] {
        &self.encoded_map_cbor
    }

    pub fn entries(&self) -> &[(CborKey, CborValue)] {
        &self.map
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn get(&self, label: i64) -> Option<&CborValue> {
        let key = CborKey::from(label);
        self.map.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn get_i64(&self, label: i64) -> Option<i64> {
        self.get(label).and_then(CborValue::as_i64)
    }

    pub fn get_bytes(&self, label: i64) -> Option<&[u8]> {
        self.get(label).and_then(CborValue::as_bytes)
    }
}
