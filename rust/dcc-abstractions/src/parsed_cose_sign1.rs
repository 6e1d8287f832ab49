// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Parsed COSE_Sign1 message types.

use crate::header_map::{CoseHeaderMap, HEADER_ALG, HEADER_KID};

/// Standard CBOR tag number used for COSE_Sign1.
pub const COSE_SIGN1_TAG: u64 = 18;

/// Context string for COSE Sig_structure for COSE_Sign1.
pub const SIG_STRUCTURE_CONTEXT_SIGNATURE1: &str = "Signature1";

#[derive(Debug, Clone)]
pub struct SigStructureView<'a> {
    pub context: &'static str,
    pub body_protected: &'a [u8],
    pub external_aad: &'a [u8],
    pub payload: &'a [u8],
}

#[derive(Debug, Clone, Default)]
pub struct ParsedCoseSign1 {
    pub protected_headers: CoseHeaderMap,
    pub unprotected_headers: CoseHeaderMap,
    /// Embedded payload bytes (the CWT claims, still CBOR encoded).
    pub payload: Vec<u8>,
    pub signature: Vec<u8>,
}

impl ParsedCoseSign1 {
    pub fn signature1_sig_structure_view(&self) -> SigStructureView<'_> {
        SigStructureView {
            context: SIG_STRUCTURE_CONTEXT_SIGNATURE1,
            body_protected: self.protected_headers.encoded_map_cbor(),
            external_aad: &[],
            payload: &self.payload,
        }
    }

    fn header_map_for(&self, label: i64) -> &CoseHeaderMap {
        if self.protected_headers.get(label).is_some() {
            &self.protected_headers
        } else {
            &self.unprotected_headers
        }
    }

    /// COSE `alg`. The unprotected header is consulted only when the protected one has no `alg`.
    ///
    /// A protected `alg` that is not an integer yields `None`.
    pub fn alg(&self) -> Option<i64> {
        self.header_map_for(HEADER_ALG).get_i64(HEADER_ALG)
    }

    /// COSE `kid`, with the same precedence as [`Self::alg`].
    pub fn kid(&self) -> Option<&[u8]> {
        self.header_map_for(HEADER_KID).get_bytes(HEADER_KID)
    }
}
