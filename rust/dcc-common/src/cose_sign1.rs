// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use minicbor::Encoder;

use dcc_abstractions::{CborValue, CoseHeaderMap, ParsedCoseSign1, COSE_SIGN1_TAG};

use crate::cbor;
use crate::header_map::{decode_header_map_from_cbor, header_map_from_value};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoseError {
    #[error("malformed COSE_Sign1: {0}")]
    Malformed(String),
}

fn malformed(msg: impl Into<String>) -> CoseError {
    CoseError::Malformed(msg.into())
}

/// Interpret a decoded CBOR item as COSE_Sign1.
///
/// COSE_Sign1 = [ protected : bstr, unprotected : map, payload : bstr, signature : bstr ]
///
/// The array may be wrapped in tag 18; an untagged array is accepted as well
/// because issuers differ. Any other tag is rejected. `max_depth` bounds the
/// nested decode of the protected header bstr.
pub fn parse_cose_sign1(value: CborValue, max_depth: usize) -> Result<ParsedCoseSign1, CoseError> {
    let body = match value {
        CborValue::Tagged(COSE_SIGN1_TAG, inner) => *inner,
        CborValue::Tagged(tag, _) => {
            return Err(malformed(format!(
                "unexpected CBOR tag {tag} (expected COSE_Sign1 tag 18 or no tag)"
            )))
        }
        other => other,
    };

    let items = match body {
        CborValue::Array(items) => items,
        other => return Err(malformed(format!("top-level item is a {}, not an array", other.kind()))),
    };

    let len = items.len();
    let [protected, unprotected, payload, signature] =
        <[CborValue; 4]>::try_from(items).map_err(|_| malformed(format!("array length was {len}, expected 4")))?;

    // protected headers (bstr wrapping an encoded map)
    let protected_bstr = match protected {
        CborValue::Bytes(b) => b,
        other => return Err(malformed(format!("protected headers are a {}, not a bstr", other.kind()))),
    };
    let protected_map = decode_header_map_from_cbor(&protected_bstr, max_depth)
        .map_err(|e| malformed(format!("failed to parse protected headers: {e}")))?;

    // unprotected headers (map)
    let unprotected_map =
        header_map_from_value(unprotected).map_err(|e| malformed(format!("unprotected headers: {e}")))?;

    // payload (bstr)
    let payload = match payload {
        CborValue::Bytes(b) => b,
        CborValue::Null => return Err(malformed("detached payload is not supported")),
        other => return Err(malformed(format!("payload is a {}, not a bstr", other.kind()))),
    };

    // signature (bstr)
    let signature = match signature {
        CborValue::Bytes(b) => b,
        other => return Err(malformed(format!("signature is a {}, not a bstr", other.kind()))),
    };

    Ok(ParsedCoseSign1 {
        protected_headers: CoseHeaderMap::new_protected(protected_bstr, protected_map),
        unprotected_headers: CoseHeaderMap::new_unprotected(unprotected_map),
        payload,
        signature,
    })
}

/// Decode COSE_Sign1 straight from its CBOR encoding.
pub fn parse_cose_sign1_bytes(input: &[u8], max_depth: usize) -> Result<ParsedCoseSign1, CoseError> {
    let value = cbor::decode_exact(input, max_depth).map_err(|e| malformed(e.to_string()))?;
    parse_cose_sign1(value, max_depth)
}

/// Encode Sig_structure = [ "Signature1", body_protected, external_aad (empty), payload ].
pub fn encode_signature1_sig_structure(msg: &ParsedCoseSign1) -> Result<Vec<u8>, String> {
    let view = msg.signature1_sig_structure_view();

    let mut out = Vec::with_capacity(128 + view.body_protected.len() + view.payload.len());
    {
        let mut enc = Encoder::new(&mut out);
        enc.array(4).map_err(|e| e.to_string())?;
        enc.str(view.context).map_err(|e| e.to_string())?;
        enc.bytes(view.body_protected).map_err(|e| e.to_string())?;
        enc.bytes(view.external_aad).map_err(|e| e.to_string())?;
        enc.bytes(view.payload).map_err(|e| e.to_string())?;
    }
    Ok(out)
}
