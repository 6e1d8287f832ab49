// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use serde::Serialize;

use crate::claims::CwtClaims;
use crate::error::ParseError;

/// Outcome of parsing one certificate.
///
/// `successful` reports whether the claims could be decoded; `signature_valid`
/// reports, independently, whether a trusted key vouched for them. A decoded
/// certificate with an unknown signer is `successful` with `signature_valid = false`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ParseResult {
    pub successful: bool,
    pub signature_valid: bool,
    /// Base64 of the `kid` header.
    pub kid: Option<String>,
    /// COSE `alg` header.
    pub algorithm: Option<i64>,
    pub data: Option<CwtClaims>,
    pub error: Option<String>,
    /// Label of the trusted key that vouched for the signature, if the key store had one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_label: Option<String>,
    /// Why the signature was not accepted, when it wasn't.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_error: Option<String>,
    #[serde(skip)]
    signature_error_code: Option<&'static str>,
}

impl ParseResult {
    pub(crate) fn failure(error: &ParseError) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Default::default()
        }
    }

    pub(crate) fn success(kid: Option<String>, algorithm: Option<i64>, data: CwtClaims) -> Self {
        Self {
            successful: true,
            kid,
            algorithm,
            data: Some(data),
            ..Default::default()
        }
    }

    pub(crate) fn with_signature_valid(mut self, key_label: Option<String>) -> Self {
        self.signature_valid = true;
        self.key_label = key_label;
        self.signature_error = None;
        self.signature_error_code = None;
        self
    }

    pub(crate) fn with_signature_error(mut self, message: String, code: &'static str) -> Self {
        self.signature_valid = false;
        self.key_label = None;
        self.signature_error = Some(message);
        self.signature_error_code = Some(code);
        self
    }

    /// Machine-readable reason for `signature_valid == false` (see `dcc::error_codes`).
    pub fn signature_error_code(&self) -> Option<&'static str> {
        self.signature_error_code
    }
}
