// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use dcc_abstractions::{KidLookup, NoKeys, ParsedCoseSign1};

use crate::{pipeline, DecodeLimits, ParseError, ParseOptions, ParseResult};

/// Parse an HC1 certificate and verify its signature against `keys`.
///
/// The `HC1:` prefix is optional. Decoding failures yield `successful = false`;
/// an untrusted or invalid signature only clears `signature_valid`.
pub fn parse(text: &str, keys: &dyn KidLookup) -> ParseResult {
    pipeline::run(text, keys, &ParseOptions::default())
}

pub fn parse_with_options(text: &str, keys: &dyn KidLookup, options: &ParseOptions) -> ParseResult {
    pipeline::run(text, keys, options)
}

/// Parse without any trusted keys. `signature_valid` is always false.
pub fn parse_untrusted(text: &str) -> ParseResult {
    pipeline::run(text, &NoKeys, &ParseOptions::default())
}

/// Decode an HC1 certificate down to its COSE_Sign1 envelope, without verifying or mapping claims.
pub fn decode_certificate(text: &str, limits: &DecodeLimits) -> Result<ParsedCoseSign1, ParseError> {
    pipeline::decode_certificate(text, limits)
}
