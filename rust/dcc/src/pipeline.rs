// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The decode-and-verify state machine.
//!
//! Stages run strictly in order. A fatal error moves the machine to `Failed`
//! and skips every later stage; a signature problem does not.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use dcc_abstractions::{KidLookup, ParsedCoseSign1};
use dcc_common::{base45, cbor, inflate, parse_cose_sign1, strip_hc1_prefix};
use dcc_validation::verify_parsed_cose_sign1;
use tracing::{debug, trace};

use crate::claims::map_claims;
use crate::error::{ParseError, Stage};
use crate::parsing_result::ParseResult;
use crate::settings::{DecodeLimits, ParseOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PipelineState {
    Start,
    PrefixStripped,
    Base45Decoded,
    Inflated,
    CborDecoded,
    CoseUnwrapped,
    SignatureChecked,
    ClaimsMapped,
    Done,
    Failed(Stage),
}

struct Pipeline {
    state: PipelineState,
}

impl Pipeline {
    fn new() -> Self {
        Self {
            state: PipelineState::Start,
        }
    }

    fn advance(&mut self, next: PipelineState) {
        trace!(from = ?self.state, to = ?next, "pipeline transition");
        self.state = next;
    }

    fn fail(&mut self, err: ParseError) -> ParseError {
        debug!(stage = %err.stage(), error = %err, "certificate rejected");
        self.advance(PipelineState::Failed(err.stage()));
        err
    }

    fn unwrap_envelope(&mut self, text: &str, limits: &DecodeLimits) -> Result<ParsedCoseSign1, ParseError> {
        let body = strip_hc1_prefix(text);
        self.advance(PipelineState::PrefixStripped);

        let compressed = base45::decode(body).map_err(|e| self.fail(e.into()))?;
        self.advance(PipelineState::Base45Decoded);

        let inflated = inflate(&compressed, limits.max_inflated_len).map_err(|e| self.fail(e.into()))?;
        self.advance(PipelineState::Inflated);

        let value = cbor::decode_exact(&inflated, limits.max_nesting_depth).map_err(|e| self.fail(e.into()))?;
        self.advance(PipelineState::CborDecoded);

        let parsed = parse_cose_sign1(value, limits.max_nesting_depth).map_err(|e| self.fail(e.into()))?;
        self.advance(PipelineState::CoseUnwrapped);
        Ok(parsed)
    }
}

/// Run the stages up to and including COSE unwrapping.
pub(crate) fn decode_certificate(text: &str, limits: &DecodeLimits) -> Result<ParsedCoseSign1, ParseError> {
    Pipeline::new().unwrap_envelope(text, limits)
}

pub(crate) fn run(text: &str, keys: &dyn KidLookup, options: &ParseOptions) -> ParseResult {
    let mut pipeline = Pipeline::new();

    let parsed = match pipeline.unwrap_envelope(text, &options.limits) {
        Ok(parsed) => parsed,
        Err(err) => return ParseResult::failure(&err),
    };

    let verification = verify_parsed_cose_sign1(&parsed, keys, &options.verify_options());
    pipeline.advance(PipelineState::SignatureChecked);

    let claims = match map_claims(&parsed.payload, options.limits.max_nesting_depth) {
        Ok(claims) => claims,
        Err(e) => return ParseResult::failure(&pipeline.fail(e.into())),
    };
    pipeline.advance(PipelineState::ClaimsMapped);

    let kid = parsed.kid().map(|kid| STANDARD.encode(kid));
    let result = ParseResult::success(kid, parsed.alg(), claims);
    let result = match verification {
        Ok(signer) => result.with_signature_valid(signer.key_label),
        Err(e) => {
            debug!(code = e.code, "signature not accepted");
            result.with_signature_error(e.message, e.code)
        }
    };

    pipeline.advance(PipelineState::Done);
    result
}
