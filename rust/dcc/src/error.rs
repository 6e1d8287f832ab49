// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use dcc_common::{Base45Error, CborError, CoseError, InflateError};

use crate::claims::ClaimsError;

/// Pipeline stage that can reject a certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Base45,
    Inflate,
    Cbor,
    Cose,
    Claims,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Base45 => "base45",
            Stage::Inflate => "inflate",
            Stage::Cbor => "cbor",
            Stage::Cose => "cose",
            Stage::Claims => "claims",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fatal decoding error. Signature problems are not errors; see `ParseResult::signature_valid`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("base45: {0}")]
    Base45(#[from] Base45Error),
    #[error("inflate: {0}")]
    Inflate(#[from] InflateError),
    #[error("cbor: {0}")]
    Cbor(#[from] CborError),
    #[error("cose: {0}")]
    Cose(#[from] CoseError),
    #[error("claims: {0}")]
    Claims(#[from] ClaimsError),
}

impl ParseError {
    pub fn stage(&self) -> Stage {
        match self {
            ParseError::Base45(_) => Stage::Base45,
            ParseError::Inflate(_) => Stage::Inflate,
            ParseError::Cbor(_) => Stage::Cbor,
            ParseError::Cose(_) => Stage::Cose,
            ParseError::Claims(_) => Stage::Claims,
        }
    }
}
