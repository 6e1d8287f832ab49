// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Wire-format layers of an HC1 payload.
//!
//! Each layer is a pure function from an owned or borrowed buffer to a new
//! owned value, returning a typed error instead of guessing on bad input:
//! - `prefix`: strip the `HC1:` scheme prefix.
//! - `base45`: text to bytes.
//! - `inflate`: zlib or raw deflate, with an output ceiling.
//! - `cbor`: bytes to `CborValue`, with a nesting bound.
//! - `cose_sign1`: `CborValue` to `ParsedCoseSign1`, plus Sig_structure encoding.

pub mod base45;
pub mod cbor;
pub mod cose_sign1;
mod header_map;
pub mod inflate;
pub mod prefix;

pub use base45::Base45Error;
pub use cbor::{CborError, DEFAULT_MAX_NESTING_DEPTH};
pub use cose_sign1::{encode_signature1_sig_structure, parse_cose_sign1, parse_cose_sign1_bytes, CoseError};
pub use inflate::{inflate, InflateError, DEFAULT_MAX_INFLATED_LEN};
pub use prefix::{strip_hc1_prefix, HC1_PREFIX};

pub use dcc_abstractions::{CborKey, CborValue, CoseHeaderMap, ParsedCoseSign1, SigStructureView};
