// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Decode and verify HC1 health certificates.
//!
//! The pipeline strips the `HC1:` prefix, Base45-decodes, inflates, unwraps the
//! COSE_Sign1 envelope, checks the signature against a caller-supplied key
//! store and maps the CWT claims. Signature problems never hide the claims:
//! they surface as `signature_valid = false` on an otherwise successful
//! [`ParseResult`].

mod api;
mod claims;
mod error;
mod parsing_result;
mod pipeline;
mod settings;
mod trust_list;

pub use api::{decode_certificate, parse, parse_untrusted, parse_with_options};
pub use claims::{
    map_claims, CertificateEntry, ClaimsError, CwtClaims, HealthCertificate, PersonName, CLAIM_EXPIRATION,
    CLAIM_HEALTH_CERTIFICATE, CLAIM_ISSUED_AT, CLAIM_ISSUER, HCERT_SCHEMA_V1,
};
pub use error::{ParseError, Stage};
pub use parsing_result::ParseResult;
pub use settings::{DecodeLimits, ParseOptions};
pub use trust_list::{TrustList, TrustListError};

pub use dcc_abstractions::{CborKey, CborValue, KidLookup, NoKeys, ParsedCoseSign1, TrustedKey};
pub use dcc_validation::{error_codes, CoseAlgorithm};
