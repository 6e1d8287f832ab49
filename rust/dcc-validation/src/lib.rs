// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

mod algorithms;
pub mod cose_sign1_verifier;

pub use algorithms::CoseAlgorithm;
pub use cose_sign1_verifier::{
    error_codes, verify_cose_sign1, verify_parsed_cose_sign1, verify_sig_structure, SignatureError, VerifiedSigner,
    VerifyOptions,
};
pub use dcc_abstractions::{KidLookup, NoKeys, TrustedKey};
