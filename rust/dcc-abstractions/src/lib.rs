// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared interfaces and datatypes for the DCC Rust crates.
//!
//! This crate exists to prevent circular dependencies across:
//! - wire-format decoding (`dcc-common`)
//! - signature verification (`dcc-validation`)
//! - the high-level facade (`dcc`)
//!
//! It is intentionally kept small and dependency-free.

pub mod cbor_value;
pub mod header_map;
pub mod key_provider;
pub mod parsed_cose_sign1;

pub use cbor_value::{CborKey, CborValue};
pub use header_map::{CoseHeaderMap, HEADER_ALG, HEADER_KID};
pub use key_provider::{KidLookup, NoKeys, TrustedKey};
pub use parsed_cose_sign1::{ParsedCoseSign1, SigStructureView, COSE_SIGN1_TAG, SIG_STRUCTURE_CONTEXT_SIGNATURE1};
