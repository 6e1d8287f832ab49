// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! COSE_Sign1 signature verification for HC1 certificates.
//!
//! The verification path is:
//! - Determine the COSE `alg` header and optionally pin it.
//! - Resolve the signer's public key from the `kid` header via a [`KidLookup`].
//! - Build the Signature1 Sig_structure.
//! - Verify the signature with the resolved key material.
//!
//! Public key inputs accepted from the key store:
//! - DER X.509 certificate (the SubjectPublicKeyInfo is extracted)
//! - DER SubjectPublicKeyInfo (SPKI)
//! - SEC1 encoded EC point (ECDSA only)
//!
//! A rejected signature is a [`SignatureError`] carrying a stable code from
//! [`error_codes`]. Callers treat it as a verdict on the signer, not as a
//! reason to stop reading the certificate.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use dcc_abstractions::{KidLookup, ParsedCoseSign1, HEADER_ALG};
use dcc_common::{encode_signature1_sig_structure, parse_cose_sign1_bytes, DEFAULT_MAX_NESTING_DEPTH};
use rsa::pkcs1v15;
use rsa::pkcs8::DecodePublicKey as _;
use rsa::pss;
use rsa::RsaPublicKey;
use sha2::Sha256;
use signature::Verifier;
use tracing::debug;
use x509_parser::prelude::FromDer as _;

use crate::algorithms::CoseAlgorithm;

/// Machine-readable codes attached to [`SignatureError`].
pub mod error_codes {
    pub const COSE_PARSE_ERROR: &str = "COSE_PARSE_ERROR";
    pub const MISSING_OR_INVALID_ALG: &str = "MISSING_OR_INVALID_ALG";
    pub const UNSUPPORTED_ALG: &str = "UNSUPPORTED_ALG";
    pub const ALG_MISMATCH: &str = "ALG_MISMATCH";
    pub const MISSING_KID: &str = "MISSING_KID";
    pub const KEY_NOT_FOUND: &str = "KEY_NOT_FOUND";
    pub const SIGSTRUCT_ERROR: &str = "SIGSTRUCT_ERROR";
    pub const INVALID_PUBLIC_KEY: &str = "INVALID_PUBLIC_KEY";
    pub const BAD_SIGNATURE: &str = "BAD_SIGNATURE";
}

/// OID of `id-ecPublicKey` (RFC 5480).
const EC_PUBLIC_KEY_OID: &str = "1.2.840.10045.2.1";

#[derive(Debug, Default, Clone)]
pub struct VerifyOptions {
    /// If set, verification fails unless the COSE `alg` header equals this value.
    pub expected_alg: Option<CoseAlgorithm>,
}

/// Why a signature was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct SignatureError {
    /// One of the [`error_codes`] constants.
    pub code: &'static str,
    pub message: String,
}

impl SignatureError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// The signer behind an accepted signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedSigner {
    pub alg: CoseAlgorithm,
    pub kid: Vec<u8>,
    /// Label the key store attached to the key, if any.
    pub key_label: Option<String>,
}

/// Verify an encoded COSE_Sign1 message.
pub fn verify_cose_sign1(
    cose_sign1: &[u8],
    keys: &dyn KidLookup,
    options: &VerifyOptions,
) -> Result<VerifiedSigner, SignatureError> {
    let parsed = parse_cose_sign1_bytes(cose_sign1, DEFAULT_MAX_NESTING_DEPTH)
        .map_err(|e| SignatureError::new(error_codes::COSE_PARSE_ERROR, e.to_string()))?;
    verify_parsed_cose_sign1(&parsed, keys, options)
}

/// Verify a previously parsed COSE_Sign1 against the key registered for its `kid`.
pub fn verify_parsed_cose_sign1(
    parsed: &ParsedCoseSign1,
    keys: &dyn KidLookup,
    options: &VerifyOptions,
) -> Result<VerifiedSigner, SignatureError> {
    let alg = cose_alg(parsed)?;

    if let Some(expected) = options.expected_alg {
        if expected != alg {
            return Err(SignatureError::new(
                error_codes::ALG_MISMATCH,
                format!("alg header mismatch: expected {expected:?}, got {alg:?}"),
            ));
        }
    }

    let kid = parsed
        .kid()
        .ok_or_else(|| SignatureError::new(error_codes::MISSING_KID, "missing kid header"))?;
    let kid_b64 = STANDARD.encode(kid);

    let Some(key) = keys.lookup(kid) else {
        debug!(kid = %kid_b64, "no trusted key for kid");
        return Err(SignatureError::new(
            error_codes::KEY_NOT_FOUND,
            format!("no trusted key for kid {kid_b64}"),
        ));
    };

    let sig_structure = encode_signature1_sig_structure(parsed)
        .map_err(|e| SignatureError::new(error_codes::SIGSTRUCT_ERROR, e))?;

    match verify_sig_structure(alg, &key.public_key_bytes, &sig_structure, &parsed.signature) {
        Ok(()) => {
            debug!(kid = %kid_b64, alg = ?alg, label = ?key.label, "signature verified");
            Ok(VerifiedSigner {
                alg,
                kid: kid.to_vec(),
                key_label: key.label,
            })
        }
        Err(e) => {
            debug!(kid = %kid_b64, alg = ?alg, code = e.code, "signature rejected");
            Err(e)
        }
    }
}

/// Resolve the COSE `alg` header, protected map first.
fn cose_alg(parsed: &ParsedCoseSign1) -> Result<CoseAlgorithm, SignatureError> {
    let present = parsed.protected_headers.get(HEADER_ALG).is_some()
        || parsed.unprotected_headers.get(HEADER_ALG).is_some();

    let Some(v) = parsed.alg() else {
        let message = if present { "alg header is not an integer" } else { "missing alg header" };
        return Err(SignatureError::new(error_codes::MISSING_OR_INVALID_ALG, message));
    };

    CoseAlgorithm::from_i64(v)
        .ok_or_else(|| SignatureError::new(error_codes::UNSUPPORTED_ALG, format!("unsupported alg: {v}")))
}

/// Verify `signature` over `sig_structure` (RFC 9052 §4.4) for the given algorithm.
pub fn verify_sig_structure(
    alg: CoseAlgorithm,
    public_key_bytes: &[u8],
    sig_structure: &[u8],
    signature: &[u8],
) -> Result<(), SignatureError> {
    match alg {
        CoseAlgorithm::ES256 => verify_es256(public_key_bytes, sig_structure, signature),
        CoseAlgorithm::ES384 => verify_es384(public_key_bytes, sig_structure, signature),
        CoseAlgorithm::ES512 => verify_es512(public_key_bytes, sig_structure, signature),
        CoseAlgorithm::RS256 => verify_rs256(public_key_bytes, sig_structure, signature),
        CoseAlgorithm::PS256 => verify_ps256(public_key_bytes, sig_structure, signature),
    }
}

/// Extract the SEC1 point for an EC key given as DER cert, DER SPKI or a raw point.
///
/// When a certificate or SPKI is parsed, its algorithm OID must be `id-ecPublicKey`.
fn ec_point_from_key_input(key_input: &[u8]) -> Result<Vec<u8>, SignatureError> {
    let parsed = if let Ok((_, cert)) = x509_parser::parse_x509_certificate(key_input) {
        let spki = &cert.tbs_certificate.subject_pki;
        Some((spki.algorithm.algorithm.to_id_string(), spki.subject_public_key.data.to_vec()))
    } else if let Ok((_, spki)) = x509_parser::x509::SubjectPublicKeyInfo::from_der(key_input) {
        Some((spki.algorithm.algorithm.to_id_string(), spki.subject_public_key.data.to_vec()))
    } else {
        None
    };

    match parsed {
        Some((oid, _)) if oid != EC_PUBLIC_KEY_OID => Err(SignatureError::new(
            error_codes::INVALID_PUBLIC_KEY,
            format!("unexpected public key algorithm OID: expected {EC_PUBLIC_KEY_OID}, got {oid}"),
        )),
        Some((_, point)) => Ok(point),
        None => Ok(key_input.to_vec()),
    }
}

fn bad_key(curve: &str, e: impl std::fmt::Display) -> SignatureError {
    SignatureError::new(error_codes::INVALID_PUBLIC_KEY, format!("bad {curve} public key: {e}"))
}

fn bad_signature_bytes(alg: CoseAlgorithm, e: impl std::fmt::Display) -> SignatureError {
    SignatureError::new(error_codes::BAD_SIGNATURE, format!("bad {alg:?} signature: {e}"))
}

fn mismatch() -> SignatureError {
    SignatureError::new(error_codes::BAD_SIGNATURE, "signature verification failed")
}

// COSE carries ECDSA signatures as the raw `r || s` concatenation.

fn verify_es256(key: &[u8], msg: &[u8], sig: &[u8]) -> Result<(), SignatureError> {
    let point = ec_point_from_key_input(key)?;
    let vk = p256::ecdsa::VerifyingKey::from_sec1_bytes(&point).map_err(|e| bad_key("P-256", e))?;
    let sig = p256::ecdsa::Signature::from_slice(sig).map_err(|e| bad_signature_bytes(CoseAlgorithm::ES256, e))?;
    vk.verify(msg, &sig).map_err(|_| mismatch())
}

fn verify_es384(key: &[u8], msg: &[u8], sig: &[u8]) -> Result<(), SignatureError> {
    let point = ec_point_from_key_input(key)?;
    let vk = p384::ecdsa::VerifyingKey::from_sec1_bytes(&point).map_err(|e| bad_key("P-384", e))?;
    let sig = p384::ecdsa::Signature::from_slice(sig).map_err(|e| bad_signature_bytes(CoseAlgorithm::ES384, e))?;
    vk.verify(msg, &sig).map_err(|_| mismatch())
}

fn verify_es512(key: &[u8], msg: &[u8], sig: &[u8]) -> Result<(), SignatureError> {
    let point = ec_point_from_key_input(key)?;
    let vk = p521::ecdsa::VerifyingKey::from_sec1_bytes(&point).map_err(|e| bad_key("P-521", e))?;
    let sig = p521::ecdsa::Signature::from_slice(sig).map_err(|e| bad_signature_bytes(CoseAlgorithm::ES512, e))?;
    vk.verify(msg, &sig).map_err(|_| mismatch())
}

/// RSA keys come as DER SPKI or as a DER certificate wrapping one.
fn rsa_public_key(key: &[u8]) -> Result<RsaPublicKey, SignatureError> {
    let decoded = match x509_parser::parse_x509_certificate(key) {
        Ok((_, cert)) => RsaPublicKey::from_public_key_der(cert.tbs_certificate.subject_pki.raw),
        Err(_) => RsaPublicKey::from_public_key_der(key),
    };
    decoded.map_err(|e| bad_key("RSA", e))
}

fn verify_rs256(key: &[u8], msg: &[u8], sig: &[u8]) -> Result<(), SignatureError> {
    let vk = pkcs1v15::VerifyingKey::<Sha256>::new(rsa_public_key(key)?);
    let sig = pkcs1v15::Signature::try_from(sig).map_err(|e| bad_signature_bytes(CoseAlgorithm::RS256, e))?;
    vk.verify(msg, &sig).map_err(|_| mismatch())
}

fn verify_ps256(key: &[u8], msg: &[u8], sig: &[u8]) -> Result<(), SignatureError> {
    let vk = pss::VerifyingKey::<Sha256>::new(rsa_public_key(key)?);
    let sig = pss::Signature::try_from(sig).map_err(|e| bad_signature_bytes(CoseAlgorithm::PS256, e))?;
    vk.verify(msg, &sig).map_err(|_| mismatch())
}
