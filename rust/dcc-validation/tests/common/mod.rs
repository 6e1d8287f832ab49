// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Signed COSE_Sign1 fixtures for verifier tests.

#![allow(dead_code)]

use minicbor::data::Tag;
use minicbor::Encoder;
use p256::pkcs8::EncodePublicKey as _;
use signature::Signer as _;

pub(crate) fn p256_key() -> p256::ecdsa::SigningKey {
    p256::ecdsa::SigningKey::from_slice(&[0x42; 32]).unwrap()
}

pub(crate) fn other_p256_key() -> p256::ecdsa::SigningKey {
    p256::ecdsa::SigningKey::from_slice(&[0x24; 32]).unwrap()
}

pub(crate) fn p384_key() -> p384::ecdsa::SigningKey {
    p384::ecdsa::SigningKey::from_slice(&[0x42; 48]).unwrap()
}

pub(crate) fn p256_spki(key: &p256::ecdsa::SigningKey) -> Vec<u8> {
    key.verifying_key().to_public_key_der().unwrap().as_bytes().to_vec()
}

pub(crate) fn p256_sec1_point(key: &p256::ecdsa::SigningKey) -> Vec<u8> {
    key.verifying_key().to_encoded_point(false).as_bytes().to_vec()
}

pub(crate) fn p384_spki(key: &p384::ecdsa::SigningKey) -> Vec<u8> {
    key.verifying_key().to_public_key_der().unwrap().as_bytes().to_vec()
}

/// Protected header map with optional `alg` (label 1) and `kid` (label 4).
pub(crate) fn protected(alg: Option<i64>, kid: Option<&[u8]>) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut enc = Encoder::new(&mut buf);
    enc.map(alg.is_some() as u64 + kid.is_some() as u64).unwrap();
    if let Some(alg) = alg {
        enc.i64(1).unwrap();
        enc.i64(alg).unwrap();
    }
    if let Some(kid) = kid {
        enc.i64(4).unwrap();
        enc.bytes(kid).unwrap();
    }
    buf
}

/// Signature1 Sig_structure with empty external_aad.
pub(crate) fn sig_structure(protected: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut enc = Encoder::new(&mut buf);
    enc.array(4).unwrap();
    enc.str("Signature1").unwrap();
    enc.bytes(protected).unwrap();
    enc.bytes(&[]).unwrap();
    enc.bytes(payload).unwrap();
    buf
}

pub(crate) fn envelope(protected: &[u8], payload: &[u8], signature: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut enc = Encoder::new(&mut out);
    enc.tag(Tag::new(18)).unwrap();
    enc.array(4).unwrap();
    enc.bytes(protected).unwrap();
    enc.map(0).unwrap();
    enc.bytes(payload).unwrap();
    enc.bytes(signature).unwrap();
    out
}

pub(crate) fn sign_es256(key: &p256::ecdsa::SigningKey, protected: &[u8], payload: &[u8]) -> Vec<u8> {
    let sig: p256::ecdsa::Signature = key.sign(&sig_structure(protected, payload));
    envelope(protected, payload, &sig.to_bytes())
}

pub(crate) fn sign_es384(key: &p384::ecdsa::SigningKey, protected: &[u8], payload: &[u8]) -> Vec<u8> {
    let sig: p384::ecdsa::Signature = key.sign(&sig_structure(protected, payload));
    envelope(protected, payload, &sig.to_bytes())
}

/// Envelope whose signature comes from `sign` over the Sig_structure.
pub(crate) fn sign_with(protected: &[u8], payload: &[u8], sign: impl FnOnce(&[u8]) -> Vec<u8>) -> Vec<u8> {
    let signature = sign(&sig_structure(protected, payload));
    envelope(protected, payload, &signature)
}

/// Flip the lowest bit of the last signature byte. The signature is the last item of the envelope.
pub(crate) fn flip_signature_bit(cose: &[u8]) -> Vec<u8> {
    let mut out = cose.to_vec();
    if let Some(last) = out.last_mut() {
        *last ^= 0x01;
    }
    out
}
