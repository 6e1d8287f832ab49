// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Signing-key resolution by key identifier.
//!
//! Trust material is never ambient: callers pass a `KidLookup` into the
//! verifier, so tests and hosts control exactly which keys are trusted.

use std::collections::HashMap;
use std::sync::Arc;

/// Public key material for a trusted signer.
///
/// `public_key_bytes` is forwarded to signature verification. Accepted
/// encodings are DER X.509 certificate, DER SubjectPublicKeyInfo, or (for EC
/// curves) a SEC1 encoded point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedKey {
    pub public_key_bytes: Vec<u8>,
    /// Optional human-readable origin (country, trust list name, ...).
    pub label: Option<String>,
}

impl TrustedKey {
    pub fn new(public_key_bytes: Vec<u8>) -> Self {
        Self {
            public_key_bytes,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A read-only key store keyed by the raw `kid` bytes.
///
/// Contract:
/// - Return `None` when no key is known for `kid`.
/// - Lookups must not mutate shared state; one store may serve concurrent parses.
pub trait KidLookup: Send + Sync {
    fn lookup(&self, kid: &[u8]) -> Option<TrustedKey>;
}

/// Resolver that trusts nothing. Every signature check yields `signature_valid = false`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoKeys;

impl KidLookup for NoKeys {
    fn lookup(&self, _kid: &[u8]) -> Option<TrustedKey> {
        None
    }
}

impl KidLookup for HashMap<Vec<u8>, TrustedKey> {
    fn lookup(&self, kid: &[u8]) -> Option<TrustedKey> {
        self.get(kid).cloned()
    }
}

impl<T: KidLookup + ?Sized> KidLookup for &T {
    fn lookup(&self, kid: &[u8]) -> Option<TrustedKey> {
        (**self).lookup(kid)
    }
}

impl<T: KidLookup + ?Sized> KidLookup for Arc<T> {
    fn lookup(&self, kid: &[u8]) -> Option<TrustedKey> {
        (**self).lookup(kid)
    }
}
