// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! In-memory signer key store.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use dcc_abstractions::{KidLookup, TrustedKey};
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum TrustListError {
    #[error("trust list is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Trusted signer keys by raw `kid`.
#[derive(Debug, Default, Clone)]
pub struct TrustList {
    keys: HashMap<Vec<u8>, TrustedKey>,
}

impl TrustList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the key for `kid`.
    pub fn insert(&mut self, kid: impl Into<Vec<u8>>, key: TrustedKey) -> Option<TrustedKey> {
        self.keys.insert(kid.into(), key)
    }

    pub fn with_key(mut self, kid: impl Into<Vec<u8>>, key: TrustedKey) -> Self {
        self.insert(kid, key);
        self
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Load `{"<kid base64>": "<DER certificate or SPKI, base64>", ...}`.
    ///
    /// Entries whose kid or key is not valid base64 are skipped with a warning.
    pub fn from_json(json: &str) -> Result<Self, TrustListError> {
        let entries: HashMap<String, String> = serde_json::from_str(json)?;

        let mut list = Self::new();
        for (kid_b64, key_b64) in entries {
            let kid = match STANDARD.decode(kid_b64.as_bytes()) {
                Ok(kid) => kid,
                Err(e) => {
                    warn!(kid = %kid_b64, error = %e, "skipping trust list entry with invalid kid");
                    continue;
                }
            };
            let key = match STANDARD.decode(key_b64.as_bytes()) {
                Ok(key) => key,
                Err(e) => {
                    warn!(kid = %kid_b64, error = %e, "skipping trust list entry with invalid key");
                    continue;
                }
            };
            list.insert(kid, TrustedKey::new(key));
        }
        Ok(list)
    }
}

impl KidLookup for TrustList {
    fn lookup(&self, kid: &[u8]) -> Option<TrustedKey> {
        self.keys.get(kid).cloned()
    }
}
