// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use dcc_common::{DEFAULT_MAX_INFLATED_LEN, DEFAULT_MAX_NESTING_DEPTH};
use dcc_validation::{CoseAlgorithm, VerifyOptions};

/// Resource bounds applied while decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Ceiling on the inflated payload size, in bytes.
    pub(crate) max_inflated_len: usize,
    /// Maximum CBOR container/tag nesting depth.
    pub(crate) max_nesting_depth: usize,
}

impl DecodeLimits {
    pub fn with_max_inflated_len(mut self, max_inflated_len: usize) -> Self {
        self.max_inflated_len = max_inflated_len;
        self
    }

    pub fn with_max_nesting_depth(mut self, max_nesting_depth: usize) -> Self {
        self.max_nesting_depth = max_nesting_depth;
        self
    }

    pub fn max_inflated_len(&self) -> usize {
        self.max_inflated_len
    }

    pub fn max_nesting_depth(&self) -> usize {
        self.max_nesting_depth
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_inflated_len: DEFAULT_MAX_INFLATED_LEN,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ParseOptions {
    pub limits: DecodeLimits,
    /// If set, the signature is only accepted when the COSE `alg` header equals this value.
    pub expected_alg: Option<CoseAlgorithm>,
}

impl ParseOptions {
    pub fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Pin the signature algorithm.
    pub fn with_expected_alg(mut self, alg: CoseAlgorithm) -> Self {
        self.expected_alg = Some(alg);
        self
    }

    pub(crate) fn verify_options(&self) -> VerifyOptions {
        VerifyOptions {
            expected_alg: self.expected_alg,
        }
    }
}
