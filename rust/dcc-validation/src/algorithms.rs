// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// Supported COSE algorithms (IANA COSE Algorithms registry).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(i64)]
pub enum CoseAlgorithm {
    /// ECDSA w/ SHA-256 over P-256.
    ES256 = -7,
    /// ECDSA w/ SHA-384 over P-384.
    ES384 = -35,
    /// ECDSA w/ SHA-512 over P-521.
    ES512 = -36,
    /// RSASSA-PSS w/ SHA-256.
    PS256 = -37,
    /// RSASSA-PKCS1v1.5 w/ SHA-256.
    RS256 = -257,
}

impl CoseAlgorithm {
    pub fn from_i64(id: i64) -> Option<Self> {
        match id {
            -7 => Some(Self::ES256),
            -35 => Some(Self::ES384),
            -36 => Some(Self::ES512),
            -37 => Some(Self::PS256),
            -257 => Some(Self::RS256),
            _ => None,
        }
    }

    pub fn id(self) -> i64 {
        self as i64
    }
}
