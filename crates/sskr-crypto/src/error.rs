// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Cryptographic error types.

use core::fmt;

/// Error type for primitive operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoError {
    /// The entropy source failed to produce bytes
    RngFailure,
    /// An output buffer is too small for the requested tag length
    BufferTooSmall,
    /// Internal error (should not occur)
    InternalError,
}

impl CryptoError {
    /// Get a short description of the error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::RngFailure => "RNG failure",
            Self::BufferTooSmall => "buffer too small",
            Self::InternalError => "internal error",
        }
    }
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl From<CryptoError> for sskr_common::Error {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::RngFailure => Self::RngFailure,
            CryptoError::BufferTooSmall => Self::BufferTooSmall,
            CryptoError::InternalError => Self::IllegalValue,
        }
    }
}

/// Result type for primitive operations
pub type CryptoResult<T> = Result<T, CryptoError>;
