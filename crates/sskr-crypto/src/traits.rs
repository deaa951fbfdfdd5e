// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Collaborator interfaces consumed by the core.
//!
//! The core never owns a concrete entropy source or MAC implementation; the
//! host supplies both through these traits. All consumption is
//! byte-addressable and of lengths known up front, so implementations need
//! no internal buffering.

use crate::error::CryptoError;

/// Cryptographically secure random byte source
pub trait CryptoRng {
    /// Fill `dest` with random bytes
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::RngFailure` if the source fails.
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), CryptoError>;
}

impl<T: CryptoRng + ?Sized> CryptoRng for &mut T {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), CryptoError> {
        (**self).fill_bytes(dest)
    }
}

/// Keyed message authentication code
///
/// The core requires a correct HMAC-SHA-256; it consumes only a prefix of
/// the output. Implementations must not retain the key.
pub trait KeyedMac {
    /// Full MAC output size in bytes
    const OUTPUT_SIZE: usize;

    /// Compute the MAC of `data` under `key`, writing the leading
    /// `out.len()` bytes of the output
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::BufferTooSmall` if `out` is longer than
    /// [`Self::OUTPUT_SIZE`].
    fn mac(key: &[u8], data: &[u8], out: &mut [u8]) -> Result<(), CryptoError>;
}

/// Constant-time comparison
///
/// Compares two byte slices without secret-dependent branching.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    use subtle::ConstantTimeEq;
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_time_eq_basic() {
        assert!(constant_time_eq(&[1, 2, 3, 4], &[1, 2, 3, 4]));
        assert!(!constant_time_eq(&[1, 2, 3, 4], &[1, 2, 3, 5]));
        assert!(!constant_time_eq(&[1, 2, 3], &[1, 2, 3, 4]));
        assert!(constant_time_eq(&[], &[]));
    }
}
