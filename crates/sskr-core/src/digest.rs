// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Share integrity digest.
//!
//! Shamir embeds a short checksum of the secret at the reserved x = 254
//! coordinate: the leading [`DIGEST_SIZE`] bytes of HMAC-SHA-256 over the
//! secret, keyed with fresh randomness that rides along in the same row.

use sskr_common::{Error, Result};
use sskr_crypto::KeyedMac;

/// Size of the integrity digest in bytes
pub const DIGEST_SIZE: usize = 4;

/// Compute the keyed digest of `data`, writing the leading `out.len()`
/// bytes of the MAC output
///
/// Call sites pass a [`DIGEST_SIZE`]-byte output. The key is
/// caller-supplied randomness of length `secret_len - DIGEST_SIZE`.
pub fn share_digest<M: KeyedMac>(key: &[u8], data: &[u8], out: &mut [u8]) -> Result<()> {
    M::mac(key, data, out).map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use sskr_crypto::HmacSha256;

    #[test]
    fn digest_is_leading_mac_bytes() {
        // RFC 4231 test case 2, truncated
        let mut out = [0u8; DIGEST_SIZE];
        share_digest::<HmacSha256>(b"Jefe", b"what do ya want for nothing?", &mut out).unwrap();
        assert_eq!(out, hex!("5bdcc146"));
    }
}
