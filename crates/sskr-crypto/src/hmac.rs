// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Default HMAC-SHA-256 binding for the [`KeyedMac`] collaborator.
//!
//! Hosts with a hardware MAC engine supply their own `KeyedMac`
//! implementation instead; nothing else in the workspace names this type.

use hmac::{Hmac, Mac as _};
use sha2::Sha256;

use crate::error::CryptoError;
use crate::traits::KeyedMac;

/// HMAC-SHA-256 via the RustCrypto `hmac` and `sha2` crates
pub struct HmacSha256;

impl KeyedMac for HmacSha256 {
    const OUTPUT_SIZE: usize = 32;

    fn mac(key: &[u8], data: &[u8], out: &mut [u8]) -> Result<(), CryptoError> {
        if out.len() > Self::OUTPUT_SIZE {
            return Err(CryptoError::BufferTooSmall);
        }
        let mut mac =
            Hmac::<Sha256>::new_from_slice(key).map_err(|_| CryptoError::InternalError)?;
        mac.update(data);
        let tag = mac.finalize().into_bytes();
        out.copy_from_slice(&tag[..out.len()]);
        Ok(())
    }
}
