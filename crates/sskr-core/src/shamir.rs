// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Shamir secret sharing over GF(2⁸), SLIP-39 convention.
//!
//! Shares are numbered 0..n-1 with each share's index as its x-coordinate,
//! unlike classic constructions that place the secret at x = 0. The secret
//! sits at x = 255 and its integrity digest row at x = 254; recovery
//! interpolates both and verifies the digest before releasing the secret.

use alloc::vec::Vec;
use zeroize::{Zeroize, Zeroizing};

use sskr_common::{Error, Result};
use sskr_crypto::{constant_time_eq, gf256, CryptoRng, KeyedMac};

use crate::digest::{share_digest, DIGEST_SIZE};

/// Maximum number of shares, and maximum threshold
pub const MAX_SHARE_COUNT: usize = 16;

/// Minimum secret length in bytes
pub const MIN_SECRET_SIZE: usize = 16;

/// Maximum secret length in bytes
pub const MAX_SECRET_SIZE: usize = 32;

/// Reserved x-coordinate carrying the secret
const SECRET_X: u8 = 0xFF;

/// Reserved x-coordinate carrying the digest row
const DIGEST_X: u8 = 0xFE;

/// Fallible zero-initialized allocation, sized to the live policy
pub(crate) fn try_vec(len: usize, fill: u8) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::ResourceExhausted)?;
    buf.resize(len, fill);
    Ok(buf)
}

pub(crate) fn check_secret_len(len: usize) -> Result<()> {
    if !(MIN_SECRET_SIZE..=MAX_SECRET_SIZE).contains(&len) || len % 2 != 0 {
        return Err(Error::IllegalValue);
    }
    Ok(())
}

/// Split `secret` into `share_count` shares, any `threshold` of which
/// recover it
///
/// Returns the shares concatenated back to back; share `j` occupies bytes
/// `[j·L, (j+1)·L)` and has x-coordinate `j`.
///
/// With `threshold == 1` every share is a literal copy of the secret.
/// Otherwise shares `0..threshold-2` are drawn from the entropy source
/// (digest key first, then the share block — the draw order is part of the
/// share-format contract) and the remaining shares are interpolated.
///
/// # Errors
///
/// `IllegalValue` unless `16 ≤ secret.len() ≤ 32` and even, and
/// `1 ≤ threshold ≤ share_count ≤ 16`.
pub fn split<M: KeyedMac, R: CryptoRng>(
    threshold: u8,
    share_count: u8,
    secret: &[u8],
    rng: &mut R,
) -> Result<Zeroizing<Vec<u8>>> {
    check_secret_len(secret.len())?;
    if threshold == 0 || threshold > share_count || share_count as usize > MAX_SHARE_COUNT {
        return Err(Error::IllegalValue);
    }

    let t = threshold as usize;
    let n = share_count as usize;
    let len = secret.len();

    let mut shares = Zeroizing::new(try_vec(n * len, 0)?);

    if t == 1 {
        for row in shares.chunks_exact_mut(len) {
            row.copy_from_slice(secret);
        }
        return Ok(shares);
    }

    // digest row: 4-byte tag over the secret, keyed with fresh randomness
    // occupying the rest of the row
    let mut digest_row = Zeroizing::new(try_vec(len, 0)?);
    {
        let (tag, key) = digest_row.split_at_mut(DIGEST_SIZE);
        rng.fill_bytes(key).map_err(Error::from)?;
        share_digest::<M>(key, secret, tag)?;
    }

    // shares 0..t-2 are pure entropy; everything else is interpolated
    if t > 2 {
        rng.fill_bytes(&mut shares[..(t - 2) * len])
            .map_err(Error::from)?;
    }

    let mut points = Zeroizing::new(try_vec(2 * t, 0)?);
    for i in 0..len {
        let mut p = 0;
        for j in 0..t - 2 {
            points[p] = j as u8;
            points[p + 1] = shares[j * len + i];
            p += 2;
        }
        points[p] = DIGEST_X;
        points[p + 1] = digest_row[i];
        points[p + 2] = SECRET_X;
        points[p + 3] = secret[i];

        for j in t - 2..n {
            shares[j * len + i] = gf256::interpolate(j as u8, &points);
        }
    }

    Ok(shares)
}

/// Combine shares to recover a secret
///
/// `x` holds the x-coordinates of the available shares; `shares` holds the
/// corresponding y-rows concatenated back to back (`x.len() · L` bytes).
/// The recovered secret is written to the front of `secret`.
///
/// Returns the number of bytes written, or `0` if digest verification
/// failed — in which case the output slice has been wiped. A failed digest
/// is not an error at this layer; the caller decides. Note that incorrect
/// or below-threshold shares can still slip past the check with
/// probability 2⁻³².
///
/// With a single share the row is returned verbatim; there is no digest to
/// check.
///
/// # Errors
///
/// `IllegalValue` on malformed parameters, `BufferTooSmall` if `secret`
/// cannot hold the result.
pub fn combine<M: KeyedMac>(x: &[u8], shares: &[u8], secret: &mut [u8]) -> Result<usize> {
    let t = x.len();
    if t == 0 || t > MAX_SHARE_COUNT {
        return Err(Error::IllegalValue);
    }
    if shares.is_empty() || shares.len() % t != 0 {
        return Err(Error::IllegalValue);
    }
    let len = shares.len() / t;
    check_secret_len(len)?;
    if secret.len() < len {
        return Err(Error::BufferTooSmall);
    }
    let out = &mut secret[..len];

    if t == 1 {
        out.copy_from_slice(&shares[..len]);
        return Ok(len);
    }

    let mut digest_row = Zeroizing::new(try_vec(len, 0)?);
    let mut points = Zeroizing::new(try_vec(2 * t, 0)?);
    for i in 0..len {
        for j in 0..t {
            points[2 * j] = x[j];
            points[2 * j + 1] = shares[j * len + i];
        }
        out[i] = gf256::interpolate(SECRET_X, &points);
        digest_row[i] = gf256::interpolate(DIGEST_X, &points);
    }

    let mut check = Zeroizing::new([0u8; DIGEST_SIZE]);
    share_digest::<M>(&digest_row[DIGEST_SIZE..], out, check.as_mut())?;

    if constant_time_eq(check.as_ref(), &digest_row[..DIGEST_SIZE]) {
        Ok(len)
    } else {
        out.zeroize();
        Ok(0)
    }
}
