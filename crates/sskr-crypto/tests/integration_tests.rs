// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Tests exercising the crypto crate through its public surface.

use hex_literal::hex;
use sskr_crypto::{constant_time_eq, gf256, CryptoError, HmacSha256, KeyedMac};

#[test]
fn field_inverse_sweep() {
    for a in 1..=255u8 {
        assert_eq!(gf256::div(a, a), 1, "a/a for a={a}");
        assert_eq!(gf256::mul(a, gf256::div(1, a)), 1, "a·a⁻¹ for a={a}");
    }
}

#[test]
fn interpolation_is_linear_in_y() {
    // interpolating the XOR of two y-vectors equals the XOR of the
    // interpolations
    let xs = [1u8, 2, 7];
    let ya = [80u8, 90, 20];
    let yb = [43u8, 22, 86];

    for x in [0u8, 5, 254, 255] {
        let mut pa = Vec::new();
        let mut pb = Vec::new();
        let mut pc = Vec::new();
        for i in 0..3 {
            pa.extend_from_slice(&[xs[i], ya[i]]);
            pb.extend_from_slice(&[xs[i], yb[i]]);
            pc.extend_from_slice(&[xs[i], ya[i] ^ yb[i]]);
        }
        assert_eq!(
            gf256::interpolate(x, &pc),
            gf256::interpolate(x, &pa) ^ gf256::interpolate(x, &pb)
        );
    }
}

#[test]
fn mac_binding_matches_rfc4231_case_3() {
    let key = [0xAAu8; 20];
    let data = [0xDDu8; 50];
    let mut out = [0u8; 32];
    HmacSha256::mac(&key, &data, &mut out).unwrap();
    assert_eq!(
        out,
        hex!("773ea91e36800e46854db8ebd09181a72959098b3ef8c122d9635514ced565fe")
    );
}

#[test]
fn mac_rejects_oversized_output() {
    let mut out = [0u8; 64];
    assert_eq!(
        HmacSha256::mac(b"key", b"data", &mut out),
        Err(CryptoError::BufferTooSmall)
    );
}

#[test]
fn constant_time_eq_handles_lengths() {
    assert!(constant_time_eq(b"abcd", b"abcd"));
    assert!(!constant_time_eq(b"abcd", b"abce"));
    assert!(!constant_time_eq(b"abcd", b"abc"));
}
