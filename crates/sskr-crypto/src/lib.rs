// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Cryptographic primitives for the SSKR secure-element core.
//!
//! This crate provides the GF(2⁸) field arithmetic underlying Shamir secret
//! sharing, together with the narrow collaborator interfaces the core
//! consumes: an abstract entropy source and an abstract keyed MAC. A default
//! HMAC-SHA-256 binding is included so the workspace is usable and testable
//! without a host-provided primitive.
//!
//! # Security
//!
//! - The digest comparison helper is constant-time.
//! - GF(2⁸) multiplication uses log/exp tables; the table indices are share
//!   coordinates and interpolation coefficients derived from public x
//!   values, not key material.
//! - Key material never transits this crate except through `KeyedMac::mac`
//!   parameters, which implementations must not retain.

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod gf256;
pub mod hmac;
pub mod traits;

pub use error::CryptoError;
pub use hmac::HmacSha256;
pub use traits::{constant_time_eq, CryptoRng, KeyedMac};
