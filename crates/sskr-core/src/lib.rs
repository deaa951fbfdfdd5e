// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Sharded Secret Key Reconstruction (SSKR) for secure-element execution.
//!
//! This crate splits a 16–32 byte master secret into shares under a
//! two-level (group-of-groups) threshold policy, and reconstructs it by
//! accumulating shares across any number of host transactions. Shares may
//! arrive in any order, in any grouping, with duplicates; the accumulator
//! pins the share-set identity on the first share and drives group-level
//! and then top-level Shamir recovery as thresholds are met.
//!
//! The Shamir layer follows the SLIP-39 convention: share `j` sits at
//! x-coordinate `j`, the secret at x = 255, and a 4-byte HMAC-SHA-256
//! integrity digest at x = 254, so a wrong reconstruction is rejected with
//! probability 1 − 2⁻³².
//!
//! # Security
//!
//! - All session state, scratch buffers, and staged secrets are zeroized on
//!   release and on every error path.
//! - Digest comparison is constant-time.
//! - Working memory is allocated fallibly and sized to the policy in play,
//!   not to the worst case.
//!
//! # Collaborators
//!
//! Entropy and the keyed MAC are consumed through the `sskr-crypto` traits;
//! the host supplies both. Nothing here persists across power loss: a power
//! cycle mid-session is an implicit reset.

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

extern crate alloc;

pub mod command;
pub mod digest;
pub mod shamir;
pub mod share;
pub mod sskr;

pub use share::{ShareHeader, METADATA_SIZE};
pub use sskr::{generate_shares, GroupSpec, Sskr};
