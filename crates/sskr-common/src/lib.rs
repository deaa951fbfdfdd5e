// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Common infrastructure for the SSKR secure-element core.
//!
//! This crate provides the unified error type and the logging subsystem
//! shared by the crypto and engine crates.
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting for embedded debugging
//!
//! # Security
//!
//! No heap allocations are performed here; log entries are bounded heapless
//! strings and must never contain key or share material.

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod log;

pub use errors::{Error, Result};
