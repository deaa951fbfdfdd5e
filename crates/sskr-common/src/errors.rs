// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Error types for the SSKR core.
//!
//! All failures surfaced by the core are categorical. The host transport is
//! responsible for translating them into its native signalling (for an
//! ISO 7816 front end, see `sskr_core::command::status_word`).

use core::fmt;

/// Result type alias for SSKR core operations
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the SSKR core
///
/// No error is retried internally. An error raised while combining shares
/// poisons the accumulator; the caller must reset before continuing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    // =========================================================================
    // Parameter / cryptographic errors (0x01xx)
    // =========================================================================
    /// Malformed input or digest verification failure: out-of-range
    /// thresholds or counts, bad secret or share lengths, inconsistent
    /// share metadata, or a reconstruction whose integrity digest did not
    /// match
    IllegalValue,
    /// The entropy source failed to produce bytes
    RngFailure,

    // =========================================================================
    // Session errors (0x02xx)
    // =========================================================================
    /// A share disagreed with the identifier or group policy pinned by the
    /// first share of the current combine session
    IllegalUse,

    // =========================================================================
    // Resource errors (0x03xx)
    // =========================================================================
    /// A working buffer sized to the live policy could not be allocated
    ResourceExhausted,
    /// A caller-supplied output buffer is too short for the result
    BufferTooSmall,

    // =========================================================================
    // Dispatch errors (0x04xx)
    // =========================================================================
    /// The instruction byte is not part of the command surface
    UnsupportedCommand,
}

impl Error {
    /// Get the stable error code for this error
    ///
    /// Codes are grouped by category:
    /// - 0x01xx: parameter / cryptographic errors
    /// - 0x02xx: session errors
    /// - 0x03xx: resource errors
    /// - 0x04xx: dispatch errors
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::IllegalValue => 0x0101,
            Self::RngFailure => 0x0102,
            Self::IllegalUse => 0x0201,
            Self::ResourceExhausted => 0x0301,
            Self::BufferTooSmall => 0x0302,
            Self::UnsupportedCommand => 0x0401,
        }
    }

    /// Get a short description of the error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::IllegalValue => "illegal value",
            Self::RngFailure => "RNG failure",
            Self::IllegalUse => "illegal use",
            Self::ResourceExhausted => "resource exhausted",
            Self::BufferTooSmall => "buffer too small",
            Self::UnsupportedCommand => "unsupported command",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[0x{:04X}] {}", self.code(), self.description())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "[0x{:04X}] {}", self.code(), self.description());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_and_categorized() {
        assert_eq!(Error::IllegalValue.code(), 0x0101);
        assert_eq!(Error::RngFailure.code(), 0x0102);
        assert_eq!(Error::IllegalUse.code(), 0x0201);
        assert_eq!(Error::ResourceExhausted.code(), 0x0301);
        assert_eq!(Error::BufferTooSmall.code(), 0x0302);
        assert_eq!(Error::UnsupportedCommand.code(), 0x0401);
    }

    #[test]
    fn display_includes_code_and_description() {
        extern crate std;
        use std::string::ToString;

        assert_eq!(Error::IllegalUse.to_string(), "[0x0201] illegal use");
    }
}
