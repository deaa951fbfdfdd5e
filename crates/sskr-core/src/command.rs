// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Host-facing command dispatch.
//!
//! The enclosing transport (an APDU front end, a test harness) hands each
//! instruction's data field to [`Handler::process`] and returns the
//! response buffer plus a status word to the host. The master secret used
//! by share generation is staged by the key-storage collaborator through
//! [`Handler::load_secret`]; it never crosses the command surface on the
//! way in, and only a completed recovery sends a secret out.
//!
//! Dispatch events and failures are recorded in the handler's log buffer —
//! opcodes, lengths, and status words only, never payload bytes.

use alloc::vec::Vec;

use zeroize::Zeroizing;

use sskr_common::log::LogBuffer;
use sskr_common::{log_debug, log_error, log_info, Error, Result};
use sskr_crypto::{CryptoRng, KeyedMac};

use crate::shamir::{MAX_SECRET_SIZE, MAX_SHARE_COUNT};
use crate::sskr::{generate_shares, GroupSpec, Sskr};

/// Return the data field unchanged (diagnostic)
pub const INS_ECHO: u8 = 0x00;

/// Split the staged secret: data = `gt ‖ g ‖ t₁ n₁ … t_g n_g`, response =
/// concatenated share records
pub const INS_GENERATE_SHARES: u8 = 0x02;

/// Absorb shares: data = `t ‖ t share records`, response = the recovered
/// secret, or empty while more shares are required
pub const INS_COMBINE_SHARES: u8 = 0x04;

/// Drop all accumulated recovery state
pub const INS_RESET: u8 = 0x06;

/// Status word reported on success
pub const SW_NO_ERROR: u16 = 0x9000;

const MODULE: &str = "command";

/// Map a core error onto its ISO 7816 status word
#[must_use]
pub fn status_word(err: &Error) -> u16 {
    match err {
        Error::IllegalValue => 0x6A80,
        Error::IllegalUse => 0x6985,
        Error::ResourceExhausted => 0x6A84,
        Error::BufferTooSmall => 0x6700,
        Error::UnsupportedCommand => 0x6D00,
        _ => 0x6F00,
    }
}

/// Command handler owning the accumulator, the entropy collaborator, and
/// the dispatch log
pub struct Handler<M: KeyedMac, R: CryptoRng> {
    combiner: Sskr<M>,
    rng: R,
    secret: Option<Zeroizing<Vec<u8>>>,
    log: LogBuffer,
}

impl<M: KeyedMac, R: CryptoRng> Handler<M, R> {
    /// Create a handler with no staged secret and no recovery session
    pub fn new(rng: R) -> Self {
        Self {
            combiner: Sskr::new(),
            rng,
            secret: None,
            log: LogBuffer::new(),
        }
    }

    /// Stage the master secret for subsequent `GENERATE_SHARES` commands
    ///
    /// Called by the key-storage collaborator, not by the host. The staged
    /// copy is wiped when replaced or when the handler drops.
    ///
    /// # Errors
    ///
    /// `ResourceExhausted` if the staging copy cannot be allocated. Length
    /// validation happens at generation time.
    pub fn load_secret(&mut self, secret: &[u8]) -> Result<()> {
        let mut staged = Vec::new();
        staged
            .try_reserve_exact(secret.len())
            .map_err(|_| Error::ResourceExhausted)?;
        staged.extend_from_slice(secret);
        self.secret = Some(Zeroizing::new(staged));
        Ok(())
    }

    /// Read access to the dispatch log
    #[must_use]
    pub fn log(&self) -> &LogBuffer {
        &self.log
    }

    /// Mutable access to the dispatch log (level control, read-out reset)
    pub fn log_mut(&mut self) -> &mut LogBuffer {
        &mut self.log
    }

    /// Dispatch one instruction
    ///
    /// Output bytes are appended to `response`. The transport reports
    /// [`SW_NO_ERROR`] on `Ok`, or [`status_word`] of the error otherwise.
    ///
    /// # Errors
    ///
    /// `UnsupportedCommand` for an unknown instruction byte; otherwise
    /// whatever the dispatched operation raises.
    pub fn process(&mut self, ins: u8, data: &[u8], response: &mut Vec<u8>) -> Result<()> {
        log_debug!(self.log, MODULE, "ins=0x{:02X} lc={}", ins, data.len());

        let result = match ins {
            INS_ECHO => self.echo(data, response),
            INS_GENERATE_SHARES => self.generate(data, response),
            INS_COMBINE_SHARES => self.combine(data, response),
            INS_RESET => {
                self.combiner.reset();
                Ok(())
            }
            _ => Err(Error::UnsupportedCommand),
        };

        if let Err(err) = &result {
            log_error!(self.log, MODULE, "ins=0x{:02X} sw=0x{:04X}", ins, status_word(err));
        }
        result
    }

    fn echo(&mut self, data: &[u8], response: &mut Vec<u8>) -> Result<()> {
        response
            .try_reserve(data.len())
            .map_err(|_| Error::ResourceExhausted)?;
        response.extend_from_slice(data);
        Ok(())
    }

    fn generate(&mut self, data: &[u8], response: &mut Vec<u8>) -> Result<()> {
        let secret = self.secret.as_ref().ok_or(Error::IllegalUse)?;

        let (&group_threshold, rest) = data.split_first().ok_or(Error::IllegalValue)?;
        let (&group_count, policy) = rest.split_first().ok_or(Error::IllegalValue)?;
        let g = group_count as usize;
        if g == 0 || g > MAX_SHARE_COUNT || policy.len() != 2 * g {
            return Err(Error::IllegalValue);
        }

        let mut groups = [GroupSpec {
            member_threshold: 0,
            member_count: 0,
        }; MAX_SHARE_COUNT];
        for (spec, pair) in groups.iter_mut().zip(policy.chunks_exact(2)) {
            spec.member_threshold = pair[0];
            spec.member_count = pair[1];
        }

        let shares =
            generate_shares::<M, _>(group_threshold, &groups[..g], secret, &mut self.rng)?;
        response
            .try_reserve(shares.len())
            .map_err(|_| Error::ResourceExhausted)?;
        response.extend_from_slice(&shares);

        log_info!(self.log, MODULE, "generated {} bytes of shares", shares.len());
        Ok(())
    }

    fn combine(&mut self, data: &[u8], response: &mut Vec<u8>) -> Result<()> {
        let (&share_count, records) = data.split_first().ok_or(Error::IllegalValue)?;

        let mut staged = Zeroizing::new([0u8; MAX_SECRET_SIZE]);
        let written = self
            .combiner
            .combine_shares(share_count, records, staged.as_mut())?;

        if written > 0 {
            response
                .try_reserve(written)
                .map_err(|_| Error::ResourceExhausted)?;
            response.extend_from_slice(&staged[..written]);
            log_info!(self.log, MODULE, "secret recovered ({} bytes)", written);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;
    use sskr_crypto::{CryptoError, HmacSha256};

    struct StepRng;

    impl CryptoRng for StepRng {
        fn fill_bytes(&mut self, dest: &mut [u8]) -> core::result::Result<(), CryptoError> {
            let mut b = 0u8;
            for byte in dest.iter_mut() {
                *byte = b;
                b = b.wrapping_add(17);
            }
            Ok(())
        }
    }

    fn handler() -> Handler<HmacSha256, StepRng> {
        Handler::new(StepRng)
    }

    #[test]
    fn echo_returns_data_unchanged() {
        let mut h = handler();
        let mut response = Vec::new();
        h.process(INS_ECHO, b"\x01\x02\xFF", &mut response).unwrap();
        assert_eq!(response, b"\x01\x02\xFF");
    }

    #[test]
    fn unknown_instruction_rejected() {
        let mut h = handler();
        let mut response = Vec::new();
        let err = h.process(0x42, &[], &mut response).unwrap_err();
        assert_eq!(err, Error::UnsupportedCommand);
        assert_eq!(status_word(&err), 0x6D00);
    }

    #[test]
    fn generate_requires_a_staged_secret() {
        let mut h = handler();
        let mut response = Vec::new();
        let err = h
            .process(INS_GENERATE_SHARES, &[1, 1, 2, 3], &mut response)
            .unwrap_err();
        assert_eq!(err, Error::IllegalUse);
    }

    #[test]
    fn generate_then_combine_through_the_surface() {
        let secret = hex!("7daa851251002874e1a1995f0897e6b1");

        let mut h = handler();
        h.load_secret(&secret).unwrap();

        // gt=2 over (2-of-3, 3-of-5)
        let mut shares = Vec::new();
        h.process(INS_GENERATE_SHARES, &[2, 2, 2, 3, 3, 5], &mut shares)
            .unwrap();
        let record_len = crate::share::METADATA_SIZE + secret.len();
        assert_eq!(shares.len(), 8 * record_len);

        // members 0.0, 0.1, 1.0, 1.2, 1.4
        let pick = [0usize, 1, 3, 5, 7];
        let mut data = alloc::vec![pick.len() as u8];
        for &i in &pick {
            data.extend_from_slice(&shares[i * record_len..(i + 1) * record_len]);
        }

        let mut response = Vec::new();
        h.process(INS_COMBINE_SHARES, &data, &mut response).unwrap();
        assert_eq!(response, secret);
    }

    #[test]
    fn combine_returns_empty_while_short_of_threshold() {
        let secret = hex!("7daa851251002874e1a1995f0897e6b1");

        let mut h = handler();
        h.load_secret(&secret).unwrap();

        let mut shares = Vec::new();
        h.process(INS_GENERATE_SHARES, &[1, 1, 2, 3], &mut shares)
            .unwrap();
        let record_len = crate::share::METADATA_SIZE + secret.len();

        let mut data = alloc::vec![1u8];
        data.extend_from_slice(&shares[..record_len]);

        let mut response = Vec::new();
        h.process(INS_COMBINE_SHARES, &data, &mut response).unwrap();
        assert!(response.is_empty());

        // reset, then deliver two shares at once and recover
        h.process(INS_RESET, &[], &mut response).unwrap();
        let mut data = alloc::vec![2u8];
        data.extend_from_slice(&shares[..2 * record_len]);
        h.process(INS_COMBINE_SHARES, &data, &mut response).unwrap();
        assert_eq!(response, secret);
    }

    #[test]
    fn malformed_policy_rejected_with_status_word() {
        let mut h = handler();
        h.load_secret(&hex!("7daa851251002874e1a1995f0897e6b1"))
            .unwrap();

        let mut response = Vec::new();
        // claims two groups but carries one pair
        let err = h
            .process(INS_GENERATE_SHARES, &[1, 2, 2, 3], &mut response)
            .unwrap_err();
        assert_eq!(err, Error::IllegalValue);
        assert_eq!(status_word(&err), 0x6A80);
    }

    #[test]
    fn dispatch_failures_are_logged() {
        let mut h = handler();
        let mut response = Vec::new();
        let _ = h.process(0x42, &[], &mut response);

        let entry = h.log().iter().last().unwrap();
        assert_eq!(entry.level, sskr_common::log::LogLevel::Error);
        assert!(entry.message.as_str().contains("sw=0x6D00"));
    }

    #[test]
    fn debug_level_records_every_dispatch() {
        let mut h = handler();
        h.log_mut().set_min_level(sskr_common::log::LogLevel::Debug);

        let mut response = Vec::new();
        h.process(INS_ECHO, &[1, 2, 3], &mut response).unwrap();

        let entry = h.log().iter().next().unwrap();
        assert_eq!(entry.message.as_str(), "ins=0x00 lc=3");
    }
}
