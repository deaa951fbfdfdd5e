// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 Qbitel Inc.

//! Two-level share generation and the stateful recovery accumulator.
//!
//! Generation is stateless: the secret is Shamir-split into group shares,
//! each group share into member shares, and every member share is emitted
//! as a serialized record.
//!
//! Recovery is stateful because a host may deliver shares over multiple
//! write transactions with power removed in between. [`Sskr`] accumulates
//! shares until the thresholds are met: the first accepted share pins the
//! share-set identity and group policy, member shares collect into
//! per-group buckets, each completed group recovers into the top-level
//! bucket, and filling the top-level bucket recovers the master secret.
//! Accumulated state can be [`reset`](Sskr::reset) to start over; this must
//! be done after a successful recovery, and after any error raised once a
//! subset of shares has been absorbed.

use alloc::vec::Vec;
use core::marker::PhantomData;

use zeroize::{Zeroize, ZeroizeOnDrop};

use sskr_common::{Error, Result};
use sskr_crypto::{CryptoRng, KeyedMac};

use crate::shamir::{self, check_secret_len, try_vec, MAX_SHARE_COUNT};
use crate::share::{ShareHeader, METADATA_SIZE};

/// Sentinel marking an empty slot in an x-coordinate vector; never a valid
/// share x-coordinate
const UNUSED: u8 = 0xFF;

/// Member policy for one group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSpec {
    /// Number of member shares required to recover the group share, 1..=16
    pub member_threshold: u8,
    /// Total member shares to generate for this group, 1..=16
    pub member_count: u8,
}

/// Generate a serialized share set for `secret` under the given group
/// policy
///
/// The secret is split into `groups.len()` group shares with threshold
/// `group_threshold`; group `i`'s share is split into
/// `groups[i].member_count` member shares with threshold
/// `groups[i].member_threshold`. Every member share is emitted as a
/// [`ShareHeader`]-prefixed record, groups in input order, members in index
/// order, all sharing a freshly drawn 16-bit set identifier.
///
/// Stateless: an in-progress [`Sskr`] recovery session is not disturbed,
/// and failures here leave no residue.
///
/// # Errors
///
/// `IllegalValue` unless `1 ≤ group_threshold ≤ groups.len() ≤ 16`, every
/// group satisfies `1 ≤ member_threshold ≤ member_count ≤ 16`, and the
/// secret length is 16..=32 and even. `RngFailure` and
/// `ResourceExhausted` propagate from the collaborators.
pub fn generate_shares<M: KeyedMac, R: CryptoRng>(
    group_threshold: u8,
    groups: &[GroupSpec],
    secret: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>> {
    let group_count = groups.len();
    if group_count == 0
        || group_count > MAX_SHARE_COUNT
        || group_threshold == 0
        || group_threshold as usize > group_count
    {
        return Err(Error::IllegalValue);
    }
    for spec in groups {
        if spec.member_threshold == 0
            || spec.member_threshold > spec.member_count
            || spec.member_count as usize > MAX_SHARE_COUNT
        {
            return Err(Error::IllegalValue);
        }
    }

    let mut id_bytes = [0u8; 2];
    rng.fill_bytes(&mut id_bytes).map_err(Error::from)?;
    let id = u16::from_be_bytes(id_bytes);

    let len = secret.len();
    let record_len = METADATA_SIZE + len;
    let group_shares = shamir::split::<M, R>(group_threshold, group_count as u8, secret, rng)?;

    let total_members: usize = groups.iter().map(|s| s.member_count as usize).sum();
    let mut out = try_vec(total_members * record_len, 0)?;

    let mut off = 0;
    for (gi, spec) in groups.iter().enumerate() {
        let group_share = &group_shares[gi * len..(gi + 1) * len];
        let members =
            shamir::split::<M, R>(spec.member_threshold, spec.member_count, group_share, rng)?;

        for mi in 0..spec.member_count as usize {
            let record = &mut out[off..off + record_len];
            ShareHeader {
                id,
                group_count: group_count as u8,
                group_threshold,
                group_index: gi as u8,
                member_threshold: spec.member_threshold,
                member_index: mi as u8,
            }
            .write(record)?;
            record[METADATA_SIZE..].copy_from_slice(&members[mi * len..(mi + 1) * len]);
            off += record_len;
        }
    }
    Ok(out)
}

/// Collected member shares for one group
#[derive(Zeroize, ZeroizeOnDrop)]
struct GroupBucket {
    /// Member x-coordinates, [`UNUSED`]-filled; length pins the group's
    /// member threshold
    x: Vec<u8>,
    /// Member y-rows, `member_threshold × secret_len`
    y: Vec<u8>,
}

impl GroupBucket {
    fn new(member_threshold: usize, secret_len: usize) -> Result<Self> {
        Ok(Self {
            x: try_vec(member_threshold, UNUSED)?,
            y: try_vec(member_threshold * secret_len, 0)?,
        })
    }
}

/// Accumulator state for one recovery session
#[derive(Zeroize, ZeroizeOnDrop)]
struct Session {
    id: u16,
    group_count: u8,
    group_threshold: u8,
    secret_len: usize,
    /// One slot per group index; buckets allocate on first contact
    groups: Vec<Option<GroupBucket>>,
    /// Recovered-group x-coordinates (group indices), [`UNUSED`]-filled
    top_x: Vec<u8>,
    /// Recovered-group y-rows, `group_threshold × secret_len`
    top_y: Vec<u8>,
}

impl Session {
    fn new(header: &ShareHeader, secret_len: usize) -> Result<Self> {
        let group_count = header.group_count as usize;
        let group_threshold = header.group_threshold as usize;

        let mut groups = Vec::new();
        groups
            .try_reserve_exact(group_count)
            .map_err(|_| Error::ResourceExhausted)?;
        groups.resize_with(group_count, || None);

        Ok(Self {
            id: header.id,
            group_count: header.group_count,
            group_threshold: header.group_threshold,
            secret_len,
            groups,
            top_x: try_vec(group_threshold, UNUSED)?,
            top_y: try_vec(group_threshold * secret_len, 0)?,
        })
    }

    /// Route one share payload into its group bucket, recovering the group
    /// share if this write met the member threshold
    ///
    /// Returns `true` when the recovered group share filled the top-level
    /// bucket's final slot, i.e. the master secret is ready.
    fn absorb<M: KeyedMac>(&mut self, header: &ShareHeader, payload: &[u8]) -> Result<bool> {
        let gi = header.group_index as usize;
        let mt = header.member_threshold as usize;
        let len = self.secret_len;

        if self.groups[gi].is_none() {
            self.groups[gi] = Some(GroupBucket::new(mt, len)?);
        }
        let bucket = self.groups[gi].as_mut().ok_or(Error::IllegalValue)?;
        if bucket.x.len() != mt {
            // a differing member threshold for a group seen before
            return Err(Error::IllegalValue);
        }

        let mut group_ready = false;
        for j in 0..mt {
            if bucket.x[j] == header.member_index {
                // a share matching (id, gi, mi) was already recorded
                break;
            }
            if bucket.x[j] == UNUSED {
                bucket.x[j] = header.member_index;
                bucket.y[j * len..(j + 1) * len].copy_from_slice(payload);
                group_ready = j == mt - 1;
                break;
            }
        }
        // a scan that finds neither a duplicate nor a free slot means the
        // group is sealed; the extraneous share is dropped

        if !group_ready {
            return Ok(false);
        }

        let group_threshold = self.top_x.len();
        for k in 0..group_threshold {
            if self.top_x[k] == header.group_index {
                // this group's share was already recovered
                break;
            }
            if self.top_x[k] == UNUSED {
                let row = &mut self.top_y[k * len..(k + 1) * len];
                let written = shamir::combine::<M>(&bucket.x, &bucket.y, row)?;
                if written != len {
                    return Err(Error::IllegalValue);
                }
                self.top_x[k] = header.group_index;
                return Ok(k == group_threshold - 1);
            }
        }
        Ok(false)
    }
}

/// Stateful share accumulator for master-secret recovery
///
/// `M` is the keyed-MAC collaborator used for share digest verification.
pub struct Sskr<M: KeyedMac> {
    session: Option<Session>,
    _mac: PhantomData<M>,
}

impl<M: KeyedMac> Sskr<M> {
    /// Create an accumulator with no session
    #[must_use]
    pub fn new() -> Self {
        Self {
            session: None,
            _mac: PhantomData,
        }
    }

    /// Absorb `share_count` serialized shares, recovering the master secret
    /// once both threshold levels are met
    ///
    /// Resumable: call any number of times with any slicing of the share
    /// set. The outcome depends only on the set of distinct
    /// `(group, member)` pairs ever delivered — order, grouping across
    /// calls, and duplicates do not matter. Shares arriving for a group
    /// that already met its threshold are ignored.
    ///
    /// Returns the secret length with the secret written to the front of
    /// `secret` when recovery completed during this call, or `0` when more
    /// shares are required.
    ///
    /// After a successful recovery or any error, the session is spent and
    /// [`reset`](Sskr::reset) is required before combining a new set.
    ///
    /// # Errors
    ///
    /// - `IllegalValue`: `shares.len()` not a non-zero multiple of
    ///   `share_count`, payload length outside 16..=32 or odd or differing
    ///   from the session's, reserved member-index bits set, group index
    ///   outside the set's group count, member-threshold conflict for a
    ///   group seen before, or digest verification failure at either level.
    /// - `IllegalUse`: a share's identifier or group policy disagrees with
    ///   the pinned session.
    /// - `BufferTooSmall`: `secret` cannot hold the recovered secret.
    /// - `ResourceExhausted`: bucket allocation failed.
    pub fn combine_shares(
        &mut self,
        share_count: u8,
        shares: &[u8],
        secret: &mut [u8],
    ) -> Result<usize> {
        let t = share_count as usize;
        if t == 0 || shares.is_empty() || shares.len() % t != 0 {
            return Err(Error::IllegalValue);
        }
        let record_len = shares.len() / t;
        if record_len <= METADATA_SIZE {
            return Err(Error::IllegalValue);
        }
        let len = record_len - METADATA_SIZE;
        check_secret_len(len)?;
        if secret.len() < len {
            return Err(Error::BufferTooSmall);
        }

        if self.session.is_none() {
            let first = ShareHeader::parse(shares)?;
            if first.group_threshold > first.group_count {
                return Err(Error::IllegalValue);
            }
            self.session = Some(Session::new(&first, len)?);
        }
        let session = self.session.as_mut().ok_or(Error::IllegalValue)?;
        if session.secret_len != len {
            return Err(Error::IllegalValue);
        }

        let mut recovered = 0;
        for record in shares.chunks_exact(record_len) {
            let header = ShareHeader::parse(record)?;

            if header.id != session.id
                || header.group_count != session.group_count
                || header.group_threshold != session.group_threshold
            {
                return Err(Error::IllegalUse);
            }
            if header.member_index as usize >= MAX_SHARE_COUNT
                || header.group_index >= session.group_count
            {
                return Err(Error::IllegalValue);
            }

            if session.absorb::<M>(&header, &record[METADATA_SIZE..])? {
                let written = shamir::combine::<M>(&session.top_x, &session.top_y, secret)?;
                if written != len {
                    return Err(Error::IllegalValue);
                }
                recovered = written;
                break;
            }
        }

        if recovered > 0 {
            // buckets are released on successful reconstruction; the reset
            // contract still applies before a new session
            self.session = None;
        }
        Ok(recovered)
    }

    /// Drop all accumulated state, wiping it
    ///
    /// The next share accepted by
    /// [`combine_shares`](Sskr::combine_shares) pins a new session.
    pub fn reset(&mut self) {
        self.session = None;
    }
}

impl<M: KeyedMac> Default for Sskr<M> {
    fn default() -> Self {
        Self::new()
    }
}
