use alloy_primitives::B256;
use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::UpdateError;
use crate::types::fork::ForkTag;
use crate::types::wire::SyncCommitteeUpdateJson;

/// Number of validators in the Ethereum beacon chain sync committee.
pub const SYNC_COMMITTEE_SIZE: usize = 512;

/// Number of bytes in a BLS12-381 public key (compressed).
pub const BLS_PUBKEY_LEN: usize = 48;

/// Number of bytes in a BLS12-381 signature (compressed).
pub const BLS_SIGNATURE_LEN: usize = 96;

/// Slots per sync committee period (256 epochs * 32 slots/epoch = 8192).
pub const SLOTS_PER_SYNC_COMMITTEE_PERIOD: u64 = 8192;

/// Domain type for sync committee signatures.
pub const DOMAIN_SYNC_COMMITTEE: [u8; 4] = [0x07, 0x00, 0x00, 0x00];

/// 32-byte signature domain: domain type followed by 28 bytes of fork data root.
pub type Domain = B256;

/// Participation bits, one per committee member, in SSZ bit order.
pub type SyncCommitteeBits = BitArray<[u8; SYNC_COMMITTEE_SIZE / 8], Lsb0>;

/// Sync committee period containing `slot`.
pub fn sync_committee_period(slot: u64) -> u64 {
    slot / SLOTS_PER_SYNC_COMMITTEE_PERIOD
}

/// A BLS12-381 public key (48 bytes, compressed G1 point).
///
/// The bytes are not checked to be a valid curve point until signature
/// verification.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlsPublicKey(pub [u8; BLS_PUBKEY_LEN]);

impl BlsPublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, &'static str> {
        if bytes.len() != BLS_PUBKEY_LEN {
            return Err("Invalid BLS public key length");
        }
        let mut arr = [0u8; BLS_PUBKEY_LEN];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }
}

/// A BLS12-381 signature (96 bytes, compressed G2 point).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlsSignature(pub [u8; BLS_SIGNATURE_LEN]);

impl BlsSignature {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, &'static str> {
        if bytes.len() != BLS_SIGNATURE_LEN {
            return Err("Invalid BLS signature length");
        }
        let mut arr = [0u8; BLS_SIGNATURE_LEN];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }
}

/// A beacon chain block header.
///
/// Every fork's light client header reduces to this shape; the extra
/// execution fields carried on the wire are dropped during decoding.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BeaconBlockHeader {
    /// Slot number of this block.
    pub slot: u64,
    /// Index of the validator who proposed this block.
    pub proposer_index: u64,
    /// Root hash of the parent beacon block.
    pub parent_root: B256,
    /// Root hash of the beacon state after processing this block.
    pub state_root: B256,
    /// Root hash of the block body.
    pub body_root: B256,
}

/// The sync committee: 512 validators that sign off on the chain head.
/// Key order matches bit order in [`SyncAggregate::sync_committee_bits`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncCommittee {
    pub pubkeys: Vec<BlsPublicKey>,
    pub aggregate_pubkey: BlsPublicKey,
}

impl SyncCommittee {
    pub fn new(
        pubkeys: Vec<BlsPublicKey>,
        aggregate_pubkey: BlsPublicKey,
    ) -> Result<Self, UpdateError> {
        let committee = Self {
            pubkeys,
            aggregate_pubkey,
        };
        committee.validate()?;
        Ok(committee)
    }

    /// Validate the sync committee has the correct number of members.
    pub fn validate(&self) -> Result<(), UpdateError> {
        if self.pubkeys.len() != SYNC_COMMITTEE_SIZE {
            return Err(UpdateError::InvalidCommitteeSize {
                got: self.pubkeys.len(),
            });
        }
        Ok(())
    }
}

/// The aggregate BLS signature from the sync committee.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncAggregate {
    /// Which of the 512 committee members signed.
    pub sync_committee_bits: SyncCommitteeBits,
    /// The aggregated BLS signature from all participating members.
    pub sync_committee_signature: BlsSignature,
}

impl SyncAggregate {
    /// Count how many sync committee members participated (set bits).
    pub fn num_participants(&self) -> usize {
        self.sync_committee_bits.count_ones()
    }

    /// Check if a specific committee member (by index) participated.
    pub fn has_participant(&self, index: usize) -> bool {
        self.sync_committee_bits
            .get(index)
            .map(|bit| *bit)
            .unwrap_or(false)
    }

    /// Indices of all participating committee members, ascending.
    pub fn participant_indices(&self) -> Vec<usize> {
        self.sync_committee_bits.iter_ones().collect()
    }
}

/// One verifiable step of the sync committee chain.
///
/// Built by [`crate::combine`] from two adjacent update records: the
/// `current_sync_committee` comes from the earlier record's
/// `next_sync_committee`, everything else from the later record.
/// Verification only reads it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SyncCommitteeUpdateJson", into = "SyncCommitteeUpdateJson")]
pub struct SyncCommitteeUpdate {
    pub version: ForkTag,
    /// The header that the sync committee is attesting to.
    pub attested_header: BeaconBlockHeader,
    /// The committee expected to have signed `attested_header`.
    pub current_sync_committee: Option<SyncCommittee>,
    /// Aggregate signature over `attested_header`, by `current_sync_committee`.
    pub sync_aggregate: SyncAggregate,
    /// Finalized header committed to in `attested_header.state_root`.
    pub finalized_header: Option<BeaconBlockHeader>,
    /// Merkle branch proving `finalized_header` against the attested state.
    pub finality_branch: Vec<B256>,
    /// Committee for the following period, committed to in the attested state.
    pub next_sync_committee: Option<SyncCommittee>,
    /// Merkle branch proving `next_sync_committee` against the attested state.
    pub next_sync_committee_branch: Vec<B256>,
    /// The slot at which the signature was produced.
    pub signature_slot: u64,
}

impl SyncCommitteeUpdate {
    pub fn attested_period(&self) -> u64 {
        sync_committee_period(self.attested_header.slot)
    }

    pub fn signature_period(&self) -> u64 {
        sync_committee_period(self.signature_slot)
    }
}

/// A light client bootstrap: a trusted header and the committee active in
/// its period.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LightClientBootstrap {
    pub version: ForkTag,
    pub header: BeaconBlockHeader,
    pub current_sync_committee: SyncCommittee,
    /// Merkle branch proving `current_sync_committee` against the header's state.
    pub current_sync_committee_branch: Vec<B256>,
}
