use alloy_primitives::B256;
use blst::min_pk::{PublicKey, Signature};
use blst::BLST_ERROR;

use crate::consensus::tree_hash::{signing_data_root, HashTreeRoot};
use crate::types::beacon::*;

/// Domain separation tag for Ethereum BLS signatures (proof-of-possession scheme).
pub const BLS_DST: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// Why an aggregate signature was not accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureRejection {
    /// No committee member is marked as participating.
    NoParticipants,
    /// A participant key or the signature is not a valid point in its group.
    MalformedPoint,
    /// The signature does not verify under the participants' aggregate key.
    AggregateMismatch,
}

/// Public keys of the members whose participation bit is set, in committee order.
pub fn select_signers<'a>(
    committee: &'a SyncCommittee,
    bits: &SyncCommitteeBits,
) -> Vec<&'a BlsPublicKey> {
    bits.iter_ones()
        .filter_map(|index| committee.pubkeys.get(index))
        .collect()
}

/// Compute the signing root for a beacon block header.
/// This is what the sync committee actually signs: not the header directly,
/// but `hash_tree_root(header)` wrapped in a signing domain.
pub fn signing_root(header: &BeaconBlockHeader, domain: &Domain) -> B256 {
    signing_data_root(&header.hash_tree_root(), domain)
}

/// Check `signature` over `message` against the aggregate of `pubkeys`.
///
/// An empty key set is rejected before reaching the pairing check.
pub fn check_aggregate_signature(
    pubkeys: &[&BlsPublicKey],
    signature: &BlsSignature,
    message: &B256,
) -> Result<(), SignatureRejection> {
    if pubkeys.is_empty() {
        return Err(SignatureRejection::NoParticipants);
    }

    let sig = Signature::sig_validate(&signature.0, true)
        .map_err(|_| SignatureRejection::MalformedPoint)?;

    let pks: Vec<PublicKey> = pubkeys
        .iter()
        .map(|pk| PublicKey::key_validate(&pk.0))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| SignatureRejection::MalformedPoint)?;
    let pk_refs: Vec<&PublicKey> = pks.iter().collect();

    // Keys and signature were group-checked during validation above
    match sig.fast_aggregate_verify(false, message.as_slice(), BLS_DST, &pk_refs) {
        BLST_ERROR::BLST_SUCCESS => Ok(()),
        _ => Err(SignatureRejection::AggregateMismatch),
    }
}

pub fn fast_aggregate_verify(
    pubkeys: &[&BlsPublicKey],
    signature: &BlsSignature,
    message: &B256,
) -> bool {
    check_aggregate_signature(pubkeys, signature, message).is_ok()
}

/// Verify that the participating members of `committee` signed `header`
/// under `domain`.
pub fn verify_sync_aggregate(
    committee: &SyncCommittee,
    aggregate: &SyncAggregate,
    header: &BeaconBlockHeader,
    domain: &Domain,
) -> Result<(), SignatureRejection> {
    let signers = select_signers(committee, &aggregate.sync_committee_bits);
    let root = signing_root(header, domain);
    check_aggregate_signature(&signers, &aggregate.sync_committee_signature, &root)
}
