//! SSZ `hash_tree_root` for the fixed-size containers a sync committee
//! update commits to.

use alloy_primitives::B256;

use crate::consensus::merkle::{merkleize, sha256_pair};
use crate::types::beacon::*;

pub trait HashTreeRoot {
    fn hash_tree_root(&self) -> B256;
}

impl HashTreeRoot for BeaconBlockHeader {
    /// Container of five 32-byte leaves, padded to eight:
    /// slot, proposer_index, parent_root, state_root, body_root.
    fn hash_tree_root(&self) -> B256 {
        merkleize(&[
            uint64_to_leaf(self.slot),
            uint64_to_leaf(self.proposer_index),
            self.parent_root,
            self.state_root,
            self.body_root,
        ])
    }
}

impl HashTreeRoot for BlsPublicKey {
    /// `Bytes48` packs into two chunks, the second zero-padded.
    fn hash_tree_root(&self) -> B256 {
        let mut chunks = [B256::ZERO; 2];
        chunks[0].0.copy_from_slice(&self.0[..32]);
        chunks[1].0[..16].copy_from_slice(&self.0[32..]);
        sha256_pair(&chunks[0], &chunks[1])
    }
}

impl HashTreeRoot for SyncCommittee {
    /// Container of `Vector[BLSPubkey, 512]` and the aggregate key.
    fn hash_tree_root(&self) -> B256 {
        let leaves: Vec<B256> = self.pubkeys.iter().map(HashTreeRoot::hash_tree_root).collect();
        let pubkeys_root = merkleize(&leaves);
        sha256_pair(&pubkeys_root, &self.aggregate_pubkey.hash_tree_root())
    }
}

/// `hash_tree_root(ForkData(current_version, genesis_validators_root))`.
pub fn fork_data_root(fork_version: &[u8; 4], genesis_validators_root: &B256) -> B256 {
    let mut version_leaf = B256::ZERO;
    version_leaf.0[..4].copy_from_slice(fork_version);
    sha256_pair(&version_leaf, genesis_validators_root)
}

/// `hash_tree_root(SigningData(object_root, domain))`.
pub fn signing_data_root(object_root: &B256, domain: &Domain) -> B256 {
    sha256_pair(object_root, domain)
}

/// Encode a u64 as a 32-byte SSZ leaf (little-endian, zero-padded).
fn uint64_to_leaf(value: u64) -> B256 {
    let mut leaf = B256::ZERO;
    leaf.0[..8].copy_from_slice(&value.to_le_bytes());
    leaf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consensus::merkle::sha256_hash;
    use hex_literal::hex;

    #[test]
    fn test_uint64_to_leaf() {
        let leaf = uint64_to_leaf(42);
        assert_eq!(leaf[0], 42);
        assert_eq!(leaf[1..8], [0; 7]);
        assert_eq!(leaf[8..32], [0; 24]);
    }

    #[test]
    fn test_header_root_layout() {
        let header = BeaconBlockHeader {
            slot: 100,
            proposer_index: 7,
            parent_root: B256::repeat_byte(0x11),
            state_root: B256::repeat_byte(0x22),
            body_root: B256::repeat_byte(0x33),
        };
        let zero = B256::ZERO;

        // Layer 0 (leaves): [slot, proposer, parent, state, body, 0, 0, 0]
        let h01 = sha256_pair(&uint64_to_leaf(100), &uint64_to_leaf(7));
        let h23 = sha256_pair(&header.parent_root, &header.state_root);
        let h45 = sha256_pair(&header.body_root, &zero);
        let h67 = sha256_pair(&zero, &zero);
        let expected = sha256_pair(&sha256_pair(&h01, &h23), &sha256_pair(&h45, &h67));

        assert_eq!(header.hash_tree_root(), expected);
    }

    #[test]
    fn test_empty_header_root() {
        // All-zero header merkleizes to the depth-3 zero hash
        assert_eq!(
            BeaconBlockHeader::default().hash_tree_root(),
            B256::from(hex!(
                "c78009fdf07fc56a11f122370658a353aaa542ed63e44c4bc15ff4cd105ab33c"
            ))
        );
    }

    #[test]
    fn test_pubkey_root_packs_two_chunks() {
        let key = BlsPublicKey([0xab; 48]);
        let mut data = [0u8; 64];
        data[..48].copy_from_slice(&key.0);
        assert_eq!(key.hash_tree_root(), sha256_hash(&data));
    }

    #[test]
    fn test_committee_root_depends_on_key_order() {
        let mut pubkeys: Vec<BlsPublicKey> =
            (0..SYNC_COMMITTEE_SIZE).map(|i| BlsPublicKey([i as u8; 48])).collect();
        let committee = SyncCommittee {
            pubkeys: pubkeys.clone(),
            aggregate_pubkey: BlsPublicKey([0xff; 48]),
        };
        pubkeys.swap(0, 1);
        let swapped = SyncCommittee {
            pubkeys,
            aggregate_pubkey: BlsPublicKey([0xff; 48]),
        };
        assert_ne!(committee.hash_tree_root(), swapped.hash_tree_root());
    }
}
