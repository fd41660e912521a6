//! Binary Merkle trees over SHA256, addressed by generalized index
//! (root = 1, children of `i` are `2i` and `2i + 1`).

use alloy_primitives::B256;
use sha2::{Digest, Sha256};

use crate::error::UpdateError;

/// Depth of the node at `generalized_index`, i.e. `floor(log2(index))`.
pub fn generalized_index_depth(generalized_index: u64) -> Result<usize, UpdateError> {
    if generalized_index == 0 {
        return Err(UpdateError::InvalidGeneralizedIndex);
    }
    Ok(generalized_index.ilog2() as usize)
}

/// Verify that `leaf` sits at `generalized_index` under `root`.
///
/// `branch` lists sibling hashes from the leaf level upwards and must have
/// exactly one entry per tree level. A branch of the wrong length is an
/// error; a well-formed branch that hashes to a different root is `Ok(false)`.
pub fn verify_merkle_proof(
    root: &B256,
    leaf: &B256,
    generalized_index: u64,
    branch: &[B256],
) -> Result<bool, UpdateError> {
    let depth = generalized_index_depth(generalized_index)?;
    if branch.len() != depth {
        return Err(UpdateError::LengthMismatch {
            generalized_index,
            expected: depth,
            got: branch.len(),
        });
    }

    let mut index = generalized_index;
    let mut node = *leaf;
    for sibling in branch {
        node = if index & 1 == 0 {
            sha256_pair(&node, sibling)
        } else {
            sha256_pair(sibling, &node)
        };
        index >>= 1;
    }

    Ok(node == *root)
}

/// Build a full tree of `depth` levels over `leaves`, zero-padded on the
/// right. The result is indexed by generalized index, so `tree[1]` is the
/// root and leaf `i` lives at `tree[(1 << depth) + i]`. `tree[0]` is unused.
/// Leaves beyond `1 << depth` are ignored.
pub fn merkle_tree(leaves: &[B256], depth: usize) -> Vec<B256> {
    let bottom_length = 1usize << depth;
    let leaf_count = leaves.len().min(bottom_length);

    let mut tree = vec![B256::ZERO; 2 * bottom_length];
    tree[bottom_length..bottom_length + leaf_count].copy_from_slice(&leaves[..leaf_count]);
    for i in (1..bottom_length).rev() {
        tree[i] = sha256_pair(&tree[2 * i], &tree[2 * i + 1]);
    }
    tree
}

/// SSZ merkleization: root of the smallest power-of-two tree holding `chunks`.
pub fn merkleize(chunks: &[B256]) -> B256 {
    match chunks.len() {
        0 => B256::ZERO,
        1 => chunks[0],
        n => {
            let depth = n.next_power_of_two().trailing_zeros() as usize;
            merkle_tree(chunks, depth)[1]
        }
    }
}

/// Sibling hashes for leaf `leaf_index` of a tree built by [`merkle_tree`],
/// ordered leaf level first, ready for [`verify_merkle_proof`].
///
/// Returns `None` if the leaf is outside a `depth`-level tree or `tree` is
/// too short to hold one.
pub fn generate_proof(tree: &[B256], leaf_index: usize, depth: usize) -> Option<Vec<B256>> {
    let bottom_length = 1usize.checked_shl(u32::try_from(depth).ok()?)?;
    if leaf_index >= bottom_length || tree.len() / 2 < bottom_length {
        return None;
    }
    let mut index = bottom_length + leaf_index;
    let mut proof = Vec::with_capacity(depth);
    while index > 1 {
        proof.push(tree[index ^ 1]);
        index >>= 1;
    }
    Some(proof)
}

// --- Helper functions ---

/// SHA256 hash of arbitrary data.
pub(crate) fn sha256_hash(data: &[u8]) -> B256 {
    let mut hasher = Sha256::new();
    hasher.update(data);
    B256::from_slice(&hasher.finalize())
}

/// SHA256 hash of two 32-byte values concatenated.
pub(crate) fn sha256_pair(a: &B256, b: &B256) -> B256 {
    let mut data = [0u8; 64];
    data[..32].copy_from_slice(a.as_slice());
    data[32..].copy_from_slice(b.as_slice());
    sha256_hash(&data)
}
