use alloy_primitives::B256;

use crate::consensus::tree_hash::fork_data_root;
use crate::types::beacon::{Domain, DOMAIN_SYNC_COMMITTEE};
use crate::types::fork::ForkTag;

/// Position of a leaf in the beacon state tree: `index` within the layer at
/// `depth`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeLocation {
    pub depth: usize,
    pub index: u64,
}

impl TreeLocation {
    pub const fn generalized_index(&self) -> u64 {
        self.index + (1 << self.depth)
    }
}

/// Per-fork signing and state-layout parameters for sync committee updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForkLayout {
    pub domain_type: [u8; 4],
    /// `finalized_checkpoint.root` in the beacon state.
    pub finalized_header: TreeLocation,
    pub current_sync_committee: TreeLocation,
    pub next_sync_committee: TreeLocation,
}

const PRE_ELECTRA_LAYOUT: ForkLayout = ForkLayout {
    domain_type: DOMAIN_SYNC_COMMITTEE,
    finalized_header: TreeLocation { depth: 6, index: 41 },
    current_sync_committee: TreeLocation { depth: 5, index: 22 },
    next_sync_committee: TreeLocation { depth: 5, index: 23 },
};

// Electra grew the state past 32 fields, so the state tree gained a level.
const ELECTRA_LAYOUT: ForkLayout = ForkLayout {
    domain_type: DOMAIN_SYNC_COMMITTEE,
    finalized_header: TreeLocation { depth: 7, index: 41 },
    current_sync_committee: TreeLocation { depth: 6, index: 22 },
    next_sync_committee: TreeLocation { depth: 6, index: 23 },
};

/// Indexed by [`ForkTag::index`].
static FORK_LAYOUTS: [ForkLayout; 5] = [
    PRE_ELECTRA_LAYOUT, // Altair
    PRE_ELECTRA_LAYOUT, // Bellatrix
    PRE_ELECTRA_LAYOUT, // Capella
    PRE_ELECTRA_LAYOUT, // Deneb
    ELECTRA_LAYOUT,
];

/// Signing and state-layout parameters for `fork`.
///
/// The indices assume the mainnet beacon state schema, which every public
/// network shares.
pub fn resolve(fork: ForkTag) -> &'static ForkLayout {
    &FORK_LAYOUTS[fork.index()]
}

/// Compute the domain for a signature.
/// domain = domain_type + fork_data_root[:28]
pub fn compute_domain(
    domain_type: &[u8; 4],
    fork_version: &[u8; 4],
    genesis_validators_root: &B256,
) -> Domain {
    let fork_data_root = fork_data_root(fork_version, genesis_validators_root);
    let mut domain = Domain::ZERO;
    domain.0[..4].copy_from_slice(domain_type);
    domain.0[4..].copy_from_slice(&fork_data_root[..28]);
    domain
}
