//! # Lumen Sync
//!
//! Verification engine for Ethereum beacon-chain sync committee updates.
//!
//! This crate contains **no networking code** and **no persistence**. It takes
//! light client update records that have already been fetched and parsed,
//! assembles adjacent records into one canonical [`SyncCommitteeUpdate`], and
//! decides whether that update can be trusted.
//!
//! ## Trust Model
//!
//! - **Committee continuity** (`consensus::assembler`): the committee trusted
//!   to sign period `n` is exactly the `next_sync_committee` promised by the
//!   update for period `n - 1`.
//!
//! - **State inclusion** (`consensus::merkle`): the finalized header and the
//!   next sync committee are proven against the attested header's state root
//!   at fork-specific generalized indices.
//!
//! - **Signature** (`consensus::signature`): the participating members of the
//!   current committee produced a BLS aggregate signature over the attested
//!   header, bound to the fork's sync committee domain.
//!
//! A well-formed update that fails any of these checks is reported as a
//! [`Verdict::Invalid`], never as an error. Errors are reserved for input that
//! cannot be decoded or that names an unknown fork.
//!
//! ## Usage
//!
//! ```ignore
//! use lumen_sync::{combine, verify_update, ChainSpec};
//!
//! let update = combine(&previous, &current)?;
//! let verdict = verify_update(ChainSpec::mainnet(), &update)?;
//! assert!(verdict.is_valid());
//! ```

pub mod config;
pub mod consensus;
pub mod error;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types for convenience
pub use config::{ChainSpec, ChainSpecConfig};
pub use consensus::{
    assembler::{assemble_chain, combine, decode_light_client_header},
    domain::{compute_domain, resolve, ForkLayout, TreeLocation},
    merkle::{generate_proof, merkle_tree, merkleize, verify_merkle_proof},
    signature::{
        fast_aggregate_verify, select_signers, signing_root, verify_sync_aggregate,
        SignatureRejection,
    },
    tree_hash::HashTreeRoot,
    verifier::{verify, verify_bootstrap, verify_chain, verify_update, Rejection, Verdict},
};
pub use error::UpdateError;
pub use types::{beacon::*, fork::ForkTag, wire::*};
