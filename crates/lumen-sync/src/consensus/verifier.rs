use std::fmt;

use alloy_primitives::B256;
use tracing::{debug, warn};

use crate::config::{ChainSpec, MAINNET_FORK_VERSIONS};
use crate::consensus::assembler::combine;
use crate::consensus::domain::resolve;
use crate::consensus::merkle::verify_merkle_proof;
use crate::consensus::signature::{verify_sync_aggregate, SignatureRejection};
use crate::consensus::tree_hash::HashTreeRoot;
use crate::error::UpdateError;
use crate::types::beacon::*;
use crate::types::wire::LightClientUpdateResponse;

/// Which check a well-formed update failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// The finality branch does not prove `finalized_header` in the attested state.
    FinalityProof,
    /// The committee branch does not prove `next_sync_committee` in the attested state.
    NextSyncCommitteeProof,
    Signature(SignatureRejection),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::FinalityProof => f.write_str("invalid finality branch"),
            Rejection::NextSyncCommitteeProof => f.write_str("invalid next sync committee branch"),
            Rejection::Signature(SignatureRejection::NoParticipants) => {
                f.write_str("no sync committee participants")
            }
            Rejection::Signature(SignatureRejection::MalformedPoint) => {
                f.write_str("malformed BLS public key or signature")
            }
            Rejection::Signature(SignatureRejection::AggregateMismatch) => {
                f.write_str("aggregate signature does not verify")
            }
        }
    }
}

/// Outcome of verifying a well-formed update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid(Rejection),
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Verdict::Valid => None,
            Verdict::Invalid(rejection) => Some(*rejection),
        }
    }
}

/// Verify a sync committee update against `spec`.
///
/// Checks, in order: the finality branch, the next sync committee branch, and
/// the aggregate signature over the attested header. The first failing check
/// is reported in the verdict. Missing fields and malformed branches are
/// errors rather than verdicts.
pub fn verify_update(
    spec: &ChainSpec,
    update: &SyncCommitteeUpdate,
) -> Result<Verdict, UpdateError> {
    let layout = resolve(update.version);
    let domain = spec.domain(update.version);
    let state_root = &update.attested_header.state_root;

    let finalized_header = update
        .finalized_header
        .as_ref()
        .ok_or(UpdateError::MissingField("finalized_header"))?;
    if !verify_merkle_proof(
        state_root,
        &finalized_header.hash_tree_root(),
        layout.finalized_header.generalized_index(),
        &update.finality_branch,
    )? {
        return Ok(reject(update, Rejection::FinalityProof));
    }

    let next_sync_committee = update
        .next_sync_committee
        .as_ref()
        .ok_or(UpdateError::MissingField("next_sync_committee"))?;
    next_sync_committee.validate()?;
    if !verify_merkle_proof(
        state_root,
        &next_sync_committee.hash_tree_root(),
        layout.next_sync_committee.generalized_index(),
        &update.next_sync_committee_branch,
    )? {
        return Ok(reject(update, Rejection::NextSyncCommitteeProof));
    }

    let current_sync_committee = update
        .current_sync_committee
        .as_ref()
        .ok_or(UpdateError::MissingField("current_sync_committee"))?;
    current_sync_committee.validate()?;
    if let Err(reason) = verify_sync_aggregate(
        current_sync_committee,
        &update.sync_aggregate,
        &update.attested_header,
        &domain,
    ) {
        return Ok(reject(update, Rejection::Signature(reason)));
    }

    debug!(
        network = spec.name(),
        fork = %update.version,
        period = update.attested_period(),
        participants = update.sync_aggregate.num_participants(),
        "verified sync committee update"
    );
    Ok(Verdict::Valid)
}

fn reject(update: &SyncCommitteeUpdate, rejection: Rejection) -> Verdict {
    warn!(
        fork = %update.version,
        period = update.attested_period(),
        %rejection,
        "rejected sync committee update"
    );
    Verdict::Invalid(rejection)
}

/// Verify `update` for the network identified by `genesis_validators_root`.
///
/// Mainnet and Sepolia use their own fork schedules. Any other root is
/// paired with the mainnet fork versions.
pub fn verify(
    update: &SyncCommitteeUpdate,
    genesis_validators_root: &B256,
) -> Result<bool, UpdateError> {
    let verdict = match ChainSpec::from_genesis_validators_root(genesis_validators_root) {
        Some(spec) => verify_update(spec, update)?,
        None => {
            let spec =
                ChainSpec::new("custom", *genesis_validators_root, MAINNET_FORK_VERSIONS);
            verify_update(&spec, update)?
        }
    };
    Ok(verdict.is_valid())
}

/// Check that the bootstrap header's state commits to its current committee.
pub fn verify_bootstrap(bootstrap: &LightClientBootstrap) -> Result<bool, UpdateError> {
    bootstrap.current_sync_committee.validate()?;
    verify_merkle_proof(
        &bootstrap.header.state_root,
        &bootstrap.current_sync_committee.hash_tree_root(),
        resolve(bootstrap.version)
            .current_sync_committee
            .generalized_index(),
        &bootstrap.current_sync_committee_branch,
    )
}

/// Assemble and verify every adjacent pair of `records`, oldest first.
pub fn verify_chain(
    spec: &ChainSpec,
    records: &[LightClientUpdateResponse],
) -> Result<Vec<(SyncCommitteeUpdate, Verdict)>, UpdateError> {
    records
        .windows(2)
        .map(|pair| {
            let update = combine(&pair[0], &pair[1])?;
            let verdict = verify_update(spec, &update)?;
            Ok((update, verdict))
        })
        .collect()
}
