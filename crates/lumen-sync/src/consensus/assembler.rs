use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::UpdateError;
use crate::types::beacon::*;
use crate::types::fork::ForkTag;
use crate::types::wire::*;

/// Reduce a light client header to its beacon block header.
///
/// Pre-Electra headers are read as `{ beacon }` and anything else is ignored.
/// Electra headers must also carry `execution` and `execution_branch`.
pub fn decode_light_client_header(
    fork: ForkTag,
    header: &Value,
) -> Result<BeaconBlockHeader, UpdateError> {
    let beacon = if fork.is_electra_or_later() {
        LightClientHeaderElectraJson::deserialize(header)
            .map_err(|e| UpdateError::decode("light_client_header", e))?
            .beacon
    } else {
        LightClientHeaderJson::deserialize(header)
            .map_err(|e| UpdateError::decode("light_client_header", e))?
            .beacon
    };
    beacon.decode()
}

/// Merge two chronologically adjacent update records into one update.
///
/// The committee trusted to sign `curr`'s attested header is the committee
/// `prev` promised as its next one; everything else comes from `curr`.
pub fn combine(
    prev: &LightClientUpdateResponse,
    curr: &LightClientUpdateResponse,
) -> Result<SyncCommitteeUpdate, UpdateError> {
    let version = curr
        .version
        .parse::<ForkTag>()
        .map_err(|_| UpdateError::UnsupportedVersion(curr.version.clone()))?;
    let data = &curr.data;

    let current_sync_committee = prev
        .data
        .next_sync_committee
        .as_ref()
        .ok_or(UpdateError::MissingField("next_sync_committee"))?
        .decode()?;
    if let Some(claimed) = &data.current_sync_committee {
        if claimed.decode()? != current_sync_committee {
            return Err(UpdateError::CommitteeDiscontinuity);
        }
    }

    let attested_header = data
        .attested_header
        .as_ref()
        .ok_or(UpdateError::MissingField("attested_header"))?;
    let attested_header = decode_light_client_header(version, attested_header)?;
    let finalized_header = data
        .finalized_header
        .as_ref()
        .map(|header| decode_light_client_header(version, header))
        .transpose()?;

    let sync_aggregate = data
        .sync_aggregate
        .as_ref()
        .ok_or(UpdateError::MissingField("sync_aggregate"))?
        .decode()?;
    let signature_slot = data
        .signature_slot
        .as_deref()
        .ok_or(UpdateError::MissingField("signature_slot"))?;

    let update = SyncCommitteeUpdate {
        version,
        attested_header,
        current_sync_committee: Some(current_sync_committee),
        sync_aggregate,
        finalized_header,
        finality_branch: decode_branch("finality_branch", &data.finality_branch)?,
        next_sync_committee: data
            .next_sync_committee
            .as_ref()
            .map(SyncCommitteeJson::decode)
            .transpose()?,
        next_sync_committee_branch: decode_branch(
            "next_sync_committee_branch",
            &data.next_sync_committee_branch,
        )?,
        signature_slot: decode_u64("signature_slot", signature_slot)?,
    };

    if let Some(prev_period) = attested_period(prev) {
        if update.attested_period() != prev_period + 1 {
            warn!(
                prev_period,
                period = update.attested_period(),
                "combining update records from non-adjacent periods"
            );
        }
    }

    debug!(
        fork = %update.version,
        period = update.attested_period(),
        participants = update.sync_aggregate.num_participants(),
        "assembled sync committee update"
    );
    Ok(update)
}

/// Period of a record's attested header, if it has a readable one. Seed
/// records built from a bootstrap have none.
fn attested_period(record: &LightClientUpdateResponse) -> Option<u64> {
    let fork = record.version.parse::<ForkTag>().ok()?;
    let header = record.data.attested_header.as_ref()?;
    let header = decode_light_client_header(fork, header).ok()?;
    Some(sync_committee_period(header.slot))
}

/// Combine every adjacent pair of `records`, oldest first.
pub fn assemble_chain(
    records: &[LightClientUpdateResponse],
) -> Result<Vec<SyncCommitteeUpdate>, UpdateError> {
    records
        .windows(2)
        .map(|pair| combine(&pair[0], &pair[1]))
        .collect()
}
