//! Beacon API JSON shapes for light client records.
//!
//! Every scalar stays a string, exactly as the beacon node emits it: roots
//! and keys as hex, slots as base-10. Decoding into the typed model happens
//! in crate code so failures surface as [`UpdateError::Decode`] instead of
//! disappearing into a JSON parser error.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consensus::assembler::decode_light_client_header;
use crate::error::UpdateError;
use crate::types::beacon::*;
use crate::types::fork::ForkTag;

/// `GET /eth/v1/beacon/light_client/updates` element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightClientUpdateResponse {
    pub version: String,
    pub data: LightClientUpdateData,
}

/// Body of a light client update. Headers are kept as raw JSON because their
/// shape depends on `version`; see [`crate::decode_light_client_header`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LightClientUpdateData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attested_header: Option<Value>,
    /// Not part of the beacon API; present on records re-fed from an
    /// already assembled update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_sync_committee: Option<SyncCommitteeJson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_sync_committee: Option<SyncCommitteeJson>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next_sync_committee_branch: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finalized_header: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub finality_branch: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_aggregate: Option<SyncAggregateJson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_slot: Option<String>,
}

impl LightClientUpdateResponse {
    /// Seed record for the first combine of a chain: it promises the
    /// bootstrap's current committee as the next one.
    pub fn from_bootstrap(bootstrap: &LightClientBootstrapResponse) -> Self {
        Self {
            version: bootstrap.version.clone(),
            data: LightClientUpdateData {
                next_sync_committee: Some(bootstrap.data.current_sync_committee.clone()),
                ..Default::default()
            },
        }
    }
}

/// `GET /eth/v1/beacon/light_client/bootstrap/{block_root}` response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightClientBootstrapResponse {
    pub version: String,
    pub data: LightClientBootstrapData,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightClientBootstrapData {
    pub header: Value,
    pub current_sync_committee: SyncCommitteeJson,
    #[serde(default)]
    pub current_sync_committee_branch: Vec<String>,
}

impl LightClientBootstrapResponse {
    pub fn decode(&self) -> Result<LightClientBootstrap, UpdateError> {
        let version = self
            .version
            .parse::<ForkTag>()
            .map_err(|_| UpdateError::UnsupportedVersion(self.version.clone()))?;
        Ok(LightClientBootstrap {
            version,
            header: decode_light_client_header(version, &self.data.header)?,
            current_sync_committee: self.data.current_sync_committee.decode()?,
            current_sync_committee_branch: decode_branch(
                "current_sync_committee_branch",
                &self.data.current_sync_committee_branch,
            )?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeaconBlockHeaderJson {
    pub slot: String,
    pub proposer_index: String,
    pub parent_root: String,
    pub state_root: String,
    pub body_root: String,
}

/// Pre-Electra light client header. Execution fields, when present, are
/// ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightClientHeaderJson {
    pub beacon: BeaconBlockHeaderJson,
}

/// Electra light client header, carrying the execution payload header and
/// its inclusion branch alongside the beacon header.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightClientHeaderElectraJson {
    pub beacon: BeaconBlockHeaderJson,
    pub execution: ExecutionPayloadHeaderJson,
    pub execution_branch: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPayloadHeaderJson {
    pub parent_hash: String,
    pub fee_recipient: String,
    pub state_root: String,
    pub receipts_root: String,
    pub logs_bloom: String,
    pub prev_randao: String,
    pub block_number: String,
    pub gas_limit: String,
    pub gas_used: String,
    pub timestamp: String,
    pub extra_data: String,
    pub base_fee_per_gas: String,
    pub block_hash: String,
    pub transactions_root: String,
    pub withdrawals_root: String,
    pub blob_gas_used: String,
    pub excess_blob_gas: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncCommitteeJson {
    pub pubkeys: Vec<String>,
    pub aggregate_pubkey: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncAggregateJson {
    pub sync_committee_bits: String,
    pub sync_committee_signature: String,
}

/// Serialized form of [`SyncCommitteeUpdate`]. Absent optional fields are
/// omitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncCommitteeUpdateJson {
    pub version: String,
    pub attested_header: BeaconBlockHeaderJson,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_sync_committee: Option<SyncCommitteeJson>,
    pub sync_aggregate: SyncAggregateJson,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finalized_header: Option<BeaconBlockHeaderJson>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub finality_branch: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_sync_committee: Option<SyncCommitteeJson>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next_sync_committee_branch: Vec<String>,
    pub signature_slot: String,
}

// --- Decoding ---

/// Decode a hex string with an optional `0x` prefix.
pub fn decode_hex(field: &'static str, value: &str) -> Result<Vec<u8>, UpdateError> {
    let value = value.strip_prefix("0x").unwrap_or(value);
    hex::decode(value).map_err(|e| UpdateError::decode(field, e))
}

pub fn decode_root(field: &'static str, value: &str) -> Result<B256, UpdateError> {
    let bytes = decode_hex(field, value)?;
    if bytes.len() != 32 {
        return Err(UpdateError::decode(
            field,
            format!("expected 32 bytes, got {}", bytes.len()),
        ));
    }
    Ok(B256::from_slice(&bytes))
}

/// Decode a base-10 integer string.
pub fn decode_u64(field: &'static str, value: &str) -> Result<u64, UpdateError> {
    value.parse::<u64>().map_err(|e| UpdateError::decode(field, e))
}

pub fn decode_branch(field: &'static str, branch: &[String]) -> Result<Vec<B256>, UpdateError> {
    branch.iter().map(|node| decode_root(field, node)).collect()
}

pub fn encode_hex(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

impl BeaconBlockHeaderJson {
    pub fn decode(&self) -> Result<BeaconBlockHeader, UpdateError> {
        Ok(BeaconBlockHeader {
            slot: decode_u64("slot", &self.slot)?,
            proposer_index: decode_u64("proposer_index", &self.proposer_index)?,
            parent_root: decode_root("parent_root", &self.parent_root)?,
            state_root: decode_root("state_root", &self.state_root)?,
            body_root: decode_root("body_root", &self.body_root)?,
        })
    }
}

impl From<&BeaconBlockHeader> for BeaconBlockHeaderJson {
    fn from(header: &BeaconBlockHeader) -> Self {
        Self {
            slot: header.slot.to_string(),
            proposer_index: header.proposer_index.to_string(),
            parent_root: encode_hex(header.parent_root),
            state_root: encode_hex(header.state_root),
            body_root: encode_hex(header.body_root),
        }
    }
}

impl SyncCommitteeJson {
    pub fn decode(&self) -> Result<SyncCommittee, UpdateError> {
        let pubkeys = self
            .pubkeys
            .iter()
            .map(|key| decode_pubkey("pubkeys", key))
            .collect::<Result<Vec<_>, _>>()?;
        let aggregate_pubkey = decode_pubkey("aggregate_pubkey", &self.aggregate_pubkey)?;
        SyncCommittee::new(pubkeys, aggregate_pubkey)
    }
}

impl From<&SyncCommittee> for SyncCommitteeJson {
    fn from(committee: &SyncCommittee) -> Self {
        Self {
            pubkeys: committee.pubkeys.iter().map(|pk| encode_hex(pk.0)).collect(),
            aggregate_pubkey: encode_hex(committee.aggregate_pubkey.0),
        }
    }
}

fn decode_pubkey(field: &'static str, value: &str) -> Result<BlsPublicKey, UpdateError> {
    let bytes = decode_hex(field, value)?;
    BlsPublicKey::from_bytes(&bytes).map_err(|e| UpdateError::decode(field, e))
}

impl SyncAggregateJson {
    pub fn decode(&self) -> Result<SyncAggregate, UpdateError> {
        let bits = decode_hex("sync_committee_bits", &self.sync_committee_bits)?;
        let bits: [u8; SYNC_COMMITTEE_SIZE / 8] = bits.as_slice().try_into().map_err(|_| {
            UpdateError::decode(
                "sync_committee_bits",
                format!("expected {} bytes, got {}", SYNC_COMMITTEE_SIZE / 8, bits.len()),
            )
        })?;
        let signature = decode_hex("sync_committee_signature", &self.sync_committee_signature)?;
        let signature = BlsSignature::from_bytes(&signature)
            .map_err(|e| UpdateError::decode("sync_committee_signature", e))?;
        Ok(SyncAggregate {
            sync_committee_bits: SyncCommitteeBits::new(bits),
            sync_committee_signature: signature,
        })
    }
}

impl From<&SyncAggregate> for SyncAggregateJson {
    fn from(aggregate: &SyncAggregate) -> Self {
        Self {
            sync_committee_bits: encode_hex(aggregate.sync_committee_bits.as_raw_slice()),
            sync_committee_signature: encode_hex(aggregate.sync_committee_signature.0),
        }
    }
}

impl TryFrom<SyncCommitteeUpdateJson> for SyncCommitteeUpdate {
    type Error = UpdateError;

    fn try_from(json: SyncCommitteeUpdateJson) -> Result<Self, Self::Error> {
        let version = json
            .version
            .parse::<ForkTag>()
            .map_err(|_| UpdateError::UnsupportedVersion(json.version.clone()))?;
        Ok(Self {
            version,
            attested_header: json.attested_header.decode()?,
            current_sync_committee: json
                .current_sync_committee
                .as_ref()
                .map(SyncCommitteeJson::decode)
                .transpose()?,
            sync_aggregate: json.sync_aggregate.decode()?,
            finalized_header: json
                .finalized_header
                .as_ref()
                .map(BeaconBlockHeaderJson::decode)
                .transpose()?,
            finality_branch: decode_branch("finality_branch", &json.finality_branch)?,
            next_sync_committee: json
                .next_sync_committee
                .as_ref()
                .map(SyncCommitteeJson::decode)
                .transpose()?,
            next_sync_committee_branch: decode_branch(
                "next_sync_committee_branch",
                &json.next_sync_committee_branch,
            )?,
            signature_slot: decode_u64("signature_slot", &json.signature_slot)?,
        })
    }
}

impl From<SyncCommitteeUpdate> for SyncCommitteeUpdateJson {
    fn from(update: SyncCommitteeUpdate) -> Self {
        Self {
            version: update.version.to_string(),
            attested_header: (&update.attested_header).into(),
            current_sync_committee: update.current_sync_committee.as_ref().map(Into::into),
            sync_aggregate: (&update.sync_aggregate).into(),
            finalized_header: update.finalized_header.as_ref().map(Into::into),
            finality_branch: update.finality_branch.iter().map(encode_hex).collect(),
            next_sync_committee: update.next_sync_committee.as_ref().map(Into::into),
            next_sync_committee_branch: update
                .next_sync_committee_branch
                .iter()
                .map(encode_hex)
                .collect(),
            signature_slot: update.signature_slot.to_string(),
        }
    }
}
