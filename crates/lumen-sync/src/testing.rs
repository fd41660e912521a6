//! Deterministic committees, state trees, and signed updates for tests.

use std::sync::OnceLock;

use alloy_primitives::B256;
use blst::min_pk::{AggregatePublicKey, AggregateSignature, SecretKey, Signature};
use serde_json::{json, Value};

use crate::config::ChainSpec;
use crate::consensus::domain::resolve;
use crate::consensus::merkle::{sha256_hash, sha256_pair};
use crate::consensus::signature::{signing_root, BLS_DST};
use crate::consensus::tree_hash::HashTreeRoot;
use crate::types::beacon::*;
use crate::types::fork::ForkTag;
use crate::types::wire::*;

pub(crate) struct TestCommittee {
    secret_keys: Vec<SecretKey>,
    pub committee: SyncCommittee,
}

impl TestCommittee {
    fn generate(seed: u8) -> Self {
        let secret_keys: Vec<SecretKey> = (0..SYNC_COMMITTEE_SIZE)
            .map(|i| {
                let mut ikm = [0x5a; 32];
                ikm[0] = seed;
                ikm[1..3].copy_from_slice(&(i as u16).to_le_bytes());
                SecretKey::key_gen(&ikm, &[]).expect("ikm is 32 bytes")
            })
            .collect();
        let public_keys: Vec<_> = secret_keys.iter().map(SecretKey::sk_to_pk).collect();
        let aggregate = AggregatePublicKey::aggregate(&public_keys.iter().collect::<Vec<_>>(), false)
            .expect("non-empty key set")
            .to_public_key();

        Self {
            secret_keys,
            committee: SyncCommittee {
                pubkeys: public_keys
                    .iter()
                    .map(|pk| BlsPublicKey(pk.compress()))
                    .collect(),
                aggregate_pubkey: BlsPublicKey(aggregate.compress()),
            },
        }
    }

    /// Aggregate signature of the members at `signers` over `message`.
    pub fn sign(&self, signers: &[usize], message: &B256) -> BlsSignature {
        let signatures: Vec<Signature> = signers
            .iter()
            .map(|&i| self.secret_keys[i].sign(message.as_slice(), BLS_DST, &[]))
            .collect();
        let aggregate =
            AggregateSignature::aggregate(&signatures.iter().collect::<Vec<_>>(), false)
                .expect("non-empty signature set");
        BlsSignature(aggregate.to_signature().compress())
    }
}

static COMMITTEES: [OnceLock<TestCommittee>; 4] = [const { OnceLock::new() }; 4];

/// Committee `seed` (0..4), generated once per test binary.
pub(crate) fn committee(seed: usize) -> &'static TestCommittee {
    COMMITTEES[seed].get_or_init(|| TestCommittee::generate(seed as u8))
}

/// Sparse beacon state tree: the given leaves at their generalized indices,
/// zero everywhere else.
pub(crate) struct StateTree {
    leaves: Vec<(u64, B256)>,
    depth: usize,
}

impl StateTree {
    pub fn new(leaves: Vec<(u64, B256)>) -> Self {
        let depth = leaves.iter().map(|(g, _)| g.ilog2() as usize).max().unwrap_or(0);
        Self { leaves, depth }
    }

    fn node(&self, generalized_index: u64) -> B256 {
        if let Some((_, leaf)) = self.leaves.iter().find(|(g, _)| *g == generalized_index) {
            return *leaf;
        }
        if generalized_index.ilog2() as usize >= self.depth {
            return B256::ZERO;
        }
        sha256_pair(
            &self.node(2 * generalized_index),
            &self.node(2 * generalized_index + 1),
        )
    }

    pub fn root(&self) -> B256 {
        self.node(1)
    }

    pub fn branch(&self, generalized_index: u64) -> Vec<B256> {
        let mut index = generalized_index;
        let mut branch = Vec::new();
        while index > 1 {
            branch.push(self.node(index ^ 1));
            index >>= 1;
        }
        branch
    }
}

/// Three out of every four members sign.
pub(crate) fn default_signers() -> Vec<usize> {
    (0..SYNC_COMMITTEE_SIZE).filter(|i| i % 4 != 3).collect()
}

fn state_tree(fork: ForkTag, finalized: &BeaconBlockHeader, current: &SyncCommittee, next: &SyncCommittee) -> StateTree {
    let layout = resolve(fork);
    StateTree::new(vec![
        (layout.finalized_header.generalized_index(), finalized.hash_tree_root()),
        (layout.current_sync_committee.generalized_index(), current.hash_tree_root()),
        (layout.next_sync_committee.generalized_index(), next.hash_tree_root()),
    ])
}

/// A mainnet update for `period`, signed by `signers` of `current` and
/// promising `next`.
pub(crate) fn build_update(
    fork: ForkTag,
    current: &TestCommittee,
    next: &TestCommittee,
    period: u64,
    signers: &[usize],
) -> SyncCommitteeUpdate {
    let layout = resolve(fork);
    let base = period * SLOTS_PER_SYNC_COMMITTEE_PERIOD;
    let finalized_header = BeaconBlockHeader {
        slot: base + 32,
        proposer_index: 11,
        parent_root: sha256_hash(b"finalized parent"),
        state_root: sha256_hash(&base.to_le_bytes()),
        body_root: sha256_hash(b"finalized body"),
    };
    let tree = state_tree(fork, &finalized_header, &current.committee, &next.committee);
    let attested_header = BeaconBlockHeader {
        slot: base + 96,
        proposer_index: 1234,
        parent_root: sha256_hash(b"attested parent"),
        state_root: tree.root(),
        body_root: sha256_hash(b"attested body"),
    };

    let domain = ChainSpec::mainnet().domain(fork);
    let signature = current.sign(signers, &signing_root(&attested_header, &domain));
    let mut bits = SyncCommitteeBits::new([0u8; 64]);
    for &i in signers {
        bits.set(i, true);
    }

    SyncCommitteeUpdate {
        version: fork,
        attested_header,
        current_sync_committee: Some(current.committee.clone()),
        sync_aggregate: SyncAggregate {
            sync_committee_bits: bits,
            sync_committee_signature: signature,
        },
        finalized_header: Some(finalized_header),
        finality_branch: tree.branch(layout.finalized_header.generalized_index()),
        next_sync_committee: Some(next.committee.clone()),
        next_sync_committee_branch: tree.branch(layout.next_sync_committee.generalized_index()),
        signature_slot: base + 97,
    }
}

#[derive(Clone)]
pub(crate) struct UpdateFixture {
    pub update: SyncCommitteeUpdate,
    pub signers: Vec<usize>,
}

static VALID_UPDATES: [OnceLock<UpdateFixture>; 5] = [const { OnceLock::new() }; 5];

/// Committee 0 signing period 300, promising committee 1.
pub(crate) fn valid_update(fork: ForkTag) -> UpdateFixture {
    VALID_UPDATES[fork.index()]
        .get_or_init(|| {
            let signers = default_signers();
            UpdateFixture {
                update: build_update(fork, committee(0), committee(1), 300, &signers),
                signers,
            }
        })
        .clone()
}

/// A bootstrap for `committee` whose header commits to it at the fork's
/// current-sync-committee index.
pub(crate) fn build_bootstrap(fork: ForkTag, committee: &TestCommittee) -> LightClientBootstrap {
    let finalized = BeaconBlockHeader::default();
    let tree = state_tree(fork, &finalized, &committee.committee, &committee.committee);
    LightClientBootstrap {
        version: fork,
        header: BeaconBlockHeader {
            slot: 290 * SLOTS_PER_SYNC_COMMITTEE_PERIOD,
            proposer_index: 5,
            parent_root: sha256_hash(b"bootstrap parent"),
            state_root: tree.root(),
            body_root: sha256_hash(b"bootstrap body"),
        },
        current_sync_committee: committee.committee.clone(),
        current_sync_committee_branch: tree
            .branch(resolve(fork).current_sync_committee.generalized_index()),
    }
}

pub(crate) fn execution_header_json() -> ExecutionPayloadHeaderJson {
    let root = encode_hex(sha256_hash(b"execution"));
    ExecutionPayloadHeaderJson {
        parent_hash: root.clone(),
        fee_recipient: encode_hex([0x11u8; 20]),
        state_root: root.clone(),
        receipts_root: root.clone(),
        logs_bloom: encode_hex([0u8; 256]),
        prev_randao: root.clone(),
        block_number: "21000000".to_string(),
        gas_limit: "36000000".to_string(),
        gas_used: "12000000".to_string(),
        timestamp: "1735000000".to_string(),
        extra_data: "0x".to_string(),
        base_fee_per_gas: "1000000000".to_string(),
        block_hash: root.clone(),
        transactions_root: root.clone(),
        withdrawals_root: root,
        blob_gas_used: "131072".to_string(),
        excess_blob_gas: "0".to_string(),
    }
}

/// Light client header JSON as the beacon API serves it for `fork`.
pub(crate) fn header_value(fork: ForkTag, header: &BeaconBlockHeader) -> Value {
    let beacon = BeaconBlockHeaderJson::from(header);
    match fork {
        ForkTag::Altair | ForkTag::Bellatrix => json!({ "beacon": beacon }),
        _ => json!({
            "beacon": beacon,
            "execution": execution_header_json(),
            "execution_branch": vec![encode_hex(B256::repeat_byte(0x0e)); 4],
        }),
    }
}

/// The beacon API record an update was assembled from. Like the API, it
/// carries no current committee.
pub(crate) fn update_record(update: &SyncCommitteeUpdate) -> LightClientUpdateResponse {
    let json = SyncCommitteeUpdateJson::from(update.clone());
    LightClientUpdateResponse {
        version: json.version,
        data: LightClientUpdateData {
            attested_header: Some(header_value(update.version, &update.attested_header)),
            current_sync_committee: None,
            next_sync_committee: json.next_sync_committee,
            next_sync_committee_branch: json.next_sync_committee_branch,
            finalized_header: update
                .finalized_header
                .as_ref()
                .map(|header| header_value(update.version, header)),
            finality_branch: json.finality_branch,
            sync_aggregate: Some(json.sync_aggregate),
            signature_slot: Some(json.signature_slot),
        },
    }
}

/// Seed record carrying `committee` as the promised next committee.
pub(crate) fn seed_record(fork: ForkTag, committee: &SyncCommittee) -> LightClientUpdateResponse {
    LightClientUpdateResponse {
        version: fork.to_string(),
        data: LightClientUpdateData {
            next_sync_committee: Some(committee.into()),
            ..Default::default()
        },
    }
}

/// The beacon API bootstrap response `bootstrap` decodes from.
pub(crate) fn bootstrap_record(bootstrap: &LightClientBootstrap) -> LightClientBootstrapResponse {
    LightClientBootstrapResponse {
        version: bootstrap.version.to_string(),
        data: LightClientBootstrapData {
            header: header_value(bootstrap.version, &bootstrap.header),
            current_sync_committee: (&bootstrap.current_sync_committee).into(),
            current_sync_committee_branch: bootstrap
                .current_sync_committee_branch
                .iter()
                .map(encode_hex)
                .collect(),
        },
    }
}

/// `value` without its `0x` prefix, in upper case.
pub(crate) fn bare_upper(value: &str) -> String {
    value.strip_prefix("0x").unwrap_or(value).to_uppercase()
}

pub(crate) fn committee_bare_upper(committee: &SyncCommitteeJson) -> SyncCommitteeJson {
    SyncCommitteeJson {
        pubkeys: committee.pubkeys.iter().map(|key| bare_upper(key)).collect(),
        aggregate_pubkey: bare_upper(&committee.aggregate_pubkey),
    }
}

/// `record` with every hex value re-encoded unprefixed and upper case.
pub(crate) fn record_bare_upper(record: &LightClientUpdateResponse) -> LightClientUpdateResponse {
    let mut record = record.clone();
    let data = &mut record.data;
    for header in [data.attested_header.as_mut(), data.finalized_header.as_mut()]
        .into_iter()
        .flatten()
    {
        for field in ["parent_root", "state_root", "body_root"] {
            let bare = header["beacon"][field].as_str().map(bare_upper);
            if let Some(bare) = bare {
                header["beacon"][field] = Value::String(bare);
            }
        }
    }
    data.next_sync_committee = data.next_sync_committee.as_ref().map(committee_bare_upper);
    data.current_sync_committee = data.current_sync_committee.as_ref().map(committee_bare_upper);
    for branch in [&mut data.finality_branch, &mut data.next_sync_committee_branch] {
        for node in branch.iter_mut() {
            *node = bare_upper(node);
        }
    }
    if let Some(aggregate) = data.sync_aggregate.as_mut() {
        aggregate.sync_committee_bits = bare_upper(&aggregate.sync_committee_bits);
        aggregate.sync_committee_signature = bare_upper(&aggregate.sync_committee_signature);
    }
    record
}
