//! Network configuration: genesis validators root, fork versions, and the
//! sync committee domains derived from them.
//!
//! A [`ChainSpec`] is built once and never mutated. Domains are computed at
//! construction; published constants only serve as a cross-check.

use std::sync::LazyLock;

use alloy_primitives::B256;
use hex_literal::hex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::consensus::domain::{compute_domain, resolve};
use crate::error::UpdateError;
use crate::types::beacon::Domain;
use crate::types::fork::ForkTag;
use crate::types::wire::{decode_hex, decode_root};

/// Fork versions indexed by [`ForkTag::index`].
pub type ForkVersions = [[u8; 4]; 5];

pub const MAINNET_GENESIS_VALIDATORS_ROOT: B256 = B256::new(hex!(
    "4b363db94e286120d76eb905340fdd4e54bfe9f06bf33ff6cf5ad27f511bfe95"
));

pub const MAINNET_FORK_VERSIONS: ForkVersions = [
    hex!("01000000"),
    hex!("02000000"),
    hex!("03000000"),
    hex!("04000000"),
    hex!("05000000"),
];

/// Published mainnet sync committee domains.
pub const MAINNET_SYNC_COMMITTEE_DOMAINS: [Domain; 5] = [
    B256::new(hex!("07000000afcaaba0efab1ca832a15152469bb09bb84641c405171dfa2d3fb45f")),
    B256::new(hex!("070000004a26c58b08add8089b75caa540848881a8d4f0af0be83417a85c0f45")),
    B256::new(hex!("07000000bba4da96354c9f25476cf1bc69bf583a7f9e0af049305b62de676640")),
    B256::new(hex!("070000006a95a1a967855d676d48be69883b712607f952d5198d0f5677564636")),
    B256::new(hex!("07000000ad532ceb9ec5d246daad29da8aa157bfdab35e5f069f9db81f1da754")),
];

pub const SEPOLIA_GENESIS_VALIDATORS_ROOT: B256 = B256::new(hex!(
    "d8ea171f3c94aea21ebc42a1ed61052acf3f9209c00e4efbaaddac09ed9b8078"
));

pub const SEPOLIA_FORK_VERSIONS: ForkVersions = [
    hex!("90000070"),
    hex!("90000071"),
    hex!("90000072"),
    hex!("90000073"),
    hex!("90000074"),
];

static MAINNET: LazyLock<ChainSpec> = LazyLock::new(|| {
    ChainSpec::with_published_domains(
        "mainnet",
        MAINNET_GENESIS_VALIDATORS_ROOT,
        MAINNET_FORK_VERSIONS,
        &MAINNET_SYNC_COMMITTEE_DOMAINS,
    )
});

static SEPOLIA: LazyLock<ChainSpec> = LazyLock::new(|| {
    ChainSpec::new("sepolia", SEPOLIA_GENESIS_VALIDATORS_ROOT, SEPOLIA_FORK_VERSIONS)
});

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainSpec {
    name: String,
    genesis_validators_root: B256,
    fork_versions: ForkVersions,
    domains: [Domain; 5],
}

impl ChainSpec {
    pub fn new(
        name: impl Into<String>,
        genesis_validators_root: B256,
        fork_versions: ForkVersions,
    ) -> Self {
        let domains = ForkTag::ALL.map(|fork| {
            compute_domain(
                &resolve(fork).domain_type,
                &fork_versions[fork.index()],
                &genesis_validators_root,
            )
        });
        Self {
            name: name.into(),
            genesis_validators_root,
            fork_versions,
            domains,
        }
    }

    fn with_published_domains(
        name: &str,
        genesis_validators_root: B256,
        fork_versions: ForkVersions,
        published: &[Domain; 5],
    ) -> Self {
        let spec = Self::new(name, genesis_validators_root, fork_versions);
        for fork in ForkTag::ALL {
            if spec.domains[fork.index()] != published[fork.index()] {
                warn!(
                    network = name,
                    %fork,
                    computed = %spec.domains[fork.index()],
                    published = %published[fork.index()],
                    "computed sync committee domain differs from published constant"
                );
            }
        }
        spec
    }

    pub fn mainnet() -> &'static ChainSpec {
        &MAINNET
    }

    pub fn sepolia() -> &'static ChainSpec {
        &SEPOLIA
    }

    /// Built-in network whose genesis validators root is `root`, if any.
    pub fn from_genesis_validators_root(root: &B256) -> Option<&'static ChainSpec> {
        [Self::mainnet(), Self::sepolia()]
            .into_iter()
            .find(|spec| spec.genesis_validators_root == *root)
    }

    pub fn from_config(config: &ChainSpecConfig) -> Result<Self, UpdateError> {
        let genesis_validators_root =
            decode_root("genesis_validators_root", &config.genesis_validators_root)
                .map_err(|e| UpdateError::Config(e.to_string()))?;
        let mut fork_versions = [[0u8; 4]; 5];
        for fork in ForkTag::ALL {
            let raw = config
                .fork_version(fork)
                .ok_or_else(|| UpdateError::Config(format!("missing {fork} fork version")))?;
            let bytes = decode_hex("fork_version", raw)
                .map_err(|e| UpdateError::Config(e.to_string()))?;
            fork_versions[fork.index()] = bytes.as_slice().try_into().map_err(|_| {
                UpdateError::Config(format!(
                    "{fork} fork version must be 4 bytes, got {}",
                    bytes.len()
                ))
            })?;
        }
        Ok(Self::new(
            config.name.clone(),
            genesis_validators_root,
            fork_versions,
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn genesis_validators_root(&self) -> &B256 {
        &self.genesis_validators_root
    }

    pub fn fork_version(&self, fork: ForkTag) -> [u8; 4] {
        self.fork_versions[fork.index()]
    }

    /// Sync committee signature domain for `fork` on this network.
    pub fn domain(&self, fork: ForkTag) -> Domain {
        self.domains[fork.index()]
    }
}

/// Serialized network description, hex strings throughout, for networks
/// without a built-in [`ChainSpec`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainSpecConfig {
    pub name: String,
    pub genesis_validators_root: String,
    pub altair_fork_version: Option<String>,
    pub bellatrix_fork_version: Option<String>,
    pub capella_fork_version: Option<String>,
    pub deneb_fork_version: Option<String>,
    pub electra_fork_version: Option<String>,
}

impl ChainSpecConfig {
    pub fn from_json(json: &str) -> Result<Self, UpdateError> {
        serde_json::from_str(json).map_err(|e| UpdateError::Config(e.to_string()))
    }

    fn fork_version(&self, fork: ForkTag) -> Option<&str> {
        match fork {
            ForkTag::Altair => self.altair_fork_version.as_deref(),
            ForkTag::Bellatrix => self.bellatrix_fork_version.as_deref(),
            ForkTag::Capella => self.capella_fork_version.as_deref(),
            ForkTag::Deneb => self.deneb_fork_version.as_deref(),
            ForkTag::Electra => self.electra_fork_version.as_deref(),
        }
    }
}
