use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UpdateError;

/// Beacon chain forks that carry light client sync committee updates,
/// ordered by activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForkTag {
    Altair,
    Bellatrix,
    Capella,
    Deneb,
    Electra,
}

impl ForkTag {
    pub const ALL: [ForkTag; 5] = [
        ForkTag::Altair,
        ForkTag::Bellatrix,
        ForkTag::Capella,
        ForkTag::Deneb,
        ForkTag::Electra,
    ];

    /// Position of this fork in per-fork tables.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ForkTag::Altair => "altair",
            ForkTag::Bellatrix => "bellatrix",
            ForkTag::Capella => "capella",
            ForkTag::Deneb => "deneb",
            ForkTag::Electra => "electra",
        }
    }

    /// Electra added fields to the beacon state, pushing every state leaf one
    /// level deeper.
    pub fn is_electra_or_later(self) -> bool {
        self >= ForkTag::Electra
    }
}

impl fmt::Display for ForkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForkTag {
    type Err = UpdateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ForkTag::ALL
            .into_iter()
            .find(|fork| fork.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UpdateError::UnsupportedFork(s.to_string()))
    }
}
