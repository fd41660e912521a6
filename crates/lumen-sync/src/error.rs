use thiserror::Error;

/// Errors for input that is malformed or outside the supported fork set.
///
/// A well-formed update whose proofs or signature do not check out is not an
/// error: it is reported as [`crate::Verdict::Invalid`] so callers can tell
/// "this update is malformed" apart from "this update is untrustworthy".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UpdateError {
    #[error("Failed to decode {field}: {reason}")]
    Decode { field: &'static str, reason: String },

    #[error("Unsupported update version: {0}")]
    UnsupportedVersion(String),

    #[error("Unsupported fork: {0}")]
    UnsupportedFork(String),

    #[error("Merkle branch length mismatch for generalized index {generalized_index}: expected {expected}, got {got}")]
    LengthMismatch {
        generalized_index: u64,
        expected: usize,
        got: usize,
    },

    #[error("Generalized index 0 does not address a tree node")]
    InvalidGeneralizedIndex,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Sync committee continuity broken: current committee differs from the previous update's next committee")]
    CommitteeDiscontinuity,

    #[error("Sync committee must have exactly 512 members, got {got}")]
    InvalidCommitteeSize { got: usize },

    #[error("Invalid chain configuration: {0}")]
    Config(String),
}

impl UpdateError {
    pub(crate) fn decode(field: &'static str, reason: impl ToString) -> Self {
        UpdateError::Decode {
            field,
            reason: reason.to_string(),
        }
    }
}
