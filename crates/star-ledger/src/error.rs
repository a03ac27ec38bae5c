//! Error types for the Star Registry.

use star_ledger_core::{ChainError, ChainFault, CoreError};
use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The challenge is older than the allowed window. Request a new one.
    #[error("challenge expired: issued at {issued_at}, now {now}, window {window_secs}s")]
    Expired {
        issued_at: i64,
        now: i64,
        window_secs: i64,
    },

    /// The signature does not verify against the message and address.
    #[error("invalid signature")]
    InvalidSignature,

    /// The message is not a challenge issued for this address.
    #[error("malformed challenge: {0}")]
    MalformedChallenge(String),

    /// The ledger failed its integrity check and refuses writes.
    #[error("chain is corrupt: {}", describe(.0))]
    ChainCorrupt(Vec<ChainFault>),

    /// The registry was configured with values challenges cannot carry.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Encoding or decoding error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

impl RegistryError {
    /// Check if the caller can fix this by presenting a new proof.
    ///
    /// False means the ledger itself is damaged (or a payload failed to
    /// encode), not the proof.
    pub fn is_proof_error(&self) -> bool {
        matches!(
            self,
            RegistryError::Expired { .. }
                | RegistryError::InvalidSignature
                | RegistryError::MalformedChallenge(_)
        )
    }
}

impl From<ChainError> for RegistryError {
    fn from(e: ChainError) -> Self {
        match e {
            ChainError::Corrupt { faults } => RegistryError::ChainCorrupt(faults),
        }
    }
}

fn describe(faults: &[ChainFault]) -> String {
    faults
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
