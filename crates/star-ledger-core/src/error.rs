//! Error types for the Star Ledger Core.

use thiserror::Error;

use crate::types::BlockHash;

/// Core errors that can occur while encoding or decoding blocks.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),

    #[error("malformed block: {0}")]
    MalformedBlock(String),
}

/// A single integrity fault found while validating a chain.
///
/// The `Display` form is the human-readable description reported to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainFault {
    #[error("block #{height}: stored hash {stored} does not match computed hash {computed}")]
    HashMismatch {
        height: u64,
        stored: BlockHash,
        computed: BlockHash,
    },

    #[error("block #{height}: previous block {previous} is not in the chain")]
    MissingPrevious { height: u64, previous: BlockHash },

    #[error("block #{height}: no previous block hash")]
    MissingPreviousLink { height: u64 },

    #[error("block at index {index} has height {height}")]
    HeightMismatch { index: usize, height: u64 },
}

impl ChainFault {
    /// Height of the block the fault was found on.
    pub fn height(&self) -> u64 {
        match self {
            ChainFault::HashMismatch { height, .. }
            | ChainFault::MissingPrevious { height, .. }
            | ChainFault::MissingPreviousLink { height }
            | ChainFault::HeightMismatch { height, .. } => *height,
        }
    }
}

/// Errors from chain mutation.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Validation found faults; the chain refuses further writes.
    #[error("chain is corrupt: {} fault(s), first: {}", .faults.len(), first_fault(.faults))]
    Corrupt { faults: Vec<ChainFault> },
}

fn first_fault(faults: &[ChainFault]) -> String {
    faults
        .first()
        .map(ToString::to_string)
        .unwrap_or_else(|| "none".into())
}
