//! Block: the sealed, hash-identified record of the ledger.
//!
//! A block is immutable once sealed. Its hash is the digest of its own sealed
//! fields, so any later edit is detectable by recomputing it.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::canonical::canonical_seal_bytes;
use crate::error::CoreError;
use crate::types::BlockHash;

/// The fixed payload of the genesis block.
pub const GENESIS_MARKER: &str = "Genesis Block";

/// A star claim: the payload of every non-genesis block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StarRecord {
    /// Address that proved ownership when the star was registered.
    pub owner: String,

    /// Opaque star description supplied by the client.
    pub star: serde_json::Value,
}

impl StarRecord {
    pub fn new(owner: impl Into<String>, star: serde_json::Value) -> Self {
        Self {
            owner: owner.into(),
            star,
        }
    }
}

/// The decoded payload of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BlockBody {
    /// The genesis marker, returned as stored.
    Genesis(String),
    /// A star claim.
    Star(StarRecord),
}

impl BlockBody {
    /// The star record, unless this is the genesis body.
    pub fn as_star(&self) -> Option<&StarRecord> {
        match self {
            BlockBody::Star(record) => Some(record),
            BlockBody::Genesis(_) => None,
        }
    }
}

/// A block with its payload decoded, for external consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedBlock {
    pub height: u64,
    pub time: i64,
    pub previous_block_hash: Option<BlockHash>,
    pub hash: BlockHash,
    pub body: BlockBody,
}

/// A sealed block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain; 0 for genesis.
    pub height: u64,

    /// Seconds since the Unix epoch, assigned at append time.
    pub time: i64,

    /// Hash of the previous block (None for genesis).
    pub previous_block_hash: Option<BlockHash>,

    /// Encoded payload bytes.
    pub payload: Bytes,

    /// Digest of the four fields above, fixed at seal time.
    pub hash: BlockHash,
}

impl Block {
    /// Construct a block and compute its hash.
    pub fn seal(
        height: u64,
        previous_block_hash: Option<BlockHash>,
        time: i64,
        payload: impl Into<Bytes>,
    ) -> Self {
        let payload = payload.into();
        let hash = BlockHash::digest(&canonical_seal_bytes(
            height,
            time,
            previous_block_hash.as_ref(),
            &payload,
        ));

        Self {
            height,
            time,
            previous_block_hash,
            payload,
            hash,
        }
    }

    /// Recompute the digest of the sealed fields as they are now.
    pub fn recompute_hash(&self) -> BlockHash {
        BlockHash::digest(&canonical_seal_bytes(
            self.height,
            self.time,
            self.previous_block_hash.as_ref(),
            &self.payload,
        ))
    }

    /// Check that the stored hash still matches the sealed fields.
    pub fn is_hash_valid(&self) -> bool {
        self.hash == self.recompute_hash()
    }

    /// Check if this is the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.height == 0
    }

    /// Decode the payload.
    ///
    /// The genesis payload decodes to itself; every other payload must be a
    /// JSON-encoded [`StarRecord`].
    pub fn decode_payload(&self) -> Result<BlockBody, CoreError> {
        if self.is_genesis() {
            let marker = std::str::from_utf8(&self.payload)
                .map_err(|e| CoreError::DecodingError(e.to_string()))?;
            return Ok(BlockBody::Genesis(marker.to_owned()));
        }

        serde_json::from_slice(&self.payload)
            .map(BlockBody::Star)
            .map_err(|e| CoreError::DecodingError(e.to_string()))
    }

    /// Decode the payload and pair it with the block metadata.
    pub fn decode(&self) -> Result<DecodedBlock, CoreError> {
        Ok(DecodedBlock {
            height: self.height,
            time: self.time,
            previous_block_hash: self.previous_block_hash,
            hash: self.hash,
            body: self.decode_payload()?,
        })
    }
}

/// An unsealed block: payload only.
///
/// Height, previous hash and time are assigned by the chain at append time.
#[derive(Debug, Clone)]
pub struct BlockBuilder {
    payload: Bytes,
}

impl BlockBuilder {
    /// Start a candidate block with a raw payload.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// The genesis candidate.
    pub fn genesis() -> Self {
        Self::new(GENESIS_MARKER.as_bytes())
    }

    /// A candidate carrying a star claim.
    pub fn star(record: &StarRecord) -> Result<Self, CoreError> {
        let payload =
            serde_json::to_vec(record).map_err(|e| CoreError::EncodingError(e.to_string()))?;
        Ok(Self::new(payload))
    }

    /// Fix the chain-assigned fields and compute the hash.
    pub fn seal(self, height: u64, previous_block_hash: Option<BlockHash>, time: i64) -> Block {
        Block::seal(height, previous_block_hash, time, self.payload)
    }
}
