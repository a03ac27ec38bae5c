//! Chain: an ordered, append-only, hash-linked sequence of blocks.
//!
//! Index 0 is the genesis block and insertion order is height order. The only
//! way to add a block is [`Chain::append`] (or [`Chain::initialize`] for the
//! genesis block); nothing removes or edits a block once it is in.
//!
//! A `Chain` has no internal locking. Callers that share one across threads
//! must hold an exclusive lock across `append`, since it validates and then
//! writes.

use crate::block::{Block, BlockBuilder, DecodedBlock, StarRecord};
use crate::error::{ChainError, ChainFault, CoreError};
use crate::types::BlockHash;
use crate::validation::validate_blocks;

#[derive(Debug, Clone, Default)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Create an uninitialized chain (no genesis block yet).
    pub fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Create a chain and seal its genesis block at `now`.
    pub fn genesis(now: i64) -> Self {
        let mut chain = Self::new();
        chain.initialize(now);
        chain
    }

    /// Restore a chain from blocks held by an external collaborator.
    ///
    /// No checks are made here. Damage is reported by [`Chain::validate_all`]
    /// and blocks the next append.
    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Seal the genesis block if the chain is empty.
    ///
    /// Idempotent: on a chain that already has blocks this does nothing.
    /// Returns the genesis block either way.
    pub fn initialize(&mut self, now: i64) -> &Block {
        if self.blocks.is_empty() {
            self.push_sealed(BlockBuilder::genesis(), now);
        }
        &self.blocks[0]
    }

    /// Height of the last block, or None if uninitialized.
    pub fn height(&self) -> Option<u64> {
        (self.blocks.len() as u64).checked_sub(1)
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the chain has no blocks yet.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The last block.
    pub fn tip(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// All blocks, in height order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Validate the whole chain, then seal and append the candidate.
    ///
    /// Fails with [`ChainError::Corrupt`] without touching the chain if
    /// validation reports any fault. An uninitialized chain gets its genesis
    /// block first, so the candidate never lands at height 0.
    pub fn append(&mut self, candidate: BlockBuilder, now: i64) -> Result<&Block, ChainError> {
        let faults = self.validate_all();
        if !faults.is_empty() {
            return Err(ChainError::Corrupt { faults });
        }

        self.initialize(now);
        Ok(self.push_sealed(candidate, now))
    }

    fn push_sealed(&mut self, candidate: BlockBuilder, now: i64) -> &Block {
        let height = self.blocks.len() as u64;
        let previous = self.tip().map(|b| b.hash);

        self.blocks.push(candidate.seal(height, previous, now));
        &self.blocks[self.blocks.len() - 1]
    }

    /// Find a block by hash (linear scan).
    pub fn block_by_hash(&self, hash: &BlockHash) -> Option<&Block> {
        self.blocks.iter().find(|b| &b.hash == hash)
    }

    /// Find a block by height (linear scan).
    pub fn block_at_height(&self, height: u64) -> Option<&Block> {
        self.blocks.iter().find(|b| b.height == height)
    }

    /// Find a block by hash and decode it.
    pub fn get_by_hash(&self, hash: &BlockHash) -> Result<Option<DecodedBlock>, CoreError> {
        self.block_by_hash(hash).map(Block::decode).transpose()
    }

    /// Find a block by height and decode it.
    ///
    /// The genesis block decodes to its marker unchanged.
    pub fn get_by_height(&self, height: u64) -> Result<Option<DecodedBlock>, CoreError> {
        self.block_at_height(height).map(Block::decode).transpose()
    }

    /// All star records owned by `owner`, in chain order.
    ///
    /// Blocks whose payload does not decode are skipped; they surface through
    /// [`Chain::validate_all`] instead.
    pub fn get_by_owner(&self, owner: &str) -> Vec<StarRecord> {
        self.blocks
            .iter()
            .skip(1)
            .filter_map(|b| b.decode_payload().ok())
            .filter_map(|body| body.as_star().cloned())
            .filter(|record| record.owner == owner)
            .collect()
    }

    /// Check every block; an empty result means the chain is intact.
    pub fn validate_all(&self) -> Vec<ChainFault> {
        validate_blocks(&self.blocks)
    }
}
