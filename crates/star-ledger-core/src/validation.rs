//! Chain validation: hash integrity and link checks.

use crate::block::Block;
use crate::error::ChainFault;

/// Validate every block of a chain, in order.
///
/// Returns all faults found; an empty list means the chain is intact. The
/// checks do not assume the blocks were produced by `append`, so edits made
/// after insertion are caught.
pub fn validate_blocks(blocks: &[Block]) -> Vec<ChainFault> {
    blocks
        .iter()
        .enumerate()
        .flat_map(|(index, block)| validate_block(blocks, index, block))
        .collect()
}

/// Validate one block against the chain that holds it.
///
/// This performs:
/// - Hash check (stored hash equals a fresh recomputation)
/// - Height check (height equals position)
/// - Link check (for height > 0, the previous hash resolves to a block)
pub fn validate_block(blocks: &[Block], index: usize, block: &Block) -> Vec<ChainFault> {
    let mut faults = Vec::new();

    let computed = block.recompute_hash();
    if computed != block.hash {
        faults.push(ChainFault::HashMismatch {
            height: block.height,
            stored: block.hash,
            computed,
        });
    }

    if block.height != index as u64 {
        faults.push(ChainFault::HeightMismatch {
            index,
            height: block.height,
        });
    }

    if block.height > 0 {
        match &block.previous_block_hash {
            Some(previous) if blocks.iter().any(|b| &b.hash == previous) => {}
            Some(previous) => faults.push(ChainFault::MissingPrevious {
                height: block.height,
                previous: *previous,
            }),
            None => faults.push(ChainFault::MissingPreviousLink {
                height: block.height,
            }),
        }
    }

    faults
}
