//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the canonical seal encoding byte for byte, so any change
//! to field keys, ordering or integer widths shows up as a mismatch.

use star_ledger_core::{canonical_seal_bytes, Block, BlockHash};

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Block height.
    pub height: u64,
    /// Block time.
    pub time: i64,
    /// Previous block hash, if any.
    pub previous_block_hash: Option<[u8; 32]>,
    /// Payload bytes.
    pub payload: &'static [u8],
    /// Expected canonical seal bytes (hex).
    pub expected_seal_bytes: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "genesis at epoch",
            height: 0,
            time: 0,
            previous_block_hash: None,
            payload: b"Genesis Block",
            expected_seal_bytes: "a40000010002f6034d47656e6573697320426c6f636b",
        },
        GoldenVector {
            name: "first star block",
            height: 1,
            time: 1_700_000_000,
            previous_block_hash: Some([0x11; 32]),
            payload: b"{}",
            expected_seal_bytes: concat!(
                "a4",
                "0001",
                "011a6553f100",
                "025820",
                "1111111111111111111111111111111111111111111111111111111111111111",
                "03427b7d",
            ),
        },
        GoldenVector {
            name: "two-byte height, negative time, empty payload",
            height: 24,
            time: -1,
            previous_block_hash: None,
            payload: b"",
            expected_seal_bytes: "a4001818012002f60340",
        },
    ]
}

/// Seal a block from a golden vector.
pub fn generate_block_from_vector(vector: &GoldenVector) -> Block {
    Block::seal(
        vector.height,
        vector.previous_block_hash.map(BlockHash::from_bytes),
        vector.time,
        vector.payload,
    )
}

/// Verify all golden vectors.
///
/// Returns (name, matches, block hash hex) for each vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let previous = v.previous_block_hash.map(BlockHash::from_bytes);
            let bytes = canonical_seal_bytes(v.height, v.time, previous.as_ref(), v.payload);
            let block = generate_block_from_vector(v);

            (v.name.to_string(), hex::encode(bytes) == v.expected_seal_bytes, block.hash.to_hex())
        })
        .collect()
}
