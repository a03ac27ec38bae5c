//! # Star Ledger Core
//!
//! Pure primitives for the Star Ledger: blocks, the hash-linked chain, and
//! the seams for signature verification and time.
//!
//! This crate contains no I/O, no locking, no logging. It is pure computation
//! over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`Block`] - A sealed, hash-identified record
//! - [`BlockHash`] - Content-addressed identifier (Blake3 hash)
//! - [`Chain`] - The ordered, append-only sequence of blocks
//! - [`StarRecord`] - The payload of a star claim
//!
//! ## Canonicalization
//!
//! Block hashes are computed over deterministic CBOR. See [`canonical`] module.

pub mod block;
pub mod canonical;
pub mod chain;
pub mod clock;
pub mod crypto;
pub mod error;
pub mod types;
pub mod validation;

pub use block::{Block, BlockBody, BlockBuilder, DecodedBlock, StarRecord, GENESIS_MARKER};
pub use canonical::{canonical_seal_bytes, decode_block, encode_block};
pub use chain::Chain;
pub use clock::{Clock, ManualClock, SystemClock};
pub use crypto::{Ed25519Verifier, Keypair, SignatureVerifier};
pub use error::{ChainError, ChainFault, CoreError};
pub use types::BlockHash;
pub use validation::{validate_block, validate_blocks};
