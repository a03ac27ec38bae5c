//! # Star Ledger
//!
//! A single-writer, in-memory ledger of star-ownership claims.
//!
//! ## Overview
//!
//! A client proves control of an address by signing a challenge issued by the
//! registry. The registry checks the proof and appends a block binding the
//! address and the star to a hash-linked chain.
//!
//! - **Block**: Sealed record whose hash covers height, time, previous hash and payload
//! - **Chain**: Append-only, validated before every write
//! - **Ownership challenge**: `<address>:<issued_at>:starRegistry`, valid for five minutes
//!
//! ## Usage
//!
//! ```rust
//! use serde_json::json;
//! use star_ledger::StarRegistry;
//! use star_ledger::core::Keypair;
//!
//! let registry = StarRegistry::with_defaults();
//! let keypair = Keypair::generate();
//!
//! let message = registry.request_challenge(&keypair.address());
//! let signature = keypair.sign_message(&message);
//!
//! let block = registry
//!     .submit_star(&keypair.address(), &message, &signature, json!({"dec": 10, "ra": 20}))
//!     .unwrap();
//! assert_eq!(block.height, 1);
//! ```
//!
//! ## Re-exports
//!
//! - `star_ledger::core` - Core primitives (Block, Chain, BlockHash, etc.)

pub mod error;
pub mod ownership;
pub mod registry;

// Re-export component crates
pub use star_ledger_core as core;

// Re-export main types for convenience
pub use error::{RegistryError, Result};
pub use ownership::{is_expired, OwnershipChallenge, OwnershipVerifier};
pub use registry::{RegistryConfig, StarRegistry};

// Re-export commonly used core types
pub use star_ledger_core::{
    Block, BlockBody, BlockHash, Chain, ChainFault, Clock, DecodedBlock, Ed25519Verifier,
    Keypair, SignatureVerifier, StarRecord,
};
