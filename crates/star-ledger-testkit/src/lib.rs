//! # Star Ledger Testkit
//!
//! Testing utilities for the Star Ledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known seal encodings for cross-platform verification
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: A registry on a manual clock plus parties that can sign
//!
//! ## Golden Vectors
//!
//! ```rust
//! use star_ledger_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, hash) in verify_all_vectors() {
//!     assert!(matches, "{name}");
//!     println!("{name}: {hash}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use star_ledger_testkit::generators::star_record;
//!
//! proptest! {
//!     #[test]
//!     fn owner_is_preserved(record in star_record()) {
//!         // ...
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use serde_json::json;
//! use star_ledger_testkit::fixtures::{test_registry, TestFixture};
//!
//! let (registry, clock) = test_registry();
//! let fixture = TestFixture::new();
//! let block = fixture.claim(&registry, json!({"dec": 10, "ra": 20})).unwrap();
//! assert_eq!(block.height, 1);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{multi_party_fixtures, test_registry, test_registry_with, TestFixture, TestRegistry};
pub use vectors::{all_vectors, generate_block_from_vector, verify_all_vectors, GoldenVector};
