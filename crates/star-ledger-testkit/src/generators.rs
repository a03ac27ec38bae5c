//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::{json, Value};

use star_ledger_core::{BlockHash, Keypair, StarRecord};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random address.
pub fn address() -> impl Strategy<Value = String> {
    keypair().prop_map(|kp| kp.address())
}

/// Generate a random BlockHash.
pub fn block_hash() -> impl Strategy<Value = BlockHash> {
    any::<[u8; 32]>().prop_map(BlockHash::from_bytes)
}

/// Generate a reasonable timestamp in seconds.
pub fn timestamp() -> impl Strategy<Value = i64> {
    0i64..=4_102_444_800
}

/// Generate a star description with declination and right ascension.
pub fn star() -> impl Strategy<Value = Value> {
    (-90i64..=90, 0i64..360, proptest::option::of("[A-Za-z ]{1,24}")).prop_map(
        |(dec, ra, story)| match story {
            Some(story) => json!({"dec": dec, "ra": ra, "story": story}),
            None => json!({"dec": dec, "ra": ra}),
        },
    )
}

/// Generate a star record.
pub fn star_record() -> impl Strategy<Value = StarRecord> {
    (address(), star()).prop_map(|(owner, star)| StarRecord::new(owner, star))
}

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}
