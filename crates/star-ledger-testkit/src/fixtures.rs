//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use star_ledger::{DecodedBlock, RegistryConfig, Result, StarRegistry};
use star_ledger_core::{Ed25519Verifier, Keypair, ManualClock};

/// Start time used by fixture clocks (2023-11-14T22:13:20Z).
pub const FIXTURE_EPOCH: i64 = 1_700_000_000;

/// A registry driven by a manual clock.
pub type TestRegistry = StarRegistry<Ed25519Verifier, Arc<ManualClock>>;

/// Create a registry whose clock starts at [`FIXTURE_EPOCH`].
///
/// The returned clock handle controls the registry's notion of now.
pub fn test_registry() -> (TestRegistry, Arc<ManualClock>) {
    test_registry_with(RegistryConfig::default()).expect("default config is valid")
}

/// Like [`test_registry`], with a custom config.
pub fn test_registry_with(config: RegistryConfig) -> Result<(TestRegistry, Arc<ManualClock>)> {
    let clock = Arc::new(ManualClock::new(FIXTURE_EPOCH));
    let registry = StarRegistry::new(Ed25519Verifier, Arc::clone(&clock), config)?;
    Ok((registry, clock))
}

/// A test fixture: one party with a keypair.
pub struct TestFixture {
    pub keypair: Keypair,
}

impl TestFixture {
    /// Create a new test fixture with a random keypair.
    pub fn new() -> Self {
        Self {
            keypair: Keypair::generate(),
        }
    }

    /// Create with a deterministic keypair from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            keypair: Keypair::from_seed(&seed),
        }
    }

    /// The address this party controls.
    pub fn address(&self) -> String {
        self.keypair.address()
    }

    /// Sign a challenge message.
    pub fn sign(&self, message: &str) -> String {
        self.keypair.sign_message(message)
    }

    /// Run the full handshake: request a challenge, sign it, submit the star.
    pub fn claim(&self, registry: &TestRegistry, star: serde_json::Value) -> Result<DecodedBlock> {
        let address = self.address();
        let message = registry.request_challenge(&address);
        let signature = self.sign(&message);
        registry.submit_star(&address, &message, &signature, star)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple test fixtures for multi-party tests.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            seed[31] = 0x5a;
            TestFixture::with_seed(seed)
        })
        .collect()
}
