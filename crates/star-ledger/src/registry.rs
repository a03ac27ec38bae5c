//! The Star Registry: ownership-verified star claims on one chain.
//!
//! The registry owns the chain behind a lock. Ownership proofs are checked
//! without holding it; the write lock is then held across validation and
//! append so no other writer can slip in between.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use star_ledger_core::{
    Block, BlockBuilder, BlockHash, Chain, ChainFault, Clock, DecodedBlock, Ed25519Verifier,
    SignatureVerifier, StarRecord, SystemClock,
};
use tracing::{error, info};

use crate::error::{RegistryError, Result};
use crate::ownership::{
    OwnershipVerifier, DEFAULT_CHALLENGE_WINDOW_SECS, DEFAULT_PURPOSE_TAG,
};

/// Configuration for the registry.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// How long an issued challenge stays valid, in seconds.
    pub challenge_window_secs: i64,
    /// Tag embedded in challenges to bind them to this registry.
    pub purpose_tag: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            challenge_window_secs: DEFAULT_CHALLENGE_WINDOW_SECS,
            purpose_tag: DEFAULT_PURPOSE_TAG.to_string(),
        }
    }
}

impl RegistryConfig {
    /// Check that challenges issued under this config can be parsed back.
    pub fn validate(&self) -> Result<()> {
        if self.purpose_tag.contains(':') {
            return Err(RegistryError::InvalidConfig(format!(
                "purpose tag {:?} must not contain ':'",
                self.purpose_tag
            )));
        }
        if self.challenge_window_secs < 0 {
            return Err(RegistryError::InvalidConfig(format!(
                "challenge window {}s is negative",
                self.challenge_window_secs
            )));
        }
        Ok(())
    }
}

/// The main registry struct.
///
/// Provides:
/// - Ownership challenges
/// - Star submission
/// - Lookups by hash, height and owner
/// - Whole-chain validation
pub struct StarRegistry<V = Ed25519Verifier, C = SystemClock> {
    /// Challenge issuing and proof checks.
    ownership: OwnershipVerifier<V>,
    /// Time source for challenges and block timestamps.
    clock: C,
    /// The ledger.
    chain: RwLock<Chain>,
}

impl StarRegistry {
    /// A registry with Ed25519 proofs, the system clock and default config.
    pub fn with_defaults() -> Self {
        Self::assemble(Ed25519Verifier, SystemClock, RegistryConfig::default(), Chain::new())
    }
}

impl<V: SignatureVerifier, C: Clock> StarRegistry<V, C> {
    /// Create a registry with a fresh chain, genesis block included.
    ///
    /// Fails with [`RegistryError::InvalidConfig`] if `config` does not
    /// validate.
    pub fn new(verifier: V, clock: C, config: RegistryConfig) -> Result<Self> {
        Self::with_chain(verifier, clock, config, Chain::new())
    }

    /// Create a registry over an existing chain.
    ///
    /// An empty chain gets its genesis block; a non-empty one is taken as is.
    pub fn with_chain(
        verifier: V,
        clock: C,
        config: RegistryConfig,
        chain: Chain,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(verifier, clock, config, chain))
    }

    fn assemble(verifier: V, clock: C, config: RegistryConfig, mut chain: Chain) -> Self {
        let genesis = chain.initialize(clock.now()).hash;
        info!(%genesis, height = ?chain.height(), "star registry ready");

        Self {
            ownership: OwnershipVerifier::new(
                verifier,
                config.purpose_tag,
                config.challenge_window_secs,
            ),
            clock,
            chain: RwLock::new(chain),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Write Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Issue a challenge message for `address` to sign.
    pub fn request_challenge(&self, address: &str) -> String {
        self.ownership.issue_challenge(address, self.clock.now())
    }

    /// Register a star for `address`.
    ///
    /// Checks the challenge and signature first; a rejected proof never
    /// touches the chain. Chain corruption is reported as
    /// [`RegistryError::ChainCorrupt`](crate::RegistryError::ChainCorrupt),
    /// separate from proof errors.
    pub fn submit_star(
        &self,
        address: &str,
        message: &str,
        signature: &str,
        star: serde_json::Value,
    ) -> Result<DecodedBlock> {
        self.ownership.check(address, message, signature, self.clock.now())?;

        let record = StarRecord::new(address, star);
        let candidate = BlockBuilder::star(&record)?;

        // Block time is read under the lock so times follow chain order.
        let mut chain = self.write();
        let block = chain.append(candidate, self.clock.now()).map_err(|e| {
            error!(error = %e, "refused append to corrupt chain");
            e
        })?;

        info!(owner = address, height = block.height, hash = %block.hash, "star registered");
        Ok(block.decode()?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Height of the last block (0 when only genesis exists).
    pub fn chain_height(&self) -> u64 {
        self.read().height().unwrap_or_default()
    }

    /// Get a decoded block by hash.
    pub fn block_by_hash(&self, hash: &BlockHash) -> Result<Option<DecodedBlock>> {
        Ok(self.read().get_by_hash(hash)?)
    }

    /// Get a decoded block by height.
    pub fn block_by_height(&self, height: u64) -> Result<Option<DecodedBlock>> {
        Ok(self.read().get_by_height(height)?)
    }

    /// All stars registered by `owner`, in submission order.
    pub fn stars_by_owner(&self, owner: &str) -> Vec<StarRecord> {
        self.read().get_by_owner(owner)
    }

    /// Validate the whole chain; an empty result means it is intact.
    pub fn validate_chain(&self) -> Vec<ChainFault> {
        self.read().validate_all()
    }

    /// Copy of every block, for export or forensics.
    pub fn snapshot(&self) -> Vec<Block> {
        self.read().blocks().to_vec()
    }

    // A panic while holding the lock cannot leave a half-written block: append
    // pushes a fully sealed block in one step.
    fn read(&self) -> RwLockReadGuard<'_, Chain> {
        self.chain.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Chain> {
        self.chain.write().unwrap_or_else(PoisonError::into_inner)
    }
}
