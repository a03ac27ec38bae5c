//! Ownership verification: time-bound challenges answered by signatures.
//!
//! A challenge is the message `<address>:<issued_at>:<purpose>`. The registry
//! keeps no record of the challenges it issues; validity is derived entirely
//! from the timestamp embedded in the message presented back to it.

use std::fmt;

use star_ledger_core::SignatureVerifier;
use tracing::{debug, warn};

use crate::error::{RegistryError, Result};

/// Purpose tag embedded in every challenge.
pub const DEFAULT_PURPOSE_TAG: &str = "starRegistry";

/// How long a challenge stays valid, in seconds.
pub const DEFAULT_CHALLENGE_WINDOW_SECS: i64 = 300;

/// A parsed ownership challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipChallenge {
    pub address: String,
    pub issued_at: i64,
    pub purpose: String,
}

impl OwnershipChallenge {
    pub fn new(address: impl Into<String>, issued_at: i64, purpose: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            issued_at,
            purpose: purpose.into(),
        }
    }

    /// Parse a challenge message.
    ///
    /// Fields are split off from the right, so the address may itself
    /// contain ':'.
    pub fn parse(message: &str) -> Result<Self> {
        let fields: Vec<&str> = message.rsplitn(3, ':').collect();
        let [purpose, issued_at, address] = fields.as_slice() else {
            return Err(RegistryError::MalformedChallenge(format!(
                "expected 3 fields, got {}",
                fields.len()
            )));
        };

        if address.is_empty() {
            return Err(RegistryError::MalformedChallenge("empty address".into()));
        }

        let issued_at = issued_at.parse::<i64>().map_err(|_| {
            RegistryError::MalformedChallenge(format!("invalid timestamp {issued_at:?}"))
        })?;

        Ok(Self::new(*address, issued_at, *purpose))
    }

    /// Check if the challenge is past its window at `now`.
    ///
    /// A challenge checked exactly `window_secs` after issue is still valid.
    pub fn is_expired(&self, now: i64, window_secs: i64) -> bool {
        self.issued_at.saturating_add(window_secs) < now
    }
}

impl fmt::Display for OwnershipChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.address, self.issued_at, self.purpose)
    }
}

/// Check a raw challenge message for expiry.
///
/// A message that does not parse counts as expired.
pub fn is_expired(message: &str, now: i64, window_secs: i64) -> bool {
    OwnershipChallenge::parse(message)
        .map(|challenge| challenge.is_expired(now, window_secs))
        .unwrap_or(true)
}

/// Issues challenges and checks ownership proofs.
///
/// Every check is a pure precondition: nothing is recorded on success or
/// failure.
#[derive(Debug, Clone)]
pub struct OwnershipVerifier<V> {
    verifier: V,
    purpose_tag: String,
    window_secs: i64,
}

impl<V: SignatureVerifier> OwnershipVerifier<V> {
    /// Create a verifier around a signature scheme.
    pub fn new(verifier: V, purpose_tag: impl Into<String>, window_secs: i64) -> Self {
        Self {
            verifier,
            purpose_tag: purpose_tag.into(),
            window_secs,
        }
    }

    /// Produce the challenge message for `address` at `now`.
    pub fn issue_challenge(&self, address: &str, now: i64) -> String {
        let message = OwnershipChallenge::new(address, now, self.purpose_tag.as_str()).to_string();
        debug!(address, issued_at = now, "issued ownership challenge");
        message
    }

    /// Check a signature. Malformed input yields false.
    pub fn verify_signature(&self, message: &str, address: &str, signature: &str) -> bool {
        self.verifier.verify(message, address, signature)
    }

    /// Run every ownership check for a submission, in order: parse, expiry,
    /// address binding, signature. Stops at the first failure.
    pub fn check(
        &self,
        address: &str,
        message: &str,
        signature: &str,
        now: i64,
    ) -> Result<OwnershipChallenge> {
        let challenge = OwnershipChallenge::parse(message).map_err(|e| {
            warn!(address, error = %e, "rejected unparseable challenge");
            e
        })?;

        if challenge.purpose != self.purpose_tag {
            warn!(address, purpose = %challenge.purpose, "rejected challenge with foreign purpose");
            return Err(RegistryError::MalformedChallenge(format!(
                "unexpected purpose {:?}",
                challenge.purpose
            )));
        }

        if challenge.is_expired(now, self.window_secs) {
            warn!(address, issued_at = challenge.issued_at, now, "rejected expired challenge");
            return Err(RegistryError::Expired {
                issued_at: challenge.issued_at,
                now,
                window_secs: self.window_secs,
            });
        }

        if challenge.address != address {
            warn!(address, challenged = %challenge.address, "rejected challenge issued to another address");
            return Err(RegistryError::MalformedChallenge(
                "challenge was issued to a different address".into(),
            ));
        }

        if !self.verify_signature(message, address, signature) {
            warn!(address, "rejected invalid signature");
            return Err(RegistryError::InvalidSignature);
        }

        Ok(challenge)
    }
}
