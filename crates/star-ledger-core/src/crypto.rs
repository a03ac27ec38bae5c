//! Cryptographic primitives for the Star Ledger.
//!
//! Ownership proofs are Ed25519 signatures over the challenge message. An
//! address is the hex-encoded 32-byte public key and a signature travels as
//! hex-encoded 64 bytes, so both fit in plain text transports.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use std::fmt;
use std::sync::Arc;

/// Checks that `signature` over `message` was produced by the key behind `address`.
///
/// Implementations must return `false` for any malformed input rather than panic.
pub trait SignatureVerifier: Send + Sync {
    fn verify(&self, message: &str, address: &str, signature: &str) -> bool;
}

impl<V: SignatureVerifier + ?Sized> SignatureVerifier for Arc<V> {
    fn verify(&self, message: &str, address: &str, signature: &str) -> bool {
        (**self).verify(message, address, signature)
    }
}

/// Ed25519 message verification over hex-encoded addresses and signatures.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, message: &str, address: &str, signature: &str) -> bool {
        let Some(key_bytes) = decode_hex_array::<32>(address) else {
            return false;
        };
        let Some(sig_bytes) = decode_hex_array::<64>(signature) else {
            return false;
        };
        let Ok(verifying_key) = VerifyingKey::from_bytes(&key_bytes) else {
            return false;
        };

        verifying_key
            .verify(message.as_bytes(), &Signature::from_bytes(&sig_bytes))
            .is_ok()
    }
}

fn decode_hex_array<const N: usize>(s: &str) -> Option<[u8; N]> {
    hex::decode(s).ok()?.try_into().ok()
}

/// A keypair for proving ownership of an address.
///
/// This wraps ed25519-dalek's SigningKey. The ledger itself never holds one;
/// clients and tests use it to answer challenges.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let signing_key = SigningKey::generate(&mut rng);
        Self { signing_key }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        Self { signing_key }
    }

    /// The address controlled by this keypair (hex public key).
    pub fn address(&self) -> String {
        hex::encode(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a challenge message, returning the hex-encoded signature.
    pub fn sign_message(&self, message: &str) -> String {
        let sig = self.signing_key.sign(message.as_bytes());
        hex::encode(sig.to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({})", &self.address()[..16])
    }
}
