//! Concurrent submissions through a shared registry.

use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use star_ledger::{
    Clock, Ed25519Verifier, Keypair, RegistryConfig, SignatureVerifier, StarRegistry,
};
use star_ledger_testkit::fixtures::{multi_party_fixtures, test_registry};

/// A clock that moves one second forward on every read.
struct TickingClock(AtomicI64);

impl Clock for TickingClock {
    fn now(&self) -> i64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

/// Ed25519, but slow to verify proofs from one address.
struct SlowFor {
    address: String,
    delay: Duration,
}

impl SignatureVerifier for SlowFor {
    fn verify(&self, message: &str, address: &str, signature: &str) -> bool {
        if address == self.address {
            std::thread::sleep(self.delay);
        }
        Ed25519Verifier.verify(message, address, signature)
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submissions_stay_linked() {
    let (registry, _) = test_registry();
    let registry = Arc::new(registry);
    let parties = multi_party_fixtures(8);

    let mut handles = Vec::new();
    for party in parties {
        let registry = Arc::clone(&registry);
        handles.push(tokio::task::spawn_blocking(move || {
            (0..5)
                .map(|i| party.claim(&registry, json!({"n": i})).map(|b| b.height))
                .collect::<Result<Vec<_>, _>>()
        }));
    }

    let mut heights = HashSet::new();
    for handle in handles {
        for height in handle.await.unwrap().unwrap() {
            assert!(heights.insert(height), "height {height} assigned twice");
        }
    }

    assert_eq!(heights, (1..=40).collect::<HashSet<u64>>());
    assert_eq!(registry.chain_height(), 40);
    assert!(registry.validate_chain().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_reads_during_writes() {
    let (registry, _) = test_registry();
    let registry = Arc::new(registry);
    let writer = multi_party_fixtures(1).remove(0);
    let address = writer.address();

    let writes = {
        let registry = Arc::clone(&registry);
        tokio::task::spawn_blocking(move || {
            for i in 0..20 {
                writer.claim(&registry, json!({"n": i})).unwrap();
            }
        })
    };

    let reads = {
        let registry = Arc::clone(&registry);
        tokio::task::spawn_blocking(move || {
            let mut last = 0;
            for _ in 0..50 {
                let count = registry.stars_by_owner(&address).len();
                assert!(count >= last, "owner view went backwards");
                last = count;
                assert!(registry.validate_chain().is_empty());
            }
        })
    };

    writes.await.unwrap();
    reads.await.unwrap();
    assert_eq!(registry.chain_height(), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_block_times_follow_chain_order_with_slow_proof() {
    let slow = Keypair::from_seed(&[0x0a; 32]);
    let fast = Keypair::from_seed(&[0x0b; 32]);
    let verifier = SlowFor {
        address: slow.address(),
        delay: Duration::from_millis(300),
    };
    let registry = Arc::new(
        StarRegistry::new(verifier, TickingClock(AtomicI64::new(1000)), RegistryConfig::default())
            .unwrap(),
    );

    let submit = |keypair: Keypair| {
        let registry = Arc::clone(&registry);
        tokio::task::spawn_blocking(move || {
            let address = keypair.address();
            let message = registry.request_challenge(&address);
            let signature = keypair.sign_message(&message);
            registry.submit_star(&address, &message, &signature, json!({})).map(|b| b.height)
        })
    };

    let slow_claim = submit(slow);
    tokio::time::sleep(Duration::from_millis(50)).await;
    let fast_claim = submit(fast);

    let fast_height = fast_claim.await.unwrap().unwrap();
    let slow_height = slow_claim.await.unwrap().unwrap();
    assert_eq!((fast_height, slow_height), (1, 2));

    let times: Vec<i64> = registry.snapshot().iter().map(|b| b.time).collect();
    assert!(
        times.windows(2).all(|w| w[0] <= w[1]),
        "block times out of order: {times:?}"
    );
}
