//! End-to-end registry scenarios: challenge, sign, submit, query.

use serde_json::json;
use star_ledger::core::{BlockBody, Chain, GENESIS_MARKER};
use star_ledger::{RegistryConfig, RegistryError, StarRecord, StarRegistry};
use star_ledger_testkit::fixtures::{
    multi_party_fixtures, test_registry, test_registry_with, TestFixture, FIXTURE_EPOCH,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn test_submit_star_scenario() {
    init_tracing();
    let (registry, clock) = test_registry();
    let alice = TestFixture::with_seed([0x01; 32]);
    let genesis = registry.block_by_height(0).unwrap().unwrap();

    let message = registry.request_challenge(&alice.address());
    assert_eq!(
        message,
        format!("{}:{}:starRegistry", alice.address(), FIXTURE_EPOCH)
    );

    clock.advance(30);
    let signature = alice.sign(&message);
    let block = registry
        .submit_star(&alice.address(), &message, &signature, json!({"dec": 10, "ra": 20}))
        .unwrap();

    assert_eq!(block.height, 1);
    assert_eq!(block.previous_block_hash, Some(genesis.hash));
    assert_eq!(
        block.body,
        BlockBody::Star(StarRecord::new(alice.address(), json!({"dec": 10, "ra": 20})))
    );
}

#[test]
fn test_genesis_block() {
    let (registry, _) = test_registry();
    let genesis = registry.block_by_height(0).unwrap().unwrap();

    assert_eq!(registry.chain_height(), 0);
    assert_eq!(genesis.previous_block_hash, None);
    assert_eq!(genesis.time, FIXTURE_EPOCH);
    assert_eq!(genesis.body, BlockBody::Genesis(GENESIS_MARKER.to_string()));
}

#[test]
fn test_lookup_by_hash_returns_submitted_payload() {
    let (registry, _) = test_registry();
    let alice = TestFixture::new();

    let block = alice.claim(&registry, json!({"dec": -5, "ra": 300})).unwrap();
    let found = registry.block_by_hash(&block.hash).unwrap().unwrap();

    assert_eq!(found, block);
    assert_eq!(found.body.as_star().unwrap().star, json!({"dec": -5, "ra": 300}));
}

#[test]
fn test_stars_by_owner_in_submission_order() {
    let (registry, clock) = test_registry();
    let parties = multi_party_fixtures(2);
    let (alice, bob) = (&parties[0], &parties[1]);

    alice.claim(&registry, json!({"dec": 1, "ra": 1})).unwrap();
    clock.advance(1);
    bob.claim(&registry, json!({"dec": 2, "ra": 2})).unwrap();
    clock.advance(1);
    alice.claim(&registry, json!({"dec": 3, "ra": 3})).unwrap();

    let stars = registry.stars_by_owner(&alice.address());
    assert_eq!(
        stars,
        vec![
            StarRecord::new(alice.address(), json!({"dec": 1, "ra": 1})),
            StarRecord::new(alice.address(), json!({"dec": 3, "ra": 3})),
        ]
    );
    assert_eq!(registry.stars_by_owner(&bob.address()).len(), 1);
    assert!(registry.stars_by_owner("nobody").is_empty());
}

#[test]
fn test_heights_and_links_over_many_submissions() {
    let (registry, clock) = test_registry();
    let alice = TestFixture::new();

    for i in 0..10 {
        clock.advance(1);
        alice.claim(&registry, json!({"n": i})).unwrap();
    }

    let blocks = registry.snapshot();
    assert_eq!(registry.chain_height(), 10);
    for i in 1..blocks.len() {
        assert_eq!(blocks[i].height, i as u64);
        assert_eq!(blocks[i].previous_block_hash, Some(blocks[i - 1].hash));
        assert!(blocks[i].time >= blocks[i - 1].time);
    }
    assert!(registry.validate_chain().is_empty());
}

#[test]
fn test_expiry_boundary_through_registry() {
    let (registry, clock) = test_registry();
    let alice = TestFixture::new();

    let message = registry.request_challenge(&alice.address());
    let signature = alice.sign(&message);

    clock.set(FIXTURE_EPOCH + 301);
    let err = registry
        .submit_star(&alice.address(), &message, &signature, json!({}))
        .unwrap_err();
    assert!(matches!(err, RegistryError::Expired { .. }));

    clock.set(FIXTURE_EPOCH + 300);
    assert!(registry
        .submit_star(&alice.address(), &message, &signature, json!({}))
        .is_ok());
}

#[test]
fn test_rejections_do_not_mutate() {
    let (registry, _) = test_registry();
    let parties = multi_party_fixtures(2);
    let (alice, mallory) = (&parties[0], &parties[1]);

    let message = registry.request_challenge(&alice.address());

    // Signed by the wrong key.
    let forged = mallory.sign(&message);
    let err = registry
        .submit_star(&alice.address(), &message, &forged, json!({}))
        .unwrap_err();
    assert!(matches!(err, RegistryError::InvalidSignature));

    // Alice's challenge replayed by someone else.
    let err = registry
        .submit_star(&mallory.address(), &message, &forged, json!({}))
        .unwrap_err();
    assert!(matches!(err, RegistryError::MalformedChallenge(_)));

    // Not a challenge at all.
    let err = registry
        .submit_star(&alice.address(), "hello", &alice.sign("hello"), json!({}))
        .unwrap_err();
    assert!(matches!(err, RegistryError::MalformedChallenge(_)));

    assert_eq!(registry.chain_height(), 0);
    assert!(registry.validate_chain().is_empty());
}

#[test]
fn test_custom_config() {
    let config = RegistryConfig {
        challenge_window_secs: 10,
        purpose_tag: "constellation".into(),
    };
    let (registry, clock) = test_registry_with(config).unwrap();
    let alice = TestFixture::new();

    let message = registry.request_challenge(&alice.address());
    assert!(message.ends_with(":constellation"));

    clock.advance(11);
    let err = registry
        .submit_star(&alice.address(), &message, &alice.sign(&message), json!({}))
        .unwrap_err();
    assert!(matches!(err, RegistryError::Expired { window_secs: 10, .. }));
}

#[test]
fn test_corruption_blocks_writes_but_not_reads() {
    init_tracing();
    let (registry, clock) = test_registry();
    let alice = TestFixture::new();
    alice.claim(&registry, json!({"n": 1})).unwrap();
    alice.claim(&registry, json!({"n": 2})).unwrap();

    let mut blocks = registry.snapshot();
    blocks[2].payload = serde_json::to_vec(&StarRecord::new("mallory", json!({"n": 2})))
        .unwrap()
        .into();

    let damaged = StarRegistry::with_chain(
        star_ledger::Ed25519Verifier,
        clock,
        RegistryConfig::default(),
        Chain::from_blocks(blocks),
    )
    .unwrap();

    let faults = damaged.validate_chain();
    assert_eq!(faults.len(), 1);
    assert_eq!(faults[0].height(), 2);
    assert!(faults[0].to_string().starts_with("block #2"));

    let err = alice.claim(&damaged, json!({"n": 3})).unwrap_err();
    assert!(matches!(err, RegistryError::ChainCorrupt(_)));
    assert!(!err.is_proof_error());
    assert_eq!(damaged.chain_height(), 2);

    // Forensics: the tampered block is still readable.
    let tampered = damaged.block_by_height(2).unwrap().unwrap();
    assert_eq!(tampered.body.as_star().unwrap().owner, "mallory");
}

#[test]
fn test_colon_in_purpose_tag_is_refused_up_front() {
    let config = RegistryConfig {
        purpose_tag: "star:registry".into(),
        ..RegistryConfig::default()
    };

    let err = test_registry_with(config).err().unwrap();
    assert!(matches!(err, RegistryError::InvalidConfig(_)));
}

#[test]
fn test_default_registry_handshake() {
    let registry = StarRegistry::with_defaults();
    let alice = TestFixture::new();

    let message = registry.request_challenge(&alice.address());
    let block = registry
        .submit_star(&alice.address(), &message, &alice.sign(&message), json!({"dec": 0}))
        .unwrap();

    assert_eq!(block.height, 1);
}

mod properties {
    use proptest::prelude::*;
    use star_ledger_testkit::fixtures::{test_registry, TestFixture};
    use star_ledger_testkit::generators::star;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_submitted_star_is_found_by_hash(stars in prop::collection::vec(star(), 1..6)) {
            let (registry, _) = test_registry();
            let alice = TestFixture::with_seed([0x07; 32]);

            for s in &stars {
                let block = alice.claim(&registry, s.clone()).unwrap();
                let found = registry.block_by_hash(&block.hash).unwrap().unwrap();
                prop_assert_eq!(&found.body.as_star().unwrap().star, s);
            }

            let owned: Vec<_> = registry
                .stars_by_owner(&alice.address())
                .into_iter()
                .map(|r| r.star)
                .collect();
            prop_assert_eq!(owned, stars);
        }
    }
}
