//! Tests for deactivating DID documents.

use test_utils::{generate_did, registry, self_controlled, signed, tx, Key};
use vercre_didledger::{
    DocumentBuilder, Error, MemoryStore, MsgCreateDidPayload, MsgDeactivateDidPayload, Registry,
};

fn create(registry: &mut Registry<MemoryStore>, n: u8) -> (String, Key) {
    let did = generate_did("testnet");
    let key = Key::ed25519(format!("{did}#key-1"));
    let payload = MsgCreateDidPayload::from(self_controlled(&did, &[&key]));
    registry.create_document(&tx(n), signed(payload, &[&key])).expect("should create");
    (did, key)
}

// Deactivation is terminal: the document is kept unchanged, marked
// deactivated, and can be neither deactivated nor created again.
#[test]
fn deactivate_document() {
    let mut registry = registry();
    let alice = generate_did("testnet");
    let key = Key::ed25519(format!("{alice}#key-1"));
    let create_payload = MsgCreateDidPayload::from(self_controlled(&alice, &[&key]));
    registry
        .create_document(&tx(1), signed(create_payload.clone(), &[&key]))
        .expect("should create");
    let before = registry.get_document(&alice).expect("should resolve");

    let payload = MsgDeactivateDidPayload::new(&alice, tx(1).tx_hash);
    registry.deactivate_document(&tx(2), signed(payload, &[&key])).expect("should deactivate");

    let state = registry.get_document(&alice).expect("should resolve");
    assert!(state.metadata.deactivated);
    assert_eq!(state.metadata.version_id, tx(2).tx_hash);
    assert_eq!(state.metadata.created, before.metadata.created);
    assert_eq!(state.metadata.updated, Some(tx(2).block_time));
    assert_eq!(state.document(), before.document());

    let payload = MsgDeactivateDidPayload::new(&alice, tx(2).tx_hash);
    let err = registry
        .deactivate_document(&tx(3), signed(payload, &[&key]))
        .expect_err("should fail");
    assert!(matches!(err, Error::AlreadyDeactivated(_)));

    let err = registry
        .create_document(&tx(3), signed(create_payload, &[&key]))
        .expect_err("should fail");
    assert!(matches!(err, Error::AlreadyExists(_)));
    assert_eq!(registry.document_count().expect("should count"), 1);
}

// The current version id must be presented.
#[test]
fn deactivate_stale_version() {
    let mut registry = registry();
    let (alice, key) = create(&mut registry, 1);

    let payload = MsgDeactivateDidPayload::new(&alice, "0000");
    let err = registry
        .deactivate_document(&tx(2), signed(payload, &[&key]))
        .expect_err("should fail");
    assert!(matches!(err, Error::VersionConflict(_)));
}

// Every controller of the current revision must sign.
#[test]
fn deactivate_requires_controllers() {
    let mut registry = registry();
    let (alice, alice_key) = create(&mut registry, 1);

    let bob = generate_did("testnet");
    let bob_key = Key::ed25519(format!("{bob}#key-1"));
    let doc = DocumentBuilder::new(&bob)
        .controller(&alice)
        .verification_method(bob_key.verification_method(&bob))
        .authentication(bob_key.vm_id())
        .build();
    let payload = MsgCreateDidPayload::from(doc);
    registry
        .create_document(&tx(2), signed(payload, &[&alice_key, &bob_key]))
        .expect("should create");

    let payload = MsgDeactivateDidPayload::new(&bob, tx(2).tx_hash);
    let err = registry
        .deactivate_document(&tx(3), signed(payload.clone(), &[&bob_key]))
        .expect_err("should fail");
    assert!(matches!(err, Error::SignatureMissing(_)));
    assert!(err.to_string().contains(&alice));

    registry
        .deactivate_document(&tx(3), signed(payload, &[&alice_key, &bob_key]))
        .expect("should deactivate");
}

// A deactivated document can no longer be named as a controller.
#[test]
fn deactivated_controller() {
    let mut registry = registry();
    let (alice, alice_key) = create(&mut registry, 1);
    let payload = MsgDeactivateDidPayload::new(&alice, tx(1).tx_hash);
    registry
        .deactivate_document(&tx(2), signed(payload, &[&alice_key]))
        .expect("should deactivate");

    let bob = generate_did("testnet");
    let bob_key = Key::ed25519(format!("{bob}#key-1"));
    let doc = DocumentBuilder::new(&bob)
        .controller(&alice)
        .verification_method(bob_key.verification_method(&bob))
        .authentication(bob_key.vm_id())
        .build();
    let payload = MsgCreateDidPayload::from(doc);
    let err = registry
        .create_document(&tx(3), signed(payload, &[&alice_key, &bob_key]))
        .expect_err("should fail");
    assert!(matches!(err, Error::ControllerNotFound(_)));
}

// Unknown documents cannot be deactivated.
#[test]
fn deactivate_missing() {
    let mut registry = registry();
    let did = generate_did("testnet");
    let key = Key::ed25519(format!("{did}#key-1"));

    let payload = MsgDeactivateDidPayload::new(&did, tx(1).tx_hash);
    let err = registry
        .deactivate_document(&tx(1), signed(payload, &[&key]))
        .expect_err("should fail");
    assert!(matches!(err, Error::NotFound(_)));
}
