//! Tests for updating DID documents.

use test_utils::{generate_did, registry, self_controlled, signed, tx, Key};
use vercre_didledger::{
    DocumentBuilder, Error, MemoryStore, MsgCreateDidPayload, MsgDeactivateDidPayload,
    MsgUpdateDidPayload, Registry, Service,
};

fn create(registry: &mut Registry<MemoryStore>) -> (String, Key) {
    create_at(registry, 1)
}

// Adding a service leaves the keys untouched, so one signature satisfies the
// document at both revisions.
#[test]
fn update_service() {
    let mut registry = registry();
    let (alice, key) = create(&mut registry);
    let current = registry.get_document(&alice).expect("should resolve");

    let doc = DocumentBuilder::from_document(current.document().clone())
        .service(Service::new(
            format!("{alice}#whois"),
            "LinkedVerifiablePresentation",
            "https://example.com/.well-known/whois",
        ))
        .build();
    let payload = MsgUpdateDidPayload::new(doc.clone(), &current.metadata.version_id);
    registry.update_document(&tx(2), signed(payload, &[&key])).expect("should update");

    let state = registry.get_document(&alice).expect("should resolve");
    assert_eq!(state.document(), &doc);
    assert_eq!(state.metadata.version_id, tx(2).tx_hash);
    assert_eq!(state.metadata.created, tx(1).block_time);
    assert_eq!(state.metadata.updated, Some(tx(2).block_time));
    assert_eq!(state.metadata.previous_version_id, Some(tx(1).tx_hash));
}

// Rotating a key needs signatures from the old and the new key. With only the
// new key the old revision is unsatisfied.
#[test]
fn update_rotate_key() {
    let mut registry = registry();
    let (alice, old_key) = create(&mut registry);
    let current = registry.get_document(&alice).expect("should resolve");

    let new_key = Key::ed25519(format!("{alice}#key-1"));
    let doc = self_controlled(&alice, &[&new_key]);
    let payload = MsgUpdateDidPayload::new(doc, &current.metadata.version_id);

    let err = registry
        .update_document(&tx(2), signed(payload.clone(), &[&new_key]))
        .expect_err("should fail");
    assert!(matches!(err, Error::InvalidSignature(_)));
    assert!(err.to_string().contains(&format!("{alice} (old version)")));

    let err = registry
        .update_document(&tx(2), signed(payload.clone(), &[&old_key]))
        .expect_err("should fail");
    assert!(matches!(err, Error::InvalidSignature(_)));
    assert!(err.to_string().contains(&format!("{alice} (new version)")));

    registry
        .update_document(&tx(2), signed(payload, &[&old_key, &new_key]))
        .expect("should update");

    let state = registry.get_document(&alice).expect("should resolve");
    assert_eq!(state.document().verification_method[0], new_key.verification_method(&alice));
}

// Adding a controller requires the new controller's signature.
#[test]
fn update_add_controller() {
    let mut registry = registry();
    let (alice, alice_key) = create(&mut registry);
    let (bob, bob_key) = create_at(&mut registry, 2);
    let current = registry.get_document(&bob).expect("should resolve");

    let doc =
        DocumentBuilder::from_document(current.document().clone()).controller(&alice).build();
    let payload = MsgUpdateDidPayload::new(doc, &current.metadata.version_id);

    let err = registry
        .update_document(&tx(3), signed(payload.clone(), &[&bob_key]))
        .expect_err("should fail");
    assert!(matches!(err, Error::SignatureMissing(_)));
    assert!(err.to_string().contains(&alice));

    registry
        .update_document(&tx(3), signed(payload, &[&bob_key, &alice_key]))
        .expect("should update");
}

// A version id that is not the latest is rejected, even if it was valid
// before.
#[test]
fn update_stale_version() {
    let mut registry = registry();
    let (alice, key) = create(&mut registry);
    let first = registry.get_document(&alice).expect("should resolve");

    let doc = DocumentBuilder::from_document(first.document().clone())
        .also_known_as("https://example.com/alice")
        .build();
    let payload = MsgUpdateDidPayload::new(doc, &first.metadata.version_id);
    registry.update_document(&tx(2), signed(payload, &[&key])).expect("should update");

    let doc = DocumentBuilder::from_document(first.document().clone())
        .also_known_as("https://example.com/alice-2")
        .build();
    let payload = MsgUpdateDidPayload::new(doc, &first.metadata.version_id);
    let err = registry.update_document(&tx(3), signed(payload, &[&key])).expect_err("should fail");
    assert!(matches!(err, Error::VersionConflict(_)));
    assert!(err.to_string().contains(&format!("must be: {}", tx(2).tx_hash)));
    assert!(err.is_retryable());

    let state = registry.get_document(&alice).expect("should resolve");
    assert_eq!(state.metadata.version_id, tx(2).tx_hash);
}

// Only stored, active documents can be updated.
#[test]
fn update_missing_or_deactivated() {
    let mut registry = registry();

    let did = generate_did("testnet");
    let key = Key::ed25519(format!("{did}#key-1"));
    let payload = MsgUpdateDidPayload::new(self_controlled(&did, &[&key]), tx(1).tx_hash);
    let err = registry.update_document(&tx(1), signed(payload, &[&key])).expect_err("should fail");
    assert!(matches!(err, Error::NotFound(_)));

    let (alice, key) = create(&mut registry);
    let payload = MsgDeactivateDidPayload::new(&alice, tx(1).tx_hash);
    registry.deactivate_document(&tx(2), signed(payload, &[&key])).expect("should deactivate");

    let payload = MsgUpdateDidPayload::new(self_controlled(&alice, &[&key]), tx(2).tx_hash);
    let err = registry.update_document(&tx(3), signed(payload, &[&key])).expect_err("should fail");
    assert!(matches!(err, Error::AlreadyDeactivated(_)));
}

// An update that fails validation is rejected before signatures are checked.
#[test]
fn update_invalid_document() {
    let mut registry = registry();
    let (alice, key) = create(&mut registry);
    let current = registry.get_document(&alice).expect("should resolve");

    let mut doc = current.document().clone();
    doc.authentication.push(format!("{alice}#missing"));
    let payload = MsgUpdateDidPayload::new(doc, &current.metadata.version_id);
    let err = registry.update_document(&tx(2), signed(payload, &[&key])).expect_err("should fail");
    assert!(matches!(err, Error::StructuralValidation(_)));
}

// Create a self-controlled document for a fresh DID, returning the DID and key.
fn create_at(registry: &mut Registry<MemoryStore>, n: u8) -> (String, Key) {
    let did = generate_did("testnet");
    let key = Key::ed25519(format!("{did}#key-1"));
    let payload = MsgCreateDidPayload::from(self_controlled(&did, &[&key]));
    registry.create_document(&tx(n), signed(payload, &[&key])).expect("should create");
    (did, key)
}
