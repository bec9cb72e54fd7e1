//! Test helpers for the DID ledger registry: ephemeral signing keys, DID
//! generation, and request signing.

mod keyring;

use chrono::{TimeZone, Utc};
use rand::Rng;
use vercre_didledger::{
    Config, Document, DocumentBuilder, MemoryStore, Msg, Registry, SignInfo, SignedPayload,
    TxContext,
};

pub use crate::keyring::{Key, KeyType};

const BASE58_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// A random DID with a 16 character base58 unique id.
#[must_use]
pub fn generate_did(namespace: &str) -> String {
    let mut rng = rand::thread_rng();
    let unique_id: String = (0..16)
        .map(|_| char::from(BASE58_ALPHABET[rng.gen_range(0..BASE58_ALPHABET.len())]))
        .collect();
    did(namespace, &unique_id)
}

/// A random DID with an upper-case UUID unique id.
#[must_use]
pub fn generate_uuid_did(namespace: &str) -> String {
    did(namespace, &uuid::Uuid::new_v4().to_string().to_uppercase())
}

fn did(namespace: &str, unique_id: &str) -> String {
    if namespace.is_empty() {
        format!("did:cheqd:{unique_id}")
    } else {
        format!("did:cheqd:{namespace}:{unique_id}")
    }
}

/// A registry over an empty in-memory store with the default configuration.
///
/// # Panics
///
/// Panics if the registry cannot be opened.
#[must_use]
pub fn registry() -> Registry<MemoryStore> {
    Registry::new(MemoryStore::default(), Config::default()).expect("should open registry")
}

/// A document controlled by itself, with each of `keys` as an authentication
/// method.
#[must_use]
pub fn self_controlled(did: &str, keys: &[&Key]) -> Document {
    let mut builder = DocumentBuilder::new(did).controller(did);
    for key in keys {
        builder =
            builder.verification_method(key.verification_method(did)).authentication(key.vm_id());
    }
    builder.build()
}

/// The context of the `n`th transaction in a test run.
#[must_use]
pub fn tx(n: u8) -> TxContext {
    let seconds = 1_700_000_000 + i64::from(n) * 6;
    let block_time = Utc.timestamp_opt(seconds, 0).single().unwrap_or_default();
    TxContext::new(&[b't', b'x', n], block_time)
}

/// Sign `payload` with each of `keys`.
///
/// # Panics
///
/// Panics if the payload cannot be serialized.
#[must_use]
pub fn sign<P: SignedPayload>(payload: &P, keys: &[&Key]) -> Vec<SignInfo> {
    let message = payload
        .sign_bytes(&vercre_didledger::JsonCanonicalizer)
        .expect("payload should serialize");
    keys.iter().map(|key| key.sign_info(&message)).collect()
}

/// A request carrying `payload` signed by each of `keys`.
#[must_use]
pub fn signed<P: SignedPayload>(payload: P, keys: &[&Key]) -> Msg<P> {
    let signatures = sign(&payload, keys);
    Msg::new(payload, signatures)
}
