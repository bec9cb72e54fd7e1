//! # DID Ledger
//!
//! A registry for DID Documents whose state lives in a ledger's key-value
//! store. The registry accepts signed requests to create, update and
//! deactivate documents and only applies them when:
//!
//! * identifiers follow the `did:<method>[:<namespace>]:<unique-id>` grammar
//!   and the namespace is allowed;
//! * the document is structurally valid;
//! * every controller affected by the change has signed the canonical bytes of
//!   the request with one of its authentication keys;
//! * updates and deactivations present the current version id.
//!
//! Signatures may be Ed25519 (`Ed25519VerificationKey2020`) or any of
//! Ed25519, P-256, secp256k1 and RSA keys expressed as a `JsonWebKey2020`.
//!
//! # Example
//!
//! ```rust,ignore
//! use vercre_didledger::{Config, MemoryStore, Registry};
//!
//! let mut registry = Registry::new(MemoryStore::default(), Config::default())?;
//! let id = registry.create_document(&ctx, msg)?;
//! let state = registry.get_document(&id)?;
//! ```

pub mod config;
pub mod core;
pub mod diff;
pub mod did;
pub mod document;
mod error;
pub mod jwk;
pub mod key;
pub mod message;
pub mod provider;
mod registry;
pub mod resolve;
pub mod signer;
pub mod state;
pub mod store;
pub mod url;
pub mod verify;

#[doc(hidden)]
pub use tracing;

pub use crate::config::Config;
pub use crate::document::{Document, DocumentBuilder, MethodType, Service, VerificationMethod};
pub use crate::error::Error;
pub use crate::message::{
    Msg, MsgCreateDid, MsgCreateDidPayload, MsgDeactivateDid, MsgDeactivateDidPayload,
    MsgUpdateDid, MsgUpdateDidPayload, SignInfo, SignedPayload,
};
pub use crate::provider::{Canonicalizer, JsonCanonicalizer, Store};
pub use crate::registry::Registry;
pub use crate::state::{Metadata, StateValue, TxContext};
pub use crate::store::{MemoryStore, PageRequest, PageResponse};

/// Result type for registry operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
