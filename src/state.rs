//! # Document State
//!
//! The persisted unit for a DID is a [`StateValue`]: the document together
//! with its lifecycle [`Metadata`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::document::Document;

/// Lifecycle and version information for a DID document.
///
/// See <https://www.w3.org/TR/did-core/#did-document-metadata>
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Block time of the transaction that created the document.
    pub created: DateTime<Utc>,

    /// Block time of the most recent update or deactivation. Omitted if the
    /// document has never changed since creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,

    /// Once `true` the document can no longer change.
    #[serde(default)]
    pub deactivated: bool,

    /// Hash of the transaction that produced this revision. Updates must
    /// present the current value.
    pub version_id: String,

    /// Version id of the revision that superseded this one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_version_id: Option<String>,

    /// Version id of the revision this one superseded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_version_id: Option<String>,
}

impl Metadata {
    /// Metadata for a newly created document.
    #[must_use]
    pub fn new(ctx: &TxContext) -> Self {
        Self {
            created: ctx.block_time,
            version_id: ctx.tx_hash.clone(),
            ..Self::default()
        }
    }

    /// Metadata for the revision following this one: `created` is kept,
    /// `updated` and `version_id` come from `ctx`, and the revision is linked
    /// back to this one.
    #[must_use]
    pub fn next(&self, ctx: &TxContext) -> Self {
        Self {
            created: self.created,
            updated: Some(ctx.block_time),
            deactivated: self.deactivated,
            version_id: ctx.tx_hash.clone(),
            next_version_id: None,
            previous_version_id: Some(self.version_id.clone()),
        }
    }
}

/// Payload variants a [`StateValue`] can carry.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "typeUrl", content = "value")]
pub enum StateData {
    /// A DID document.
    #[serde(rename = "/did.Document")]
    DidDoc(Document),
}

/// A document and its metadata, as persisted under `did:<id>`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StateValue {
    /// The stored value.
    pub data: StateData,

    /// Lifecycle metadata for the value.
    pub metadata: Metadata,
}

impl StateValue {
    /// Wrap a document and its metadata.
    #[must_use]
    pub const fn new(document: Document, metadata: Metadata) -> Self {
        Self {
            data: StateData::DidDoc(document),
            metadata,
        }
    }

    /// The DID document carried by this value.
    #[must_use]
    pub const fn document(&self) -> &Document {
        match &self.data {
            StateData::DidDoc(doc) => doc,
        }
    }

    /// Consume the value, returning the document and metadata.
    #[must_use]
    pub fn into_parts(self) -> (Document, Metadata) {
        match self.data {
            StateData::DidDoc(doc) => (doc, self.metadata),
        }
    }
}

/// Details of the enclosing transaction, supplied by the host for metadata
/// stamping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxContext {
    /// Upper-case hex SHA-256 of the transaction bytes.
    pub tx_hash: String,

    /// Time of the block the transaction is included in.
    pub block_time: DateTime<Utc>,
}

impl TxContext {
    /// Build a context from raw transaction bytes.
    #[must_use]
    pub fn new(tx_bytes: &[u8], block_time: DateTime<Utc>) -> Self {
        Self {
            tx_hash: hex::encode_upper(Sha256::digest(tx_bytes)),
            block_time,
        }
    }
}
