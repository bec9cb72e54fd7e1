//! # Messages
//!
//! Command payloads and the signatures that authorize them.
//!
//! Every payload is normalized before its canonical bytes are derived, so a
//! client signing [`SignedPayload::sign_bytes`] and the registry re-deriving
//! them always agree.

use std::collections::HashSet;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::did::normalize_did;
use crate::document::Document;
use crate::error::Error;
use crate::provider::Canonicalizer;
use crate::url::{normalize_did_url, DidUrl, Part};

/// A signature over a payload's canonical bytes, attributed to a verification
/// method.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct SignInfo {
    /// DID URL of the verification method that produced the signature.
    pub verification_method_id: String,

    /// Raw signature bytes, base64 encoded on the wire.
    #[serde(with = "base64")]
    pub signature: Vec<u8>,
}

impl SignInfo {
    /// Create a new `SignInfo`.
    #[must_use]
    pub fn new(verification_method_id: impl Into<String>, signature: Vec<u8>) -> Self {
        Self {
            verification_method_id: verification_method_id.into(),
            signature,
        }
    }

    /// The DID the signing verification method belongs to.
    #[must_use]
    pub fn did(&self) -> Option<String> {
        DidUrl::from_str(&self.verification_method_id).ok().map(|url| url.did)
    }

    #[must_use]
    fn normalize(mut self) -> Self {
        self.verification_method_id = normalize_did_url(&self.verification_method_id);
        self
    }
}

/// Check a request's signatures: each must reference a verification method by
/// fragment DID URL, and no two may be identical.
///
/// # Errors
///
/// Returns an error if a verification method id is malformed or a signature
/// is repeated.
pub fn validate_signatures(
    signatures: &[SignInfo], method: &str, namespaces: &[String],
) -> crate::Result<()> {
    let mut seen = HashSet::new();
    for sign_info in signatures {
        DidUrl::from_str(&sign_info.verification_method_id)?.validate(
            method,
            namespaces,
            Part::Empty,
            Part::Empty,
            Part::Required,
        )?;
        if sign_info.signature.is_empty() {
            return Err(Error::StructuralValidation(format!(
                "signature by {} is empty",
                sign_info.verification_method_id
            )));
        }
        if !seen.insert(sign_info) {
            return Err(Error::StructuralValidation(format!(
                "signature by {} is repeated",
                sign_info.verification_method_id
            )));
        }
    }
    Ok(())
}

/// Normalize a request's signatures.
#[must_use]
pub fn normalize_signatures(signatures: Vec<SignInfo>) -> Vec<SignInfo> {
    signatures.into_iter().map(SignInfo::normalize).collect()
}

/// A payload that is signed by its authorizers.
pub trait SignedPayload: Serialize + DeserializeOwned + Clone {
    /// Lower-case UUID unique ids wherever a DID appears in the payload.
    #[must_use]
    fn normalize(self) -> Self;

    /// The DID the payload operates on.
    fn id(&self) -> &str;

    /// The bytes signers sign: the canonical serialization of the normalized
    /// payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized.
    fn sign_bytes<C: Canonicalizer + ?Sized>(&self, canonicalizer: &C) -> crate::Result<Vec<u8>> {
        let value = serde_json::to_value(self.clone().normalize())?;
        canonicalizer.canonicalize(&value).map_err(|e| {
            Error::StructuralValidation(format!("payload cannot be canonicalized: {e}"))
        })
    }
}

/// Payload for creating a DID document.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MsgCreateDidPayload {
    /// The document to create.
    #[serde(flatten)]
    pub document: Document,
}

impl MsgCreateDidPayload {
    /// The document described by the payload.
    #[must_use]
    pub fn to_document(&self) -> Document {
        self.document.clone()
    }
}

impl From<Document> for MsgCreateDidPayload {
    fn from(document: Document) -> Self {
        Self { document }
    }
}

impl SignedPayload for MsgCreateDidPayload {
    fn normalize(self) -> Self {
        Self {
            document: self.document.normalize(),
        }
    }

    fn id(&self) -> &str {
        &self.document.id
    }
}

/// Payload for replacing a DID document with a new revision.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MsgUpdateDidPayload {
    /// The new revision of the document.
    #[serde(flatten)]
    pub document: Document,

    /// The version id of the revision being replaced.
    pub version_id: String,
}

impl MsgUpdateDidPayload {
    /// Create an update of `document` from revision `version_id`.
    #[must_use]
    pub fn new(document: Document, version_id: impl Into<String>) -> Self {
        Self {
            document,
            version_id: version_id.into(),
        }
    }

    /// The document described by the payload.
    #[must_use]
    pub fn to_document(&self) -> Document {
        self.document.clone()
    }
}

impl SignedPayload for MsgUpdateDidPayload {
    fn normalize(self) -> Self {
        Self {
            document: self.document.normalize(),
            version_id: self.version_id,
        }
    }

    fn id(&self) -> &str {
        &self.document.id
    }
}

/// Payload for deactivating a DID document.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MsgDeactivateDidPayload {
    /// The DID to deactivate.
    pub id: String,

    /// The version id of the current revision.
    pub version_id: String,
}

impl MsgDeactivateDidPayload {
    /// Create a deactivation of `id` at revision `version_id`.
    #[must_use]
    pub fn new(id: impl Into<String>, version_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version_id: version_id.into(),
        }
    }
}

impl SignedPayload for MsgDeactivateDidPayload {
    fn normalize(self) -> Self {
        Self {
            id: normalize_did(&self.id),
            version_id: self.version_id,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }
}

/// A signed request.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Msg<P> {
    /// The operation payload.
    pub payload: P,

    /// Signatures over the payload's canonical bytes.
    pub signatures: Vec<SignInfo>,
}

impl<P: SignedPayload> Msg<P> {
    /// Create a new signed request.
    #[must_use]
    pub const fn new(payload: P, signatures: Vec<SignInfo>) -> Self {
        Self { payload, signatures }
    }
}

/// Create request.
pub type MsgCreateDid = Msg<MsgCreateDidPayload>;

/// Update request.
pub type MsgUpdateDid = Msg<MsgUpdateDidPayload>;

/// Deactivate request.
pub type MsgDeactivateDid = Msg<MsgDeactivateDidPayload>;

mod base64 {
    use base64ct::{Base64, Encoding};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&Base64::encode_string(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Base64::decode_vec(&encoded).map_err(D::Error::custom)
    }
}
