//! # Verification Methods
//!
//! Verification methods declare the public keys that may sign for a DID.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::did::validate_did;
use crate::error::Error;
use crate::jwk::PublicKeyJwk;
use crate::key::PublicKey;
use crate::url::{DidUrl, Part};

/// A DID document can express verification methods, such as cryptographic
/// public keys, which can be used to authenticate or authorize interactions
/// with the DID subject or associated parties.
///
/// Exactly one of `public_key_multibase` or `public_key_jwk` is set, matching
/// the declared [`MethodType`].
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationMethod {
    /// A DID URL, with fragment, that identifies the verification method.
    pub id: String,

    /// The type of verification method.
    #[serde(rename = "type")]
    pub type_: MethodType,

    /// The DID of the controller of the verification method.
    pub controller: String,

    /// Multibase-encoded public key, for `Ed25519VerificationKey2020`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key_multibase: Option<String>,

    /// JWK-encoded public key, for `JsonWebKey2020`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key_jwk: Option<PublicKeyJwk>,
}

impl VerificationMethod {
    /// An `Ed25519VerificationKey2020` method.
    #[must_use]
    pub fn ed25519_2020(
        id: impl Into<String>, controller: impl Into<String>, multibase: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            type_: MethodType::Ed25519VerificationKey2020,
            controller: controller.into(),
            public_key_multibase: Some(multibase.into()),
            public_key_jwk: None,
        }
    }

    /// A `JsonWebKey2020` method.
    #[must_use]
    pub fn json_web_key_2020(
        id: impl Into<String>, controller: impl Into<String>, jwk: PublicKeyJwk,
    ) -> Self {
        Self {
            id: id.into(),
            type_: MethodType::JsonWebKey2020,
            controller: controller.into(),
            public_key_multibase: None,
            public_key_jwk: Some(jwk),
        }
    }

    /// Validate the method as a member of the document `base_did`.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is not a fragment DID URL under `base_did`,
    /// the controller is not a valid DID, or the key material does not match
    /// the method type.
    pub fn validate(
        &self, base_did: &str, method: &str, namespaces: &[String],
    ) -> crate::Result<()> {
        let url = DidUrl::from_str(&self.id)?;
        url.validate(method, namespaces, Part::Empty, Part::Empty, Part::Required)?;
        if url.did != base_did {
            return Err(Error::StructuralValidation(format!(
                "verificationMethod {}: id must have prefix {base_did}",
                self.id
            )));
        }

        validate_did(&self.controller, method, namespaces)?;

        self.public_key().map_err(|e| {
            Error::StructuralValidation(format!("verificationMethod {}: {e}", self.id))
        })?;

        Ok(())
    }

    /// The fragment identifying this method within its document.
    #[must_use]
    pub fn fragment(&self) -> &str {
        self.id.split_once('#').map_or("", |(_, fragment)| fragment)
    }

    /// Decode the key material for the declared type.
    ///
    /// # Errors
    ///
    /// Returns an error if the material for the declared type is missing, if
    /// the material for another type is also present, or if the key cannot be
    /// decoded.
    pub fn public_key(&self) -> crate::Result<PublicKey> {
        match (self.type_, &self.public_key_multibase, &self.public_key_jwk) {
            (MethodType::Ed25519VerificationKey2020, Some(multibase), None) => {
                if multibase.is_empty() {
                    return Err(Error::InvalidPublicKey("publicKeyMultibase is empty".into()));
                }
                PublicKey::from_multibase(multibase)
            }
            (MethodType::JsonWebKey2020, None, Some(jwk)) => PublicKey::from_jwk(jwk),
            (MethodType::Ed25519VerificationKey2020, _, _) => Err(Error::InvalidPublicKey(
                "only publicKeyMultibase must be set for Ed25519VerificationKey2020".into(),
            )),
            (MethodType::JsonWebKey2020, _, _) => Err(Error::InvalidPublicKey(
                "only publicKeyJwk must be set for JsonWebKey2020".into(),
            )),
        }
    }
}

/// Verification method types supported by the registry.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum MethodType {
    /// `Ed25519` verification key, version 2020, carried as multibase.
    #[default]
    Ed25519VerificationKey2020,

    /// JSON Web Key, version 2020.
    JsonWebKey2020,
}

impl Display for MethodType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ed25519VerificationKey2020 => write!(f, "Ed25519VerificationKey2020"),
            Self::JsonWebKey2020 => write!(f, "JsonWebKey2020"),
        }
    }
}
