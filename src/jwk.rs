//! # JSON Web Key
//!
//! Public key material carried by `JsonWebKey2020` verification methods.

use serde::{Deserialize, Serialize};

/// A public key in JWK format ([RFC7517]).
///
/// Only the members needed to reconstruct an Ed25519, ECDSA (P-256 or
/// secp256k1), or RSA public key are modelled.
///
/// [RFC7517]: https://www.rfc-editor.org/rfc/rfc7517
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PublicKeyJwk {
    /// Key type: `OKP`, `EC` or `RSA`.
    pub kty: String,

    /// Curve for `OKP` and `EC` keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,

    /// Base64url x coordinate (`EC`) or public key (`OKP`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,

    /// Base64url y coordinate (`EC`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,

    /// Base64url RSA modulus.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,

    /// Base64url RSA public exponent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,

    /// Intended algorithm.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,

    /// Key id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

impl PublicKeyJwk {
    /// An Ed25519 `OKP` key from base64url-encoded bytes.
    #[must_use]
    pub fn ed25519(x: impl Into<String>) -> Self {
        Self {
            kty: "OKP".into(),
            crv: Some("Ed25519".into()),
            x: Some(x.into()),
            ..Self::default()
        }
    }

    /// An `EC` key on `crv` from base64url-encoded coordinates.
    #[must_use]
    pub fn ec(crv: impl Into<String>, x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            kty: "EC".into(),
            crv: Some(crv.into()),
            x: Some(x.into()),
            y: Some(y.into()),
            ..Self::default()
        }
    }

    /// An `RSA` key from base64url-encoded modulus and exponent.
    #[must_use]
    pub fn rsa(n: impl Into<String>, e: impl Into<String>) -> Self {
        Self {
            kty: "RSA".into(),
            n: Some(n.into()),
            e: Some(e.into()),
            ..Self::default()
        }
    }
}
