//! # Public Keys
//!
//! The closed set of public key kinds a verification method can carry, and
//! signature verification for each.

use base64ct::{Base64UrlUnpadded, Encoding};
use ecdsa::signature::Verifier;
use multibase::Base;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPublicKey};
use sha2::Sha256;

use crate::error::Error;
use crate::jwk::PublicKeyJwk;

/// Multicodec prefix for an Ed25519 public key.
pub const ED25519_CODEC: [u8; 2] = [0xed, 0x01];

/// A decoded public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublicKey {
    /// Ed25519 (EdDSA) key.
    Ed25519(ed25519_dalek::VerifyingKey),

    /// ECDSA key on the NIST P-256 curve.
    P256(p256::ecdsa::VerifyingKey),

    /// ECDSA key on the secp256k1 curve.
    Secp256k1(k256::ecdsa::VerifyingKey),

    /// RSA key, used with RSASSA-PSS.
    Rsa(RsaPublicKey),
}

impl PublicKey {
    /// Decode a base58btc multibase Ed25519 key carrying the `0xed01`
    /// multicodec prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPublicKey`] if the string is not base58btc
    /// multibase, has the wrong prefix or length, or is not a valid point.
    pub fn from_multibase(value: &str) -> crate::Result<Self> {
        let (base, bytes) = multibase::decode(value)
            .map_err(|e| Error::InvalidPublicKey(format!("issue decoding multibase key: {e}")))?;
        if base != Base::Base58Btc {
            return Err(Error::InvalidPublicKey("multibase key must be base58btc".into()));
        }
        let Some(raw) = bytes.strip_prefix(&ED25519_CODEC) else {
            return Err(Error::InvalidPublicKey("multibase key is not an Ed25519 key".into()));
        };
        ed25519(raw).map(Self::Ed25519)
    }

    /// Reconstruct a key from its JWK representation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPublicKey`] if the key type or curve is not
    /// supported or a member is missing or malformed.
    pub fn from_jwk(jwk: &PublicKeyJwk) -> crate::Result<Self> {
        match (jwk.kty.as_str(), jwk.crv.as_deref()) {
            ("OKP", Some("Ed25519")) => ed25519(&member(jwk.x.as_ref(), "x")?).map(Self::Ed25519),
            ("EC", Some("P-256")) => {
                let sec1 = sec1_point(jwk)?;
                p256::ecdsa::VerifyingKey::from_sec1_bytes(&sec1)
                    .map(Self::P256)
                    .map_err(|e| Error::InvalidPublicKey(format!("invalid P-256 key: {e}")))
            }
            ("EC", Some("secp256k1")) => {
                let sec1 = sec1_point(jwk)?;
                k256::ecdsa::VerifyingKey::from_sec1_bytes(&sec1)
                    .map(Self::Secp256k1)
                    .map_err(|e| Error::InvalidPublicKey(format!("invalid secp256k1 key: {e}")))
            }
            ("RSA", _) => {
                let n = BigUint::from_bytes_be(&member(jwk.n.as_ref(), "n")?);
                let e = BigUint::from_bytes_be(&member(jwk.e.as_ref(), "e")?);
                RsaPublicKey::new(n, e)
                    .map(Self::Rsa)
                    .map_err(|e| Error::InvalidPublicKey(format!("invalid RSA key: {e}")))
            }
            (kty, crv) => Err(Error::InvalidPublicKey(format!(
                "unsupported JWK key type {kty} with curve {}",
                crv.unwrap_or("none")
            ))),
        }
    }

    /// Verify `signature` over `message`.
    ///
    /// ECDSA signatures are ASN.1 DER encoded over the SHA-256 digest of the
    /// message. RSA signatures use PSS padding with SHA-256.
    #[must_use]
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        match self {
            Self::Ed25519(key) => ed25519_dalek::Signature::from_slice(signature)
                .is_ok_and(|sig| key.verify(message, &sig).is_ok()),
            Self::P256(key) => p256::ecdsa::Signature::from_der(signature)
                .is_ok_and(|sig| key.verify(message, &sig).is_ok()),
            Self::Secp256k1(key) => k256::ecdsa::Signature::from_der(signature)
                .is_ok_and(|sig| key.verify(message, &sig).is_ok()),
            Self::Rsa(key) => rsa_pss_verify(key, message, signature),
        }
    }
}

// PSS salt length is not carried with the signature. Accept the digest length
// and the maximum length for the key, which Go signers use by default.
fn rsa_pss_verify(key: &RsaPublicKey, message: &[u8], signature: &[u8]) -> bool {
    let Ok(sig) = rsa::pss::Signature::try_from(signature) else {
        return false;
    };
    let digest_len = <Sha256 as sha2::Digest>::output_size();
    let max_len = key.size().saturating_sub(digest_len + 2);
    [digest_len, max_len].into_iter().any(|salt_len| {
        let verifier = rsa::pss::VerifyingKey::<Sha256>::new_with_salt_len(key.clone(), salt_len);
        verifier.verify(message, &sig).is_ok()
    })
}

fn ed25519(raw: &[u8]) -> crate::Result<ed25519_dalek::VerifyingKey> {
    let bytes: [u8; 32] = raw.try_into().map_err(|_| {
        Error::InvalidPublicKey(format!("Ed25519 key must be 32 bytes, got {}", raw.len()))
    })?;
    ed25519_dalek::VerifyingKey::from_bytes(&bytes)
        .map_err(|e| Error::InvalidPublicKey(format!("invalid Ed25519 key: {e}")))
}

fn member(value: Option<&String>, name: &str) -> crate::Result<Vec<u8>> {
    let Some(value) = value else {
        return Err(Error::InvalidPublicKey(format!("JWK is missing '{name}'")));
    };
    Base64UrlUnpadded::decode_vec(value)
        .map_err(|e| Error::InvalidPublicKey(format!("issue decoding JWK '{name}': {e}")))
}

// uncompressed SEC1 encoding: 0x04 || x || y
fn sec1_point(jwk: &PublicKeyJwk) -> crate::Result<Vec<u8>> {
    let mut point = vec![0x04];
    point.extend(member(jwk.x.as_ref(), "x")?);
    point.extend(member(jwk.y.as_ref(), "y")?);
    Ok(point)
}

#[cfg(test)]
mod tests {
    use ed25519_dalek::Signer as _;
    use rand::rngs::OsRng;
    use rsa::signature::{RandomizedSigner, SignatureEncoding};

    use super::*;

    const MESSAGE: &[u8] = b"canonical payload bytes";

    #[test]
    fn ed25519_multibase() {
        let signing_key = ed25519_dalek::SigningKey::generate(&mut OsRng);
        let mut bytes = ED25519_CODEC.to_vec();
        bytes.extend(signing_key.verifying_key().as_bytes());
        let multibase = multibase::encode(Base::Base58Btc, bytes);

        let key = PublicKey::from_multibase(&multibase).expect("should decode");
        let signature = signing_key.sign(MESSAGE).to_bytes();
        assert!(key.verify(MESSAGE, &signature));
        assert!(!key.verify(b"other message", &signature));
        assert!(!key.verify(MESSAGE, &signature[..10]));
    }

    #[test]
    fn multibase_wrong_codec() {
        let multibase = multibase::encode(Base::Base58Btc, [0xe7, 0x01, 1, 2, 3]);
        let err = PublicKey::from_multibase(&multibase).expect_err("should fail");
        assert!(matches!(err, Error::InvalidPublicKey(_)));

        let multibase = multibase::encode(Base::Base64, [0xed, 0x01, 1, 2, 3]);
        let err = PublicKey::from_multibase(&multibase).expect_err("should fail");
        assert!(matches!(err, Error::InvalidPublicKey(_)));
    }

    #[test]
    fn ed25519_jwk() {
        let signing_key = ed25519_dalek::SigningKey::generate(&mut OsRng);
        let x = Base64UrlUnpadded::encode_string(signing_key.verifying_key().as_bytes());
        let key = PublicKey::from_jwk(&PublicKeyJwk::ed25519(x)).expect("should decode");
        assert!(key.verify(MESSAGE, &signing_key.sign(MESSAGE).to_bytes()));
    }

    #[test]
    fn p256_jwk() {
        use p256::ecdsa::signature::Signer as _;

        let signing_key = p256::ecdsa::SigningKey::random(&mut OsRng);
        let point = signing_key.verifying_key().to_encoded_point(false);
        let jwk = PublicKeyJwk::ec(
            "P-256",
            Base64UrlUnpadded::encode_string(point.x().expect("x")),
            Base64UrlUnpadded::encode_string(point.y().expect("y")),
        );

        let key = PublicKey::from_jwk(&jwk).expect("should decode");
        let signature: p256::ecdsa::Signature = signing_key.sign(MESSAGE);
        assert!(key.verify(MESSAGE, signature.to_der().as_bytes()));
        assert!(!key.verify(MESSAGE, &signature.to_bytes()));
    }

    #[test]
    fn secp256k1_jwk() {
        use k256::ecdsa::signature::Signer as _;

        let signing_key = k256::ecdsa::SigningKey::random(&mut OsRng);
        let point = signing_key.verifying_key().to_encoded_point(false);
        let jwk = PublicKeyJwk::ec(
            "secp256k1",
            Base64UrlUnpadded::encode_string(point.x().expect("x")),
            Base64UrlUnpadded::encode_string(point.y().expect("y")),
        );

        let key = PublicKey::from_jwk(&jwk).expect("should decode");
        let signature: k256::ecdsa::Signature = signing_key.sign(MESSAGE);
        assert!(key.verify(MESSAGE, signature.to_der().as_bytes()));
    }

    #[test]
    fn rsa_jwk() {
        let private_key = rsa::RsaPrivateKey::new(&mut OsRng, 1024).expect("should generate");
        let public_key = private_key.to_public_key();
        let jwk = PublicKeyJwk::rsa(
            Base64UrlUnpadded::encode_string(&public_key.n().to_bytes_be()),
            Base64UrlUnpadded::encode_string(&public_key.e().to_bytes_be()),
        );

        let key = PublicKey::from_jwk(&jwk).expect("should decode");
        let signing_key = rsa::pss::BlindedSigningKey::<Sha256>::new(private_key);
        let signature = signing_key.sign_with_rng(&mut OsRng, MESSAGE).to_vec();
        assert!(key.verify(MESSAGE, &signature));
        assert!(!key.verify(b"tampered", &signature));
    }

    #[test]
    fn rsa_max_salt() {
        let private_key = rsa::RsaPrivateKey::new(&mut OsRng, 2048).expect("should generate");
        let key = PublicKey::Rsa(private_key.to_public_key());

        // 256-byte modulus less the SHA-256 digest and two bytes of padding
        let signing_key =
            rsa::pss::BlindedSigningKey::<Sha256>::new_with_salt_len(private_key, 222);
        let signature = signing_key.sign_with_rng(&mut OsRng, MESSAGE).to_vec();
        assert!(key.verify(MESSAGE, &signature));
        assert!(!key.verify(b"tampered", &signature));
    }

    #[test]
    fn unsupported_jwk() {
        let jwk = PublicKeyJwk {
            kty: "oct".into(),
            ..PublicKeyJwk::default()
        };
        let err = PublicKey::from_jwk(&jwk).expect_err("should fail");
        assert!(matches!(err, Error::InvalidPublicKey(_)));

        let jwk = PublicKeyJwk::ec("P-384", "AA", "AA");
        assert!(PublicKey::from_jwk(&jwk).is_err());
    }
}
