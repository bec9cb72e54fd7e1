//! Ephemeral signing keys for tests.

use base64ct::{Base64UrlUnpadded, Encoding};
use ed25519_dalek::Signer as _;
use multibase::Base;
use rand::rngs::OsRng;
use rsa::signature::{RandomizedSigner, SignatureEncoding};
use rsa::traits::PublicKeyParts;
use sha2::Sha256;
use vercre_didledger::jwk::PublicKeyJwk;
use vercre_didledger::key::ED25519_CODEC;
use vercre_didledger::{SignInfo, VerificationMethod};

/// Supported key types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyType {
    /// Ed25519, published as an `Ed25519VerificationKey2020`.
    Ed25519,

    /// Ed25519, published as a `JsonWebKey2020`.
    Ed25519Jwk,

    /// ECDSA P-256, published as a `JsonWebKey2020`.
    P256,

    /// ECDSA secp256k1, published as a `JsonWebKey2020`.
    Secp256k1,

    /// RSA-PSS with SHA-256, published as a `JsonWebKey2020`.
    Rsa,
}

enum SecretKey {
    Ed25519(ed25519_dalek::SigningKey),
    P256(p256::ecdsa::SigningKey),
    Secp256k1(k256::ecdsa::SigningKey),
    Rsa(Box<rsa::RsaPrivateKey>),
}

/// A signing key bound to a verification method id.
pub struct Key {
    vm_id: String,
    key_type: KeyType,
    secret: SecretKey,
}

impl Key {
    /// Generate a key for the verification method `vm_id`.
    ///
    /// # Panics
    ///
    /// Panics if an RSA key cannot be generated.
    #[must_use]
    pub fn generate(vm_id: impl Into<String>, key_type: KeyType) -> Self {
        let secret = match key_type {
            KeyType::Ed25519 | KeyType::Ed25519Jwk => {
                SecretKey::Ed25519(ed25519_dalek::SigningKey::generate(&mut OsRng))
            }
            KeyType::P256 => SecretKey::P256(p256::ecdsa::SigningKey::random(&mut OsRng)),
            KeyType::Secp256k1 => {
                SecretKey::Secp256k1(k256::ecdsa::SigningKey::random(&mut OsRng))
            }
            KeyType::Rsa => SecretKey::Rsa(Box::new(
                rsa::RsaPrivateKey::new(&mut OsRng, 1024).expect("should generate RSA key"),
            )),
        };
        Self {
            vm_id: vm_id.into(),
            key_type,
            secret,
        }
    }

    /// An Ed25519 key for `vm_id`.
    #[must_use]
    pub fn ed25519(vm_id: impl Into<String>) -> Self {
        Self::generate(vm_id, KeyType::Ed25519)
    }

    /// The verification method id the key signs as.
    #[must_use]
    pub fn vm_id(&self) -> &str {
        &self.vm_id
    }

    /// The DID the key's verification method belongs to.
    #[must_use]
    pub fn did(&self) -> &str {
        self.vm_id.split_once('#').map_or(self.vm_id.as_str(), |(did, _)| did)
    }

    /// The key as a verification method controlled by `controller`.
    #[must_use]
    pub fn verification_method(&self, controller: &str) -> VerificationMethod {
        match (&self.secret, self.key_type) {
            (SecretKey::Ed25519(sk), KeyType::Ed25519) => {
                let mut bytes = ED25519_CODEC.to_vec();
                bytes.extend(sk.verifying_key().as_bytes());
                VerificationMethod::ed25519_2020(
                    &self.vm_id,
                    controller,
                    multibase::encode(Base::Base58Btc, bytes),
                )
            }
            _ => VerificationMethod::json_web_key_2020(&self.vm_id, controller, self.jwk()),
        }
    }

    /// The public key as a JWK.
    #[must_use]
    pub fn jwk(&self) -> PublicKeyJwk {
        let encode = |bytes: &[u8]| Base64UrlUnpadded::encode_string(bytes);
        match &self.secret {
            SecretKey::Ed25519(sk) => PublicKeyJwk::ed25519(encode(sk.verifying_key().as_bytes())),
            SecretKey::P256(sk) => {
                let point = sk.verifying_key().to_encoded_point(false);
                PublicKeyJwk::ec(
                    "P-256",
                    encode(point.x().map_or(&[][..], |x| x.as_slice())),
                    encode(point.y().map_or(&[][..], |y| y.as_slice())),
                )
            }
            SecretKey::Secp256k1(sk) => {
                let point = sk.verifying_key().to_encoded_point(false);
                PublicKeyJwk::ec(
                    "secp256k1",
                    encode(point.x().map_or(&[][..], |x| x.as_slice())),
                    encode(point.y().map_or(&[][..], |y| y.as_slice())),
                )
            }
            SecretKey::Rsa(sk) => {
                let public_key = sk.to_public_key();
                PublicKeyJwk::rsa(
                    encode(&public_key.n().to_bytes_be()),
                    encode(&public_key.e().to_bytes_be()),
                )
            }
        }
    }

    /// Sign `message`. ECDSA signatures are DER encoded.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        match &self.secret {
            SecretKey::Ed25519(sk) => sk.sign(message).to_bytes().to_vec(),
            SecretKey::P256(sk) => {
                let signature: p256::ecdsa::Signature =
                    p256::ecdsa::signature::Signer::sign(sk, message);
                signature.to_der().as_bytes().to_vec()
            }
            SecretKey::Secp256k1(sk) => {
                let signature: k256::ecdsa::Signature =
                    k256::ecdsa::signature::Signer::sign(sk, message);
                signature.to_der().as_bytes().to_vec()
            }
            SecretKey::Rsa(sk) => {
                let signing_key = rsa::pss::BlindedSigningKey::<Sha256>::new((**sk).clone());
                signing_key.sign_with_rng(&mut OsRng, message).to_vec()
            }
        }
    }

    /// Sign `message`, attributed to the key's verification method.
    #[must_use]
    pub fn sign_info(&self, message: &[u8]) -> SignInfo {
        SignInfo::new(&self.vm_id, self.sign(message))
    }
}
