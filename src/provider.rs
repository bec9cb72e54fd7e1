//! # Provider Traits
//!
//! Capabilities the registry consumes from its host: a byte-keyed store and a
//! canonical serialization for signed payloads.

use anyhow::Result;
use serde_json::Value;

/// Iterator over `(key, value)` pairs returned by [`Store::iterate`].
pub type KvIter<'a> = Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + 'a>;

/// [`Store`] is a byte-keyed key-value store.
///
/// Implementers are expected to provide all-or-nothing write semantics per
/// transaction. The registry performs all checks before its first write, so a
/// failed operation leaves the store untouched.
pub trait Store {
    /// Get the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<()>;

    /// Returns `true` if a value is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    fn has(&self, key: &[u8]) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Remove the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    fn delete(&mut self, key: &[u8]) -> Result<()>;

    /// Iterate, in ascending key order, over every entry whose key starts with
    /// `prefix`. The iterator is finite and can only be restarted by calling
    /// `iterate` again.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    fn iterate(&self, prefix: &[u8]) -> Result<KvIter<'_>>;
}

/// [`Canonicalizer`] produces the exact bytes a payload is signed over.
///
/// Clients and the registry must derive identical bytes for the same payload,
/// so implementations must be deterministic.
pub trait Canonicalizer {
    /// Serialize `value` to its canonical byte form.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized.
    fn canonicalize(&self, value: &Value) -> Result<Vec<u8>>;
}

/// JSON Canonicalization Scheme ([RFC8785]).
///
/// [RFC8785]: https://www.rfc-editor.org/rfc/rfc8785
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCanonicalizer;

impl Canonicalizer for JsonCanonicalizer {
    fn canonicalize(&self, value: &Value) -> Result<Vec<u8>> {
        Ok(serde_json_canonicalizer::to_string(value)?.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn canonical_order() {
        let a = json!({"id": "did:cheqd:testnet:zABCDEFG12345678", "controller": ["b", "a"]});
        let b = json!({"controller": ["b", "a"], "id": "did:cheqd:testnet:zABCDEFG12345678"});

        let bytes = JsonCanonicalizer.canonicalize(&a).expect("should canonicalize");
        assert_eq!(bytes, JsonCanonicalizer.canonicalize(&b).expect("should canonicalize"));
        assert_eq!(
            String::from_utf8(bytes).expect("should be utf8"),
            r#"{"controller":["b","a"],"id":"did:cheqd:testnet:zABCDEFG12345678"}"#
        );
    }
}
