//! # Decentralized Identifiers
//!
//! Parse, validate and normalize DIDs of the form
//!
//! `did:<method>[:<namespace>]:<unique-id>`
//!
//! where the unique id is a 16 or 32 character base58 string or a UUID.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Error;

static DID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^did:([^:]+?)(:([^:]+?))?:([^:]+)$").expect("should compile"));
static NAMESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-zA-Z0-9]*$").expect("should compile"));
static BASE58_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[1-9A-HJ-NP-Za-km-z]+$").expect("should compile"));
static UUID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("should compile")
});

/// A DID split into its components.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Did {
    /// DID method, e.g. `cheqd`.
    pub method: String,

    /// Optional network namespace, e.g. `testnet`. Empty when absent.
    pub namespace: String,

    /// Method-specific unique id.
    pub unique_id: String,
}

impl Did {
    /// Check the DID belongs to `method`, that its namespace (when present) is
    /// one of `namespaces`, and that the unique id is well-formed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedDid`] when the method or unique id is wrong,
    /// and [`Error::NamespaceNotAllowed`] when the namespace is not allowed.
    pub fn validate(&self, method: &str, namespaces: &[String]) -> crate::Result<()> {
        if self.method != method {
            return Err(Error::MalformedDid(format!(
                "{self}: did method must be: {method}, got: {}",
                self.method
            )));
        }
        if !self.namespace.is_empty() && !namespaces.contains(&self.namespace) {
            return Err(Error::NamespaceNotAllowed(format!(
                "{self}: namespace must be one of: {}, got: {}",
                namespaces.join(", "),
                self.namespace
            )));
        }
        if !is_valid_unique_id(&self.unique_id) {
            return Err(Error::MalformedDid(format!(
                "{self}: unique id must be 16 or 32 base58 characters or a UUID"
            )));
        }
        Ok(())
    }

    /// Lower-case UUID unique ids. Other ids are unchanged.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if is_uuid(&self.unique_id) {
            self.unique_id = self.unique_id.to_lowercase();
        }
        self
    }
}

impl FromStr for Did {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let (method, namespace, unique_id) = split_did(s)?;
        Ok(Self {
            method,
            namespace,
            unique_id,
        })
    }
}

impl Display for Did {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "did:{}:{}", self.method, self.unique_id)
        } else {
            write!(f, "did:{}:{}:{}", self.method, self.namespace, self.unique_id)
        }
    }
}

/// Split a DID into `(method, namespace, unique_id)`.
///
/// # Errors
///
/// Returns [`Error::MalformedDid`] if the string does not match the DID
/// grammar or the namespace contains characters other than letters and
/// digits.
pub fn split_did(did: &str) -> crate::Result<(String, String, String)> {
    let Some(caps) = DID_REGEX.captures(did) else {
        return Err(Error::MalformedDid(format!("{did}: unable to split did into components")));
    };

    let method = caps.get(1).map_or("", |m| m.as_str());
    let namespace = caps.get(3).map_or("", |m| m.as_str());
    let unique_id = caps.get(4).map_or("", |m| m.as_str());

    if !NAMESPACE_REGEX.is_match(namespace) {
        return Err(Error::MalformedDid(format!("{did}: namespace must be alphanumeric")));
    }

    Ok((method.to_string(), namespace.to_string(), unique_id.to_string()))
}

/// Parse and validate a DID against the configured method and namespaces.
///
/// # Errors
///
/// See [`Did::validate`].
pub fn validate_did(did: &str, method: &str, namespaces: &[String]) -> crate::Result<()> {
    Did::from_str(did)?.validate(method, namespaces)
}

/// Returns `true` if `did` parses and passes [`Did::validate`].
#[must_use]
pub fn is_valid_did(did: &str, method: &str, namespaces: &[String]) -> bool {
    validate_did(did, method, namespaces).is_ok()
}

/// Lower-case the unique id of a DID when it is a UUID. Strings that are not
/// DIDs are returned unchanged.
#[must_use]
pub fn normalize_did(did: &str) -> String {
    Did::from_str(did).map_or_else(|_| did.to_string(), |d| d.normalize().to_string())
}

/// Unique ids are 16 or 32 base58 characters, or a UUID.
#[must_use]
pub fn is_valid_unique_id(id: &str) -> bool {
    ((id.len() == 16 || id.len() == 32) && BASE58_REGEX.is_match(id)) || is_uuid(id)
}

fn is_uuid(id: &str) -> bool {
    UUID_REGEX.is_match(id)
}
