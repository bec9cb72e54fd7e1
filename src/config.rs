//! # Registry Configuration

use serde::{Deserialize, Serialize};

/// DID method served by a default registry.
pub const DEFAULT_METHOD: &str = "cheqd";

/// Namespaces accepted by a default registry.
pub const DEFAULT_NAMESPACES: [&str; 2] = ["mainnet", "testnet"];

/// Registry settings.
///
/// The namespace allow-list is written to the store the first time a registry
/// is opened over it and is read back from there afterwards.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// The DID method served, for example `cheqd` in `did:cheqd:...`.
    pub method: String,

    /// Allowed namespaces. A DID without a namespace is always allowed.
    #[serde(default)]
    pub namespaces: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            method: DEFAULT_METHOD.to_string(),
            namespaces: DEFAULT_NAMESPACES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Config {
    /// Configuration for `method` with no namespaces.
    #[must_use]
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            namespaces: vec![],
        }
    }

    /// Allow an additional namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespaces.push(namespace.into());
        self
    }

    /// The namespace allow-list as stored: comma separated.
    pub(crate) fn joined_namespaces(&self) -> String {
        self.namespaces.join(",")
    }

    /// Parse a stored namespace allow-list.
    pub(crate) fn split_namespaces(stored: &str) -> Vec<String> {
        stored.split(',').filter(|ns| !ns.is_empty()).map(ToString::to_string).collect()
    }
}
