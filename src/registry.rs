//! # Registry
//!
//! The ledger-facing entry point. A [`Registry`] owns the state store and
//! applies create, update and deactivate requests to it, one transaction at a
//! time. Every check runs before the first write, so a rejected request
//! leaves state untouched.

mod create;
mod deactivate;
mod query;
mod update;

use crate::config::Config;
use crate::provider::{Canonicalizer, JsonCanonicalizer, Store};
use crate::store::StateStore;

/// DID document registry over a [`Store`].
#[derive(Debug)]
pub struct Registry<S, C = JsonCanonicalizer> {
    state: StateStore<S>,
    config: Config,
    canonicalizer: C,
}

impl<S: Store> Registry<S> {
    /// Open a registry over `store`.
    ///
    /// The namespace allow-list in `config` is persisted if the store does not
    /// hold one yet. A stored allow-list takes precedence over `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn new(store: S, config: Config) -> crate::Result<Self> {
        let mut state = StateStore::new(store);
        if state.namespace()?.is_none() {
            state.set_namespace(&config.joined_namespaces())?;
        }
        tracing::debug!(method = %config.method, "registry opened");

        Ok(Self {
            state,
            config,
            canonicalizer: JsonCanonicalizer,
        })
    }
}

impl<S: Store, C: Canonicalizer> Registry<S, C> {
    /// Use `canonicalizer` to derive the bytes signers sign.
    #[must_use]
    pub fn with_canonicalizer<C2: Canonicalizer>(self, canonicalizer: C2) -> Registry<S, C2> {
        Registry {
            state: self.state,
            config: self.config,
            canonicalizer,
        }
    }

    /// The registry's configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The namespaces DIDs may use, as persisted in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn namespaces(&self) -> crate::Result<Vec<String>> {
        Ok(self.state.namespace()?.map_or_else(
            || self.config.namespaces.clone(),
            |stored| Config::split_namespaces(&stored),
        ))
    }

    /// Release the underlying store.
    pub fn into_store(self) -> S {
        self.state.into_inner()
    }
}

// Log a rejection raised below the handlers.
fn rejected(e: &crate::Error) {
    tracing::error!(error = %e);
}
