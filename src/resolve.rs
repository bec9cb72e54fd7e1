//! # Document Resolution
//!
//! While an operation is in flight, the document it proposes is not yet in the
//! store but must already be resolvable: a new document may control itself,
//! and an updated document's new keys must sign alongside its old ones.
//!
//! [`Resolver`] overlays the candidate documents of the operation ("pending")
//! on the store ("committed"). Callers name the layer they want with
//! [`Revision`], so the same DID can resolve to its old and new revisions at
//! once.

use std::borrow::Cow;
use std::collections::HashMap;

use crate::document::Document;
use crate::error::Error;
use crate::provider::Store;
use crate::store::StateStore;
use crate::tracerr;

/// Which layer of the resolver a DID is resolved from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Revision {
    /// The document as currently persisted.
    Committed,

    /// The document proposed by the in-flight operation.
    Pending,
}

/// Resolves DIDs against committed state overlaid by in-flight candidates.
pub struct Resolver<'a, S> {
    committed: &'a StateStore<S>,
    pending: HashMap<String, Document>,
}

impl<'a, S: Store> Resolver<'a, S> {
    /// A resolver over committed state only.
    pub fn new(committed: &'a StateStore<S>) -> Self {
        Self {
            committed,
            pending: HashMap::new(),
        }
    }

    /// Add an in-flight candidate document.
    #[must_use]
    pub fn with_pending(mut self, doc: Document) -> Self {
        self.pending.insert(doc.id.clone(), doc);
        self
    }

    /// Resolve `did` from the given layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the committed store cannot be read.
    pub fn resolve(
        &self, did: &str, revision: Revision,
    ) -> crate::Result<Option<Cow<'_, Document>>> {
        match revision {
            Revision::Pending => Ok(self.pending.get(did).map(Cow::Borrowed)),
            Revision::Committed => Ok(self
                .committed
                .get_state(did)?
                .map(|value| Cow::Owned(value.into_parts().0))),
        }
    }

    /// Every controller named by `doc` (of the document or of a verification
    /// method) must be in flight or persisted and active.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ControllerNotFound`] naming the first controller that
    /// does not resolve, or an error if the store cannot be read.
    pub fn ensure_controllers_exist(&self, doc: &Document) -> crate::Result<()> {
        for did in doc.all_controller_dids() {
            if self.pending.contains_key(&did) {
                continue;
            }
            match self.committed.get_state(&did)? {
                Some(value) if !value.metadata.deactivated => {}
                Some(_) => tracerr!(Error::ControllerNotFound, "{did}: controller is deactivated"),
                None => tracerr!(Error::ControllerNotFound, "{did}: controller not found"),
            }
        }
        Ok(())
    }

    /// A human-readable name for `did` at `revision`. When the same DID is
    /// both committed and pending, the layer is named.
    #[must_use]
    pub fn describe(&self, did: &str, revision: Revision) -> String {
        if !self.pending.contains_key(did) || self.committed.has_state(did).ok() != Some(true) {
            return did.to_string();
        }
        match revision {
            Revision::Committed => format!("{did} (old version)"),
            Revision::Pending => format!("{did} (new version)"),
        }
    }
}
