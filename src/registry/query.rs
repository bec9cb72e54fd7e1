use super::Registry;
use crate::did::normalize_did;
use crate::error::Error;
use crate::provider::{Canonicalizer, Store};
use crate::state::{Metadata, StateValue};
use crate::store::{PageRequest, PageResponse};

impl<S: Store, C: Canonicalizer> Registry<S, C> {
    /// The latest revision of a document, including deactivated documents.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no document is stored for `id`.
    pub fn get_document(&self, id: &str) -> crate::Result<StateValue> {
        let id = normalize_did(id);
        self.state
            .get_state(&id)?
            .ok_or_else(|| Error::NotFound(format!("{id}: document not found")))
    }

    /// A page of documents, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the page request is invalid or the store fails.
    pub fn list_documents(
        &self, page: &PageRequest,
    ) -> crate::Result<(Vec<StateValue>, PageResponse)> {
        self.state.list(page)
    }

    /// A specific revision of a document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the revision is not stored.
    pub fn document_version(&self, id: &str, version_id: &str) -> crate::Result<StateValue> {
        let id = normalize_did(id);
        self.state.get_version(&id, version_id)?.ok_or_else(|| {
            Error::NotFound(format!("{id}: version {version_id} not found"))
        })
    }

    /// Metadata of every revision of a document, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no document is stored for `id`.
    pub fn document_versions(&self, id: &str) -> crate::Result<Vec<Metadata>> {
        let id = normalize_did(id);
        let versions = self.state.versions(&id)?;
        if versions.is_empty() {
            return Err(Error::NotFound(format!("{id}: document not found")));
        }
        Ok(versions.into_iter().map(|value| value.metadata).collect())
    }

    /// Number of documents ever created.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn document_count(&self) -> crate::Result<u64> {
        self.state.count()
    }
}
