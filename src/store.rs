//! # State Store
//!
//! Maps registry state onto a byte-keyed [`Store`]:
//!
//! | key                              | value                       |
//! |----------------------------------|-----------------------------|
//! | `did:<id>`                       | latest [`StateValue`]       |
//! | `did-version:<id>:<versionId>`   | every revision's `StateValue` |
//! | `did-count:`                     | document count, decimal     |
//! | `did-namespace-config`           | allowed namespaces          |

mod memory;

use anyhow::anyhow;

pub use self::memory::MemoryStore;
use crate::error::Error;
use crate::provider::Store;
use crate::state::StateValue;

/// Prefix for the latest revision of each document.
pub const DID_KEY_PREFIX: &str = "did:";

/// Prefix for every stored revision.
pub const DID_VERSION_KEY_PREFIX: &str = "did-version:";

/// Key for the document counter.
pub const DID_COUNT_KEY: &str = "did-count:";

/// Key for the namespace configuration.
pub const NAMESPACE_KEY: &str = "did-namespace-config";

/// Page size used when a request does not set one.
pub const DEFAULT_PAGE_LIMIT: usize = 100;

/// Selects a page of documents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Resume from this key, as returned in [`PageResponse::next_key`].
    /// Cannot be combined with `offset`.
    pub key: Option<Vec<u8>>,

    /// Number of documents to skip.
    pub offset: usize,

    /// Maximum number of documents to return. Defaults to
    /// [`DEFAULT_PAGE_LIMIT`] when zero.
    pub limit: usize,

    /// Count every stored document.
    pub count_total: bool,
}

/// Paging details returned alongside a page of documents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageResponse {
    /// Key of the first document of the next page, if there is one.
    pub next_key: Option<Vec<u8>>,

    /// Total number of documents, when requested.
    pub total: Option<usize>,
}

/// Registry state persisted in a [`Store`].
#[derive(Clone, Debug, Default)]
pub struct StateStore<S> {
    inner: S,
}

impl<S: Store> StateStore<S> {
    /// Wrap a store.
    pub const fn new(inner: S) -> Self {
        Self { inner }
    }

    /// The wrapped store.
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwrap the store.
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Returns `true` if a document is stored for `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn has_state(&self, id: &str) -> crate::Result<bool> {
        Ok(self.inner.has(did_key(id).as_bytes())?)
    }

    /// The latest revision of `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the value cannot be decoded.
    pub fn get_state(&self, id: &str) -> crate::Result<Option<StateValue>> {
        self.read(&did_key(id))
    }

    /// A specific revision of `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the value cannot be decoded.
    pub fn get_version(&self, id: &str, version_id: &str) -> crate::Result<Option<StateValue>> {
        self.read(&version_key(id, version_id))
    }

    /// Every revision of `id`, oldest first, following the version links
    /// back from the latest revision.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the history is broken.
    pub fn versions(&self, id: &str) -> crate::Result<Vec<StateValue>> {
        let Some(latest) = self.get_state(id)? else {
            return Ok(vec![]);
        };

        let mut versions = vec![];
        let mut previous = latest.metadata.previous_version_id.clone();
        let mut current = self.get_version(id, &latest.metadata.version_id)?.unwrap_or(latest);
        loop {
            versions.push(current);
            let Some(version_id) = previous else {
                break;
            };
            let Some(value) = self.get_version(id, &version_id)? else {
                return Err(Error::Store(anyhow!("{id}: revision {version_id} is missing")));
            };
            previous = value.metadata.previous_version_id.clone();
            current = value;
        }

        versions.reverse();
        Ok(versions)
    }

    /// Persist a new revision: it becomes the latest value for its DID and is
    /// added to the history, linked to the revision it supersedes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyExists`] if the revision's version id has
    /// already been stored, or an error if the store fails.
    pub fn add_revision(&mut self, value: &StateValue) -> crate::Result<()> {
        let id = &value.document().id;
        let version_id = &value.metadata.version_id;
        if self.inner.has(version_key(id, version_id).as_bytes())? {
            return Err(Error::AlreadyExists(format!("{id}: version {version_id} already exists")));
        }

        if let Some(previous_id) = &value.metadata.previous_version_id {
            if let Some(mut previous) = self.get_version(id, previous_id)? {
                previous.metadata.next_version_id = Some(version_id.clone());
                self.write(&version_key(id, previous_id), &previous)?;
            }
        }

        self.write(&version_key(id, version_id), value)?;
        self.write(&did_key(id), value)
    }

    /// Number of documents created.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the counter is corrupt.
    pub fn count(&self) -> crate::Result<u64> {
        let Some(bytes) = self.inner.get(DID_COUNT_KEY.as_bytes())? else {
            return Ok(0);
        };
        let count = String::from_utf8(bytes).map_err(anyhow::Error::from)?;
        Ok(count.parse::<u64>().map_err(anyhow::Error::from)?)
    }

    /// Increment the document counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the counter is corrupt.
    pub fn increment_count(&mut self) -> crate::Result<u64> {
        let count = self.count()?.saturating_add(1);
        self.inner.set(DID_COUNT_KEY.as_bytes(), count.to_string().into_bytes())?;
        Ok(count)
    }

    /// The stored namespace configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the value is not UTF-8.
    pub fn namespace(&self) -> crate::Result<Option<String>> {
        let Some(bytes) = self.inner.get(NAMESPACE_KEY.as_bytes())? else {
            return Ok(None);
        };
        Ok(Some(String::from_utf8(bytes).map_err(anyhow::Error::from)?))
    }

    /// Store the namespace configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn set_namespace(&mut self, namespace: &str) -> crate::Result<()> {
        Ok(self.inner.set(NAMESPACE_KEY.as_bytes(), namespace.as_bytes().to_vec())?)
    }

    /// A page of latest revisions, in key order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StructuralValidation`] if both `key` and `offset` are
    /// set, or an error if the store fails or a value cannot be decoded.
    pub fn list(&self, page: &PageRequest) -> crate::Result<(Vec<StateValue>, PageResponse)> {
        if page.key.is_some() && page.offset > 0 {
            return Err(Error::StructuralValidation(
                "either offset or key may be set, not both".into(),
            ));
        }
        let limit = if page.limit == 0 { DEFAULT_PAGE_LIMIT } else { page.limit };
        let prefix = DID_KEY_PREFIX.as_bytes();

        let mut entries = self
            .inner
            .iterate(prefix)?
            .filter(|(key, _)| page.key.as_ref().map_or(true, |start| key >= start))
            .skip(page.offset);

        let mut values = vec![];
        let mut next_key = None;
        for (key, value) in entries.by_ref() {
            if values.len() == limit {
                next_key = Some(key);
                break;
            }
            values.push(serde_json::from_slice(&value)?);
        }

        let total = if page.count_total { Some(self.inner.iterate(prefix)?.count()) } else { None };

        Ok((values, PageResponse { next_key, total }))
    }

    fn read(&self, key: &str) -> crate::Result<Option<StateValue>> {
        let Some(bytes) = self.inner.get(key.as_bytes())? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn write(&mut self, key: &str, value: &StateValue) -> crate::Result<()> {
        let bytes = serde_json::to_vec(value)?;
        Ok(self.inner.set(key.as_bytes(), bytes)?)
    }
}

fn did_key(id: &str) -> String {
    format!("{DID_KEY_PREFIX}{id}")
}

fn version_key(id: &str, version_id: &str) -> String {
    format!("{DID_VERSION_KEY_PREFIX}{id}:{version_id}")
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::document::Document;
    use crate::state::{Metadata, TxContext};

    fn value(id: &str, tx: &[u8]) -> StateValue {
        let doc = Document {
            id: id.to_string(),
            controller: vec![id.to_string()],
            ..Document::default()
        };
        StateValue::new(doc, Metadata::new(&TxContext::new(tx, Utc::now())))
    }

    fn did(n: usize) -> String {
        format!("did:cheqd:testnet:zABCDEFG1234567{n}")
    }

    #[test]
    fn revisions() {
        let mut store = StateStore::new(MemoryStore::default());
        let id = did(1);
        let first = value(&id, b"tx-1");
        store.add_revision(&first).expect("should store");

        let (doc, metadata) = first.clone().into_parts();
        let second = StateValue::new(doc, metadata.next(&TxContext::new(b"tx-2", Utc::now())));
        store.add_revision(&second).expect("should store");

        let latest = store.get_state(&id).expect("should read").expect("should exist");
        assert_eq!(latest, second);

        let versions = store.versions(&id).expect("should read");
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[0].metadata.version_id, first.metadata.version_id);
        assert_eq!(
            versions[0].metadata.next_version_id.as_deref(),
            Some(second.metadata.version_id.as_str())
        );
        assert_eq!(versions[1].metadata.version_id, second.metadata.version_id);

        let err = store.add_revision(&second).expect_err("should fail");
        assert!(matches!(err, Error::AlreadyExists(_)));
    }

    #[test]
    fn counter_and_namespace() {
        let mut store = StateStore::new(MemoryStore::default());
        assert_eq!(store.count().expect("should read"), 0);
        assert_eq!(store.increment_count().expect("should write"), 1);
        assert_eq!(store.increment_count().expect("should write"), 2);
        assert_eq!(store.inner().get(DID_COUNT_KEY.as_bytes()).unwrap(), Some(b"2".to_vec()));

        assert_eq!(store.namespace().expect("should read"), None);
        store.set_namespace("testnet").expect("should write");
        assert_eq!(store.namespace().expect("should read").as_deref(), Some("testnet"));
    }

    #[test]
    fn pages() {
        let mut store = StateStore::new(MemoryStore::default());
        for n in 1..=5 {
            let tx = format!("tx-{n}");
            store.add_revision(&value(&did(n), tx.as_bytes())).expect("should store");
        }
        store.increment_count().expect("should write");
        store.set_namespace("testnet").expect("should write");

        let request = PageRequest {
            limit: 2,
            count_total: true,
            ..PageRequest::default()
        };
        let (page, response) = store.list(&request).expect("should list");
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].document().id, did(1));
        assert_eq!(response.total, Some(5));

        let request = PageRequest {
            key: response.next_key,
            limit: 2,
            ..PageRequest::default()
        };
        let (page, response) = store.list(&request).expect("should list");
        assert_eq!(page[0].document().id, did(3));
        assert_eq!(response.total, None);

        let request = PageRequest {
            key: response.next_key,
            ..PageRequest::default()
        };
        let (page, response) = store.list(&request).expect("should list");
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].document().id, did(5));
        assert!(response.next_key.is_none());

        let request = PageRequest {
            offset: 4,
            ..PageRequest::default()
        };
        let (page, _) = store.list(&request).expect("should list");
        assert_eq!(page.len(), 1);
    }
}
