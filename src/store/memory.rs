//! In-memory [`Store`], ordered by key.

use std::collections::BTreeMap;

use anyhow::Result;

use crate::provider::{KvIter, Store};

/// A [`Store`] backed by a `BTreeMap`. Suitable for tests and for embedding
/// the registry where durability is handled elsewhere.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl MemoryStore {
    /// Number of entries held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<()> {
        self.entries.insert(key.to_vec(), value);
        Ok(())
    }

    fn has(&self, key: &[u8]) -> Result<bool> {
        Ok(self.entries.contains_key(key))
    }

    fn delete(&mut self, key: &[u8]) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn iterate(&self, prefix: &[u8]) -> Result<KvIter<'_>> {
        let prefix = prefix.to_vec();
        let iter = self
            .entries
            .range(prefix.clone()..)
            .take_while(move |(key, _)| key.starts_with(&prefix))
            .map(|(key, value)| (key.clone(), value.clone()));
        Ok(Box::new(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_iteration() {
        let mut store = MemoryStore::default();
        store.set(b"did:b", b"2".to_vec()).unwrap();
        store.set(b"did:a", b"1".to_vec()).unwrap();
        store.set(b"did-count:", b"2".to_vec()).unwrap();
        store.set(b"other", b"x".to_vec()).unwrap();

        let keys = store.iterate(b"did:").unwrap().map(|(k, _)| k).collect::<Vec<_>>();
        assert_eq!(keys, vec![b"did:a".to_vec(), b"did:b".to_vec()]);

        store.delete(b"did:a").unwrap();
        assert!(!store.has(b"did:a").unwrap());
        assert_eq!(store.iterate(b"did:").unwrap().count(), 1);
        assert_eq!(store.len(), 3);
    }
}
