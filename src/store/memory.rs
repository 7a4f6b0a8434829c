//! In-memory blob store
//!
//! Keeps every blob in a map. Useful for tests and for embedding the
//! store contract without touching the filesystem; semantics match the
//! filesystem backend exactly.

use crate::hash_stream::HashReader;
use crate::key::Key;
use crate::store::BlobStore;
use crate::{Error, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::sync::Arc;

/// A blob store backed by process memory
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<Key, Arc<[u8]>>>,
}

impl MemoryBlobStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct from a JSON configuration map. No options are recognized.
    pub fn from_config(_config: &serde_json::Value) -> Result<Self> {
        Ok(Self::new())
    }

    /// Number of blobs currently held
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

impl BlobStore for MemoryBlobStore {
    fn store(&self, stream: &mut dyn Read) -> Result<Key> {
        let mut reader = HashReader::new(stream);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        let key = reader.finalize();

        self.blobs.write().insert(key, Arc::from(data));
        Ok(key)
    }

    fn retrieve(&self, key: &Key) -> Result<Box<dyn Read + Send>> {
        let data = self
            .blobs
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| Error::NotFound(key.to_hex()))?;
        Ok(Box::new(Cursor::new(data)))
    }

    fn remove(&self, key: &Key) -> Result<()> {
        self.blobs
            .write()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| Error::NotFound(key.to_hex()))
    }

    fn contains(&self, key: &Key) -> Result<bool> {
        Ok(self.blobs.read().contains_key(key))
    }
}
