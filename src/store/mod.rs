//! Pluggable content-addressed blob storage
//!
//! Blobs are immutable byte sequences indexed by the SHA-1 digest of their
//! content. The [`BlobStore`] trait defines the storage contract; the
//! filesystem backend is the primary implementation and an in-memory
//! backend exists for tests and embedding.

mod fs;
mod memory;

pub use fs::{FsBlobStore, FsConfig};
pub use memory::MemoryBlobStore;

use crate::key::Key;
use crate::Result;
use std::io::Read;

/// Storage contract for content-addressed blobs
///
/// Implementations can persist to:
/// - The local filesystem ([`FsBlobStore`])
/// - Process memory ([`MemoryBlobStore`], for tests)
/// - A remote object store (future variants; callers stay unchanged by
///   going through [`crate::config::open`])
///
/// There is no update operation. Content addressing makes "update in
/// place" meaningless: changed content is a new blob under a new key, and
/// the caller removes or abandons the old key.
pub trait BlobStore: Send + Sync {
    /// Consume `stream` to EOF, persist its content, and return the SHA-1
    /// key of everything read.
    ///
    /// Idempotent for identical content: storing the same bytes twice
    /// yields the same key and leaves a single valid blob.
    fn store(&self, stream: &mut dyn Read) -> Result<Key>;

    /// Return a fresh read stream over the blob stored under `key`,
    /// positioned at offset 0. Reads are non-destructive; repeated
    /// `retrieve` calls for the same key are independent.
    ///
    /// Fails with [`crate::Error::NotFound`] if no blob exists for `key`.
    fn retrieve(&self, key: &Key) -> Result<Box<dyn Read + Send>>;

    /// Delete the blob stored under `key`.
    ///
    /// Fails with [`crate::Error::NotFound`] if no blob exists for `key`,
    /// including a key that was valid but has since been removed.
    fn remove(&self, key: &Key) -> Result<()>;

    /// Check whether a blob exists for `key`.
    fn contains(&self, key: &Key) -> Result<bool>;
}

#[cfg(test)]
pub(crate) mod suite {
    //! Backend-independent property checks, run by each backend's tests.

    use super::BlobStore;
    use crate::key::Key;
    use crate::Error;
    use std::io::{Cursor, Read};

    /// SHA-1 of the literal bytes `b"hello world"`
    pub const HELLO_WORLD_KEY: &str = "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed";

    /// Simulates an arbitrary-length input stream containing the bytes
    /// 0..=255 repeated, without ever materializing the whole sequence.
    pub struct PatternReader {
        remaining: usize,
        next: u8,
    }

    impl PatternReader {
        pub fn new(size: usize) -> Self {
            PatternReader {
                remaining: size,
                next: 0,
            }
        }

        /// The same byte sequence, materialized (test oracle only).
        pub fn expected(size: usize) -> Vec<u8> {
            (0..=255u8).cycle().take(size).collect()
        }
    }

    impl Read for PatternReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = buf.len().min(self.remaining);
            for slot in &mut buf[..n] {
                *slot = self.next;
                self.next = self.next.wrapping_add(1);
            }
            self.remaining -= n;
            Ok(n)
        }
    }

    pub fn read_all(store: &dyn BlobStore, key: &Key) -> Vec<u8> {
        let mut stream = store.retrieve(key).unwrap();
        let mut data = Vec::new();
        stream.read_to_end(&mut data).unwrap();
        data
    }

    pub fn check_store_and_retrieve(store: &dyn BlobStore) {
        let key = store.store(&mut Cursor::new(b"hello world")).unwrap();

        assert_eq!(key.to_hex(), HELLO_WORLD_KEY);
        assert_eq!(read_all(store, &key), b"hello world");
        assert!(store.contains(&key).unwrap());
    }

    pub fn check_retrieve_is_repeatable(store: &dyn BlobStore) {
        let key = store.store(&mut Cursor::new(b"read me twice")).unwrap();

        assert_eq!(read_all(store, &key), b"read me twice");
        assert_eq!(read_all(store, &key), b"read me twice");
    }

    pub fn check_unknown_key_not_found(store: &dyn BlobStore) {
        let key = Key::from_hex(&"0".repeat(40)).unwrap();

        assert!(matches!(store.retrieve(&key), Err(Error::NotFound(_))));
        assert!(store.remove(&key).unwrap_err().is_not_found());
        assert!(!store.contains(&key).unwrap());
    }

    pub fn check_remove_forgets(store: &dyn BlobStore) {
        let key = store.store(&mut Cursor::new(b"ephemeral")).unwrap();
        store.remove(&key).unwrap();

        assert!(matches!(store.retrieve(&key), Err(Error::NotFound(_))));
        assert!(store.remove(&key).unwrap_err().is_not_found());
        assert!(!store.contains(&key).unwrap());
    }

    pub fn check_double_store_idempotent(store: &dyn BlobStore) {
        let key1 = store.store(&mut Cursor::new(b"duplicate data")).unwrap();
        let key2 = store.store(&mut Cursor::new(b"duplicate data")).unwrap();

        assert_eq!(key1, key2);
        assert_eq!(read_all(store, &key1), b"duplicate data");
    }

    pub fn check_large_stream(store: &dyn BlobStore) {
        let size = 1 << 20;
        let key = store.store(&mut PatternReader::new(size)).unwrap();

        let expected = PatternReader::expected(size);
        assert_eq!(key, Key::digest(&expected));
        assert_eq!(read_all(store, &key), expected);
    }

    pub fn check_empty_blob(store: &dyn BlobStore) {
        let key = store.store(&mut Cursor::new(b"")).unwrap();

        assert_eq!(key.to_hex(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert_eq!(read_all(store, &key), b"");
    }
}
