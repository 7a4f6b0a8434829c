//! # casket
//!
//! A pluggable content-addressed blob store.
//!
//! Blobs are immutable byte sequences stored under the SHA-1 hex digest
//! of their content. The digest is computed incrementally while the input
//! stream is written out, so arbitrarily large blobs are handled in
//! bounded memory. Identical content always maps to the same key, which
//! makes storing a duplicate a no-op and "update in place" meaningless.
//!
//! ## Core Concepts
//!
//! - **Blob**: an immutable byte sequence, read from any [`std::io::Read`]
//! - **Key**: the SHA-1 hex digest of a blob's content, its sole index
//! - **Sharding**: leading key characters become nested directories in
//!   the filesystem backend, bounding per-directory fan-out
//! - **Backends**: selected and parameterized by a configuration map
//!
//! ## Example
//!
//! ```ignore
//! use serde_json::json;
//!
//! let store = casket::open(&json!({ "path": "/var/lib/blobs" }))?;
//! let key = store.store(&mut upload)?;
//! let mut stream = store.retrieve(&key)?;
//! ```

pub mod config;
pub mod store;

mod error;
mod hash_stream;
mod key;

pub use config::open;
pub use error::{Error, Result};
pub use hash_stream::HashReader;
pub use key::Key;
pub use store::{BlobStore, FsBlobStore, FsConfig, MemoryBlobStore};
