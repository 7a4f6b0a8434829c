//! Backend selection from a configuration map
//!
//! Callers hold a `Box<dyn BlobStore>` and stay unchanged when new
//! backends are added here.

use crate::store::{BlobStore, FsBlobStore, MemoryBlobStore};
use crate::{Error, Result};
use serde_json::Value;

/// Construct a blob store from a JSON configuration map.
///
/// The `backend` field selects the implementation (default `"fs"`); the
/// remaining fields are backend-specific. Recognized backends:
///
/// - `"fs"`: filesystem storage, see [`crate::store::FsConfig`]
/// - `"memory"`: in-memory storage, no options
///
/// ```
/// use serde_json::json;
///
/// let dir = tempfile::tempdir().unwrap();
/// let store = casket::open(&json!({
///     "backend": "fs",
///     "path": dir.path().join("blobs"),
///     "levels": 3,
/// })).unwrap();
///
/// let key = store.store(&mut &b"hello world"[..]).unwrap();
/// assert_eq!(key.to_hex(), "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed");
/// ```
pub fn open(config: &Value) -> Result<Box<dyn BlobStore>> {
    let backend = config
        .get("backend")
        .and_then(Value::as_str)
        .unwrap_or("fs");

    match backend {
        "fs" => Ok(Box::new(FsBlobStore::from_config(config)?)),
        "memory" => Ok(Box::new(MemoryBlobStore::from_config(config)?)),
        other => Err(Error::Config(format!("unknown backend '{}'", other))),
    }
}
