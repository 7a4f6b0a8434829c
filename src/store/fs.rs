//! Filesystem-backed blob store
//!
//! Blobs live under a configured root directory, at paths derived from
//! their keys by directory sharding: with `levels = 3` a blob keyed
//! `abcdef01...` is stored at `root/ab/cd/ef/abcdef01...`. This bounds any
//! single directory to ~256 entries regardless of total blob count.
//!
//! `store` writes through a uniquely named temp file and renames it into
//! place once the full content (and therefore the key) is known, so a
//! partially written blob never appears at a final path. No locking is
//! provided beyond OS-level rename/unlink atomicity: concurrent stores of
//! identical content are idempotent in outcome, and a `retrieve` racing a
//! `remove` of the same key may see either result. Callers needing
//! stronger guarantees must serialize access externally.

use crate::hash_stream::HashReader;
use crate::key::Key;
use crate::store::BlobStore;
use crate::{Error, Result};
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{self, ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Name prefix reserved for in-flight temp files.
///
/// Keys are 40 hex characters and shard directories are 2, so a `tmp-`
/// name can never collide with a blob path.
const TMP_PREFIX: &str = "tmp-";

fn default_levels() -> u32 {
    3
}

/// Configuration for [`FsBlobStore`]
///
/// `path` is the root directory for blob storage (created if missing).
/// `levels` is the number of 2-character directory-sharding levels applied
/// to each key; 3 is arbitrary but fine for most cases, since the optimum
/// depends on the underlying filesystem and the number of blobs stored.
#[derive(Debug, Clone, Deserialize)]
pub struct FsConfig {
    pub path: PathBuf,
    #[serde(default = "default_levels")]
    pub levels: u32,
}

/// A blob store backed by a local directory tree
pub struct FsBlobStore {
    root: PathBuf,
    levels: u32,
}

impl FsBlobStore {
    /// Create a store rooted at `path`, resolving it to an absolute path
    /// and creating the directory if absent.
    pub fn new(path: impl Into<PathBuf>, levels: u32) -> Result<Self> {
        // The final path component is the full 40-char key, so more than
        // 19 levels would shard past the end of the key.
        if levels as usize >= Key::HEX_LEN / 2 {
            return Err(Error::Config(format!(
                "'levels' must be less than {}, got {}",
                Key::HEX_LEN / 2,
                levels
            )));
        }

        let path = path.into();
        let root = if path.is_absolute() {
            path
        } else {
            std::env::current_dir()?.join(path)
        };
        fs::create_dir_all(&root)?;

        Ok(FsBlobStore { root, levels })
    }

    /// Construct from a JSON configuration map.
    ///
    /// Required: `path` (string). Optional: `levels` (integer, default 3).
    /// Fails with a config error before touching the filesystem if `path`
    /// is missing or empty.
    pub fn from_config(config: &serde_json::Value) -> Result<Self> {
        let cfg: FsConfig = serde_json::from_value(config.clone())
            .map_err(|e| Error::Config(format!("fs backend: {}", e)))?;
        if cfg.path.as_os_str().is_empty() {
            return Err(Error::Config("fs backend: 'path' must not be empty".into()));
        }
        Self::new(cfg.path, cfg.levels)
    }

    /// The resolved root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The configured sharding depth
    pub fn levels(&self) -> u32 {
        self.levels
    }

    /// The storage path for a key: the first `2 * levels` hex characters
    /// in 2-character chunks as nested directories, then the full key.
    ///
    /// Pure function of the key and the configured depth.
    pub fn path_for(&self, key: &Key) -> PathBuf {
        let hex = key.to_hex();
        let mut path = self.root.clone();
        for i in 0..self.levels as usize {
            path.push(&hex[i * 2..i * 2 + 2]);
        }
        path.push(hex);
        path
    }

    /// Delete temp files left behind by interrupted stores.
    ///
    /// A `store` whose input stream fails or whose caller is killed can
    /// leave a `tmp-` entry under the root. This sweeps entries older
    /// than `older_than` and returns how many were deleted. Never runs
    /// implicitly; the age threshold keeps it from racing in-flight
    /// stores. Finished blobs are never touched.
    pub fn sweep_orphans(&self, older_than: Duration) -> Result<usize> {
        let cutoff = SystemTime::now()
            .checked_sub(older_than)
            .unwrap_or(UNIX_EPOCH);

        let mut swept = 0;
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let name = entry.file_name();
            let name = match name.to_str() {
                Some(name) => name,
                None => continue,
            };
            if !name.starts_with(TMP_PREFIX) {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(m) if m.is_file() => m,
                _ => continue,
            };
            let modified = match metadata.modified() {
                Ok(t) => t,
                Err(_) => continue,
            };
            if modified > cutoff {
                continue;
            }

            match fs::remove_file(entry.path()) {
                Ok(()) => swept += 1,
                // Lost a race with another sweeper
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(swept)
    }

    fn spill_to(&self, reader: &mut impl Read, tmp: &Path) -> Result<()> {
        let mut out = File::create(tmp)?;
        io::copy(reader, &mut out)?;
        out.sync_all()?;
        Ok(())
    }
}

impl BlobStore for FsBlobStore {
    fn store(&self, stream: &mut dyn Read) -> Result<Key> {
        let mut reader = HashReader::new(stream);
        let tmp = self.root.join(format!("{}{}", TMP_PREFIX, Uuid::new_v4()));

        // The key is only known after the full stream has been read, so
        // the blob cannot be written directly to its final path.
        if let Err(err) = self.spill_to(&mut reader, &tmp) {
            let _ = fs::remove_file(&tmp);
            return Err(err);
        }

        let key = reader.finalize();
        let dest = self.path_for(&key);
        let moved = (|| {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            // Atomic; re-storing identical content renames over the same
            // bytes, so a conflict is a no-op rather than an error.
            fs::rename(&tmp, &dest)
        })();
        if let Err(err) = moved {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }

        Ok(key)
    }

    fn retrieve(&self, key: &Key) -> Result<Box<dyn Read + Send>> {
        match File::open(self.path_for(key)) {
            Ok(file) => Ok(Box::new(file)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(Error::NotFound(key.to_hex()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn remove(&self, key: &Key) -> Result<()> {
        // Empty shard directories are left in place; entries are cheap
        // and reused by future keys sharing the prefix.
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(Error::NotFound(key.to_hex()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn contains(&self, key: &Key) -> Result<bool> {
        Ok(self.path_for(key).is_file())
    }
}
