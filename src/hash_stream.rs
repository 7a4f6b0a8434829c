//! Digest-accumulating stream decorator
//!
//! [`HashReader`] wraps any [`Read`] so that every byte read through it is
//! also fed into a running SHA-1. This lets a single linear pass over an
//! input stream both copy the bytes somewhere and compute the content key,
//! which is how `store` handles arbitrarily large uploads in bounded memory.

use crate::key::Key;
use sha1::{Digest, Sha1};
use std::io::{self, Read};

/// A reader that updates a SHA-1 digest with every byte passing through it.
///
/// Pass-through semantics: `read` delegates to the inner reader and never
/// reads ahead of what the caller requested.
pub struct HashReader<R> {
    inner: R,
    hasher: Sha1,
}

impl<R: Read> HashReader<R> {
    /// Wrap a reader
    pub fn new(inner: R) -> Self {
        HashReader {
            inner,
            hasher: Sha1::new(),
        }
    }

    /// Finalize the digest of everything read so far.
    ///
    /// Meaningful as a content key only once the inner stream has been
    /// read to EOF.
    pub fn finalize(self) -> Key {
        Key::from_bytes(self.hasher.finalize().into())
    }
}

impl<R: Read> Read for HashReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_digest_matches_whole_input() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let mut reader = HashReader::new(Cursor::new(&data[..]));

        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();

        assert_eq!(out, data);
        assert_eq!(reader.finalize(), Key::digest(data));
    }

    #[test]
    fn test_digest_under_small_chunk_reads() {
        let data: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        let mut reader = HashReader::new(Cursor::new(data.clone()));

        // Uneven chunk sizes exercise partial reads
        let mut out = Vec::new();
        let mut buf = [0u8; 7];
        loop {
            let n = reader.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }

        assert_eq!(out, data);
        assert_eq!(reader.finalize(), Key::digest(&data));
    }

    #[test]
    fn test_empty_stream() {
        let mut reader = HashReader::new(Cursor::new(Vec::new()));
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();

        assert!(out.is_empty());
        // SHA-1 of the empty string
        assert_eq!(
            reader.finalize().to_hex(),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
    }
}
