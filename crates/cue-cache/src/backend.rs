//! Storage backends for the Key-Value cache.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::CacheError;

/// Raw byte storage behind a [`Cache`](crate::Cache).
///
/// Implementations must make `set` atomic with respect to `get`: a reader
/// sees either the previous value or the new one, never a partial write.
pub trait KvBackend: Send + Sync {
    /// Get the bytes stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Check if `key` exists.
    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.get(key)?.is_some())
    }

    /// List all keys, sorted.
    fn keys(&self) -> Result<Vec<String>, CacheError>;
}

/// In-memory backend. Contents live as long as the backend does.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    /// Create an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl KvBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        self.entries().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries().remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.entries().contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.entries().keys().cloned().collect())
    }
}

const RECORD_EXTENSION: &str = "json";
const TEMP_SUFFIX: &str = ".tmp";

/// File-per-key backend rooted at a directory.
///
/// Keys are escaped into file names, so `cart:abc` and `cart_abc` never
/// share a file.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Open (creating if needed) a backend rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, CacheError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .map_err(|e| CacheError::OpenError(format!("{}: {}", dir.display(), e)))?;
        Ok(Self { dir })
    }

    /// The directory this backend writes to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", encode_key(key), RECORD_EXTENSION))
    }
}

impl KvBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match fs::read(self.record_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        let path = self.record_path(key);

        // Each write gets its own temp file in the same directory, so
        // concurrent writers never share one and the rename stays atomic.
        let mut file = tempfile::Builder::new()
            .prefix(".")
            .suffix(TEMP_SUFFIX)
            .tempfile_in(&self.dir)?;
        file.write_all(value)?;
        file.as_file().sync_all()?;
        file.persist(&path).map_err(|e| e.error)?;

        tracing::trace!(
            key,
            path = %path.display(),
            bytes = value.len(),
            "record written"
        );
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), CacheError> {
        match fs::remove_file(self.record_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.record_path(key).is_file())
    }

    fn keys(&self) -> Result<Vec<String>, CacheError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            if let Some(key) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(decode_key)
            {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Escape a key into a portable file name (`%XX` for anything outside
/// `[A-Za-z0-9_-]`).
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            out.push(char::from(byte));
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

fn decode_key(name: &str) -> Option<String> {
    let mut bytes = Vec::with_capacity(name.len());
    let mut iter = name.bytes();
    while let Some(byte) = iter.next() {
        if byte == b'%' {
            let hi = char::from(iter.next()?).to_digit(16)?;
            let lo = char::from(iter.next()?).to_digit(16)?;
            bytes.push(u8::try_from(hi * 16 + lo).ok()?);
        } else {
            bytes.push(byte);
        }
    }
    String::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_set_get_delete() {
        let backend = MemoryBackend::new();
        backend.set("cart-storage", b"{}").unwrap();

        assert_eq!(backend.get("cart-storage").unwrap(), Some(b"{}".to_vec()));
        assert!(backend.exists("cart-storage").unwrap());

        backend.delete("cart-storage").unwrap();
        assert_eq!(backend.get("cart-storage").unwrap(), None);
        assert!(!backend.exists("cart-storage").unwrap());
    }

    #[test]
    fn test_memory_backend_delete_missing_is_ok() {
        let backend = MemoryBackend::new();
        assert!(backend.delete("missing").is_ok());
    }

    #[test]
    fn test_file_backend_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();

        backend.set("cart-storage", b"{\"items\":[]}").unwrap();
        assert_eq!(
            backend.get("cart-storage").unwrap(),
            Some(b"{\"items\":[]}".to_vec())
        );

        // A second handle on the same directory sees the record.
        let reopened = FileBackend::open(dir.path()).unwrap();
        assert!(reopened.exists("cart-storage").unwrap());
    }

    #[test]
    fn test_file_backend_overwrite_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();

        backend.set("cart", b"1").unwrap();
        backend.set("cart", b"2").unwrap();

        assert_eq!(backend.get("cart").unwrap(), Some(b"2".to_vec()));
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_file_backend_concurrent_writers_never_tear_records() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();

        std::thread::scope(|scope| {
            for writer in 0u8..8 {
                let backend = &backend;
                scope.spawn(move || {
                    let payload = vec![b'a' + writer; 64 * 1024];
                    for _ in 0..20 {
                        backend.set("cart-storage", &payload).unwrap();
                    }
                });
            }
        });

        let record = backend.get("cart-storage").unwrap().unwrap();
        assert_eq!(record.len(), 64 * 1024);
        assert!(record.iter().all(|b| *b == record[0]));

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_file_backend_missing_key() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();

        assert_eq!(backend.get("nope").unwrap(), None);
        assert!(backend.delete("nope").is_ok());
    }

    #[test]
    fn test_file_backend_keys_are_escaped() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();

        backend.set("cart:abc", b"1").unwrap();
        backend.set("cart_abc", b"2").unwrap();
        backend.set("../escape", b"3").unwrap();

        assert_eq!(
            backend.keys().unwrap(),
            vec!["../escape".to_string(), "cart:abc".to_string(), "cart_abc".to_string()]
        );
        assert_eq!(backend.get("cart:abc").unwrap(), Some(b"1".to_vec()));
        assert!(!dir.path().join("..%2Fescape.json").exists());
        assert!(dir.path().join("%2E%2E%2Fescape.json").exists());
    }

    #[test]
    fn test_key_encoding() {
        assert_eq!(encode_key("cart-storage"), "cart-storage");
        assert_eq!(encode_key("cart:1"), "cart%3A1");
        assert_eq!(decode_key("cart%3A1").as_deref(), Some("cart:1"));
        assert_eq!(decode_key("bad%G1"), None);
    }
}
