//! Key-value engine contract and the two bundled implementations.
//!
//! `get` returns an explicit found/not-found result: absence is a common,
//! expected case in this engine and is branched on, never caught.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Errors from the kv engine.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store is closed")]
    Closed,
    #[error("truncated store image at byte {offset}")]
    TruncatedImage { offset: usize },
}

/// Ordered byte-key/byte-value store contract.
///
/// Operations after `close` fail with [`KvError::Closed`]; the provider
/// treats that as fatal.
pub trait KvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KvError>;
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KvError>;
    /// Make every write so far durable without closing the store. A no-op
    /// for engines whose writes are durable already.
    fn flush(&mut self) -> Result<(), KvError>;
    fn close(&mut self) -> Result<(), KvError>;
}

/// In-memory ordered store for tests and ephemeral worlds.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    map: BTreeMap<Vec<u8>, Vec<u8>>,
    closed: bool,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KvError> {
        if self.closed {
            return Err(KvError::Closed);
        }
        Ok(self.map.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KvError> {
        if self.closed {
            return Err(KvError::Closed);
        }
        self.map.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), KvError> {
        if self.closed {
            return Err(KvError::Closed);
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), KvError> {
        self.closed = true;
        Ok(())
    }
}

const IMAGE_FILE: &str = "store.bin";

/// File-backed ordered store.
///
/// Holds the full key set in memory and persists it as a length-prefixed
/// record image (`u32 klen, key, u32 vlen, value` repeated) inside the
/// store directory. The image is rewritten on `flush`/`close`; writes
/// between flushes live only in memory, so a crash loses at most the
/// writes since the last save sweep.
#[derive(Debug)]
pub struct FileKvStore {
    dir: PathBuf,
    map: BTreeMap<Vec<u8>, Vec<u8>>,
    closed: bool,
}

impl FileKvStore {
    /// Open or create a store directory and load the existing image.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, KvError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        let image = dir.join(IMAGE_FILE);
        let map = if image.exists() {
            Self::parse_image(&std::fs::read(&image)?)?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            dir,
            map,
            closed: false,
        })
    }

    fn parse_image(bytes: &[u8]) -> Result<BTreeMap<Vec<u8>, Vec<u8>>, KvError> {
        let mut map = BTreeMap::new();
        let mut pos = 0usize;
        while pos < bytes.len() {
            let key = Self::read_record(bytes, &mut pos)?;
            let value = Self::read_record(bytes, &mut pos)?;
            map.insert(key, value);
        }
        Ok(map)
    }

    fn read_record(bytes: &[u8], pos: &mut usize) -> Result<Vec<u8>, KvError> {
        let err = KvError::TruncatedImage { offset: *pos };
        let Some(len_bytes) = bytes.get(*pos..*pos + 4) else {
            return Err(err);
        };
        let len = u32::from_le_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]) as usize;
        *pos += 4;
        let Some(data) = bytes.get(*pos..*pos + len) else {
            return Err(err);
        };
        *pos += len;
        Ok(data.to_vec())
    }

    /// Rewrite the on-disk image from the in-memory map.
    pub fn sync(&self) -> Result<(), KvError> {
        let tmp = self.dir.join(format!("{IMAGE_FILE}.tmp"));
        let mut file = std::fs::File::create(&tmp)?;
        for (key, value) in &self.map {
            file.write_all(&(key.len() as u32).to_le_bytes())?;
            file.write_all(key)?;
            file.write_all(&(value.len() as u32).to_le_bytes())?;
            file.write_all(value)?;
        }
        file.sync_all()?;
        std::fs::rename(&tmp, self.dir.join(IMAGE_FILE))?;
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KvError> {
        if self.closed {
            return Err(KvError::Closed);
        }
        Ok(self.map.get(key).cloned())
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), KvError> {
        if self.closed {
            return Err(KvError::Closed);
        }
        self.map.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), KvError> {
        if self.closed {
            return Err(KvError::Closed);
        }
        self.sync()
    }

    fn close(&mut self) -> Result<(), KvError> {
        if self.closed {
            return Ok(());
        }
        self.sync()?;
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_get_put_absent() {
        let mut store = MemoryKvStore::new();
        assert!(store.get(b"missing").unwrap().is_none());
        store.put(b"a", b"1").unwrap();
        assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));
        store.put(b"a", b"2").unwrap();
        assert_eq!(store.get(b"a").unwrap(), Some(b"2".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn closed_store_rejects_operations() {
        let mut store = MemoryKvStore::new();
        store.close().unwrap();
        assert!(matches!(store.get(b"a"), Err(KvError::Closed)));
        assert!(matches!(store.put(b"a", b"1"), Err(KvError::Closed)));
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("db");
        {
            let mut store = FileKvStore::open(&dir).unwrap();
            store.put(b"chunk", &[1, 2, 3]).unwrap();
            store.put(b"", b"empty-key").unwrap();
            store.close().unwrap();
        }
        let store = FileKvStore::open(&dir).unwrap();
        assert_eq!(store.get(b"chunk").unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(store.get(b"").unwrap(), Some(b"empty-key".to_vec()));
    }

    #[test]
    fn flush_makes_writes_durable_without_close() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("db");
        {
            let mut store = FileKvStore::open(&dir).unwrap();
            store.put(b"k", b"v").unwrap();
            store.flush().unwrap();
            store.put(b"late", b"unflushed").unwrap();
            // dropped without close: only the flushed write survives
        }
        let store = FileKvStore::open(&dir).unwrap();
        assert_eq!(store.get(b"k").unwrap(), Some(b"v".to_vec()));
        assert!(store.get(b"late").unwrap().is_none());
    }

    #[test]
    fn unsynced_writes_do_not_hit_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("db");
        {
            let mut store = FileKvStore::open(&dir).unwrap();
            store.put(b"k", b"v").unwrap();
            // dropped without close
        }
        let store = FileKvStore::open(&dir).unwrap();
        assert!(store.get(b"k").unwrap().is_none());
    }

    #[test]
    fn truncated_image_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("db");
        {
            let mut store = FileKvStore::open(&dir).unwrap();
            store.put(b"key", b"value").unwrap();
            store.close().unwrap();
        }
        let image = dir.join("store.bin");
        let mut bytes = std::fs::read(&image).unwrap();
        bytes.truncate(bytes.len() - 2);
        std::fs::write(&image, &bytes).unwrap();

        assert!(matches!(
            FileKvStore::open(&dir),
            Err(KvError::TruncatedImage { .. })
        ));
    }
}
