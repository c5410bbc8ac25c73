use std::fmt;
use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{Result, StoreError, fingerprint};

/// A record that can live in a [`KeyedJsonStore`].
pub trait KeyedRecord: Serialize + DeserializeOwned {
    /// JSON field name holding the key. Used in diagnostics.
    const KEY_FIELD: &'static str;

    /// The value of the key field for this record.
    fn key(&self) -> &str;
}

/// A JSON-array file of `R` records, looked up by [`KeyedRecord::key`].
///
/// The store never checks for duplicate keys on `add`; callers that need
/// uniqueness look the key up first. Lookups return the first match in
/// file order.
pub struct KeyedJsonStore<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for KeyedJsonStore<R> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            _record: PhantomData,
        }
    }
}

impl<R> fmt::Debug for KeyedJsonStore<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedJsonStore")
            .field("path", &self.path)
            .finish()
    }
}

impl<R: KeyedRecord> KeyedJsonStore<R> {
    /// Bind a store to `path`. Nothing touches the disk until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record, in file order.
    pub fn load(&self) -> Result<Vec<R>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|source| StoreError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    /// Rewrite the whole file via a `.tmp` sibling and rename.
    fn write_all(&self, records: &[R]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let json = serde_json::to_string_pretty(records).map_err(|source| StoreError::Encode {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&tmp).map_err(|e| StoreError::io(&tmp, e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| StoreError::io(&tmp, e))?;
        file.sync_all().map_err(|e| StoreError::io(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;

        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            "store rewritten"
        );
        Ok(())
    }

    /// Append `record` and rewrite the file.
    pub fn add(&self, record: &R) -> Result<()>
    where
        R: Clone,
    {
        let mut records = self.load()?;
        records.push(record.clone());
        self.write_all(&records)
    }

    /// First record whose key equals `key`, if any.
    pub fn find(&self, key: &str) -> Result<Option<R>> {
        Ok(self.load()?.into_iter().find(|r| r.key() == key))
    }

    /// Whether any record carries `key`.
    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.load()?.iter().any(|r| r.key() == key))
    }

    /// Remove the first record whose key equals `key` and return it.
    ///
    /// A missing key is [`StoreError::NotFound`]; the file is not rewritten.
    pub fn erase(&self, key: &str) -> Result<R> {
        let mut records = self.load()?;
        let Some(index) = records.iter().position(|r| r.key() == key) else {
            return Err(StoreError::NotFound {
                field: R::KEY_FIELD,
                key: key.to_string(),
                path: self.path.clone(),
            });
        };
        let removed = records.remove(index);
        self.write_all(&records)?;
        Ok(removed)
    }

    /// Number of records currently stored.
    pub fn len(&self) -> Result<usize> {
        Ok(self.load()?.len())
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// SHA-256 of the raw file bytes; see [`fingerprint::fingerprint_file`].
    pub fn content_fingerprint(&self) -> Result<String> {
        fingerprint::fingerprint_file(&self.path)
    }

    /// Remove the backing file. Missing files are not an error.
    pub fn delete_backing_file(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }
}
