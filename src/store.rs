use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tempfile::NamedTempFile;

use crate::constants::store::{DEFAULT_OUTPUT_DIR, RECORD_FILE_EXTENSION, RECORD_FILE_PREFIX};
use crate::errors::GeneratorError;
use crate::types::ItemId;

/// Persistence backend for generated records.
///
/// Implementations key one serialized record per `ItemId` and never replace
/// an existing record.
pub trait RecordStore: Send + Sync {
    /// True when a record for `id` has already been persisted.
    fn exists(&self, id: ItemId) -> Result<bool, GeneratorError>;
    /// Return the persisted bytes for `id`, if any.
    fn read(&self, id: ItemId) -> Result<Option<Vec<u8>>, GeneratorError>;
    /// Persist `payload` for `id`; fails with `RecordExists` instead of overwriting.
    fn write_new(&self, id: ItemId, payload: &[u8]) -> Result<(), GeneratorError>;
}

/// In-memory record store for tests and dry runs.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<ItemId, Vec<u8>>>,
}

impl InMemoryRecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().map(|records| records.len()).unwrap_or(0)
    }

    /// True when nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for InMemoryRecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryRecordStore")
            .field("records", &self.len())
            .finish()
    }
}

fn poisoned(id: ItemId) -> GeneratorError {
    GeneratorError::Store {
        item_id: id,
        reason: "record store lock poisoned".into(),
    }
}

impl RecordStore for InMemoryRecordStore {
    fn exists(&self, id: ItemId) -> Result<bool, GeneratorError> {
        let records = self.records.read().map_err(|_| poisoned(id))?;
        Ok(records.contains_key(&id))
    }

    fn read(&self, id: ItemId) -> Result<Option<Vec<u8>>, GeneratorError> {
        let records = self.records.read().map_err(|_| poisoned(id))?;
        Ok(records.get(&id).cloned())
    }

    fn write_new(&self, id: ItemId, payload: &[u8]) -> Result<(), GeneratorError> {
        let mut records = self.records.write().map_err(|_| poisoned(id))?;
        match records.entry(id) {
            Entry::Occupied(_) => Err(GeneratorError::RecordExists(id)),
            Entry::Vacant(slot) => {
                slot.insert(payload.to_vec());
                Ok(())
            }
        }
    }
}

/// Directory-backed record store writing one `#<id>.json` file per item.
///
/// Writes go to a temporary file in the same directory that is then linked
/// into place without clobbering, so a record is either fully present or absent.
pub struct FileRecordStore {
    root: PathBuf,
}

impl fmt::Debug for FileRecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileRecordStore")
            .field("root", &self.root)
            .finish()
    }
}

impl FileRecordStore {
    /// Open (or create) a record directory at `root`.
    pub fn open<P: Into<PathBuf>>(root: P) -> Result<Self, GeneratorError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Default record directory relative to the working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_OUTPUT_DIR)
    }

    /// Directory holding the records.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path used for `id`.
    pub fn record_path(&self, id: ItemId) -> PathBuf {
        self.root.join(record_file_name(id))
    }

    fn store_err(id: ItemId, action: &str, err: io::Error) -> GeneratorError {
        GeneratorError::Store {
            item_id: id,
            reason: format!("failed to {action}: {err}"),
        }
    }
}

/// Filename for `id` (`#17.json`).
pub fn record_file_name(id: ItemId) -> String {
    format!("{RECORD_FILE_PREFIX}{id}.{RECORD_FILE_EXTENSION}")
}

impl RecordStore for FileRecordStore {
    fn exists(&self, id: ItemId) -> Result<bool, GeneratorError> {
        self.record_path(id)
            .try_exists()
            .map_err(|err| Self::store_err(id, "check record", err))
    }

    fn read(&self, id: ItemId) -> Result<Option<Vec<u8>>, GeneratorError> {
        match fs::read(self.record_path(id)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Self::store_err(id, "read record", err)),
        }
    }

    fn write_new(&self, id: ItemId, payload: &[u8]) -> Result<(), GeneratorError> {
        let mut staged = NamedTempFile::new_in(&self.root)
            .map_err(|err| Self::store_err(id, "stage record", err))?;
        staged
            .write_all(payload)
            .and_then(|_| staged.as_file().sync_all())
            .map_err(|err| Self::store_err(id, "write record", err))?;
        staged
            .persist_noclobber(self.record_path(id))
            .map_err(|err| {
                if err.error.kind() == io::ErrorKind::AlreadyExists {
                    GeneratorError::RecordExists(id)
                } else {
                    Self::store_err(id, "persist record", err.error)
                }
            })?;
        Ok(())
    }
}
