use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error for record {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Key-value persistence port for the client-side stores. One named record
/// holds one opaque string payload, mirroring browser local storage.
pub trait KvStore {
    fn read(&self, name: &str) -> Result<Option<String>, StorageError>;
    fn write(&self, name: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, name: &str) -> Result<(), StorageError>;
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn read(&self, name: &str) -> Result<Option<String>, StorageError> {
        (**self).read(name)
    }

    fn write(&self, name: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(name, value)
    }

    fn remove(&self, name: &str) -> Result<(), StorageError> {
        (**self).remove(name)
    }
}

/// Durable store keeping each record as `{name}.json` under a data directory.
pub struct JsonFileStore {
    directory: PathBuf,
}

impl JsonFileStore {
    pub fn new(directory: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(directory).map_err(|source| StorageError::Io {
            name: directory.display().to_string(),
            source,
        })?;
        Ok(Self {
            directory: directory.to_path_buf(),
        })
    }

    fn record_path(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{name}.json"))
    }
}

impl KvStore for JsonFileStore {
    fn read(&self, name: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.record_path(name)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                name: name.into(),
                source,
            }),
        }
    }

    fn write(&self, name: &str, value: &str) -> Result<(), StorageError> {
        fs::write(self.record_path(name), value).map_err(|source| StorageError::Io {
            name: name.into(),
            source,
        })
    }

    fn remove(&self, name: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.record_path(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                name: name.into(),
                source,
            }),
        }
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, String>>,
}

impl KvStore for MemoryStore {
    fn read(&self, name: &str) -> Result<Option<String>, StorageError> {
        Ok(self.records.lock().unwrap().get(name).cloned())
    }

    fn write(&self, name: &str, value: &str) -> Result<(), StorageError> {
        self.records.lock().unwrap().insert(name.into(), value.into());
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), StorageError> {
        self.records.lock().unwrap().remove(name);
        Ok(())
    }
}
