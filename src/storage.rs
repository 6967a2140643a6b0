use crate::errors::StoreError;
use crate::models::Lifetime;
use serde_json::{Map, Value};
use std::{
    fs,
    path::PathBuf,
    sync::Mutex,
};
use tracing::{debug, error};

/// Namespace the lifetime record is stored under.
pub const STORAGE_KEY: &str = "digitalTasbih";

pub const DEFAULT_DATA_PATH: &str = "data/tasbih.json";

/// Best-effort persistence for the lifetime totals.
pub trait LifetimeStore {
    /// Absent or unreadable data yields `None`.
    fn load(&self) -> Option<Lifetime>;
    fn save(&self, lifetime: &Lifetime) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LifetimeStore for JsonFileStore {
    fn load(&self) -> Option<Lifetime> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored data");
                return None;
            }
            Err(err) => {
                error!("failed to read data file: {err}");
                return None;
            }
        };

        let mut root: Map<String, Value> = match serde_json::from_slice(&bytes) {
            Ok(root) => root,
            Err(err) => {
                error!("failed to parse data file: {err}");
                return None;
            }
        };

        let record = root.remove(STORAGE_KEY)?;
        match serde_json::from_value(record) {
            Ok(lifetime) => Some(lifetime),
            Err(err) => {
                error!("malformed {STORAGE_KEY} record: {err}");
                None
            }
        }
    }

    /// Synchronous: runs on the caller's thread while the session lock is
    /// held, so a slow disk delays other requests by one small write.
    fn save(&self, lifetime: &Lifetime) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut root = Map::new();
        root.insert(STORAGE_KEY.to_string(), serde_json::to_value(lifetime)?);
        let payload = serde_json::to_vec_pretty(&root)?;
        fs::write(&self.path, payload)?;
        Ok(())
    }
}

/// In-process store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Mutex<Option<Lifetime>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn with_record(lifetime: Lifetime) -> Self {
        Self {
            record: Mutex::new(Some(lifetime)),
            fail_writes: false,
        }
    }

    /// Every `save` fails with [`StoreError::Unavailable`].
    pub fn failing() -> Self {
        Self {
            record: Mutex::new(None),
            fail_writes: true,
        }
    }

    pub fn record(&self) -> Option<Lifetime> {
        self.record.lock().ok().and_then(|record| record.clone())
    }
}

impl LifetimeStore for MemoryStore {
    fn load(&self) -> Option<Lifetime> {
        self.record()
    }

    fn save(&self, lifetime: &Lifetime) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable);
        }
        let mut record = self.record.lock().map_err(|_| StoreError::Unavailable)?;
        *record = Some(lifetime.clone());
        Ok(())
    }
}

impl<T: LifetimeStore + ?Sized> LifetimeStore for std::sync::Arc<T> {
    fn load(&self) -> Option<Lifetime> {
        (**self).load()
    }

    fn save(&self, lifetime: &Lifetime) -> Result<(), StoreError> {
        (**self).save(lifetime)
    }
}
