use std::fmt;
use std::path::PathBuf;

/// Settings the command line resolves before any store is opened.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// JSON document holding the catalog and the initial default mappings.
    pub seed_path: PathBuf,
    /// Location of the persistent mapping database, if any.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
}

/// Which mapping repository backs a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageChoice {
    InMemory,
    RocksDb(PathBuf),
    /// A database path was given but this build has no RocksDB support.
    Unavailable(PathBuf),
}

impl fmt::Display for StorageChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageChoice::InMemory | StorageChoice::Unavailable(_) => write!(f, "in-memory"),
            StorageChoice::RocksDb(path) => write!(f, "rocksdb at {}", path.display()),
        }
    }
}

impl AppConfig {
    pub const DEFAULT_LOG_LEVEL: &'static str = "info";

    pub fn storage(&self) -> StorageChoice {
        match &self.db_path {
            None => StorageChoice::InMemory,
            Some(path) if cfg!(feature = "storage-rocksdb") => StorageChoice::RocksDb(path.clone()),
            Some(path) => StorageChoice::Unavailable(path.clone()),
        }
    }
}
