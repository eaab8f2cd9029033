//! Storage adapters for the domain ports.

pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;

use crate::config::StorageChoice;
use crate::domain::ports::MappingRepositoryRef;
use crate::error::Result;
use std::sync::Arc;
use tracing::warn;

/// Opens the mapping repository selected by the configuration.
pub fn open_repository(choice: &StorageChoice) -> Result<MappingRepositoryRef> {
    let repository: MappingRepositoryRef = match choice {
        StorageChoice::InMemory => Arc::new(in_memory::InMemoryMappingRepository::new()),
        #[cfg(feature = "storage-rocksdb")]
        StorageChoice::RocksDb(path) => Arc::new(rocksdb::RocksDBMappingRepository::open(path)?),
        #[cfg(not(feature = "storage-rocksdb"))]
        StorageChoice::RocksDb(_) => Arc::new(in_memory::InMemoryMappingRepository::new()),
        StorageChoice::Unavailable(path) => {
            warn!(
                db_path = %path.display(),
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Arc::new(in_memory::InMemoryMappingRepository::new())
        }
    };
    Ok(repository)
}
