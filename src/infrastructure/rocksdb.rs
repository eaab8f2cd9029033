use crate::domain::catalog::{ApplicationTypeId, ProfessionId};
use crate::domain::mapping::ProcessMappingEntry;
use crate::domain::ports::MappingRepository;
use crate::error::{MappingError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Direction, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for default mapping lists, keyed by application type.
pub const CF_DEFAULT_MAPPINGS: &str = "default_mappings";
/// Column Family for custom mapping lists, keyed by application type then profession.
pub const CF_CUSTOM_MAPPINGS: &str = "custom_mappings";

/// A persistent mapping repository using RocksDB.
///
/// Each mapping list is stored as a single JSON value, so replacing or
/// deleting a list is one key write and never exposes a half-written list.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBMappingRepository {
    db: Arc<DB>,
}

impl RocksDBMappingRepository {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that both mapping column families exist.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_defaults = ColumnFamilyDescriptor::new(CF_DEFAULT_MAPPINGS, Options::default());
        let cf_customs = ColumnFamilyDescriptor::new(CF_CUSTOM_MAPPINGS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_defaults, cf_customs])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn handle(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| MappingError::InternalError(format!("{name} column family not found")))
    }

    fn read_list(&self, name: &str, key: &[u8]) -> Result<Option<Vec<ProcessMappingEntry>>> {
        let cf = self.handle(name)?;
        match self.db.get_pinned_cf(cf, key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write_list(&self, name: &str, key: &[u8], entries: &[ProcessMappingEntry]) -> Result<()> {
        let cf = self.handle(name)?;
        let value = serde_json::to_vec(entries)?;
        self.db.put_cf(cf, key, value)?;
        Ok(())
    }
}

fn default_key(application_type_id: ApplicationTypeId) -> [u8; 4] {
    application_type_id.0.to_be_bytes()
}

fn custom_key(application_type_id: ApplicationTypeId, profession_id: ProfessionId) -> [u8; 8] {
    let mut key = [0u8; 8];
    key[..4].copy_from_slice(&application_type_id.0.to_be_bytes());
    key[4..].copy_from_slice(&profession_id.0.to_be_bytes());
    key
}

#[async_trait]
impl MappingRepository for RocksDBMappingRepository {
    async fn get_default_mapping(
        &self,
        application_type_id: ApplicationTypeId,
    ) -> Result<Vec<ProcessMappingEntry>> {
        Ok(self
            .read_list(CF_DEFAULT_MAPPINGS, &default_key(application_type_id))?
            .unwrap_or_default())
    }

    async fn has_default_mapping(&self, application_type_id: ApplicationTypeId) -> Result<bool> {
        let cf = self.handle(CF_DEFAULT_MAPPINGS)?;
        // Just check if the key exists without decoding the value
        let result = self
            .db
            .get_pinned_cf(cf, default_key(application_type_id))?;
        Ok(result.is_some())
    }

    async fn get_custom_mapping(
        &self,
        application_type_id: ApplicationTypeId,
        profession_id: ProfessionId,
    ) -> Result<Option<Vec<ProcessMappingEntry>>> {
        self.read_list(
            CF_CUSTOM_MAPPINGS,
            &custom_key(application_type_id, profession_id),
        )
    }

    async fn list_custom_mappings(
        &self,
        application_type_id: ApplicationTypeId,
    ) -> Result<Vec<ProfessionId>> {
        let cf = self.handle(CF_CUSTOM_MAPPINGS)?;
        let prefix = default_key(application_type_id);

        let mut professions = Vec::new();
        let iter = self
            .db
            .iterator_cf(cf, IteratorMode::From(&prefix, Direction::Forward));

        for item in iter {
            let (key, _value) = item?;
            if !key.starts_with(&prefix) {
                break;
            }
            let suffix: [u8; 4] = key[4..].try_into().map_err(|_| {
                MappingError::InternalError(format!(
                    "malformed custom mapping key of {} bytes",
                    key.len()
                ))
            })?;
            professions.push(ProfessionId(u32::from_be_bytes(suffix)));
        }

        Ok(professions)
    }

    async fn put_default_mapping(
        &self,
        application_type_id: ApplicationTypeId,
        entries: Vec<ProcessMappingEntry>,
    ) -> Result<()> {
        self.write_list(
            CF_DEFAULT_MAPPINGS,
            &default_key(application_type_id),
            &entries,
        )
    }

    async fn put_custom_mapping(
        &self,
        application_type_id: ApplicationTypeId,
        profession_id: ProfessionId,
        entries: Vec<ProcessMappingEntry>,
    ) -> Result<()> {
        self.write_list(
            CF_CUSTOM_MAPPINGS,
            &custom_key(application_type_id, profession_id),
            &entries,
        )
    }

    async fn delete_custom_mapping(
        &self,
        application_type_id: ApplicationTypeId,
        profession_id: ProfessionId,
    ) -> Result<bool> {
        let cf = self.handle(CF_CUSTOM_MAPPINGS)?;
        let key = custom_key(application_type_id, profession_id);

        let existed = self.db.get_pinned_cf(cf, key)?.is_some();
        if existed {
            self.db.delete_cf(cf, key)?;
        }
        Ok(existed)
    }
}
