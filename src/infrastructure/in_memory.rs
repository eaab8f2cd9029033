use crate::domain::catalog::{
    ApplicationType, ApplicationTypeId, Process, ProcessId, Profession, ProfessionId,
};
use crate::domain::mapping::ProcessMappingEntry;
use crate::domain::ports::{CatalogStore, MappingRepository};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// An immutable in-memory catalog of application types, processes, and professions.
///
/// Cloning shares the underlying maps.
#[derive(Default, Clone)]
pub struct InMemoryCatalog {
    inner: Arc<CatalogTables>,
}

#[derive(Default)]
struct CatalogTables {
    application_types: HashMap<ApplicationTypeId, ApplicationType>,
    processes: HashMap<ProcessId, Process>,
    professions: HashMap<ProfessionId, Profession>,
}

impl InMemoryCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }
}

/// Collects catalog records before freezing them into an [`InMemoryCatalog`].
///
/// A record added twice under the same id replaces the earlier one.
#[derive(Default)]
pub struct CatalogBuilder {
    tables: CatalogTables,
}

impl CatalogBuilder {
    pub fn application_type(mut self, application_type: ApplicationType) -> Self {
        self.tables
            .application_types
            .insert(application_type.id, application_type);
        self
    }

    pub fn process(mut self, process: Process) -> Self {
        self.tables.processes.insert(process.id, process);
        self
    }

    pub fn profession(mut self, profession: Profession) -> Self {
        self.tables.professions.insert(profession.id, profession);
        self
    }

    pub fn build(self) -> InMemoryCatalog {
        InMemoryCatalog {
            inner: Arc::new(self.tables),
        }
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn application_type(&self, id: ApplicationTypeId) -> Result<Option<ApplicationType>> {
        Ok(self.inner.application_types.get(&id).cloned())
    }

    async fn process(&self, id: ProcessId) -> Result<Option<Process>> {
        Ok(self.inner.processes.get(&id).cloned())
    }

    async fn profession(&self, id: ProfessionId) -> Result<Option<Profession>> {
        Ok(self.inner.professions.get(&id).cloned())
    }

    async fn application_types(&self) -> Result<Vec<ApplicationType>> {
        let mut all: Vec<_> = self.inner.application_types.values().cloned().collect();
        all.sort_by_key(|application_type| application_type.id);
        Ok(all)
    }

    async fn processes(&self) -> Result<Vec<Process>> {
        let mut all: Vec<_> = self.inner.processes.values().cloned().collect();
        all.sort_by_key(|process| process.id);
        Ok(all)
    }

    async fn professions(&self) -> Result<Vec<Profession>> {
        let mut all: Vec<_> = self.inner.professions.values().cloned().collect();
        all.sort_by_key(|profession| profession.id);
        Ok(all)
    }
}

/// A thread-safe in-memory store for mapping lists.
///
/// Both kinds of list live behind one `RwLock`, so each write swaps a whole
/// list while readers wait. Ideal for tests or single-run command lines.
#[derive(Default, Clone)]
pub struct InMemoryMappingRepository {
    tables: Arc<RwLock<MappingTables>>,
}

#[derive(Default)]
struct MappingTables {
    defaults: HashMap<ApplicationTypeId, Vec<ProcessMappingEntry>>,
    customs: BTreeMap<(ApplicationTypeId, ProfessionId), Vec<ProcessMappingEntry>>,
}

impl InMemoryMappingRepository {
    /// Creates a new, empty in-memory mapping repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MappingRepository for InMemoryMappingRepository {
    async fn get_default_mapping(
        &self,
        application_type_id: ApplicationTypeId,
    ) -> Result<Vec<ProcessMappingEntry>> {
        let tables = self.tables.read().await;
        Ok(tables
            .defaults
            .get(&application_type_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn has_default_mapping(&self, application_type_id: ApplicationTypeId) -> Result<bool> {
        let tables = self.tables.read().await;
        Ok(tables.defaults.contains_key(&application_type_id))
    }

    async fn get_custom_mapping(
        &self,
        application_type_id: ApplicationTypeId,
        profession_id: ProfessionId,
    ) -> Result<Option<Vec<ProcessMappingEntry>>> {
        let tables = self.tables.read().await;
        Ok(tables
            .customs
            .get(&(application_type_id, profession_id))
            .cloned())
    }

    async fn list_custom_mappings(
        &self,
        application_type_id: ApplicationTypeId,
    ) -> Result<Vec<ProfessionId>> {
        let tables = self.tables.read().await;
        Ok(tables
            .customs
            .keys()
            .filter(|(application_type, _)| *application_type == application_type_id)
            .map(|(_, profession)| *profession)
            .collect())
    }

    async fn put_default_mapping(
        &self,
        application_type_id: ApplicationTypeId,
        entries: Vec<ProcessMappingEntry>,
    ) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.defaults.insert(application_type_id, entries);
        Ok(())
    }

    async fn put_custom_mapping(
        &self,
        application_type_id: ApplicationTypeId,
        profession_id: ProfessionId,
        entries: Vec<ProcessMappingEntry>,
    ) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables
            .customs
            .insert((application_type_id, profession_id), entries);
        Ok(())
    }

    async fn delete_custom_mapping(
        &self,
        application_type_id: ApplicationTypeId,
        profession_id: ProfessionId,
    ) -> Result<bool> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .customs
            .remove(&(application_type_id, profession_id))
            .is_some())
    }
}
