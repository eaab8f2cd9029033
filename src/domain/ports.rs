use super::catalog::{
    ApplicationType, ApplicationTypeId, Process, ProcessId, Profession, ProfessionId,
};
use super::mapping::ProcessMappingEntry;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Read-only view of the reference data that mappings are built from.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn application_type(&self, id: ApplicationTypeId) -> Result<Option<ApplicationType>>;
    async fn process(&self, id: ProcessId) -> Result<Option<Process>>;
    async fn profession(&self, id: ProfessionId) -> Result<Option<Profession>>;
    async fn application_types(&self) -> Result<Vec<ApplicationType>>;
    async fn processes(&self) -> Result<Vec<Process>>;
    async fn professions(&self) -> Result<Vec<Profession>>;
}

/// Persistence contract for default and custom mapping lists.
///
/// Every `put_*`/`delete_*` call must replace or remove the whole list in
/// one step: a concurrent reader sees either the old list or the new one.
#[async_trait]
pub trait MappingRepository: Send + Sync {
    /// Returns the stored default list, or an empty list if none was seeded.
    async fn get_default_mapping(
        &self,
        application_type_id: ApplicationTypeId,
    ) -> Result<Vec<ProcessMappingEntry>>;

    async fn has_default_mapping(&self, application_type_id: ApplicationTypeId) -> Result<bool>;

    async fn get_custom_mapping(
        &self,
        application_type_id: ApplicationTypeId,
        profession_id: ProfessionId,
    ) -> Result<Option<Vec<ProcessMappingEntry>>>;

    /// Professions that carry a custom list for the application type, ascending.
    async fn list_custom_mappings(
        &self,
        application_type_id: ApplicationTypeId,
    ) -> Result<Vec<ProfessionId>>;

    async fn put_default_mapping(
        &self,
        application_type_id: ApplicationTypeId,
        entries: Vec<ProcessMappingEntry>,
    ) -> Result<()>;

    async fn put_custom_mapping(
        &self,
        application_type_id: ApplicationTypeId,
        profession_id: ProfessionId,
        entries: Vec<ProcessMappingEntry>,
    ) -> Result<()>;

    /// Removes a custom list. Returns whether one was present.
    async fn delete_custom_mapping(
        &self,
        application_type_id: ApplicationTypeId,
        profession_id: ProfessionId,
    ) -> Result<bool>;
}

pub type CatalogStoreRef = Arc<dyn CatalogStore>;
pub type MappingRepositoryRef = Arc<dyn MappingRepository>;
