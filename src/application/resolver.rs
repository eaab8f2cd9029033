use crate::domain::catalog::{
    ApplicationType, ApplicationTypeId, EntityKind, Process, Profession, ProfessionId,
};
use crate::domain::mapping::{MappingContext, ProcessMappingEntry, ResolvedStep, active_in_order};
use crate::domain::ports::{CatalogStoreRef, MappingRepositoryRef};
use crate::error::{IntegrityFault, MappingError, Result};
use std::collections::HashSet;
use tracing::{debug, error};

/// Computes the effective screen sequence for an application context.
///
/// A custom mapping for `(application type, profession)` takes precedence over
/// the application type's default mapping. Resolution is read-only, so the
/// engine can be cloned freely and shared across tasks.
#[derive(Clone)]
pub struct ResolutionEngine {
    catalog: CatalogStoreRef,
    repository: MappingRepositoryRef,
}

impl ResolutionEngine {
    /// Creates a new `ResolutionEngine` over the given stores.
    ///
    /// # Arguments
    ///
    /// * `catalog` - Source of application types, processes, and professions.
    /// * `repository` - Storage for default and custom mapping lists.
    pub fn new(catalog: CatalogStoreRef, repository: MappingRepositoryRef) -> Self {
        Self {
            catalog,
            repository,
        }
    }

    pub fn catalog(&self) -> &CatalogStoreRef {
        &self.catalog
    }

    pub fn repository(&self) -> &MappingRepositoryRef {
        &self.repository
    }

    /// Resolves the ordered process list for an application type and optional profession.
    ///
    /// Sequence numbers in the result are always the dense `1..=N` numbering of
    /// the active entries, whatever the stored sequence values are.
    pub async fn resolve(
        &self,
        application_type_id: ApplicationTypeId,
        profession_id: Option<ProfessionId>,
    ) -> Result<Vec<ResolvedStep>> {
        self.require_application_type(application_type_id).await?;

        if let Some(profession_id) = profession_id {
            self.require_profession(profession_id).await?;
            if let Some(entries) = self
                .repository
                .get_custom_mapping(application_type_id, profession_id)
                .await?
            {
                let context = MappingContext::Custom {
                    application_type_id,
                    profession_id,
                };
                return self.materialize(context, &entries).await;
            }
        }

        let entries = self
            .repository
            .get_default_mapping(application_type_id)
            .await?;
        let context = MappingContext::Default {
            application_type_id,
        };
        self.materialize(context, &entries).await
    }

    /// Resolves exactly the list stored for `context`, without falling back.
    ///
    /// Returns `None` for a custom context that has no override.
    pub async fn resolve_context(
        &self,
        context: MappingContext,
    ) -> Result<Option<Vec<ResolvedStep>>> {
        self.require_application_type(context.application_type_id())
            .await?;
        if let Some(profession_id) = context.profession_id() {
            self.require_profession(profession_id).await?;
        }

        match self.stored_entries(context).await? {
            Some(entries) => Ok(Some(self.materialize(context, &entries).await?)),
            None => Ok(None),
        }
    }

    /// Raw stored rows for a context, inactive history included.
    pub async fn stored_entries(
        &self,
        context: MappingContext,
    ) -> Result<Option<Vec<ProcessMappingEntry>>> {
        match context {
            MappingContext::Default {
                application_type_id,
            } => Ok(Some(
                self.repository
                    .get_default_mapping(application_type_id)
                    .await?,
            )),
            MappingContext::Custom {
                application_type_id,
                profession_id,
            } => {
                self.repository
                    .get_custom_mapping(application_type_id, profession_id)
                    .await
            }
        }
    }

    pub async fn has_override(
        &self,
        application_type_id: ApplicationTypeId,
        profession_id: ProfessionId,
    ) -> Result<bool> {
        Ok(self
            .repository
            .get_custom_mapping(application_type_id, profession_id)
            .await?
            .is_some())
    }

    /// Professions that no longer follow the default sequence of an application type.
    pub async fn overridden_professions(
        &self,
        application_type_id: ApplicationTypeId,
    ) -> Result<Vec<Profession>> {
        self.require_application_type(application_type_id).await?;

        let ids = self
            .repository
            .list_custom_mappings(application_type_id)
            .await?;
        let mut professions = Vec::with_capacity(ids.len());
        for id in ids {
            professions.push(self.require_profession(id).await?);
        }
        Ok(professions)
    }

    /// Catalog processes that can still be appended to the list resolved for `context`.
    pub async fn available_processes(&self, context: MappingContext) -> Result<Vec<Process>> {
        let resolved = self
            .resolve(context.application_type_id(), context.profession_id())
            .await?;
        let used: HashSet<_> = resolved.iter().map(|step| step.process.id).collect();

        let mut available: Vec<Process> = self
            .catalog
            .processes()
            .await?
            .into_iter()
            .filter(|process| !used.contains(&process.id))
            .collect();
        available.sort_by_key(|process| process.id);
        Ok(available)
    }

    async fn require_application_type(
        &self,
        id: ApplicationTypeId,
    ) -> Result<ApplicationType> {
        self.catalog
            .application_type(id)
            .await?
            .ok_or_else(|| MappingError::not_found(EntityKind::ApplicationType, id))
    }

    async fn require_profession(&self, id: ProfessionId) -> Result<Profession> {
        self.catalog
            .profession(id)
            .await?
            .ok_or_else(|| MappingError::not_found(EntityKind::Profession, id))
    }

    async fn materialize(
        &self,
        context: MappingContext,
        entries: &[ProcessMappingEntry],
    ) -> Result<Vec<ResolvedStep>> {
        let active = active_in_order(entries);
        let mut seen = HashSet::with_capacity(active.len());
        let mut steps = Vec::with_capacity(active.len());

        for (entry, sequence) in active.into_iter().zip(1u32..) {
            if !seen.insert(entry.process_id) {
                return Err(integrity_violation(
                    context,
                    IntegrityFault::RepeatedProcess(entry.process_id),
                ));
            }

            let process = self.catalog.process(entry.process_id).await?.ok_or_else(|| {
                integrity_violation(context, IntegrityFault::MissingProcess(entry.process_id))
            })?;
            steps.push(ResolvedStep { process, sequence });
        }

        debug!(%context, steps = steps.len(), "resolved process mapping");
        Ok(steps)
    }
}

fn integrity_violation(context: MappingContext, fault: IntegrityFault) -> MappingError {
    error!(%context, %fault, "process mapping has drifted from the catalog");
    MappingError::Integrity { context, fault }
}
