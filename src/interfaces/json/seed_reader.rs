use crate::domain::catalog::{
    ApplicationType, ApplicationTypeId, EntityKind, Process, ProcessId, Profession,
};
use crate::domain::mapping::{ProcessMappingEntry, commit_entries};
use crate::domain::ports::MappingRepository;
use crate::error::{MappingError, Result};
use crate::infrastructure::in_memory::InMemoryCatalog;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use tracing::info;

/// Catalog reference data plus the initial default sequences.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seed {
    #[serde(default)]
    pub application_types: Vec<ApplicationType>,
    #[serde(default)]
    pub processes: Vec<Process>,
    #[serde(default)]
    pub professions: Vec<Profession>,
    #[serde(default)]
    pub default_mappings: Vec<DefaultMappingSeed>,
}

/// Initial ordered screens of one application type.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultMappingSeed {
    pub application_type_id: ApplicationTypeId,
    pub process_ids: Vec<ProcessId>,
}

impl Seed {
    /// Parses a seed document and checks that every default mapping only
    /// references catalog records, each process at most once.
    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        let seed: Seed = serde_json::from_reader(source)?;
        seed.validate()?;
        Ok(seed)
    }

    pub fn catalog(&self) -> InMemoryCatalog {
        let builder = self
            .application_types
            .iter()
            .cloned()
            .fold(InMemoryCatalog::builder(), |b, t| b.application_type(t));
        let builder = self
            .processes
            .iter()
            .cloned()
            .fold(builder, |b, p| b.process(p));
        self.professions
            .iter()
            .cloned()
            .fold(builder, |b, p| b.profession(p))
            .build()
    }

    /// Writes the default mapping of every application type that has none yet.
    ///
    /// Returns how many defaults were written. Defaults already in the
    /// repository are left alone, even when they have been emptied since.
    pub async fn apply_defaults(&self, repository: &dyn MappingRepository) -> Result<usize> {
        let mut written = 0;
        for mapping in &self.default_mappings {
            if repository
                .has_default_mapping(mapping.application_type_id)
                .await?
            {
                continue;
            }
            let entries: Vec<ProcessMappingEntry> = commit_entries(&[], &mapping.process_ids);
            repository
                .put_default_mapping(mapping.application_type_id, entries)
                .await?;
            written += 1;
        }

        info!(written, "seeded default process mappings");
        Ok(written)
    }

    fn validate(&self) -> Result<()> {
        let application_types: HashSet<_> = self.application_types.iter().map(|t| t.id).collect();
        let processes: HashSet<_> = self.processes.iter().map(|p| p.id).collect();

        for mapping in &self.default_mappings {
            if !application_types.contains(&mapping.application_type_id) {
                return Err(MappingError::not_found(
                    EntityKind::ApplicationType,
                    mapping.application_type_id,
                ));
            }

            let mut seen = HashSet::new();
            for process_id in &mapping.process_ids {
                if !processes.contains(process_id) {
                    return Err(MappingError::not_found(EntityKind::Process, *process_id));
                }
                if !seen.insert(*process_id) {
                    return Err(MappingError::DuplicateProcess(*process_id));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::ProfessionId;
    use crate::domain::ports::CatalogStore;
    use crate::infrastructure::in_memory::InMemoryMappingRepository;

    const SEED: &str = r#"{
        "applicationTypes": [
            {"id": 1, "formCode": "PR", "name": "Permanent Registration"}
        ],
        "processes": [
            {"id": 1, "name": "Eligibility", "path": "/eligibility"},
            {"id": 2, "name": "Documents", "path": "/documents"}
        ],
        "professions": [{"id": 4, "name": "Nursing"}],
        "defaultMappings": [{"applicationTypeId": 1, "processIds": [2, 1]}]
    }"#;

    #[tokio::test]
    async fn test_seed_builds_catalog() {
        let seed = Seed::from_reader(SEED.as_bytes()).unwrap();
        let catalog = seed.catalog();

        assert!(catalog.profession(ProfessionId(4)).await.unwrap().is_some());
        assert_eq!(catalog.processes().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_apply_defaults_only_once() {
        let seed = Seed::from_reader(SEED.as_bytes()).unwrap();
        let repository = InMemoryMappingRepository::new();

        assert_eq!(seed.apply_defaults(&repository).await.unwrap(), 1);

        repository
            .put_default_mapping(ApplicationTypeId(1), Vec::new())
            .await
            .unwrap();
        assert_eq!(seed.apply_defaults(&repository).await.unwrap(), 0);
        assert!(repository
            .get_default_mapping(ApplicationTypeId(1))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_apply_defaults_numbers_in_listed_order() {
        let seed = Seed::from_reader(SEED.as_bytes()).unwrap();
        let repository = InMemoryMappingRepository::new();
        seed.apply_defaults(&repository).await.unwrap();

        let stored = repository
            .get_default_mapping(ApplicationTypeId(1))
            .await
            .unwrap();
        let order: Vec<(u32, u32)> = stored.iter().map(|e| (e.process_id.0, e.sequence)).collect();
        assert_eq!(order, vec![(2, 1), (1, 2)]);
    }

    #[test]
    fn test_seed_rejects_unknown_process() {
        let json = r#"{
            "applicationTypes": [{"id": 1, "formCode": "PR", "name": "PR"}],
            "defaultMappings": [{"applicationTypeId": 1, "processIds": [3]}]
        }"#;

        let err = Seed::from_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            MappingError::NotFound {
                kind: EntityKind::Process,
                id: 3
            }
        ));
    }

    #[test]
    fn test_seed_rejects_repeated_process() {
        let json = r#"{
            "applicationTypes": [{"id": 1, "formCode": "PR", "name": "PR"}],
            "processes": [{"id": 1, "name": "Eligibility", "path": "/eligibility"}],
            "defaultMappings": [{"applicationTypeId": 1, "processIds": [1, 1]}]
        }"#;

        let err = Seed::from_reader(json.as_bytes()).unwrap_err();
        assert!(matches!(err, MappingError::DuplicateProcess(ProcessId(1))));
    }

    #[test]
    fn test_seed_rejects_malformed_json() {
        let err = Seed::from_reader("{not json".as_bytes()).unwrap_err();
        assert!(matches!(err, MappingError::JsonError(_)));
    }
}
