#![allow(dead_code)]

use procmap::application::ResolutionEngine;
use procmap::domain::catalog::{
    ApplicationType, ApplicationTypeId, Process, ProcessId, Profession, ProfessionId,
};
use procmap::domain::mapping::{ProcessMappingEntry, ResolvedStep};
use procmap::domain::ports::MappingRepository;
use procmap::infrastructure::in_memory::{InMemoryCatalog, InMemoryMappingRepository};
use std::sync::Arc;

pub const PERMANENT: ApplicationTypeId = ApplicationTypeId(1);
pub const TEMPORARY: ApplicationTypeId = ApplicationTypeId(2);
pub const NURSING: ProfessionId = ProfessionId(10);
pub const PHARMACY: ProfessionId = ProfessionId(11);

pub const ELIGIBILITY: ProcessId = ProcessId(1);
pub const DOCUMENTS: ProcessId = ProcessId(2);
pub const PAYMENT: ProcessId = ProcessId(3);
pub const DECLARATION: ProcessId = ProcessId(4);

fn process(id: ProcessId, name: &str) -> Process {
    Process {
        id,
        name: name.to_string(),
        path: format!("/registration/{}", name.to_lowercase()),
    }
}

pub fn catalog() -> InMemoryCatalog {
    InMemoryCatalog::builder()
        .application_type(ApplicationType {
            id: PERMANENT,
            form_code: "PR".to_string(),
            name: "Permanent Registration".to_string(),
            description: String::new(),
        })
        .application_type(ApplicationType {
            id: TEMPORARY,
            form_code: "TR".to_string(),
            name: "Temporary Registration".to_string(),
            description: String::new(),
        })
        .process(process(ELIGIBILITY, "Eligibility"))
        .process(process(DOCUMENTS, "Documents"))
        .process(process(PAYMENT, "Payment"))
        .process(process(DECLARATION, "Declaration"))
        .profession(Profession {
            id: NURSING,
            name: "Nursing".to_string(),
        })
        .profession(Profession {
            id: PHARMACY,
            name: "Pharmacy".to_string(),
        })
        .build()
}

pub fn entries(processes: &[ProcessId]) -> Vec<ProcessMappingEntry> {
    processes
        .iter()
        .zip(1u32..)
        .map(|(id, sequence)| ProcessMappingEntry::new(*id, sequence))
        .collect()
}

/// Engine over the test catalog with Permanent Registration defaulting to
/// Eligibility, Documents, Payment.
pub async fn seeded_engine() -> (ResolutionEngine, Arc<InMemoryMappingRepository>) {
    let repository = Arc::new(InMemoryMappingRepository::new());
    repository
        .put_default_mapping(PERMANENT, entries(&[ELIGIBILITY, DOCUMENTS, PAYMENT]))
        .await
        .unwrap();
    repository
        .put_default_mapping(TEMPORARY, entries(&[ELIGIBILITY, PAYMENT]))
        .await
        .unwrap();

    let engine = ResolutionEngine::new(Arc::new(catalog()), repository.clone());
    (engine, repository)
}

pub fn named(steps: &[ResolvedStep]) -> Vec<(String, u32)> {
    steps
        .iter()
        .map(|step| (step.process.name.clone(), step.sequence))
        .collect()
}

pub fn expected(pairs: &[(&str, u32)]) -> Vec<(String, u32)> {
    pairs
        .iter()
        .map(|(name, sequence)| (name.to_string(), *sequence))
        .collect()
}

pub fn process_ids(steps: &[ResolvedStep]) -> Vec<ProcessId> {
    steps.iter().map(|step| step.process.id).collect()
}
