mod common;

use common::*;
use procmap::domain::ports::{CatalogStoreRef, MappingRepositoryRef};
use procmap::infrastructure::in_memory::InMemoryMappingRepository;
use std::sync::Arc;

#[tokio::test]
async fn test_stores_as_trait_objects() {
    let catalog: CatalogStoreRef = Arc::new(catalog());
    let repository: MappingRepositoryRef = Arc::new(InMemoryMappingRepository::new());

    // Verify Send + Sync by spawning tasks
    let writer = repository.clone();
    let write_handle = tokio::spawn(async move {
        writer
            .put_custom_mapping(PERMANENT, NURSING, entries(&[PAYMENT, ELIGIBILITY]))
            .await
            .unwrap();
        writer.list_custom_mappings(PERMANENT).await.unwrap()
    });

    let catalog_handle = tokio::spawn(async move {
        catalog.process(PAYMENT).await.unwrap().unwrap()
    });

    assert_eq!(write_handle.await.unwrap(), vec![NURSING]);
    assert_eq!(catalog_handle.await.unwrap().name, "Payment");

    let stored = repository
        .get_custom_mapping(PERMANENT, NURSING)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.len(), 2);
}
