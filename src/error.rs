use crate::domain::catalog::{EntityKind, ProcessId};
use crate::domain::mapping::MappingContext;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MappingError {
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: u32 },
    #[error("{context} is inconsistent with the catalog: {fault}")]
    Integrity {
        context: MappingContext,
        fault: IntegrityFault,
    },
    #[error("process {0} is already part of the draft")]
    DuplicateProcess(ProcessId),
    #[error("invalid reorder: {0}")]
    InvalidReorder(ReorderFault),
    #[error("no custom mapping to reset for {0}")]
    NoOverrideToReset(MappingContext),
    #[error("no draft is open; call begin_edit first")]
    NotEditing,
    #[error("a draft is already open for {0}")]
    AlreadyEditing(MappingContext),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    StorageError(#[from] rocksdb::Error),
    #[error("Storage error: {0}")]
    InternalError(String),
}

/// Why a stored mapping list cannot be resolved.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityFault {
    #[error("process {0} is not in the catalog")]
    MissingProcess(ProcessId),
    #[error("process {0} appears more than once among active entries")]
    RepeatedProcess(ProcessId),
}

/// Why a requested order is not a permutation of the draft.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderFault {
    #[error("process {0} is missing from the new order")]
    Missing(ProcessId),
    #[error("process {0} is not part of the draft")]
    Unexpected(ProcessId),
    #[error("process {0} is listed more than once")]
    Repeated(ProcessId),
}

impl MappingError {
    pub fn not_found(kind: EntityKind, id: impl Into<u32>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MappingError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{ApplicationTypeId, ProfessionId};

    #[test]
    fn test_error_messages_name_the_offending_record() {
        let err = MappingError::not_found(EntityKind::ApplicationType, 9u32);
        assert_eq!(err.to_string(), "application type 9 not found");

        let context = MappingContext::Custom {
            application_type_id: ApplicationTypeId(1),
            profession_id: ProfessionId(2),
        };
        let err = MappingError::Integrity {
            context,
            fault: IntegrityFault::MissingProcess(ProcessId(5)),
        };
        assert!(err.to_string().contains("process 5 is not in the catalog"));

        let err = MappingError::InvalidReorder(ReorderFault::Missing(ProcessId(3)));
        assert_eq!(
            err.to_string(),
            "invalid reorder: process 3 is missing from the new order"
        );
    }
}
