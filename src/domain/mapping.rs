use super::catalog::{ApplicationTypeId, Process, ProcessId, ProfessionId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a stored mapping row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingId(pub Uuid);

impl MappingId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MappingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One persisted row binding a process to a mapping context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMappingEntry {
    pub mapping_id: MappingId,
    pub process_id: ProcessId,
    /// 1-based position among the active entries of the list.
    pub sequence: u32,
    pub is_active: bool,
}

impl ProcessMappingEntry {
    pub fn new(process_id: ProcessId, sequence: u32) -> Self {
        Self {
            mapping_id: MappingId::generate(),
            process_id,
            sequence,
            is_active: true,
        }
    }
}

/// The key a mapping list is stored under.
///
/// `Default` lists are the fallback for every profession of an application
/// type; a `Custom` list overrides it for one profession.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MappingContext {
    Default {
        application_type_id: ApplicationTypeId,
    },
    Custom {
        application_type_id: ApplicationTypeId,
        profession_id: ProfessionId,
    },
}

impl MappingContext {
    pub fn for_request(
        application_type_id: ApplicationTypeId,
        profession_id: Option<ProfessionId>,
    ) -> Self {
        match profession_id {
            Some(profession_id) => Self::Custom {
                application_type_id,
                profession_id,
            },
            None => Self::Default {
                application_type_id,
            },
        }
    }

    pub fn application_type_id(&self) -> ApplicationTypeId {
        match self {
            Self::Default {
                application_type_id,
            }
            | Self::Custom {
                application_type_id,
                ..
            } => *application_type_id,
        }
    }

    pub fn profession_id(&self) -> Option<ProfessionId> {
        match self {
            Self::Default { .. } => None,
            Self::Custom { profession_id, .. } => Some(*profession_id),
        }
    }
}

impl fmt::Display for MappingContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default {
                application_type_id,
            } => write!(f, "default mapping of application type {application_type_id}"),
            Self::Custom {
                application_type_id,
                profession_id,
            } => write!(
                f,
                "custom mapping of application type {application_type_id} for profession {profession_id}"
            ),
        }
    }
}

/// A process together with its display position in a resolved sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedStep {
    pub process: Process,
    pub sequence: u32,
}

/// Returns the active entries of a stored list in sequence order.
///
/// The sort is stable so entries sharing a stored sequence keep their
/// storage order.
pub fn active_in_order(entries: &[ProcessMappingEntry]) -> Vec<&ProcessMappingEntry> {
    let mut active: Vec<&ProcessMappingEntry> = entries.iter().filter(|e| e.is_active).collect();
    active.sort_by_key(|e| e.sequence);
    active
}

/// Builds the entry set that replaces `previous` once `order` is committed.
///
/// Processes already known to the list keep their `mapping_id`, including
/// ones that were soft-deleted and are now being re-added. Processes missing
/// from `order` stay behind as inactive rows with their last sequence.
pub fn commit_entries(
    previous: &[ProcessMappingEntry],
    order: &[ProcessId],
) -> Vec<ProcessMappingEntry> {
    let mut known: HashMap<ProcessId, &ProcessMappingEntry> = HashMap::new();
    for entry in previous {
        // Prefer the active row when history holds more than one for a process.
        known
            .entry(entry.process_id)
            .and_modify(|existing| {
                if entry.is_active && !existing.is_active {
                    *existing = entry;
                }
            })
            .or_insert(entry);
    }

    let mut committed: Vec<ProcessMappingEntry> = order
        .iter()
        .zip(1u32..)
        .map(|(process_id, sequence)| ProcessMappingEntry {
            mapping_id: known
                .get(process_id)
                .map(|entry| entry.mapping_id)
                .unwrap_or_else(MappingId::generate),
            process_id: *process_id,
            sequence,
            is_active: true,
        })
        .collect();

    let retired = known
        .values()
        .filter(|entry| !order.contains(&entry.process_id))
        .map(|entry| ProcessMappingEntry {
            is_active: false,
            ..(*entry).clone()
        });
    let mut retired: Vec<ProcessMappingEntry> = retired.collect();
    retired.sort_by_key(|entry| (entry.sequence, entry.process_id));
    committed.extend(retired);

    committed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(process: u32, sequence: u32, is_active: bool) -> ProcessMappingEntry {
        ProcessMappingEntry {
            is_active,
            ..ProcessMappingEntry::new(ProcessId(process), sequence)
        }
    }

    #[test]
    fn test_active_in_order_skips_inactive_rows() {
        let entries = vec![entry(3, 5, true), entry(1, 1, true), entry(2, 2, false)];

        let ordered: Vec<u32> = active_in_order(&entries)
            .iter()
            .map(|e| e.process_id.0)
            .collect();

        assert_eq!(ordered, vec![1, 3]);
    }

    #[test]
    fn test_commit_entries_renumbers_densely() {
        let previous = vec![entry(1, 1, true), entry(2, 4, true), entry(3, 9, true)];

        let committed = commit_entries(&previous, &[ProcessId(3), ProcessId(1), ProcessId(2)]);

        let active: Vec<(u32, u32)> = committed
            .iter()
            .filter(|e| e.is_active)
            .map(|e| (e.process_id.0, e.sequence))
            .collect();
        assert_eq!(active, vec![(3, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_commit_entries_keeps_dropped_rows_inactive() {
        let previous = vec![entry(1, 1, true), entry(2, 2, true), entry(3, 3, true)];

        let committed = commit_entries(&previous, &[ProcessId(1), ProcessId(3)]);

        let dropped = committed
            .iter()
            .find(|e| e.process_id == ProcessId(2))
            .unwrap();
        assert!(!dropped.is_active);
        assert_eq!(dropped.mapping_id, previous[1].mapping_id);
        assert_eq!(committed.len(), 3);
    }

    #[test]
    fn test_commit_entries_reactivates_soft_deleted_row() {
        let previous = vec![entry(1, 1, true), entry(2, 2, false)];

        let committed = commit_entries(&previous, &[ProcessId(2), ProcessId(1)]);

        assert_eq!(committed.len(), 2);
        assert_eq!(committed[0].mapping_id, previous[1].mapping_id);
        assert!(committed[0].is_active);
        assert_eq!(committed[0].sequence, 1);
    }

    #[test]
    fn test_commit_entries_generates_ids_for_new_processes() {
        let committed = commit_entries(&[], &[ProcessId(8)]);

        assert_eq!(committed.len(), 1);
        assert_eq!(committed[0].sequence, 1);
        assert!(committed[0].is_active);
    }

    #[test]
    fn test_context_display() {
        let context = MappingContext::for_request(ApplicationTypeId(1), Some(ProfessionId(2)));
        assert_eq!(
            context.to_string(),
            "custom mapping of application type 1 for profession 2"
        );
        assert_eq!(context.profession_id(), Some(ProfessionId(2)));
    }
}
