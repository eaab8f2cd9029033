use super::resolver::ResolutionEngine;
use crate::domain::catalog::{EntityKind, Process, ProcessId};
use crate::domain::mapping::{MappingContext, ResolvedStep, commit_entries};
use crate::error::{MappingError, ReorderFault, Result};
use std::collections::HashSet;
use tracing::info;

/// An in-session working copy of a mapping list.
///
/// Every mutation leaves the steps numbered `1..=len` in list order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    steps: Vec<ResolvedStep>,
}

impl Draft {
    pub fn from_resolved(steps: Vec<ResolvedStep>) -> Self {
        let mut draft = Self { steps };
        draft.renumber();
        draft
    }

    pub fn steps(&self) -> &[ResolvedStep] {
        &self.steps
    }

    pub fn process_ids(&self) -> Vec<ProcessId> {
        self.steps.iter().map(|step| step.process.id).collect()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn contains(&self, process_id: ProcessId) -> bool {
        self.steps.iter().any(|step| step.process.id == process_id)
    }

    /// Replaces the order wholesale. `new_order` must be a permutation of the
    /// draft's process ids; otherwise the draft is left untouched.
    pub fn reorder(&mut self, new_order: &[ProcessId]) -> Result<()> {
        let current: HashSet<ProcessId> = self.steps.iter().map(|s| s.process.id).collect();
        let mut seen = HashSet::with_capacity(new_order.len());

        for id in new_order {
            if !current.contains(id) {
                return Err(MappingError::InvalidReorder(ReorderFault::Unexpected(*id)));
            }
            if !seen.insert(*id) {
                return Err(MappingError::InvalidReorder(ReorderFault::Repeated(*id)));
            }
        }
        if let Some(missing) = self.steps.iter().find(|s| !seen.contains(&s.process.id)) {
            return Err(MappingError::InvalidReorder(ReorderFault::Missing(
                missing.process.id,
            )));
        }

        let mut remaining = std::mem::take(&mut self.steps);
        for id in new_order {
            if let Some(index) = remaining.iter().position(|s| s.process.id == *id) {
                self.steps.push(remaining.swap_remove(index));
            }
        }
        self.renumber();
        Ok(())
    }

    pub fn append(&mut self, process: Process) -> Result<()> {
        if self.contains(process.id) {
            return Err(MappingError::DuplicateProcess(process.id));
        }
        let sequence = self.next_sequence();
        self.steps.push(ResolvedStep { process, sequence });
        Ok(())
    }

    /// Removes a process and closes the gap it leaves behind.
    pub fn remove(&mut self, process_id: ProcessId) -> Result<Process> {
        let index = self
            .steps
            .iter()
            .position(|step| step.process.id == process_id)
            .ok_or_else(|| MappingError::not_found(EntityKind::Process, process_id))?;

        let removed = self.steps.remove(index);
        self.renumber();
        Ok(removed.process)
    }

    fn next_sequence(&self) -> u32 {
        u32::try_from(self.steps.len()).map_or(u32::MAX, |len| len.saturating_add(1))
    }

    fn renumber(&mut self) {
        for (step, sequence) in self.steps.iter_mut().zip(1u32..) {
            step.sequence = sequence;
        }
    }
}

/// Edit session over one mapping context.
///
/// The editor starts out viewing the committed list. `begin_edit` clones it
/// into a [`Draft`]; `save` persists the draft and makes it the new committed
/// list, `cancel` throws it away. Nothing reaches the repository until `save`
/// or `reset`.
pub struct DraftEditor {
    engine: ResolutionEngine,
    context: MappingContext,
    committed: Vec<ResolvedStep>,
    draft: Option<Draft>,
}

impl DraftEditor {
    /// Opens a viewing session, resolving the list currently in effect for `context`.
    ///
    /// For a custom context without an override this is the default list.
    pub async fn open(engine: ResolutionEngine, context: MappingContext) -> Result<Self> {
        let committed = match engine.resolve_context(context).await? {
            Some(steps) => steps,
            None => {
                engine
                    .resolve(context.application_type_id(), context.profession_id())
                    .await?
            }
        };
        Ok(Self {
            engine,
            context,
            committed,
            draft: None,
        })
    }

    pub fn context(&self) -> MappingContext {
        self.context
    }

    /// The last committed list, as shown while viewing.
    pub fn committed(&self) -> &[ResolvedStep] {
        &self.committed
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    pub fn begin_edit(&mut self) -> Result<&Draft> {
        if self.draft.is_some() {
            return Err(MappingError::AlreadyEditing(self.context));
        }
        Ok(self
            .draft
            .insert(Draft::from_resolved(self.committed.clone())))
    }

    pub fn reorder(&mut self, new_order: &[ProcessId]) -> Result<()> {
        self.draft_mut()?.reorder(new_order)
    }

    /// Appends a catalog process to the end of the draft.
    pub async fn append(&mut self, process_id: ProcessId) -> Result<()> {
        if self.draft_mut()?.contains(process_id) {
            return Err(MappingError::DuplicateProcess(process_id));
        }

        let process = self
            .engine
            .catalog()
            .process(process_id)
            .await?
            .ok_or_else(|| MappingError::not_found(EntityKind::Process, process_id))?;

        self.draft_mut()?.append(process)
    }

    pub fn remove(&mut self, process_id: ProcessId) -> Result<()> {
        self.draft_mut()?.remove(process_id).map(|_| ())
    }

    /// Discards the draft, if any. The committed list is unchanged.
    pub fn cancel(&mut self) {
        self.draft = None;
    }

    /// Persists the draft for this context and returns the new committed list.
    ///
    /// If the write fails the draft stays open so the caller can retry or
    /// cancel. Once the list is written the draft is closed, even when
    /// re-resolving the new list then fails.
    pub async fn save(&mut self) -> Result<&[ResolvedStep]> {
        let order = self
            .draft
            .as_ref()
            .ok_or(MappingError::NotEditing)?
            .process_ids();

        let previous = self
            .engine
            .stored_entries(self.context)
            .await?
            .unwrap_or_default();
        let entries = commit_entries(&previous, &order);

        let repository = self.engine.repository();
        match self.context {
            MappingContext::Default {
                application_type_id,
            } => {
                repository
                    .put_default_mapping(application_type_id, entries)
                    .await?
            }
            MappingContext::Custom {
                application_type_id,
                profession_id,
            } => {
                repository
                    .put_custom_mapping(application_type_id, profession_id, entries)
                    .await?
            }
        }
        self.draft = None;
        info!(context = %self.context, steps = order.len(), "saved process mapping");

        self.committed = self
            .engine
            .resolve(
                self.context.application_type_id(),
                self.context.profession_id(),
            )
            .await?;
        Ok(&self.committed)
    }

    /// Deletes the custom mapping so the context falls back to the default list.
    ///
    /// Any open draft is discarded once the override is gone.
    pub async fn reset(&mut self) -> Result<&[ResolvedStep]> {
        let MappingContext::Custom {
            application_type_id,
            profession_id,
        } = self.context
        else {
            return Err(MappingError::NoOverrideToReset(self.context));
        };

        let deleted = self
            .engine
            .repository()
            .delete_custom_mapping(application_type_id, profession_id)
            .await?;
        if !deleted {
            return Err(MappingError::NoOverrideToReset(self.context));
        }
        self.draft = None;
        info!(context = %self.context, "reset process mapping to default");

        self.committed = self
            .engine
            .resolve(application_type_id, Some(profession_id))
            .await?;
        Ok(&self.committed)
    }

    fn draft_mut(&mut self) -> Result<&mut Draft> {
        self.draft.as_mut().ok_or(MappingError::NotEditing)
    }
}
