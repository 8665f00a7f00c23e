//! Session CRUD gateway.
//!
//! Each operation validates locally, issues one REST call, and on success
//! invalidates the agenda and camp queries so the next read re-fetches.
//! Local state is never patched speculatively.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::AgendaApi;
use crate::cache::{QueryCache, QueryKey};
use crate::error::AgendaError;
use crate::models::{AgendaItem, SessionDraft};

use super::copy::{CopyOutcome, CopySelection};
use super::export::{build_agenda_csv, ExportOutcome};
use super::store::fetch_references;
use super::validator::validate_session;

/// Prompt shown before deleting a session. Confirming it is the only way to
/// obtain a [`ConfirmedDelete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirmation {
    session_id: i64,
    title: String,
    time_range: String,
}

impl DeleteConfirmation {
    pub fn for_item(item: &AgendaItem) -> Self {
        Self {
            session_id: item.id,
            title: item.title.clone(),
            time_range: item.time_range(),
        }
    }

    pub fn session_id(&self) -> i64 {
        self.session_id
    }

    /// "Delete "Warmup" (08:00 - 08:30)?"
    pub fn prompt(&self) -> String {
        format!("Delete \"{}\" ({})?", self.title, self.time_range)
    }

    pub fn confirm(self) -> ConfirmedDelete {
        ConfirmedDelete {
            session_id: self.session_id,
        }
    }
}

/// An operator-confirmed delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmedDelete {
    session_id: i64,
}

impl ConfirmedDelete {
    pub fn session_id(&self) -> i64 {
        self.session_id
    }
}

#[derive(Clone)]
pub struct SessionGateway<A> {
    api: A,
    cache: Arc<QueryCache>,
}

impl<A: AgendaApi> SessionGateway<A> {
    pub fn new(api: A, cache: Arc<QueryCache>) -> Self {
        Self { api, cache }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    fn invalidate_agenda(&self, camp_id: i64) {
        self.cache.invalidate_all(&QueryKey::agenda_mutation(camp_id));
    }

    /// Create a session on `day`. Not idempotent: repeating the call creates
    /// a second session.
    pub async fn add_session(
        &self,
        camp_id: i64,
        day: u32,
        draft: &SessionDraft,
    ) -> Result<AgendaItem, AgendaError> {
        validate_session(draft)?;
        let body = draft.with_day(day);
        info!(camp_id, day, title = %body.title, "Adding session");
        let created = self
            .api
            .create_session(camp_id, &body)
            .await
            .inspect_err(|e| warn!(camp_id, error = %e, "Add session failed"))?;
        self.invalidate_agenda(camp_id);
        debug!(camp_id, session_id = created.id, "Session added");
        Ok(created)
    }

    pub async fn update_session(
        &self,
        camp_id: i64,
        session_id: i64,
        draft: &SessionDraft,
    ) -> Result<AgendaItem, AgendaError> {
        validate_session(draft)?;
        info!(camp_id, session_id, "Updating session");
        let updated = self
            .api
            .update_session(camp_id, session_id, draft)
            .await
            .inspect_err(|e| warn!(camp_id, session_id, error = %e, "Update session failed"))?;
        self.invalidate_agenda(camp_id);
        Ok(updated)
    }

    /// Delete a confirmed session. A session already gone on the server
    /// counts as deleted.
    pub async fn delete_session(
        &self,
        camp_id: i64,
        confirmed: ConfirmedDelete,
    ) -> Result<(), AgendaError> {
        let session_id = confirmed.session_id();
        info!(camp_id, session_id, "Deleting session");
        match self.api.delete_session(camp_id, session_id).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => {
                debug!(camp_id, session_id, "Session already deleted");
            }
            Err(e) => {
                warn!(camp_id, session_id, error = %e, "Delete session failed");
                return Err(e.into());
            }
        }
        self.invalidate_agenda(camp_id);
        Ok(())
    }

    /// Duplicate a session onto the selected days. An empty selection is
    /// reported without contacting the server.
    pub async fn copy_session(
        &self,
        camp_id: i64,
        selection: &CopySelection,
    ) -> Result<CopyOutcome, AgendaError> {
        if selection.is_empty() {
            debug!(camp_id, session_id = selection.session_id(), "Copy skipped: no target days");
            return Ok(CopyOutcome::NoTargetDays);
        }
        let session_id = selection.session_id();
        let days = selection.selected_days();
        info!(camp_id, session_id, days = ?days, "Copying session");
        self.api
            .copy_session(camp_id, session_id, &days)
            .await
            .inspect_err(|e| warn!(camp_id, session_id, error = %e, "Copy session failed"))?;
        self.invalidate_agenda(camp_id);
        Ok(CopyOutcome::Copied { session_id, days })
    }

    /// Fetch the export view of the agenda and render it as CSV.
    pub async fn export_agenda(&self, camp_id: i64) -> Result<ExportOutcome, AgendaError> {
        info!(camp_id, "Exporting agenda");
        let days = self.api.fetch_agenda_export(camp_id).await?.into_days();
        let total: usize = days.iter().map(|d| d.items.len()).sum();
        if total == 0 {
            info!(camp_id, "Nothing to export");
            return Ok(ExportOutcome::NothingToExport);
        }
        let refs = fetch_references(&self.api, &self.cache, camp_id).await?;
        let outcome = build_agenda_csv(camp_id, &days, &refs)?;
        if let ExportOutcome::Exported(ref export) = outcome {
            info!(camp_id, rows = export.rows, file = %export.file_name, "Agenda exported");
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SessionStatus, SessionType};

    #[test]
    fn test_delete_prompt_names_title_and_time_range() {
        let item = AgendaItem {
            id: 8,
            title: "Warmup".to_string(),
            description: None,
            start_time: "08:00".to_string(),
            end_time: "08:30".to_string(),
            day: 1,
            location_id: None,
            clinician_id: None,
            session_type: SessionType::Opening,
            capacity: None,
            materials: None,
            notes: None,
            status: SessionStatus::Scheduled,
            staff_assignments: vec![],
        };
        let prompt = DeleteConfirmation::for_item(&item);
        assert_eq!(prompt.prompt(), "Delete \"Warmup\" (08:00 - 08:30)?");
        assert_eq!(prompt.confirm().session_id(), 8);
    }
}
