//! The REST boundary the agenda logic talks to.
//!
//! `ApiClient` is the HTTP implementation; tests substitute an in-memory one.

use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{
    AgendaItem, AgendaPayload, Camp, Clinician, Location, SessionDraft, StaffMember,
};

use super::ApiError;

#[async_trait]
pub trait AgendaApi: Send + Sync {
    /// `GET /api/camps/:campId/agenda`
    async fn fetch_agenda(&self, camp_id: i64) -> Result<AgendaPayload, ApiError>;

    /// `GET /api/camps/:campId/agenda/export`
    async fn fetch_agenda_export(&self, camp_id: i64) -> Result<AgendaPayload, ApiError>;

    /// `POST /api/camps/:campId/agenda`
    async fn create_session(
        &self,
        camp_id: i64,
        draft: &SessionDraft,
    ) -> Result<AgendaItem, ApiError>;

    /// `PUT /api/camps/:campId/agenda/:id`
    async fn update_session(
        &self,
        camp_id: i64,
        session_id: i64,
        draft: &SessionDraft,
    ) -> Result<AgendaItem, ApiError>;

    /// `DELETE /api/camps/:campId/agenda/:id`
    async fn delete_session(&self, camp_id: i64, session_id: i64) -> Result<(), ApiError>;

    /// `POST /api/camps/:campId/agenda/:id/copy`
    async fn copy_session(
        &self,
        camp_id: i64,
        session_id: i64,
        days: &[u32],
    ) -> Result<(), ApiError>;

    /// `GET /api/camps/:campId`
    async fn fetch_camp(&self, camp_id: i64) -> Result<Camp, ApiError>;

    /// `GET /api/camps/:campId/clinicians`
    async fn fetch_clinicians(&self, camp_id: i64) -> Result<Vec<Clinician>, ApiError>;

    /// `GET /api/camps/:campId/locations`
    async fn fetch_locations(&self, camp_id: i64) -> Result<Vec<Location>, ApiError>;

    /// `GET /api/camps/:campId/staff`
    async fn fetch_staff(&self, camp_id: i64) -> Result<Vec<StaffMember>, ApiError>;
}

#[async_trait]
impl<T: AgendaApi + ?Sized> AgendaApi for Arc<T> {
    async fn fetch_agenda(&self, camp_id: i64) -> Result<AgendaPayload, ApiError> {
        (**self).fetch_agenda(camp_id).await
    }

    async fn fetch_agenda_export(&self, camp_id: i64) -> Result<AgendaPayload, ApiError> {
        (**self).fetch_agenda_export(camp_id).await
    }

    async fn create_session(
        &self,
        camp_id: i64,
        draft: &SessionDraft,
    ) -> Result<AgendaItem, ApiError> {
        (**self).create_session(camp_id, draft).await
    }

    async fn update_session(
        &self,
        camp_id: i64,
        session_id: i64,
        draft: &SessionDraft,
    ) -> Result<AgendaItem, ApiError> {
        (**self).update_session(camp_id, session_id, draft).await
    }

    async fn delete_session(&self, camp_id: i64, session_id: i64) -> Result<(), ApiError> {
        (**self).delete_session(camp_id, session_id).await
    }

    async fn copy_session(
        &self,
        camp_id: i64,
        session_id: i64,
        days: &[u32],
    ) -> Result<(), ApiError> {
        (**self).copy_session(camp_id, session_id, days).await
    }

    async fn fetch_camp(&self, camp_id: i64) -> Result<Camp, ApiError> {
        (**self).fetch_camp(camp_id).await
    }

    async fn fetch_clinicians(&self, camp_id: i64) -> Result<Vec<Clinician>, ApiError> {
        (**self).fetch_clinicians(camp_id).await
    }

    async fn fetch_locations(&self, camp_id: i64) -> Result<Vec<Location>, ApiError> {
        (**self).fetch_locations(camp_id).await
    }

    async fn fetch_staff(&self, camp_id: i64) -> Result<Vec<StaffMember>, ApiError> {
        (**self).fetch_staff(camp_id).await
    }
}
