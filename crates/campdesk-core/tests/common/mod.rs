//! In-memory agenda server for integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use campdesk_core::api::{AgendaApi, ApiError};
use campdesk_core::models::{
    AgendaDay, AgendaItem, AgendaPayload, Camp, Clinician, Location, SessionDraft, SessionType,
    StaffMember,
};

pub const CAMP_ID: i64 = 7;

/// A request that reached the fake server.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchAgenda,
    FetchExport,
    Create(SessionDraft),
    Update(i64, SessionDraft),
    Delete(i64),
    Copy(i64, Vec<u32>),
    FetchCamp,
    FetchClinicians,
    FetchLocations,
    FetchStaff,
}

pub struct FakeAgendaApi {
    camp: Camp,
    days: Mutex<Vec<AgendaDay>>,
    calls: Mutex<Vec<Call>>,
    next_id: Mutex<i64>,
    clinicians: Vec<Clinician>,
    locations: Vec<Location>,
    staff: Vec<StaffMember>,
}

impl FakeAgendaApi {
    /// A three-day camp with no sessions.
    pub fn new() -> Self {
        let camp = Camp {
            id: CAMP_ID,
            name: "Summer Skills Camp".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 7, 7).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 7, 9).unwrap(),
            location: Some("Lakeview Arena".to_string()),
        };
        let days = camp.agenda_days();
        Self {
            camp,
            days: Mutex::new(days),
            calls: Mutex::new(Vec::new()),
            next_id: Mutex::new(100),
            clinicians: vec![Clinician {
                id: 4,
                name: "Jordan Reyes".to_string(),
                specialty: Some("Skating".to_string()),
                email: None,
            }],
            locations: vec![Location {
                id: 2,
                name: "Main Rink".to_string(),
                description: None,
                capacity: Some(40),
            }],
            staff: vec![
                StaffMember {
                    id: 1,
                    name: "Pat Kim".to_string(),
                    role: Some("Coach".to_string()),
                    email: None,
                },
                StaffMember {
                    id: 2,
                    name: "Lee Park".to_string(),
                    role: None,
                    email: None,
                },
            ],
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::Create(_) | Call::Update(..) | Call::Delete(_) | Call::Copy(..)
                )
            })
            .count()
    }

    pub fn count(&self, call: fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| call(c)).count()
    }

    pub fn session_ids_on(&self, day: u32) -> Vec<i64> {
        self.days
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.day == day)
            .map(|d| d.items.iter().map(|i| i.id).collect())
            .unwrap_or_default()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn allocate_id(&self) -> i64 {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        *next
    }

    fn item_from_draft(&self, id: i64, draft: &SessionDraft) -> AgendaItem {
        AgendaItem {
            id,
            title: draft.title.trim().to_string(),
            description: draft.description.clone(),
            start_time: draft.start_time.clone(),
            end_time: draft.end_time.clone(),
            day: draft.day.unwrap_or(1),
            location_id: draft.location_id,
            clinician_id: draft.clinician_id,
            session_type: draft.session_type.unwrap_or(SessionType::Other),
            capacity: draft.capacity,
            materials: draft.materials.clone(),
            notes: draft.notes.clone(),
            status: draft.status,
            staff_assignments: self
                .staff
                .iter()
                .filter(|s| draft.staff_ids.contains(&s.id))
                .cloned()
                .collect(),
        }
    }

    /// PUT semantics: keys present in the body overwrite (an explicit
    /// `null` clears), absent keys keep the stored value.
    fn merge_update(&self, existing: AgendaItem, body: &serde_json::Value) -> AgendaItem {
        let mut merged = serde_json::to_value(&existing).unwrap();
        for (key, value) in body.as_object().unwrap() {
            if key == "staffIds" {
                let ids: Vec<i64> = serde_json::from_value(value.clone()).unwrap();
                let staff: Vec<&StaffMember> =
                    self.staff.iter().filter(|s| ids.contains(&s.id)).collect();
                merged["staffAssignments"] = serde_json::to_value(staff).unwrap();
            } else {
                merged[key.as_str()] = value.clone();
            }
        }
        serde_json::from_value(merged).unwrap()
    }

    /// Create a session directly on the server, as another operator would.
    pub fn insert_out_of_band(&self, day: u32, draft: &SessionDraft) -> i64 {
        let id = self.allocate_id();
        let item = self.item_from_draft(id, &draft.with_day(day));
        let mut days = self.days.lock().unwrap();
        if let Some(agenda_day) = days.iter_mut().find(|d| d.day == day) {
            agenda_day.items.push(item);
        }
        id
    }

    /// The stored session, as the server holds it.
    pub fn stored(&self, session_id: i64) -> Option<AgendaItem> {
        self.days
            .lock()
            .unwrap()
            .iter()
            .flat_map(|d| d.items.iter())
            .find(|i| i.id == session_id)
            .cloned()
    }

    fn payload(&self) -> AgendaPayload {
        AgendaPayload::from_days(&self.days.lock().unwrap())
    }

    fn check_camp(&self, camp_id: i64) -> Result<(), ApiError> {
        if camp_id == CAMP_ID {
            Ok(())
        } else {
            Err(ApiError::NotFound("Camp not found".to_string()))
        }
    }
}

#[async_trait]
impl AgendaApi for FakeAgendaApi {
    async fn fetch_agenda(&self, camp_id: i64) -> Result<AgendaPayload, ApiError> {
        self.record(Call::FetchAgenda);
        self.check_camp(camp_id)?;
        Ok(self.payload())
    }

    async fn fetch_agenda_export(&self, camp_id: i64) -> Result<AgendaPayload, ApiError> {
        self.record(Call::FetchExport);
        self.check_camp(camp_id)?;
        Ok(self.payload())
    }

    async fn create_session(
        &self,
        camp_id: i64,
        draft: &SessionDraft,
    ) -> Result<AgendaItem, ApiError> {
        self.record(Call::Create(draft.clone()));
        self.check_camp(camp_id)?;
        let item = self.item_from_draft(self.allocate_id(), draft);
        let mut days = self.days.lock().unwrap();
        let day = days
            .iter_mut()
            .find(|d| d.day == item.day)
            .ok_or_else(|| ApiError::Validation {
                message: format!("Day {} is outside the camp", item.day),
                fields: vec![],
            })?;
        day.items.push(item.clone());
        Ok(item)
    }

    async fn update_session(
        &self,
        camp_id: i64,
        session_id: i64,
        draft: &SessionDraft,
    ) -> Result<AgendaItem, ApiError> {
        self.record(Call::Update(session_id, draft.clone()));
        self.check_camp(camp_id)?;
        let body = serde_json::to_value(draft.update_body()).unwrap();
        let mut days = self.days.lock().unwrap();
        let existing = days
            .iter()
            .flat_map(|d| d.items.iter())
            .find(|i| i.id == session_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("Agenda item not found".to_string()))?;
        let updated = self.merge_update(existing, &body);
        if !days.iter().any(|d| d.day == updated.day) {
            return Err(ApiError::Validation {
                message: format!("Day {} is outside the camp", updated.day),
                fields: vec![],
            });
        }
        for day in days.iter_mut() {
            day.items.retain(|i| i.id != session_id);
        }
        if let Some(day) = days.iter_mut().find(|d| d.day == updated.day) {
            day.items.push(updated.clone());
        }
        Ok(updated)
    }

    async fn delete_session(&self, camp_id: i64, session_id: i64) -> Result<(), ApiError> {
        self.record(Call::Delete(session_id));
        self.check_camp(camp_id)?;
        let mut days = self.days.lock().unwrap();
        let before: usize = days.iter().map(|d| d.items.len()).sum();
        for day in days.iter_mut() {
            day.items.retain(|i| i.id != session_id);
        }
        let after: usize = days.iter().map(|d| d.items.len()).sum();
        if before == after {
            return Err(ApiError::NotFound("Agenda item not found".to_string()));
        }
        Ok(())
    }

    async fn copy_session(
        &self,
        camp_id: i64,
        session_id: i64,
        days: &[u32],
    ) -> Result<(), ApiError> {
        self.record(Call::Copy(session_id, days.to_vec()));
        self.check_camp(camp_id)?;
        let source = self
            .days
            .lock()
            .unwrap()
            .iter()
            .flat_map(|d| d.items.iter())
            .find(|i| i.id == session_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound("Agenda item not found".to_string()))?;
        for &target in days {
            let id = self.allocate_id();
            let mut agenda = self.days.lock().unwrap();
            if let Some(day) = agenda.iter_mut().find(|d| d.day == target) {
                day.items.push(AgendaItem {
                    id,
                    day: target,
                    ..source.clone()
                });
            }
        }
        Ok(())
    }

    async fn fetch_camp(&self, camp_id: i64) -> Result<Camp, ApiError> {
        self.record(Call::FetchCamp);
        self.check_camp(camp_id)?;
        Ok(self.camp.clone())
    }

    async fn fetch_clinicians(&self, camp_id: i64) -> Result<Vec<Clinician>, ApiError> {
        self.record(Call::FetchClinicians);
        self.check_camp(camp_id)?;
        Ok(self.clinicians.clone())
    }

    async fn fetch_locations(&self, camp_id: i64) -> Result<Vec<Location>, ApiError> {
        self.record(Call::FetchLocations);
        self.check_camp(camp_id)?;
        Ok(self.locations.clone())
    }

    async fn fetch_staff(&self, camp_id: i64) -> Result<Vec<StaffMember>, ApiError> {
        self.record(Call::FetchStaff);
        self.check_camp(camp_id)?;
        Ok(self.staff.clone())
    }
}

/// A form filled in the way an operator would.
pub fn draft(title: &str, start: &str, end: &str) -> SessionDraft {
    SessionDraft {
        title: title.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        session_type: Some(SessionType::Drill),
        ..Default::default()
    }
}
