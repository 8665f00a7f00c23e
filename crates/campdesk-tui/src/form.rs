//! Add/edit session form state.
//!
//! Text fields are kept as typed; `to_draft` normalizes times and builds the
//! `SessionDraft` the gateway validates and sends.

use campdesk_core::agenda::{StaffSelection, ValidationError};
use campdesk_core::models::{
    AgendaItem, ReferenceData, SessionDraft, SessionStatus, SessionType,
};
use campdesk_core::utils::normalize_wall_time;

/// Maximum characters accepted in a single-line text field.
const MAX_FIELD_LENGTH: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add { day: u32 },
    Edit { session_id: i64, day: u32 },
}

impl FormMode {
    pub fn day(&self) -> u32 {
        match self {
            FormMode::Add { day } | FormMode::Edit { day, .. } => *day,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    StartTime,
    EndTime,
    SessionType,
    Status,
    Location,
    Clinician,
    Staff,
    Notes,
}

impl FormField {
    pub const ALL: [FormField; 9] = [
        FormField::Title,
        FormField::StartTime,
        FormField::EndTime,
        FormField::SessionType,
        FormField::Status,
        FormField::Location,
        FormField::Clinician,
        FormField::Staff,
        FormField::Notes,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::StartTime => "Start",
            FormField::EndTime => "End",
            FormField::SessionType => "Type",
            FormField::Status => "Status",
            FormField::Location => "Location",
            FormField::Clinician => "Clinician",
            FormField::Staff => "Staff",
            FormField::Notes => "Notes",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(
            self,
            FormField::Title | FormField::StartTime | FormField::EndTime | FormField::Notes
        )
    }

    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        let idx = Self::ALL.iter().position(|f| f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Field named by a validation failure.
    pub fn for_error(error: &ValidationError) -> Self {
        match error.field() {
            "title" => FormField::Title,
            "startTime" => FormField::StartTime,
            "sessionType" => FormField::SessionType,
            _ => FormField::EndTime,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionForm {
    pub mode: FormMode,
    pub focus: FormField,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    pub session_type: Option<SessionType>,
    pub status: SessionStatus,
    pub location_id: Option<i64>,
    pub clinician: StaffSelection,
    pub staff: StaffSelection,
    /// Cursor into the staff list while the Staff field is focused.
    pub staff_cursor: usize,
    pub notes: String,
    /// Fields the form does not edit but must send back unchanged.
    description: Option<String>,
    capacity: Option<u32>,
    materials: Option<String>,
    pub error: Option<String>,
}

impl SessionForm {
    pub fn add(day: u32) -> Self {
        Self {
            mode: FormMode::Add { day },
            focus: FormField::Title,
            title: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            session_type: None,
            status: SessionStatus::default(),
            location_id: None,
            clinician: StaffSelection::single(None),
            staff: StaffSelection::multiple([]),
            staff_cursor: 0,
            notes: String::new(),
            description: None,
            capacity: None,
            materials: None,
            error: None,
        }
    }

    pub fn edit(item: &AgendaItem) -> Self {
        Self {
            mode: FormMode::Edit {
                session_id: item.id,
                day: item.day,
            },
            title: item.title.clone(),
            start_time: item.start_time.clone(),
            end_time: item.end_time.clone(),
            session_type: Some(item.session_type),
            status: item.status,
            location_id: item.location_id,
            clinician: StaffSelection::single(item.clinician_id),
            staff: StaffSelection::multiple(item.staff_ids()),
            notes: item.notes.clone().unwrap_or_default(),
            description: item.description.clone(),
            capacity: item.capacity,
            materials: item.materials.clone(),
            ..Self::add(item.day)
        }
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    pub fn title_text(&self) -> String {
        match self.mode {
            FormMode::Add { day } => format!(" Add Session - Day {} ", day),
            FormMode::Edit { .. } => " Edit Session ".to_string(),
        }
    }

    /// Clear all fields after a successful add. The day stays.
    pub fn reset(&mut self) {
        *self = Self::add(self.mode.day());
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Title => Some(&mut self.title),
            FormField::StartTime => Some(&mut self.start_time),
            FormField::EndTime => Some(&mut self.end_time),
            FormField::Notes => Some(&mut self.notes),
            _ => None,
        }
    }

    pub fn push_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        if let Some(text) = self.text_mut() {
            if text.chars().count() < MAX_FIELD_LENGTH {
                text.push(c);
            }
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(text) = self.text_mut() {
            text.pop();
        }
    }

    /// Cycle the focused choice field forward (`forward`) or backward.
    pub fn cycle(&mut self, refs: &ReferenceData, forward: bool) {
        match self.focus {
            FormField::SessionType => {
                self.session_type = match (self.session_type, forward) {
                    (None, true) => Some(SessionType::ALL[0]),
                    (None, false) => Some(SessionType::ALL[SessionType::ALL.len() - 1]),
                    (Some(t), true) => Some(t.next()),
                    (Some(t), false) => Some(t.prev()),
                };
            }
            FormField::Status => {
                self.status = if forward {
                    self.status.next()
                } else {
                    let idx = SessionStatus::ALL
                        .iter()
                        .position(|s| *s == self.status)
                        .unwrap_or(0);
                    SessionStatus::ALL[(idx + SessionStatus::ALL.len() - 1) % SessionStatus::ALL.len()]
                };
            }
            FormField::Location => {
                let ids: Vec<i64> = refs.locations.iter().map(|l| l.id).collect();
                self.location_id = cycle_id(&ids, self.location_id, forward);
            }
            FormField::Clinician => {
                let ids: Vec<i64> = refs.clinicians.iter().map(|c| c.id).collect();
                let next = cycle_id(&ids, self.clinician.first(), forward);
                self.clinician.clear();
                if let Some(id) = next {
                    self.clinician.toggle(id);
                }
            }
            FormField::Staff => {
                let len = refs.staff.len();
                if len > 0 {
                    self.staff_cursor = if forward {
                        (self.staff_cursor + 1) % len
                    } else {
                        (self.staff_cursor + len - 1) % len
                    };
                }
            }
            _ => {}
        }
    }

    /// Toggle the staff member under the cursor.
    pub fn toggle_staff(&mut self, refs: &ReferenceData) {
        if let Some(member) = refs.staff.get(self.staff_cursor) {
            self.staff.toggle(member.id);
        }
    }

    /// Record a validation failure and move focus to the offending field.
    pub fn show_validation_error(&mut self, error: &ValidationError) {
        self.focus = FormField::for_error(error);
        self.error = Some(error.to_string());
    }

    pub fn to_draft(&self) -> SessionDraft {
        let time = |raw: &str| normalize_wall_time(raw).unwrap_or_else(|| raw.trim().to_string());
        let notes = self.notes.trim();
        SessionDraft {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            start_time: time(&self.start_time),
            end_time: time(&self.end_time),
            day: Some(self.mode.day()),
            session_type: self.session_type,
            location_id: self.location_id,
            clinician_id: self.clinician.first(),
            capacity: self.capacity,
            materials: self.materials.clone(),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
            status: self.status,
            staff_ids: self.staff.selected_ids(),
        }
    }
}

/// Step through `ids` with `None` as the slot before the first entry.
fn cycle_id(ids: &[i64], current: Option<i64>, forward: bool) -> Option<i64> {
    if ids.is_empty() {
        return None;
    }
    let pos = current.and_then(|id| ids.iter().position(|&i| i == id));
    match (pos, forward) {
        (None, true) => ids.first().copied(),
        (None, false) => ids.last().copied(),
        (Some(i), true) => ids.get(i + 1).copied(),
        (Some(0), false) => None,
        (Some(i), false) => ids.get(i - 1).copied(),
    }
}
