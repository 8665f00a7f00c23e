use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::reference::StaffMember;
use crate::utils::format_date;

/// Wall-clock format used for session start/end times ("08:30").
pub const WALL_TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Opening,
    Instruction,
    Drill,
    Scrimmage,
    Evaluation,
    Break,
    Meal,
    Lecture,
    Activity,
    #[serde(other)]
    Other,
}

impl SessionType {
    pub const ALL: [SessionType; 10] = [
        SessionType::Opening,
        SessionType::Instruction,
        SessionType::Drill,
        SessionType::Scrimmage,
        SessionType::Evaluation,
        SessionType::Break,
        SessionType::Meal,
        SessionType::Lecture,
        SessionType::Activity,
        SessionType::Other,
    ];

    /// Wire value, as sent to and received from the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Opening => "opening",
            SessionType::Instruction => "instruction",
            SessionType::Drill => "drill",
            SessionType::Scrimmage => "scrimmage",
            SessionType::Evaluation => "evaluation",
            SessionType::Break => "break",
            SessionType::Meal => "meal",
            SessionType::Lecture => "lecture",
            SessionType::Activity => "activity",
            SessionType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionType::Opening => "Opening",
            SessionType::Instruction => "Instruction",
            SessionType::Drill => "Drill",
            SessionType::Scrimmage => "Scrimmage",
            SessionType::Evaluation => "Evaluation",
            SessionType::Break => "Break",
            SessionType::Meal => "Meal",
            SessionType::Lecture => "Lecture",
            SessionType::Activity => "Activity",
            SessionType::Other => "Other",
        }
    }

    /// Next type in declaration order, wrapping around.
    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        let idx = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("Unknown session type: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Draft,
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub const ALL: [SessionStatus; 4] = [
        SessionStatus::Draft,
        SessionStatus::Scheduled,
        SessionStatus::Completed,
        SessionStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Draft => "draft",
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionStatus::Draft => "Draft",
            SessionStatus::Scheduled => "Scheduled",
            SessionStatus::Completed => "Completed",
            SessionStatus::Cancelled => "Cancelled",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            SessionStatus::Draft => SessionStatus::Scheduled,
            SessionStatus::Scheduled => SessionStatus::Completed,
            SessionStatus::Completed => SessionStatus::Cancelled,
            SessionStatus::Cancelled => SessionStatus::Draft,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A single scheduled session on one camp day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct AgendaItem {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub day: u32,
    #[serde(default)]
    pub location_id: Option<i64>,
    #[serde(default)]
    pub clinician_id: Option<i64>,
    #[serde(default = "default_session_type")]
    pub session_type: SessionType,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub materials: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: SessionStatus,
    #[serde(default)]
    pub staff_assignments: Vec<StaffMember>,
}

fn default_session_type() -> SessionType {
    SessionType::Other
}

impl AgendaItem {
    /// "08:00 - 09:30"
    pub fn time_range(&self) -> String {
        format!("{} - {}", self.start_time, self.end_time)
    }

    /// Length of the session in minutes, if both times parse.
    pub fn duration_minutes(&self) -> Option<i64> {
        let start = NaiveTime::parse_from_str(&self.start_time, WALL_TIME_FORMAT).ok()?;
        let end = NaiveTime::parse_from_str(&self.end_time, WALL_TIME_FORMAT).ok()?;
        Some((end - start).num_minutes())
    }

    pub fn staff_names(&self) -> Vec<&str> {
        self.staff_assignments.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn staff_ids(&self) -> Vec<i64> {
        self.staff_assignments.iter().map(|s| s.id).collect()
    }
}

/// One camp day and the sessions scheduled on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct AgendaDay {
    pub day: u32,
    pub date: NaiveDate,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub items: Vec<AgendaItem>,
}

impl AgendaDay {
    pub fn new(day: u32, date: NaiveDate) -> Self {
        Self {
            day,
            date,
            title: format!("Day {}", day),
            items: Vec::new(),
        }
    }

    /// Items ordered by start time; insertion order breaks ties.
    pub fn sorted_items(&self) -> Vec<&AgendaItem> {
        let mut items: Vec<&AgendaItem> = self.items.iter().collect();
        items.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        items
    }

    /// "Day 2 - Tue, Jul 8"
    pub fn tab_label(&self) -> String {
        format!("Day {} - {}", self.day, format_date(self.date))
    }
}

// ============================================================================
// Wire payload
// ============================================================================

/// Agenda day exactly as delivered by the API. A partially loaded agenda can
/// contain `null` days or items; they are dropped by [`AgendaPayload::into_days`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgendaDayPayload {
    pub day: u32,
    pub date: NaiveDate,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<Option<AgendaItem>>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgendaPayload {
    pub days: Vec<Option<AgendaDayPayload>>,
}

impl AgendaPayload {
    pub fn from_days(days: &[AgendaDay]) -> Self {
        Self {
            days: days
                .iter()
                .map(|d| {
                    Some(AgendaDayPayload {
                        day: d.day,
                        date: d.date,
                        title: Some(d.title.clone()),
                        items: Some(d.items.iter().cloned().map(Some).collect()),
                    })
                })
                .collect(),
        }
    }

    /// Normalize into well-formed days ordered by day number.
    pub fn into_days(self) -> Vec<AgendaDay> {
        let mut days: Vec<AgendaDay> = self
            .days
            .into_iter()
            .flatten()
            .map(|d| AgendaDay {
                day: d.day,
                date: d.date,
                title: d
                    .title
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| format!("Day {}", d.day)),
                items: d.items.unwrap_or_default().into_iter().flatten().collect(),
            })
            .collect();
        days.sort_by_key(|d| d.day);
        days
    }
}

// ============================================================================
// Form model
// ============================================================================

/// Candidate session as entered in the add/edit form. This is also the
/// POST body; unset optional fields are omitted. Edits go out as
/// [`SessionUpdate`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct SessionDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_type: Option<SessionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinician_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub materials: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: SessionStatus,
    #[serde(rename = "staffIds")]
    pub staff_ids: Vec<i64>,
}

impl SessionDraft {
    /// Empty form for a new session on `day`.
    pub fn for_day(day: u32) -> Self {
        Self {
            day: Some(day),
            ..Default::default()
        }
    }

    /// Pre-filled form for editing an existing session.
    pub fn from_item(item: &AgendaItem) -> Self {
        Self {
            title: item.title.clone(),
            description: item.description.clone(),
            start_time: item.start_time.clone(),
            end_time: item.end_time.clone(),
            day: Some(item.day),
            session_type: Some(item.session_type),
            location_id: item.location_id,
            clinician_id: item.clinician_id,
            capacity: item.capacity,
            materials: item.materials.clone(),
            notes: item.notes.clone(),
            status: item.status,
            staff_ids: item.staff_ids(),
        }
    }

    /// Clear every field but keep the active day.
    pub fn reset(&mut self) {
        *self = Self {
            day: self.day,
            ..Default::default()
        };
    }

    pub fn with_day(&self, day: u32) -> Self {
        Self {
            day: Some(day),
            ..self.clone()
        }
    }

    /// PUT body for an edit. The server applies PUT as a partial update, so
    /// every clearable field is sent and `None` goes out as `null`.
    pub fn update_body(&self) -> SessionUpdate<'_> {
        SessionUpdate {
            title: &self.title,
            description: self.description.as_deref(),
            start_time: &self.start_time,
            end_time: &self.end_time,
            day: self.day,
            session_type: self.session_type,
            location_id: self.location_id,
            clinician_id: self.clinician_id,
            capacity: self.capacity,
            materials: self.materials.as_deref(),
            notes: self.notes.as_deref(),
            status: self.status,
            staff_ids: &self.staff_ids,
        }
    }
}

/// Wire form of an edited session. See [`SessionDraft::update_body`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdate<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub start_time: &'a str,
    pub end_time: &'a str,
    // Day and type cannot be cleared; leave them out rather than null them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_type: Option<SessionType>,
    pub location_id: Option<i64>,
    pub clinician_id: Option<i64>,
    pub capacity: Option<u32>,
    pub materials: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub status: SessionStatus,
    #[serde(rename = "staffIds")]
    pub staff_ids: &'a [i64],
}
