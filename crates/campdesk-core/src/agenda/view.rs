//! Timeline and list projections of a filtered day.
//!
//! Both modes render the same filtered, sorted sessions; switching only
//! changes which columns are produced.

use crate::models::{AgendaItem, ReferenceData, SessionStatus};

/// Minutes represented by one block of a timeline bar.
const TIMELINE_BLOCK_MINUTES: i64 = 15;

/// Longest timeline bar, in blocks (4 hours).
const TIMELINE_MAX_BLOCKS: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Timeline,
    List,
}

impl ViewMode {
    pub fn toggle(&self) -> Self {
        match self {
            ViewMode::Timeline => ViewMode::List,
            ViewMode::List => ViewMode::Timeline,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Timeline => "Timeline",
            ViewMode::List => "List",
        }
    }
}

/// One display row. `status` is only filled in list mode, `bar` only in
/// timeline mode.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRow<'a> {
    pub item: &'a AgendaItem,
    pub time_range: String,
    pub location: String,
    pub clinician: String,
    pub staff: String,
    pub status: Option<SessionStatus>,
    pub bar: Option<String>,
}

/// Blocks for a session of `minutes`, at least one for any positive length.
pub fn timeline_bar(minutes: Option<i64>) -> String {
    let blocks = match minutes {
        Some(m) if m > 0 => {
            let n = (m + TIMELINE_BLOCK_MINUTES - 1) / TIMELINE_BLOCK_MINUTES;
            (n as usize).min(TIMELINE_MAX_BLOCKS)
        }
        _ => 0,
    };
    "█".repeat(blocks)
}

pub fn project<'a>(
    mode: ViewMode,
    items: &[&'a AgendaItem],
    refs: &ReferenceData,
) -> Vec<SessionRow<'a>> {
    items
        .iter()
        .map(|&item| SessionRow {
            item,
            time_range: item.time_range(),
            location: refs.location_name(item.location_id).to_string(),
            clinician: refs.clinician_name(item.clinician_id).to_string(),
            staff: item.staff_names().join(", "),
            status: match mode {
                ViewMode::List => Some(item.status),
                ViewMode::Timeline => None,
            },
            bar: match mode {
                ViewMode::Timeline => Some(timeline_bar(item.duration_minutes())),
                ViewMode::List => None,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, SessionType};

    fn item(start: &str, end: &str) -> AgendaItem {
        AgendaItem {
            id: 1,
            title: "Scrimmage".to_string(),
            description: None,
            start_time: start.to_string(),
            end_time: end.to_string(),
            day: 1,
            location_id: Some(2),
            clinician_id: None,
            session_type: SessionType::Scrimmage,
            capacity: None,
            materials: None,
            notes: None,
            status: SessionStatus::Draft,
            staff_assignments: vec![],
        }
    }

    #[test]
    fn test_toggle_round_trips() {
        assert_eq!(ViewMode::Timeline.toggle(), ViewMode::List);
        assert_eq!(ViewMode::Timeline.toggle().toggle(), ViewMode::Timeline);
    }

    #[test]
    fn test_timeline_bar_lengths() {
        assert_eq!(timeline_bar(Some(15)).chars().count(), 1);
        assert_eq!(timeline_bar(Some(20)).chars().count(), 2);
        assert_eq!(timeline_bar(Some(600)).chars().count(), TIMELINE_MAX_BLOCKS);
        assert_eq!(timeline_bar(Some(-30)), "");
        assert_eq!(timeline_bar(None), "");
    }

    #[test]
    fn test_modes_share_rows_but_differ_in_columns() {
        let a = item("08:00", "09:00");
        let b = item("10:00", "10:30");
        let items = vec![&a, &b];
        let refs = ReferenceData {
            locations: vec![Location {
                id: 2,
                name: "Main Rink".to_string(),
                description: None,
                capacity: None,
            }],
            ..Default::default()
        };

        let timeline = project(ViewMode::Timeline, &items, &refs);
        let list = project(ViewMode::List, &items, &refs);

        assert_eq!(timeline.len(), list.len());
        assert_eq!(timeline[0].location, "Main Rink");
        assert_eq!(timeline[0].bar.as_deref(), Some("████"));
        assert!(timeline[0].status.is_none());
        assert_eq!(list[1].status, Some(SessionStatus::Draft));
        assert!(list[1].bar.is_none());
        assert_eq!(list[1].time_range, "10:00 - 10:30");
    }
}
