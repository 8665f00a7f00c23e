//! Filtered, sorted views over a day's sessions.
//!
//! Projection never mutates the source collection.

use std::fmt;
use std::str::FromStr;

use crate::models::{AgendaItem, SessionType};

/// Session-type dimension of the filter. `All` is the pass-through sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(SessionType),
}

impl TypeFilter {
    pub fn matches(&self, session_type: SessionType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(t) => *t == session_type,
        }
    }

    /// All → Opening → ... → Other → All
    pub fn next(&self) -> Self {
        match self {
            TypeFilter::All => TypeFilter::Only(SessionType::ALL[0]),
            TypeFilter::Only(t) if *t == SessionType::ALL[SessionType::ALL.len() - 1] => {
                TypeFilter::All
            }
            TypeFilter::Only(t) => TypeFilter::Only(t.next()),
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => write!(f, "All types"),
            TypeFilter::Only(t) => write!(f, "{}", t.label()),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(TypeFilter::All)
        } else {
            s.parse().map(TypeFilter::Only)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionFilter {
    pub session_type: TypeFilter,
    /// `None` or `Some(0)` means any clinician.
    pub clinician_id: Option<i64>,
    /// `None` or `Some(0)` means any location.
    pub location_id: Option<i64>,
}

fn id_matches(wanted: Option<i64>, actual: Option<i64>) -> bool {
    match wanted {
        None | Some(0) => true,
        Some(id) => actual == Some(id),
    }
}

impl SessionFilter {
    pub fn is_pass_through(&self) -> bool {
        self.session_type == TypeFilter::All
            && matches!(self.clinician_id, None | Some(0))
            && matches!(self.location_id, None | Some(0))
    }

    pub fn matches(&self, item: &AgendaItem) -> bool {
        self.session_type.matches(item.session_type)
            && id_matches(self.clinician_id, item.clinician_id)
            && id_matches(self.location_id, item.location_id)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Items matching `filter`, ordered by start time ascending.
pub fn filter_sessions<'a, I>(items: I, filter: &SessionFilter) -> Vec<&'a AgendaItem>
where
    I: IntoIterator<Item = &'a AgendaItem>,
{
    let mut matched: Vec<&AgendaItem> = items.into_iter().filter(|i| filter.matches(i)).collect();
    matched.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionStatus;

    fn item(id: i64, title: &str, start: &str, session_type: SessionType) -> AgendaItem {
        AgendaItem {
            id,
            title: title.to_string(),
            description: None,
            start_time: start.to_string(),
            end_time: "23:59".to_string(),
            day: 1,
            location_id: None,
            clinician_id: None,
            session_type,
            capacity: None,
            materials: None,
            notes: None,
            status: SessionStatus::Scheduled,
            staff_assignments: vec![],
        }
    }

    fn titles(items: &[&AgendaItem]) -> Vec<String> {
        items.iter().map(|i| i.title.clone()).collect()
    }

    #[test]
    fn test_pass_through_sorts_by_start_time() {
        let items = vec![
            item(1, "A", "09:00", SessionType::Drill),
            item(2, "B", "08:00", SessionType::Drill),
        ];
        let view = filter_sessions(&items, &SessionFilter::default());
        assert_eq!(titles(&view), vec!["B", "A"]);
        // Source order untouched
        assert_eq!(items[0].title, "A");
    }

    #[test]
    fn test_filter_is_idempotent() {
        let items = vec![
            item(1, "Lunch", "12:00", SessionType::Meal),
            item(2, "Opening", "07:30", SessionType::Opening),
            item(3, "Skills", "09:15", SessionType::Instruction),
            item(4, "Break", "10:30", SessionType::Break),
        ];
        let filter = SessionFilter::default();
        let once = filter_sessions(&items, &filter);
        let twice = filter_sessions(once.clone(), &filter);
        assert_eq!(once, twice);
        assert_eq!(once.len(), items.len());
    }

    #[test]
    fn test_type_filter_exact_match() {
        let items = vec![
            item(1, "Lunch", "12:00", SessionType::Meal),
            item(2, "Dinner", "18:00", SessionType::Meal),
            item(3, "Drill", "09:00", SessionType::Drill),
        ];
        let filter = SessionFilter {
            session_type: TypeFilter::Only(SessionType::Meal),
            ..Default::default()
        };
        assert_eq!(titles(&filter_sessions(&items, &filter)), vec!["Lunch", "Dinner"]);
    }

    #[test]
    fn test_id_filters_and_zero_sentinel() {
        let mut a = item(1, "A", "08:00", SessionType::Drill);
        a.clinician_id = Some(4);
        a.location_id = Some(9);
        let mut b = item(2, "B", "09:00", SessionType::Drill);
        b.clinician_id = Some(5);
        let items = vec![a, b];

        let by_clinician = SessionFilter {
            clinician_id: Some(4),
            ..Default::default()
        };
        assert_eq!(titles(&filter_sessions(&items, &by_clinician)), vec!["A"]);

        let by_location = SessionFilter {
            location_id: Some(9),
            ..Default::default()
        };
        assert_eq!(titles(&filter_sessions(&items, &by_location)), vec!["A"]);

        let zero = SessionFilter {
            clinician_id: Some(0),
            location_id: Some(0),
            ..Default::default()
        };
        assert!(zero.is_pass_through());
        assert_eq!(filter_sessions(&items, &zero).len(), 2);
    }

    #[test]
    fn test_type_filter_parse_and_cycle() {
        assert_eq!("all".parse::<TypeFilter>().unwrap(), TypeFilter::All);
        assert_eq!(
            "meal".parse::<TypeFilter>().unwrap(),
            TypeFilter::Only(SessionType::Meal)
        );

        let mut filter = TypeFilter::All;
        for _ in 0..=SessionType::ALL.len() {
            filter = filter.next();
        }
        assert_eq!(filter, TypeFilter::All);
    }
}
