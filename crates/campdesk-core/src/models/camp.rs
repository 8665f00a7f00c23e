use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::agenda::AgendaDay;

/// Camp metadata: title and date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Camp {
    pub id: i64,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub location: Option<String>,
}

impl Camp {
    /// Number of camp days, inclusive of both ends. Zero for an inverted range.
    pub fn day_count(&self) -> u32 {
        let span = (self.end_date - self.start_date).num_days();
        if span < 0 {
            0
        } else {
            (span + 1) as u32
        }
    }

    /// Calendar date of camp day `day` (1-based).
    pub fn date_for_day(&self, day: u32) -> Option<NaiveDate> {
        if day == 0 || day > self.day_count() {
            return None;
        }
        self.start_date.checked_add_days(Days::new(u64::from(day - 1)))
    }

    /// Empty agenda skeleton, one day per date in the camp's range.
    pub fn agenda_days(&self) -> Vec<AgendaDay> {
        (1..=self.day_count())
            .filter_map(|day| self.date_for_day(day).map(|date| AgendaDay::new(day, date)))
            .collect()
    }

    /// "Jul 07 - Jul 11, 2025"
    pub fn date_range_display(&self) -> String {
        format!(
            "{} - {}",
            self.start_date.format("%b %d"),
            self.end_date.format("%b %d, %Y")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camp(start: (i32, u32, u32), end: (i32, u32, u32)) -> Camp {
        Camp {
            id: 1,
            name: "Summer Skills".to_string(),
            start_date: NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
            location: None,
        }
    }

    #[test]
    fn test_day_count_is_inclusive() {
        assert_eq!(camp((2025, 7, 7), (2025, 7, 11)).day_count(), 5);
        assert_eq!(camp((2025, 7, 7), (2025, 7, 7)).day_count(), 1);
        assert_eq!(camp((2025, 7, 7), (2025, 7, 6)).day_count(), 0);
    }

    #[test]
    fn test_agenda_days_cross_month_boundary() {
        let days = camp((2025, 7, 30), (2025, 8, 2)).agenda_days();
        assert_eq!(days.len(), 4);
        assert_eq!(days[0].day, 1);
        assert_eq!(days[3].date, NaiveDate::from_ymd_opt(2025, 8, 2).unwrap());
        assert!(days.iter().all(|d| d.items.is_empty()));
    }

    #[test]
    fn test_date_for_day_out_of_range() {
        let camp = camp((2025, 7, 7), (2025, 7, 8));
        assert!(camp.date_for_day(0).is_none());
        assert!(camp.date_for_day(3).is_none());
    }
}
