//! CSV export of a camp agenda.
//!
//! Every field is double-quoted; embedded quotes are doubled.

use std::path::{Path, PathBuf};

use csv::{QuoteStyle, WriterBuilder};
use thiserror::Error;

use crate::error::Notice;
use crate::models::{AgendaDay, ReferenceData};

pub const EXPORT_COLUMNS: [&str; 10] = [
    "Day",
    "Date",
    "Start",
    "End",
    "Title",
    "Type",
    "Location",
    "Clinician",
    "Additional Staff",
    "Status",
];

/// Separator between names in the "Additional Staff" column.
const STAFF_SEPARATOR: &str = "; ";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("CSV output was not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

pub fn export_file_name(camp_id: i64) -> String {
    format!("agenda_camp_{}.csv", camp_id)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaExport {
    pub file_name: String,
    pub csv: String,
    /// Data rows, excluding the header.
    pub rows: usize,
}

impl AgendaExport {
    /// Write the CSV into `dir`, returning the full path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.csv)?;
        Ok(path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Exported(AgendaExport),
    NothingToExport,
}

impl ExportOutcome {
    pub fn notice(&self) -> Option<Notice> {
        match self {
            ExportOutcome::NothingToExport => Some(Notice::NothingToExport),
            ExportOutcome::Exported(_) => None,
        }
    }
}

/// Build the agenda CSV. Days are ordered by day number and sessions by
/// start time within each day.
pub fn build_agenda_csv(
    camp_id: i64,
    days: &[AgendaDay],
    refs: &ReferenceData,
) -> Result<ExportOutcome, ExportError> {
    let total: usize = days.iter().map(|d| d.items.len()).sum();
    if total == 0 {
        return Ok(ExportOutcome::NothingToExport);
    }

    let mut ordered: Vec<&AgendaDay> = days.iter().collect();
    ordered.sort_by_key(|d| d.day);

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());
    writer.write_record(EXPORT_COLUMNS)?;

    let mut rows = 0;
    for day in ordered {
        let day_number = day.day.to_string();
        let date = day.date.format("%Y-%m-%d").to_string();
        for item in day.sorted_items() {
            let staff = item.staff_names().join(STAFF_SEPARATOR);
            writer.write_record([
                day_number.as_str(),
                date.as_str(),
                item.start_time.as_str(),
                item.end_time.as_str(),
                item.title.as_str(),
                item.session_type.label(),
                refs.location_name(item.location_id),
                refs.clinician_name(item.clinician_id),
                staff.as_str(),
                item.status.label(),
            ])?;
            rows += 1;
        }
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(ExportOutcome::Exported(AgendaExport {
        file_name: export_file_name(camp_id),
        csv: String::from_utf8(bytes)?,
        rows,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        AgendaItem, Clinician, SessionStatus, SessionType, StaffMember,
    };
    use chrono::NaiveDate;

    fn item(id: i64, day: u32, title: &str, start: &str) -> AgendaItem {
        AgendaItem {
            id,
            title: title.to_string(),
            description: None,
            start_time: start.to_string(),
            end_time: "23:00".to_string(),
            day,
            location_id: None,
            clinician_id: None,
            session_type: SessionType::Lecture,
            capacity: None,
            materials: None,
            notes: None,
            status: SessionStatus::Scheduled,
            staff_assignments: vec![],
        }
    }

    fn day(n: u32, items: Vec<AgendaItem>) -> AgendaDay {
        AgendaDay {
            items,
            ..AgendaDay::new(n, NaiveDate::from_ymd_opt(2025, 7, 6 + n).unwrap())
        }
    }

    #[test]
    fn test_empty_agenda_is_nothing_to_export() {
        let days = vec![day(1, vec![]), day(2, vec![])];
        let outcome = build_agenda_csv(5, &days, &ReferenceData::default()).unwrap();
        assert_eq!(outcome, ExportOutcome::NothingToExport);
        assert_eq!(outcome.notice(), Some(Notice::NothingToExport));

        let outcome = build_agenda_csv(5, &[], &ReferenceData::default()).unwrap();
        assert_eq!(outcome, ExportOutcome::NothingToExport);
    }

    #[test]
    fn test_row_count_matches_sessions() {
        let days = vec![
            day(2, vec![item(3, 2, "Film Study", "13:00")]),
            day(1, vec![item(1, 1, "Late", "10:00"), item(2, 1, "Early", "08:00")]),
        ];
        let export = match build_agenda_csv(5, &days, &ReferenceData::default()).unwrap() {
            ExportOutcome::Exported(e) => e,
            other => panic!("unexpected outcome: {:?}", other),
        };
        assert_eq!(export.rows, 3);
        assert_eq!(export.file_name, "agenda_camp_5.csv");

        let lines: Vec<&str> = export.csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "\"Day\",\"Date\",\"Start\",\"End\",\"Title\",\"Type\",\"Location\",\"Clinician\",\"Additional Staff\",\"Status\""
        );
        assert!(lines[1].contains("\"Early\""));
        assert!(lines[1].starts_with("\"1\",\"2025-07-07\",\"08:00\""));
        assert!(lines[3].contains("\"Film Study\""));
    }

    #[test]
    fn test_quotes_are_doubled_and_names_resolved() {
        let mut session = item(1, 1, "The \"Big\" Game", "19:00");
        session.clinician_id = Some(4);
        session.staff_assignments = vec![
            StaffMember {
                id: 1,
                name: "Pat Kim".to_string(),
                role: None,
                email: None,
            },
            StaffMember {
                id: 2,
                name: "Lee Park".to_string(),
                role: None,
                email: None,
            },
        ];
        let refs = ReferenceData {
            clinicians: vec![Clinician {
                id: 4,
                name: "Jordan Reyes".to_string(),
                specialty: None,
                email: None,
            }],
            ..Default::default()
        };
        let outcome = build_agenda_csv(1, &[day(1, vec![session])], &refs).unwrap();
        let ExportOutcome::Exported(export) = outcome else {
            panic!("expected export");
        };
        let row = export.csv.lines().nth(1).unwrap();
        assert!(row.contains("\"The \"\"Big\"\" Game\""));
        assert!(row.contains("\"Jordan Reyes\""));
        assert!(row.contains("\"Pat Kim; Lee Park\""));
        assert!(row.ends_with("\"Scheduled\""));
    }

    #[test]
    fn test_write_to_directory() {
        let dir = std::env::temp_dir().join(format!("campdesk-export-{}", std::process::id()));
        let export = AgendaExport {
            file_name: export_file_name(9),
            csv: "\"Day\"\n".to_string(),
            rows: 0,
        };
        let path = export.write_to(&dir).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "\"Day\"\n");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
