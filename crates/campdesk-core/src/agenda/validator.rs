//! Pre-submission checks for the add/edit session form.
//!
//! Rules run in a fixed order and the first failure is reported. Times are
//! fixed-width "HH:MM" strings, so plain string comparison orders them.

use thiserror::Error;

use crate::models::SessionDraft;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title is required")]
    MissingTitle,

    #[error("Start time is required")]
    MissingStartTime,

    #[error("End time is required")]
    MissingEndTime,

    #[error("Invalid time range: end time must be after start time")]
    InvalidTimeRange { start: String, end: String },

    #[error("Session type is required")]
    MissingSessionType,
}

impl ValidationError {
    /// Form field the failure belongs to, using the wire field name.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingTitle => "title",
            ValidationError::MissingStartTime => "startTime",
            ValidationError::MissingEndTime | ValidationError::InvalidTimeRange { .. } => "endTime",
            ValidationError::MissingSessionType => "sessionType",
        }
    }
}

pub fn validate_session(draft: &SessionDraft) -> Result<(), ValidationError> {
    if draft.title.trim().is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    let start = draft.start_time.trim();
    if start.is_empty() {
        return Err(ValidationError::MissingStartTime);
    }
    let end = draft.end_time.trim();
    if end.is_empty() {
        return Err(ValidationError::MissingEndTime);
    }
    if start >= end {
        return Err(ValidationError::InvalidTimeRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    if draft.session_type.is_none() {
        return Err(ValidationError::MissingSessionType);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionType;

    fn draft(title: &str, start: &str, end: &str, session_type: Option<SessionType>) -> SessionDraft {
        SessionDraft {
            title: title.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            session_type,
            ..SessionDraft::for_day(1)
        }
    }

    #[test]
    fn test_valid_session_passes() {
        let d = draft("Warmup", "08:00", "08:30", Some(SessionType::Opening));
        assert_eq!(validate_session(&d), Ok(()));
    }

    #[test]
    fn test_blank_title_rejected() {
        let d = draft("   ", "08:00", "08:30", Some(SessionType::Opening));
        assert_eq!(validate_session(&d), Err(ValidationError::MissingTitle));
    }

    #[test]
    fn test_end_before_start_is_invalid_range() {
        let d = draft("Warmup", "08:00", "07:30", Some(SessionType::Opening));
        let err = validate_session(&d).unwrap_err();
        assert_eq!(err.field(), "endTime");
        assert!(err.to_string().to_lowercase().contains("invalid time range"));
    }

    #[test]
    fn test_equal_times_rejected() {
        let d = draft("Warmup", "08:00", "08:00", Some(SessionType::Opening));
        assert!(matches!(
            validate_session(&d),
            Err(ValidationError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn test_first_failure_wins() {
        // Missing title, missing end time and missing type: title reported
        let d = draft("", "08:00", "", None);
        assert_eq!(validate_session(&d), Err(ValidationError::MissingTitle));

        let d = draft("Warmup", "", "", None);
        assert_eq!(validate_session(&d), Err(ValidationError::MissingStartTime));

        let d = draft("Warmup", "08:00", "", None);
        assert_eq!(validate_session(&d), Err(ValidationError::MissingEndTime));

        // Range is checked before type
        let d = draft("Warmup", "09:00", "08:00", None);
        assert!(matches!(
            validate_session(&d),
            Err(ValidationError::InvalidTimeRange { .. })
        ));

        let d = draft("Warmup", "08:00", "09:00", None);
        assert_eq!(validate_session(&d), Err(ValidationError::MissingSessionType));
    }

    #[test]
    fn test_every_ordered_pair_of_quarter_hours() {
        let times: Vec<String> = (6..22)
            .flat_map(|h| [0, 15, 30, 45].map(|m| format!("{:02}:{:02}", h, m)))
            .collect();
        for start in &times {
            for end in &times {
                let d = draft("Drill", start, end, Some(SessionType::Drill));
                assert_eq!(validate_session(&d).is_ok(), start < end, "{} - {}", start, end);
            }
        }
    }
}
