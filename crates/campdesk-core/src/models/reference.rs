use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct StaffMember {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl StaffMember {
    /// "Pat Kim (Goalie Coach)"
    pub fn display_name(&self) -> String {
        match self.role.as_deref() {
            Some(role) if !role.is_empty() => format!("{} ({})", self.name, role),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Clinician {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
}

/// Read-only lookup tables used to resolve ids on agenda items to names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ReferenceData {
    pub clinicians: Vec<Clinician>,
    pub locations: Vec<Location>,
    #[serde(default)]
    pub staff: Vec<StaffMember>,
}

impl ReferenceData {
    pub fn clinician(&self, id: Option<i64>) -> Option<&Clinician> {
        let id = id?;
        self.clinicians.iter().find(|c| c.id == id)
    }

    pub fn location(&self, id: Option<i64>) -> Option<&Location> {
        let id = id?;
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn clinician_name(&self, id: Option<i64>) -> &str {
        self.clinician(id).map(|c| c.name.as_str()).unwrap_or("")
    }

    pub fn location_name(&self, id: Option<i64>) -> &str {
        self.location(id).map(|l| l.name.as_str()).unwrap_or("")
    }

    pub fn staff_member(&self, id: i64) -> Option<&StaffMember> {
        self.staff.iter().find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refs() -> ReferenceData {
        ReferenceData {
            clinicians: vec![Clinician {
                id: 4,
                name: "Jordan Reyes".to_string(),
                specialty: Some("Skating".to_string()),
                email: None,
            }],
            locations: vec![Location {
                id: 9,
                name: "Rink B".to_string(),
                description: None,
                capacity: Some(40),
            }],
            staff: vec![],
        }
    }

    #[test]
    fn test_resolves_known_ids() {
        let refs = refs();
        assert_eq!(refs.clinician_name(Some(4)), "Jordan Reyes");
        assert_eq!(refs.location_name(Some(9)), "Rink B");
    }

    #[test]
    fn test_unknown_or_missing_ids_resolve_empty() {
        let refs = refs();
        assert_eq!(refs.clinician_name(None), "");
        assert_eq!(refs.location_name(Some(1)), "");
    }

    #[test]
    fn test_staff_display_name() {
        let staff = StaffMember {
            id: 1,
            name: "Pat Kim".to_string(),
            role: Some("Goalie Coach".to_string()),
            email: None,
        };
        assert_eq!(staff.display_name(), "Pat Kim (Goalie Coach)");
    }
}
