//! # User Profiles
//!
//! Read-only view of a user-profile row as fetched by the caller.
//!
//! Rows come from an untyped store, so every field is decoded on its own:
//! a value of the wrong JSON type is treated as absent and later reported
//! as missing data. Decoding a snapshot never fails.

use crate::role::Role;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields the scanner requires on every profile, in report order.
pub const REQUIRED_FIELDS: [&str; 3] = ["employee_id", "email", "role"];

/// Station value granting access to every station.
pub const ALL_STATIONS: &str = "ALL";

/// A user-profile row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub station: Option<String>,
    #[serde(default)]
    pub station_access: Vec<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            id: None,
            email: None,
            role: None,
            employee_id: None,
            station: None,
            station_access: Vec::new(),
            is_active: true,
        }
    }
}

impl UserProfile {
    /// Create a profile with the identifying fields set.
    #[must_use]
    pub fn new(id: i64, email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            email: Some(email.into()),
            role: Some(role.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_employee_id(mut self, employee_id: impl Into<String>) -> Self {
        self.employee_id = Some(employee_id.into());
        self
    }

    #[must_use]
    pub fn with_station(mut self, station: impl Into<String>) -> Self {
        self.station = Some(station.into());
        self
    }

    #[must_use]
    pub fn with_station_access<I, S>(mut self, stations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.station_access = stations.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Decode one row leniently.
    ///
    /// Non-object values decode to a profile with every field absent.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(row) = value.as_object() else {
            return Self::default();
        };
        Self {
            id: read_id(row),
            email: read_string(row, "email"),
            role: read_string(row, "role"),
            employee_id: read_string(row, "employee_id"),
            station: read_string(row, "station"),
            station_access: read_station_access(row.get("station_access")),
            is_active: row.get("is_active").and_then(Value::as_bool).unwrap_or(true),
        }
    }

    /// Lower-cased, trimmed email; `None` when absent or blank.
    #[must_use]
    pub fn normalized_email(&self) -> Option<String> {
        present(self.email.as_deref()).map(str::to_lowercase)
    }

    /// The role, if present and recognised.
    #[must_use]
    pub fn parsed_role(&self) -> Option<Role> {
        self.role.as_deref().and_then(Role::parse)
    }

    /// Role value that is present but does not name a known role.
    #[must_use]
    pub fn unrecognized_role(&self) -> Option<&str> {
        present(self.role.as_deref()).filter(|raw| Role::parse(raw).is_none())
    }

    /// Whether the profile is an active administrator.
    #[must_use]
    pub fn is_active_administrator(&self) -> bool {
        self.is_active && self.parsed_role() == Some(Role::Administrator)
    }

    /// Required fields that are absent or blank, in [`REQUIRED_FIELDS`] order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let values = [
            self.employee_id.as_deref(),
            self.email.as_deref(),
            self.role.as_deref(),
        ];
        REQUIRED_FIELDS
            .iter()
            .zip(values)
            .filter(|(_, value)| present(*value).is_none())
            .map(|(name, _)| *name)
            .collect()
    }

    /// Short human-readable reference for descriptions.
    #[must_use]
    pub fn label(&self) -> String {
        match (present(self.email.as_deref()), present(self.employee_id.as_deref()), self.id) {
            (Some(email), _, _) => email.to_string(),
            (None, Some(employee_id), _) => format!("employee {employee_id}"),
            (None, None, Some(id)) => format!("user {id}"),
            (None, None, None) => "unidentified user".to_string(),
        }
    }
}

/// Decode a snapshot. Anything other than an array is an empty snapshot.
#[must_use]
pub fn profiles_from_value(value: &Value) -> Vec<UserProfile> {
    value
        .as_array()
        .map(|rows| rows.iter().map(UserProfile::from_value).collect())
        .unwrap_or_default()
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn read_string(row: &Map<String, Value>, key: &str) -> Option<String> {
    row.get(key).and_then(Value::as_str).map(str::to_string)
}

fn read_id(row: &Map<String, Value>) -> Option<i64> {
    match row.get("id")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `station_access` is stored as a JSON array, as a JSON-encoded array in a
/// text column, or as a comma-separated list.
fn read_station_access(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(text)) => {
            let text = text.trim();
            if text.starts_with('[') {
                serde_json::from_str::<Vec<String>>(text).unwrap_or_default()
            } else {
                text.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            }
        }
        _ => Vec::new(),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_well_formed_row() {
        let profile = UserProfile::from_value(&json!({
            "id": 3,
            "email": "Ann@Station.com",
            "role": "manager",
            "employee_id": "E3",
            "station": "MOBIL",
            "station_access": ["MOBIL"],
            "is_active": false
        }));
        assert_eq!(profile.id, Some(3));
        assert_eq!(profile.normalized_email().as_deref(), Some("ann@station.com"));
        assert_eq!(profile.parsed_role(), Some(Role::Management));
        assert_eq!(profile.station.as_deref(), Some("MOBIL"));
        assert!(!profile.is_active);
        assert!(profile.missing_fields().is_empty());
    }

    #[test]
    fn wrong_types_become_absent() {
        let profile = UserProfile::from_value(&json!({
            "id": "12",
            "email": 5,
            "role": null,
            "employee_id": ["E1"]
        }));
        assert_eq!(profile.id, Some(12));
        assert_eq!(profile.email, None);
        assert_eq!(profile.missing_fields(), vec!["employee_id", "email", "role"]);
        assert!(profile.is_active);
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let profile = UserProfile::new(1, "  ", "employee").with_employee_id("");
        assert_eq!(profile.missing_fields(), vec!["employee_id", "email"]);
        assert_eq!(profile.normalized_email(), None);
    }

    #[test]
    fn station_access_formats() {
        let encoded = UserProfile::from_value(&json!({"station_access": "[\"A\",\"B\"]"}));
        assert_eq!(encoded.station_access, vec!["A", "B"]);

        let csv = UserProfile::from_value(&json!({"station_access": "A, B,,C"}));
        assert_eq!(csv.station_access, vec!["A", "B", "C"]);

        let junk = UserProfile::from_value(&json!({"station_access": 7}));
        assert!(junk.station_access.is_empty());
    }

    #[test]
    fn non_array_snapshot_is_empty() {
        assert!(profiles_from_value(&Value::Null).is_empty());
        assert!(profiles_from_value(&json!({"id": 1})).is_empty());
        assert_eq!(profiles_from_value(&json!([1, {"id": 2}])).len(), 2);
    }

    #[test]
    fn unrecognized_role_ignores_blank() {
        assert_eq!(UserProfile::new(1, "a@x.com", "root").unrecognized_role(), Some("root"));
        assert_eq!(UserProfile::new(1, "a@x.com", " ").unrecognized_role(), None);
        assert_eq!(UserProfile::new(1, "a@x.com", "admin").unrecognized_role(), None);
    }

    #[test]
    fn labels() {
        assert_eq!(UserProfile::new(1, "a@x.com", "admin").label(), "a@x.com");
        let no_email = UserProfile {
            employee_id: Some("E9".into()),
            ..UserProfile::default()
        };
        assert_eq!(no_email.label(), "employee E9");
        assert_eq!(UserProfile::default().label(), "unidentified user");
    }
}
