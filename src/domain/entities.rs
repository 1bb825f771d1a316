//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/desktop types here; adapters map into these.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed title of every medicine notification.
pub const NOTIFICATION_TITLE: &str = "💊 Medicine Reminder";

/// Default notification icon.
pub const DEFAULT_ICON: &str = "https://cdn-icons-png.flaticon.com/512/2966/2966485.png";

/// A due medication entry as returned by the reminder endpoint.
///
/// Produced fresh on every poll and never retained; two polls returning the
/// same entry yield two notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineReminder {
    /// Server-side medicine row id, when the server sends one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    /// Nullable on the server.
    #[serde(default)]
    pub dosage: Option<String>,
}

impl MedicineReminder {
    pub fn new(name: impl Into<String>, dosage: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            dosage: Some(dosage.into()),
        }
    }

    /// A reminder whose dosage the server sent as null.
    pub fn without_dosage(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            dosage: None,
        }
    }

    /// Dosage as it is interpolated into the notification; null renders as `null`.
    pub fn dosage_text(&self) -> &str {
        self.dosage.as_deref().unwrap_or("null")
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}

/// Notification permission, three-valued like the browser flag it stands in for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    #[default]
    Default,
    Denied,
    Granted,
}

impl PermissionState {
    pub fn is_granted(self) -> bool {
        self == PermissionState::Granted
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PermissionState::Default => "default",
            PermissionState::Denied => "denied",
            PermissionState::Granted => "granted",
        };
        f.write_str(s)
    }
}

/// A notification ready to be displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
}

impl Notification {
    /// Build the medicine notification. Inputs are interpolated as-is.
    pub fn for_medicine(name: &str, dosage: &str, icon: &str) -> Self {
        Self {
            title: NOTIFICATION_TITLE.to_string(),
            body: reminder_body(name, dosage),
            icon: icon.to_string(),
        }
    }
}

/// `Time to take {name} ({dosage})`
pub fn reminder_body(name: &str, dosage: &str) -> String {
    format!("Time to take {} ({})", name, dosage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reminder_body_template() {
        assert_eq!(reminder_body("Aspirin", "100mg"), "Time to take Aspirin (100mg)");
        assert_eq!(reminder_body("", ""), "Time to take  ()");
    }

    #[test]
    fn test_deserialize_server_payload() {
        let json = r#"[{"id": 7, "name": "Aspirin", "dosage": "100mg"}, {"name": "Zinc", "dosage": null}]"#;
        let meds: Vec<MedicineReminder> = serde_json::from_str(json).unwrap();
        assert_eq!(meds[0], MedicineReminder::new("Aspirin", "100mg").with_id(7));
        assert_eq!(meds[1], MedicineReminder::without_dosage("Zinc"));
        assert_eq!(meds[1].dosage_text(), "null");
    }

    #[test]
    fn test_null_dosage_rendered_as_null() {
        let json = r#"{"id": 2, "name": "Zinc", "dosage": null}"#;
        let med: MedicineReminder = serde_json::from_str(json).unwrap();
        assert_eq!(
            reminder_body(&med.name, med.dosage_text()),
            "Time to take Zinc (null)"
        );
    }

    #[test]
    fn test_missing_name_is_malformed() {
        let json = r#"[{"dosage": "5ml"}]"#;
        assert!(serde_json::from_str::<Vec<MedicineReminder>>(json).is_err());
    }

    #[test]
    fn test_permission_state_serde() {
        let s: PermissionState = serde_json::from_str(r#""granted""#).unwrap();
        assert_eq!(s, PermissionState::Granted);
        assert_eq!(serde_json::to_string(&PermissionState::Denied).unwrap(), r#""denied""#);
        assert_eq!(PermissionState::default(), PermissionState::Default);
    }

    #[test]
    fn test_notification_for_medicine() {
        let n = Notification::for_medicine("Aspirin", "100mg", DEFAULT_ICON);
        assert_eq!(n.title, "💊 Medicine Reminder");
        assert_eq!(n.body, "Time to take Aspirin (100mg)");
        assert_eq!(n.icon, DEFAULT_ICON);
    }
}
