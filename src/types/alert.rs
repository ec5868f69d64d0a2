//! Alert types for the advisory feed.

use serde::{Deserialize, Serialize};

/// Alert severity categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Danger,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &str {
        match self {
            AlertSeverity::Info => "info",
            AlertSeverity::Warning => "warning",
            AlertSeverity::Danger => "danger",
        }
    }
}

/// An advisory message in the alert feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Unique, time-derived ID
    pub id: String,
    pub severity: AlertSeverity,
    pub message: String,
    /// Timestamp in milliseconds
    pub timestamp: i64,
}

impl Alert {
    /// Header line, e.g. `"WARNING ALERT"`.
    pub fn title(&self) -> String {
        format!("{} ALERT", self.severity.as_str().to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_title() {
        let alert = Alert {
            id: "1".to_string(),
            severity: AlertSeverity::Danger,
            message: "test".to_string(),
            timestamp: 0,
        };
        assert_eq!(alert.title(), "DANGER ALERT");
    }

    #[test]
    fn test_severity_serialization() {
        let json = serde_json::to_string(&AlertSeverity::Warning).unwrap();
        assert_eq!(json, "\"warning\"");
        let parsed: AlertSeverity = serde_json::from_str("\"info\"").unwrap();
        assert_eq!(parsed, AlertSeverity::Info);
    }
}
