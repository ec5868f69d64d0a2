use serde::{Deserialize, Serialize};

/// Which detail panel a surface asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailKind {
    Market,
    Risk,
}

impl DetailKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "market" => Some(Self::Market),
            "risk" => Some(Self::Risk),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::Risk => "risk",
        }
    }
}

/// A single labelled line in a detail section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailEntry {
    pub label: String,
    pub value: String,
}

/// A titled group of entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailSection {
    pub heading: String,
    pub entries: Vec<DetailEntry>,
}

/// Informational report rendered by the details view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailReport {
    pub kind: DetailKind,
    pub title: String,
    pub sections: Vec<DetailSection>,
}

impl DetailReport {
    /// Look up an entry value by section heading and label.
    pub fn value(&self, heading: &str, label: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.heading == heading)?
            .entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.value.as_str())
    }
}
