use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of symbols that can be selected at once.
pub const MAX_SELECTED_SYMBOLS: usize = 4;

/// Lowest accepted account balance (USD).
pub const MIN_ACCOUNT_BALANCE: f64 = 1_000.0;

/// Highest accepted account balance (USD).
pub const MAX_ACCOUNT_BALANCE: f64 = 1_000_000.0;

/// Balance used when the input cannot be parsed at all.
pub const UNPARSEABLE_BALANCE: f64 = 0.0;

/// Default account balance for a fresh dashboard.
pub const DEFAULT_ACCOUNT_BALANCE: f64 = 25_000.0;

/// Default symbol selection for a fresh dashboard.
pub const DEFAULT_SYMBOLS: [&str; 4] = ["BTCUSDT", "ETHUSDT", "SOLUSDT", "ADAUSDT"];

/// Price feed cadence choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u64", try_from = "u64")]
pub enum RefreshRate {
    OneSecond,
    TwoSeconds,
    FiveSeconds,
    TenSeconds,
}

impl RefreshRate {
    /// Get all refresh rates in ascending order.
    pub fn all() -> [Self; 4] {
        [
            Self::OneSecond,
            Self::TwoSeconds,
            Self::FiveSeconds,
            Self::TenSeconds,
        ]
    }

    /// Period in milliseconds.
    pub fn as_millis(&self) -> u64 {
        match self {
            Self::OneSecond => 1_000,
            Self::TwoSeconds => 2_000,
            Self::FiveSeconds => 5_000,
            Self::TenSeconds => 10_000,
        }
    }

    /// Exact match on one of the enumerated periods.
    pub fn from_millis(ms: u64) -> Option<Self> {
        Self::all().into_iter().find(|r| r.as_millis() == ms)
    }

    /// Snap an arbitrary period onto the closest enumerated rate.
    pub fn nearest(ms: u64) -> Self {
        Self::all()
            .into_iter()
            .min_by_key(|r| r.as_millis().abs_diff(ms))
            .unwrap_or_default()
    }

    /// Next rate in the cycle, wrapping around.
    pub fn next(&self) -> Self {
        match self {
            Self::OneSecond => Self::TwoSeconds,
            Self::TwoSeconds => Self::FiveSeconds,
            Self::FiveSeconds => Self::TenSeconds,
            Self::TenSeconds => Self::OneSecond,
        }
    }

    /// Human readable label used by the configuration panel.
    pub fn label(&self) -> &'static str {
        match self {
            Self::OneSecond => "1 second",
            Self::TwoSeconds => "2 seconds",
            Self::FiveSeconds => "5 seconds",
            Self::TenSeconds => "10 seconds",
        }
    }
}

impl Default for RefreshRate {
    fn default() -> Self {
        Self::TwoSeconds
    }
}

impl From<RefreshRate> for u64 {
    fn from(rate: RefreshRate) -> Self {
        rate.as_millis()
    }
}

impl TryFrom<u64> for RefreshRate {
    type Error = String;

    fn try_from(ms: u64) -> Result<Self, Self::Error> {
        Self::from_millis(ms).ok_or_else(|| format!("unsupported refresh rate: {}ms", ms))
    }
}

impl fmt::Display for RefreshRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.as_millis())
    }
}

/// Dashboard configuration as seen by every generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    pub account_balance: f64,
    pub selected_symbols: Vec<String>,
    pub refresh_rate_ms: RefreshRate,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            account_balance: DEFAULT_ACCOUNT_BALANCE,
            selected_symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            refresh_rate_ms: RefreshRate::default(),
        }
    }
}

/// Partial configuration edit coming from a surface.
///
/// Fields are raw JSON values so that malformed input can be sanitised
/// instead of rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_balance: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_symbols: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_rate_ms: Option<serde_json::Value>,
}

impl ConfigUpdate {
    /// Update that only touches the account balance.
    pub fn balance(balance: f64) -> Self {
        Self {
            account_balance: Some(serde_json::json!(balance)),
            ..Default::default()
        }
    }

    /// Update that only touches the symbol selection.
    pub fn symbols<S: Into<String>>(symbols: impl IntoIterator<Item = S>) -> Self {
        Self {
            selected_symbols: Some(symbols.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    /// Update that only touches the refresh rate.
    pub fn refresh_rate(rate: RefreshRate) -> Self {
        Self {
            refresh_rate_ms: Some(serde_json::json!(rate.as_millis())),
            ..Default::default()
        }
    }
}

/// Which parts of the configuration actually changed after an edit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigChange {
    pub balance: bool,
    pub symbols: bool,
    pub refresh_rate: bool,
}

impl ConfigChange {
    pub fn any(&self) -> bool {
        self.balance || self.symbols || self.refresh_rate
    }
}
